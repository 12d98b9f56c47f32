pub type CmdResult<T> = buildhelper::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod license;
pub mod menu;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($global:expr, $module:ident) => {
        buildhelper::output::map_cmd_result_to_json($module::run($global))
    };
    ($args:expr, $global:expr, $module:ident) => {
        buildhelper::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (buildhelper::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Menu => dispatch!(global, menu),
        crate::Commands::License(args) => {
            crate::tty::status("buildhelper is working...");
            dispatch!(args, global, license)
        }
    }
}
