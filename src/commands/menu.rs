use buildhelper::cmake::{run_menu, Session};
use buildhelper::process::SystemRunner;
use buildhelper::terminal::StdTerminal;
use buildhelper::{defaults, paths};

use super::{CmdResult, GlobalArgs};

pub fn run(_global: &GlobalArgs) -> CmdResult<()> {
    let root = paths::project_root()?;
    let config = defaults::load_config(&root);

    let runner = SystemRunner;
    let mut term = StdTerminal::default();

    let mut session = Session::start(&root, &config.build, &runner, &mut term)?;
    run_menu(&mut session, &runner, &mut term)?;

    Ok(((), 0))
}
