/// Macro for prefixed status logging to stderr (only when stderr is a terminal).
///
/// Usage:
/// ```ignore
/// log_status!("license", "Rewrote {}", path.display());
/// log_status!("cmake", "Detected generator {}", generator);
/// ```
#[macro_export]
macro_rules! log_status {
    ($prefix:expr, $($arg:tt)*) => {
        if ::std::io::IsTerminal::is_terminal(&::std::io::stderr()) {
            eprintln!(concat!("[", $prefix, "] {}"), format_args!($($arg)*));
        }
    };
}

pub mod core;
pub mod output;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `buildhelper::license` instead of `buildhelper::core::license`
pub use self::core::*;
pub use self::utils::*;
