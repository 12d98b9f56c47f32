// Public modules
pub mod cmake;
pub mod error;
pub mod license;
pub mod process;
pub mod terminal;

// Public modules for CLI access
pub mod defaults;
pub mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
