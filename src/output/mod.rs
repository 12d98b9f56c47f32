//! JSON response envelope shared by non-interactive commands.

mod response;

pub use response::*;
