//! Utility modules for common functionality
//!
//! Provides process execution, host signal handling and environment merging.

pub mod env;
pub mod process;
pub mod signals;

pub use env::EnvUtils;
pub use process::ProcessRunner;
pub use signals::OsHost;
