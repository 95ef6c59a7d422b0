//! Core functionality for environment loading
//!
//! Contains the environment file parser and the parent/child lifecycle
//! synchronization.

pub mod env_file;
pub mod lifecycle;

pub use env_file::{Env, EnvFileOptions, parse_env_file, parse_env_files};
pub use lifecycle::{ChildEvent, HostProcess, LifecycleSync, Signal, Termination};
