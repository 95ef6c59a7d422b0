//! Command-line interface module
//!
//! Provides the option schema, argument parsing, help output and command
//! execution.

pub mod commands;
pub mod help;
pub mod parser;
pub mod schema;

pub use commands::{Invocation, execute_command, load_environment, prepare};
pub use help::build_help;
pub use parser::{Command, OptionValue, Options, ParseResult, parse, utf8_args};
pub use schema::{OptionSpec, Param, SpecSchema, ValueKind, default_schema};
