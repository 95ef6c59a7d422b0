//! # envloadr
//!
//! Runs a command with variables loaded from one or more `.env` style files
//! and mirrors the command's end onto the launcher: same exit code, or death
//! by the same signal.
//!
//! ## Features
//!
//! - Schema-driven option parsing that stops at the target command
//! - `NAME=VALUE` files with comments, quote stripping and an override policy
//! - Forwarding of SIGINT, SIGTERM and SIGHUP to the running command
//! - Exit code and signal propagation back to the launcher
//!
//! ## Example
//!
//! ```no_run
//! use envloadr::core::{EnvFileOptions, parse_env_file};
//!
//! let env = parse_env_file(".env", EnvFileOptions::default())?;
//! for (name, value) in env.iter() {
//!     println!("{name}={value}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging on stderr; stdout belongs to the launched command
pub fn setup_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(config::LOG_ENV_VAR).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
