//! Command implementations for the CLI

use crate::{
    cli::{
        help::build_help,
        parser::{Command, parse},
        schema::{HELP, SpecSchema},
    },
    config::Config,
    core::{
        env_file::{Env, parse_env_files},
        lifecycle::Termination,
    },
    error::Result,
    utils::{env::EnvUtils, process::ProcessRunner, signals::OsHost},
};
use tracing::{debug, instrument};

/// What a given argument vector asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print this text and stop
    Help(String),
    /// Load the environment and run the command
    Launch { config: Config, command: Command },
}

/// Turn raw arguments into an [`Invocation`]
pub fn prepare<S: AsRef<str>>(args: &[S], schema: &SpecSchema) -> Result<Invocation> {
    let parsed = parse(args, schema)?;

    if parsed
        .options
        .as_ref()
        .is_some_and(|options| options.contains_key(HELP))
    {
        return Ok(Invocation::Help(build_help(schema)));
    }

    let config = Config::from_options(parsed.options.as_ref())?;
    Ok(Invocation::Launch {
        config,
        command: parsed.command,
    })
}

/// Load every configured environment file, in order
pub fn load_environment(config: &Config) -> Result<Env> {
    parse_env_files(&config.files, config.env_file_options())
}

/// Run `command` with the configured environment and mirror its end
#[instrument(skip(config, command), fields(command = %command.name))]
pub fn execute_command(config: &Config, command: &Command) -> anyhow::Result<Termination> {
    let loaded = load_environment(config)?;
    debug!("Loaded {} variable(s)", loaded.len());

    let env = EnvUtils::merge(EnvUtils::process_vars(), &loaded, config.override_existing);

    let runner = ProcessRunner::new(config.verbose);
    let termination = runner.run_synchronized(command, &env, OsHost::new())?;

    Ok(termination)
}
