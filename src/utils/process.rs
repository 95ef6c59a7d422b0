//! Process execution utilities
//!
//! Spawns the target command with inherited standard streams and an explicit
//! environment, then hands its end over to the lifecycle session.

use crate::{
    cli::parser::Command as TargetCommand,
    core::lifecycle::{ChildEvent, HostProcess, LifecycleSync, Signal, Termination},
    error::{LoaderError, Result},
};
use std::{
    ffi::OsString,
    process::{Child, Command, ExitStatus, Stdio},
};
use tracing::{debug, info, instrument};

/// Utility for running the target command
#[derive(Debug)]
pub struct ProcessRunner {
    verbose: bool,
}

impl ProcessRunner {
    /// Create a new process runner
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Start `command` with exactly `env` as its environment
    pub fn spawn(&self, command: &TargetCommand, env: &[(OsString, OsString)]) -> Result<Child> {
        let cmd_str = command.command_line();

        if self.verbose {
            info!("+ {}", cmd_str);
        } else {
            debug!("Running command: {}", cmd_str);
        }

        Command::new(&command.name)
            .args(&command.args)
            .env_clear()
            .envs(env.iter().map(|(key, value)| (key, value)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| LoaderError::launch(cmd_str, e))
    }

    /// Block until `child` ends and describe how it ended
    pub fn wait(&self, child: &mut Child) -> Result<ChildEvent> {
        let pid = child.id();
        let status = child
            .wait()
            .map_err(|e| LoaderError::lifecycle(format!("Failed to wait for child {pid}: {e}")))?;
        Ok(child_event(status))
    }

    /// Run `command` under a lifecycle session on `host`
    ///
    /// The host's termination is performed by the session; with a real
    /// process host this function does not return after the child ends.
    #[instrument(skip(self, command, env, host), fields(command = %command.name))]
    pub fn run_synchronized<H: HostProcess>(
        &self,
        command: &TargetCommand,
        env: &[(OsString, OsString)],
        host: H,
    ) -> Result<Termination> {
        let mut session = LifecycleSync::start(host)?;

        let event = match self.spawn(command, env) {
            Ok(mut child) => {
                session.bind_child(child.id());
                self.wait(&mut child)?
            }
            Err(err) => ChildEvent::LaunchFailed(err),
        };

        session.handle(event)
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(unix)]
fn child_event(status: ExitStatus) -> ChildEvent {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => ChildEvent::Exited(Some(code)),
        (None, Some(signal)) => ChildEvent::Signaled(Signal::from_raw(signal)),
        (None, None) => ChildEvent::Exited(None),
    }
}

#[cfg(not(unix))]
fn child_event(status: ExitStatus) -> ChildEvent {
    ChildEvent::Exited(status.code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lifecycle::testing::{HostCall, RecordingHost};

    fn command(name: &str, args: &[&str]) -> TargetCommand {
        TargetCommand {
            name: name.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    fn path_env() -> Vec<(OsString, OsString)> {
        std::env::var_os("PATH")
            .map(|path| vec![(OsString::from("PATH"), path)])
            .unwrap_or_default()
    }

    #[test]
    fn test_process_runner_creation() {
        let runner = ProcessRunner::new(true);
        assert!(runner.verbose);

        let runner = ProcessRunner::default();
        assert!(!runner.verbose);
    }

    #[test]
    fn test_exit_code_reaches_host() {
        let runner = ProcessRunner::default();
        let mut host = RecordingHost::default();

        let termination = runner
            .run_synchronized(&command("sh", &["-c", "exit 3"]), &path_env(), &mut host)
            .unwrap();

        assert_eq!(termination, Termination::Exit(3));
        assert_eq!(
            host.calls.last(),
            Some(&HostCall::Terminate(Termination::Exit(3)))
        );
        assert!(host.calls.iter().any(|call| matches!(call, HostCall::ForwardTo(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_child_signal_reaches_host() {
        let runner = ProcessRunner::default();
        let mut host = RecordingHost::default();

        let termination = runner
            .run_synchronized(
                &command("sh", &["-c", "kill -TERM $$"]),
                &path_env(),
                &mut host,
            )
            .unwrap();

        assert_eq!(termination, Termination::Signal(Signal::Terminate));
    }

    #[test]
    fn test_launch_failure_reaches_host() {
        let runner = ProcessRunner::default();
        let mut host = RecordingHost::default();

        let termination = runner
            .run_synchronized(
                &command("nonexistent_command_12345", &["--flag"]),
                &path_env(),
                &mut host,
            )
            .unwrap();

        assert_eq!(termination, Termination::Exit(1));
        assert!(!host.calls.iter().any(|call| matches!(call, HostCall::ForwardTo(_))));
    }

    #[test]
    fn test_spawn_uses_given_environment_only() {
        let runner = ProcessRunner::default();
        let mut env = path_env();
        env.push((OsString::from("ENVLOADR_TEST_VAR"), OsString::from("test_value")));
        let mut host = RecordingHost::default();

        let termination = runner
            .run_synchronized(
                &command(
                    "sh",
                    &["-c", "test \"$ENVLOADR_TEST_VAR\" = test_value && test -z \"$HOME\""],
                ),
                &env,
                &mut host,
            )
            .unwrap();

        assert_eq!(termination, Termination::Exit(0));
    }

    #[test]
    fn test_launch_error_names_command() {
        let runner = ProcessRunner::default();
        let err = runner
            .spawn(&command("nonexistent_command_12345", &["a", "b"]), &path_env())
            .unwrap_err();

        assert!(matches!(err, LoaderError::Launch { .. }));
        assert!(
            err.to_string()
                .starts_with("Command \"nonexistent_command_12345 a b\" failed to launch: ")
        );
    }

    #[test]
    fn test_child_event_from_status() {
        let mut child = Command::new("sh").args(["-c", "exit 7"]).spawn().unwrap();
        let event = ProcessRunner::default().wait(&mut child).unwrap();
        assert!(matches!(event, ChildEvent::Exited(Some(7))));
    }
}
