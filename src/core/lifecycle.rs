//! Parent/child lifecycle synchronization
//!
//! A [`LifecycleSync`] session owns the host's signal listeners for as long as
//! one child runs. Termination signals received by the host are forwarded to
//! the child; when the child ends, the listeners are removed first and the host
//! then ends the same way: with the child's exit code, or by the child's
//! signal.

use crate::error::{LoaderError, Result};
use std::fmt;
use tracing::debug;

/// Exit code used when the child's own code is unknown or it never started
pub const FAILURE_EXIT_CODE: i32 = 1;

/// A termination signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Interrupt,
    Terminate,
    Hangup,
    /// Any other signal, by number
    Other(i32),
}

#[cfg(unix)]
mod raw {
    pub const SIGINT: i32 = libc::SIGINT;
    pub const SIGTERM: i32 = libc::SIGTERM;
    pub const SIGHUP: i32 = libc::SIGHUP;
}

#[cfg(not(unix))]
mod raw {
    pub const SIGINT: i32 = 2;
    pub const SIGTERM: i32 = 15;
    pub const SIGHUP: i32 = 1;
}

impl Signal {
    /// Signals the host forwards to its child
    pub const FORWARDED: [Signal; 3] = [Signal::Interrupt, Signal::Terminate, Signal::Hangup];

    pub fn as_raw(self) -> i32 {
        match self {
            Self::Interrupt => raw::SIGINT,
            Self::Terminate => raw::SIGTERM,
            Self::Hangup => raw::SIGHUP,
            Self::Other(number) => number,
        }
    }

    pub fn from_raw(number: i32) -> Self {
        match number {
            raw::SIGINT => Self::Interrupt,
            raw::SIGTERM => Self::Terminate,
            raw::SIGHUP => Self::Hangup,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => f.write_str("SIGINT"),
            Self::Terminate => f.write_str("SIGTERM"),
            Self::Hangup => f.write_str("SIGHUP"),
            Self::Other(number) => write!(f, "signal {number}"),
        }
    }
}

/// How the child's life ended, as observed by the host
#[derive(Debug)]
pub enum ChildEvent {
    /// The child exited on its own; `None` when no code was reported
    Exited(Option<i32>),
    /// The child was killed by a signal
    Signaled(Signal),
    /// The child could not be started
    LaunchFailed(LoaderError),
}

/// What the host does to itself once the child is gone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Exit(i32),
    Signal(Signal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Running,
    Terminating,
}

/// The host process side of a session
///
/// `terminate` is expected not to return for a real process.
pub trait HostProcess {
    /// Start forwarding `signal` to the current child
    fn listen(&mut self, signal: Signal) -> Result<()>;

    /// Stop forwarding `signal` and restore its previous handling
    fn unlisten(&mut self, signal: Signal);

    /// Set the pid forwarded signals are delivered to
    fn forward_to(&mut self, child_pid: u32);

    fn terminate(&mut self, termination: Termination);
}

/// Signal and exit propagation between the host and one child
pub struct LifecycleSync<H: HostProcess> {
    host: H,
    listening: Vec<Signal>,
    state: SyncState,
}

impl<H: HostProcess> LifecycleSync<H> {
    /// Install the forwarding listeners on `host`
    ///
    /// If any listener fails to install, the ones already installed are
    /// removed again before the error is returned.
    pub fn start(host: H) -> Result<Self> {
        let mut sync = Self {
            host,
            listening: Vec::with_capacity(Signal::FORWARDED.len()),
            state: SyncState::Running,
        };

        for signal in Signal::FORWARDED {
            sync.host.listen(signal)?;
            sync.listening.push(signal);
        }

        debug!("Forwarding {:?} to the child", sync.listening);
        Ok(sync)
    }

    /// Direct forwarded signals at the spawned child
    pub fn bind_child(&mut self, child_pid: u32) {
        debug!("Child started with pid {}", child_pid);
        self.host.forward_to(child_pid);
    }

    /// Mirror the end of the child onto the host
    ///
    /// Only the first event is acted upon.
    pub fn handle(&mut self, event: ChildEvent) -> Result<Termination> {
        if self.state == SyncState::Terminating {
            return Err(LoaderError::lifecycle(format!(
                "child event {event:?} received after termination"
            )));
        }
        self.state = SyncState::Terminating;
        self.release();

        let termination = match event {
            ChildEvent::Exited(code) => {
                debug!("Child exited with code {:?}", code);
                Termination::Exit(code.unwrap_or(FAILURE_EXIT_CODE))
            }
            ChildEvent::Signaled(signal) => {
                debug!("Child killed by {}", signal);
                Termination::Signal(signal)
            }
            ChildEvent::LaunchFailed(err) => {
                // Not subject to the log filter
                eprintln!("Error: {err}");
                Termination::Exit(FAILURE_EXIT_CODE)
            }
        };

        self.host.terminate(termination);
        Ok(termination)
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    fn release(&mut self) {
        for signal in self.listening.drain(..) {
            self.host.unlisten(signal);
        }
    }
}

impl<H: HostProcess> Drop for LifecycleSync<H> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum HostCall {
        Listen(Signal),
        Unlisten(Signal),
        ForwardTo(u32),
        Terminate(Termination),
    }

    /// Host that records every call instead of touching the process
    #[derive(Debug, Default)]
    pub struct RecordingHost {
        pub calls: Vec<HostCall>,
        /// Make `listen` fail for this signal
        pub refuse: Option<Signal>,
    }

    impl HostProcess for RecordingHost {
        fn listen(&mut self, signal: Signal) -> Result<()> {
            if self.refuse == Some(signal) {
                return Err(LoaderError::signal(
                    signal.to_string(),
                    std::io::Error::other("refused"),
                ));
            }
            self.calls.push(HostCall::Listen(signal));
            Ok(())
        }

        fn unlisten(&mut self, signal: Signal) {
            self.calls.push(HostCall::Unlisten(signal));
        }

        fn forward_to(&mut self, child_pid: u32) {
            self.calls.push(HostCall::ForwardTo(child_pid));
        }

        fn terminate(&mut self, termination: Termination) {
            self.calls.push(HostCall::Terminate(termination));
        }
    }

    impl<T: HostProcess> HostProcess for &mut T {
        fn listen(&mut self, signal: Signal) -> Result<()> {
            (**self).listen(signal)
        }

        fn unlisten(&mut self, signal: Signal) {
            (**self).unlisten(signal)
        }

        fn forward_to(&mut self, child_pid: u32) {
            (**self).forward_to(child_pid)
        }

        fn terminate(&mut self, termination: Termination) {
            (**self).terminate(termination)
        }
    }
}
