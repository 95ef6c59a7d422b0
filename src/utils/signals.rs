//! Host process signal handling
//!
//! [`OsHost`] is the real [`HostProcess`]: it installs `sigaction` handlers
//! that relay signals to the child and ends the current process when the
//! child is gone.

use crate::core::lifecycle::{HostProcess, Signal, Termination};
use crate::error::Result;

#[cfg(unix)]
pub use unix::OsHost;

#[cfg(not(unix))]
pub use fallback::OsHost;

#[cfg(unix)]
mod unix {
    use super::*;
    use crate::error::LoaderError;
    use std::{
        collections::HashMap,
        io, ptr,
        sync::atomic::{AtomicI32, Ordering},
    };
    use tracing::{debug, warn};

    /// Pid forwarded signals go to; 0 while no child is running
    static FORWARD_PID: AtomicI32 = AtomicI32::new(0);

    /// Last signal received before a child was bound; 0 when none
    static PENDING_SIGNAL: AtomicI32 = AtomicI32::new(0);

    // Runs in signal context: only async-signal-safe calls allowed.
    extern "C" fn forward_signal(signal: libc::c_int) {
        let pid = FORWARD_PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, signal);
            }
        } else {
            PENDING_SIGNAL.store(signal, Ordering::SeqCst);
        }
    }

    /// The current process as seen by the lifecycle session
    #[derive(Default)]
    pub struct OsHost {
        previous: HashMap<Signal, libc::sigaction>,
    }

    impl OsHost {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl HostProcess for OsHost {
        fn listen(&mut self, signal: Signal) -> Result<()> {
            let raw = signal.as_raw();
            let handler: extern "C" fn(libc::c_int) = forward_signal;

            let mut action: libc::sigaction = unsafe { std::mem::zeroed() };
            action.sa_sigaction = handler as libc::sighandler_t;
            action.sa_flags = libc::SA_RESTART;

            let mut previous: libc::sigaction = unsafe { std::mem::zeroed() };
            let rc = unsafe {
                libc::sigemptyset(&mut action.sa_mask);
                libc::sigaction(raw, &action, &mut previous)
            };
            if rc != 0 {
                return Err(LoaderError::signal(
                    signal.to_string(),
                    io::Error::last_os_error(),
                ));
            }

            debug!("Listening for {}", signal);
            self.previous.insert(signal, previous);
            Ok(())
        }

        fn unlisten(&mut self, signal: Signal) {
            let Some(previous) = self.previous.remove(&signal) else {
                return;
            };

            let rc = unsafe { libc::sigaction(signal.as_raw(), &previous, ptr::null_mut()) };
            if rc != 0 {
                warn!(
                    "Failed to restore handling of {}: {}",
                    signal,
                    io::Error::last_os_error()
                );
            }
        }

        fn forward_to(&mut self, child_pid: u32) {
            let pid = i32::try_from(child_pid).unwrap_or(0);
            FORWARD_PID.store(pid, Ordering::SeqCst);

            let pending = PENDING_SIGNAL.swap(0, Ordering::SeqCst);
            if pid > 0 && pending > 0 {
                debug!("Delivering signal {} received before launch", pending);
                unsafe {
                    libc::kill(pid, pending);
                }
            }
        }

        fn terminate(&mut self, termination: Termination) {
            FORWARD_PID.store(0, Ordering::SeqCst);
            PENDING_SIGNAL.store(0, Ordering::SeqCst);

            match termination {
                Termination::Exit(code) => std::process::exit(code),
                Termination::Signal(signal) => {
                    let raw = signal.as_raw();
                    debug!("Re-raising {} on self", signal);
                    unsafe {
                        libc::signal(raw, libc::SIG_DFL);
                        libc::kill(libc::getpid(), raw);
                    }
                    // Still running: the signal is blocked or does not terminate
                    warn!("{} did not terminate the process", signal);
                    std::process::exit(128 + raw)
                }
            }
        }
    }

}

#[cfg(not(unix))]
mod fallback {
    use super::*;

    /// The current process; signals are not relayed on this platform
    #[derive(Debug, Default)]
    pub struct OsHost;

    impl OsHost {
        pub fn new() -> Self {
            Self
        }
    }

    impl HostProcess for OsHost {
        fn listen(&mut self, _signal: Signal) -> Result<()> {
            Ok(())
        }

        fn unlisten(&mut self, _signal: Signal) {}

        fn forward_to(&mut self, _child_pid: u32) {}

        fn terminate(&mut self, termination: Termination) {
            match termination {
                Termination::Exit(code) => std::process::exit(code),
                Termination::Signal(_) => {
                    std::process::exit(crate::core::lifecycle::FAILURE_EXIT_CODE)
                }
            }
        }
    }
}
