//! OS signal bridge: SIGINT/SIGTERM request shutdown.
//!
//! Signals are consumed on a dedicated listener thread, which is the single
//! writer of the [`ShutdownSignal`]. Repeated signals are logged and ignored;
//! there is no forced-kill path.

use std::thread::{self, JoinHandle};

use log::{debug, info};
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    iterator::{Handle, Signals},
    low_level::signal_name,
};

use crate::error::StartupError;
use crate::runtime::shutdown::ShutdownSignal;

const LISTENER_THREAD_NAME: &str = "signal-listener";

pub struct SignalListener {
    handle: Handle,
    thread: JoinHandle<()>,
}

impl SignalListener {
    /// Registers the handlers and starts the listener thread.
    pub fn install(shutdown: ShutdownSignal) -> Result<Self, StartupError> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(StartupError::Signals)?;
        let handle = signals.handle();

        let thread = thread::Builder::new()
            .name(LISTENER_THREAD_NAME.to_string())
            .spawn(move || {
                for sig in signals.forever() {
                    let name = signal_name(sig).unwrap_or("signal");
                    if shutdown.signal_shutdown() {
                        info!("[SYSTEM] Shutdown signal received ({})...", name);
                    } else {
                        info!("[SYSTEM] {} ignored, shutdown already in progress", name);
                    }
                }
                debug!("[SYSTEM] signal listener exiting");
            })
            .map_err(|source| StartupError::Spawn {
                name: LISTENER_THREAD_NAME.to_string(),
                source,
            })?;

        Ok(Self { handle, thread })
    }

    /// Stops listening and joins the listener thread.
    pub fn close(self) {
        self.handle.close();
        let _ = self.thread.join();
    }
}
