//! shutdown.rs
//! Process-wide shutdown intent shared by the supervisor and every worker.
//! - `is_running()` is a single atomic load, safe from any number of threads
//! - `signal_shutdown()` flips the flag exactly once; later calls are no-ops
//! - `wait_timeout()` is the cancellable sleep workers use between cycles

use parking_lot::{Condvar, Mutex};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

struct Inner {
    running: AtomicBool,
    // Only guards the condvar handshake; the flag itself is the atomic.
    lock: Mutex<()>,
    wake: Condvar,
}

/// Cloneable handle to the shared running flag.
#[derive(Clone)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                running: AtomicBool::new(true),
                lock: Mutex::new(()),
                wake: Condvar::new(),
            }),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// Transitions to "stopped" and wakes every sleeping worker.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn signal_shutdown(&self) -> bool {
        let was_running = self.inner.running.swap(false, Ordering::AcqRel);
        if was_running {
            // Taking the lock orders this notify after any waiter's flag check.
            let _guard = self.inner.lock.lock();
            self.inner.wake.notify_all();
        }
        was_running
    }

    /// Sleeps for up to `timeout`, returning early once shutdown is signalled.
    ///
    /// Returns `is_running()` as observed after waking.
    /// A timeout too large to express as a deadline waits for shutdown alone.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut guard = self.inner.lock.lock();
        while self.is_running() {
            match deadline {
                Some(deadline) => {
                    if self.inner.wake.wait_until(&mut guard, deadline).timed_out() {
                        break;
                    }
                }
                None => self.inner.wake.wait(&mut guard),
            }
        }
        self.is_running()
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShutdownSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownSignal")
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn starts_running() {
        assert!(ShutdownSignal::new().is_running());
    }

    #[test]
    fn transition_is_monotonic_and_idempotent() {
        let signal = ShutdownSignal::new();
        assert!(signal.signal_shutdown());
        for _ in 0..100 {
            assert!(!signal.is_running());
            assert!(!signal.signal_shutdown());
        }
        assert!(!signal.is_running());
    }

    #[test]
    fn clones_share_state() {
        let signal = ShutdownSignal::new();
        let observer = signal.clone();
        signal.signal_shutdown();
        assert!(!observer.is_running());
    }

    #[test]
    fn wait_times_out_while_running() {
        let signal = ShutdownSignal::new();
        let start = Instant::now();
        assert!(signal.wait_timeout(Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn wait_returns_immediately_after_shutdown() {
        let signal = ShutdownSignal::new();
        signal.signal_shutdown();
        let start = Instant::now();
        assert!(!signal.wait_timeout(Duration::from_secs(60)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn unbounded_wait_ends_on_shutdown() {
        let signal = ShutdownSignal::new();
        let sleeper = {
            let s = signal.clone();
            thread::spawn(move || s.wait_timeout(Duration::MAX))
        };

        thread::sleep(Duration::from_millis(30));
        signal.signal_shutdown();
        assert!(!sleeper.join().unwrap());
    }

    #[test]
    fn shutdown_wakes_sleeping_waiters() {
        let signal = ShutdownSignal::new();
        let sleepers: Vec<_> = (0..4)
            .map(|_| {
                let s = signal.clone();
                thread::spawn(move || {
                    let start = Instant::now();
                    let still_running = s.wait_timeout(Duration::from_secs(60));
                    (still_running, start.elapsed())
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        signal.signal_shutdown();

        for h in sleepers {
            let (still_running, waited) = h.join().unwrap();
            assert!(!still_running);
            assert!(waited < Duration::from_secs(5));
        }
    }

    #[test]
    fn concurrent_readers_eventually_observe_stop() {
        let signal = ShutdownSignal::new();
        let readers: Vec<_> = (0..8)
            .map(|_| {
                let s = signal.clone();
                thread::spawn(move || {
                    while s.is_running() {
                        thread::yield_now();
                    }
                    (0..1_000).all(|_| !s.is_running())
                })
            })
            .collect();

        signal.signal_shutdown();
        for r in readers {
            assert!(r.join().unwrap());
        }
    }
}
