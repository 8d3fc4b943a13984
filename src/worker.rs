// src/worker.rs

//! The render worker: a long-lived thread that wakes on a coalescing
//! signal and executes exactly one render pass per wake.
//!
//! The wake signal is a binary gate, not a counter. Raising it while
//! already armed is a no-op; the worker disarms it before starting a
//! pass, so anything arriving mid-pass schedules one more pass instead of
//! being lost. Multiple rapid signals legally collapse into a single pass
//! covering the union of changes.

use crate::encoder::TerminalEncoder;
use crate::error::DisplayError;
use crate::render::{run_pass, BlankingState};
use crate::sink::ByteSink;
use crate::surface::PixelSurface;

use log::{debug, error};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

/// Coalescing binary wake gate: "armed" or "idle", nothing in between.
pub struct WakeSignal {
    armed: Mutex<bool>,
    cv: Condvar,
}

impl WakeSignal {
    pub fn new() -> Self {
        WakeSignal {
            armed: Mutex::new(false),
            cv: Condvar::new(),
        }
    }

    fn lock_armed(&self) -> std::sync::MutexGuard<'_, bool> {
        // A poisoned lock only means a panicking thread held it; the
        // boolean inside is still meaningful.
        self.armed.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Arms the signal. No-op if already armed.
    pub fn raise(&self) {
        let mut armed = self.lock_armed();
        if !*armed {
            *armed = true;
            self.cv.notify_one();
        }
    }

    /// Blocks until armed, then disarms and returns.
    pub fn wait(&self) {
        let mut armed = self.lock_armed();
        while !*armed {
            armed = self.cv.wait(armed).unwrap_or_else(|p| p.into_inner());
        }
        *armed = false;
    }
}

impl Default for WakeSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// State shared between the producer-facing driver and its worker thread.
pub(crate) struct DisplayShared {
    pub surface: PixelSurface,
    pub blanking: BlankingState,
    pub signal: WakeSignal,
    pub shutdown: AtomicBool,
}

impl DisplayShared {
    pub fn new(width: u16, height: u16) -> Self {
        DisplayShared {
            surface: PixelSurface::new(width, height),
            blanking: BlankingState::new(),
            signal: WakeSignal::new(),
            shutdown: AtomicBool::new(false),
        }
    }
}

/// Spawns the render worker thread for one driver instance.
pub(crate) fn spawn<S: ByteSink + 'static>(
    shared: Arc<DisplayShared>,
    encoder: TerminalEncoder<S>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("pixterm-render".into())
        .spawn(move || run(shared, encoder))
}

fn run<S: ByteSink>(shared: Arc<DisplayShared>, mut encoder: TerminalEncoder<S>) {
    loop {
        debug!("render worker waiting for signal");
        shared.signal.wait();
        if shared.shutdown.load(Ordering::Acquire) {
            debug!("render worker shutting down");
            break;
        }
        debug!("render worker woke, running pass");
        if let Err(e) = run_pass(&shared.surface, &shared.blanking, &mut encoder) {
            // The pass aborted; dirty bits not yet consumed remain set and
            // the next wake re-attempts. SinkFailure is the only error the
            // pass can produce.
            match e {
                DisplayError::SinkFailure(ref io_err) => {
                    error!("render pass aborted by sink failure: {}", io_err)
                }
                other => error!("render pass aborted: {}", other),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use test_log::test;

    #[test]
    fn raise_then_wait_does_not_block() {
        let signal = WakeSignal::new();
        signal.raise();
        signal.wait(); // returns immediately, disarmed
    }

    #[test]
    fn raising_twice_coalesces_into_one_wake() {
        let signal = Arc::new(WakeSignal::new());
        signal.raise();
        signal.raise();
        signal.wait();

        // The gate is now idle again: a waiter blocks until a new raise.
        let waiter = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || signal.wait())
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished(), "second wait should still block");
        signal.raise();
        waiter.join().unwrap();
    }

    #[test]
    fn wait_blocks_until_raised_from_another_thread() {
        let signal = Arc::new(WakeSignal::new());
        let waiter = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || signal.wait())
        };
        thread::sleep(Duration::from_millis(20));
        signal.raise();
        waiter.join().unwrap();
    }
}
