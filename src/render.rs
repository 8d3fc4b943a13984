// src/render.rs

//! The render state machine: decides which pixels a pass must emit.
//!
//! Each pass derives one of three behaviors from the blanking booleans
//! `(on, previously_on)`:
//!
//! - entering blanking: full clear, every pixel emitted black, dirty bits
//!   neither consulted nor cleared (the stored image survives blanking);
//! - leaving blanking: full restore, every stored pixel emitted and its
//!   dirty bit cleared, resetting the diff baseline;
//! - steady state: dirty-only, each bit atomically tested-and-cleared and
//!   only previously-set pixels emitted.
//!
//! A pass always scans the complete coordinate space in row-major order.
//! Restore deliberately ignores dirty history so the terminal always ends
//! up reflecting the true stored buffer.

use crate::color::Rgb24;
use crate::encoder::TerminalEncoder;
use crate::error::DisplayError;
use crate::sink::ByteSink;
use crate::surface::PixelSurface;

use log::info;
use std::sync::atomic::{AtomicBool, Ordering};

/// The blanking booleans: `on` is the commanded state, `previously_on`
/// the state as of the last completed pass.
///
/// Starts as `on = true, previously_on = false` so the first pass clears
/// the terminal to black. Toggles between passes coalesce: only the
/// last-set value matters at wake time.
pub struct BlankingState {
    on: AtomicBool,
    previously_on: AtomicBool,
}

impl BlankingState {
    pub fn new() -> Self {
        BlankingState {
            on: AtomicBool::new(true),
            previously_on: AtomicBool::new(false),
        }
    }

    /// Sets the commanded blanking state. Producer side.
    pub fn set_on(&self, on: bool) {
        self.on.store(on, Ordering::Release);
    }

    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::Acquire)
    }

    pub fn previously_on(&self) -> bool {
        self.previously_on.load(Ordering::Acquire)
    }

    /// Reads both booleans at the start of a pass.
    fn snapshot(&self) -> (bool, bool) {
        (self.is_on(), self.previously_on())
    }

    /// Advances `previously_on` to the observed commanded state. Called
    /// only after a pass completes.
    fn commit(&self, on: bool) {
        self.previously_on.store(on, Ordering::Release);
    }
}

impl Default for BlankingState {
    fn default() -> Self {
        Self::new()
    }
}

/// What one render pass does, derived from `(on, previously_on)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Blanking just turned on: paint everything black.
    Clear,
    /// Blanking just turned off: re-emit the stored buffer.
    Restore,
    /// Steady state: emit only dirty pixels.
    Incremental,
}

impl PassKind {
    pub fn derive(on: bool, previously_on: bool) -> Self {
        match (on, previously_on) {
            (true, false) => PassKind::Clear,
            (false, true) => PassKind::Restore,
            _ => PassKind::Incremental,
        }
    }
}

/// Executes exactly one render pass over the whole surface.
///
/// On success `previously_on` is advanced to the observed `on`. A sink
/// failure aborts the remainder of the pass *without* advancing, so the
/// next wake re-derives the same pass; dirty bits not yet visited remain
/// set and will be re-attempted.
pub fn run_pass<S: ByteSink>(
    surface: &PixelSurface,
    blanking: &BlankingState,
    encoder: &mut TerminalEncoder<S>,
) -> Result<(), DisplayError> {
    let (on, previously_on) = blanking.snapshot();

    match PassKind::derive(on, previously_on) {
        PassKind::Clear => {
            info!("blanking on: clearing display");
            for y in 0..surface.height() {
                for x in 0..surface.width() {
                    encoder.emit_pixel(x, y, Rgb24::BLACK)?;
                }
            }
        }
        PassKind::Restore => {
            info!("blanking off: restoring display");
            for y in 0..surface.height() {
                for x in 0..surface.width() {
                    encoder.emit_pixel(x, y, surface.read_pixel(x, y))?;
                    surface.clear_dirty(x, y);
                }
            }
        }
        PassKind::Incremental => {
            for y in 0..surface.height() {
                for x in 0..surface.width() {
                    if surface.test_and_clear_dirty(x, y) {
                        encoder.emit_pixel(x, y, surface.read_pixel(x, y))?;
                    }
                }
            }
        }
    }

    encoder.flush()?;
    blanking.commit(on);
    Ok(())
}

#[cfg(test)]
mod tests;
