// src/encoder.rs

//! Turns (position, color) pairs into ANSI escape sequences.
//!
//! One pixel becomes three sequences pushed through the byte sink:
//! cursor positioning (`ESC[row;colH`), background color from the
//! 256-color palette followed by two painted spaces (`ESC[48;5;idxm  `),
//! and an attribute reset (`ESC[0m`). Terminal coordinates are 1-based,
//! and each logical pixel spans two character columns so the aspect ratio
//! comes out roughly square.

use crate::color::{quantize, Rgb24};
use crate::error::DisplayError;
use crate::sink::ByteSink;

use log::trace;
use std::io::Write;

const SGR_RESET: &[u8] = b"\x1b[0m";

/// Encodes per-pixel emissions and pushes them through a byte sink.
pub struct TerminalEncoder<S: ByteSink> {
    sink: S,
    // Scratch for one pixel's worth of sequences, reused across calls.
    scratch: Vec<u8>,
}

impl<S: ByteSink> TerminalEncoder<S> {
    pub fn new(sink: S) -> Self {
        TerminalEncoder {
            sink,
            scratch: Vec::with_capacity(32),
        }
    }

    /// Emits one pixel at surface coordinates `(x, y)` with the given
    /// color. Sink failures are propagated, not retried.
    pub fn emit_pixel(&mut self, x: u16, y: u16, color: Rgb24) -> Result<(), DisplayError> {
        let index = quantize(color);
        trace!("emit pixel ({}, {}) palette index {}", x, y, index);

        self.scratch.clear();
        // Writes into a Vec cannot fail; the ? satisfies io::Write's contract.
        write!(
            self.scratch,
            "\x1b[{};{}H\x1b[48;5;{}m  ",
            y as u32 + 1,
            x as u32 * 2 + 1,
            index
        )?;
        self.scratch.extend_from_slice(SGR_RESET);

        self.sink.write_all(&self.scratch)?;
        Ok(())
    }

    /// Flushes the sink at the end of a render pass.
    pub fn flush(&mut self) -> Result<(), DisplayError> {
        self.sink.flush()?;
        Ok(())
    }

    /// Consumes the encoder, returning the sink. Handy for capturing
    /// emitted bytes in tests and embedders.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
