// src/sink.rs

//! The byte sink boundary: where encoded escape sequences leave the crate.
//!
//! The render pipeline only assumes an ordered, eventually-delivered byte
//! stream. `StdoutSink` is the production implementation; `Vec<u8>` gets an
//! impl so tests and embedders can capture output directly.

use std::io::{self, Write};

/// An ordered byte stream toward the terminal.
///
/// No partial-write contract is assumed beyond "all bytes eventually
/// delivered in order". A failed write aborts the current render pass;
/// nothing is retried at this layer.
pub trait ByteSink: Send {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Flushes buffered bytes. Called once at the end of a render pass.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Whether the transport is usable. Checked once at driver
    /// initialization; a not-ready sink is fatal to startup.
    fn is_ready(&self) -> bool {
        true
    }
}

impl ByteSink for Vec<u8> {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Byte sink writing to the process's standard output, buffered.
pub struct StdoutSink {
    out: io::BufWriter<io::Stdout>,
}

impl StdoutSink {
    pub fn new() -> Self {
        StdoutSink {
            out: io::BufWriter::new(io::stdout()),
        }
    }

    /// Size of the controlling terminal in character cells, via
    /// `TIOCGWINSZ` on stdout.
    pub fn terminal_size_cells() -> io::Result<(u16, u16)> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        // SAFETY: ioctl with TIOCGWINSZ writes a winsize struct.
        let ret = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
        if ret == -1 {
            return Err(io::Error::last_os_error());
        }
        if ws.ws_col == 0 || ws.ws_row == 0 {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "terminal reported zero size",
            ));
        }
        Ok((ws.ws_col, ws.ws_row))
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSink for StdoutSink {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn is_ready(&self) -> bool {
        // SAFETY: isatty is a simple fd query.
        unsafe { libc::isatty(libc::STDOUT_FILENO) == 1 }
    }
}
