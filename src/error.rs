// src/error.rs

//! Error taxonomy for the terminal display driver.
//!
//! Out-of-bounds destination pixels are intentionally absent: a block write
//! that spills past the surface edge skips the offending pixels (with a
//! warning) and still succeeds for the in-bounds remainder, so there is no
//! error value to surface.

use thiserror::Error;

/// Errors surfaced by the producer-facing driver API and the render path.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// An argument the device cannot honor: unsupported pixel format or
    /// orientation, or a call to an operation this device does not have
    /// (readback, framebuffer pointer, brightness, contrast).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The declared block geometry requires more pixel data than supplied.
    #[error("buffer too small: {provided} bytes provided, {required} required")]
    SizeMismatch { provided: usize, required: usize },

    /// A required collaborator was unavailable at initialization.
    #[error("not ready: {0}")]
    NotReady(&'static str),

    /// The byte sink rejected a write. The current render pass is aborted;
    /// the worker stays alive and re-attempts on the next wake.
    #[error("byte sink failure")]
    SinkFailure(#[from] std::io::Error),
}
