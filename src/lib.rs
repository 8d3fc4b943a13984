// src/lib.rs

//! `pixterm` renders an RGB24 pixel surface onto a character terminal.
//!
//! Pixel writes land in a double-buffered, dirty-tracked surface; a
//! background render worker translates changed pixels into a minimal
//! stream of cursor-positioning and background-color escape sequences
//! through a pluggable byte sink. Blanking clears the visible output to
//! black without discarding the stored image; unblanking restores it.
//!
//! ```no_run
//! use pixterm::{BlockDescriptor, DisplayConfig, StdoutSink, TerminalDisplay};
//!
//! # fn main() -> Result<(), pixterm::DisplayError> {
//! let display = TerminalDisplay::new(&DisplayConfig::new(40, 24), StdoutSink::new())?;
//! display.blanking_off();
//! // One red pixel at (3, 5), complete frame: schedules a render pass.
//! display.write_block(3, 5, &BlockDescriptor::complete(1, 1), &[255, 0, 0])?;
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod config;
pub mod display;
pub mod encoder;
pub mod error;
pub mod render;
pub mod sink;
pub mod surface;
mod worker;

pub use color::{quantize, Rgb24};
pub use config::DisplayConfig;
pub use display::{Capabilities, Orientation, PixelFormat, TerminalDisplay};
pub use encoder::TerminalEncoder;
pub use error::DisplayError;
pub use sink::{ByteSink, StdoutSink};
pub use surface::{BlockDescriptor, PixelSurface};
pub use worker::WakeSignal;
