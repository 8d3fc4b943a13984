// src/display.rs

//! The producer-facing driver: the display API a host framework calls.
//!
//! `TerminalDisplay` owns the pixel surface and blanking state, spawns one
//! render worker per instance, and translates producer calls into shared
//! state mutations plus wake signals. Producer calls never block on
//! rendering; they return as soon as the shared state is updated.

use crate::config::DisplayConfig;
use crate::encoder::TerminalEncoder;
use crate::error::DisplayError;
use crate::sink::ByteSink;
use crate::surface::BlockDescriptor;
use crate::worker::{self, DisplayShared};

use log::{debug, info};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Pixel memory layouts a host framework may ask for. This device only
/// ever honors `Rgb888`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb888,
    Bgr888,
    Rgb565,
    Argb8888,
    Mono,
}

/// Display orientations a host framework may ask for. Only `Normal` is
/// honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Normal,
    Rotated90,
    Rotated180,
    Rotated270,
}

/// Fixed capabilities of a driver instance, set at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub width: u16,
    pub height: u16,
    pub pixel_format: PixelFormat,
    pub orientation: Orientation,
}

/// A terminal-backed raster display.
///
/// Construction validates the sink, spawns the render worker, and raises
/// the wake signal once so the first pass blanks the terminal (blanking
/// starts commanded on).
pub struct TerminalDisplay {
    capabilities: Capabilities,
    shared: Arc<DisplayShared>,
    worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for TerminalDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalDisplay")
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl TerminalDisplay {
    pub fn new<S: ByteSink + 'static>(
        config: &DisplayConfig,
        sink: S,
    ) -> Result<Self, DisplayError> {
        if config.width == 0 || config.height == 0 {
            return Err(DisplayError::InvalidArgument(
                "display dimensions must be non-zero",
            ));
        }
        if !sink.is_ready() {
            return Err(DisplayError::NotReady("byte sink is not ready"));
        }

        let shared = Arc::new(DisplayShared::new(config.width, config.height));
        let worker = worker::spawn(Arc::clone(&shared), TerminalEncoder::new(sink))
            .map_err(|_| DisplayError::NotReady("failed to spawn render worker"))?;

        // Let the worker build up the blank screen to start.
        shared.signal.raise();

        info!(
            "terminal display initialized: {}x{} pixels",
            config.width, config.height
        );
        Ok(TerminalDisplay {
            capabilities: Capabilities {
                width: config.width,
                height: config.height,
                pixel_format: PixelFormat::Rgb888,
                orientation: Orientation::Normal,
            },
            shared,
            worker: Some(worker),
        })
    }

    /// The fixed capabilities of this instance.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Accepts only the format the device already runs in.
    pub fn set_pixel_format(&self, format: PixelFormat) -> Result<(), DisplayError> {
        if format != PixelFormat::Rgb888 {
            return Err(DisplayError::InvalidArgument("unsupported pixel format"));
        }
        Ok(())
    }

    /// Accepts only the normal orientation.
    pub fn set_orientation(&self, orientation: Orientation) -> Result<(), DisplayError> {
        if orientation != Orientation::Normal {
            return Err(DisplayError::InvalidArgument("unsupported orientation"));
        }
        Ok(())
    }

    /// Writes a rectangular pixel block at `(x, y)`.
    ///
    /// See [`crate::surface::PixelSurface::write_block`] for the per-pixel
    /// semantics. When the descriptor marks the frame complete, the render
    /// worker is signaled exactly once.
    pub fn write_block(
        &self,
        x: u16,
        y: u16,
        desc: &BlockDescriptor,
        data: &[u8],
    ) -> Result<(), DisplayError> {
        self.shared.surface.write_block(x, y, desc, data)?;

        if desc.frame_incomplete {
            debug!("partial frame");
        } else {
            debug!("complete frame");
            self.shared.signal.raise();
        }
        Ok(())
    }

    /// Commands blanking on and schedules a pass. The next pass clears the
    /// terminal to black; the stored image is kept.
    pub fn blanking_on(&self) {
        self.shared.blanking.set_on(true);
        self.shared.signal.raise();
    }

    /// Commands blanking off and schedules a pass. The next pass restores
    /// the stored image.
    pub fn blanking_off(&self) {
        self.shared.blanking.set_on(false);
        self.shared.signal.raise();
    }

    /// Readback is not supported: the terminal is write-only.
    pub fn read_block(
        &self,
        _x: u16,
        _y: u16,
        _desc: &BlockDescriptor,
        _data: &mut [u8],
    ) -> Result<(), DisplayError> {
        Err(DisplayError::InvalidArgument("readback is not supported"))
    }

    /// There is no addressable framebuffer.
    pub fn framebuffer(&self) -> Result<&[u8], DisplayError> {
        Err(DisplayError::InvalidArgument(
            "no addressable framebuffer is available",
        ))
    }

    /// Brightness control is not supported.
    pub fn set_brightness(&self, _brightness: u8) -> Result<(), DisplayError> {
        Err(DisplayError::InvalidArgument(
            "brightness control is not supported",
        ))
    }

    /// Contrast control is not supported.
    pub fn set_contrast(&self, _contrast: u8) -> Result<(), DisplayError> {
        Err(DisplayError::InvalidArgument(
            "contrast control is not supported",
        ))
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.signal.raise();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
