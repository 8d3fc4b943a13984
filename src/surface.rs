// src/surface.rs

//! The pixel surface: a fixed-size RGB24 buffer with a parallel per-pixel
//! dirty bitmap.
//!
//! The surface is written by the producer (block writes) and read by the
//! render worker, concurrently. Two rules make that safe without a lock:
//!
//! - Each pixel is stored as a packed `AtomicU32`, so its three channels
//!   are always published as a unit. The dirty bit is set (release) only
//!   after the new value is stored, and the worker reads the value
//!   (acquire) only after observing the bit.
//! - The dirty bitmap supports atomic test-and-clear per bit, so a
//!   producer set and a worker clear never lose an update.

use crate::color::Rgb24;
use crate::error::DisplayError;

use log::{debug, warn};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

const WORD_BITS: usize = usize::BITS as usize;

/// Geometry of one block write, patterned after a display buffer
/// descriptor: the source data is `width * height` row-major RGB24 pixels.
///
/// `frame_incomplete` signals a partial frame: the caller intends further
/// writes before the image is coherent, so the driver should not schedule
/// a render pass yet.
#[derive(Debug, Clone, Copy)]
pub struct BlockDescriptor {
    pub width: u16,
    pub height: u16,
    pub frame_incomplete: bool,
}

impl BlockDescriptor {
    /// Descriptor for a complete-frame block of the given geometry.
    pub fn complete(width: u16, height: u16) -> Self {
        BlockDescriptor {
            width,
            height,
            frame_incomplete: false,
        }
    }

    /// Bytes of source data the geometry requires (3 per pixel).
    pub fn required_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// One dirty flag per pixel, packed into atomic words.
struct DirtyBitmap {
    words: Vec<AtomicUsize>,
}

impl DirtyBitmap {
    fn new(bits: usize) -> Self {
        let words = (0..bits.div_ceil(WORD_BITS))
            .map(|_| AtomicUsize::new(0))
            .collect();
        DirtyBitmap { words }
    }

    fn set(&self, bit: usize) {
        let mask = 1usize << (bit % WORD_BITS);
        self.words[bit / WORD_BITS].fetch_or(mask, Ordering::Release);
    }

    fn clear(&self, bit: usize) {
        let mask = 1usize << (bit % WORD_BITS);
        self.words[bit / WORD_BITS].fetch_and(!mask, Ordering::Release);
    }

    fn test_and_clear(&self, bit: usize) -> bool {
        let mask = 1usize << (bit % WORD_BITS);
        self.words[bit / WORD_BITS].fetch_and(!mask, Ordering::AcqRel) & mask != 0
    }
}

fn pack(color: Rgb24) -> u32 {
    (color.r as u32) << 16 | (color.g as u32) << 8 | color.b as u32
}

fn unpack(value: u32) -> Rgb24 {
    Rgb24::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

/// A rectangular RGB24 pixel buffer with per-pixel dirty tracking.
///
/// Dimensions are fixed at construction. The dirty invariant: a pixel's
/// bit is set iff its stored value may differ from the value last emitted
/// to the terminal.
pub struct PixelSurface {
    width: u16,
    height: u16,
    pixels: Vec<AtomicU32>,
    dirty: DirtyBitmap,
}

impl PixelSurface {
    /// Creates a surface of the given dimensions, all pixels black and all
    /// dirty bits clear.
    pub fn new(width: u16, height: u16) -> Self {
        let count = width as usize * height as usize;
        let pixels = (0..count).map(|_| AtomicU32::new(0)).collect();
        PixelSurface {
            width,
            height,
            pixels,
            dirty: DirtyBitmap::new(count),
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Row-major linear index. Callers are internal and pre-validated, so
    /// out-of-range coordinates are a programming error.
    fn index(&self, x: u16, y: u16) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel coordinates out of range: ({}, {}) on {}x{}",
            x,
            y,
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    /// Reads the stored value of one pixel.
    pub fn read_pixel(&self, x: u16, y: u16) -> Rgb24 {
        unpack(self.pixels[self.index(x, y)].load(Ordering::Acquire))
    }

    /// Atomically reads and clears one dirty bit, returning the prior
    /// value. Used by the render worker during a dirty-only pass.
    pub fn test_and_clear_dirty(&self, x: u16, y: u16) -> bool {
        self.dirty.test_and_clear(self.index(x, y))
    }

    /// Clears one dirty bit without reading it. Used by the render worker
    /// during a restore pass, where dirty state is irrelevant but the diff
    /// baseline must be reset.
    pub fn clear_dirty(&self, x: u16, y: u16) {
        self.dirty.clear(self.index(x, y));
    }

    /// Copies a rectangular block of RGB24 pixels into the surface at
    /// `(x, y)`, marking changed pixels dirty.
    ///
    /// `data` is row-major, 3 bytes per pixel, `desc.width * desc.height`
    /// pixels. Supplying fewer bytes than the geometry requires fails with
    /// `SizeMismatch` before any pixel is touched. Destination coordinates
    /// beyond the surface edge are skipped with a warning; the in-bounds
    /// remainder still lands and the call succeeds.
    ///
    /// A pixel whose new value equals its stored value is left untouched,
    /// dirty bit included, so unchanged pixels are never re-emitted.
    pub fn write_block(
        &self,
        x: u16,
        y: u16,
        desc: &BlockDescriptor,
        data: &[u8],
    ) -> Result<(), DisplayError> {
        let required = desc.required_bytes();
        if data.len() < required {
            debug!(
                "rejecting block write at ({}, {}): {} bytes for {}x{}",
                x, y, data.len(), desc.width, desc.height
            );
            return Err(DisplayError::SizeMismatch {
                provided: data.len(),
                required,
            });
        }

        let mut source = data.chunks_exact(3);
        for sy in 0..desc.height {
            for sx in 0..desc.width {
                // The size check above guarantees a chunk per pixel.
                let Some(chunk) = source.next() else { break };
                let color = Rgb24::new(chunk[0], chunk[1], chunk[2]);

                let dx = x as u32 + sx as u32;
                let dy = y as u32 + sy as u32;
                if dx >= self.width as u32 || dy >= self.height as u32 {
                    warn!("out of bounds pixel coordinates: x={}, y={}", dx, dy);
                    continue;
                }

                let idx = dy as usize * self.width as usize + dx as usize;
                let packed = pack(color);
                if self.pixels[idx].load(Ordering::Relaxed) != packed {
                    // Value first, then the bit: the worker must never
                    // observe the bit before the full RGB value.
                    self.pixels[idx].store(packed, Ordering::Release);
                    self.dirty.set(idx);
                }
            }
        }

        Ok(())
    }
}
