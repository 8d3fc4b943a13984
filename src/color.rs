// src/color.rs

//! Defines the `Rgb24` color value type and the 256-color quantizer.
//!
//! Terminals that support the xterm 256-color palette expose a 6x6x6 RGB
//! cube at indices 16-231. The quantizer in this module maps an arbitrary
//! 24-bit color to the nearest cube entry under L1 (sum of absolute
//! per-channel differences) distance. The base 16 ANSI colors and the
//! grayscale ramp (232-255) are deliberately not targeted: sticking to the
//! cube keeps the mapping deterministic across terminal color schemes,
//! which commonly remap the low 16 entries.

use serde::{Deserialize, Serialize};

/// Offset of the 6x6x6 color cube within the 256-color palette.
const CUBE_OFFSET: u8 = 16;
/// Entries along each axis of the cube.
const CUBE_SIZE: u16 = 6;
/// Total entries in the cube (indices 0-215 before the offset is applied).
const CUBE_TOTAL: u16 = CUBE_SIZE * CUBE_SIZE * CUBE_SIZE;

/// A 24-bit RGB color: three independent 8-bit channels.
///
/// Equality is exact channel-wise comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb24 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb24 {
    pub const BLACK: Rgb24 = Rgb24 { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb24 = Rgb24 {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb24 { r, g, b }
    }

    /// Returns true when all three channels are equal.
    pub fn is_grayscale(self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

/// Representative channel intensity of a cube coordinate (0-5).
///
/// Coordinate 0 maps to intensity 0; coordinates 1-5 map to
/// 95, 135, 175, 215, 255 (the xterm cube ramp).
fn cube_intensity(coord: u16) -> i32 {
    if coord == 0 {
        0
    } else {
        (coord * 40 + 55) as i32
    }
}

/// Absolute difference between a target channel and a cube coordinate's
/// representative intensity.
fn channel_distance(target: u8, coord: u16) -> u32 {
    (target as i32 - cube_intensity(coord)).unsigned_abs()
}

/// Maps an RGB color to the nearest entry of the terminal's 6x6x6 color
/// cube, returned as a 256-color palette index in `16..=231`.
///
/// The scan is exhaustive over all 216 cube entries and keeps the first
/// entry with minimum total L1 error (ascending index order, so ties break
/// toward the lower index). Exhaustive search guarantees the true nearest
/// entry and only runs for pixels actually flushed to the terminal, so the
/// constant factor is acceptable.
pub fn quantize(color: Rgb24) -> u8 {
    let mut min_distance = u32::MAX;
    let mut best_index: u16 = 0;

    for i in 0..CUBE_TOTAL {
        let r_dist = channel_distance(color.r, i / 36);
        let g_dist = channel_distance(color.g, (i / 6) % 6);
        let b_dist = channel_distance(color.b, i % 6);

        let total = r_dist + g_dist + b_dist;
        if total < min_distance {
            min_distance = total;
            best_index = i;
        }
    }

    best_index as u8 + CUBE_OFFSET
}
