//! Height ⇄ pixel conversion.
//!
//! A pixel stores a 24-bit integer `p = r << 16 | g << 8 | b`. Encoding maps a
//! normalized height in [0, 1] to `round(h * 2^24)` (capped at `2^24 - 1`); decoding
//! maps `p` back to `(p - 2^23) / 2^23 * amplitude`, a height in `[-amplitude, amplitude)`.

use crate::errors::TerrainError;

/// One 8-bit-per-channel RGB pixel.
pub type Rgb = [u8; 3];

/// Number of representable packed values.
const PACKED_RANGE: u32 = 1 << 24;

const HALF_RANGE: f64 = (PACKED_RANGE / 2) as f64;

/// Converts between pixels and terrain heights for one maximum amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightCodec {
    amplitude: f64,
}

impl HeightCodec {
    pub fn new(amplitude: f32) -> Result<Self, TerrainError> {
        if !amplitude.is_finite() || amplitude <= 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "amplitude must be finite and positive, got {amplitude}"
            )));
        }
        Ok(Self {
            amplitude: f64::from(amplitude),
        })
    }

    /// Quantizes a normalized height. Values outside [0, 1] are clamped; NaN encodes as 0.
    pub fn encode(normalized: f64) -> Rgb {
        let scaled = (normalized.clamp(0.0, 1.0) * f64::from(PACKED_RANGE)).round() as u32;
        unpack(scaled.min(PACKED_RANGE - 1))
    }

    /// Terrain height stored in `rgb`.
    pub fn decode(&self, rgb: Rgb) -> f64 {
        (f64::from(pack(rgb)) - HALF_RANGE) / HALF_RANGE * self.amplitude
    }

    /// Pixel for a terrain height, the inverse of [`HeightCodec::decode`].
    pub fn encode_height(&self, height: f64) -> Rgb {
        Self::encode((height / self.amplitude + 1.0) / 2.0)
    }
}

fn pack([r, g, b]: Rgb) -> u32 {
    u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b)
}

fn unpack(packed: u32) -> Rgb {
    [(packed >> 16) as u8, (packed >> 8) as u8, packed as u8]
}
