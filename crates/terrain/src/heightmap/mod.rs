//! Heightmap images.
//!
//! This module provides:
//! - [`HeightCodec`]: conversion between terrain heights and RGB pixels
//! - [`Heightmap`]: an immutable row-major RGB raster
//! - [`Ppm`]: portable pixmap reading and writing

mod codec;
mod ppm;

pub use codec::{HeightCodec, Rgb};
pub use ppm::Ppm;

use rayon::prelude::*;

use crate::config::{MAX_DIMENSION, NoiseSampling};
use crate::errors::FormatError;
use crate::noise::NoiseField;
use crate::sources::HeightGrid;

/// A `width` x `height` grid of RGB pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heightmap {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Heightmap {
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self, FormatError> {
        check_dimensions(width, height)?;
        if pixels.len() != width * height {
            return Err(FormatError::DimensionMismatch {
                width,
                height,
                found: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Samples `field` over the grid described by `sampling` and encodes each value.
    pub fn from_noise(field: &NoiseField, sampling: &NoiseSampling) -> Result<Self, FormatError> {
        let (width, height) = (sampling.width, sampling.height);
        check_dimensions(width, height)?;
        let mut pixels = vec![[0u8; 3]; width * height];
        if width > 0 {
            pixels
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(j, row)| {
                    for (i, pixel) in row.iter_mut().enumerate() {
                        let (x, y, z) = sampling.coordinates(i, j);
                        *pixel = HeightCodec::encode(sampling.normalize(field.sample(x, y, z)));
                    }
                });
        }

        tracing::debug!(width, height, seed = field.seed(), "sampled heightmap from noise");

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Pixel at column `x`, row `z`.
    pub fn pixel(&self, x: usize, z: usize) -> Option<Rgb> {
        if x < self.width && z < self.height {
            Some(self.pixels[z * self.width + x])
        } else {
            None
        }
    }

    /// Decodes every pixel into a terrain height.
    pub fn decode_heights(&self, codec: &HeightCodec) -> HeightGrid {
        let values = self
            .pixels
            .par_iter()
            .map(|&rgb| codec.decode(rgb) as f32)
            .collect();
        HeightGrid::from_parts(self.width, self.height, values)
    }
}

pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<(), FormatError> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(FormatError::DimensionsOutOfRange {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }
    Ok(())
}
