//! Height sources for mesh construction.
//!
//! A mesh can be built from:
//! - [`HeightGrid`]: heights decoded from a heightmap (or any precomputed grid)
//! - [`NoiseHeights`]: heights sampled directly from a [`NoiseField`]

use std::borrow::Cow;

use rayon::prelude::*;

use crate::config::{MAX_DIMENSION, NoiseSampling};
use crate::errors::GeometryError;
use crate::noise::NoiseField;

/// Anything that can report an elevation for each cell of a regular grid.
pub trait HeightSource: Sync {
    /// Grid size as `(width, depth)`: columns along x, rows along z.
    fn dimensions(&self) -> (usize, usize);

    /// Elevation at column `x`, row `z`. Only called with in-range coordinates.
    fn height_at(&self, x: usize, z: usize) -> f32;

    /// Evaluates every cell into a [`HeightGrid`].
    ///
    /// Fails before allocating when either dimension exceeds [`MAX_DIMENSION`].
    fn materialize(&self) -> Result<Cow<'_, HeightGrid>, GeometryError> {
        let (width, depth) = self.dimensions();
        check_grid(width, depth)?;
        let mut values = vec![0.0f32; width * depth];
        if width > 0 {
            values
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(z, row)| {
                    for (x, value) in row.iter_mut().enumerate() {
                        *value = self.height_at(x, z);
                    }
                });
        }
        Ok(Cow::Owned(HeightGrid::from_parts(width, depth, values)))
    }
}

/// Rejects grids larger than [`MAX_DIMENSION`] along either axis.
pub(crate) fn check_grid(width: usize, depth: usize) -> Result<(), GeometryError> {
    if width > MAX_DIMENSION || depth > MAX_DIMENSION {
        return Err(GeometryError::GridTooLarge {
            width,
            depth,
            max: MAX_DIMENSION,
        });
    }
    Ok(())
}

/// Row-major elevations with a zero boundary outside the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    width: usize,
    depth: usize,
    values: Vec<f32>,
}

impl HeightGrid {
    pub fn new(width: usize, depth: usize, values: Vec<f32>) -> Result<Self, GeometryError> {
        check_grid(width, depth)?;
        if values.len() != width * depth {
            return Err(GeometryError::HeightCountMismatch {
                width,
                depth,
                expected: width * depth,
                found: values.len(),
            });
        }
        Ok(Self::from_parts(width, depth, values))
    }

    /// Caller guarantees `values.len() == width * depth`.
    pub(crate) fn from_parts(width: usize, depth: usize, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), width * depth);
        Self {
            width,
            depth,
            values,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.depth)
    }

    /// Elevation at `(x, z)`, or 0 when the point lies outside the grid.
    pub fn get(&self, x: isize, z: isize) -> f32 {
        if x < 0 || z < 0 || x as usize >= self.width || z as usize >= self.depth {
            return 0.0;
        }
        self.values[z as usize * self.width + x as usize]
    }
}

impl HeightSource for HeightGrid {
    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.depth)
    }

    fn height_at(&self, x: usize, z: usize) -> f32 {
        self.values[z * self.width + x]
    }

    fn materialize(&self) -> Result<Cow<'_, HeightGrid>, GeometryError> {
        Ok(Cow::Borrowed(self))
    }
}

/// Heights sampled straight from a noise field, without a raster in between.
///
/// Elevation is `(2 * normalized - 1) * amplitude`, which is what the heightmap path
/// produces before quantization.
#[derive(Debug, Clone)]
pub struct NoiseHeights<'a> {
    field: &'a NoiseField,
    sampling: NoiseSampling,
    amplitude: f32,
}

impl<'a> NoiseHeights<'a> {
    pub fn new(field: &'a NoiseField, sampling: NoiseSampling, amplitude: f32) -> Self {
        Self {
            field,
            sampling,
            amplitude,
        }
    }
}

impl HeightSource for NoiseHeights<'_> {
    fn dimensions(&self) -> (usize, usize) {
        (self.sampling.width, self.sampling.height)
    }

    fn height_at(&self, x: usize, z: usize) -> f32 {
        let (nx, ny, nz) = self.sampling.coordinates(x, z);
        let normalized = self.sampling.normalize(self.field.sample(nx, ny, nz));
        ((2.0 * normalized - 1.0) * f64::from(self.amplitude)) as f32
    }
}
