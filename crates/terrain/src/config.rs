//! Construction parameters for terrain generation.

use serde::{Deserialize, Serialize};

use crate::errors::TerrainError;

/// Largest accepted width or height of a heightmap or sampling grid.
pub const MAX_DIMENSION: usize = 16_384;

/// World-space layout of the mesh grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// The grid spans `[-half_width, half_width]` along x.
    pub half_width: f32,
    /// The grid spans `[-half_depth, half_depth]` along z.
    pub half_depth: f32,
    /// Steepness constant in the normal estimate; larger values flatten the normals.
    pub slope_scale: f32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            half_width: 400.0,
            half_depth: 400.0,
            slope_scale: 1.0,
        }
    }
}

impl MeshConfig {
    pub fn with_footprint(mut self, width: f32, depth: f32) -> Self {
        self.half_width = width / 2.0;
        self.half_depth = depth / 2.0;
        self
    }

    pub fn with_slope_scale(mut self, slope_scale: f32) -> Self {
        self.slope_scale = slope_scale;
        self
    }
}

/// How a noise field is sampled onto a regular grid.
///
/// The value at column `i`, row `j` is `sample(scale * i / width, scale * j / height, z)`,
/// normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSampling {
    pub width: usize,
    pub height: usize,
    /// Noise-space extent covered by the whole grid.
    pub scale: f64,
    /// Fixed third coordinate of every sample.
    pub z: f64,
    /// When set, keeps only the fractional part of `k * noise`, producing contour bands.
    pub fractional_scale: Option<f64>,
}

impl Default for NoiseSampling {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            scale: 10.0,
            z: 0.8,
            fractional_scale: None,
        }
    }
}

impl NoiseSampling {
    /// Creates a sampling of `width` x `height` with default scale and slice.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    pub fn with_fractional_scale(mut self, k: f64) -> Self {
        self.fractional_scale = Some(k);
        self
    }

    /// Noise-space coordinates of grid cell `(i, j)`.
    pub fn coordinates(&self, i: usize, j: usize) -> (f64, f64, f64) {
        (
            self.scale * i as f64 / self.width as f64,
            self.scale * j as f64 / self.height as f64,
            self.z,
        )
    }

    /// Maps a raw noise value to [0, 1].
    pub fn normalize(&self, value: f64) -> f64 {
        match self.fractional_scale {
            Some(k) => {
                let scaled = k * value;
                scaled - scaled.floor()
            }
            None => ((value + 1.0) / 2.0).clamp(0.0, 1.0),
        }
    }
}

/// Full set of construction parameters for one terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub seed: u32,
    /// Maximum terrain amplitude; decoded heights lie in `[-amplitude, amplitude)`.
    pub amplitude: f32,
    pub mesh: MeshConfig,
    pub sampling: NoiseSampling,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 237,
            amplitude: 40.0,
            mesh: MeshConfig::default(),
            sampling: NoiseSampling::default(),
        }
    }
}

impl TerrainConfig {
    /// Rejects parameters that would produce non-finite or unbounded output.
    pub fn validate(&self) -> Result<(), TerrainError> {
        check_positive("amplitude", f64::from(self.amplitude))?;
        check_positive("mesh.half_width", f64::from(self.mesh.half_width))?;
        check_positive("mesh.half_depth", f64::from(self.mesh.half_depth))?;
        check_positive("mesh.slope_scale", f64::from(self.mesh.slope_scale))?;
        check_positive("sampling.scale", self.sampling.scale)?;

        if !self.sampling.z.is_finite() {
            return Err(TerrainError::InvalidConfig(format!(
                "sampling.z must be finite, got {}",
                self.sampling.z
            )));
        }
        if let Some(k) = self.sampling.fractional_scale {
            check_positive("sampling.fractional_scale", k)?;
        }
        if self.sampling.width > MAX_DIMENSION || self.sampling.height > MAX_DIMENSION {
            return Err(TerrainError::InvalidConfig(format!(
                "sampling grid {}x{} exceeds {MAX_DIMENSION}",
                self.sampling.width, self.sampling.height
            )));
        }
        Ok(())
    }
}

fn check_positive(name: &str, value: f64) -> Result<(), TerrainError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TerrainError::InvalidConfig(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}
