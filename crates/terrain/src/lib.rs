//! Procedural terrain core.
//!
//! This crate turns a seed into renderable terrain geometry:
//! - [`NoiseField`]: seeded 3D gradient noise
//! - [`Heightmap`] / [`HeightCodec`] / [`Ppm`]: height rasters and their file format
//! - [`TerrainMesh`]: grid mesh construction with per-vertex normals
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use terrain::prelude::*;
//!
//! let config = TerrainConfig::default();
//! let field = NoiseField::new(config.seed);
//! let image = Heightmap::from_noise(&field, &config.sampling)?;
//! Ppm::write_file("terrain.ppm", &image)?;
//!
//! let loaded = Ppm::load_file("terrain.ppm")?;
//! let codec = HeightCodec::new(config.amplitude)?;
//! let mesh = build_from_heightmap(&loaded, &codec, &config.mesh)?;
//! assert_eq!(mesh.vertices.len(), 256 * 256);
//! # Ok::<(), terrain::TerrainError>(())
//! ```

pub mod config;
pub mod errors;
pub mod heightmap;
pub mod mesh;
pub mod noise;
pub mod sources;

pub use errors::{FormatError, GeometryError, TerrainError};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{MAX_DIMENSION, MeshConfig, NoiseSampling, TerrainConfig};
    pub use crate::errors::{FormatError, GeometryError, TerrainError};
    pub use crate::heightmap::{HeightCodec, Heightmap, Ppm, Rgb};
    pub use crate::mesh::{Mesh, TerrainMesh, TerrainVertex, build_from_heightmap, build_from_noise};
    pub use crate::noise::NoiseField;
    pub use crate::sources::{HeightGrid, HeightSource, NoiseHeights};
}

pub use prelude::{HeightCodec, Heightmap, NoiseField, Ppm, TerrainMesh};
