//! File-level generation and inspection.

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use terrain::config::TerrainConfig;
use terrain::mesh::{Mesh, build_from_heightmap};
use terrain::{HeightCodec, Heightmap, NoiseField, Ppm, TerrainError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error("Summary serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What `inspect` reports about a built mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshSummary {
    pub seed: u32,
    pub width: usize,
    pub depth: usize,
    pub vertex_count: usize,
    pub index_count: usize,
    pub triangle_count: usize,
    pub min_height: f32,
    pub max_height: f32,
    pub amplitude: f32,
    /// Full extent along x and z.
    pub footprint: [f32; 2],
    pub vertex_buffer_bytes: usize,
    pub index_buffer_bytes: usize,
}

impl MeshSummary {
    pub fn from_mesh(mesh: &Mesh, config: &TerrainConfig) -> Self {
        let (width, depth) = mesh.dimensions();
        let (min_height, max_height) = mesh.height_range().unwrap_or((0.0, 0.0));
        Self {
            seed: config.seed,
            width,
            depth,
            vertex_count: mesh.vertices.len(),
            index_count: mesh.indices.len(),
            triangle_count: mesh.triangle_count(),
            min_height,
            max_height,
            amplitude: config.amplitude,
            footprint: [2.0 * config.mesh.half_width, 2.0 * config.mesh.half_depth],
            vertex_buffer_bytes: mesh.vertex_bytes().len(),
            index_buffer_bytes: mesh.index_bytes().len(),
        }
    }
}

/// Samples the configured noise field into a heightmap.
pub fn generate(config: &TerrainConfig) -> Result<Heightmap, TerrainError> {
    config.validate()?;
    let field = NoiseField::new(config.seed);
    Ok(Heightmap::from_noise(&field, &config.sampling)?)
}

/// Generates a heightmap and writes it to `path` as binary PPM.
pub fn generate_to_file(
    config: &TerrainConfig,
    path: impl AsRef<Path>,
) -> Result<Heightmap, TerrainError> {
    let path = path.as_ref();
    let image = generate(config)?;
    Ppm::write_file(path, &image)?;
    tracing::info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        seed = config.seed,
        "wrote heightmap"
    );
    Ok(image)
}

/// Loads the heightmap at `path` and builds its mesh.
pub fn inspect(
    path: impl AsRef<Path>,
    config: &TerrainConfig,
) -> Result<(Mesh, MeshSummary), TerrainError> {
    let path = path.as_ref();
    config.validate()?;
    let image = Ppm::load_file(path)?;
    let codec = HeightCodec::new(config.amplitude)?;
    let mesh = build_from_heightmap(&image, &codec, &config.mesh)?;
    let summary = MeshSummary::from_mesh(&mesh, config);
    tracing::debug!(path = %path.display(), ?summary, "inspected heightmap");
    Ok((mesh, summary))
}

/// Writes `summary` to `path` as pretty-printed JSON.
pub fn write_summary(path: impl AsRef<Path>, summary: &MeshSummary) -> Result<(), PipelineError> {
    let file = std::fs::File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.flush()?;
    Ok(())
}
