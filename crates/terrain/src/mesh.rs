//! Grid mesh construction.
//!
//! Turns a height source into a triangle list: one vertex per grid cell, normals from a
//! central finite difference, and two triangles per grid quad.

use bytemuck::Zeroable;
use glam::Vec3;
use rayon::prelude::*;

use crate::config::{MeshConfig, NoiseSampling};
use crate::errors::{GeometryError, TerrainError};
use crate::heightmap::{HeightCodec, Heightmap};
use crate::noise::NoiseField;
use crate::sources::{HeightGrid, HeightSource, NoiseHeights, check_grid};

/// Vertex record handed to the renderer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Triangulated terrain grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
    width: usize,
    depth: usize,
}

impl Mesh {
    /// Grid size the mesh was built from, as `(width, depth)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.depth)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Lowest and highest vertex elevation.
    pub fn height_range(&self) -> Option<(f32, f32)> {
        self.vertices.iter().fold(None, |acc, v| {
            let y = v.position[1];
            match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            }
        })
    }

    /// Vertex buffer contents for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer contents for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Fails when there is nothing to draw or an index points past the vertex buffer.
    pub fn ensure_renderable(&self) -> Result<(), GeometryError> {
        if self.indices.is_empty() {
            return Err(GeometryError::Degenerate {
                width: self.width,
                depth: self.depth,
            });
        }
        let vertex_count = self.vertices.len();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        Ok(())
    }
}

/// Builds terrain meshes from height sources.
pub struct TerrainMesh;

impl TerrainMesh {
    /// Builds the mesh for `source` laid out according to `config`.
    ///
    /// A grid narrower than 2 cells in either direction yields an empty mesh. A grid wider
    /// than [`MAX_DIMENSION`](crate::config::MAX_DIMENSION) along either axis is rejected.
    pub fn build<S: HeightSource + ?Sized>(
        source: &S,
        config: &MeshConfig,
    ) -> Result<Mesh, GeometryError> {
        let (width, depth) = source.dimensions();
        check_grid(width, depth)?;
        if width < 2 || depth < 2 {
            tracing::debug!(width, depth, "degenerate grid, returning empty mesh");
            return Ok(Mesh {
                width,
                depth,
                ..Default::default()
            });
        }

        let heights = source.materialize()?;
        let vertices = build_vertices(&heights, config);
        let indices = build_indices(width, depth);

        tracing::debug!(
            width,
            depth,
            vertices = vertices.len(),
            indices = indices.len(),
            "built terrain mesh"
        );

        Ok(Mesh {
            vertices,
            indices,
            width,
            depth,
        })
    }

    /// Surface normal at `(x, z)` with out-of-grid neighbours treated as height 0.
    pub fn normal_at(heights: &HeightGrid, x: usize, z: usize, slope_scale: f32) -> Vec3 {
        let (x, z) = (x as isize, z as isize);
        Vec3::new(
            heights.get(x - 1, z) - heights.get(x + 1, z),
            2.0 * slope_scale,
            heights.get(x, z - 1) - heights.get(x, z + 1),
        )
        .normalize_or_zero()
    }
}

/// Decodes `image` with `codec` and builds its mesh.
///
/// Unlike [`TerrainMesh::build`], a grid with no triangles is reported as an error.
pub fn build_from_heightmap(
    image: &Heightmap,
    codec: &HeightCodec,
    config: &MeshConfig,
) -> Result<Mesh, TerrainError> {
    let heights = image.decode_heights(codec);
    let mesh = TerrainMesh::build(&heights, config)?;
    mesh.ensure_renderable()?;
    Ok(mesh)
}

/// Builds a mesh by sampling `field` directly, one sample per vertex.
pub fn build_from_noise(
    field: &NoiseField,
    sampling: &NoiseSampling,
    amplitude: f32,
    config: &MeshConfig,
) -> Result<Mesh, GeometryError> {
    TerrainMesh::build(&NoiseHeights::new(field, *sampling, amplitude), config)
}

/// Grid spacing along x and z. Requires at least 2 cells per axis.
fn grid_step(heights: &HeightGrid, config: &MeshConfig) -> (f32, f32) {
    let (width, depth) = heights.dimensions();
    (
        2.0 * config.half_width / (width - 1) as f32,
        2.0 * config.half_depth / (depth - 1) as f32,
    )
}

fn vertex_at(
    heights: &HeightGrid,
    config: &MeshConfig,
    (step_x, step_z): (f32, f32),
    x: usize,
    z: usize,
) -> TerrainVertex {
    let px = -config.half_width + x as f32 * step_x;
    let pz = -config.half_depth + z as f32 * step_z;
    let py = heights.get(x as isize, z as isize);
    TerrainVertex {
        position: [px, py, pz],
        normal: TerrainMesh::normal_at(heights, x, z, config.slope_scale).to_array(),
    }
}

fn build_vertices(heights: &HeightGrid, config: &MeshConfig) -> Vec<TerrainVertex> {
    let (width, depth) = heights.dimensions();
    let step = grid_step(heights, config);

    let mut vertices = vec![TerrainVertex::zeroed(); width * depth];
    vertices
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(z, row)| {
            for (x, vertex) in row.iter_mut().enumerate() {
                *vertex = vertex_at(heights, config, step, x, z);
            }
        });
    vertices
}

fn build_indices(width: usize, depth: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(6 * (width - 1) * (depth - 1));
    for z in 0..depth - 1 {
        for x in 0..width - 1 {
            let top_left = (z * width + x) as u32;
            let top_right = top_left + 1;
            let bottom_left = ((z + 1) * width + x) as u32;
            let bottom_right = bottom_left + 1;

            indices.extend_from_slice(&[
                top_left,
                bottom_left,
                top_right,
                top_right,
                bottom_left,
                bottom_right,
            ]);
        }
    }
    indices
}
