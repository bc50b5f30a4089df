use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Heightmap format error: {0}")]
    Format(#[from] FormatError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failures while reading or assembling a heightmap image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Unsupported format tag: {0:?}")]
    UnsupportedTag(String),

    #[error("Truncated header: missing {0}")]
    TruncatedHeader(&'static str),

    #[error("Invalid {field} in header: {value:?}")]
    InvalidHeaderField { field: &'static str, value: String },

    #[error("Dimensions {width}x{height} exceed the {max} pixel limit")]
    DimensionsOutOfRange {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("Unsupported max channel value {0}, expected 255")]
    UnsupportedMaxValue(u32),

    #[error("Truncated pixel data: expected {expected} channel values, found {found}")]
    TruncatedBody { expected: usize, found: usize },

    #[error("Invalid channel value {0:?}")]
    InvalidSample(String),

    #[error("Pixel count {found} does not match {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        found: usize,
    },
}

/// Failures that leave a mesh without renderable geometry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Degenerate {width}x{depth} grid produces no triangles")]
    Degenerate { width: usize, depth: usize },

    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("Height grid of {width}x{depth} expects {expected} values, found {found}")]
    HeightCountMismatch {
        width: usize,
        depth: usize,
        expected: usize,
        found: usize,
    },

    #[error("Grid {width}x{depth} exceeds the {max} sample limit")]
    GridTooLarge {
        width: usize,
        depth: usize,
        max: usize,
    },
}
