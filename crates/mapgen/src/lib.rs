//! Heightmap generation and inspection tools.
//!
//! Wraps the `terrain` core with file-level operations and the configuration
//! used by the `generate` and `inspect` binaries.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mapgen::prelude::*;
//!
//! let config = MapgenConfig::from_env()?;
//! generate_to_file(&config.terrain, &config.heightmap_path)?;
//! let (_mesh, summary) = inspect(&config.heightmap_path, &config.terrain)?;
//! println!("{} triangles", summary.triangle_count);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod pipeline;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{ConfigError, MapgenConfig};
    pub use crate::pipeline::{
        MeshSummary, PipelineError, generate, generate_to_file, inspect, write_summary,
    };
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
