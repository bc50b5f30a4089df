//! Loads a heightmap, builds its mesh and reports the result.
//!
//! Run with:
//! ```
//! MAPGEN_SUMMARY=summary.json cargo run -p mapgen --bin inspect [input.ppm]
//! ```

use anyhow::Context;
use mapgen::prelude::*;

fn main() -> anyhow::Result<()> {
    mapgen::init_logging();

    run().inspect_err(|e| tracing::error!("{e:#}"))
}

fn run() -> anyhow::Result<()> {
    let mut config = MapgenConfig::from_env().context("failed to load configuration")?;
    if let Some(path) = std::env::args_os().nth(1) {
        config.heightmap_path = path.into();
    }

    let (_mesh, summary) = inspect(&config.heightmap_path, &config.terrain)
        .with_context(|| format!("failed to inspect {}", config.heightmap_path.display()))?;

    tracing::info!("Mesh built!");
    tracing::info!("  Grid: {}x{}", summary.width, summary.depth);
    tracing::info!("  Vertices: {}", summary.vertex_count);
    tracing::info!("  Triangles: {}", summary.triangle_count);
    tracing::info!(
        "  Heights: {:.3} .. {:.3}",
        summary.min_height,
        summary.max_height
    );

    if let Some(path) = &config.summary_path {
        write_summary(path, &summary)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        tracing::info!("Summary written to {}", path.display());
    }

    Ok(())
}
