//! Writes a noise heightmap using the `MAPGEN_*` configuration.
//!
//! Run with:
//! ```
//! MAPGEN_SEED=237 cargo run -p mapgen --bin generate [output.ppm]
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

    let sampling = &config.terrain.sampling;
    tracing::info!(
        "Generating {}x{} heightmap (seed {}, scale {}, z {})",
        sampling.width,
        sampling.height,
        config.terrain.seed,
        sampling.scale,
        sampling.z
    );

    generate_to_file(&config.terrain, &config.heightmap_path)
        .with_context(|| format!("failed to write {}", config.heightmap_path.display()))?;

    tracing::info!("Heightmap written to {}", config.heightmap_path.display());
    Ok(())
}
