//! Configuration for the generation tools.
//!
//! Values are layered, later sources winning:
//! 1. built-in defaults
//! 2. a JSON file named by `MAPGEN_CONFIG`
//! 3. individual `MAPGEN_*` environment overrides

use std::path::{Path, PathBuf};
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use terrain::TerrainError;
use terrain::config::TerrainConfig;
use thiserror::Error;

pub const CONFIG_VAR: &str = "MAPGEN_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Invalid(#[from] TerrainError),
}

/// Settings shared by the `generate` and `inspect` binaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapgenConfig {
    pub terrain: TerrainConfig,

    /// Heightmap written by `generate` and read by `inspect`.
    pub heightmap_path: PathBuf,

    /// Where `inspect` writes its JSON mesh summary, if anywhere.
    pub summary_path: Option<PathBuf>,
}

impl Default for MapgenConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            heightmap_path: PathBuf::from("terrain.ppm"),
            summary_path: None,
        }
    }
}

impl MapgenConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration using `lookup` in place of the environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::load(lookup, &mut rand::thread_rng())
    }

    /// `rng` supplies the seed when `MAPGEN_SEED=random`.
    fn load(
        lookup: impl Fn(&str) -> Option<String>,
        rng: &mut impl Rng,
    ) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_VAR) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(&lookup, rng);
        config.terrain.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    fn apply_overrides(
        &mut self,
        lookup: &impl Fn(&str) -> Option<String>,
        rng: &mut impl Rng,
    ) {
        if let Some(raw) = lookup("MAPGEN_SEED") {
            if raw.trim().eq_ignore_ascii_case("random") {
                self.terrain.seed = rng.r#gen();
                tracing::info!("Using random seed {}", self.terrain.seed);
            } else if let Some(seed) = parse("MAPGEN_SEED", &raw) {
                self.terrain.seed = seed;
            }
        }
        if let Some(amplitude) = var(lookup, "MAPGEN_AMPLITUDE") {
            self.terrain.amplitude = amplitude;
        }
        if let Some(raw) = lookup("MAPGEN_SIZE") {
            match parse_size(&raw) {
                Some((width, height)) => {
                    self.terrain.sampling.width = width;
                    self.terrain.sampling.height = height;
                }
                None => tracing::warn!("Ignoring MAPGEN_SIZE={raw:?}: expected N or WxH"),
            }
        }
        if let Some(scale) = var(lookup, "MAPGEN_SCALE") {
            self.terrain.sampling.scale = scale;
        }
        if let Some(z) = var(lookup, "MAPGEN_Z") {
            self.terrain.sampling.z = z;
        }
        if let Some(bands) = var(lookup, "MAPGEN_BANDS") {
            self.terrain.sampling.fractional_scale = Some(bands);
        }
        if let Some(slope) = var(lookup, "MAPGEN_SLOPE_SCALE") {
            self.terrain.mesh.slope_scale = slope;
        }
        if let Some(path) = lookup("MAPGEN_HEIGHTMAP") {
            self.heightmap_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("MAPGEN_SUMMARY") {
            self.summary_path = Some(PathBuf::from(path));
        }
    }
}

/// Parsed value of `key`, or `None` when unset or unparseable.
fn var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|raw| parse(key, &raw))
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}

/// Parses `"N"` as a square grid or `"WxH"`.
fn parse_size(raw: &str) -> Option<(usize, usize)> {
    let raw = raw.trim();
    match raw.split_once(['x', 'X']) {
        Some((w, h)) => Some((w.trim().parse().ok()?, h.trim().parse().ok()?)),
        None => raw.parse().ok().map(|n| (n, n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = MapgenConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, MapgenConfig::default());
    }

    #[test]
    fn test_environment_overrides() {
        let config = MapgenConfig::from_lookup(lookup_from(&[
            ("MAPGEN_SEED", "42"),
            ("MAPGEN_AMPLITUDE", "12.5"),
            ("MAPGEN_SIZE", "64x32"),
            ("MAPGEN_SCALE", "4"),
            ("MAPGEN_BANDS", "20"),
            ("MAPGEN_HEIGHTMAP", "out/map.ppm"),
            ("MAPGEN_SUMMARY", "out/summary.json"),
        ]))
        .unwrap();

        assert_eq!(config.terrain.seed, 42);
        assert_eq!(config.terrain.amplitude, 12.5);
        assert_eq!(config.terrain.sampling.width, 64);
        assert_eq!(config.terrain.sampling.height, 32);
        assert_eq!(config.terrain.sampling.scale, 4.0);
        assert_eq!(config.terrain.sampling.fractional_scale, Some(20.0));
        assert_eq!(config.heightmap_path, PathBuf::from("out/map.ppm"));
        assert_eq!(config.summary_path, Some(PathBuf::from("out/summary.json")));
    }

    #[test]
    fn test_unparseable_override_is_ignored() {
        let config = MapgenConfig::from_lookup(lookup_from(&[
            ("MAPGEN_SEED", "not-a-number"),
            ("MAPGEN_SIZE", "big"),
        ]))
        .unwrap();
        assert_eq!(config.terrain.seed, 237);
        assert_eq!(config.terrain.sampling.width, 256);
    }

    #[test]
    fn test_random_seed_keyword() {
        use rand::{SeedableRng, rngs::StdRng};

        let expected: u32 = StdRng::seed_from_u64(3).r#gen();
        let lookup = lookup_from(&[("MAPGEN_SEED", " Random ")]);
        let config = MapgenConfig::load(lookup, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(config.terrain.seed, expected);

        let lookup = lookup_from(&[("MAPGEN_SEED", "random")]);
        let other = MapgenConfig::load(lookup, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_ne!(other.terrain.seed, config.terrain.seed);
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let lookup = lookup_from(&[("MAPGEN_AMPLITUDE", "-3")]);
        let err = MapgenConfig::from_lookup(lookup).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(TerrainError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_file_then_environment_precedence() {
        let path = std::env::temp_dir().join(format!("mapgen_config_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{ "terrain": { "seed": 7, "amplitude": 99.0 }, "heightmap_path": "from_file.ppm" }"#,
        )
        .unwrap();

        let path_str = path.to_string_lossy().into_owned();
        let config = MapgenConfig::from_lookup(lookup_from(&[
            (CONFIG_VAR, path_str.as_str()),
            ("MAPGEN_SEED", "8"),
        ]))
        .unwrap();

        assert_eq!(config.terrain.seed, 8);
        assert_eq!(config.terrain.amplitude, 99.0);
        assert_eq!(config.heightmap_path, PathBuf::from("from_file.ppm"));

        // Clean up
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_config_file() {
        let err = MapgenConfig::from_lookup(lookup_from(&[(
            CONFIG_VAR,
            "/nonexistent/mapgen/config.json",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("128"), Some((128, 128)));
        assert_eq!(parse_size(" 64 x 16 "), Some((64, 16)));
        assert_eq!(parse_size("8X4"), Some((8, 4)));
        assert_eq!(parse_size("8x"), None);
        assert_eq!(parse_size("wide"), None);
    }
}
