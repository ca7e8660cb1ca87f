// Data-driven checker configuration.
//
// Every tunable of the harness lives in `CheckerConfig`, loaded from JSON at
// startup: host tick cadence, world size, the settle delay between the write
// phase and task registration, the board generator seed, and the fixture
// geometry that maps board cells and output slots to world coordinates.
//
// Fields missing from a JSON file fall back to `Default`, so a config file
// only needs to name what it changes.
//
// See also: `codec.rs`, which is the only consumer of `FixtureGeometry`, and
// `host.rs`, which reads the timing fields.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Offsets from a fixture's anchor to its input grid and output bank.
///
/// Input cell `(row, col)` has its MarkerA coordinate at
/// `anchor + input_origin + (0, -row * row_step, col * col_step)` and its
/// MarkerB coordinate `marker_b_offset` further along z. Output slot `i` is
/// at `anchor + output_origin + (0, 0, i * output_step)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureGeometry {
    pub input_origin: (i32, i32, i32),
    pub row_step: i32,
    pub col_step: i32,
    pub marker_b_offset: i32,
    pub output_origin: (i32, i32, i32),
    pub output_step: i32,
}

impl Default for FixtureGeometry {
    fn default() -> Self {
        Self {
            input_origin: (-1, 26, 6),
            row_step: 4,
            col_step: 4,
            marker_b_offset: 2,
            output_origin: (51, 26, 7),
            output_step: 4,
        }
    }
}

/// Top-level configuration. Loaded once, never mutated at runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Real-world milliseconds per tick when the world is not sprinting.
    pub tick_duration_ms: u64,
    /// World dimensions in cells (x, y, z).
    pub world_size: (u32, u32, u32),
    /// Seed for the world's identity stream.
    pub world_seed: u64,
    /// Delay between writing a board's inputs and registering its task.
    pub settle_delay_ms: u64,
    /// Seed for the board generator.
    pub generator_seed: u64,
    pub geometry: FixtureGeometry,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            tick_duration_ms: 50,
            world_size: (128, 64, 128),
            world_seed: 0,
            settle_delay_ms: 50,
            generator_seed: 0,
            geometry: FixtureGeometry::default(),
        }
    }
}

impl CheckerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.tick_duration_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrips() {
        let config = CheckerConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let restored = CheckerConfig::from_json(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = CheckerConfig::from_json(
            r#"{
                "settle_delay_ms": 5,
                "world_size": [64, 32, 48],
                "geometry": { "row_step": 3 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.settle_delay(), Duration::from_millis(5));
        assert_eq!(config.world_size, (64, 32, 48));
        assert_eq!(config.tick_duration_ms, 50);
        assert_eq!(config.geometry.row_step, 3);
        assert_eq!(config.geometry.output_origin, (51, 26, 7));
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(matches!(
            CheckerConfig::from_json("{ \"tick_duration_ms\": \"fast\" }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = CheckerConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert!(path.ends_with("here.json")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
