//! Configuration for the layout engine
//!
//! A [`LayoutConfig`] is an immutable value threaded through every pipeline
//! stage. Engines call [`LayoutConfig::sanitized`] before use, so callers may
//! pass anything (including values read from a TOML file) without risking a
//! division by zero or NaN coordinates.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration options for layout computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Radius of the ring holding mid-hierarchy levels
    pub mid_level_radius: f64,

    /// Radial distance added per level away from the mid level
    pub radius_step: f64,

    /// No node is placed closer to the origin than this
    pub min_radius: f64,

    /// Number of permitted compass directions for segments and path angles
    pub num_directions: u32,

    /// Rotation applied to every path's base angle
    pub angle_offset_degrees: f64,

    /// How far interchange nodes move toward their multi-path average (0..=1)
    pub pull_interchanges: f64,

    /// Longest straight run (in segments) tolerated before a bend is inserted
    pub max_consecutive_aligned: u32,

    /// Space added around the node extrema when computing bounds
    pub padding: f64,

    /// Multiplier applied to `padding`
    pub global_scale: f64,

    /// Minimum distance between any two nodes
    pub min_separation: f64,

    /// Cap on separation relaxation passes
    pub max_iterations: u32,

    /// Factor applied to the radius of nodes sitting exactly on the mid level
    pub mid_level_pull: f64,

    /// Bearing deviation (degrees) below which a segment counts as on-grid
    pub snap_tolerance_degrees: f64,

    /// Seed for the coincidence tie-break; `None` uses a deterministic hash
    pub jitter_seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mid_level_radius: 300.0,
            radius_step: 120.0,
            min_radius: 80.0,
            num_directions: 8,
            angle_offset_degrees: 22.5,
            pull_interchanges: 0.3,
            max_consecutive_aligned: 3,
            padding: 100.0,
            global_scale: 1.0,
            min_separation: 60.0,
            max_iterations: 50,
            mid_level_pull: 0.7,
            snap_tolerance_degrees: 1.0,
            jitter_seed: None,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Angular width of one compass direction
    pub fn direction_step(&self) -> f64 {
        360.0 / f64::from(self.num_directions.max(1))
    }

    /// Padding actually applied around the bounds
    pub fn effective_padding(&self) -> f64 {
        self.padding * self.global_scale
    }

    /// Return a copy with every field clamped into its safe range.
    ///
    /// Non-finite floats fall back to their default value.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let finite = |v: f64, d: f64| if v.is_finite() { v } else { d };
        let non_negative = |v: f64, d: f64| finite(v, d).max(0.0);

        let global_scale = finite(self.global_scale, defaults.global_scale);
        Self {
            mid_level_radius: non_negative(self.mid_level_radius, defaults.mid_level_radius),
            radius_step: non_negative(self.radius_step, defaults.radius_step),
            min_radius: non_negative(self.min_radius, defaults.min_radius),
            num_directions: self.num_directions.max(1),
            angle_offset_degrees: finite(self.angle_offset_degrees, defaults.angle_offset_degrees),
            pull_interchanges: finite(self.pull_interchanges, defaults.pull_interchanges)
                .clamp(0.0, 1.0),
            max_consecutive_aligned: self.max_consecutive_aligned.max(1),
            padding: non_negative(self.padding, defaults.padding),
            global_scale: if global_scale > 0.0 {
                global_scale
            } else {
                defaults.global_scale
            },
            min_separation: non_negative(self.min_separation, defaults.min_separation),
            max_iterations: self.max_iterations.max(1),
            mid_level_pull: non_negative(self.mid_level_pull, defaults.mid_level_pull),
            snap_tolerance_degrees: non_negative(
                self.snap_tolerance_degrees,
                defaults.snap_tolerance_degrees,
            ),
            jitter_seed: self.jitter_seed,
        }
    }

    /// Set the mid-level ring radius
    pub fn with_mid_level_radius(mut self, radius: f64) -> Self {
        self.mid_level_radius = radius;
        self
    }

    /// Set the per-level radius step
    pub fn with_radius_step(mut self, step: f64) -> Self {
        self.radius_step = step;
        self
    }

    /// Set the minimum radius
    pub fn with_min_radius(mut self, radius: f64) -> Self {
        self.min_radius = radius;
        self
    }

    /// Set the number of compass directions
    pub fn with_num_directions(mut self, n: u32) -> Self {
        self.num_directions = n;
        self
    }

    pub fn with_angle_offset(mut self, degrees: f64) -> Self {
        self.angle_offset_degrees = degrees;
        self
    }

    /// Set the interchange pull strength
    pub fn with_pull_interchanges(mut self, pull: f64) -> Self {
        self.pull_interchanges = pull;
        self
    }

    pub fn with_max_consecutive_aligned(mut self, n: u32) -> Self {
        self.max_consecutive_aligned = n;
        self
    }

    /// Set the bounds padding
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_global_scale(mut self, scale: f64) -> Self {
        self.global_scale = scale;
        self
    }

    /// Set the minimum node separation
    pub fn with_min_separation(mut self, distance: f64) -> Self {
        self.min_separation = distance;
        self
    }

    pub fn with_max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_mid_level_pull(mut self, pull: f64) -> Self {
        self.mid_level_pull = pull;
        self
    }

    /// Use seeded randomness for the coincidence tie-break
    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.jitter_seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.num_directions, 8);
        assert_eq!(config.angle_offset_degrees, 22.5);
        assert_eq!(config.pull_interchanges, 0.3);
        assert_eq!(config.max_consecutive_aligned, 3);
        assert_eq!(config.direction_step(), 45.0);
        assert_eq!(config.jitter_seed, None);
    }

    #[test]
    fn test_default_offset_is_half_step() {
        let config = LayoutConfig::default();
        assert_eq!(config.angle_offset_degrees, config.direction_step() / 2.0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new()
            .with_mid_level_radius(0.0)
            .with_min_separation(25.0)
            .with_num_directions(4);

        assert_eq!(config.mid_level_radius, 0.0);
        assert_eq!(config.min_separation, 25.0);
        assert_eq!(config.direction_step(), 90.0);
    }

    #[test]
    fn test_sanitize_clamps_bad_values() {
        let config = LayoutConfig::new()
            .with_num_directions(0)
            .with_pull_interchanges(3.0)
            .with_radius_step(-10.0)
            .with_global_scale(0.0)
            .with_max_iterations(0)
            .with_padding(f64::NAN)
            .sanitized();

        assert_eq!(config.num_directions, 1);
        assert_eq!(config.direction_step(), 360.0);
        assert_eq!(config.pull_interchanges, 1.0);
        assert_eq!(config.radius_step, 0.0);
        assert_eq!(config.global_scale, 1.0);
        assert_eq!(config.max_iterations, 1);
        assert_eq!(config.padding, 100.0);
    }

    #[test]
    fn test_sanitize_keeps_valid_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.sanitized(), config);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = LayoutConfig::from_toml_str(
            r#"
            num_directions = 4
            pull_interchanges = 0.5
            jitter_seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.num_directions, 4);
        assert_eq!(config.pull_interchanges, 0.5);
        assert_eq!(config.jitter_seed, Some(42));
        assert_eq!(config.radius_step, 120.0);
    }

    #[test]
    fn test_from_toml_rejects_unknown_key() {
        let result = LayoutConfig::from_toml_str("num_direction = 4");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
