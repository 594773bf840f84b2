//! Career Metro - metro-map layouts for career progression data
//!
//! This library turns career paths, positions and position details into a
//! deterministic metro-map layout: each path is a line radiating from the
//! center, each position detail a station placed by seniority level, and
//! positions shared between paths become interchanges.
//!
//! # Example
//!
//! ```rust
//! use career_metro::layout_json;
//!
//! let json = layout_json(r##"{
//!     "career_paths": [{"id": "eng", "name": "Engineering", "color": "#1f77b4"}],
//!     "positions": [{"id": "jr", "name": "Junior"}, {"id": "sr", "name": "Senior"}],
//!     "position_details": [
//!         {"id": "e1", "position_id": "jr", "career_path_id": "eng", "level": 1},
//!         {"id": "e2", "position_id": "sr", "career_path_id": "eng", "level": 2}
//!     ]
//! }"##).unwrap();
//! assert!(json.contains("\"nodesById\""));
//! ```

pub mod error;
pub mod input;
pub mod layout;

pub use error::{Error, InputError};
pub use input::{CareerPath, LayoutInput, Position, PositionDetail, SkipReason, SkippedRecord};
pub use layout::{
    compute, strategy_by_name, ConfigError, LayoutConfig, LayoutData, LayoutEngine, LayoutError,
    LayoutNode, LayoutPath, LayoutTrace, LintWarning, Point, RoutingMode,
};

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use layout::{lint, route_layout, MetroEngine};

/// Configuration for a complete layout run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// Registry name of the layout strategy
    pub strategy: String,
    /// Attach a stage trace to the output
    pub trace: bool,
    /// Attach routed line waypoints to the output
    pub routes: Option<RoutingMode>,
    /// Attach lint warnings to the output
    pub lint: bool,
    /// Pretty-print the JSON output
    pub pretty: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            strategy: MetroEngine::NAME.to_string(),
            trace: false,
            routes: None,
            lint: false,
            pretty: true,
        }
    }
}

impl RunConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Load the layout configuration from a TOML file
    pub fn with_layout_file(self, path: &Path) -> Result<Self, Error> {
        let config = LayoutConfig::from_file(path)?;
        Ok(self.with_layout(config))
    }

    /// Select the layout strategy by name
    pub fn with_strategy(mut self, name: impl Into<String>) -> Self {
        self.strategy = name.into();
        self
    }

    /// Enable or disable the stage trace
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Route every line with the given mode
    pub fn with_routes(mut self, mode: RoutingMode) -> Self {
        self.routes = Some(mode);
        self
    }

    /// Enable or disable lint checks
    pub fn with_lint(mut self, lint: bool) -> Self {
        self.lint = lint;
        self
    }

    /// Choose between pretty and compact JSON
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// A layout with the optional extras requested by a [`RunConfig`].
///
/// Serializes as the bare [`LayoutData`] object when no extras were
/// requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutput {
    #[serde(flatten)]
    pub layout: LayoutData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<LayoutTrace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<BTreeMap<String, Vec<Point>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lint: Option<Vec<LintWarning>>,
}

/// Lay out a parsed input document
pub fn run(input: &LayoutInput, config: &RunConfig) -> Result<RunOutput, Error> {
    let engine = strategy_by_name(&config.strategy)?;
    let outcome = engine.compute_traced(
        &input.career_paths,
        &input.positions,
        &input.position_details,
        &config.layout,
        config.trace,
    );
    let layout = outcome.layout;

    let routes = config
        .routes
        .map(|mode| route_layout(&layout, mode, &layout.config_used));
    let lint = config
        .lint
        .then(|| lint::check(&layout, &layout.config_used));

    Ok(RunOutput {
        layout,
        trace: outcome.trace,
        routes,
        lint,
    })
}

/// Lay out a JSON input document and serialize the result, with default
/// configuration
pub fn layout_json(source: &str) -> Result<String, Error> {
    layout_json_with_config(source, &RunConfig::default())
}

/// Lay out a JSON input document and serialize the result
///
/// # Example
///
/// ```rust
/// use career_metro::{layout_json_with_config, LayoutConfig, RunConfig};
///
/// let config = RunConfig::new()
///     .with_layout(LayoutConfig::default().with_min_separation(80.0))
///     .with_lint(true)
///     .with_pretty(false);
///
/// let json = layout_json_with_config(
///     r#"{"career_paths": [], "positions": [], "position_details": []}"#,
///     &config,
/// ).unwrap();
/// assert!(json.contains("\"lint\":[]"));
/// ```
pub fn layout_json_with_config(source: &str, config: &RunConfig) -> Result<String, Error> {
    let input = LayoutInput::from_json_str(source)?;
    let output = run(&input, config)?;
    let json = if config.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    Ok(json)
}
