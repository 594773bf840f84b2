//! Layout engine for career metro maps
//!
//! This module takes career paths, positions and position details and
//! computes a metro-map layout: one station per detail, radiating from the
//! center by level along per-path compass directions, producing a
//! [`LayoutData`] with positioned nodes, ordered lines and bounds.

pub mod angles;
pub mod assembly;
pub mod bends;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod interchange;
pub mod jitter;
pub mod levels;
pub mod lint;
pub mod placement;
pub mod routing;
pub mod separation;
pub mod trace;
pub mod types;

pub use config::{ConfigError, LayoutConfig};
pub use engine::{compute, strategy_by_name, GridEngine, LayoutEngine, MetroEngine, STRATEGY_NAMES};
pub use error::LayoutError;
pub use jitter::{FixedDirection, HashedDirection, JitterSource, SeededJitter};
pub use levels::LevelRange;
pub use lint::{LintCategory, LintWarning};
pub use routing::{route_layout, route_stations, RoutingMode};
pub use separation::SeparationReport;
pub use trace::{LayoutOutcome, LayoutTrace, Stage, StageTrace};
pub use types::*;
