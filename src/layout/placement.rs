//! Initial radial placement and the origin guard
//!
//! Each node starts on its path's ray at a radius driven by how far its level
//! sits from the mid level. Nodes that end up inside `min_radius` are then
//! relocated onto the `min_radius` ring at an angle hashed from their id.

use std::collections::BTreeMap;

use crate::input::InputIndex;

use super::angles::normalize_degrees;
use super::config::LayoutConfig;
use super::levels::LevelRange;
use super::types::{LayoutNode, Point, Polar, DEFAULT_NODE_COLOR};

/// Multiplier used by the id hash in [`hash_angle`]
const ORIGIN_HASH_MULTIPLIER: u64 = 137;

/// Slack for nodes sitting on the `min_radius` ring after float round-off
const RADIUS_EPSILON: f64 = 1e-9;

/// Ideal polar placement for a node at `level` on a path with `path_angle`
pub fn ideal_polar(level: u32, path_angle: f64, levels: &LevelRange, config: &LayoutConfig) -> Polar {
    let spread = levels.offset_from_mid(level).abs() * config.radius_step;
    let mut radius = (config.mid_level_radius + spread).max(config.min_radius);
    if levels.is_mid(level) {
        radius *= config.mid_level_pull;
    }
    Polar::new(radius, normalize_degrees(path_angle))
}

/// Build one node per validated detail at its ideal position
pub fn place_initial(
    index: &InputIndex<'_>,
    path_angles: &BTreeMap<String, f64>,
    levels: &LevelRange,
    config: &LayoutConfig,
) -> Vec<LayoutNode> {
    index
        .details
        .iter()
        .map(|detail| {
            let path = index.paths[detail.career_path_id.as_str()];
            let position = index.positions[detail.position_id.as_str()];
            let angle = path_angles.get(&path.id).copied().unwrap_or(0.0);
            let point = ideal_polar(detail.level, angle, levels, config).to_point();

            let related = index.paths_for_position(&detail.position_id);
            let is_interchange = related.len() >= 2;

            LayoutNode {
                id: detail.id.clone(),
                position_id: detail.position_id.clone(),
                career_path_id: detail.career_path_id.clone(),
                level: detail.level,
                name: position.name.clone(),
                x: point.x,
                y: point.y,
                color: path
                    .color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_NODE_COLOR.to_string()),
                is_interchange,
                related_paths: is_interchange
                    .then(|| related.iter().map(|s| s.to_string()).collect()),
                sequence_in_path: detail.sequence_in_path,
            }
        })
        .collect()
}

/// Deterministic pseudo-angle for an id: `(Σ char codes × 137) mod 360`
pub fn hash_angle(id: &str) -> f64 {
    let sum: u64 = id.chars().map(|c| u64::from(u32::from(c))).sum();
    (sum.wrapping_mul(ORIGIN_HASH_MULTIPLIER) % 360) as f64
}

/// Move every node inside `min_radius` onto the `min_radius` ring.
///
/// Returns the number of relocated nodes.
pub fn guard_origin(nodes: &mut [LayoutNode], config: &LayoutConfig) -> usize {
    let mut moved = 0;
    for node in nodes.iter_mut() {
        if node.point().radius() < config.min_radius - RADIUS_EPSILON {
            node.set_point(Point::from_polar(config.min_radius, hash_angle(&node.id)));
            moved += 1;
        }
    }
    moved
}
