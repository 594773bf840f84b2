//! Placement of interchange stations
//!
//! A position referenced by two or more paths appears once per path. Each
//! occurrence is relocated to its own-path ideal blended toward the circular
//! mean of its ideals on every related path.

use std::collections::{BTreeMap, HashSet};

use super::angles::{circular_mean, normalize_degrees, shortest_arc};
use super::config::LayoutConfig;
use super::grid::enforce_outgoing;
use super::levels::LevelRange;
use super::placement::ideal_polar;
use super::types::{LayoutNode, Polar};

/// Mean of the per-path ideals: arithmetic radius, circular angle.
///
/// When the angles cancel out exactly the first ideal's angle is kept.
pub fn average_ideal(ideals: &[Polar]) -> Option<Polar> {
    let first = ideals.first()?;
    let radius = ideals.iter().map(|p| p.radius).sum::<f64>() / ideals.len() as f64;
    let angle = circular_mean(ideals.iter().map(|p| p.angle)).unwrap_or(first.angle);
    Some(Polar::new(radius, angle))
}

/// Move `own` toward `target` by `pull` (0 keeps `own`, 1 lands on `target`)
pub fn blend(own: Polar, target: Polar, pull: f64) -> Polar {
    let pull = pull.clamp(0.0, 1.0);
    let radius = own.radius + (target.radius - own.radius) * pull;
    let angle = own.angle + shortest_arc(own.angle, target.angle) * pull;
    Polar::new(radius, normalize_degrees(angle))
}

/// Blended placement of one interchange occurrence
pub fn interchange_polar(
    node: &LayoutNode,
    related: &[String],
    path_angles: &BTreeMap<String, f64>,
    levels: &LevelRange,
    config: &LayoutConfig,
) -> Option<Polar> {
    let own_angle = *path_angles.get(&node.career_path_id)?;
    let own = ideal_polar(node.level, own_angle, levels, config);
    let ideals: Vec<Polar> = related
        .iter()
        .filter_map(|id| path_angles.get(id))
        .map(|&angle| ideal_polar(node.level, angle, levels, config))
        .collect();
    let target = average_ideal(&ideals)?;
    Some(blend(own, target, config.pull_interchanges))
}

/// Relocate every interchange node, then re-snap the segments leaving them.
///
/// Returns the number of relocated nodes.
pub fn resolve_interchanges(
    nodes: &mut [LayoutNode],
    path_angles: &BTreeMap<String, f64>,
    levels: &LevelRange,
    config: &LayoutConfig,
) -> usize {
    let mut anchors = HashSet::new();

    for (i, node) in nodes.iter_mut().enumerate() {
        if !node.is_interchange {
            continue;
        }
        let Some(related) = node.related_paths.as_deref() else {
            continue;
        };
        if let Some(polar) = interchange_polar(node, related, path_angles, levels, config) {
            node.set_point(polar.to_point());
            anchors.insert(i);
        }
    }

    if !anchors.is_empty() {
        let resnapped = enforce_outgoing(nodes, config, &anchors);
        tracing::debug!(resnapped, "re-snapped segments leaving interchanges");
    }
    anchors.len()
}
