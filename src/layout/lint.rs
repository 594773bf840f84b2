//! Lint engine for detecting defects in a finished layout.
//!
//! Runs after assembly to check the map's mechanical properties: stations
//! crowding each other, off-grid segments, nodes escaping the bounds, and
//! interchange flags that disagree across one position.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use super::angles::deviation_from_grid;
use super::config::LayoutConfig;
use super::separation::SEPARATION_EPSILON;
use super::types::{LayoutData, LayoutNode};

/// A lint warning about a layout defect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LintCategory {
    Separation,
    Snapping,
    Bounds,
    Interchange,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Separation => write!(f, "separation"),
            LintCategory::Snapping => write!(f, "snapping"),
            LintCategory::Bounds => write!(f, "bounds"),
            LintCategory::Interchange => write!(f, "interchange"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

/// Run all lint checks on a completed layout.
pub fn check(layout: &LayoutData, config: &LayoutConfig) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_separation(layout, config, &mut warnings);
    check_snapping(layout, config, &mut warnings);
    check_bounds(layout, &mut warnings);
    check_interchanges(layout, &mut warnings);
    warnings
}

// ── Separation ────────────────────────────────────────────────────

fn check_separation(layout: &LayoutData, config: &LayoutConfig, warnings: &mut Vec<LintWarning>) {
    let nodes = &layout.nodes;
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            let dist = a.point().distance(b.point());
            if dist < config.min_separation - SEPARATION_EPSILON {
                warnings.push(LintWarning {
                    category: LintCategory::Separation,
                    message: format!(
                        "\"{}\" and \"{}\" are {:.1} apart (minimum {:.1})",
                        a.id, b.id, dist, config.min_separation
                    ),
                });
            }
        }
    }
}

// ── Snapping ──────────────────────────────────────────────────────

fn check_snapping(layout: &LayoutData, config: &LayoutConfig, warnings: &mut Vec<LintWarning>) {
    let step = config.direction_step();
    for path in &layout.paths {
        let stations: Vec<&LayoutNode> = layout.path_nodes(path).collect();
        for pair in stations.windows(2) {
            let (a, b) = (pair[0].point(), pair[1].point());
            if a.distance(b) < 1e-9 {
                continue;
            }
            let deviation = deviation_from_grid(a.bearing_to(b), step);
            if deviation > config.snap_tolerance_degrees {
                warnings.push(LintWarning {
                    category: LintCategory::Snapping,
                    message: format!(
                        "segment \"{}\" -> \"{}\" on line \"{}\" is {:.1}° off-grid",
                        pair[0].id, pair[1].id, path.id, deviation
                    ),
                });
            }
        }
    }
}

// ── Bounds ────────────────────────────────────────────────────────

fn check_bounds(layout: &LayoutData, warnings: &mut Vec<LintWarning>) {
    if !layout.bounds.is_finite() {
        warnings.push(LintWarning {
            category: LintCategory::Bounds,
            message: "bounds are not finite".to_string(),
        });
        return;
    }
    for node in &layout.nodes {
        if !layout.bounds.contains(node.point()) {
            warnings.push(LintWarning {
                category: LintCategory::Bounds,
                message: format!("\"{}\" at ({:.1}, {:.1}) lies outside the bounds", node.id, node.x, node.y),
            });
        }
    }
}

// ── Interchanges ──────────────────────────────────────────────────

fn check_interchanges(layout: &LayoutData, warnings: &mut Vec<LintWarning>) {
    let mut referencing: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for node in &layout.nodes {
        referencing
            .entry(node.position_id.as_str())
            .or_default()
            .insert(node.career_path_id.as_str());
    }

    for node in &layout.nodes {
        let expected = &referencing[node.position_id.as_str()];
        let should_be = expected.len() >= 2;
        if node.is_interchange != should_be {
            warnings.push(LintWarning {
                category: LintCategory::Interchange,
                message: format!(
                    "\"{}\" has isInterchange={} but position \"{}\" is on {} line(s)",
                    node.id,
                    node.is_interchange,
                    node.position_id,
                    expected.len()
                ),
            });
            continue;
        }
        if should_be {
            let listed: BTreeSet<&str> = node
                .related_paths
                .iter()
                .flatten()
                .map(String::as_str)
                .collect();
            if &listed != expected {
                warnings.push(LintWarning {
                    category: LintCategory::Interchange,
                    message: format!(
                        "\"{}\" lists related paths {:?}, expected {:?}",
                        node.id, listed, expected
                    ),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::CareerPath;
    use crate::layout::assembly::assemble;
    use crate::layout::types::DEFAULT_NODE_COLOR;

    fn node(id: &str, position: &str, path: &str, level: u32, x: f64, y: f64) -> LayoutNode {
        LayoutNode {
            id: id.to_string(),
            position_id: position.to_string(),
            career_path_id: path.to_string(),
            level,
            name: id.to_string(),
            x,
            y,
            color: DEFAULT_NODE_COLOR.to_string(),
            is_interchange: false,
            related_paths: None,
            sequence_in_path: None,
        }
    }

    fn layout_of(nodes: Vec<LayoutNode>) -> LayoutData {
        let paths = vec![CareerPath::new("eng", "Engineering"), CareerPath::new("des", "Design")];
        assemble(nodes, &paths, &LayoutConfig::default())
    }

    fn categories(warnings: &[LintWarning]) -> Vec<String> {
        warnings.iter().map(|w| w.category.to_string()).collect()
    }

    #[test]
    fn test_clean_layout_has_no_warnings() {
        let layout = layout_of(vec![
            node("a", "p1", "eng", 1, 0.0, 0.0),
            node("b", "p2", "eng", 2, 100.0, 0.0),
            node("c", "p3", "eng", 3, 200.0, 100.0),
        ]);
        let warnings = check(&layout, &LayoutConfig::default());
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn test_crowded_and_off_grid() {
        let layout = layout_of(vec![
            node("a", "p1", "eng", 1, 0.0, 0.0),
            node("b", "p2", "eng", 2, 20.0, 7.0),
        ]);
        let cats = categories(&check(&layout, &LayoutConfig::default()));
        assert!(cats.contains(&"separation".to_string()));
        assert!(cats.contains(&"snapping".to_string()));
    }

    #[test]
    fn test_missing_interchange_flag() {
        let layout = layout_of(vec![
            node("a", "lead", "eng", 1, 0.0, 0.0),
            node("b", "lead", "des", 1, 0.0, 300.0),
        ]);
        let warnings = check(&layout, &LayoutConfig::default());
        assert_eq!(
            warnings.iter().filter(|w| w.category == LintCategory::Interchange).count(),
            2
        );
    }

    #[test]
    fn test_node_outside_bounds() {
        let mut layout = layout_of(vec![node("a", "p1", "eng", 1, 0.0, 0.0)]);
        layout.nodes[0].x = 10_000.0;
        let cats = categories(&check(&layout, &LayoutConfig::default()));
        assert_eq!(cats, vec!["bounds".to_string()]);
    }
}
