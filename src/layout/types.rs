//! Core types for the layout engine

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::config::LayoutConfig;

/// Fallback color for nodes whose career path carries no color
pub const DEFAULT_NODE_COLOR: &str = "#888888";

/// Half-width of the bounds box returned when there is nothing to lay out
pub const EMPTY_BOUNDS_HALF_EXTENT: f64 = 500.0;

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from the origin along `angle_deg`
    pub fn from_polar(radius: f64, angle_deg: f64) -> Self {
        let theta = angle_deg.to_radians();
        Self::new(radius * theta.cos(), radius * theta.sin())
    }

    /// Distance from the origin
    pub fn radius(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Bearing in degrees from `self` towards `other`, normalized to [0, 360)
    pub fn bearing_to(&self, other: Point) -> f64 {
        let deg = (other.y - self.y).atan2(other.x - self.x).to_degrees();
        super::angles::normalize_degrees(deg)
    }
}

/// Polar coordinate with the angle in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    pub radius: f64,
    pub angle: f64,
}

impl Polar {
    pub fn new(radius: f64, angle: f64) -> Self {
        Self { radius, angle }
    }

    pub fn to_point(self) -> Point {
        Point::from_polar(self.radius, self.angle)
    }
}

/// A positioned station on the map, one per position detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub id: String,
    pub position_id: String,
    pub career_path_id: String,
    pub level: u32,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub is_interchange: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_paths: Option<Vec<String>>,
    #[serde(
        rename = "sequence_in_path",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sequence_in_path: Option<u32>,
}

impl LayoutNode {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_point(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }
}

/// A metro line: one career path with its stations in travel order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPath {
    pub id: String,
    pub name: String,
    pub color: String,
    pub nodes: Vec<String>,
}

/// Axis-aligned extent of the layout, padding included
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl LayoutBounds {
    /// Fixed box centered on the origin used when there are no nodes
    pub fn empty_fallback() -> Self {
        Self {
            min_x: -EMPTY_BOUNDS_HALF_EXTENT,
            max_x: EMPTY_BOUNDS_HALF_EXTENT,
            min_y: -EMPTY_BOUNDS_HALF_EXTENT,
            max_y: EMPTY_BOUNDS_HALF_EXTENT,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
    }
}

impl Default for LayoutBounds {
    fn default() -> Self {
        Self::empty_fallback()
    }
}

/// The complete, immutable result of a layout run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutData {
    pub nodes: Vec<LayoutNode>,
    /// Node id -> index into `nodes`
    pub nodes_by_id: BTreeMap<String, usize>,
    pub paths: Vec<LayoutPath>,
    /// Path id -> index into `paths`
    pub paths_by_id: BTreeMap<String, usize>,
    pub bounds: LayoutBounds,
    pub config_used: LayoutConfig,
}

impl LayoutData {
    /// The degenerate layout returned for empty input
    pub fn empty(config: LayoutConfig) -> Self {
        Self {
            nodes: Vec::new(),
            nodes_by_id: BTreeMap::new(),
            paths: Vec::new(),
            paths_by_id: BTreeMap::new(),
            bounds: LayoutBounds::empty_fallback(),
            config_used: config,
        }
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes_by_id.get(id).and_then(|&i| self.nodes.get(i))
    }

    pub fn path(&self, id: &str) -> Option<&LayoutPath> {
        self.paths_by_id.get(id).and_then(|&i| self.paths.get(i))
    }

    /// Nodes of a path in travel order
    pub fn path_nodes<'a>(&'a self, path: &'a LayoutPath) -> impl Iterator<Item = &'a LayoutNode> {
        path.nodes.iter().filter_map(move |id| self.node(id))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_polar_axes() {
        let p = Point::from_polar(10.0, 90.0);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_is_normalized() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, -5.0);
        assert!((a.bearing_to(b) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_bounds_are_centered() {
        let b = LayoutBounds::empty_fallback();
        assert_eq!(b.min_x, -b.max_x);
        assert_eq!(b.min_y, -b.max_y);
        assert!(b.is_finite());
        assert!(b.contains(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_node_serializes_camel_case() {
        let node = LayoutNode {
            id: "d1".to_string(),
            position_id: "p1".to_string(),
            career_path_id: "eng".to_string(),
            level: 2,
            name: "Engineer".to_string(),
            x: 1.0,
            y: 2.0,
            color: DEFAULT_NODE_COLOR.to_string(),
            is_interchange: false,
            related_paths: None,
            sequence_in_path: Some(1),
        };
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"positionId\":\"p1\""));
        assert!(json.contains("\"isInterchange\":false"));
        assert!(json.contains("\"sequence_in_path\":1"));
        assert!(!json.contains("relatedPaths"));
    }
}
