//! Compass-direction snapping of in-path segments
//!
//! Walks each path in sequence order and rotates the later endpoint of every
//! off-grid segment around the earlier one. Distances are preserved, so only
//! bearings change.

use std::collections::HashSet;

use super::angles::{deviation_from_grid, snap_to_step};
use super::assembly::{path_groups, sequence_order};
use super::config::LayoutConfig;
use super::types::{LayoutNode, Point};

/// Segments shorter than this have no meaningful bearing
const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// Where `to` must move so that `from -> to` follows a permitted bearing.
///
/// Returns `None` when the segment is already within `tolerance` degrees of
/// the grid or has zero length.
pub fn snap_segment(from: Point, to: Point, step: f64, tolerance: f64) -> Option<Point> {
    let length = from.distance(to);
    if length < MIN_SEGMENT_LENGTH {
        return None;
    }
    let bearing = from.bearing_to(to);
    if deviation_from_grid(bearing, step) <= tolerance {
        return None;
    }
    let snapped = snap_to_step(bearing, step).to_radians();
    Some(Point::new(
        from.x + length * snapped.cos(),
        from.y + length * snapped.sin(),
    ))
}

/// Node indices of every path, each sorted into sequence order
pub(crate) fn ordered_paths(nodes: &[LayoutNode]) -> Vec<Vec<usize>> {
    path_groups(nodes)
        .into_values()
        .map(|mut members| {
            members.sort_by(|&a, &b| sequence_order(&nodes[a], &nodes[b]));
            members
        })
        .collect()
}

/// Snap every consecutive segment of every path, left to right.
///
/// Nodes in `pinned` are never moved; a segment ending at a pinned node is
/// left as it is. Returns the number of rotated nodes.
pub fn enforce_grid_angles(
    nodes: &mut [LayoutNode],
    config: &LayoutConfig,
    pinned: &HashSet<usize>,
) -> usize {
    let step = config.direction_step();
    let mut moved = 0;

    for members in ordered_paths(nodes) {
        for pair in members.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if pinned.contains(&to) {
                continue;
            }
            if let Some(p) = snap_segment(
                nodes[from].point(),
                nodes[to].point(),
                step,
                config.snap_tolerance_degrees,
            ) {
                nodes[to].set_point(p);
                moved += 1;
            }
        }
    }

    moved
}

/// Re-snap only the segments leaving `anchors`, rotating each anchor's path
/// successor around it. Successors that are themselves anchors stay put.
pub fn enforce_outgoing(
    nodes: &mut [LayoutNode],
    config: &LayoutConfig,
    anchors: &HashSet<usize>,
) -> usize {
    let step = config.direction_step();
    let mut moved = 0;

    for members in ordered_paths(nodes) {
        for pair in members.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if !anchors.contains(&from) || anchors.contains(&to) {
                continue;
            }
            if let Some(p) = snap_segment(
                nodes[from].point(),
                nodes[to].point(),
                step,
                config.snap_tolerance_degrees,
            ) {
                nodes[to].set_point(p);
                moved += 1;
            }
        }
    }

    moved
}
