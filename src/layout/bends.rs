//! Bend insertion for overlong straight runs
//!
//! A run is a maximal sequence of consecutive segments whose bearings stay
//! within the snap tolerance of the run's first bearing. Runs longer than
//! `max_consecutive_aligned` segments get one interior node pushed sideways.

use super::angles::shortest_arc;
use super::config::LayoutConfig;
use super::grid::ordered_paths;
use super::types::{LayoutNode, Point};

/// Base bend size as a fraction of `radius_step`
const BEND_FRACTION: f64 = 0.2;

/// Growth of the bend per segment of excess run length
const BEND_GROWTH_PER_EXCESS: f64 = 0.05;

const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// A straight run within one path, as positions in the path's node order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedRun {
    /// Position of the first node of the run
    pub start: usize,
    /// Number of segments in the run
    pub segments: usize,
}

impl AlignedRun {
    pub fn end(&self) -> usize {
        self.start + self.segments
    }
}

/// Find maximal aligned runs over an ordered list of points
pub fn find_aligned_runs(points: &[Point], tolerance: f64) -> Vec<AlignedRun> {
    let mut runs = Vec::new();
    let mut current: Option<(AlignedRun, f64)> = None;

    for i in 0..points.len().saturating_sub(1) {
        let (a, b) = (points[i], points[i + 1]);
        if a.distance(b) < MIN_SEGMENT_LENGTH {
            if let Some((run, _)) = current.take() {
                runs.push(run);
            }
            continue;
        }
        let bearing = a.bearing_to(b);
        current = match current {
            Some((mut run, first)) if shortest_arc(first, bearing).abs() <= tolerance => {
                run.segments += 1;
                Some((run, first))
            }
            previous => {
                if let Some((run, _)) = previous {
                    runs.push(run);
                }
                Some((AlignedRun { start: i, segments: 1 }, bearing))
            }
        };
    }
    if let Some((run, _)) = current {
        runs.push(run);
    }
    runs
}

/// Perpendicular offset applied to a run exceeding the threshold by `excess`
pub fn bend_offset(excess: usize, config: &LayoutConfig) -> f64 {
    config.radius_step * BEND_FRACTION * (1.0 + excess as f64 * BEND_GROWTH_PER_EXCESS)
}

/// Interior node of the run closest to its geometric midpoint; ties go to
/// the earliest node
fn midpoint_node(points: &[Point], run: AlignedRun) -> usize {
    let (a, b) = (points[run.start], points[run.end()]);
    let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    let mut best = run.start + 1;
    let mut best_dist = f64::INFINITY;
    for (i, p) in points.iter().enumerate().take(run.end()).skip(run.start + 1) {
        let d = p.distance(mid);
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

/// Break up every overlong run. Returns the number of bent nodes.
pub fn insert_bends(nodes: &mut [LayoutNode], config: &LayoutConfig) -> usize {
    let threshold = config.max_consecutive_aligned.max(1) as usize;
    let mut bent = 0;

    for members in ordered_paths(nodes) {
        let points: Vec<Point> = members.iter().map(|&i| nodes[i].point()).collect();
        for run in find_aligned_runs(&points, config.snap_tolerance_degrees) {
            if run.segments <= threshold {
                continue;
            }
            let (a, b) = (points[run.start], points[run.end()]);
            let length = a.distance(b);
            if length < MIN_SEGMENT_LENGTH {
                continue;
            }
            let travel = Point::new((b.x - a.x) / length, (b.y - a.y) / length);
            // travel rotated by -90 degrees
            let perpendicular = Point::new(travel.y, -travel.x);
            let offset = bend_offset(run.segments - threshold, config);

            let target = midpoint_node(&points, run);
            let p = points[target];
            nodes[members[target]].set_point(Point::new(
                p.x + perpendicular.x * offset,
                p.y + perpendicular.y * offset,
            ));
            bent += 1;
        }
    }

    bent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::DEFAULT_NODE_COLOR;

    fn line(n: usize, dx: f64, dy: f64) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64 * dx, i as f64 * dy)).collect()
    }

    fn path_nodes(points: &[Point]) -> Vec<LayoutNode> {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| LayoutNode {
                id: format!("n{i}"),
                position_id: format!("p{i}"),
                career_path_id: "eng".to_string(),
                level: i as u32 + 1,
                name: format!("n{i}"),
                x: p.x,
                y: p.y,
                color: DEFAULT_NODE_COLOR.to_string(),
                is_interchange: false,
                related_paths: None,
                sequence_in_path: None,
            })
            .collect()
    }

    #[test]
    fn test_runs_split_on_direction_change() {
        let mut points = line(4, 10.0, 0.0);
        points.push(Point::new(30.0, 10.0));
        points.push(Point::new(30.0, 20.0));
        let runs = find_aligned_runs(&points, 1.0);
        assert_eq!(
            runs,
            vec![
                AlignedRun { start: 0, segments: 3 },
                AlignedRun { start: 3, segments: 2 },
            ]
        );
    }

    #[test]
    fn test_zero_length_segment_breaks_run() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
        ];
        let runs = find_aligned_runs(&points, 1.0);
        assert_eq!(runs.len(), 2);
        assert!(runs.iter().all(|r| r.segments == 1));
    }

    #[test]
    fn test_bend_offset_grows_with_excess() {
        let config = LayoutConfig::default();
        assert!((bend_offset(1, &config) - 120.0 * 0.2 * 1.05).abs() < 1e-9);
        assert!(bend_offset(3, &config) > bend_offset(1, &config));
    }

    #[test]
    fn test_short_run_untouched() {
        let mut nodes = path_nodes(&line(4, 10.0, 0.0));
        assert_eq!(insert_bends(&mut nodes, &LayoutConfig::default()), 0);
    }

    #[test]
    fn test_long_run_bends_middle_node_clockwise() {
        // 5 segments eastward, threshold 3 -> excess 2
        let mut nodes = path_nodes(&line(6, 10.0, 0.0));
        let config = LayoutConfig::default();
        assert_eq!(insert_bends(&mut nodes, &config), 1);

        let expected = bend_offset(2, &config);
        let moved: Vec<&LayoutNode> = nodes.iter().filter(|n| n.y != 0.0).collect();
        assert_eq!(moved.len(), 1);
        // midpoint is x=25; n2 (x=20) and n3 (x=30) tie, earliest wins
        assert_eq!(moved[0].id, "n2");
        // east rotated by -90 degrees points to -y
        assert!((moved[0].y + expected).abs() < 1e-9);
    }

    #[test]
    fn test_bends_are_reproducible() {
        let config = LayoutConfig::default().with_max_consecutive_aligned(2);
        let mut a = path_nodes(&line(7, 5.0, 5.0));
        let mut b = a.clone();
        insert_bends(&mut a, &config);
        insert_bends(&mut b, &config);
        assert_eq!(a, b);
    }
}
