//! Waypoint routing along metro lines
//!
//! Turns the ordered stations of a line into a polyline that only uses
//! permitted compass directions, inserting an elbow where two stations are
//! not aligned and a perpendicular jog where a line would run straight for
//! too long. Routing is presentational: node coordinates are never touched.

use std::collections::BTreeMap;

use super::angles::{deviation_from_grid, direction_index};
use super::config::LayoutConfig;
use super::types::{LayoutData, Point};

/// Jog size as a fraction of `radius_step`
const JOG_FRACTION: f64 = 0.1;

/// Consecutive same-direction segments allowed before a jog is forced
const MAX_SAME_DIRECTION: usize = 2;

/// Points closer than this are merged
const MERGE_EPSILON: f64 = 1e-9;

/// Routing mode for a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingMode {
    /// Straight segments between stations, no elbows or jogs
    Direct,
    /// Compass-constrained segments with elbows and jogs
    #[default]
    Metro,
}

/// Elbow between two unaligned points: horizontal first when the x delta
/// dominates, vertical first otherwise
pub fn elbow(from: Point, to: Point) -> Point {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    if dx >= dy {
        Point::new(to.x, from.y)
    } else {
        Point::new(from.x, to.y)
    }
}

fn is_aligned(from: Point, to: Point, config: &LayoutConfig) -> bool {
    deviation_from_grid(from.bearing_to(to), config.direction_step()) <= config.snap_tolerance_degrees
}

/// Tracks the direction of the last emitted segments
struct RouteBuilder<'a> {
    config: &'a LayoutConfig,
    points: Vec<Point>,
    last_direction: Option<u32>,
    run: usize,
}

impl<'a> RouteBuilder<'a> {
    fn new(start: Point, config: &'a LayoutConfig) -> Self {
        Self {
            config,
            points: vec![start],
            last_direction: None,
            run: 0,
        }
    }

    fn current(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    fn push_raw(&mut self, to: Point) {
        let from = self.current();
        if from.distance(to) < MERGE_EPSILON {
            return;
        }
        let direction = direction_index(from.bearing_to(to), self.config.direction_step());
        if self.last_direction == Some(direction) {
            self.run += 1;
        } else {
            self.last_direction = Some(direction);
            self.run = 1;
        }
        self.points.push(to);
    }

    /// Emit an aligned segment, breaking it with a jog when it would extend
    /// an overlong same-direction run
    fn push_aligned(&mut self, to: Point) {
        let from = self.current();
        let length = from.distance(to);
        if length < MERGE_EPSILON {
            return;
        }
        let direction = direction_index(from.bearing_to(to), self.config.direction_step());
        let jog = self.config.radius_step * JOG_FRACTION;
        let extends_run = self.last_direction == Some(direction) && self.run >= MAX_SAME_DIRECTION;

        if !extends_run || jog <= 0.0 {
            self.push_raw(to);
            return;
        }

        let travel = Point::new((to.x - from.x) / length, (to.y - from.y) / length);
        let perpendicular = Point::new(travel.y, -travel.x);
        let mid = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
        let shift = |p: Point| Point::new(p.x + perpendicular.x * jog, p.y + perpendicular.y * jog);

        self.push_raw(mid);
        self.push_raw(shift(mid));
        self.push_raw(shift(to));
        self.push_raw(to);
    }

    fn finish(self) -> Vec<Point> {
        self.points
    }
}

/// Route an ordered list of stations into waypoints
pub fn route_stations(stations: &[Point], mode: RoutingMode, config: &LayoutConfig) -> Vec<Point> {
    let Some(&start) = stations.first() else {
        return Vec::new();
    };

    if mode == RoutingMode::Direct {
        let mut points = vec![start];
        for &p in &stations[1..] {
            if points[points.len() - 1].distance(p) >= MERGE_EPSILON {
                points.push(p);
            }
        }
        return points;
    }

    let mut builder = RouteBuilder::new(start, config);
    for &to in &stations[1..] {
        let from = builder.current();
        if is_aligned(from, to, config) {
            builder.push_aligned(to);
        } else {
            let corner = elbow(from, to);
            builder.push_aligned(corner);
            builder.push_aligned(to);
        }
    }
    builder.finish()
}

/// Route every line of a layout, keyed by path id
pub fn route_layout(
    layout: &LayoutData,
    mode: RoutingMode,
    config: &LayoutConfig,
) -> BTreeMap<String, Vec<Point>> {
    layout
        .paths
        .iter()
        .map(|path| {
            let stations: Vec<Point> = layout.path_nodes(path).map(|n| n.point()).collect();
            (path.id.clone(), route_stations(&stations, mode, config))
        })
        .collect()
}
