//! Pairwise relaxation enforcing the minimum node separation

use serde::Serialize;

use super::config::LayoutConfig;
use super::jitter::JitterSource;
use super::types::{LayoutNode, Point};

/// Pairs closer than `min_separation - SEPARATION_EPSILON` count as violations
pub const SEPARATION_EPSILON: f64 = 1e-6;

/// Distances below this are treated as exact coincidence
const COINCIDENCE_EPSILON: f64 = 1e-9;

/// Outcome of a separation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeparationReport {
    /// Relaxation passes executed
    pub iterations: u32,
    /// Pair adjustments across all passes
    pub adjustments: usize,
    /// False when violations remain after the iteration cap.
    ///
    /// Describes the node set as this stage left it. Interchange blending
    /// runs afterwards and may move nodes back inside `min_separation`; see
    /// [`LayoutTrace::final_violations`](super::trace::LayoutTrace::final_violations).
    pub converged: bool,
}

/// Push overlapping nodes apart until every pair is at least
/// `min_separation` apart or `max_iterations` passes have run.
///
/// Each violating pair moves symmetrically by half the overlap along the
/// connecting vector. Coincident pairs use `jitter` for the direction.
pub fn resolve_separation(
    nodes: &mut [LayoutNode],
    config: &LayoutConfig,
    jitter: &mut dyn JitterSource,
) -> SeparationReport {
    let min_sep = config.min_separation;
    let mut report = SeparationReport {
        iterations: 0,
        adjustments: 0,
        converged: true,
    };
    if nodes.len() < 2 || min_sep <= 0.0 {
        return report;
    }

    for _ in 0..config.max_iterations.max(1) {
        report.iterations += 1;
        let mut changed = false;

        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let (a, b) = (nodes[i].point(), nodes[j].point());
                let dist = a.distance(b);
                if dist >= min_sep - SEPARATION_EPSILON {
                    continue;
                }

                let dir = if dist < COINCIDENCE_EPSILON {
                    jitter.coincidence_direction(&nodes[i].id, &nodes[j].id)
                } else {
                    Point::new((a.x - b.x) / dist, (a.y - b.y) / dist)
                };
                let half = (min_sep - dist) / 2.0;
                nodes[i].set_point(Point::new(a.x + dir.x * half, a.y + dir.y * half));
                nodes[j].set_point(Point::new(b.x - dir.x * half, b.y - dir.y * half));
                report.adjustments += 1;
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    report.converged = count_violations(nodes, min_sep) == 0;
    report
}

/// Number of node pairs closer than `min_separation`
pub fn count_violations(nodes: &[LayoutNode], min_separation: f64) -> usize {
    let mut count = 0;
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if nodes[i].point().distance(nodes[j].point()) < min_separation - SEPARATION_EPSILON {
                count += 1;
            }
        }
    }
    count
}
