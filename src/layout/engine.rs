//! Layout strategies
//!
//! Every strategy implements [`LayoutEngine`]: a pure function from the three
//! input arrays and a config to a [`LayoutData`]. The canonical strategy is
//! [`MetroEngine`], a polar-grid pipeline:
//!
//! 1. **Placement**: level range, per-path base angles, ideal radius per node,
//!    origin guard
//! 2. **Constraints**: compass snapping, bend insertion, separation,
//!    interchange blending
//! 3. **Finalization**: per-path ordering, id indices, bounds
//!
//! No stage re-enters an earlier one. [`GridEngine`] is a simpler grid-cell
//! alternate sharing the validation, separation and assembly stages.

use std::collections::{BTreeMap, HashSet};

use crate::input::{CareerPath, InputIndex, LayoutInput, Position, PositionDetail};

use super::angles::assign_path_angles;
use super::assembly::assemble;
use super::bends::insert_bends;
use super::config::LayoutConfig;
use super::error::{find_similar, LayoutError};
use super::grid::enforce_grid_angles;
use super::interchange::resolve_interchanges;
use super::jitter::{self, JitterSource};
use super::levels::LevelRange;
use super::placement::{guard_origin, place_initial};
use super::separation::resolve_separation;
use super::trace::{LayoutOutcome, Stage, Tracer};
use super::types::{LayoutData, Point};

/// Names accepted by [`strategy_by_name`]
pub const STRATEGY_NAMES: [&str; 2] = [MetroEngine::NAME, GridEngine::NAME];

/// A layout strategy
pub trait LayoutEngine: Send + Sync {
    /// Registry name of the strategy
    fn name(&self) -> &'static str;

    /// Compute a layout, collecting a [`LayoutTrace`](super::trace::LayoutTrace)
    /// when `trace` is set
    fn compute_traced(
        &self,
        paths: &[CareerPath],
        positions: &[Position],
        details: &[PositionDetail],
        config: &LayoutConfig,
        trace: bool,
    ) -> LayoutOutcome;

    fn compute(
        &self,
        paths: &[CareerPath],
        positions: &[Position],
        details: &[PositionDetail],
        config: &LayoutConfig,
    ) -> LayoutData {
        self.compute_traced(paths, positions, details, config, false)
            .layout
    }

    fn compute_input(&self, input: &LayoutInput, config: &LayoutConfig) -> LayoutData {
        self.compute(
            &input.career_paths,
            &input.positions,
            &input.position_details,
            config,
        )
    }
}

/// Look up a strategy by name
pub fn strategy_by_name(name: &str) -> Result<Box<dyn LayoutEngine>, LayoutError> {
    match name {
        MetroEngine::NAME => Ok(Box::new(MetroEngine)),
        GridEngine::NAME => Ok(Box::new(GridEngine)),
        _ => Err(LayoutError::unknown_strategy(
            name,
            find_similar(STRATEGY_NAMES, name, 2),
        )),
    }
}

/// Lay out the input with the canonical metro strategy
pub fn compute(
    paths: &[CareerPath],
    positions: &[Position],
    details: &[PositionDetail],
    config: &LayoutConfig,
) -> LayoutData {
    MetroEngine.compute(paths, positions, details, config)
}

/// Shared front half of every strategy: sanitize, short-circuit on empty
/// input, validate references
fn prepare<'a>(
    paths: &'a [CareerPath],
    positions: &'a [Position],
    details: &'a [PositionDetail],
    config: &LayoutConfig,
    tracer: &mut Tracer,
) -> Result<(LayoutConfig, InputIndex<'a>), LayoutData> {
    let config = config.sanitized();
    if paths.is_empty() || positions.is_empty() || details.is_empty() {
        tracing::debug!(
            paths = paths.len(),
            positions = positions.len(),
            details = details.len(),
            "empty input, returning fallback layout"
        );
        return Err(LayoutData::empty(config));
    }

    let index = InputIndex::build(paths, positions, details);
    tracer.skipped(&index.skipped);
    Ok((config, index))
}

/// The canonical polar-grid metro map strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct MetroEngine;

impl MetroEngine {
    pub const NAME: &'static str = "metro";

    /// Run the pipeline with an explicit coincidence direction source
    pub fn compute_with_jitter(
        &self,
        paths: &[CareerPath],
        positions: &[Position],
        details: &[PositionDetail],
        config: &LayoutConfig,
        jitter: &mut dyn JitterSource,
        trace: bool,
    ) -> LayoutOutcome {
        let mut tracer = Tracer::new(trace, Self::NAME);
        let (config, index) = match prepare(paths, positions, details, config, &mut tracer) {
            Ok(prepared) => prepared,
            Err(empty) => return tracer.finish(empty),
        };

        // Placement
        let levels = LevelRange::analyze(index.details.iter().copied());
        let path_angles = assign_path_angles(paths, &config);
        let mut nodes = place_initial(&index, &path_angles, &levels, &config);
        tracer.record(Stage::InitialPlacement, nodes.len());
        let guarded = guard_origin(&mut nodes, &config);
        tracer.record(Stage::OriginGuard, guarded);

        // Constraints
        let snapped = enforce_grid_angles(&mut nodes, &config, &HashSet::new());
        tracer.record(Stage::GridAngles, snapped);
        let bent = insert_bends(&mut nodes, &config);
        tracer.record(Stage::Bends, bent);
        let report = resolve_separation(&mut nodes, &config, jitter);
        tracer.record(Stage::Separation, report.adjustments);
        tracer.separation(report);
        let blended = resolve_interchanges(&mut nodes, &path_angles, &levels, &config);
        tracer.record(Stage::Interchanges, blended);

        // Finalization
        let layout = assemble(nodes, paths, &config);
        tracer.record(Stage::Assembly, layout.nodes.len());
        tracer.finish(layout)
    }
}

impl LayoutEngine for MetroEngine {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compute_traced(
        &self,
        paths: &[CareerPath],
        positions: &[Position],
        details: &[PositionDetail],
        config: &LayoutConfig,
        trace: bool,
    ) -> LayoutOutcome {
        let mut jitter = jitter::from_seed(config.jitter_seed);
        self.compute_with_jitter(paths, positions, details, config, jitter.as_mut(), trace)
    }
}

/// Grid-cell alternate: levels become columns and paths become rows
#[derive(Debug, Clone, Copy, Default)]
pub struct GridEngine;

impl GridEngine {
    pub const NAME: &'static str = "grid";
}

impl LayoutEngine for GridEngine {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compute_traced(
        &self,
        paths: &[CareerPath],
        positions: &[Position],
        details: &[PositionDetail],
        config: &LayoutConfig,
        trace: bool,
    ) -> LayoutOutcome {
        let mut tracer = Tracer::new(trace, Self::NAME);
        let (config, index) = match prepare(paths, positions, details, config, &mut tracer) {
            Ok(prepared) => prepared,
            Err(empty) => return tracer.finish(empty),
        };

        let levels = LevelRange::analyze(index.details.iter().copied());
        let mut row_ids: Vec<&str> = paths.iter().map(|p| p.id.as_str()).collect();
        row_ids.sort_unstable();
        row_ids.dedup();
        let rows: BTreeMap<&str, f64> = row_ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i as f64 * config.radius_step))
            .collect();

        // Reuse the metro node builder for names, colors and flags, then
        // overwrite the coordinates with grid cells.
        let mut nodes = place_initial(&index, &BTreeMap::new(), &levels, &config);
        for node in &mut nodes {
            let column = f64::from(node.level.saturating_sub(levels.min)) * config.radius_step;
            let own_row = rows.get(node.career_path_id.as_str()).copied().unwrap_or(0.0);
            let row = match &node.related_paths {
                Some(related) if node.is_interchange => {
                    let related_rows: Vec<f64> = related
                        .iter()
                        .filter_map(|id| rows.get(id.as_str()).copied())
                        .collect();
                    let mean = related_rows.iter().sum::<f64>() / related_rows.len().max(1) as f64;
                    own_row + (mean - own_row) * config.pull_interchanges
                }
                _ => own_row,
            };
            node.set_point(Point::new(column, row));
        }
        tracer.record(Stage::InitialPlacement, nodes.len());

        let mut jitter = jitter::from_seed(config.jitter_seed);
        let report = resolve_separation(&mut nodes, &config, jitter.as_mut());
        tracer.record(Stage::Separation, report.adjustments);
        tracer.separation(report);

        let layout = assemble(nodes, paths, &config);
        tracer.record(Stage::Assembly, layout.nodes.len());
        tracer.finish(layout)
    }
}
