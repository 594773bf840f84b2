//! Opt-in diagnostics for a layout run

use std::fmt;

use serde::Serialize;

use crate::input::SkippedRecord;

use super::separation::{count_violations, SeparationReport};
use super::types::LayoutData;

/// Pipeline stage identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    InitialPlacement,
    OriginGuard,
    GridAngles,
    Bends,
    Separation,
    Interchanges,
    Assembly,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::InitialPlacement => "initial_placement",
            Stage::OriginGuard => "origin_guard",
            Stage::GridAngles => "grid_angles",
            Stage::Bends => "bends",
            Stage::Separation => "separation",
            Stage::Interchanges => "interchanges",
            Stage::Assembly => "assembly",
        };
        f.write_str(name)
    }
}

/// What one stage did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageTrace {
    pub stage: Stage,
    /// Nodes placed or moved by the stage
    pub nodes_moved: usize,
}

/// Diagnostics collected while computing a layout
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTrace {
    pub strategy: String,
    pub stages: Vec<StageTrace>,
    pub skipped: Vec<SkippedRecord>,
    pub separation: Option<SeparationReport>,
    /// Node pairs closer than `min_separation` in the finished layout
    pub final_violations: Option<usize>,
}

impl LayoutTrace {
    pub fn stage(&self, stage: Stage) -> Option<&StageTrace> {
        self.stages.iter().find(|s| s.stage == stage)
    }
}

/// A layout plus its trace when one was requested
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutOutcome {
    pub layout: LayoutData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<LayoutTrace>,
}

/// Collects stage records only when enabled; always emits tracing events
#[derive(Debug)]
pub(crate) struct Tracer {
    trace: Option<LayoutTrace>,
}

impl Tracer {
    pub(crate) fn new(enabled: bool, strategy: &str) -> Self {
        Self {
            trace: enabled.then(|| LayoutTrace {
                strategy: strategy.to_string(),
                ..LayoutTrace::default()
            }),
        }
    }

    pub(crate) fn record(&mut self, stage: Stage, nodes_moved: usize) {
        tracing::debug!(%stage, nodes_moved, "layout stage complete");
        if let Some(trace) = &mut self.trace {
            trace.stages.push(StageTrace { stage, nodes_moved });
        }
    }

    pub(crate) fn separation(&mut self, report: SeparationReport) {
        if !report.converged {
            tracing::debug!(
                iterations = report.iterations,
                "separation hit the iteration cap with overlaps remaining"
            );
        }
        if let Some(trace) = &mut self.trace {
            trace.separation = Some(report);
        }
    }

    pub(crate) fn skipped(&mut self, skipped: &[SkippedRecord]) {
        if let Some(trace) = &mut self.trace {
            trace.skipped.extend_from_slice(skipped);
        }
    }

    pub(crate) fn finish(self, layout: LayoutData) -> LayoutOutcome {
        let trace = self.trace.map(|mut trace| {
            trace.final_violations = Some(count_violations(
                &layout.nodes,
                layout.config_used.min_separation,
            ));
            trace
        });
        LayoutOutcome { layout, trace }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::LayoutConfig;

    #[test]
    fn test_disabled_tracer_collects_nothing() {
        let mut tracer = Tracer::new(false, "metro");
        tracer.record(Stage::Bends, 3);
        let outcome = tracer.finish(LayoutData::empty(LayoutConfig::default()));
        assert!(outcome.trace.is_none());
    }

    #[test]
    fn test_enabled_tracer_records_stages() {
        let mut tracer = Tracer::new(true, "metro");
        tracer.record(Stage::InitialPlacement, 4);
        tracer.record(Stage::Bends, 1);
        let trace = tracer
            .finish(LayoutData::empty(LayoutConfig::default()))
            .trace
            .unwrap();
        assert_eq!(trace.strategy, "metro");
        assert_eq!(trace.stage(Stage::Bends).unwrap().nodes_moved, 1);
        assert!(trace.stage(Stage::Separation).is_none());
    }

    #[test]
    fn test_finish_counts_final_violations() {
        use crate::input::CareerPath;
        use crate::layout::assembly::assemble;
        use crate::layout::types::{LayoutNode, DEFAULT_NODE_COLOR};

        let node = |id: &str, x: f64| LayoutNode {
            id: id.to_string(),
            position_id: id.to_string(),
            career_path_id: "eng".to_string(),
            level: 1,
            name: id.to_string(),
            x,
            y: 0.0,
            color: DEFAULT_NODE_COLOR.to_string(),
            is_interchange: false,
            related_paths: None,
            sequence_in_path: None,
        };
        let config = LayoutConfig::default();
        let layout = assemble(
            vec![node("a", 0.0), node("b", 10.0), node("c", 500.0)],
            &[CareerPath::new("eng", "Engineering")],
            &config,
        );

        let trace = Tracer::new(true, "metro").finish(layout.clone()).trace.unwrap();
        assert_eq!(trace.final_violations, Some(1));
        assert!(Tracer::new(false, "metro").finish(layout).trace.is_none());
    }

    #[test]
    fn test_stage_display_matches_serde() {
        let json = serde_json::to_string(&Stage::GridAngles).unwrap();
        assert_eq!(json, format!("\"{}\"", Stage::GridAngles));
    }
}
