//! Final assembly of the immutable [`LayoutData`]

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::input::CareerPath;

use super::config::LayoutConfig;
use super::types::{LayoutBounds, LayoutData, LayoutNode, LayoutPath, DEFAULT_NODE_COLOR};

/// Node indices grouped by career path id, in input order within a group
pub(crate) fn path_groups(nodes: &[LayoutNode]) -> BTreeMap<&str, Vec<usize>> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, node) in nodes.iter().enumerate() {
        groups.entry(node.career_path_id.as_str()).or_default().push(i);
    }
    groups
}

/// Order used while enforcing constraints: level, then sequence, then id.
/// Nodes with a sequence come before nodes without one on the same level.
pub(crate) fn sequence_order(a: &LayoutNode, b: &LayoutNode) -> Ordering {
    a.level
        .cmp(&b.level)
        .then_with(|| match (a.sequence_in_path, b.sequence_in_path) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Order of stations along a finished line: level, then sequence when both
/// nodes have one, else distance from the origin, then id
pub(crate) fn travel_order(a: &LayoutNode, b: &LayoutNode) -> Ordering {
    a.level
        .cmp(&b.level)
        .then_with(|| match (a.sequence_in_path, b.sequence_in_path) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => a.point().radius().total_cmp(&b.point().radius()),
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Coordinate extrema grown by the effective padding
pub fn compute_bounds(nodes: &[LayoutNode], config: &LayoutConfig) -> LayoutBounds {
    let Some(first) = nodes.first() else {
        return LayoutBounds::empty_fallback();
    };

    let mut bounds = LayoutBounds {
        min_x: first.x,
        max_x: first.x,
        min_y: first.y,
        max_y: first.y,
    };
    for node in &nodes[1..] {
        bounds.min_x = bounds.min_x.min(node.x);
        bounds.max_x = bounds.max_x.max(node.x);
        bounds.min_y = bounds.min_y.min(node.y);
        bounds.max_y = bounds.max_y.max(node.y);
    }

    let pad = config.effective_padding();
    LayoutBounds {
        min_x: bounds.min_x - pad,
        max_x: bounds.max_x + pad,
        min_y: bounds.min_y - pad,
        max_y: bounds.max_y + pad,
    }
}

/// Group nodes into lines, build the id indices and compute bounds.
///
/// Every career path in `paths` yields a [`LayoutPath`] (sorted by id), even
/// when none of its details survived validation.
pub fn assemble(nodes: Vec<LayoutNode>, paths: &[CareerPath], config: &LayoutConfig) -> LayoutData {
    let nodes_by_id: BTreeMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), i))
        .collect();

    let mut groups = path_groups(&nodes);
    for members in groups.values_mut() {
        members.sort_by(|&a, &b| travel_order(&nodes[a], &nodes[b]));
    }

    let mut sorted_paths: Vec<&CareerPath> = paths.iter().collect();
    sorted_paths.sort_by(|a, b| a.id.cmp(&b.id));
    sorted_paths.dedup_by(|a, b| a.id == b.id);

    let layout_paths: Vec<LayoutPath> = sorted_paths
        .into_iter()
        .map(|path| LayoutPath {
            id: path.id.clone(),
            name: path.name.clone(),
            color: path
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_NODE_COLOR.to_string()),
            nodes: groups
                .get(path.id.as_str())
                .map(|members| members.iter().map(|&i| nodes[i].id.clone()).collect())
                .unwrap_or_default(),
        })
        .collect();

    let paths_by_id = layout_paths
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.clone(), i))
        .collect();

    let bounds = compute_bounds(&nodes, config);

    LayoutData {
        nodes,
        nodes_by_id,
        paths: layout_paths,
        paths_by_id,
        bounds,
        config_used: config.clone(),
    }
}
