//! Angle arithmetic and per-path base angles
//!
//! All angles are in degrees. Path base angles are spread over the compass
//! directions in id order so the result does not depend on input order.

use std::collections::BTreeMap;

use crate::input::CareerPath;

use super::config::LayoutConfig;

/// Extra rotation per wrap when paths outnumber compass directions
pub const WRAP_NUDGE_DEGREES: f64 = 5.0;

/// Normalize an angle into [0, 360)
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Signed shortest rotation from `from` to `to`, in [-180, 180]
pub fn shortest_arc(from: f64, to: f64) -> f64 {
    let diff = (to - from).rem_euclid(360.0);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Circular mean of a set of angles; `None` when empty or when the
/// direction vectors cancel out
pub fn circular_mean(angles: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (mut sin_sum, mut cos_sum, mut count) = (0.0, 0.0, 0usize);
    for a in angles {
        let r = a.to_radians();
        sin_sum += r.sin();
        cos_sum += r.cos();
        count += 1;
    }
    if count == 0 || sin_sum.hypot(cos_sum) < 1e-9 {
        return None;
    }
    Some(normalize_degrees(sin_sum.atan2(cos_sum).to_degrees()))
}

/// Nearest permitted compass bearing (a multiple of `step`)
pub fn snap_to_step(angle: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return normalize_degrees(angle);
    }
    normalize_degrees((angle / step).round() * step)
}

/// Absolute deviation of `angle` from its nearest permitted bearing
pub fn deviation_from_grid(angle: f64, step: f64) -> f64 {
    shortest_arc(snap_to_step(angle, step), angle).abs()
}

/// Index of the compass direction nearest to `angle`
pub fn direction_index(angle: f64, step: f64) -> u32 {
    let directions = (360.0 / step).round().max(1.0);
    ((normalize_degrees(angle) / step).round() % directions) as u32
}

/// Assign every career path its base angle.
///
/// Paths are sorted by id; the i-th path gets
/// `offset + i * step + WRAP_NUDGE_DEGREES * (i / num_directions)`.
pub fn assign_path_angles(paths: &[CareerPath], config: &LayoutConfig) -> BTreeMap<String, f64> {
    let n = config.num_directions.max(1) as usize;
    let step = config.direction_step();

    let mut ids: Vec<&str> = paths.iter().map(|p| p.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();

    ids.into_iter()
        .enumerate()
        .map(|(index, id)| {
            let slot = (index % n) as f64;
            let wraps = (index / n) as f64;
            let angle = config.angle_offset_degrees + slot * step + WRAP_NUDGE_DEGREES * wraps;
            (id.to_string(), normalize_degrees(angle))
        })
        .collect()
}
