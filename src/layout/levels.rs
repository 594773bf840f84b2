//! Seniority level range across the laid-out details

use crate::input::PositionDetail;

/// Minimum, maximum and midpoint seniority level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelRange {
    pub min: u32,
    pub max: u32,
    pub mid: f64,
}

impl Default for LevelRange {
    fn default() -> Self {
        Self {
            min: 1,
            max: 1,
            mid: 1.0,
        }
    }
}

impl LevelRange {
    /// Scan the details once. Empty input yields `{1, 1, 1}`.
    pub fn analyze<'a>(details: impl IntoIterator<Item = &'a PositionDetail>) -> Self {
        let mut bounds: Option<(u32, u32)> = None;
        for detail in details {
            let level = detail.level;
            bounds = Some(match bounds {
                None => (level, level),
                Some((lo, hi)) => (lo.min(level), hi.max(level)),
            });
        }

        match bounds {
            Some((min, max)) => Self {
                min,
                max,
                mid: (f64::from(min) + f64::from(max)) / 2.0,
            },
            None => Self::default(),
        }
    }

    /// Signed distance of `level` from the midpoint, in levels
    pub fn offset_from_mid(&self, level: u32) -> f64 {
        f64::from(level) - self.mid
    }

    pub fn is_mid(&self, level: u32) -> bool {
        self.offset_from_mid(level).abs() < 1e-9
    }
}
