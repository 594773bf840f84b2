//! Input records supplied by the data-access collaborator
//!
//! The three record kinds mirror the HR schema: career paths, generic
//! positions, and position details tying a position to a path at a level.
//! [`InputIndex`] validates foreign keys once so pipeline stages can work on
//! the surviving records only.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// A named progression track with a display color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerPath {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl CareerPath {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A generic job title that may occur in several paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    pub name: String,
}

impl Position {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One occurrence of a position within one career path at one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionDetail {
    pub id: String,
    pub position_id: String,
    pub career_path_id: String,
    pub level: u32,
    #[serde(default)]
    pub sequence_in_path: Option<u32>,
}

impl PositionDetail {
    pub fn new(
        id: impl Into<String>,
        position_id: impl Into<String>,
        career_path_id: impl Into<String>,
        level: u32,
    ) -> Self {
        Self {
            id: id.into(),
            position_id: position_id.into(),
            career_path_id: career_path_id.into(),
            level,
            sequence_in_path: None,
        }
    }

    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence_in_path = Some(sequence);
        self
    }
}

/// The full input document. All three arrays are required.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutInput {
    #[serde(alias = "careerPaths")]
    pub career_paths: Vec<CareerPath>,
    pub positions: Vec<Position>,
    #[serde(alias = "positionDetails")]
    pub position_details: Vec<PositionDetail>,
}

impl LayoutInput {
    pub fn new(
        career_paths: Vec<CareerPath>,
        positions: Vec<Position>,
        position_details: Vec<PositionDetail>,
    ) -> Self {
        Self {
            career_paths,
            positions,
            position_details,
        }
    }

    /// Parse an input document from JSON
    pub fn from_json_str(content: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read and parse an input document from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// True when any of the three arrays is empty
    pub fn is_empty(&self) -> bool {
        self.career_paths.is_empty() || self.positions.is_empty() || self.position_details.is_empty()
    }
}

/// Why a position detail was left out of the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingPosition,
    MissingCareerPath,
    DuplicateId,
    /// Levels start at 1
    InvalidLevel,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingPosition => write!(f, "unknown position_id"),
            SkipReason::MissingCareerPath => write!(f, "unknown career_path_id"),
            SkipReason::DuplicateId => write!(f, "duplicate detail id"),
            SkipReason::InvalidLevel => write!(f, "level below 1"),
        }
    }
}

/// A position detail dropped during validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub detail_id: String,
    pub reason: SkipReason,
}

/// Validated, borrow-based view over the input arrays
#[derive(Debug)]
pub struct InputIndex<'a> {
    pub paths: HashMap<&'a str, &'a CareerPath>,
    pub positions: HashMap<&'a str, &'a Position>,
    /// Details whose references resolve, in input order
    pub details: Vec<&'a PositionDetail>,
    /// Position id -> every career path referencing it (sorted)
    pub related_paths: BTreeMap<&'a str, BTreeSet<&'a str>>,
    pub skipped: Vec<SkippedRecord>,
}

impl<'a> InputIndex<'a> {
    /// Index the input, skipping details with dangling references
    pub fn build(
        paths: &'a [CareerPath],
        positions: &'a [Position],
        details: &'a [PositionDetail],
    ) -> Self {
        // First record wins for duplicate path and position ids
        let mut path_map: HashMap<&str, &CareerPath> = HashMap::with_capacity(paths.len());
        for path in paths {
            path_map.entry(path.id.as_str()).or_insert(path);
        }
        let mut position_map: HashMap<&str, &Position> = HashMap::with_capacity(positions.len());
        for position in positions {
            position_map.entry(position.id.as_str()).or_insert(position);
        }

        let mut seen = HashSet::new();
        let mut valid = Vec::with_capacity(details.len());
        let mut skipped = Vec::new();
        let mut related: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

        for detail in details {
            let reason = if !position_map.contains_key(detail.position_id.as_str()) {
                Some(SkipReason::MissingPosition)
            } else if !path_map.contains_key(detail.career_path_id.as_str()) {
                Some(SkipReason::MissingCareerPath)
            } else if detail.level < 1 {
                Some(SkipReason::InvalidLevel)
            } else if !seen.insert(detail.id.as_str()) {
                Some(SkipReason::DuplicateId)
            } else {
                None
            };

            if let Some(reason) = reason {
                tracing::warn!(
                    detail = %detail.id,
                    position = %detail.position_id,
                    career_path = %detail.career_path_id,
                    %reason,
                    "skipping position detail"
                );
                skipped.push(SkippedRecord {
                    detail_id: detail.id.clone(),
                    reason,
                });
                continue;
            }

            related
                .entry(detail.position_id.as_str())
                .or_default()
                .insert(detail.career_path_id.as_str());
            valid.push(detail);
        }

        Self {
            paths: path_map,
            positions: position_map,
            details: valid,
            related_paths: related,
            skipped,
        }
    }

    /// Career paths referencing the given position, sorted by id
    pub fn paths_for_position(&self, position_id: &str) -> Vec<&'a str> {
        self.related_paths
            .get(position_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_interchange(&self, position_id: &str) -> bool {
        self.related_paths
            .get(position_id)
            .is_some_and(|set| set.len() >= 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<CareerPath>, Vec<Position>, Vec<PositionDetail>) {
        let paths = vec![CareerPath::new("eng", "Engineering"), CareerPath::new("des", "Design")];
        let positions = vec![Position::new("lead", "Lead"), Position::new("ic", "IC")];
        let details = vec![
            PositionDetail::new("d1", "ic", "eng", 1),
            PositionDetail::new("d2", "lead", "eng", 3),
            PositionDetail::new("d3", "lead", "des", 3),
            PositionDetail::new("d4", "ghost", "eng", 2),
            PositionDetail::new("d5", "ic", "nowhere", 2),
            PositionDetail::new("d1", "ic", "des", 1),
        ];
        (paths, positions, details)
    }

    #[test]
    fn test_index_skips_dangling_references() {
        let (paths, positions, details) = sample();
        let index = InputIndex::build(&paths, &positions, &details);

        let ids: Vec<&str> = index.details.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2", "d3"]);
        assert_eq!(
            index.skipped,
            vec![
                SkippedRecord {
                    detail_id: "d4".to_string(),
                    reason: SkipReason::MissingPosition
                },
                SkippedRecord {
                    detail_id: "d5".to_string(),
                    reason: SkipReason::MissingCareerPath
                },
                SkippedRecord {
                    detail_id: "d1".to_string(),
                    reason: SkipReason::DuplicateId
                },
            ]
        );
    }

    #[test]
    fn test_level_zero_is_skipped() {
        let (paths, positions, _) = sample();
        let details = vec![
            PositionDetail::new("z", "ic", "eng", 0),
            PositionDetail::new("z", "ic", "eng", 1),
        ];
        let index = InputIndex::build(&paths, &positions, &details);
        assert_eq!(index.details.len(), 1);
        assert_eq!(index.details[0].level, 1);
        assert_eq!(
            index.skipped,
            vec![SkippedRecord {
                detail_id: "z".to_string(),
                reason: SkipReason::InvalidLevel
            }]
        );
    }

    #[test]
    fn test_duplicate_path_ids_keep_first() {
        let paths = vec![
            CareerPath::new("eng", "Engineering").with_color("#111111"),
            CareerPath::new("eng", "Engineering (old)").with_color("#222222"),
        ];
        let positions = vec![Position::new("ic", "IC"), Position::new("ic", "Contributor")];
        let details = vec![PositionDetail::new("d1", "ic", "eng", 1)];
        let index = InputIndex::build(&paths, &positions, &details);
        assert_eq!(index.paths["eng"].color.as_deref(), Some("#111111"));
        assert_eq!(index.positions["ic"].name, "IC");
    }

    #[test]
    fn test_related_paths_sorted() {
        let (paths, positions, details) = sample();
        let index = InputIndex::build(&paths, &positions, &details);
        assert!(index.is_interchange("lead"));
        assert!(!index.is_interchange("ic"));
        assert_eq!(index.paths_for_position("lead"), vec!["des", "eng"]);
        assert!(index.paths_for_position("ghost").is_empty());
    }

    #[test]
    fn test_input_from_json_accepts_camel_case_arrays() {
        let input = LayoutInput::from_json_str(
            r##"{
                "careerPaths": [{"id": "eng", "name": "Engineering", "color": "#ff0000"}],
                "positions": [{"id": "p", "name": "Engineer"}],
                "positionDetails": [{"id": "d", "position_id": "p", "career_path_id": "eng", "level": 2}]
            }"##,
        )
        .unwrap();
        assert_eq!(input.career_paths[0].color.as_deref(), Some("#ff0000"));
        assert_eq!(input.position_details[0].sequence_in_path, None);
    }

    #[test]
    fn test_input_missing_array_is_error() {
        let result = LayoutInput::from_json_str(r#"{"career_paths": [], "positions": []}"#);
        assert!(matches!(result, Err(InputError::Json(_))));
    }
}
