//! Integration tests for input documents and the run pipeline

use std::path::Path;

use career_metro::layout::LintCategory;
use career_metro::{
    layout_json_with_config, run, Error, InputError, LayoutConfig, LayoutInput, RoutingMode,
    RunConfig,
};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_fixture_loads_from_file() {
    let input = LayoutInput::from_file(Path::new(&fixture_path("career.json"))).expect("Should load");
    assert_eq!(input.career_paths.len(), 4);
    assert_eq!(input.positions.len(), 9);
    assert_eq!(input.position_details.len(), 19);
    assert_eq!(input.career_paths[2].color, None);
    assert_eq!(input.position_details[0].sequence_in_path, Some(1));
    assert_eq!(input.position_details[6].sequence_in_path, None);
}

#[test]
fn test_camel_case_keys_accepted() {
    let input = LayoutInput::from_json_str(
        r#"{
            "careerPaths": [{"id": "eng", "name": "Engineering"}],
            "positions": [{"id": "jr", "name": "Junior"}],
            "positionDetails": [
                {"id": "e1", "position_id": "jr", "career_path_id": "eng", "level": 1}
            ]
        }"#,
    )
    .expect("Should parse");
    assert_eq!(input.career_paths[0].id, "eng");
    assert_eq!(input.position_details.len(), 1);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = LayoutInput::from_file(Path::new(&fixture_path("absent.json"))).unwrap_err();
    assert!(matches!(err, InputError::Io(_)));
}

#[test]
fn test_missing_array_is_json_error() {
    let err = LayoutInput::from_json_str(r#"{"career_paths": [], "position_details": []}"#)
        .unwrap_err();
    assert!(matches!(err, InputError::Json(_)));
    assert!(err.to_string().contains("positions"));
}

#[test]
fn test_unknown_config_key_rejected() {
    let result = LayoutConfig::from_toml_str("mid_level_radius = 200.0\nspokes = 6\n");
    assert!(result.is_err());
}

#[test]
fn test_run_with_all_extras() {
    let input = LayoutInput::from_file(Path::new(&fixture_path("career.json"))).unwrap();
    let config = RunConfig::new()
        .with_trace(true)
        .with_routes(RoutingMode::Metro)
        .with_lint(true);
    let output = run(&input, &config).expect("Should lay out");

    assert_eq!(output.layout.nodes.len(), 16);
    assert_eq!(output.trace.as_ref().unwrap().skipped.len(), 3);

    let routes = output.routes.as_ref().unwrap();
    assert_eq!(routes.len(), 4);
    for path in &output.layout.paths {
        let stations: Vec<_> = output.layout.path_nodes(path).map(|n| n.point()).collect();
        let route = &routes[&path.id];
        assert_eq!(route.first(), stations.first());
        assert_eq!(route.last(), stations.last());
    }

    // Bounds and interchange flags are structural and always hold
    let warnings = output.lint.as_ref().unwrap();
    assert!(
        warnings
            .iter()
            .all(|w| !matches!(w.category, LintCategory::Bounds | LintCategory::Interchange)),
        "unexpected warnings: {:?}",
        warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>()
    );
}

#[test]
fn test_compact_json_has_extras_keys() {
    let source = std::fs::read_to_string(fixture_path("career.json")).unwrap();
    let config = RunConfig::new()
        .with_trace(true)
        .with_routes(RoutingMode::Direct)
        .with_pretty(false);
    let json = layout_json_with_config(&source, &config).unwrap();
    assert!(!json.contains('\n'));

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["trace"]["stages"].is_array());
    assert!(value["trace"]["finalViolations"].is_u64());
    assert!(value["routes"]["eng"].is_array());
    assert!(value.get("lint").is_none());
    assert_eq!(value["paths"].as_array().unwrap().len(), 4);
}

#[test]
fn test_unknown_strategy_suggests_alternatives() {
    let source = std::fs::read_to_string(fixture_path("career.json")).unwrap();
    let config = RunConfig::new().with_strategy("metr");
    let err = layout_json_with_config(&source, &config).unwrap_err();
    assert!(matches!(err, Error::Layout(_)));
    assert!(err.to_string().contains("did you mean: metro?"));
}

#[test]
fn test_duplicate_path_ids_use_first_record() {
    let source = r##"{
        "career_paths": [
            {"id": "eng", "name": "Engineering", "color": "#111111"},
            {"id": "eng", "name": "Engineering (old)", "color": "#999999"}
        ],
        "positions": [{"id": "jr", "name": "Junior"}],
        "position_details": [
            {"id": "e1", "position_id": "jr", "career_path_id": "eng", "level": 1},
            {"id": "e0", "position_id": "jr", "career_path_id": "eng", "level": 0}
        ]
    }"##;
    let input = LayoutInput::from_json_str(source).unwrap();
    let output = run(&input, &RunConfig::new().with_trace(true)).unwrap();

    assert_eq!(output.layout.paths.len(), 1);
    assert_eq!(output.layout.paths[0].name, "Engineering");
    assert_eq!(output.layout.paths[0].color, "#111111");
    assert_eq!(output.layout.node("e1").unwrap().color, "#111111");

    let skipped = &output.trace.unwrap().skipped;
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].detail_id, "e0");
    assert_eq!(skipped[0].reason, career_metro::SkipReason::InvalidLevel);
}
