//! Integration tests for the public parser API.

use treeflow_parser::{
    error::{ErrorCode, Severity},
    parse, parse_with_diagnostics,
};

#[test]
fn parses_generated_document() {
    let source = r#"
        {
            "title": "Water Cycle",
            "flowchart": {
                "nodes": [
                    { "label": "Evaporation", "children": [1] },
                    { "label": "Condensation", "children": [2] },
                    { "label": "Precipitation", "children": [3] },
                    { "label": "Collection" }
                ]
            }
        }
    "#;

    let flowchart = parse(source).expect("valid document");
    assert_eq!(flowchart.title(), "Water Cycle");
    let labels: Vec<_> = flowchart.nodes().iter().map(|n| n.label()).collect();
    assert_eq!(
        labels,
        vec!["Evaporation", "Condensation", "Precipitation", "Collection"]
    );
    assert!(flowchart.nodes()[3].children().is_empty());
}

#[test]
fn extra_fields_are_ignored() {
    let source = r#"{
        "id": "abc123",
        "title": "T",
        "createdAt": 1700000000,
        "flowchart": { "nodes": [ { "label": "Root", "color": "red" } ], "layout": "LR" }
    }"#;

    let (flowchart, warnings) = parse_with_diagnostics(source).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(flowchart.nodes().len(), 1);
}

#[test]
fn degraded_document_reports_warnings_not_errors() {
    let (flowchart, warnings) = parse_with_diagnostics(r#"{"title": "T"}"#).unwrap();
    assert!(flowchart.is_empty());
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity(), Severity::Warning);
    assert_eq!(warnings[0].code(), Some(ErrorCode::E201));
}

#[test]
fn syntax_error_points_at_offending_byte() {
    let source = "{\n  \"title\": \"T\",\n  \"flowchart\": [,]\n}";
    let err = parse(source).unwrap_err();

    let diag = &err.diagnostics()[0];
    assert!(diag.severity().is_error());
    let span = diag.labels()[0].span();
    assert_eq!(&source[span.start()..span.end()], ",");
}
