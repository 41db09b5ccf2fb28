//! # Treeflow Parser
//!
//! Reads flowchart documents produced by the content-generation service into
//! the semantic [`Flowchart`] model.
//!
//! The expected shape is:
//!
//! ```json
//! { "title": "Photosynthesis",
//!   "flowchart": { "nodes": [ { "label": "Light", "children": [1, 2] },
//!                             { "label": "Water" },
//!                             { "label": "CO2", "children": [] } ] } }
//! ```
//!
//! Only JSON syntax errors are fatal. Every other deviation from the shape
//! above degrades the document (missing pieces become empty) and is reported
//! as a warning diagnostic.
//!
//! ## Usage
//!
//! ```
//! # use treeflow_parser::{parse, error::ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let flowchart = parse(r#"{"title": "T", "flowchart": {"nodes": [{"label": "Root"}]}}"#)?;
//!     assert_eq!(flowchart.nodes().len(), 1);
//!     Ok(())
//! }
//! ```

pub mod error;

mod document;
mod span;

pub use span::Span;

use log::{debug, info, warn};

use treeflow_core::semantic::Flowchart;

use error::{Diagnostic, ErrorCode, ParseError};

/// Parse source text into a flowchart, logging any warnings.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying a labeled [`Diagnostic`] when the input
/// is not valid JSON.
pub fn parse(source: &str) -> Result<Flowchart, ParseError> {
    let (flowchart, warnings) = parse_with_diagnostics(source)?;

    for warning in &warnings {
        warn!(code:? = warning.code(); "{}", warning.message());
    }

    Ok(flowchart)
}

/// Parse source text into a flowchart and return the warnings alongside it.
///
/// # Errors
///
/// Returns a [`ParseError`] when the input is not valid JSON.
pub fn parse_with_diagnostics(source: &str) -> Result<(Flowchart, Vec<Diagnostic>), ParseError> {
    info!(source_len = source.len(); "Parsing flowchart document");

    let value: serde_json::Value =
        serde_json::from_str(source).map_err(|err| syntax_diagnostic(source, &err))?;

    let (flowchart, warnings) = document::extract(&value)?;

    debug!(
        nodes_count = flowchart.nodes().len(),
        warnings_count = warnings.len();
        "Flowchart document parsed"
    );

    Ok((flowchart, warnings))
}

/// Convert a `serde_json` syntax error into a labeled diagnostic.
fn syntax_diagnostic(source: &str, err: &serde_json::Error) -> Diagnostic {
    let span = Span::from_line_column(source, err.line(), err.column());
    let message = strip_position_suffix(&err.to_string());

    if err.is_eof() {
        Diagnostic::error(message)
            .with_code(ErrorCode::E101)
            .with_label(span, "input ends here")
            .with_help("the document appears to be truncated")
    } else {
        Diagnostic::error(message)
            .with_code(ErrorCode::E100)
            .with_label(span, "here")
            .with_help("check the JSON syntax near this position")
    }
}

/// `serde_json` appends " at line L column C"; the span already carries that.
fn strip_position_suffix(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_photosynthesis() {
        let source = r#"{
            "title": "Photosynthesis",
            "flowchart": { "nodes": [
                {"label": "Light", "children": [1, 2]},
                {"label": "Water", "children": []},
                {"label": "CO2", "children": []}
            ] }
        }"#;

        let (flowchart, warnings) = parse_with_diagnostics(source).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(flowchart.title(), "Photosynthesis");
        assert_eq!(flowchart.nodes().len(), 3);
        assert_eq!(flowchart.nodes()[0].children(), &[1, 2]);
        assert_eq!(flowchart.nodes()[2].label(), "CO2");
    }

    #[test]
    fn test_syntax_error_is_labeled() {
        let source = r#"{"title": ?}"#;
        let err = parse(source).unwrap_err();

        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert!(!diag.message().contains(" at line "));

        let span = diag.labels()[0].span();
        assert_eq!(&source[span.start()..span.end()], "?");
    }

    #[test]
    fn test_truncated_input_is_eof_error() {
        let err = parse(r#"{"title": "T", "flowchart": {"#).unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E101));
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(parse("").is_err());
    }

    #[test]
    fn test_strip_position_suffix() {
        assert_eq!(
            strip_position_suffix("expected value at line 1 column 11"),
            "expected value"
        );
        assert_eq!(strip_position_suffix("no position"), "no position");
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;
    use serde_json::{Value, json};

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn json_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            "[a-z ]{0,8}".prop_map(Value::from),
        ];
        leaf.prop_recursive(4, 32, 6, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::from),
                proptest::collection::btree_map(
                    prop_oneof![
                        Just("title".to_string()),
                        Just("flowchart".to_string()),
                        Just("nodes".to_string()),
                        Just("label".to_string()),
                        Just("children".to_string()),
                        "[a-z]{1,5}",
                    ],
                    inner,
                    0..5,
                )
                .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    fn document_strategy() -> impl Strategy<Value = (String, Vec<(String, Vec<usize>)>)> {
        (
            "[A-Za-z ]{0,12}",
            (1usize..12).prop_flat_map(|len| {
                proptest::collection::vec(
                    ("[A-Za-z]{1,8}", proptest::collection::vec(0..len, 0..4)),
                    len,
                )
            }),
        )
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Any syntactically valid JSON parses, however wrong its shape.
    fn check_valid_json_never_fails(value: &Value) -> Result<(), TestCaseError> {
        let source = value.to_string();
        prop_assert!(parse_with_diagnostics(&source).is_ok());
        Ok(())
    }

    /// Well-formed documents round through without warnings.
    fn check_well_formed_document_is_exact(
        title: &str,
        nodes: &[(String, Vec<usize>)],
    ) -> Result<(), TestCaseError> {
        let source = json!({
            "title": title,
            "flowchart": {
                "nodes": nodes
                    .iter()
                    .map(|(label, children)| json!({ "label": label, "children": children }))
                    .collect::<Vec<_>>()
            }
        })
        .to_string();

        let (flowchart, warnings) = parse_with_diagnostics(&source).unwrap();
        prop_assert!(warnings.is_empty());
        prop_assert_eq!(flowchart.title(), title);
        prop_assert_eq!(flowchart.nodes().len(), nodes.len());
        for (node, (label, children)) in flowchart.nodes().iter().zip(nodes) {
            prop_assert_eq!(node.label(), label.as_str());
            prop_assert_eq!(node.children(), children.as_slice());
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn valid_json_never_fails(value in json_strategy()) {
            check_valid_json_never_fails(&value)?;
        }

        #[test]
        fn well_formed_document_is_exact((title, nodes) in document_strategy()) {
            check_well_formed_document_is_exact(&title, &nodes)?;
        }
    }
}
