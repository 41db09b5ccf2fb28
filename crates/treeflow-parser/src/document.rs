//! Lenient extraction of the semantic model from a JSON value.
//!
//! Node positions in the list are significant (children refer to them by
//! index), so a malformed entry is kept as an unlabeled leaf rather than
//! removed.

use serde_json::{Map, Value};

use treeflow_core::semantic::{Flowchart, FlowchartNode};

use crate::error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError};

pub(crate) fn extract(value: &Value) -> Result<(Flowchart, Vec<Diagnostic>), ParseError> {
    let mut collector = DiagnosticCollector::new();

    let Some(root) = value.as_object() else {
        collector.emit(
            Diagnostic::warning(format!(
                "expected the document to be an object, found {}",
                kind(value)
            ))
            .with_code(ErrorCode::E200),
        );
        let warnings = collector.finish()?;
        return Ok((Flowchart::default(), warnings));
    };

    let title = extract_title(root, &mut collector);
    let nodes = extract_nodes(root, &mut collector);

    let warnings = collector.finish()?;
    Ok((Flowchart::new(title, nodes), warnings))
}

fn extract_title(root: &Map<String, Value>, collector: &mut DiagnosticCollector) -> String {
    match root.get("title") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(title)) => title.clone(),
        Some(other) => {
            collector.emit(
                Diagnostic::warning(format!("`title` should be a string, found {}", kind(other)))
                    .with_code(ErrorCode::E205),
            );
            scalar_to_string(other).unwrap_or_default()
        }
    }
}

fn extract_nodes(
    root: &Map<String, Value>,
    collector: &mut DiagnosticCollector,
) -> Vec<FlowchartNode> {
    let entries = root
        .get("flowchart")
        .and_then(|flowchart| flowchart.get("nodes"))
        .and_then(Value::as_array);

    let Some(entries) = entries else {
        collector.emit(
            Diagnostic::warning("`flowchart.nodes` is missing or not an array")
                .with_code(ErrorCode::E201)
                .with_help("the flowchart is treated as empty"),
        );
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| extract_node(index, entry, collector))
        .collect()
}

fn extract_node(index: usize, entry: &Value, collector: &mut DiagnosticCollector) -> FlowchartNode {
    let Some(node) = entry.as_object() else {
        collector.emit(
            Diagnostic::warning(format!(
                "node {index} should be an object, found {}",
                kind(entry)
            ))
            .with_code(ErrorCode::E202),
        );
        return FlowchartNode::default();
    };

    let label = match node.get("label") {
        Some(Value::String(label)) => label.clone(),
        Some(other) if scalar_to_string(other).is_some() => {
            collector.emit(
                Diagnostic::warning(format!(
                    "node {index} label should be a string, found {}",
                    kind(other)
                ))
                .with_code(ErrorCode::E203),
            );
            scalar_to_string(other).unwrap_or_default()
        }
        _ => {
            collector.emit(
                Diagnostic::warning(format!("node {index} has no label")).with_code(ErrorCode::E203),
            );
            String::new()
        }
    };

    let children = match node.get("children") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(children)) => children
            .iter()
            .filter_map(|child| match child.as_u64().and_then(|c| usize::try_from(c).ok()) {
                Some(child) => Some(child),
                None => {
                    collector.emit(
                        Diagnostic::warning(format!(
                            "node {index} has an invalid child reference `{child}`"
                        ))
                        .with_code(ErrorCode::E204)
                        .with_help("child references must be non-negative node indices"),
                    );
                    None
                }
            })
            .collect(),
        Some(other) => {
            collector.emit(
                Diagnostic::warning(format!(
                    "node {index} `children` should be an array, found {}",
                    kind(other)
                ))
                .with_code(ErrorCode::E204),
            );
            Vec::new()
        }
    };

    FlowchartNode::new(label, children)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
