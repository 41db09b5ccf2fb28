//! Error codes for the Treeflow diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - JSON syntax errors (fatal)
//! - `E2xx` - Document shape problems (reported as warnings)

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Syntax Errors (E1xx)
    // =========================================================================
    /// Invalid JSON.
    ///
    /// The input is not syntactically valid JSON.
    E100,

    /// Incomplete input.
    ///
    /// The input ended before the JSON value was complete.
    E101,

    // =========================================================================
    // Document Shape (E2xx)
    // =========================================================================
    /// Document root is not an object.
    E200,

    /// Missing or invalid node list.
    ///
    /// `flowchart.nodes` is absent or not an array; the flowchart is empty.
    E201,

    /// Node entry is not an object.
    ///
    /// The entry is kept as an unlabeled leaf so later indices stay stable.
    E202,

    /// Missing or non-string label.
    E203,

    /// Invalid child reference.
    ///
    /// A `children` entry is not a non-negative integer, or `children` is not
    /// an array. The reference is dropped.
    E204,

    /// Non-string title.
    E205,
}

impl ErrorCode {
    /// Short description used in documentation and help output.
    pub fn description(&self) -> &'static str {
        match self {
            Self::E100 => "invalid JSON",
            Self::E101 => "incomplete input",
            Self::E200 => "document root is not an object",
            Self::E201 => "missing or invalid node list",
            Self::E202 => "node entry is not an object",
            Self::E203 => "missing or non-string label",
            Self::E204 => "invalid child reference",
            Self::E205 => "non-string title",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
