//! Error and diagnostic system for the Treeflow parser.
//!
//! The system is built around the [`Diagnostic`] type, which represents a
//! single error or warning with an optional error code, labeled source spans
//! and help text. Fatal diagnostics are wrapped in [`ParseError`]; warnings
//! describe input that was accepted in degraded form.
//!
//! # Example
//!
//! ```
//! # use treeflow_parser::error::{Diagnostic, ErrorCode};
//! # use treeflow_parser::Span;
//!
//! let diag = Diagnostic::error("expected value")
//!     .with_code(ErrorCode::E100)
//!     .with_label(Span::new(10..11), "here")
//!     .with_help("check the JSON syntax near this position");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
