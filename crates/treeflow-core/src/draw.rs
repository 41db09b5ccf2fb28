//! Visual definitions shared by the SVG emitters.
//!
//! - [`StrokeDefinition`] and [`apply_stroke!`](crate::apply_stroke!) for outlines and edges
//! - [`TextDefinition`] for node labels

mod stroke;
mod text;

pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::TextDefinition;
