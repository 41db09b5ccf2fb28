//! Stroke and line-style definitions.
//!
//! # SVG Attribute Mapping
//!
//! | Rust Property | SVG Attribute | Example Values |
//! |--------------|---------------|----------------|
//! | `color` | `stroke` | `"#000000"` |
//! | `width` | `stroke-width` | `2.0` |
//! | `style` | `stroke-dasharray` | `"5,5"` |

use std::str::FromStr;

use serde::Deserialize;

use crate::color::Color;

/// Line pattern of a stroke.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum StrokeStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// `5,5` dash pattern.
    Dashed,
    /// `2,3` dot pattern.
    Dotted,
}

impl StrokeStyle {
    /// Returns the `stroke-dasharray` value, or `None` for solid lines.
    pub fn to_svg_value(&self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("5,5"),
            Self::Dotted => Some("2,3"),
        }
    }
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            other => Err(format!("invalid stroke style `{other}`")),
        }
    }
}

impl TryFrom<String> for StrokeStyle {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Color, width and pattern of a drawn line.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a new stroke with the given color and width, solid style.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    /// Returns a copy of this stroke with a different color.
    pub fn with_color(&self, color: Color) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }

    /// Returns a copy of this stroke with a different style.
    pub fn with_style(&self, style: StrokeStyle) -> Self {
        Self {
            style,
            ..self.clone()
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// # Examples
///
/// ```
/// use treeflow_core::draw::StrokeDefinition;
/// use treeflow_core::color::Color;
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::new(Color::new("black").unwrap(), 2.0);
/// let line = svg_element::Line::new()
///     .set("x1", 0)
///     .set("y1", 0)
///     .set("x2", 10)
///     .set("y2", 10);
///
/// let line = treeflow_core::apply_stroke!(line, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_hex())
            .set("stroke-width", $stroke.width());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}

#[cfg(test)]
mod tests {
    use svg::node::element::Line;

    use super::*;

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_eq!(stroke.width(), 1.0);
        assert_eq!(stroke.color().to_hex(), "#000000");
        assert_eq!(*stroke.style(), StrokeStyle::Solid);
    }

    #[test]
    fn test_stroke_with_overrides() {
        let base = StrokeDefinition::new(Color::new("red").unwrap(), 2.0);
        let dashed = base.with_style(StrokeStyle::Dashed);
        let blue = base.with_color(Color::new("blue").unwrap());

        assert_eq!(*dashed.style(), StrokeStyle::Dashed);
        assert_eq!(dashed.width(), 2.0);
        assert_eq!(blue.color().to_hex(), "#0000ff");
        assert_eq!(*base.style(), StrokeStyle::Solid);
    }

    #[test]
    fn test_stroke_style_from_str() {
        assert_eq!("solid".parse::<StrokeStyle>().unwrap(), StrokeStyle::Solid);
        assert_eq!("dashed".parse::<StrokeStyle>().unwrap(), StrokeStyle::Dashed);
        assert_eq!("dotted".parse::<StrokeStyle>().unwrap(), StrokeStyle::Dotted);

        let err = "wavy".parse::<StrokeStyle>().unwrap_err();
        assert!(err.contains("invalid stroke style"));
    }

    #[test]
    fn test_apply_stroke_sets_attributes() {
        let stroke = StrokeDefinition::new(Color::new("red").unwrap(), 3.0)
            .with_style(StrokeStyle::Dotted);
        let line = crate::apply_stroke!(Line::new(), &stroke);
        let rendered = line.to_string();

        assert!(rendered.contains(r##"stroke="#ff0000""##));
        assert!(rendered.contains(r#"stroke-width="3""#));
        assert!(rendered.contains(r#"stroke-dasharray="2,3""#));
    }

    #[test]
    fn test_apply_stroke_solid_has_no_dasharray() {
        let line = crate::apply_stroke!(Line::new(), &StrokeDefinition::default());
        assert!(!line.to_string().contains("stroke-dasharray"));
    }
}
