//! Text styling for node labels.

use crate::color::Color;

/// Font settings for rendered labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: f32,
    color: Color,
}

impl TextDefinition {
    pub fn new(font_family: impl Into<String>, font_size: f32, color: Color) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            color,
        }
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Rough width estimate of `text` in this font.
    ///
    /// Label wrapping only needs an estimate, so an average glyph advance
    /// of 0.6em is used instead of real shaping.
    pub fn estimate_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.font_size * 0.6
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self::new("sans-serif", 14.0, Color::default())
    }
}
