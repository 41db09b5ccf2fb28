//! Color handling for Treeflow flowcharts
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, plus the per-level [`Palette`] used to group nodes and
//! edges visually.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use treeflow_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the color as a `#rrggbb` hex string, dropping alpha.
    ///
    /// Hex output is what gets written into SVG attributes so that every
    /// consumer (browsers and the rasterizer alike) reads the same value.
    ///
    /// ```
    /// use treeflow_core::color::Color;
    ///
    /// assert_eq!(Color::new("red").unwrap().to_hex(), "#ff0000");
    /// ```
    pub fn to_hex(self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    }

    /// Returns a sanitized, ID-safe string representation of this color.
    ///
    /// Used for SVG marker ids, one marker per edge color.
    pub fn to_id_safe_string(self) -> String {
        format!("c{}", self.to_hex().trim_start_matches('#'))
    }

    /// Creates a new color with the specified alpha (transparency) value.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_hex())
    }
}

impl From<Color> for svg::node::Value {
    fn from(color: Color) -> Self {
        Self::from(color.to_hex())
    }
}

/// Colors used when none are configured.
const DEFAULT_PALETTE: [&str; 6] = [
    "#2563eb", "#16a34a", "#d97706", "#9333ea", "#dc2626", "#0891b2",
];

/// An ordered set of colors cycled by flowchart level.
///
/// Level `n` maps to entry `n % len`. A palette is never empty.
///
/// ```
/// use treeflow_core::color::Palette;
///
/// let palette = Palette::default();
/// assert_eq!(palette.for_level(0), palette.for_level(palette.len()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Build a palette from CSS color strings.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or any entry fails to parse.
    pub fn from_css<S: AsRef<str>>(colors: &[S]) -> Result<Self, String> {
        if colors.is_empty() {
            return Err("palette must contain at least one color".to_string());
        }

        let colors = colors
            .iter()
            .map(|color| Color::new(color.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { colors })
    }

    /// Returns the color assigned to `level`.
    pub fn for_level(&self, level: usize) -> Color {
        self.colors[level % self.colors.len()]
    }

    /// Number of distinct colors in the palette.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Iterate over the palette colors in order.
    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_css(&DEFAULT_PALETTE).expect("default palette colors are valid")
    }
}
