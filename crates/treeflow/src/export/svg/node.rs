use svg::node::{
    Text as SvgText,
    element::{self as svg_element, Group},
};

use treeflow_core::{color::Color, draw::TextDefinition, geometry::Bounds};

use super::SvgStyle;
use crate::layout::LeveledNode;

/// Horizontal room kept free on each side of a label.
const LABEL_PADDING: f32 = 8.0;

/// Line height relative to the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Render a node box filled and outlined in its level color, with the label
/// wrapped to the box width.
pub fn render_node(node: &LeveledNode, bounds: Bounds, color: Color, style: &SvgStyle) -> Group {
    let rect = svg_element::Rectangle::new()
        .set("x", bounds.min_x())
        .set("y", bounds.min_y())
        .set("width", bounds.width())
        .set("height", bounds.height())
        .set("rx", style.corner_radius)
        .set("fill", color)
        .set("fill-opacity", style.node_fill_opacity)
        .set("stroke", color)
        .set("stroke-width", style.stroke_width);

    let text = style.text();
    let line_height = text.font_size() * LINE_HEIGHT_FACTOR;
    let max_lines = ((bounds.height() / line_height).floor() as usize).max(1);
    let lines = wrap_label(
        node.label(),
        bounds.width() - 2.0 * LABEL_PADDING,
        max_lines,
        text,
    );

    let center = bounds.center();
    let first_baseline = center.y() - line_height * (lines.len() as f32 - 1.0) / 2.0;

    let mut label = svg_element::Text::new("")
        .set("text-anchor", "middle")
        .set("dominant-baseline", "central")
        .set("font-family", text.font_family())
        .set("font-size", text.font_size())
        .set("fill", text.color());

    for (index, line) in lines.iter().enumerate() {
        let tspan = svg_element::TSpan::new("")
            .set("x", center.x())
            .set("y", first_baseline + index as f32 * line_height)
            .add(SvgText::new(line.as_str()));
        label = label.add(tspan);
    }

    Group::new()
        .set("data-node-id", node.id().to_string())
        .add(rect)
        .add(label)
}

/// Greedy word wrap of `label` into at most `max_lines` lines no wider than
/// `max_width`. Words longer than a line are kept whole; overflowing text is
/// cut and the last line ends in an ellipsis.
fn wrap_label(label: &str, max_width: f32, max_lines: usize, text: &TextDefinition) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in label.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if text.estimate_width(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text() -> TextDefinition {
        // 10px per glyph
        TextDefinition::new("sans-serif", 50.0 / 3.0, Color::default())
    }

    #[test]
    fn test_short_label_single_line() {
        assert_eq!(wrap_label("Light", 200.0, 3, &text()), vec!["Light"]);
    }

    #[test]
    fn test_wraps_on_word_boundaries() {
        let lines = wrap_label("carbon dioxide intake", 150.0, 3, &text());
        assert_eq!(lines, vec!["carbon dioxide", "intake"]);
    }

    #[test]
    fn test_overflow_gets_ellipsis() {
        let lines = wrap_label("one two three four", 40.0, 2, &text());
        assert_eq!(lines, vec!["one", "two…"]);
    }

    #[test]
    fn test_empty_label_has_no_lines() {
        assert!(wrap_label("   ", 100.0, 2, &text()).is_empty());
    }
}
