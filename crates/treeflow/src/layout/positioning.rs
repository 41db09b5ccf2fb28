//! Column and row placement of leveled nodes.

use std::collections::HashMap;

use treeflow_core::{geometry::Point, semantic::Flowchart};

use super::Levels;

/// Fan-out above which a node reserves extra vertical room.
const FAN_OUT_THRESHOLD: usize = 2;

/// Spacing parameters for [`position_nodes`].
#[derive(Debug, Clone, Copy)]
pub(super) struct Spacing {
    pub column_width: f32,
    pub row_spacing: f32,
    pub fan_out_padding: f32,
}

impl Spacing {
    /// Vertical room reserved for a node with `children_count` children.
    fn slot_height(self, children_count: usize) -> f32 {
        let extra = children_count.saturating_sub(FAN_OUT_THRESHOLD);
        self.row_spacing + extra as f32 * self.fan_out_padding
    }
}

/// Compute the center of every leveled node.
///
/// `x` is `level * column_width`. Within a column, nodes are stacked top to
/// bottom in discovery order, each taking [`Spacing::slot_height`] and sitting
/// in the middle of its share; the column as a whole is centred on `y = 0`.
pub(super) fn position_nodes(
    flowchart: &Flowchart,
    levels: &Levels,
    spacing: Spacing,
) -> HashMap<usize, Point> {
    let mut positions = HashMap::with_capacity(levels.len());

    for (level, column) in levels.by_level().iter().enumerate() {
        let heights: Vec<f32> = column
            .iter()
            .map(|&id| spacing.slot_height(flowchart.nodes()[id].children().len()))
            .collect();
        let total: f32 = heights.iter().sum();

        let x = level as f32 * spacing.column_width;
        let mut top = -total / 2.0;
        for (&id, height) in column.iter().zip(heights) {
            positions.insert(id, Point::new(x, top + height / 2.0));
            top += height;
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use treeflow_core::semantic::FlowchartNode;

    use super::super::assign_levels;
    use super::*;

    const SPACING: Spacing = Spacing {
        column_width: 200.0,
        row_spacing: 100.0,
        fan_out_padding: 10.0,
    };

    fn positions_of(nodes: Vec<FlowchartNode>) -> HashMap<usize, Point> {
        let flowchart = Flowchart::new("t", nodes);
        let levels = assign_levels(flowchart.nodes());
        position_nodes(&flowchart, &levels, SPACING)
    }

    #[test]
    fn test_slot_height_threshold() {
        assert_eq!(SPACING.slot_height(0), 100.0);
        assert_eq!(SPACING.slot_height(2), 100.0);
        assert_eq!(SPACING.slot_height(3), 110.0);
        assert_eq!(SPACING.slot_height(6), 140.0);
    }

    #[test]
    fn test_single_node_at_origin() {
        let positions = positions_of(vec![FlowchartNode::leaf("only")]);
        assert_eq!(positions[&0], Point::new(0.0, 0.0));
    }

    #[test]
    fn test_three_siblings_evenly_spaced() {
        let positions = positions_of(vec![
            FlowchartNode::new("r", vec![1, 2, 3]),
            FlowchartNode::leaf("a"),
            FlowchartNode::leaf("b"),
            FlowchartNode::leaf("c"),
        ]);

        assert!(approx_eq!(f32, positions[&1].y(), -100.0, epsilon = 0.001));
        assert!(approx_eq!(f32, positions[&2].y(), 0.0, epsilon = 0.001));
        assert!(approx_eq!(f32, positions[&3].y(), 100.0, epsilon = 0.001));
        assert_eq!(positions[&3].x(), 200.0);
    }

    #[test]
    fn test_unreached_nodes_have_no_position() {
        let positions = positions_of(vec![FlowchartNode::leaf("r"), FlowchartNode::leaf("x")]);
        assert_eq!(positions.len(), 1);
        assert!(!positions.contains_key(&1));
    }
}
