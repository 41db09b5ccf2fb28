//! Edge generation and source slot anchoring.

use log::debug;

use treeflow_core::{
    color::Palette,
    geometry::{Point, Size},
    semantic::Flowchart,
};

use super::{Edge, Levels, SLOT_COUNT};

/// Generate one edge per in-range (parent, child) pair whose endpoints both
/// received a level, in breadth-first order of parents and declaration order
/// of children.
///
/// The `n`-th child of a parent attaches to slot `min(n, SLOT_COUNT - 1)`, and
/// the edge takes the color of the parent's level.
pub(super) fn generate_edges(flowchart: &Flowchart, levels: &Levels, palette: &Palette) -> Vec<Edge> {
    let mut edges = Vec::new();

    for (source, level) in levels.iter() {
        let Some(node) = flowchart.node(source) else {
            continue;
        };
        let color = palette.for_level(level);

        for (position, &target) in node.children().iter().enumerate() {
            if levels.get(target).is_none() {
                debug!(source, target; "Skipping edge to node without a level");
                continue;
            }
            edges.push(Edge {
                source,
                target,
                source_slot: position.min(SLOT_COUNT - 1),
                color,
            });
        }
    }

    edges
}

/// Attachment point of `slot` on the right edge of a node centred at
/// `center`.
///
/// Anchors are spread evenly over the slots the node actually uses, so a node
/// with two children gets anchors at one and two thirds of its height.
pub(super) fn slot_anchor(center: Point, size: Size, slot: usize, children_count: usize) -> Point {
    let used = children_count.min(SLOT_COUNT).max(1);
    let slot = slot.min(used - 1);

    let top = center.y() - size.height() / 2.0;
    let y = top + size.height() * (slot + 1) as f32 / (used + 1) as f32;

    Point::new(center.x() + size.width() / 2.0, y)
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use treeflow_core::semantic::FlowchartNode;

    use super::super::assign_levels;
    use super::*;

    #[test]
    fn test_single_child_anchors_at_middle() {
        let anchor = slot_anchor(Point::new(0.0, 0.0), Size::new(100.0, 60.0), 0, 1);
        assert_eq!(anchor, Point::new(50.0, 0.0));
    }

    #[test]
    fn test_two_children_anchor_at_thirds() {
        let size = Size::new(100.0, 60.0);
        let first = slot_anchor(Point::new(0.0, 0.0), size, 0, 2);
        let second = slot_anchor(Point::new(0.0, 0.0), size, 1, 2);
        assert!(approx_eq!(f32, first.y(), -10.0, epsilon = 0.001));
        assert!(approx_eq!(f32, second.y(), 10.0, epsilon = 0.001));
    }

    #[test]
    fn test_overflow_slots_share_last_anchor() {
        let size = Size::new(100.0, 60.0);
        let center = Point::new(0.0, 0.0);
        assert_eq!(
            slot_anchor(center, size, 3, 7),
            slot_anchor(center, size, SLOT_COUNT - 1, 7)
        );
    }

    #[test]
    fn test_back_edges_in_cycles_are_kept() {
        let flowchart = Flowchart::new(
            "Loop",
            vec![FlowchartNode::new("a", vec![1]), FlowchartNode::new("b", vec![0])],
        );
        let levels = assign_levels(flowchart.nodes());
        let edges = generate_edges(&flowchart, &levels, &Palette::default());

        let pairs: Vec<_> = edges.iter().map(|e| (e.source(), e.target())).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_slot_follows_position_not_target() {
        let flowchart = Flowchart::new(
            "Order",
            vec![
                FlowchartNode::new("r", vec![2, 9, 1]),
                FlowchartNode::leaf("a"),
                FlowchartNode::leaf("b"),
            ],
        );
        let levels = assign_levels(flowchart.nodes());
        let edges = generate_edges(&flowchart, &levels, &Palette::default());

        let slots: Vec<_> = edges.iter().map(|e| (e.target(), e.source_slot())).collect();
        assert_eq!(slots, vec![(2, 0), (1, 2)]);
    }
}
