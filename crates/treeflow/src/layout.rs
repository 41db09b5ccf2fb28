//! Leveled left-to-right layout for flowcharts.
//!
//! Layout runs in three passes over a [`Flowchart`]:
//!
//! 1. [`assign_levels`] - breadth-first distance from node `0`
//! 2. positioning - columns by level, rows centred around `y = 0`
//! 3. edge generation - one [`Edge`] per (parent, child) pair, fanned out
//!    over at most [`SLOT_COUNT`] attachment slots
//!
//! Layout is total: an empty document gives an empty [`FlowLayout`], dangling
//! child references are skipped and unreachable nodes are left out.

mod edges;
mod levels;
mod positioning;

pub use levels::{Levels, assign_levels};

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, info, trace};

use treeflow_core::{
    color::{Color, Palette},
    geometry::{Bounds, Point, Size},
    semantic::Flowchart,
};

use crate::config::LayoutConfig;

/// Number of discrete attachment points on a node's right edge.
pub const SLOT_COUNT: usize = 4;

/// A node that received a level, with its computed center position.
#[derive(Debug, Clone, PartialEq)]
pub struct LeveledNode {
    id: usize,
    label: String,
    level: usize,
    children_count: usize,
    position: Point,
}

impl LeveledNode {
    /// Index of the node in the source document.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Breadth-first distance from the root.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Number of entries in the node's `children` list, dangling ones included.
    pub fn children_count(&self) -> usize {
        self.children_count
    }

    /// Center of the node box.
    pub fn position(&self) -> Point {
        self.position
    }
}

/// A drawn connection from a parent to one of its children.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: usize,
    target: usize,
    source_slot: usize,
    color: Color,
}

impl Edge {
    pub fn source(&self) -> usize {
        self.source
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Attachment slot on the source node, in `0..SLOT_COUNT`.
    pub fn source_slot(&self) -> usize {
        self.source_slot
    }

    /// Color of the source node's level.
    pub fn color(&self) -> Color {
        self.color
    }
}

/// The derived, positioned form of a flowchart.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLayout {
    /// Keyed by document index, in breadth-first discovery order.
    nodes: IndexMap<usize, LeveledNode>,
    edges: Vec<Edge>,
    node_size: Size,
    palette: Palette,
}

impl FlowLayout {
    /// Nodes in breadth-first discovery order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &LeveledNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Size of every node box.
    pub fn node_size(&self) -> Size {
        self.node_size
    }

    /// Palette used to color levels.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a laid-out node by its document index.
    pub fn node(&self, id: usize) -> Option<&LeveledNode> {
        self.nodes.get(&id)
    }

    /// Level of the node with document index `id`, if it was reached.
    pub fn level_of(&self, id: usize) -> Option<usize> {
        self.node(id).map(LeveledNode::level)
    }

    /// Number of laid-out nodes on `level`.
    pub fn count_at_level(&self, level: usize) -> usize {
        self.nodes.values().filter(|node| node.level == level).count()
    }

    /// Color assigned to `level`.
    pub fn level_color(&self, level: usize) -> Color {
        self.palette.for_level(level)
    }

    /// Box of a node.
    pub fn node_bounds(&self, node: &LeveledNode) -> Bounds {
        node.position.to_bounds(self.node_size)
    }

    /// Smallest bounds containing every node box, or `None` when empty.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::union_all(self.nodes.values().map(|node| self.node_bounds(node)))
    }

    /// Start and end points of an edge: the source slot anchor on the right
    /// edge and the middle of the target's left edge.
    ///
    /// Returns `None` if either endpoint is not part of the layout.
    pub fn edge_endpoints(&self, edge: &Edge) -> Option<(Point, Point)> {
        let source = self.node(edge.source)?;
        let target = self.node(edge.target)?;

        let start = edges::slot_anchor(
            source.position,
            self.node_size,
            edge.source_slot,
            source.children_count,
        );
        let end = Point::new(
            target.position.x() - self.node_size.width() / 2.0,
            target.position.y(),
        );

        Some((start, end))
    }

    /// Returns a copy with per-node offsets added to the computed positions.
    ///
    /// Used for nodes the user dragged in the interactive view; ids without an
    /// offset keep their computed position.
    pub fn with_offsets(&self, offsets: &HashMap<usize, Point>) -> Self {
        let mut moved = self.clone();
        for (id, offset) in offsets {
            if let Some(node) = moved.nodes.get_mut(id) {
                node.position = node.position.add_point(*offset);
            }
        }
        moved
    }
}

/// Layout engine holding the geometry parameters and palette.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    column_width: f32,
    row_spacing: f32,
    fan_out_padding: f32,
    node_size: Size,
    palette: Palette,
}

impl LayoutEngine {
    /// Create an engine from layout settings and a palette.
    pub fn new(config: &LayoutConfig, palette: Palette) -> Self {
        Self {
            column_width: config.column_width(),
            row_spacing: config.row_spacing(),
            fan_out_padding: config.fan_out_padding(),
            node_size: config.node_size(),
            palette,
        }
    }

    /// Set the horizontal distance between levels
    pub fn with_column_width(mut self, column_width: f32) -> Self {
        self.column_width = column_width;
        self
    }

    /// Set the base vertical space per node
    pub fn with_row_spacing(mut self, row_spacing: f32) -> Self {
        self.row_spacing = row_spacing;
        self
    }

    /// Set the extra vertical space per child beyond the second
    pub fn with_fan_out_padding(mut self, fan_out_padding: f32) -> Self {
        self.fan_out_padding = fan_out_padding;
        self
    }

    /// Compute the leveled layout of `flowchart`.
    pub fn calculate(&self, flowchart: &Flowchart) -> FlowLayout {
        info!(nodes_count = flowchart.nodes().len(); "Calculating flowchart layout");

        let levels = assign_levels(flowchart.nodes());

        let unreachable = flowchart.nodes().len() - levels.len();
        if unreachable > 0 {
            debug!(unreachable_count = unreachable; "Nodes unreachable from the root were left out");
        }

        let positions = positioning::position_nodes(
            flowchart,
            &levels,
            positioning::Spacing {
                column_width: self.column_width,
                row_spacing: self.row_spacing,
                fan_out_padding: self.fan_out_padding,
            },
        );

        let nodes: IndexMap<usize, LeveledNode> = levels
            .iter()
            .map(|(id, level)| {
                let node = &flowchart.nodes()[id];
                let leveled = LeveledNode {
                    id,
                    label: node.label().to_string(),
                    level,
                    children_count: node.children().len(),
                    position: positions[&id],
                };
                (id, leveled)
            })
            .collect();

        let edges = edges::generate_edges(flowchart, &levels, &self.palette);

        debug!(
            nodes_count = nodes.len(),
            edges_count = edges.len(),
            depth = levels.depth();
            "Layout calculated"
        );
        trace!(nodes:?, edges:?; "Layout result");

        FlowLayout {
            nodes,
            edges,
            node_size: self.node_size,
            palette: self.palette.clone(),
        }
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(&LayoutConfig::default(), Palette::default())
    }
}
