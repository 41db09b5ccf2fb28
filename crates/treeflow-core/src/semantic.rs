//! Semantic flowchart model.
//!
//! These types are what the parser produces and what the layout engine
//! consumes:
//!
//! ```text
//! JSON document
//!     ↓ treeflow-parser
//! Flowchart (these types)
//!     ↓ layout
//! FlowLayout (leveled nodes + slotted edges)
//!     ↓ export
//! SVG / PNG
//! ```
//!
//! Node `0` is always the root. Child references are plain indices into the
//! node list and are *not* validated here; an index past the end of the list
//! is a dangling reference that layout skips.

/// A single flowchart node: a label and the indices of its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowchartNode {
    label: String,
    children: Vec<usize>,
}

impl FlowchartNode {
    /// Create a node with the given label and child indices.
    ///
    /// # Examples
    ///
    /// ```
    /// # use treeflow_core::semantic::FlowchartNode;
    /// let node = FlowchartNode::new("Light", vec![1, 2]);
    /// assert_eq!(node.label(), "Light");
    /// assert_eq!(node.children(), &[1, 2]);
    /// ```
    pub fn new(label: impl Into<String>, children: Vec<usize>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// Create a node without children.
    pub fn leaf(label: impl Into<String>) -> Self {
        Self::new(label, Vec::new())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Child indices in declaration order.
    pub fn children(&self) -> &[usize] {
        &self.children
    }
}

/// A titled flowchart document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flowchart {
    title: String,
    nodes: Vec<FlowchartNode>,
}

impl Flowchart {
    pub fn new(title: impl Into<String>, nodes: Vec<FlowchartNode>) -> Self {
        Self {
            title: title.into(),
            nodes,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn nodes(&self) -> &[FlowchartNode] {
        &self.nodes
    }

    /// Returns the node at `index`, or `None` for a dangling reference.
    pub fn node(&self, index: usize) -> Option<&FlowchartNode> {
        self.nodes.get(index)
    }

    /// The root node, if the document has any nodes.
    pub fn root(&self) -> Option<&FlowchartNode> {
        self.nodes.first()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flowchart_accessors() {
        let flowchart = Flowchart::new(
            "Photosynthesis",
            vec![
                FlowchartNode::new("Light", vec![1, 2]),
                FlowchartNode::leaf("Water"),
                FlowchartNode::leaf("CO2"),
            ],
        );

        assert_eq!(flowchart.title(), "Photosynthesis");
        assert_eq!(flowchart.nodes().len(), 3);
        assert_eq!(flowchart.root().map(FlowchartNode::label), Some("Light"));
        assert_eq!(flowchart.node(2).map(FlowchartNode::label), Some("CO2"));
        assert!(flowchart.node(3).is_none());
        assert!(!flowchart.is_empty());
    }

    #[test]
    fn test_empty_flowchart() {
        let flowchart = Flowchart::default();
        assert!(flowchart.is_empty());
        assert!(flowchart.root().is_none());
        assert_eq!(flowchart.title(), "");
    }
}
