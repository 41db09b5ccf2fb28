//! Breadth-first level assignment.
//!
//! A node's level is fixed the first time the traversal reaches it, as its
//! parent's level plus one. Nodes are never revisited, so a cycle terminates
//! and a node reachable through several parents keeps the level of the first
//! parent discovered. Children are visited in the order their parent lists
//! them.

use std::collections::VecDeque;

use indexmap::IndexMap;
use log::debug;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use treeflow_core::semantic::FlowchartNode;

/// Levels of the nodes reachable from the root, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Levels {
    levels: IndexMap<usize, usize>,
}

impl Levels {
    /// Level of node `id`, or `None` if it was not reached.
    pub fn get(&self, id: usize) -> Option<usize> {
        self.levels.get(&id).copied()
    }

    /// `(id, level)` pairs in breadth-first discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.levels.iter().map(|(&id, &level)| (id, level))
    }

    /// Number of reached nodes.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of distinct levels (0 when empty).
    pub fn depth(&self) -> usize {
        self.levels.values().max().map_or(0, |max| max + 1)
    }

    /// Node ids grouped by level, each group in discovery order.
    pub fn by_level(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.depth()];
        for (id, level) in self.iter() {
            groups[level].push(id);
        }
        groups
    }
}

/// Assign every node reachable from index `0` its breadth-first distance.
///
/// # Examples
///
/// ```
/// # use treeflow::layout::assign_levels;
/// # use treeflow_core::semantic::FlowchartNode;
/// let nodes = vec![
///     FlowchartNode::new("Light", vec![1, 2]),
///     FlowchartNode::leaf("Water"),
///     FlowchartNode::leaf("CO2"),
/// ];
/// let levels = assign_levels(&nodes);
/// assert_eq!(levels.get(0), Some(0));
/// assert_eq!(levels.get(2), Some(1));
/// ```
pub fn assign_levels(nodes: &[FlowchartNode]) -> Levels {
    let mut levels = IndexMap::with_capacity(nodes.len());
    if nodes.is_empty() {
        return Levels { levels };
    }

    let graph = build_graph(nodes);
    let root = NodeIndex::new(0);

    levels.insert(root.index(), 0);
    let mut queue = VecDeque::from([root]);

    while let Some(current) = queue.pop_front() {
        let current_level = levels[&current.index()];

        for child in ordered_children(&graph, current) {
            if levels.contains_key(&child.index()) {
                continue;
            }
            levels.insert(child.index(), current_level + 1);
            queue.push_back(child);
        }
    }

    Levels { levels }
}

/// Build a directed graph with one node per flowchart node (same index) and
/// one edge per in-range child reference, weighted by its position in the
/// parent's children list.
pub(super) fn build_graph(nodes: &[FlowchartNode]) -> DiGraph<usize, usize> {
    let mut graph = DiGraph::with_capacity(nodes.len(), nodes.len());
    for id in 0..nodes.len() {
        graph.add_node(id);
    }

    for (parent, node) in nodes.iter().enumerate() {
        for (position, &child) in node.children().iter().enumerate() {
            if child >= nodes.len() {
                debug!(parent, child, nodes_count = nodes.len(); "Skipping dangling child reference");
                continue;
            }
            graph.add_edge(NodeIndex::new(parent), NodeIndex::new(child), position);
        }
    }

    graph
}

/// Children of `node` in declaration order.
///
/// petgraph yields outgoing edges most-recent first, so they are re-sorted
/// by the stored position.
pub(super) fn ordered_children(
    graph: &DiGraph<usize, usize>,
    node: NodeIndex,
) -> impl Iterator<Item = NodeIndex> {
    let mut edges: Vec<_> = graph
        .edges_directed(node, Direction::Outgoing)
        .map(|edge| (*edge.weight(), edge.target()))
        .collect();
    edges.sort_unstable_by_key(|(position, _)| *position);
    edges.into_iter().map(|(_, target)| target)
}


#[cfg(test)]
mod proptest_tests {
    use std::collections::VecDeque;

    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    /// Random trees: node `i > 0` hangs under a parent with a smaller index.
    fn tree_strategy() -> impl Strategy<Value = Vec<FlowchartNode>> {
        (1usize..40)
            .prop_flat_map(|len| {
                let parents: Vec<_> = (1..len).map(|i| 0..i).collect();
                (Just(len), parents)
            })
            .prop_map(|(len, parents)| {
                let mut children = vec![Vec::new(); len];
                for (offset, parent) in parents.into_iter().enumerate() {
                    children[parent].push(offset + 1);
                }
                children
                    .into_iter()
                    .enumerate()
                    .map(|(i, c)| FlowchartNode::new(format!("n{i}"), c))
                    .collect()
            })
    }

    /// Arbitrary graphs, cycles and dangling references included.
    fn graph_strategy() -> impl Strategy<Value = Vec<FlowchartNode>> {
        (1usize..25).prop_flat_map(|len| {
            proptest::collection::vec(proptest::collection::vec(0..len + 3, 0..5), len).prop_map(
                |lists| {
                    lists
                        .into_iter()
                        .map(|c| FlowchartNode::new("n", c))
                        .collect()
                },
            )
        })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Reference shortest-path distances ignoring dangling references.
    fn reference_distances(nodes: &[FlowchartNode]) -> Vec<Option<usize>> {
        let mut dist = vec![None; nodes.len()];
        dist[0] = Some(0);
        let mut queue = VecDeque::from([0usize]);
        while let Some(current) = queue.pop_front() {
            for &child in nodes[current].children() {
                if child < nodes.len() && dist[child].is_none() {
                    dist[child] = dist[current].map(|d| d + 1);
                    queue.push_back(child);
                }
            }
        }
        dist
    }

    /// On trees every node is reached and its level is its depth.
    fn check_tree_levels_are_bfs_distances(nodes: &[FlowchartNode]) -> Result<(), TestCaseError> {
        let levels = assign_levels(nodes);
        prop_assert_eq!(levels.len(), nodes.len());
        let expected = reference_distances(nodes);
        for (id, dist) in expected.into_iter().enumerate() {
            prop_assert_eq!(levels.get(id), dist);
        }
        Ok(())
    }

    /// On any graph the traversal terminates, assigns each node at most once,
    /// and levels equal shortest distances from the root.
    fn check_graph_levels(nodes: &[FlowchartNode]) -> Result<(), TestCaseError> {
        let levels = assign_levels(nodes);
        prop_assert!(levels.len() <= nodes.len());

        let expected = reference_distances(nodes);
        for (id, dist) in expected.into_iter().enumerate() {
            prop_assert_eq!(levels.get(id), dist);
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn tree_levels_are_bfs_distances(nodes in tree_strategy()) {
            check_tree_levels_are_bfs_distances(&nodes)?;
        }

        #[test]
        fn graph_levels_terminate_and_match_shortest_distance(nodes in graph_strategy()) {
            check_graph_levels(&nodes)?;
        }
    }
}
