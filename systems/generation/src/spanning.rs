//! Spanning tree over the component meta-graph.

use std::collections::BTreeSet;

use maze_chase_core::ComponentId;
use maze_chase_graph::Adjacency;

/// Builds a spanning tree of the nodes reachable from `root`.
///
/// The walk pops components off a stack. A newly visited component is
/// linked to the previously visited one when they are adjacent, otherwise
/// to its first already-visited neighbour. The root contributes no edge, so
/// a connected meta-graph with `k` components yields `k - 1` edges.
#[must_use]
pub fn dfs_tree(
    adjacency: &Adjacency<ComponentId>,
    root: ComponentId,
) -> Vec<(ComponentId, ComponentId)> {
    let mut visited = BTreeSet::new();
    let mut tree = Vec::new();
    let mut prev = root;
    let mut stack = vec![root];

    while let Some(component) = stack.pop() {
        if !visited.insert(component) {
            continue;
        }

        if adjacency.contains_link(prev, component) {
            tree.push((prev, component));
        } else if let Some(anchor) = adjacency
            .neighbors(component)
            .find(|neighbor| visited.contains(neighbor))
        {
            tree.push((anchor, component));
        }

        prev = component;
        stack.extend(adjacency.neighbors(component));
    }

    tree
}
