//! Connected-component analysis over a [`Topology`].

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use maze_chase_core::{ComponentId, VertexId};

use crate::{Topology, UnionFind};

/// Partition of a topology's vertices into connected components.
///
/// Identifiers are assigned in ascending order of each component's smallest
/// vertex, so both analyzers number the same partition identically. Compare
/// partitions through [`Components::canonical`] when numbering may differ.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Components {
    sets: BTreeMap<ComponentId, BTreeSet<VertexId>>,
}

impl Components {
    /// Numbers the provided vertex sets in iteration order.
    #[must_use]
    pub fn from_sets(sets: impl IntoIterator<Item = BTreeSet<VertexId>>) -> Self {
        Self {
            sets: sets
                .into_iter()
                .zip(0_u32..)
                .map(|(set, index)| (ComponentId::new(index), set))
                .collect(),
        }
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Reports whether the partition holds no component.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Members of a component.
    #[must_use]
    pub fn get(&self, id: ComponentId) -> Option<&BTreeSet<VertexId>> {
        self.sets.get(&id)
    }

    /// Component identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.sets.keys().copied()
    }

    /// Components with their members in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &BTreeSet<VertexId>)> + '_ {
        self.sets.iter().map(|(&id, members)| (id, members))
    }

    /// Component holding the vertex.
    #[must_use]
    pub fn component_of(&self, vertex: VertexId) -> Option<ComponentId> {
        self.sets
            .iter()
            .find(|(_, members)| members.contains(&vertex))
            .map(|(&id, _)| id)
    }

    /// Numbering-independent form of the partition.
    #[must_use]
    pub fn canonical(&self) -> BTreeSet<BTreeSet<VertexId>> {
        self.sets.values().cloned().collect()
    }

    /// Reports whether the components are disjoint and cover every vertex.
    #[must_use]
    pub fn covers_exactly(&self, topology: &Topology) -> bool {
        let mut seen = BTreeSet::new();
        for members in self.sets.values() {
            for &vertex in members {
                if !seen.insert(vertex) {
                    return false;
                }
            }
        }
        seen.into_iter().eq(topology.vertices())
    }
}

/// Partitions the topology by repeated iterative depth-first search.
#[must_use]
pub fn components_by_dfs(topology: &Topology) -> Components {
    let mut unassigned: BTreeSet<VertexId> = topology.vertices().collect();
    let mut sets = Vec::new();

    while let Some(seed) = unassigned.pop_first() {
        let mut visited = BTreeSet::from([seed]);
        let mut stack = vec![seed];

        while let Some(vertex) = stack.pop() {
            for neighbor in topology.neighbors(vertex) {
                if visited.insert(neighbor) {
                    let _ = unassigned.remove(&neighbor);
                    stack.push(neighbor);
                }
            }
        }

        sets.push(visited);
    }

    let components = Components::from_sets(sets);
    debug_assert!(components.covers_exactly(topology));
    debug!("depth-first search found {} components", components.len());
    components
}

/// Partitions the topology by merging the endpoints of every link.
#[must_use]
pub fn components_by_union_find(topology: &Topology) -> Components {
    let mut forest = UnionFind::new(topology.vertices());
    for (a, b) in topology.links() {
        let _ = forest.union(a, b);
    }

    let components = Components::from_sets(forest.into_component_sets());
    debug_assert!(components.covers_exactly(topology));
    debug!("union-find found {} components", components.len());
    components
}
