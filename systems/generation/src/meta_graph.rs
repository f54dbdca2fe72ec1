//! Graph whose nodes are the connected components of an open-cell topology.

use std::collections::BTreeMap;

use maze_chase_core::{ComponentId, VertexId};
use maze_chase_graph::{Adjacency, Components, Topology};

/// Pair of vertices from two components separated by a single wall cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bridge {
    from: VertexId,
    to: VertexId,
    squared_distance: u32,
}

impl Bridge {
    /// Vertex belonging to the component with the smaller identifier.
    #[must_use]
    pub const fn from(&self) -> VertexId {
        self.from
    }

    /// Vertex belonging to the component with the larger identifier.
    #[must_use]
    pub const fn to(&self) -> VertexId {
        self.to
    }

    /// Squared distance between the endpoints, either 2 or 4.
    #[must_use]
    pub const fn squared_distance(&self) -> u32 {
        self.squared_distance
    }
}

/// Components linked whenever a single wall cell separates them.
#[derive(Clone, Debug, Default)]
pub struct MetaGraph {
    adjacency: Adjacency<ComponentId>,
    bridges: BTreeMap<(ComponentId, ComponentId), Bridge>,
}

impl MetaGraph {
    /// Scans every pair of components for a bridging vertex pair.
    ///
    /// Pairs are visited in ascending component order and, within a pair, in
    /// ascending vertex order; the first pair at squared distance 2 or 4 is
    /// kept as the bridge.
    #[must_use]
    pub fn build(components: &Components, topology: &Topology) -> Self {
        let mut adjacency = Adjacency::with_nodes(components.ids());
        let mut bridges = BTreeMap::new();
        let listed: Vec<_> = components.iter().collect();

        for (position, &(a, members_a)) in listed.iter().enumerate() {
            for &(b, members_b) in &listed[position + 1..] {
                let found = members_a.iter().find_map(|&u| {
                    let coord_u = topology.coord(u)?;
                    members_b.iter().find_map(|&v| {
                        let distance = coord_u.squared_distance(topology.coord(v)?);
                        (distance == 2 || distance == 4).then_some(Bridge {
                            from: u,
                            to: v,
                            squared_distance: distance,
                        })
                    })
                });

                if let Some(bridge) = found {
                    adjacency.insert_link(a, b);
                    let _ = bridges.insert((a, b), bridge);
                }
            }
        }

        Self { adjacency, bridges }
    }

    /// Bridge between two components, independent of argument order.
    #[must_use]
    pub fn bridge(&self, a: ComponentId, b: ComponentId) -> Option<Bridge> {
        self.bridges
            .get(&(a, b))
            .or_else(|| self.bridges.get(&(b, a)))
            .copied()
    }

    /// Component-level adjacency.
    #[must_use]
    pub fn adjacency(&self) -> &Adjacency<ComponentId> {
        &self.adjacency
    }

    /// Number of meta-edges.
    #[must_use]
    pub fn bridge_count(&self) -> usize {
        self.bridges.len()
    }
}
