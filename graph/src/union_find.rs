//! Disjoint-set forest over topology vertices.

use std::collections::{BTreeMap, BTreeSet};

use maze_chase_core::VertexId;

/// Disjoint-set forest using union by rank and path compression.
#[derive(Clone, Debug)]
pub struct UnionFind {
    slots: BTreeMap<VertexId, usize>,
    members: Vec<VertexId>,
    parent: Vec<usize>,
    rank: Vec<u8>,
    sets: usize,
}

impl UnionFind {
    /// Creates one singleton set per vertex.
    #[must_use]
    pub fn new(vertices: impl IntoIterator<Item = VertexId>) -> Self {
        let members: Vec<VertexId> = vertices
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let slots = members
            .iter()
            .enumerate()
            .map(|(slot, &vertex)| (vertex, slot))
            .collect();
        let count = members.len();

        Self {
            slots,
            members,
            parent: (0..count).collect(),
            rank: vec![0; count],
            sets: count,
        }
    }

    /// Representative of the set holding the vertex.
    ///
    /// Returns `None` for vertices the forest was not created with.
    pub fn find(&mut self, vertex: VertexId) -> Option<VertexId> {
        let slot = *self.slots.get(&vertex)?;
        let root = self.root(slot);
        Some(self.members[root])
    }

    /// Merges the sets holding both vertices.
    ///
    /// Returns `true` when two distinct sets were merged.
    pub fn union(&mut self, a: VertexId, b: VertexId) -> bool {
        let (Some(&slot_a), Some(&slot_b)) = (self.slots.get(&a), self.slots.get(&b)) else {
            return false;
        };
        let root_a = self.root(slot_a);
        let root_b = self.root(slot_b);
        if root_a == root_b {
            return false;
        }

        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] = self.rank[root_a].saturating_add(1);
            }
        }
        self.sets -= 1;
        true
    }

    /// Number of disjoint sets currently tracked.
    #[must_use]
    pub fn set_count(&self) -> usize {
        self.sets
    }

    /// Groups the vertices by representative.
    ///
    /// Sets are ordered by their smallest member.
    #[must_use]
    pub fn into_component_sets(mut self) -> Vec<BTreeSet<VertexId>> {
        let mut groups: BTreeMap<usize, BTreeSet<VertexId>> = BTreeMap::new();
        for slot in 0..self.members.len() {
            let root = self.root(slot);
            let _ = groups.entry(root).or_default().insert(self.members[slot]);
        }

        let mut sets: Vec<BTreeSet<VertexId>> = groups.into_values().collect();
        sets.sort_by_key(|set| set.first().copied());
        sets
    }

    fn root(&mut self, slot: usize) -> usize {
        let mut root = slot;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = slot;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[u32]) -> Vec<VertexId> {
        values.iter().copied().map(VertexId::new).collect()
    }

    #[test]
    fn union_merges_sets_once() {
        let mut forest = UnionFind::new(ids(&[0, 1, 2, 3]));
        assert_eq!(forest.set_count(), 4);
        assert!(forest.union(VertexId::new(0), VertexId::new(1)));
        assert!(!forest.union(VertexId::new(1), VertexId::new(0)));
        assert!(forest.union(VertexId::new(2), VertexId::new(3)));
        assert!(forest.union(VertexId::new(3), VertexId::new(0)));
        assert_eq!(forest.set_count(), 1);
        assert_eq!(
            forest.find(VertexId::new(2)),
            forest.find(VertexId::new(1))
        );
    }

    #[test]
    fn unknown_vertices_are_ignored() {
        let mut forest = UnionFind::new(ids(&[4, 5]));
        assert_eq!(forest.find(VertexId::new(9)), None);
        assert!(!forest.union(VertexId::new(4), VertexId::new(9)));
        assert_eq!(forest.set_count(), 2);
    }

    #[test]
    fn component_sets_are_ordered_by_smallest_member() {
        let mut forest = UnionFind::new(ids(&[0, 1, 2, 3, 4]));
        let _ = forest.union(VertexId::new(4), VertexId::new(1));
        let _ = forest.union(VertexId::new(3), VertexId::new(2));

        let sets = forest.into_component_sets();
        let expected: Vec<BTreeSet<VertexId>> = vec![
            ids(&[0]).into_iter().collect(),
            ids(&[1, 4]).into_iter().collect(),
            ids(&[2, 3]).into_iter().collect(),
        ];
        assert_eq!(sets, expected);
    }
}
