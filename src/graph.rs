//! Conflict graph over events.
//!
//! Vertices are event indices. An edge joins two events that must never
//! share a slot because they have the same professor, the same group or
//! the same room. The graph is built once and is read-only during search:
//! the set of potential conflicts never changes, only which of them are
//! currently violated.
//!
//! # Representation
//! One ordered neighbor set per vertex. `has_edge` is O(log degree) and
//! neighbors iterate in ascending order, which keeps every consumer
//! deterministic.

use std::collections::{BTreeSet, HashMap};

use crate::models::{Event, EventId};

/// Undirected graph of events that cannot share a slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictGraph {
    adjacency: Vec<BTreeSet<EventId>>,
    edge_count: usize,
}

impl ConflictGraph {
    /// Creates a graph with `vertices` isolated vertices.
    pub fn new(vertices: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); vertices],
            edge_count: 0,
        }
    }

    /// Builds the graph for a set of events.
    ///
    /// Every pair of events sharing a professor, a group or a room is
    /// joined. Pairs sharing several resources still get a single edge.
    pub fn from_events(events: &[Event]) -> Self {
        let mut graph = Self::new(events.len());
        let mut by_professor: HashMap<u32, Vec<EventId>> = HashMap::new();
        let mut by_group: HashMap<u32, Vec<EventId>> = HashMap::new();
        let mut by_room: HashMap<u32, Vec<EventId>> = HashMap::new();

        for (idx, event) in events.iter().enumerate() {
            by_professor.entry(event.professor_id).or_default().push(idx);
            by_group.entry(event.group_id).or_default().push(idx);
            by_room.entry(event.room_id).or_default().push(idx);
        }

        for members in by_professor
            .values()
            .chain(by_group.values())
            .chain(by_room.values())
        {
            for (i, &u) in members.iter().enumerate() {
                for &v in &members[i + 1..] {
                    graph.add_edge(u, v);
                }
            }
        }

        graph
    }

    /// Adds an undirected edge.
    ///
    /// Idempotent: returns `false` and changes nothing if the edge already
    /// exists. Self-loops are ignored.
    ///
    /// # Panics
    /// Panics if either vertex is out of range.
    pub fn add_edge(&mut self, u: EventId, v: EventId) -> bool {
        assert!(
            u < self.adjacency.len() && v < self.adjacency.len(),
            "edge ({u}, {v}) out of range for {} vertices",
            self.adjacency.len()
        );
        if u == v || !self.adjacency[u].insert(v) {
            return false;
        }
        self.adjacency[v].insert(u);
        self.edge_count += 1;
        true
    }

    /// Whether `u` and `v` are adjacent. Out-of-range vertices have no edges.
    pub fn has_edge(&self, u: EventId, v: EventId) -> bool {
        self.adjacency.get(u).is_some_and(|n| n.contains(&v))
    }

    /// Neighbors of `u` in ascending order.
    pub fn neighbors(&self, u: EventId) -> impl Iterator<Item = EventId> + '_ {
        self.adjacency.get(u).into_iter().flatten().copied()
    }

    /// Number of neighbors of `u`.
    pub fn degree(&self, u: EventId) -> usize {
        self.adjacency.get(u).map_or(0, BTreeSet::len)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Every edge once, as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (EventId, EventId)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(u, neighbors)| {
            neighbors.range(u + 1..).map(move |&v| (u, v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Slot, Subject};
    use proptest::prelude::*;

    fn event(id: EventId, professor: u32, group: u32, room: u32) -> Event {
        let subject = Subject::new(id as u32, 1, group, professor);
        Event::for_subject(id, &subject, room).with_slot(Slot::from_id(0))
    }

    #[test]
    fn test_add_edge_is_undirected() {
        let mut g = ConflictGraph::new(4);
        assert!(g.add_edge(0, 2));
        assert!(g.has_edge(0, 2));
        assert!(g.has_edge(2, 0));
        assert!(!g.has_edge(0, 1));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_add_edge_idempotent() {
        let mut g = ConflictGraph::new(3);
        g.add_edge(0, 1);
        assert!(!g.add_edge(0, 1));
        assert!(!g.add_edge(1, 0));
        assert_eq!(g.degree(0), 1);
        assert_eq!(g.degree(1), 1);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_self_loop_ignored() {
        let mut g = ConflictGraph::new(2);
        assert!(!g.add_edge(1, 1));
        assert_eq!(g.degree(1), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_add_edge_out_of_range() {
        let mut g = ConflictGraph::new(2);
        g.add_edge(0, 5);
    }

    #[test]
    fn test_neighbors_sorted() {
        let mut g = ConflictGraph::new(5);
        g.add_edge(2, 4);
        g.add_edge(2, 0);
        g.add_edge(3, 2);
        assert_eq!(g.neighbors(2).collect::<Vec<_>>(), vec![0, 3, 4]);
        assert_eq!(g.neighbors(9).count(), 0);
    }

    #[test]
    fn test_edges_listed_once() {
        let mut g = ConflictGraph::new(4);
        g.add_edge(0, 1);
        g.add_edge(3, 1);
        g.add_edge(2, 0);
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(0, 1), (0, 2), (1, 3)]);
    }

    #[test]
    fn test_from_events_shared_resources() {
        let events = vec![
            event(0, 0, 0, 0), // professor 0, group 0, room 0
            event(1, 0, 1, 1), // shares professor with 0
            event(2, 1, 0, 2), // shares group with 0
            event(3, 2, 2, 0), // shares room with 0
            event(4, 3, 3, 3), // isolated
            event(5, 0, 0, 0), // shares everything with 0
        ];
        let g = ConflictGraph::from_events(&events);
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(0, 2));
        assert!(g.has_edge(0, 3));
        assert!(!g.has_edge(1, 2));
        assert_eq!(g.degree(4), 0);
        // One edge for 0-5 even though three resources are shared.
        assert!(g.has_edge(0, 5));
        assert_eq!(g.neighbors(0).collect::<Vec<_>>(), vec![1, 2, 3, 5]);
    }

    proptest! {
        #[test]
        fn prop_symmetric_and_idempotent(
            edges in proptest::collection::vec((0usize..20, 0usize..20), 0..60)
        ) {
            let mut g = ConflictGraph::new(20);
            for &(u, v) in &edges {
                g.add_edge(u, v);
            }
            for u in 0..20 {
                for v in 0..20 {
                    prop_assert_eq!(g.has_edge(u, v), g.has_edge(v, u));
                }
            }

            let degrees: Vec<usize> = (0..20).map(|u| g.degree(u)).collect();
            let count = g.edge_count();
            for &(u, v) in &edges {
                g.add_edge(u, v);
            }
            let again: Vec<usize> = (0..20).map(|u| g.degree(u)).collect();
            prop_assert_eq!(degrees, again);
            prop_assert_eq!(count, g.edge_count());
            prop_assert_eq!(g.edges().count(), g.edge_count());
        }
    }
}
