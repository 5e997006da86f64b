//! Candidate move generation.
//!
//! A move reassigns one event to another slot. Candidate events are
//! chosen by the policy, then every alternative slot is proposed.
//! Candidates come out ordered by event id, then destination slot id.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::evaluation::Evaluator;
use crate::models::{Event, EventId, Move, Slot};

/// Which events the search tries to move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborhoodPolicy {
    /// Events in a slot collision while any exist, otherwise every event.
    #[default]
    ConflictFocused,
    /// Every event, every iteration.
    Full,
}

impl NeighborhoodPolicy {
    /// Events eligible for a move, ascending.
    pub fn candidate_events(&self, evaluator: &Evaluator<'_>, events: &[Event]) -> Vec<EventId> {
        match self {
            NeighborhoodPolicy::ConflictFocused => {
                let conflicting = evaluator.conflicting_events(events);
                if conflicting.is_empty() {
                    (0..events.len()).collect()
                } else {
                    conflicting
                }
            }
            NeighborhoodPolicy::Full => (0..events.len()).collect(),
        }
    }
}

/// Reduces `candidates` to a seeded random subset of at most `limit`,
/// keeping ascending order.
pub fn sample_events(candidates: &mut Vec<EventId>, limit: usize, rng: &mut SmallRng) {
    if candidates.len() <= limit {
        return;
    }
    candidates.shuffle(rng);
    candidates.truncate(limit);
    candidates.sort_unstable();
}

/// Every slot reassignment of the given events.
pub fn moves_for(events: &[Event], candidates: &[EventId]) -> Vec<Move> {
    candidates
        .iter()
        .flat_map(|&e| {
            let from = events[e].slot;
            Slot::all()
                .filter(move |&to| to != from)
                .map(move |to| Move::new(e, from, to))
        })
        .collect()
}
