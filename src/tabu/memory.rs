//! Short-term tabu memory.
//!
//! Records (event, slot) attributes with an expiry iteration. An
//! attribute recorded at iteration `T` with tenure `K` forbids moving the
//! event back into that slot for checks at iterations `T ..= T+K-1` and
//! expires at `T+K`. Capacity bounds the number of live entries; the oldest entry is
//! evicted first.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::{Result, TimetableError};
use crate::models::{EventId, Move, Slot};

/// A forbidden (event, slot) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabuEntry {
    /// Event that may not return.
    pub event: EventId,
    /// Slot it may not return to.
    pub slot: Slot,
    /// First iteration at which the entry no longer applies.
    pub expires_at: u64,
}

/// FIFO tabu list with tenure-based expiry.
#[derive(Debug, Clone)]
pub struct TabuMemory {
    entries: VecDeque<TabuEntry>,
    tenure: u64,
    capacity: usize,
}

impl TabuMemory {
    /// Creates an empty memory.
    ///
    /// Fails with [`TimetableError::InvalidConfig`] if `capacity` is 0.
    pub fn new(tenure: u64, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(TimetableError::InvalidConfig(
                "memory_capacity must be at least 1".into(),
            ));
        }
        Ok(Self {
            entries: VecDeque::with_capacity(capacity),
            tenure,
            capacity,
        })
    }

    /// Forbids `mv.event` from returning to `mv.to` until `iteration + tenure`.
    ///
    /// The engine records the reverse of each applied move, so `mv.to` is
    /// the slot just vacated. An existing entry for the same pair is
    /// replaced. The oldest entry is evicted when the memory is full.
    pub fn record(&mut self, mv: &Move, iteration: u64) {
        self.entries
            .retain(|e| !(e.event == mv.event && e.slot == mv.to));
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(TabuEntry {
            event: mv.event,
            slot: mv.to,
            expires_at: iteration.saturating_add(self.tenure),
        });
    }

    /// Whether placing `event` in `slot` is forbidden at `iteration`.
    pub fn is_tabu(&self, event: EventId, slot: Slot, iteration: u64) -> bool {
        self.entries
            .iter()
            .any(|e| e.event == event && e.slot == slot && e.expires_at > iteration)
    }

    /// Whether a candidate move is forbidden at `iteration`.
    #[inline]
    pub fn forbids(&self, mv: &Move, iteration: u64) -> bool {
        self.is_tabu(mv.event, mv.to, iteration)
    }

    /// Drops every entry expired at `iteration`.
    pub fn purge_expired(&mut self, iteration: u64) {
        self.entries.retain(|e| e.expires_at > iteration);
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the memory is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tenure in iterations.
    pub fn tenure(&self) -> u64 {
        self.tenure
    }

    /// Stored entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TabuEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reverse_of(event: EventId, vacated: usize, target: usize) -> Move {
        Move::new(event, Slot::from_id(target), Slot::from_id(vacated))
    }

    #[test]
    fn test_record_and_expire() {
        let mut memory = TabuMemory::new(3, 10).unwrap();
        memory.record(&reverse_of(4, 10, 20), 5);

        assert!(memory.is_tabu(4, Slot::from_id(10), 6));
        assert!(memory.is_tabu(4, Slot::from_id(10), 7));
        assert!(!memory.is_tabu(4, Slot::from_id(10), 8));
        assert!(!memory.is_tabu(4, Slot::from_id(20), 6));
        assert!(!memory.is_tabu(3, Slot::from_id(10), 6));
    }

    #[test]
    fn test_fifo_eviction() {
        let mut memory = TabuMemory::new(100, 2).unwrap();
        memory.record(&reverse_of(0, 1, 2), 1);
        memory.record(&reverse_of(1, 1, 2), 2);
        memory.record(&reverse_of(2, 1, 2), 3);

        assert_eq!(memory.len(), 2);
        assert!(!memory.is_tabu(0, Slot::from_id(1), 4));
        assert!(memory.is_tabu(1, Slot::from_id(1), 4));
        assert!(memory.is_tabu(2, Slot::from_id(1), 4));
    }

    #[test]
    fn test_rerecord_refreshes_entry() {
        let mut memory = TabuMemory::new(5, 4).unwrap();
        memory.record(&reverse_of(0, 7, 8), 1);
        memory.record(&reverse_of(0, 7, 9), 4);

        assert_eq!(memory.len(), 1);
        assert!(memory.is_tabu(0, Slot::from_id(7), 8));
        assert_eq!(memory.iter().next().map(|e| e.expires_at), Some(9));
    }

    #[test]
    fn test_purge_expired() {
        let mut memory = TabuMemory::new(2, 10).unwrap();
        memory.record(&reverse_of(0, 1, 2), 1);
        memory.record(&reverse_of(1, 1, 2), 5);
        memory.purge_expired(3);

        assert_eq!(memory.len(), 1);
        assert!(memory.is_tabu(1, Slot::from_id(1), 6));
        memory.clear();
        assert!(memory.is_empty());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            TabuMemory::new(5, 0),
            Err(TimetableError::InvalidConfig(_))
        ));
        assert!(TabuMemory::new(5, 1).is_ok());
    }

    proptest! {
        #[test]
        fn prop_tabu_only_inside_tenure(
            tenure in 1u64..30,
            recorded in 0u64..1000,
            offset in 0u64..60,
        ) {
            let mut memory = TabuMemory::new(tenure, 8).unwrap();
            let mv = reverse_of(3, 11, 12);
            memory.record(&mv, recorded);

            let at = recorded + offset;
            prop_assert_eq!(memory.forbids(&mv, at), offset < tenure);
        }
    }
}
