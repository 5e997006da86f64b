//! Solution (timetable) model.
//!
//! A solution is the ordered event list plus cached aggregate scores.
//! Quality is only meaningful for feasible solutions: any hard conflict
//! forces it to the floor, so it is not continuous across the
//! feasibility boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Event, EventId, GroupId, Move, ProfessorId, RoomId, Slot, SubjectId};
use crate::error::{Result, TimetableError};

/// Soft penalty points that cost one quality point.
pub const QUALITY_PENALTY_SCALE: f64 = 10.0;

/// Aggregate score of a solution.
///
/// Ordering is lexicographic: fewer hard conflicts always wins, the soft
/// penalty only breaks ties. Lower is better.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Score {
    /// Number of hard-constraint violations.
    pub hard: u32,
    /// Weighted soft-constraint penalty.
    pub soft: u32,
}

impl Score {
    /// Creates a score.
    pub fn new(hard: u32, soft: u32) -> Self {
        Self { hard, soft }
    }

    /// Whether no hard constraint is violated.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.hard == 0
    }

    /// Quality in [0, 100].
    ///
    /// `100 - soft / 10` (floored at 0) when feasible, exactly 0 otherwise.
    pub fn quality(&self) -> f64 {
        if self.hard > 0 {
            return 0.0;
        }
        (100.0 - self.soft as f64 / QUALITY_PENALTY_SCALE).max(0.0)
    }

    /// Applies signed changes, saturating at zero.
    pub fn offset(&self, hard: i64, soft: i64) -> Self {
        Self {
            hard: (self.hard as i64 + hard).clamp(0, u32::MAX as i64) as u32,
            soft: (self.soft as i64 + soft).clamp(0, u32::MAX as i64) as u32,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hard/{}soft", self.hard, self.soft)
    }
}

/// A complete timetable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Events, indexed by `Event::id`.
    pub events: Vec<Event>,
    /// Cached hard-conflict count.
    pub hard_conflicts: u32,
    /// Cached soft penalty.
    pub soft_penalty: u32,
    /// Cached quality in [0, 100].
    pub quality: f64,
}

impl Solution {
    /// Creates an unscored solution.
    ///
    /// Scores stay at zero until [`Solution::set_score`] is called with
    /// an evaluation.
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            hard_conflicts: 0,
            soft_penalty: 0,
            quality: 0.0,
        }
    }

    /// Cached score.
    #[inline]
    pub fn score(&self) -> Score {
        Score::new(self.hard_conflicts, self.soft_penalty)
    }

    /// Stores a score and the derived quality.
    pub fn set_score(&mut self, score: Score) {
        self.hard_conflicts = score.hard;
        self.soft_penalty = score.soft;
        self.quality = score.quality();
    }

    /// Whether the cached score has no hard conflicts.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.hard_conflicts == 0
    }

    /// Applies a move and its resulting score together.
    ///
    /// Nothing changes if the event does not exist or no longer sits in
    /// `mv.from`.
    pub fn commit(&mut self, mv: &Move, score: Score) -> Result<()> {
        let event = self
            .events
            .get_mut(mv.event)
            .ok_or(TimetableError::StaleMove {
                event: mv.event,
                expected: mv.from,
                actual: None,
            })?;
        if event.slot != mv.from {
            return Err(TimetableError::StaleMove {
                event: mv.event,
                expected: mv.from,
                actual: Some(event.slot),
            });
        }
        event.slot = mv.to;
        self.set_score(score);
        Ok(())
    }

    /// Finds an event by ID.
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.get(id)
    }

    /// Events of a group.
    pub fn events_for_group(&self, group_id: GroupId) -> Vec<&Event> {
        self.events.iter().filter(|e| e.group_id == group_id).collect()
    }

    /// Events of a professor.
    pub fn events_for_professor(&self, professor_id: ProfessorId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.professor_id == professor_id)
            .collect()
    }

    /// Events held in a room.
    pub fn events_for_room(&self, room_id: RoomId) -> Vec<&Event> {
        self.events.iter().filter(|e| e.room_id == room_id).collect()
    }

    /// Events placed in a slot.
    pub fn events_at(&self, slot: Slot) -> Vec<&Event> {
        self.events.iter().filter(|e| e.slot == slot).collect()
    }

    /// Number of events of a subject.
    pub fn hours_for_subject(&self, subject_id: SubjectId) -> usize {
        self.events
            .iter()
            .filter(|e| e.subject_id == subject_id)
            .count()
    }

    /// Number of events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subject;

    fn sample_solution() -> Solution {
        let math = Subject::new(0, 2, 0, 0);
        let lab = Subject::new(1, 1, 1, 0);
        Solution::new(vec![
            Event::for_subject(0, &math, 0).with_slot(Slot::new(0, 1)),
            Event::for_subject(1, &math, 0).with_slot(Slot::new(1, 1)),
            Event::for_subject(2, &lab, 1).with_slot(Slot::new(0, 1)),
        ])
    }

    #[test]
    fn test_quality_floor_when_infeasible() {
        assert_eq!(Score::new(1, 0).quality(), 0.0);
        assert_eq!(Score::new(3, 5000).quality(), 0.0);
        assert!((Score::new(0, 0).quality() - 100.0).abs() < 1e-10);
        assert!((Score::new(0, 55).quality() - 94.5).abs() < 1e-10);
        assert_eq!(Score::new(0, 5000).quality(), 0.0);
    }

    #[test]
    fn test_score_ordering_is_lexicographic() {
        assert!(Score::new(0, 900) < Score::new(1, 0));
        assert!(Score::new(2, 10) < Score::new(2, 11));
    }

    #[test]
    fn test_score_offset_saturates() {
        assert_eq!(Score::new(2, 10).offset(-1, 5), Score::new(1, 15));
        assert_eq!(Score::new(0, 3).offset(-1, -7), Score::new(0, 0));
    }

    #[test]
    fn test_set_score_derives_quality() {
        let mut s = sample_solution();
        s.set_score(Score::new(0, 100));
        assert!((s.quality - 90.0).abs() < 1e-10);
        s.set_score(Score::new(2, 100));
        assert_eq!(s.quality, 0.0);
        assert!(!s.is_feasible());
    }

    #[test]
    fn test_commit_moves_event_and_score() {
        let mut s = sample_solution();
        let mv = Move::new(2, Slot::new(0, 1), Slot::new(3, 4));
        s.commit(&mv, Score::new(0, 20)).unwrap();
        assert_eq!(s.events[2].slot, Slot::new(3, 4));
        assert_eq!(s.score(), Score::new(0, 20));
        assert!((s.quality - 98.0).abs() < 1e-10);
    }

    #[test]
    fn test_commit_rejects_stale_move() {
        let mut s = sample_solution();
        s.set_score(Score::new(1, 0));
        let before = s.clone();
        let mv = Move::new(0, Slot::new(4, 4), Slot::new(3, 4));
        assert!(s.commit(&mv, Score::new(0, 0)).is_err());
        assert_eq!(s, before);

        let missing = Move::new(10, Slot::new(0, 0), Slot::new(0, 1));
        assert!(s.commit(&missing, Score::new(0, 0)).is_err());
        assert_eq!(s, before);
    }

    #[test]
    fn test_views() {
        let s = sample_solution();
        assert_eq!(s.events_for_group(0).len(), 2);
        assert_eq!(s.events_for_professor(0).len(), 3);
        assert_eq!(s.events_for_room(1).len(), 1);
        assert_eq!(s.events_at(Slot::new(0, 1)).len(), 2);
        assert_eq!(s.hours_for_subject(0), 2);
        assert_eq!(s.event_count(), 3);
        assert!(s.event(5).is_none());
    }
}
