//! Events and moves.
//!
//! An event is one scheduled subject-hour. Events are the variables of the
//! search: subject, professor, group and room are fixed when the event is
//! created, only the slot changes. A move proposes a new slot for one event.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{GroupId, ProfessorId, RoomId, Slot, Subject, SubjectId};

/// Index of an event inside its solution (`events[id].id == id`).
pub type EventId = usize;

/// One scheduled occurrence of a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Position of the event in the solution.
    pub id: EventId,
    /// Subject taught.
    pub subject_id: SubjectId,
    /// Professor teaching.
    pub professor_id: ProfessorId,
    /// Group attending.
    pub group_id: GroupId,
    /// Room used.
    pub room_id: RoomId,
    /// Assigned slot.
    pub slot: Slot,
}

impl Event {
    /// Creates an event for one hour of a subject, placed at Monday 07:00
    /// in the given room.
    pub fn for_subject(id: EventId, subject: &Subject, room_id: RoomId) -> Self {
        Self {
            id,
            subject_id: subject.id,
            professor_id: subject.professor_id,
            group_id: subject.group_id,
            room_id,
            slot: Slot::from_id(0),
        }
    }

    /// Sets the slot.
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slot = slot;
        self
    }

    /// Sets the room.
    pub fn with_room(mut self, room_id: RoomId) -> Self {
        self.room_id = room_id;
        self
    }
}

/// A proposal to move one event from its current slot to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Event affected.
    pub event: EventId,
    /// Slot the event occupies now.
    pub from: Slot,
    /// Candidate destination slot.
    pub to: Slot,
}

impl Move {
    /// Creates a move.
    pub fn new(event: EventId, from: Slot, to: Slot) -> Self {
        Self { event, from, to }
    }

    /// The move that undoes this one.
    #[inline]
    pub fn reverse(&self) -> Self {
        Self {
            event: self.event,
            from: self.to,
            to: self.from,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event {}: {} -> {}", self.event, self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_for_subject() {
        let subject = Subject::new(4, 2, 1, 3);
        let e = Event::for_subject(9, &subject, 2).with_slot(Slot::new(1, 2));
        assert_eq!(e.id, 9);
        assert_eq!(e.subject_id, 4);
        assert_eq!(e.group_id, 1);
        assert_eq!(e.professor_id, 3);
        assert_eq!(e.room_id, 2);
        assert_eq!(e.slot, Slot::new(1, 2));
        assert_eq!(e.with_room(5).room_id, 5);
    }

    #[test]
    fn test_move_reverse() {
        let m = Move::new(3, Slot::new(0, 1), Slot::new(2, 5));
        let r = m.reverse();
        assert_eq!(r.event, 3);
        assert_eq!(r.from, Slot::new(2, 5));
        assert_eq!(r.to, Slot::new(0, 1));
        assert_eq!(r.reverse(), m);
    }
}
