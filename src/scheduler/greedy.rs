//! First-fit constructive scheduler.
//!
//! # Algorithm
//!
//! 1. Create one event per subject hour, in catalog order.
//! 2. Place subjects hardest first: laboratory subjects, then more
//!    weekly hours, then lower ID.
//! 3. For each event, rank the 70 slots by preference (inside the group's
//!    shift, not refused by the professor, subject not yet on that day,
//!    not an edge period). Ties keep a seeded random order.
//! 4. Take the first slot where professor, group and a suitable room are
//!    all free. If none exists, take the slot with the fewest collisions.
//!
//! The result may contain hard conflicts; tabu search repairs them.
//!
//! # Complexity
//! O(e * s * r) where e=events, s=slots, r=suitable rooms.

use std::collections::{HashMap, HashSet};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::models::{
    Catalog, Event, GroupId, ProfessorId, RoomId, Slot, Subject, SubjectId,
};

/// Builds an initial timetable by first fit.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Catalog, Group, Professor, Room, Subject};
/// use u_timetable::scheduler::FirstFitScheduler;
///
/// let catalog = Catalog::new(
///     vec![Professor::new(0, 10)],
///     vec![Subject::new(0, 3, 0, 0)],
///     vec![Group::new(0, 25).with_subject(0)],
///     vec![Room::new(0, 30)],
/// );
/// let events = FirstFitScheduler::new(42).build(&catalog);
/// assert_eq!(events.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct FirstFitScheduler {
    seed: u64,
}

#[derive(Debug, Default)]
struct Occupancy {
    professors: HashSet<(ProfessorId, usize)>,
    groups: HashSet<(GroupId, usize)>,
    rooms: HashSet<(RoomId, usize)>,
    subject_days: HashMap<(SubjectId, u8), u32>,
}

impl Occupancy {
    fn collisions(&self, subject: &Subject, slot: Slot, room: RoomId) -> usize {
        let id = slot.id();
        usize::from(self.professors.contains(&(subject.professor_id, id)))
            + usize::from(self.groups.contains(&(subject.group_id, id)))
            + usize::from(self.rooms.contains(&(room, id)))
    }

    fn occupy(&mut self, subject: &Subject, slot: Slot, room: RoomId) {
        let id = slot.id();
        self.professors.insert((subject.professor_id, id));
        self.groups.insert((subject.group_id, id));
        self.rooms.insert((room, id));
        *self.subject_days.entry((subject.id, slot.day)).or_insert(0) += 1;
    }
}

impl FirstFitScheduler {
    /// Creates a scheduler with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Builds events for every subject hour.
    ///
    /// Event IDs are `0..n` in catalog subject order.
    pub fn build(&self, catalog: &Catalog) -> Vec<Event> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut events: Vec<Event> = Vec::new();
        let mut owned: Vec<(usize, Vec<usize>)> = Vec::new();

        for (idx, subject) in catalog.subjects.iter().enumerate() {
            let fallback_room = catalog
                .suitable_rooms(subject)
                .first()
                .map(|r| r.id)
                .unwrap_or_default();
            let ids: Vec<usize> = (0..subject.weekly_hours as usize)
                .map(|_| {
                    let id = events.len();
                    events.push(Event::for_subject(id, subject, fallback_room));
                    id
                })
                .collect();
            owned.push((idx, ids));
        }

        owned.sort_by_key(|(idx, _)| {
            let s = &catalog.subjects[*idx];
            (!s.requires_lab, std::cmp::Reverse(s.weekly_hours), s.id)
        });

        let mut occupancy = Occupancy::default();
        let mut fallbacks = 0usize;

        for (idx, ids) in &owned {
            let subject = &catalog.subjects[*idx];
            let rooms: Vec<RoomId> = catalog.suitable_rooms(subject).iter().map(|r| r.id).collect();
            for &event in ids {
                let order = self.slot_order(catalog, subject, &occupancy, &mut rng);
                let (slot, room, clean) = place(subject, &order, &rooms, &occupancy)
                    .unwrap_or((order[0], events[event].room_id, false));
                if !clean {
                    fallbacks += 1;
                }
                occupancy.occupy(subject, slot, room);
                events[event].slot = slot;
                events[event].room_id = room;
            }
        }

        debug!(events = events.len(), fallbacks, "initial timetable built");
        events
    }

    /// All slots, most preferred first.
    fn slot_order(
        &self,
        catalog: &Catalog,
        subject: &Subject,
        occupancy: &Occupancy,
        rng: &mut SmallRng,
    ) -> Vec<Slot> {
        let shift = catalog.group(subject.group_id).map(|g| g.shift);
        let professor = catalog.professor(subject.professor_id);

        let mut slots: Vec<Slot> = Slot::all().collect();
        slots.shuffle(rng);
        slots.sort_by_key(|&slot| {
            (
                shift.is_some_and(|s| !s.contains(slot)),
                professor.is_some_and(|p| p.refuses(slot)),
                occupancy.subject_days.contains_key(&(subject.id, slot.day)),
                slot.is_edge_period(),
            )
        });
        slots
    }
}

/// First conflict-free (slot, room), else the one with fewest collisions.
///
/// Returns `None` when the subject has no suitable room. The flag is
/// `true` for a conflict-free placement.
fn place(
    subject: &Subject,
    order: &[Slot],
    rooms: &[RoomId],
    occupancy: &Occupancy,
) -> Option<(Slot, RoomId, bool)> {
    let mut fallback: Option<(usize, Slot, RoomId)> = None;

    for &slot in order {
        for &room in rooms {
            let collisions = occupancy.collisions(subject, slot, room);
            if collisions == 0 {
                return Some((slot, room, true));
            }
            if fallback.is_none_or(|(best, _, _)| collisions < best) {
                fallback = Some((collisions, slot, room));
            }
        }
    }

    fallback.map(|(_, slot, room)| (slot, room, false))
}
