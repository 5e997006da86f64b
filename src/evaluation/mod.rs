//! Constraint evaluation.
//!
//! Computes the hard-conflict count and the weighted soft penalty of a
//! timetable, either in full or as the delta caused by a single move.
//!
//! # Hard constraints
//!
//! - One violation per Conflict-Graph edge whose endpoints share a slot
//!   (professor, group or room overlap).
//! - One per event whose room is too small ([`HardConstraint::RoomCapacity`])
//!   and one per laboratory event outside a laboratory.
//! - One per professor loaded beyond their maximum hours.
//! - One per subject whose event count differs from its weekly hours.
//!
//! Only the overlaps depend on slots. The other checks are computed once
//! when the evaluator is built and included in every full evaluation.
//!
//! # Soft constraints
//!
//! Every soft rule decomposes into scopes: a (group, day), a
//! (professor, day), a (subject, day), a professor, or a single event.
//! A move touches only the scopes of its own event on its origin and
//! destination days, so the delta re-evaluates exactly those scopes.
//! Full and delta evaluation share the same scope functions and agree
//! exactly.

mod report;
mod soft;

pub use report::Conflict;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::graph::ConflictGraph;
use crate::models::{
    Catalog, Event, EventId, HardConstraint, Move, ProfessorId, Score, Shift, Slot,
    SoftConstraint, SoftWeights, SubjectId, DAYS, PERIODS_PER_DAY,
};

/// Signed change of a score caused by a move.
///
/// Ordering is lexicographic (hard first), matching [`Score`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ScoreDelta {
    /// Change in hard conflicts.
    pub hard: i64,
    /// Change in soft penalty.
    pub soft: i64,
}

impl ScoreDelta {
    /// Difference between two scores (`after - before`).
    pub fn between(before: Score, after: Score) -> Self {
        Self {
            hard: after.hard as i64 - before.hard as i64,
            soft: after.soft as i64 - before.soft as i64,
        }
    }

    /// Score after applying this delta.
    #[inline]
    pub fn apply(&self, score: Score) -> Score {
        score.offset(self.hard, self.soft)
    }

    /// Whether the move strictly improves the score.
    #[inline]
    pub fn is_improving(&self) -> bool {
        *self < Self::default()
    }
}

/// Full evaluation with per-rule breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Aggregate score.
    pub score: Score,
    /// Violations per hard rule (every rule present).
    pub hard: BTreeMap<HardConstraint, u32>,
    /// Weighted penalty per soft rule (every rule present).
    pub soft: BTreeMap<SoftConstraint, u32>,
}

#[derive(Debug, Clone)]
struct EventProfile {
    group: usize,
    professor: usize,
    subject: usize,
}

#[derive(Debug, Clone)]
struct GroupEntry {
    label: String,
    events: Vec<EventId>,
    shift: Option<Shift>,
}

#[derive(Debug, Clone)]
struct ProfessorEntry {
    id: ProfessorId,
    label: String,
    events: Vec<EventId>,
    excluded: BTreeSet<Slot>,
    /// Fewest days the load can be packed into.
    min_days: u32,
}

#[derive(Debug, Clone)]
struct SubjectEntry {
    id: SubjectId,
    events: Vec<EventId>,
    /// Hours per day an even spread needs.
    daily_allowance: u32,
}

/// A slot-independent hard violation.
#[derive(Debug, Clone)]
struct StaticViolation {
    kind: HardConstraint,
    events: Vec<EventId>,
    message: String,
}

/// Scores timetables built from one event list.
///
/// Subject, professor, group and room of every event are captured at
/// construction. Every method expects an event list with the same events
/// in the same order; only slots may differ.
#[derive(Debug, Clone)]
pub struct Evaluator<'g> {
    graph: &'g ConflictGraph,
    weights: SoftWeights,
    profiles: Vec<EventProfile>,
    groups: Vec<GroupEntry>,
    professors: Vec<ProfessorEntry>,
    subjects: Vec<SubjectEntry>,
    static_violations: Vec<StaticViolation>,
}

impl<'g> Evaluator<'g> {
    /// Builds an evaluator for `events` over `graph`.
    ///
    /// Entities missing from the catalog are tolerated: an unknown room
    /// counts as a capacity violation, unknown groups and professors
    /// carry no shift, refused slots or hour ceiling.
    pub fn new(
        catalog: &Catalog,
        events: &[Event],
        graph: &'g ConflictGraph,
        weights: SoftWeights,
    ) -> Self {
        let mut group_index: HashMap<u32, usize> = HashMap::new();
        let mut professor_index: HashMap<u32, usize> = HashMap::new();
        let mut subject_index: HashMap<u32, usize> = HashMap::new();
        let mut groups: Vec<GroupEntry> = Vec::new();
        let mut professors: Vec<ProfessorEntry> = Vec::new();
        let mut subjects: Vec<SubjectEntry> = Vec::new();
        let mut profiles = Vec::with_capacity(events.len());

        for (idx, event) in events.iter().enumerate() {
            let group = *group_index.entry(event.group_id).or_insert_with(|| {
                let found = catalog.group(event.group_id);
                groups.push(GroupEntry {
                    label: label(found.map(|g| g.name.as_str()), "group", event.group_id),
                    events: Vec::new(),
                    shift: found.map(|g| g.shift),
                });
                groups.len() - 1
            });
            let professor = *professor_index
                .entry(event.professor_id)
                .or_insert_with(|| {
                    let found = catalog.professor(event.professor_id);
                    professors.push(ProfessorEntry {
                        id: event.professor_id,
                        label: label(found.map(|p| p.name.as_str()), "professor", event.professor_id),
                        events: Vec::new(),
                        excluded: found.map(|p| p.excluded_slots.clone()).unwrap_or_default(),
                        min_days: 0,
                    });
                    professors.len() - 1
                });
            let subject = *subject_index.entry(event.subject_id).or_insert_with(|| {
                subjects.push(SubjectEntry {
                    id: event.subject_id,
                    events: Vec::new(),
                    daily_allowance: 1,
                });
                subjects.len() - 1
            });

            groups[group].events.push(idx);
            professors[professor].events.push(idx);
            subjects[subject].events.push(idx);
            profiles.push(EventProfile {
                group,
                professor,
                subject,
            });
        }

        for entry in &mut professors {
            entry.min_days = (entry.events.len() as u32).div_ceil(PERIODS_PER_DAY as u32);
        }
        for entry in &mut subjects {
            entry.daily_allowance = (entry.events.len() as u32).div_ceil(DAYS as u32).max(1);
        }

        let static_violations = static_violations(catalog, events, &professors);

        Self {
            graph,
            weights,
            profiles,
            groups,
            professors,
            subjects,
            static_violations,
        }
    }

    /// The Conflict Graph in use.
    pub fn graph(&self) -> &'g ConflictGraph {
        self.graph
    }

    /// Soft weights in use.
    pub fn weights(&self) -> &SoftWeights {
        &self.weights
    }

    /// Full evaluation.
    pub fn evaluate(&self, events: &[Event]) -> Score {
        self.evaluate_detailed(events).score
    }

    /// Full evaluation with per-rule breakdown.
    pub fn evaluate_detailed(&self, events: &[Event]) -> Evaluation {
        debug_assert_eq!(events.len(), self.profiles.len());

        let mut hard: BTreeMap<HardConstraint, u32> =
            HardConstraint::ALL.iter().map(|&k| (k, 0)).collect();
        for (u, v) in self.graph.edges() {
            if events[u].slot == events[v].slot {
                *hard.entry(overlap_kind(&events[u], &events[v])).or_insert(0) += 1;
            }
        }
        for violation in &self.static_violations {
            *hard.entry(violation.kind).or_insert(0) += 1;
        }

        let slot_of = |i: EventId| events[i].slot;
        let soft: BTreeMap<SoftConstraint, u32> = SoftConstraint::ALL
            .iter()
            .map(|&rule| (rule, self.rule_units(rule, &slot_of) * self.weights.weight(rule)))
            .collect();

        let score = Score::new(hard.values().sum(), soft.values().sum());
        Evaluation { score, hard, soft }
    }

    /// Hard-conflict count only.
    pub fn hard_conflicts(&self, events: &[Event]) -> u32 {
        let overlaps = self
            .graph
            .edges()
            .filter(|&(u, v)| events[u].slot == events[v].slot)
            .count() as u32;
        overlaps + self.static_violations.len() as u32
    }

    /// Change in score if `mv` were applied.
    ///
    /// Only the moved event's Conflict-Graph neighbors and the soft scopes
    /// it belongs to on the origin and destination days are inspected.
    /// The origin is read from `events`, not from `mv.from`.
    pub fn delta(&self, events: &[Event], mv: &Move) -> ScoreDelta {
        ScoreDelta {
            hard: self.hard_delta(events, mv),
            soft: self.soft_delta(events, mv),
        }
    }

    /// Change in hard conflicts if `mv` were applied.
    pub fn hard_delta(&self, events: &[Event], mv: &Move) -> i64 {
        let from = events[mv.event].slot;
        if from == mv.to {
            return 0;
        }
        self.graph.neighbors(mv.event).fold(0i64, |acc, n| {
            let slot = events[n].slot;
            if slot == mv.to {
                acc + 1
            } else if slot == from {
                acc - 1
            } else {
                acc
            }
        })
    }

    /// Change in soft penalty if `mv` were applied.
    pub fn soft_delta(&self, events: &[Event], mv: &Move) -> i64 {
        let from = events[mv.event].slot;
        if from == mv.to {
            return 0;
        }
        let before = |i: EventId| events[i].slot;
        let after = |i: EventId| if i == mv.event { mv.to } else { events[i].slot };
        let days = [from.day, mv.to.day];
        self.local_penalty(mv.event, &days, &after) as i64
            - self.local_penalty(mv.event, &days, &before) as i64
    }

    /// Events involved in at least one slot collision, ascending.
    pub fn conflicting_events(&self, events: &[Event]) -> Vec<EventId> {
        (0..events.len())
            .filter(|&u| self.collisions_of(events, u) > 0)
            .collect()
    }

    /// Number of neighbors sharing the event's slot.
    pub fn collisions_of(&self, events: &[Event], event: EventId) -> usize {
        let slot = events[event].slot;
        self.graph
            .neighbors(event)
            .filter(|&n| events[n].slot == slot)
            .count()
    }
}

fn label(name: Option<&str>, entity: &str, id: u32) -> String {
    match name {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => format!("{entity} {id}"),
    }
}

/// Reason two adjacent events may not share a slot.
fn overlap_kind(a: &Event, b: &Event) -> HardConstraint {
    if a.professor_id == b.professor_id {
        HardConstraint::ProfessorOverlap
    } else if a.group_id == b.group_id {
        HardConstraint::GroupOverlap
    } else {
        HardConstraint::RoomOverlap
    }
}

fn static_violations(
    catalog: &Catalog,
    events: &[Event],
    professors: &[ProfessorEntry],
) -> Vec<StaticViolation> {
    let mut violations = Vec::new();

    for (idx, event) in events.iter().enumerate() {
        let students = catalog.group(event.group_id).map_or(0, |g| g.students);
        let requires_lab = catalog
            .subject(event.subject_id)
            .is_some_and(|s| s.requires_lab);
        let room = catalog.room(event.room_id);

        match room {
            Some(r) if r.seats(students) => {}
            Some(r) => violations.push(StaticViolation {
                kind: HardConstraint::RoomCapacity,
                events: vec![idx],
                message: format!(
                    "room {} seats {} but group {} has {} students",
                    r.id, r.capacity, event.group_id, students
                ),
            }),
            None => violations.push(StaticViolation {
                kind: HardConstraint::RoomCapacity,
                events: vec![idx],
                message: format!("event {} uses unknown room {}", idx, event.room_id),
            }),
        }
        if requires_lab && !room.is_some_and(|r| r.is_lab) {
            violations.push(StaticViolation {
                kind: HardConstraint::LaboratoryRequired,
                events: vec![idx],
                message: format!(
                    "subject {} needs a laboratory, room {} is not one",
                    event.subject_id, event.room_id
                ),
            });
        }
    }

    for entry in professors {
        if let Some(p) = catalog.professor(entry.id) {
            let load = entry.events.len() as u32;
            if load > p.max_hours {
                violations.push(StaticViolation {
                    kind: HardConstraint::ProfessorHours,
                    events: entry.events.clone(),
                    message: format!(
                        "{} teaches {} hours, maximum is {}",
                        entry.label, load, p.max_hours
                    ),
                });
            }
        }
    }

    for subject in &catalog.subjects {
        let members: Vec<EventId> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.subject_id == subject.id)
            .map(|(i, _)| i)
            .collect();
        if members.len() as u32 != subject.weekly_hours {
            violations.push(StaticViolation {
                kind: HardConstraint::WeeklyHours,
                message: format!(
                    "subject {} has {} events, needs {}",
                    subject.id,
                    members.len(),
                    subject.weekly_hours
                ),
                events: members,
            });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, Professor, Room, Subject};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn sample_catalog() -> Catalog {
        Catalog::new(
            vec![
                Professor::new(0, 20).with_excluded_slot(Slot::new(0, 3)),
                Professor::new(1, 20),
            ],
            vec![
                Subject::new(0, 4, 0, 0).requiring_lab(),
                Subject::new(1, 3, 0, 1),
                Subject::new(2, 4, 1, 0),
                Subject::new(3, 3, 1, 1),
            ],
            vec![
                Group::new(0, 30).with_subject(0).with_subject(1),
                Group::new(1, 25)
                    .with_shift(Shift::Evening)
                    .with_subject(2)
                    .with_subject(3),
            ],
            vec![Room::lab(0, 30), Room::new(1, 30), Room::new(2, 30)],
        )
    }

    fn sample_events(catalog: &Catalog, rng: &mut SmallRng) -> Vec<Event> {
        let rooms = [0, 1, 2, 1];
        let mut events = Vec::new();
        for (subject, &room) in catalog.subjects.iter().zip(rooms.iter()) {
            for _ in 0..subject.weekly_hours {
                let slot = Slot::from_id(rng.random_range(0..crate::models::SLOT_COUNT));
                events.push(Event::for_subject(events.len(), subject, room).with_slot(slot));
            }
        }
        events
    }

    #[test]
    fn test_full_hard_equals_edge_collisions() {
        let catalog = sample_catalog();
        let mut rng = SmallRng::seed_from_u64(7);
        let events = sample_events(&catalog, &mut rng);
        let graph = ConflictGraph::from_events(&events);
        let eval = Evaluator::new(&catalog, &events, &graph, SoftWeights::default());

        let per_edge = graph
            .edges()
            .filter(|&(u, v)| events[u].slot == events[v].slot)
            .count() as u32;
        // The catalog is consistent, so only overlaps count.
        assert_eq!(eval.evaluate(&events).hard, per_edge);
        assert_eq!(eval.hard_conflicts(&events), per_edge);
    }

    #[test]
    fn test_delta_matches_full_difference() {
        let catalog = sample_catalog();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut events = sample_events(&catalog, &mut rng);
        let graph = ConflictGraph::from_events(&events);
        let eval = Evaluator::new(&catalog, &events, &graph, SoftWeights::default());

        for _ in 0..100 {
            let event = rng.random_range(0..events.len());
            let to = Slot::from_id(rng.random_range(0..crate::models::SLOT_COUNT));
            let mv = Move::new(event, events[event].slot, to);

            let before = eval.evaluate(&events);
            let delta = eval.delta(&events, &mv);
            events[event].slot = to;
            let after = eval.evaluate(&events);

            assert_eq!(delta, ScoreDelta::between(before, after), "move {mv}");
            assert_eq!(delta.apply(before), after);
        }
    }

    #[test]
    fn test_capacity_violation_counted_once() {
        let catalog = Catalog::new(
            vec![Professor::new(0, 10), Professor::new(1, 10)],
            vec![Subject::new(0, 1, 0, 0), Subject::new(1, 2, 1, 1)],
            vec![Group::new(0, 40), Group::new(1, 20)],
            vec![Room::new(0, 30), Room::new(1, 30)],
        );
        let big = catalog.subject(0).unwrap();
        let small = catalog.subject(1).unwrap();
        let events = vec![
            Event::for_subject(0, big, 0).with_slot(Slot::new(0, 2)),
            Event::for_subject(1, small, 1).with_slot(Slot::new(1, 2)),
            Event::for_subject(2, small, 1).with_slot(Slot::new(2, 2)),
        ];
        let graph = ConflictGraph::from_events(&events);
        let eval = Evaluator::new(&catalog, &events, &graph, SoftWeights::zero());

        let detailed = eval.evaluate_detailed(&events);
        assert_eq!(detailed.hard[&HardConstraint::RoomCapacity], 1);
        assert_eq!(detailed.score.hard, 1);
        assert_eq!(detailed.score.quality(), 0.0);

        // Moving other events around never changes the capacity count.
        let mut moved = events.clone();
        moved[1].slot = Slot::new(0, 2);
        let detailed = eval.evaluate_detailed(&moved);
        assert_eq!(detailed.hard[&HardConstraint::RoomCapacity], 1);
    }

    #[test]
    fn test_static_hard_violations() {
        let catalog = Catalog::new(
            vec![Professor::new(0, 1)],
            vec![Subject::new(0, 3, 0, 0).requiring_lab()],
            vec![Group::new(0, 10)],
            vec![Room::new(0, 30)],
        );
        let s = catalog.subject(0).unwrap();
        let events = vec![
            Event::for_subject(0, s, 0).with_slot(Slot::new(0, 1)),
            Event::for_subject(1, s, 0).with_slot(Slot::new(1, 1)),
        ];
        let graph = ConflictGraph::from_events(&events);
        let eval = Evaluator::new(&catalog, &events, &graph, SoftWeights::zero());
        let d = eval.evaluate_detailed(&events);

        assert_eq!(d.hard[&HardConstraint::LaboratoryRequired], 2);
        assert_eq!(d.hard[&HardConstraint::ProfessorHours], 1);
        assert_eq!(d.hard[&HardConstraint::WeeklyHours], 1);
        assert_eq!(d.hard[&HardConstraint::RoomCapacity], 0);
        assert_eq!(d.score.hard, 4);
    }

    #[test]
    fn test_overlap_kinds() {
        let catalog = sample_catalog();
        let s0 = catalog.subject(0).unwrap(); // group 0, professor 0
        let s1 = catalog.subject(1).unwrap(); // group 0, professor 1
        let s3 = catalog.subject(3).unwrap(); // group 1, professor 1
        let slot = Slot::new(2, 4);
        let events = vec![
            Event::for_subject(0, s0, 0).with_slot(slot),
            Event::for_subject(1, s1, 1).with_slot(slot),
            Event::for_subject(2, s3, 2).with_slot(slot),
        ];
        let graph = ConflictGraph::from_events(&events);
        let eval = Evaluator::new(&catalog, &events, &graph, SoftWeights::zero());
        let d = eval.evaluate_detailed(&events);

        assert_eq!(d.hard[&HardConstraint::GroupOverlap], 1); // 0-1
        assert_eq!(d.hard[&HardConstraint::ProfessorOverlap], 1); // 1-2
        assert_eq!(d.hard[&HardConstraint::RoomOverlap], 0);
        assert_eq!(eval.conflicting_events(&events), vec![0, 1, 2]);
        assert_eq!(eval.collisions_of(&events, 1), 2);
    }

    #[test]
    fn test_hard_delta_resolving_collision() {
        let catalog = sample_catalog();
        let s0 = catalog.subject(0).unwrap();
        let events = vec![
            Event::for_subject(0, s0, 0).with_slot(Slot::new(0, 1)),
            Event::for_subject(1, s0, 0).with_slot(Slot::new(0, 1)),
        ];
        let graph = ConflictGraph::from_events(&events);
        let eval = Evaluator::new(&catalog, &events, &graph, SoftWeights::default());

        let away = Move::new(1, Slot::new(0, 1), Slot::new(0, 2));
        assert_eq!(eval.hard_delta(&events, &away), -1);
        let stay = Move::new(1, Slot::new(0, 1), Slot::new(0, 1));
        assert_eq!(eval.delta(&events, &stay), ScoreDelta::default());
    }

    #[test]
    fn test_score_delta_ordering() {
        let better_hard = ScoreDelta { hard: -1, soft: 50 };
        let better_soft = ScoreDelta { hard: 0, soft: -5 };
        assert!(better_hard < better_soft);
        assert!(better_hard.is_improving());
        assert!(better_soft.is_improving());
        assert!(!ScoreDelta { hard: 0, soft: 0 }.is_improving());
        assert!(!ScoreDelta { hard: 1, soft: -100 }.is_improving());
    }
}
