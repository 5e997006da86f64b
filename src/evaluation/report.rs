//! Conflict report.
//!
//! Lists every hard violation and every penalized soft scope of a
//! timetable. Hard entries match the hard-conflict count one to one and
//! soft penalties add up to the soft penalty.

use serde::{Deserialize, Serialize};

use crate::models::{
    ConstraintKind, Event, EventId, HardConstraint, Severity, Slot, SoftConstraint, DAYS,
};

use super::{overlap_kind, Evaluator};

/// One detected violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Violated rule.
    pub kind: ConstraintKind,
    /// Slot of the violation, when it is tied to one.
    pub slot: Option<Slot>,
    /// Day of the violation, when it is tied to one.
    pub day: Option<u8>,
    /// 1 for hard violations, weighted penalty for soft ones.
    pub penalty: u32,
    /// Events involved.
    pub events: Vec<EventId>,
    /// Human-readable explanation.
    pub message: String,
}

impl Conflict {
    /// Severity of the violated rule.
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Whether this violation makes the timetable infeasible.
    pub fn is_hard(&self) -> bool {
        self.severity() == Severity::Hard
    }

    fn hard(kind: HardConstraint, slot: Option<Slot>, events: Vec<EventId>, message: String) -> Self {
        Self {
            kind: ConstraintKind::Hard(kind),
            slot,
            day: slot.map(|s| s.day),
            penalty: 1,
            events,
            message,
        }
    }

    fn soft(
        rule: SoftConstraint,
        slot: Option<Slot>,
        day: Option<u8>,
        penalty: u32,
        events: Vec<EventId>,
        message: String,
    ) -> Self {
        Self {
            kind: ConstraintKind::Soft(rule),
            slot,
            day,
            penalty,
            events,
            message,
        }
    }
}

fn day_name(day: u8) -> &'static str {
    Slot::new(day, 0).day_name()
}

impl Evaluator<'_> {
    /// Every violation of a timetable, hard entries first.
    pub fn conflicts(&self, events: &[Event]) -> Vec<Conflict> {
        let mut out = self.hard_conflict_entries(events);
        out.extend(self.soft_conflict_entries(events));
        out
    }

    fn hard_conflict_entries(&self, events: &[Event]) -> Vec<Conflict> {
        let mut out = Vec::new();

        for (u, v) in self.graph.edges() {
            let slot = events[u].slot;
            if events[v].slot != slot {
                continue;
            }
            let kind = overlap_kind(&events[u], &events[v]);
            let who = match kind {
                HardConstraint::ProfessorOverlap => {
                    self.professors[self.profiles[u].professor].label.clone()
                }
                HardConstraint::GroupOverlap => self.groups[self.profiles[u].group].label.clone(),
                _ => format!("room {}", events[u].room_id),
            };
            out.push(Conflict::hard(
                kind,
                Some(slot),
                vec![u, v],
                format!("{who} has events {u} and {v} at {slot}"),
            ));
        }

        for violation in &self.static_violations {
            out.push(Conflict::hard(
                violation.kind,
                None,
                violation.events.clone(),
                violation.message.clone(),
            ));
        }

        out
    }

    fn soft_conflict_entries(&self, events: &[Event]) -> Vec<Conflict> {
        let w = self.weights;
        let slot_of = |i: EventId| events[i].slot;
        let mut out = Vec::new();

        let on_day = |members: &[EventId], day: u8| -> Vec<EventId> {
            members
                .iter()
                .copied()
                .filter(|&e| events[e].slot.day == day)
                .collect()
        };

        if w.idle_gaps > 0 {
            for (g, group) in self.groups.iter().enumerate() {
                for day in 0..DAYS {
                    let gaps = self.group_gaps(g, day, &slot_of);
                    if gaps > 0 {
                        out.push(Conflict::soft(
                            SoftConstraint::IdleGaps,
                            None,
                            Some(day),
                            gaps * w.idle_gaps,
                            on_day(&group.events, day),
                            format!("{} has {} free period(s) on {}", group.label, gaps, day_name(day)),
                        ));
                    }
                }
            }
            for (p, professor) in self.professors.iter().enumerate() {
                for day in 0..DAYS {
                    let gaps = self.professor_gaps(p, day, &slot_of);
                    if gaps > 0 {
                        out.push(Conflict::soft(
                            SoftConstraint::IdleGaps,
                            None,
                            Some(day),
                            gaps * w.idle_gaps,
                            on_day(&professor.events, day),
                            format!(
                                "{} has {} free period(s) on {}",
                                professor.label,
                                gaps,
                                day_name(day)
                            ),
                        ));
                    }
                }
            }
        }

        if w.clustering > 0 {
            for (s, subject) in self.subjects.iter().enumerate() {
                for day in 0..DAYS {
                    let excess = self.subject_excess(s, day, &slot_of);
                    if excess > 0 {
                        out.push(Conflict::soft(
                            SoftConstraint::Clustering,
                            None,
                            Some(day),
                            excess * w.clustering,
                            on_day(&subject.events, day),
                            format!(
                                "subject {} has {} hour(s) too many on {}",
                                subject.id,
                                excess,
                                day_name(day)
                            ),
                        ));
                    }
                }
            }
        }

        if w.compact_days > 0 {
            for (p, professor) in self.professors.iter().enumerate() {
                let extra = self.extra_days(p, &slot_of);
                if extra > 0 {
                    out.push(Conflict::soft(
                        SoftConstraint::CompactDays,
                        None,
                        None,
                        extra * w.compact_days,
                        professor.events.clone(),
                        format!("{} teaches on {} more day(s) than needed", professor.label, extra),
                    ));
                }
            }
        }

        for (e, event) in events.iter().enumerate() {
            let slot = event.slot;
            if w.extreme_periods > 0 && self.is_extreme(slot) {
                out.push(Conflict::soft(
                    SoftConstraint::ExtremePeriods,
                    Some(slot),
                    Some(slot.day),
                    w.extreme_periods,
                    vec![e],
                    format!("event {e} sits in an edge period at {slot}"),
                ));
            }
            if w.excluded_slots > 0 && self.is_refused(e, slot) {
                out.push(Conflict::soft(
                    SoftConstraint::ExcludedSlots,
                    Some(slot),
                    Some(slot.day),
                    w.excluded_slots,
                    vec![e],
                    format!(
                        "{} refuses {slot}, event {e} is there",
                        self.professors[self.profiles[e].professor].label
                    ),
                ));
            }
            if w.outside_shift > 0 && self.is_outside_shift(e, slot) {
                out.push(Conflict::soft(
                    SoftConstraint::OutsideShift,
                    Some(slot),
                    Some(slot.day),
                    w.outside_shift,
                    vec![e],
                    format!(
                        "event {e} at {slot} is outside the shift of {}",
                        self.groups[self.profiles[e].group].label
                    ),
                ));
            }
        }

        out
    }
}
