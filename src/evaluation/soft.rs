//! Soft-rule scopes.
//!
//! Each function measures one scope in raw units (unweighted). Slots are
//! read through `slot_of` so the same code serves the current timetable
//! and a hypothetical one with a single event moved.

use crate::models::{EventId, Slot, SoftConstraint, DAYS};

use super::Evaluator;

/// Bitmask of occupied periods on `day`.
pub(super) fn period_mask(events: &[EventId], day: u8, slot_of: &impl Fn(EventId) -> Slot) -> u16 {
    events.iter().fold(0u16, |mask, &e| {
        let slot = slot_of(e);
        if slot.day == day {
            mask | (1 << slot.period)
        } else {
            mask
        }
    })
}

/// Free periods strictly between the first and last occupied period.
pub(super) fn gaps(mask: u16) -> u32 {
    if mask == 0 {
        return 0;
    }
    let span = 16 - mask.leading_zeros() - mask.trailing_zeros();
    span - mask.count_ones()
}

/// Bitmask of days with at least one event.
pub(super) fn day_mask(events: &[EventId], slot_of: &impl Fn(EventId) -> Slot) -> u8 {
    events
        .iter()
        .fold(0u8, |mask, &e| mask | (1 << slot_of(e).day))
}

fn count_on(events: &[EventId], day: u8, slot_of: &impl Fn(EventId) -> Slot) -> u32 {
    events.iter().filter(|&&e| slot_of(e).day == day).count() as u32
}

impl Evaluator<'_> {
    pub(super) fn group_gaps(&self, group: usize, day: u8, slot_of: &impl Fn(EventId) -> Slot) -> u32 {
        gaps(period_mask(&self.groups[group].events, day, slot_of))
    }

    pub(super) fn professor_gaps(
        &self,
        professor: usize,
        day: u8,
        slot_of: &impl Fn(EventId) -> Slot,
    ) -> u32 {
        gaps(period_mask(&self.professors[professor].events, day, slot_of))
    }

    /// Hours of a subject on `day` beyond its even-spread allowance.
    pub(super) fn subject_excess(
        &self,
        subject: usize,
        day: u8,
        slot_of: &impl Fn(EventId) -> Slot,
    ) -> u32 {
        let entry = &self.subjects[subject];
        count_on(&entry.events, day, slot_of).saturating_sub(entry.daily_allowance)
    }

    /// Teaching days beyond the minimum the load allows.
    pub(super) fn extra_days(&self, professor: usize, slot_of: &impl Fn(EventId) -> Slot) -> u32 {
        let entry = &self.professors[professor];
        day_mask(&entry.events, slot_of)
            .count_ones()
            .saturating_sub(entry.min_days)
    }

    pub(super) fn is_extreme(&self, slot: Slot) -> bool {
        slot.is_edge_period()
    }

    pub(super) fn is_refused(&self, event: EventId, slot: Slot) -> bool {
        self.professors[self.profiles[event].professor]
            .excluded
            .contains(&slot)
    }

    pub(super) fn is_outside_shift(&self, event: EventId, slot: Slot) -> bool {
        self.groups[self.profiles[event].group]
            .shift
            .is_some_and(|shift| !shift.contains(slot))
    }

    /// Unweighted units of one rule over the whole timetable.
    pub(super) fn rule_units(&self, rule: SoftConstraint, slot_of: &impl Fn(EventId) -> Slot) -> u32 {
        let events = 0..self.profiles.len();
        match rule {
            SoftConstraint::IdleGaps => {
                let groups: u32 = (0..self.groups.len())
                    .flat_map(|g| (0..DAYS).map(move |d| (g, d)))
                    .map(|(g, d)| self.group_gaps(g, d, slot_of))
                    .sum();
                let professors: u32 = (0..self.professors.len())
                    .flat_map(|p| (0..DAYS).map(move |d| (p, d)))
                    .map(|(p, d)| self.professor_gaps(p, d, slot_of))
                    .sum();
                groups + professors
            }
            SoftConstraint::Clustering => (0..self.subjects.len())
                .flat_map(|s| (0..DAYS).map(move |d| (s, d)))
                .map(|(s, d)| self.subject_excess(s, d, slot_of))
                .sum(),
            SoftConstraint::ExtremePeriods => {
                events.filter(|&e| self.is_extreme(slot_of(e))).count() as u32
            }
            SoftConstraint::ExcludedSlots => {
                events.filter(|&e| self.is_refused(e, slot_of(e))).count() as u32
            }
            SoftConstraint::CompactDays => (0..self.professors.len())
                .map(|p| self.extra_days(p, slot_of))
                .sum(),
            SoftConstraint::OutsideShift => {
                events.filter(|&e| self.is_outside_shift(e, slot_of(e))).count() as u32
            }
        }
    }

    /// Weighted penalty of every scope containing `event` on `days`.
    ///
    /// Two evaluations of this with different `slot_of` differ exactly by
    /// the change in total soft penalty, provided only `event` moved and
    /// only between the given days.
    pub(super) fn local_penalty(
        &self,
        event: EventId,
        days: &[u8; 2],
        slot_of: &impl Fn(EventId) -> Slot,
    ) -> u32 {
        let profile = &self.profiles[event];
        let w = &self.weights;
        let mut total = 0;

        let same_day = days[0] == days[1];
        for &day in days.iter().take(if same_day { 1 } else { 2 }) {
            total += w.idle_gaps
                * (self.group_gaps(profile.group, day, slot_of)
                    + self.professor_gaps(profile.professor, day, slot_of));
            total += w.clustering * self.subject_excess(profile.subject, day, slot_of);
        }
        total += w.compact_days * self.extra_days(profile.professor, slot_of);

        let slot = slot_of(event);
        total += w.extreme_periods * u32::from(self.is_extreme(slot));
        total += w.excluded_slots * u32::from(self.is_refused(event, slot));
        total += w.outside_shift * u32::from(self.is_outside_shift(event, slot));
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ConflictGraph;
    use crate::models::{
        Catalog, Event, Group, Professor, Room, Shift, SoftWeights, Subject,
    };

    #[test]
    fn test_gaps() {
        assert_eq!(gaps(0), 0);
        assert_eq!(gaps(0b1), 0);
        assert_eq!(gaps(0b111), 0);
        assert_eq!(gaps(0b101), 1);
        assert_eq!(gaps(0b1000_0001), 6);
        assert_eq!(gaps(0b0110_0110), 2);
    }

    fn single_group(hours: u32, shift: Shift) -> (Catalog, Vec<Event>) {
        let catalog = Catalog::new(
            vec![Professor::new(0, 20).with_excluded_slot(Slot::new(0, 5))],
            vec![Subject::new(0, hours, 0, 0)],
            vec![Group::new(0, 20).with_shift(shift).with_subject(0)],
            vec![Room::new(0, 30)],
        );
        let subject = catalog.subjects[0].clone();
        let events = (0..hours as usize)
            .map(|i| Event::for_subject(i, &subject, 0))
            .collect();
        (catalog, events)
    }

    fn place(events: &mut [Event], slots: &[(u8, u8)]) {
        for (event, &(d, p)) in events.iter_mut().zip(slots) {
            event.slot = Slot::new(d, p);
        }
    }

    #[test]
    fn test_rule_units() {
        let (catalog, mut events) = single_group(5, Shift::Morning);
        // Day 0: periods 1, 3, 5 (gaps 2 for group and professor, refused slot at 0/5).
        // Day 1: periods 0, 13 (12 gaps each, both extreme, 13 outside morning).
        place(&mut events, &[(0, 1), (0, 3), (0, 5), (1, 0), (1, 13)]);
        let graph = ConflictGraph::from_events(&events);
        let eval = Evaluator::new(&catalog, &events, &graph, SoftWeights::default());
        let slot_of = |i: EventId| events[i].slot;

        assert_eq!(eval.rule_units(SoftConstraint::IdleGaps, &slot_of), 2 * (2 + 12));
        // Allowance ceil(5/5) = 1: day 0 exceeds by 2, day 1 by 1.
        assert_eq!(eval.rule_units(SoftConstraint::Clustering, &slot_of), 3);
        assert_eq!(eval.rule_units(SoftConstraint::ExtremePeriods, &slot_of), 2);
        assert_eq!(eval.rule_units(SoftConstraint::ExcludedSlots, &slot_of), 1);
        // Five hours fit in one day, two are used.
        assert_eq!(eval.rule_units(SoftConstraint::CompactDays, &slot_of), 1);
        assert_eq!(eval.rule_units(SoftConstraint::OutsideShift, &slot_of), 1);
    }

    #[test]
    fn test_compact_timetable_has_no_penalty() {
        let (catalog, mut events) = single_group(3, Shift::Evening);
        place(&mut events, &[(2, 8), (2, 9), (2, 10)]);
        let graph = ConflictGraph::from_events(&events);
        let weights = SoftWeights::default();
        let eval = Evaluator::new(&catalog, &events, &graph, weights);
        let d = eval.evaluate_detailed(&events);

        // Only clustering: allowance 1, three hours on one day.
        assert_eq!(d.soft[&SoftConstraint::Clustering], 2 * weights.clustering);
        assert_eq!(d.score.soft, 2 * weights.clustering);
        assert_eq!(d.score.hard, 0);
    }
}
