//! Timetable quality metrics (KPIs).
//!
//! Summarizes a finished timetable for reporting.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Hard conflicts | Violations of any hard rule |
//! | Soft penalty | Weighted sum of soft-rule violations |
//! | Quality | `max(0, 100 - soft/10)` when feasible, else 0 |
//! | Room utilization | Occupied slots / 70 per room |
//! | Professor days | Distinct teaching days per professor |
//! | Professor hours | Events taught per professor |

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::evaluation::Evaluator;
use crate::graph::ConflictGraph;
use crate::models::{
    Catalog, Event, HardConstraint, ProfessorId, RoomId, SoftConstraint, SoftWeights, SLOT_COUNT,
};

/// Timetable performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableKpi {
    /// Number of events.
    pub events: usize,
    /// Hard-conflict count.
    pub hard_conflicts: u32,
    /// Weighted soft penalty.
    pub soft_penalty: u32,
    /// Quality in [0, 100].
    pub quality: f64,
    /// Violations per hard rule.
    pub hard_breakdown: BTreeMap<HardConstraint, u32>,
    /// Penalty per soft rule.
    pub soft_breakdown: BTreeMap<SoftConstraint, u32>,
    /// Fraction of the grid each catalog room is occupied (0.0..1.0).
    pub room_utilization: BTreeMap<RoomId, f64>,
    /// Mean of `room_utilization`.
    pub avg_room_utilization: f64,
    /// Distinct teaching days per professor.
    pub professor_days: BTreeMap<ProfessorId, u32>,
    /// Events per professor.
    pub professor_hours: BTreeMap<ProfessorId, u32>,
}

impl TimetableKpi {
    /// Computes KPIs for a timetable.
    ///
    /// # Arguments
    /// * `catalog` - The catalog the events were built from.
    /// * `events` - The timetable, indexed `0..n`.
    /// * `weights` - Soft weights used for the penalty.
    pub fn calculate(catalog: &Catalog, events: &[Event], weights: SoftWeights) -> Self {
        let graph = ConflictGraph::from_events(events);
        let evaluation = Evaluator::new(catalog, events, &graph, weights).evaluate_detailed(events);

        let mut occupied: BTreeMap<RoomId, BTreeSet<usize>> = catalog
            .rooms
            .iter()
            .map(|r| (r.id, BTreeSet::new()))
            .collect();
        let mut days: BTreeMap<ProfessorId, BTreeSet<u8>> = BTreeMap::new();
        let mut hours: BTreeMap<ProfessorId, u32> = BTreeMap::new();

        for event in events {
            if let Some(slots) = occupied.get_mut(&event.room_id) {
                slots.insert(event.slot.id());
            }
            days.entry(event.professor_id)
                .or_default()
                .insert(event.slot.day);
            *hours.entry(event.professor_id).or_insert(0) += 1;
        }

        let room_utilization: BTreeMap<RoomId, f64> = occupied
            .into_iter()
            .map(|(room, slots)| (room, slots.len() as f64 / SLOT_COUNT as f64))
            .collect();
        let avg_room_utilization = if room_utilization.is_empty() {
            0.0
        } else {
            room_utilization.values().sum::<f64>() / room_utilization.len() as f64
        };

        Self {
            events: events.len(),
            hard_conflicts: evaluation.score.hard,
            soft_penalty: evaluation.score.soft,
            quality: evaluation.score.quality(),
            hard_breakdown: evaluation.hard,
            soft_breakdown: evaluation.soft,
            room_utilization,
            avg_room_utilization,
            professor_days: days
                .into_iter()
                .map(|(p, d)| (p, d.len() as u32))
                .collect(),
            professor_hours: hours,
        }
    }

    /// Whether the timetable is feasible and reaches `min_quality`.
    pub fn meets_threshold(&self, min_quality: f64) -> bool {
        self.hard_conflicts == 0 && self.quality >= min_quality
    }
}
