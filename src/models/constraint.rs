//! Constraint kinds and soft-constraint weights.
//!
//! Hard constraints decide feasibility; each violation counts once.
//! Soft constraints are weighted preferences summed into the soft
//! penalty. Both sets are closed, so the evaluator matches them
//! exhaustively.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rule whose violation makes a timetable infeasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HardConstraint {
    /// Two events of the same professor share a slot.
    ProfessorOverlap,
    /// Two events of the same group share a slot.
    GroupOverlap,
    /// Two events in the same room share a slot.
    RoomOverlap,
    /// The room seats fewer students than the group has.
    RoomCapacity,
    /// A laboratory subject is placed in a non-laboratory room.
    LaboratoryRequired,
    /// A professor is loaded beyond their maximum hours.
    ProfessorHours,
    /// A subject has a different number of events than its weekly hours.
    WeeklyHours,
}

impl HardConstraint {
    /// All hard constraints.
    pub const ALL: [HardConstraint; 7] = [
        HardConstraint::ProfessorOverlap,
        HardConstraint::GroupOverlap,
        HardConstraint::RoomOverlap,
        HardConstraint::RoomCapacity,
        HardConstraint::LaboratoryRequired,
        HardConstraint::ProfessorHours,
        HardConstraint::WeeklyHours,
    ];

    /// Short description.
    pub fn description(&self) -> &'static str {
        match self {
            HardConstraint::ProfessorOverlap => "professor teaches two events at once",
            HardConstraint::GroupOverlap => "group attends two events at once",
            HardConstraint::RoomOverlap => "room hosts two events at once",
            HardConstraint::RoomCapacity => "room too small for the group",
            HardConstraint::LaboratoryRequired => "laboratory subject outside a laboratory",
            HardConstraint::ProfessorHours => "professor over maximum hours",
            HardConstraint::WeeklyHours => "subject hour count differs from weekly hours",
        }
    }
}

/// A weighted preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SoftConstraint {
    /// Free periods between the first and last event of a day,
    /// per group and per professor.
    IdleGaps,
    /// More hours of one subject on a day than an even spread needs.
    Clustering,
    /// Events in the first or last period of the day.
    ExtremePeriods,
    /// Events in a slot the professor refuses.
    ExcludedSlots,
    /// Professor teaching days beyond the fewest their load allows.
    CompactDays,
    /// Events outside the group's shift window.
    OutsideShift,
}

impl SoftConstraint {
    /// All soft constraints.
    pub const ALL: [SoftConstraint; 6] = [
        SoftConstraint::IdleGaps,
        SoftConstraint::Clustering,
        SoftConstraint::ExtremePeriods,
        SoftConstraint::ExcludedSlots,
        SoftConstraint::CompactDays,
        SoftConstraint::OutsideShift,
    ];

    /// Short description.
    pub fn description(&self) -> &'static str {
        match self {
            SoftConstraint::IdleGaps => "free periods inside a day",
            SoftConstraint::Clustering => "subject hours clustered on one day",
            SoftConstraint::ExtremePeriods => "first or last period of the day",
            SoftConstraint::ExcludedSlots => "professor refuses this slot",
            SoftConstraint::CompactDays => "professor load spread over extra days",
            SoftConstraint::OutsideShift => "outside the group's shift",
        }
    }
}

/// Severity of a detected conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Infeasible.
    Hard,
    /// Costs quality.
    Soft,
}

/// Either kind of constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// A hard rule.
    Hard(HardConstraint),
    /// A soft rule.
    Soft(SoftConstraint),
}

impl ConstraintKind {
    /// Severity of the rule.
    pub fn severity(&self) -> Severity {
        match self {
            ConstraintKind::Hard(_) => Severity::Hard,
            ConstraintKind::Soft(_) => Severity::Soft,
        }
    }

    /// Short description.
    pub fn description(&self) -> &'static str {
        match self {
            ConstraintKind::Hard(h) => h.description(),
            ConstraintKind::Soft(s) => s.description(),
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Penalty per unit of violation, one weight per soft rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftWeights {
    /// Per free period inside a day.
    pub idle_gaps: u32,
    /// Per excess hour of a subject on one day.
    pub clustering: u32,
    /// Per event in the first or last period.
    pub extreme_periods: u32,
    /// Per event in a refused slot.
    pub excluded_slots: u32,
    /// Per extra teaching day of a professor.
    pub compact_days: u32,
    /// Per event outside the group's shift.
    pub outside_shift: u32,
}

impl Default for SoftWeights {
    fn default() -> Self {
        Self {
            idle_gaps: 10,
            clustering: 8,
            extreme_periods: 5,
            excluded_slots: 15,
            compact_days: 7,
            outside_shift: 12,
        }
    }
}

impl SoftWeights {
    /// All weights zero: soft rules are ignored.
    pub fn zero() -> Self {
        Self {
            idle_gaps: 0,
            clustering: 0,
            extreme_periods: 0,
            excluded_slots: 0,
            compact_days: 0,
            outside_shift: 0,
        }
    }

    /// Weight of a rule.
    pub fn weight(&self, rule: SoftConstraint) -> u32 {
        match rule {
            SoftConstraint::IdleGaps => self.idle_gaps,
            SoftConstraint::Clustering => self.clustering,
            SoftConstraint::ExtremePeriods => self.extreme_periods,
            SoftConstraint::ExcludedSlots => self.excluded_slots,
            SoftConstraint::CompactDays => self.compact_days,
            SoftConstraint::OutsideShift => self.outside_shift,
        }
    }

    /// Sets the weight of a rule.
    pub fn with_weight(mut self, rule: SoftConstraint, weight: u32) -> Self {
        let slot = match rule {
            SoftConstraint::IdleGaps => &mut self.idle_gaps,
            SoftConstraint::Clustering => &mut self.clustering,
            SoftConstraint::ExtremePeriods => &mut self.extreme_periods,
            SoftConstraint::ExcludedSlots => &mut self.excluded_slots,
            SoftConstraint::CompactDays => &mut self.compact_days,
            SoftConstraint::OutsideShift => &mut self.outside_shift,
        };
        *slot = weight;
        self
    }
}
