//! Error types.
//!
//! Configuration problems are fatal and surface before any search starts.
//! An infeasible final timetable is a reported outcome, it only becomes an
//! error when the caller asks for a feasible solution. Rejected or tabu
//! candidate moves are ordinary control flow and never produce errors.

use thiserror::Error;

use crate::models::{EventId, Slot};
use crate::validation::ValidationError;

/// Result type alias for timetabling operations.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Errors raised by the timetabling engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimetableError {
    /// The catalog is malformed or infeasible by construction.
    #[error("catalog rejected with {} issue(s): {}", .0.len(), summarize(.0))]
    Configuration(Vec<ValidationError>),

    /// The search configuration or initial solution is unusable.
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),

    /// The search ended without reaching feasibility.
    #[error("no feasible timetable: {hard_conflicts} hard conflict(s) left after {iterations} iteration(s)")]
    InfeasibleSolution {
        /// Hard conflicts of the best solution found.
        hard_conflicts: u32,
        /// Iterations performed.
        iterations: u64,
    },

    /// A move no longer matches the event it targets.
    #[error("stale move for event {event}: expected it at {expected}, found {actual:?}")]
    StaleMove {
        /// Event targeted by the move.
        event: EventId,
        /// Origin slot recorded in the move.
        expected: Slot,
        /// Slot the event actually occupies, if it exists.
        actual: Option<Slot>,
    },
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
