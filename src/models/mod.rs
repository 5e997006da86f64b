//! Timetabling domain models.
//!
//! Static input data (the catalog) and the search variables built on it.
//! Everything except [`Event::slot`] is fixed once a problem is loaded.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | School | Training Center |
//! |-------------|------------|--------|-----------------|
//! | Professor | Lecturer | Teacher | Instructor |
//! | Subject | Course | Class | Module |
//! | Group | Cohort | Form | Team |
//! | Room | Classroom/Lab | Classroom | Training Room |

mod catalog;
mod constraint;
mod event;
mod professor;
mod room;
mod slot;
mod solution;
mod subject;

pub use catalog::Catalog;
pub use constraint::{ConstraintKind, HardConstraint, Severity, SoftConstraint, SoftWeights};
pub use event::{Event, EventId, Move};
pub use professor::Professor;
pub use room::Room;
pub use slot::{Shift, Slot, DAYS, PERIODS_PER_DAY, SLOT_COUNT};
pub use solution::{Score, Solution, QUALITY_PENALTY_SCALE};
pub use subject::{Group, Subject};

/// Professor identifier.
pub type ProfessorId = u32;
/// Subject identifier.
pub type SubjectId = u32;
/// Group identifier.
pub type GroupId = u32;
/// Room identifier.
pub type RoomId = u32;
