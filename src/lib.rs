//! University course timetabling.
//!
//! Assigns every weekly hour of every subject to a slot of a 5-day,
//! 14-period grid and a room, so that no professor, group or room is
//! double-booked, while keeping days compact and preferences respected.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Professor`, `Subject`, `Group`, `Room`,
//!   `Slot`, `Catalog`, `Event`, `Move`, `Solution`, constraint kinds and
//!   soft weights
//! - **`graph`**: Conflict Graph of events that may not share a slot
//! - **`evaluation`**: Full and incremental scoring, conflict report
//! - **`tabu`**: Tabu memory, move selection and the search engine
//! - **`scheduler`**: First-fit initial timetable and KPIs
//! - **`validation`**: Pre-flight catalog checks
//!
//! # Example
//!
//! ```
//! use u_timetable::models::{Catalog, Group, Professor, Room, Subject};
//! use u_timetable::tabu::{SearchConfig, TabuSearch};
//!
//! let catalog = Catalog::new(
//!     vec![Professor::new(0, 20).with_name("Ada")],
//!     vec![Subject::new(0, 4, 0, 0).with_name("Algebra")],
//!     vec![Group::new(0, 30).with_name("1-A").with_subject(0)],
//!     vec![Room::new(0, 35)],
//! );
//!
//! let result = TabuSearch::new(&catalog, SearchConfig::default())?.run()?;
//! assert!(result.is_feasible());
//! # Ok::<(), u_timetable::TimetableError>(())
//! ```
//!
//! # References
//!
//! - Glover & Laguna (1997), "Tabu Search"
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - de Werra (1985), "An introduction to timetabling"

pub mod error;
pub mod evaluation;
pub mod graph;
pub mod models;
pub mod scheduler;
pub mod tabu;
pub mod validation;

pub use error::{Result, TimetableError};
