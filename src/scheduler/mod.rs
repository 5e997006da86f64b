//! Constructive scheduling and KPI evaluation.
//!
//! Provides the first-fit heuristic that builds the initial timetable
//! and the report metrics of a finished one.
//!
//! # Algorithm
//!
//! `FirstFitScheduler` places events hardest subject first into the most
//! preferred slot where professor, group and a suitable room are free.
//! It is not optimal; it gives tabu search a good starting point.
//!
//! # KPI
//!
//! `TimetableKpi` computes hard and soft totals, per-rule breakdowns,
//! quality, room utilization and professor load.
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

mod greedy;
mod kpi;

pub use greedy::FirstFitScheduler;
pub use kpi::TimetableKpi;
