//! Tabu search.
//!
//! - [`TabuMemory`]: short-term memory of forbidden (event, slot) pairs
//! - [`SearchConfig`]: tenure, capacity, budgets, weights, seed
//! - [`NeighborhoodPolicy`]: which events are moved
//! - [`MoveSelector`]: tabu screening, aspiration and tie-breaking
//! - [`TabuSearch`]: the engine

mod config;
mod memory;
mod neighborhood;
mod search;
mod selection;

pub use config::SearchConfig;
pub use memory::{TabuEntry, TabuMemory};
pub use neighborhood::{moves_for, sample_events, NeighborhoodPolicy};
pub use search::{Progress, SearchResult, TabuSearch, Termination};
pub use selection::{Candidate, MoveSelector};
