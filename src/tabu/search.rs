//! Tabu search engine.
//!
//! # Algorithm
//!
//! 1. Build an initial timetable with [`FirstFitScheduler`] (or take one
//!    from the caller) and the Conflict Graph of its events.
//! 2. Each iteration: generate single-event slot moves for the candidate
//!    events, skip tabu moves unless they aspire, apply the best move by
//!    (hard delta, soft delta, event id, slot id) and forbid its reverse
//!    for `tenure` iterations.
//! 3. If every candidate is tabu and none aspires, move a random
//!    candidate event to a random slot instead (stagnation recovery).
//! 4. Stop on the external signal, the iteration budget, the time limit,
//!    a perfect score, or `patience` iterations without a new best once a
//!    feasible timetable is known. Checked in that order at the top of
//!    every iteration.
//!
//! The best timetable seen is returned, never a half-applied move.
//!
//! # Reference
//! Glover & Laguna (1997), "Tabu Search", Ch. 2-3

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use crate::error::{Result, TimetableError};
use crate::evaluation::Evaluator;
use crate::graph::ConflictGraph;
use crate::models::{Catalog, Event, EventId, Move, Score, Slot, Solution, SLOT_COUNT};
use crate::scheduler::FirstFitScheduler;
use crate::validation::validate_catalog;

use super::neighborhood::{moves_for, sample_events};
use super::{MoveSelector, SearchConfig, TabuMemory};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    /// No hard conflicts and no soft penalty.
    Optimal,
    /// Feasible and no new best within the patience window, or nothing
    /// left to move.
    Converged,
    /// Iteration budget used up.
    BudgetExhausted,
    /// Wall-clock limit reached.
    TimeLimit,
    /// External stop signal raised.
    Cancelled,
}

/// Snapshot passed to an observer after every iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Iteration just completed (1-based).
    pub iteration: u64,
    /// Score of the current timetable.
    pub current: Score,
    /// Best score so far.
    pub best: Score,
    /// Live tabu entries.
    pub tabu_len: usize,
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best timetable found, with its score.
    pub solution: Solution,
    /// Score of the starting timetable.
    pub initial: Score,
    /// Iterations performed.
    pub iterations: u64,
    /// Iteration at which the best timetable was found (0 = initial).
    pub best_iteration: u64,
    /// Perturbations applied after stagnation.
    pub restarts: u64,
    /// Tabu moves admitted by aspiration.
    pub aspirations: u64,
    /// Why the run stopped.
    pub termination: Termination,
    /// Wall-clock duration.
    pub elapsed: Duration,
}

impl SearchResult {
    /// Score of the returned timetable.
    pub fn score(&self) -> Score {
        self.solution.score()
    }

    /// Whether the returned timetable has no hard conflicts.
    pub fn is_feasible(&self) -> bool {
        self.solution.is_feasible()
    }

    /// The timetable, or [`TimetableError::InfeasibleSolution`] if it still
    /// has hard conflicts.
    pub fn into_feasible(self) -> Result<Solution> {
        if self.solution.is_feasible() {
            Ok(self.solution)
        } else {
            Err(TimetableError::InfeasibleSolution {
                hard_conflicts: self.solution.hard_conflicts,
                iterations: self.iterations,
            })
        }
    }
}

/// Tabu search over a validated catalog.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Catalog, Group, Professor, Room, Subject};
/// use u_timetable::tabu::{SearchConfig, TabuSearch};
///
/// let catalog = Catalog::new(
///     vec![Professor::new(0, 10), Professor::new(1, 10)],
///     vec![Subject::new(0, 2, 0, 0), Subject::new(1, 2, 0, 1)],
///     vec![Group::new(0, 25).with_subject(0).with_subject(1)],
///     vec![Room::new(0, 30)],
/// );
/// let result = TabuSearch::new(&catalog, SearchConfig::default().with_max_iterations(200))
///     .unwrap()
///     .run()
///     .unwrap();
/// assert!(result.is_feasible());
/// ```
#[derive(Debug, Clone)]
pub struct TabuSearch<'a> {
    catalog: &'a Catalog,
    config: SearchConfig,
    stop: Option<Arc<AtomicBool>>,
}

impl<'a> TabuSearch<'a> {
    /// Validates the catalog and the configuration.
    ///
    /// # Errors
    /// [`TimetableError::Configuration`] with every catalog issue, or
    /// [`TimetableError::InvalidConfig`] for unusable settings.
    pub fn new(catalog: &'a Catalog, config: SearchConfig) -> Result<Self> {
        validate_catalog(catalog).map_err(TimetableError::Configuration)?;
        config.validate()?;
        Ok(Self {
            catalog,
            config,
            stop: None,
        })
    }

    /// Installs an external stop signal, checked once per iteration.
    pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Builds an initial timetable and searches from it.
    pub fn run(&self) -> Result<SearchResult> {
        self.run_with_observer(|_| {})
    }

    /// Like [`run`](Self::run), calling `observer` after every iteration.
    pub fn run_with_observer<F>(&self, observer: F) -> Result<SearchResult>
    where
        F: FnMut(&Progress),
    {
        let events = FirstFitScheduler::new(self.config.seed).build(self.catalog);
        self.search(Solution::new(events), observer)
    }

    /// Searches from a caller-supplied timetable.
    ///
    /// # Errors
    /// [`TimetableError::InvalidConfig`] if events are not indexed `0..n`,
    /// sit outside the grid or reference entities missing from the catalog.
    pub fn run_from(&self, initial: Solution) -> Result<SearchResult> {
        self.search(initial, |_| {})
    }

    /// Like [`run_from`](Self::run_from), calling `observer` after every
    /// iteration.
    pub fn run_from_with_observer<F>(&self, initial: Solution, observer: F) -> Result<SearchResult>
    where
        F: FnMut(&Progress),
    {
        self.search(initial, observer)
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|s| s.load(Ordering::Relaxed))
    }

    fn check_initial(&self, events: &[Event]) -> Result<()> {
        for (idx, event) in events.iter().enumerate() {
            let problem = if event.id != idx {
                Some(format!("event at position {idx} has id {}", event.id))
            } else if Slot::try_new(event.slot.day, event.slot.period).is_none() {
                Some(format!("event {idx} sits outside the grid"))
            } else if self.catalog.subject(event.subject_id).is_none() {
                Some(format!("event {idx} references unknown subject {}", event.subject_id))
            } else if self.catalog.professor(event.professor_id).is_none() {
                Some(format!("event {idx} references unknown professor {}", event.professor_id))
            } else if self.catalog.group(event.group_id).is_none() {
                Some(format!("event {idx} references unknown group {}", event.group_id))
            } else if self.catalog.room(event.room_id).is_none() {
                Some(format!("event {idx} references unknown room {}", event.room_id))
            } else {
                None
            };
            if let Some(message) = problem {
                return Err(TimetableError::InvalidConfig(message));
            }
        }
        Ok(())
    }

    #[instrument(skip_all, fields(events = initial.events.len(), seed = self.config.seed))]
    fn search<F>(&self, initial: Solution, mut observer: F) -> Result<SearchResult>
    where
        F: FnMut(&Progress),
    {
        self.check_initial(&initial.events)?;

        let started = Instant::now();
        let config = &self.config;
        let graph = ConflictGraph::from_events(&initial.events);
        let evaluator = Evaluator::new(self.catalog, &initial.events, &graph, config.weights);
        let selector = MoveSelector::new(&evaluator, config.aspiration);
        let mut memory = TabuMemory::new(config.tenure, config.memory_capacity)?;
        let mut rng = SmallRng::seed_from_u64(config.seed);

        let mut current = initial;
        let initial_score = evaluator.evaluate(&current.events);
        current.set_score(initial_score);
        let mut best = current.clone();

        let mut iteration: u64 = 0;
        let mut best_iteration: u64 = 0;
        let mut since_best: u64 = 0;
        let mut restarts: u64 = 0;
        let mut aspirations: u64 = 0;

        info!(
            events = current.event_count(),
            edges = graph.edge_count(),
            hard = initial_score.hard,
            soft = initial_score.soft,
            "tabu search started"
        );

        let termination = loop {
            let best_score = best.score();
            if self.stop_requested() {
                break Termination::Cancelled;
            }
            if iteration >= config.max_iterations {
                break Termination::BudgetExhausted;
            }
            if config.time_limit.is_some_and(|limit| started.elapsed() >= limit) {
                break Termination::TimeLimit;
            }
            if best_score == Score::default() {
                break Termination::Optimal;
            }
            if best_score.is_feasible() && since_best >= config.patience {
                break Termination::Converged;
            }

            iteration += 1;
            let mut candidates = config
                .neighborhood
                .candidate_events(&evaluator, &current.events);
            if let Some(limit) = config.event_sample {
                sample_events(&mut candidates, limit, &mut rng);
            }
            let moves = moves_for(&current.events, &candidates);
            let current_score = current.score();

            let applied = match selector.select(
                &current.events,
                current_score,
                best_score,
                &moves,
                &memory,
                iteration,
            ) {
                Some(chosen) => {
                    current.commit(&chosen.mv, chosen.score)?;
                    if chosen.aspirated {
                        aspirations += 1;
                    }
                    trace!(
                        iteration,
                        mv = %chosen.mv,
                        hard = chosen.score.hard,
                        soft = chosen.score.soft,
                        aspirated = chosen.aspirated,
                        "move applied"
                    );
                    chosen.mv
                }
                None => {
                    let Some(mv) = perturbation(&current.events, &candidates, &mut rng) else {
                        break Termination::Converged;
                    };
                    let score = evaluator.delta(&current.events, &mv).apply(current_score);
                    current.commit(&mv, score)?;
                    restarts += 1;
                    debug!(iteration, mv = %mv, "stagnation recovered by perturbation");
                    mv
                }
            };
            memory.record(&applied.reverse(), iteration);
            memory.purge_expired(iteration);

            if current.score() < best.score() {
                best = current.clone();
                best_iteration = iteration;
                since_best = 0;
                debug!(iteration, score = %best.score(), "new best");
            } else {
                since_best += 1;
            }

            if config.log_every > 0 && iteration % config.log_every == 0 {
                info!(
                    iteration,
                    current = %current.score(),
                    best = %best.score(),
                    tabu = memory.len(),
                    "tabu search progress"
                );
            }

            observer(&Progress {
                iteration,
                current: current.score(),
                best: best.score(),
                tabu_len: memory.len(),
            });
        };

        let elapsed = started.elapsed();
        info!(
            iterations = iteration,
            restarts,
            termination = ?termination,
            hard = best.hard_conflicts,
            soft = best.soft_penalty,
            quality = best.quality,
            elapsed_ms = elapsed.as_millis() as u64,
            "tabu search finished"
        );

        Ok(SearchResult {
            solution: best,
            initial: initial_score,
            iterations: iteration,
            best_iteration,
            restarts,
            aspirations,
            termination,
            elapsed,
        })
    }
}

/// Random reassignment of one candidate event, ignoring tabu status.
///
/// Falls back to any event when there are no candidates; `None` only if
/// there are no events at all.
fn perturbation(events: &[Event], candidates: &[EventId], rng: &mut SmallRng) -> Option<Move> {
    let event = match candidates.choose(rng) {
        Some(&e) => e,
        None if events.is_empty() => return None,
        None => rng.random_range(0..events.len()),
    };
    let from = events[event].slot;
    // Draw from the 69 other slots.
    let mut id = rng.random_range(0..SLOT_COUNT - 1);
    if id >= from.id() {
        id += 1;
    }
    Some(Move::new(event, from, Slot::from_id(id)))
}
