//! Admissible-move selection.
//!
//! Screens candidates through tabu memory, applies the aspiration
//! override and picks the best by (hard delta, soft delta, event id,
//! destination slot id).

use crate::evaluation::{Evaluator, ScoreDelta};
use crate::models::{Event, Move, Score};

use super::TabuMemory;

/// A scored, admissible move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// The move.
    pub mv: Move,
    /// Score change it causes.
    pub delta: ScoreDelta,
    /// Score after applying it.
    pub score: Score,
    /// Tabu, but admitted because it beats the best score.
    pub aspirated: bool,
}

impl Candidate {
    fn key(&self) -> (ScoreDelta, usize, usize) {
        (self.delta, self.mv.event, self.mv.to.id())
    }
}

/// Picks the move to apply each iteration.
#[derive(Debug, Clone, Copy)]
pub struct MoveSelector<'e, 'g> {
    evaluator: &'e Evaluator<'g>,
    aspiration: bool,
}

impl<'e, 'g> MoveSelector<'e, 'g> {
    /// Creates a selector.
    pub fn new(evaluator: &'e Evaluator<'g>, aspiration: bool) -> Self {
        Self {
            evaluator,
            aspiration,
        }
    }

    /// Best admissible candidate, or `None` when every candidate is tabu
    /// and none qualifies for aspiration.
    ///
    /// A tabu move is admissible only when aspiration is enabled and its
    /// resulting score is strictly better than `best`.
    pub fn select(
        &self,
        events: &[Event],
        current: Score,
        best: Score,
        candidates: &[Move],
        memory: &TabuMemory,
        iteration: u64,
    ) -> Option<Candidate> {
        let mut chosen: Option<Candidate> = None;

        for mv in candidates {
            let tabu = memory.forbids(mv, iteration);
            if tabu && !self.aspiration {
                continue;
            }
            let delta = self.evaluator.delta(events, mv);
            let score = delta.apply(current);
            let aspirated = tabu && score < best;
            if tabu && !aspirated {
                continue;
            }

            let candidate = Candidate {
                mv: *mv,
                delta,
                score,
                aspirated,
            };
            if chosen.is_none_or(|c| candidate.key() < c.key()) {
                chosen = Some(candidate);
            }
        }

        chosen
    }
}
