//! Search configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, TimetableError};
use crate::models::SoftWeights;

use super::NeighborhoodPolicy;

/// Tuning knobs of a tabu-search run.
///
/// # Example
/// ```
/// use u_timetable::tabu::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_max_iterations(500)
///     .with_tenure(7)
///     .with_seed(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Iterations a reversed move stays forbidden.
    pub tenure: u64,
    /// Maximum live entries in tabu memory.
    pub memory_capacity: usize,
    /// Iteration budget.
    pub max_iterations: u64,
    /// Optional wall-clock limit.
    pub time_limit: Option<Duration>,
    /// Iterations without a new best, once feasible, before stopping.
    pub patience: u64,
    /// Whether a tabu move that beats the best score may be taken.
    pub aspiration: bool,
    /// Seed for construction, sampling and perturbation.
    pub seed: u64,
    /// Soft-rule weights.
    pub weights: SoftWeights,
    /// Which events are considered for moves.
    pub neighborhood: NeighborhoodPolicy,
    /// Consider at most this many candidate events per iteration.
    pub event_sample: Option<usize>,
    /// Emit a progress log line every this many iterations (0 disables).
    pub log_every: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tenure: 10,
            memory_capacity: 20,
            max_iterations: 1000,
            time_limit: None,
            patience: 50,
            aspiration: true,
            seed: 42,
            weights: SoftWeights::default(),
            neighborhood: NeighborhoodPolicy::default(),
            event_sample: None,
            log_every: 100,
        }
    }
}

impl SearchConfig {
    /// Sets the tabu tenure.
    pub fn with_tenure(mut self, tenure: u64) -> Self {
        self.tenure = tenure;
        self
    }

    /// Sets the tabu memory capacity.
    pub fn with_memory_capacity(mut self, capacity: usize) -> Self {
        self.memory_capacity = capacity;
        self
    }

    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets a wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the patience window.
    pub fn with_patience(mut self, patience: u64) -> Self {
        self.patience = patience;
        self
    }

    /// Enables or disables aspiration.
    pub fn with_aspiration(mut self, enabled: bool) -> Self {
        self.aspiration = enabled;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the soft-rule weights.
    pub fn with_weights(mut self, weights: SoftWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the neighborhood policy.
    pub fn with_neighborhood(mut self, policy: NeighborhoodPolicy) -> Self {
        self.neighborhood = policy;
        self
    }

    /// Limits candidate events per iteration.
    pub fn with_event_sample(mut self, events: usize) -> Self {
        self.event_sample = Some(events);
        self
    }

    /// Sets the progress log interval.
    pub fn with_log_every(mut self, iterations: u64) -> Self {
        self.log_every = iterations;
        self
    }

    /// Rejects unusable settings.
    pub fn validate(&self) -> Result<()> {
        if self.memory_capacity == 0 {
            return Err(TimetableError::InvalidConfig(
                "memory_capacity must be at least 1".into(),
            ));
        }
        if self.event_sample == Some(0) {
            return Err(TimetableError::InvalidConfig(
                "event_sample must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SearchConfig::default();
        assert_eq!(c.tenure, 10);
        assert_eq!(c.memory_capacity, 20);
        assert_eq!(c.max_iterations, 1000);
        assert_eq!(c.patience, 50);
        assert!(c.aspiration);
        assert_eq!(c.neighborhood, NeighborhoodPolicy::ConflictFocused);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = SearchConfig::default()
            .with_memory_capacity(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, TimetableError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_sample_rejected() {
        assert!(SearchConfig::default()
            .with_event_sample(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_json_roundtrip_with_partial_input() {
        let config = SearchConfig::default()
            .with_time_limit(Duration::from_millis(250))
            .with_seed(9);
        let json = serde_json::to_string(&config).unwrap();
        let back: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let partial: SearchConfig = serde_json::from_str(r#"{"tenure": 4}"#).unwrap();
        assert_eq!(partial.tenure, 4);
        assert_eq!(partial.max_iterations, 1000);
    }
}
