//! Statistics for one annealing run.

use std::time::Duration;

use serde::Serialize;

/// Counters collected while annealing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnealingStatistics {
    /// Iterations actually run.
    pub iterations: u64,
    /// Neighbor moves whose cost was evaluated.
    pub moves_evaluated: u64,
    /// Moves that replaced the current state.
    pub moves_accepted: u64,
    /// Times a new best cost was found.
    pub improvements: u64,
    pub initial_cost: usize,
    pub best_cost: usize,
    pub final_temperature: f64,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
    /// Stopped by the time limit or the external flag before the iteration budget ran out.
    pub terminated_early: bool,
    /// Seed of the random source, when it was seeded here.
    pub seed: Option<u64>,
}

impl AnnealingStatistics {
    /// Returns the acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves_evaluated == 0 {
            0.0
        } else {
            self.moves_accepted as f64 / self.moves_evaluated as f64
        }
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}
