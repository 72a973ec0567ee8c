//! Simulated annealing over color-to-slot assignments.
//!
//! An alternative to the greedy strategies in [`crate::overlap`]. The cost of
//! an assignment is the total manual swap count, computed with the same
//! per-slot function the greedy strategies use, so results compare directly.

mod acceptor;
mod moves;
mod statistics;
mod termination;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use swapforge_config::{AnnealingConfig, OptimizerConfig};
use swapforge_core::{Color, Result, SwapForgeError};
use tracing::{debug, info, trace};

use crate::overlap::OverlapAnalyzer;
use crate::plan::SlotPlan;

pub use acceptor::MetropolisAcceptor;
pub use moves::AnnealingMove;
pub use statistics::AnnealingStatistics;
pub use termination::{
    AnnealingScope, ExternalTermination, IterationTermination, OrTermination, Termination,
    TimeTermination,
};

/// Iterations between deadline and cancellation checks when none is configured.
const DEFAULT_CHECK_INTERVAL: u64 = 100;

/// Output of one annealing run.
#[derive(Debug, Clone)]
pub struct AnnealingResult {
    /// Best assignment seen, in the same shape the greedy strategies produce.
    pub plan: SlotPlan,
    pub statistics: AnnealingStatistics,
}

/// Simulated annealing optimizer.
///
/// A plain value: every call to [`AnnealingOptimizer::optimize`] starts from
/// scratch and shares nothing with other calls.
///
/// # Example
///
/// ```
/// use swapforge_core::Color;
/// use swapforge_solver::AnnealingOptimizer;
///
/// let colors: Vec<Color> = (0..6)
///     .map(|i| Color::from_range(format!("T{i}"), i * 10, i * 10 + 15, 100).unwrap())
///     .collect();
///
/// let result = AnnealingOptimizer::new(4)
///     .unwrap()
///     .with_seed(42)
///     .optimize(&colors)
///     .unwrap();
/// assert_eq!(result.plan.assigned_count(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct AnnealingOptimizer {
    parameters: AnnealingConfig,
    max_slots: usize,
    seed: Option<u64>,
    time_limit: Option<Duration>,
    check_interval: u64,
    terminate: Option<Arc<AtomicBool>>,
}

impl AnnealingOptimizer {
    /// Creates an optimizer with default parameters for `max_slots` slots.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when `max_slots` is zero.
    pub fn new(max_slots: usize) -> Result<Self> {
        if max_slots == 0 {
            return Err(SwapForgeError::Configuration(
                "at least one slot is required".to_string(),
            ));
        }
        Ok(Self {
            parameters: AnnealingConfig::default(),
            max_slots,
            seed: None,
            time_limit: None,
            check_interval: DEFAULT_CHECK_INTERVAL,
            terminate: None,
        })
    }

    /// Creates an optimizer from a validated optimizer configuration.
    pub fn from_config(config: &OptimizerConfig) -> Result<Self> {
        config.validate()?;
        let mut optimizer = Self::new(config.total_slots())?.with_parameters(config.annealing.clone());
        optimizer.seed = config.random_seed;
        optimizer.time_limit = config.time_limit();
        if let Some(interval) = config.termination.as_ref().and_then(|t| t.check_interval) {
            optimizer = optimizer.with_check_interval(interval);
        }
        Ok(optimizer)
    }

    pub fn with_parameters(mut self, parameters: AnnealingConfig) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.parameters.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Iterations between deadline and cancellation checks (at least 1).
    pub fn with_check_interval(mut self, interval: u64) -> Self {
        self.check_interval = interval.max(1);
        self
    }

    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate = Some(flag);
        self
    }

    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    pub fn parameters(&self) -> &AnnealingConfig {
        &self.parameters
    }

    /// Runs the optimizer with a `ChaCha8Rng` seeded from the configured seed,
    /// or from the thread rng when there is none.
    pub fn optimize(&self, colors: &[Color]) -> Result<AnnealingResult> {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        debug!(event = "rng_seeded", seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut result = self.optimize_with_rng(colors, &mut rng)?;
        result.statistics.seed = Some(seed);
        Ok(result)
    }

    /// Runs the optimizer drawing randomness from `rng`.
    pub fn optimize_with_rng<R: Rng + ?Sized>(
        &self,
        colors: &[Color],
        rng: &mut R,
    ) -> Result<AnnealingResult> {
        let started = Instant::now();
        let n = colors.len();

        info!(
            event = "phase_start",
            phase = "Simulated Annealing",
            colors = n,
            slots = self.max_slots,
            iterations = self.parameters.iterations,
        );

        if n <= self.max_slots {
            let statistics = AnnealingStatistics {
                final_temperature: self.parameters.initial_temperature,
                duration: started.elapsed(),
                ..AnnealingStatistics::default()
            };
            info!(
                event = "phase_end",
                phase = "Simulated Annealing",
                duration_ms = statistics.duration.as_millis() as u64,
                iterations = 0u64,
                best_cost = 0usize,
                acceptance_rate = 0.0,
            );
            return Ok(AnnealingResult {
                plan: SlotPlan::one_per_slot(colors, self.max_slots),
                statistics,
            });
        }

        let mut current = AssignmentState::round_robin(n, self.max_slots);
        let mut best = current.assignment.clone();
        let mut best_cost = current.cost;

        let mut acceptor = MetropolisAcceptor::new(
            self.parameters.initial_temperature,
            self.parameters.cooling_rate,
            self.parameters.min_temperature,
        );
        acceptor.phase_started();

        let mut statistics = AnnealingStatistics {
            initial_cost: current.cost,
            ..AnnealingStatistics::default()
        };

        let budget = IterationTermination::new(self.parameters.iterations);
        let interrupt = OrTermination(
            self.time_limit.map(TimeTermination::new),
            self.terminate.clone().map(ExternalTermination::new),
        );
        let mut scope = AnnealingScope::new();
        let mut last_progress = Instant::now();

        while !budget.is_terminated(&scope) {
            if scope.iteration() % self.check_interval == 0 && interrupt.is_terminated(&scope) {
                statistics.terminated_early = true;
                break;
            }

            let mv = AnnealingMove::propose(&current.assignment, self.max_slots, rng);
            scope.increment_iteration();

            if mv != AnnealingMove::Unchanged {
                statistics.moves_evaluated += 1;
                let previous_cost = current.cost;
                current.apply(&mv);

                let accepted = acceptor.is_accepted(previous_cost, current.cost, rng);
                trace!(
                    event = "step",
                    step = scope.iteration(),
                    kind = mv.kind(),
                    cost = current.cost,
                    accepted,
                );

                if accepted {
                    statistics.moves_accepted += 1;
                    if current.cost < best_cost {
                        best_cost = current.cost;
                        best.clone_from(&current.assignment);
                        statistics.improvements += 1;
                    }
                } else {
                    current.undo(&mv);
                }
            }

            acceptor.cool();

            if last_progress.elapsed().as_secs() >= 1 {
                debug!(
                    event = "progress",
                    iteration = scope.iteration(),
                    temperature = acceptor.temperature(),
                    best_cost,
                );
                last_progress = Instant::now();
            }
        }

        statistics.iterations = scope.iteration();
        statistics.best_cost = best_cost;
        statistics.final_temperature = acceptor.temperature();
        statistics.duration = started.elapsed();

        info!(
            event = "phase_end",
            phase = "Simulated Annealing",
            duration_ms = statistics.duration.as_millis() as u64,
            iterations = statistics.iterations,
            best_cost,
            acceptance_rate = statistics.acceptance_rate(),
            terminated_early = statistics.terminated_early,
        );

        Ok(AnnealingResult {
            plan: plan_from_assignment(colors, &best, self.max_slots),
            statistics,
        })
    }
}

/// Slot number (1-based) per color, with slot sizes and cost kept in step.
#[derive(Debug, Clone)]
struct AssignmentState {
    assignment: Vec<usize>,
    sizes: Vec<usize>,
    cost: usize,
}

impl AssignmentState {
    /// Color `i` goes to slot `i mod max_slots`.
    fn round_robin(n: usize, max_slots: usize) -> Self {
        let assignment: Vec<usize> = (0..n).map(|i| i % max_slots + 1).collect();
        let mut sizes = vec![0; max_slots];
        for &slot in &assignment {
            sizes[slot - 1] += 1;
        }
        let cost = sizes.iter().map(|&s| OverlapAnalyzer::swaps_for_size(s)).sum();
        Self {
            assignment,
            sizes,
            cost,
        }
    }

    fn touched_cost(&self, mv: &AnnealingMove) -> usize {
        mv.touched_slots(&self.assignment)
            .iter()
            .map(|&slot| OverlapAnalyzer::swaps_for_size(self.sizes[slot - 1]))
            .sum()
    }

    fn apply(&mut self, mv: &AnnealingMove) {
        let before = self.touched_cost(mv);
        if let AnnealingMove::Change { from, to, .. } = *mv {
            self.sizes[from - 1] -= 1;
            self.sizes[to - 1] += 1;
        }
        mv.apply(&mut self.assignment);
        self.cost = self.cost - before + self.touched_cost(mv);
    }

    fn undo(&mut self, mv: &AnnealingMove) {
        let before = self.touched_cost(mv);
        if let AnnealingMove::Change { from, to, .. } = *mv {
            self.sizes[to - 1] -= 1;
            self.sizes[from - 1] += 1;
        }
        mv.undo(&mut self.assignment);
        self.cost = self.cost - before + self.touched_cost(mv);
    }
}

/// Converts a 1-based slot assignment into a plan, colors in input order.
fn plan_from_assignment(colors: &[Color], assignment: &[usize], max_slots: usize) -> SlotPlan {
    let mut groups: Vec<Vec<Color>> = vec![Vec::new(); max_slots];
    for (color, &slot) in colors.iter().zip(assignment) {
        groups[slot - 1].push(color.clone());
    }

    let forced_placements = groups
        .iter()
        .map(|group| {
            (1..group.len())
                .filter(|&j| {
                    group[..j]
                        .iter()
                        .any(|earlier| OverlapAnalyzer::has_overlap(earlier, &group[j]))
                })
                .count()
        })
        .sum();

    let mut plan = SlotPlan::from_assignments(groups);
    plan.forced_placements = forced_placements;
    plan
}
