//! Termination conditions for the annealing loop.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Progress of one annealing run, as seen by terminations.
#[derive(Debug, Clone, Copy)]
pub struct AnnealingScope {
    started: Instant,
    iteration: u64,
}

impl AnnealingScope {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            iteration: 0,
        }
    }

    /// Iterations completed so far.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub(crate) fn increment_iteration(&mut self) {
        self.iteration += 1;
    }
}

impl Default for AnnealingScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for determining when to stop annealing.
pub trait Termination: Send + Debug {
    /// Returns true if the run should stop.
    fn is_terminated(&self, scope: &AnnealingScope) -> bool;
}

/// An absent termination never fires.
impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, scope: &AnnealingScope) -> bool {
        self.as_ref().is_some_and(|t| t.is_terminated(scope))
    }
}

/// Terminates after a fixed number of iterations.
#[derive(Debug, Clone, Copy)]
pub struct IterationTermination {
    limit: u64,
}

impl IterationTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for IterationTermination {
    fn is_terminated(&self, scope: &AnnealingScope) -> bool {
        scope.iteration() >= self.limit
    }
}

/// Terminates after a time limit.
///
/// # Example
///
/// ```
/// use swapforge_solver::TimeTermination;
///
/// let term = TimeTermination::millis(500);
/// let term = TimeTermination::seconds(30);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimeTermination {
    limit: Duration,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}

impl Termination for TimeTermination {
    fn is_terminated(&self, scope: &AnnealingScope) -> bool {
        scope.elapsed() >= self.limit
    }
}

/// Terminates when an external flag is set.
///
/// The flag is shared, so another thread can stop a running optimization.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use swapforge_solver::ExternalTermination;
///
/// let flag = Arc::new(AtomicBool::new(false));
/// let term = ExternalTermination::new(Arc::clone(&flag));
///
/// // Later, from anywhere:
/// flag.store(true, Ordering::SeqCst);
/// ```
#[derive(Debug, Clone)]
pub struct ExternalTermination {
    flag: Arc<AtomicBool>,
}

impl ExternalTermination {
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }
}

impl Termination for ExternalTermination {
    fn is_terminated(&self, _scope: &AnnealingScope) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Combines two terminations with OR logic.
///
/// Nest to combine more:
///
/// ```
/// use swapforge_solver::{IterationTermination, OrTermination, TimeTermination};
///
/// let term = OrTermination(
///     IterationTermination::new(1000),
///     OrTermination(TimeTermination::seconds(5), None::<TimeTermination>),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct OrTermination<A, B>(pub A, pub B);

impl<A: Termination, B: Termination> Termination for OrTermination<A, B> {
    fn is_terminated(&self, scope: &AnnealingScope) -> bool {
        self.0.is_terminated(scope) || self.1.is_terminated(scope)
    }
}
