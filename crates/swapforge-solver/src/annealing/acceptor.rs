//! Metropolis acceptor with geometric cooling.

use rand::Rng;

/// Simulated annealing acceptor - accepts worsening moves with
/// temperature-based probability.
///
/// Improving moves are always accepted. A move that raises the cost by
/// `delta` is accepted with probability `exp(-delta / temperature)`. The
/// temperature decays multiplicatively after every iteration and never
/// drops below `min_temperature`, so the formula stays defined.
///
/// # Example
///
/// ```
/// use swapforge_solver::MetropolisAcceptor;
///
/// let mut acceptor = MetropolisAcceptor::new(100.0, 0.5, 1.0);
/// acceptor.cool();
/// assert_eq!(acceptor.temperature(), 50.0);
/// ```
#[derive(Debug, Clone)]
pub struct MetropolisAcceptor {
    /// Initial temperature.
    starting_temperature: f64,
    /// Current temperature.
    current_temperature: f64,
    /// Temperature decay rate per iteration.
    cooling_rate: f64,
    /// Temperature floor.
    min_temperature: f64,
}

impl MetropolisAcceptor {
    /// Creates a new acceptor.
    ///
    /// # Arguments
    /// * `starting_temperature` - Initial temperature (higher = more exploration)
    /// * `cooling_rate` - Multiplicative decay per iteration (e.g., 0.995)
    /// * `min_temperature` - Floor the temperature never drops below
    pub fn new(starting_temperature: f64, cooling_rate: f64, min_temperature: f64) -> Self {
        Self {
            starting_temperature,
            current_temperature: starting_temperature.max(min_temperature),
            cooling_rate,
            min_temperature,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.current_temperature
    }

    /// Probability of accepting a move from `current_cost` to `new_cost`.
    pub fn acceptance_probability(&self, current_cost: usize, new_cost: usize) -> f64 {
        if new_cost < current_cost {
            return 1.0;
        }
        let delta = current_cost as f64 - new_cost as f64;
        (delta / self.current_temperature).exp()
    }

    /// Decides whether to move from `current_cost` to `new_cost`.
    pub fn is_accepted<R: Rng + ?Sized>(
        &self,
        current_cost: usize,
        new_cost: usize,
        rng: &mut R,
    ) -> bool {
        // Always accept improving moves
        if new_cost < current_cost {
            return true;
        }
        rng.random::<f64>() < self.acceptance_probability(current_cost, new_cost)
    }

    /// Resets the temperature for a new run.
    pub fn phase_started(&mut self) {
        self.current_temperature = self.starting_temperature.max(self.min_temperature);
    }

    /// Decays the temperature after an iteration.
    pub fn cool(&mut self) {
        self.current_temperature =
            (self.current_temperature * self.cooling_rate).max(self.min_temperature);
    }
}

impl Default for MetropolisAcceptor {
    fn default() -> Self {
        Self::new(10_000.0, 0.995, 0.1)
    }
}
