//! Local search driver.
//!
//! # Algorithm
//!
//! Starting from a feasible planning, each round:
//!
//! 1. asks the [`Neighborhood`] for the feasible candidates of one randomly
//!    chosen non-empty schedule,
//! 2. lets the [`Acceptor`] pick the next current planning (or keep it),
//! 3. replaces the best-ever planning if the current one is cheaper.
//!
//! The loop ends when the round limit or the time limit is reached,
//! whichever comes first. The returned planning is the best one seen, so it
//! is never worse than the start.
//!
//! Runs are reproducible: one [`ChaCha8Rng`] seeded from
//! [`SearchConfig::seed`] drives every random choice, and candidates keep
//! move order even when materialised in parallel.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::distance::Topology;
use crate::error::PlanError;
use crate::local_search::Neighborhood;
use crate::models::{Planning, Task, Vehicle};

use super::acceptance::{Acceptor, RoundContext, IMPROVEMENT_EPSILON};
use super::config::SearchConfig;
use super::trace::CostTrace;

/// Where the driver is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No search has run yet.
    Seeding,
    /// Rounds are being executed.
    Iterating,
    /// The last search finished.
    Done,
}

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Cheapest planning seen.
    pub best: Planning,
    /// Rounds executed.
    pub rounds: usize,
    /// Rounds in which the current planning changed.
    pub accepted: usize,
    /// Rounds in which the best planning improved.
    pub improvements: usize,
    /// Wall-clock time spent.
    pub elapsed: Duration,
    /// Per-vehicle cost series, if requested.
    pub trace: Option<CostTrace>,
}

/// Stop condition combining a round limit and a deadline.
#[derive(Debug, Clone, Copy)]
struct Budget {
    max_rounds: Option<usize>,
    deadline: Option<Instant>,
}

impl Budget {
    fn new(config: &SearchConfig, started: Instant) -> Self {
        Self {
            max_rounds: config.max_iterations,
            deadline: config.time_limit.map(|limit| started + limit),
        }
    }

    fn is_unbounded(&self) -> bool {
        self.max_rounds.is_none() && self.deadline.is_none()
    }

    fn exhausted(&self, rounds_done: usize) -> bool {
        if self.is_unbounded() {
            return true;
        }
        if self.max_rounds.is_some_and(|max| rounds_done >= max) {
            return true;
        }
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Runs the local search over plannings.
///
/// # Examples
///
/// ```
/// use pd_planner::distance::DistanceMatrix;
/// use pd_planner::models::{Task, Vehicle};
/// use pd_planner::search::{SearchConfig, SearchDriver};
///
/// let dm = DistanceMatrix::from_data(3, vec![
///     0.0, 4.0, 6.0,
///     4.0, 0.0, 3.0,
///     6.0, 3.0, 0.0,
/// ]).unwrap();
/// let vehicles = vec![
///     Vehicle::new(1, 10, 0).with_cost_per_km(5.0),
///     Vehicle::new(2, 20, 0).with_cost_per_km(3.0),
/// ];
/// let tasks = vec![Task::new(1, 0, 1, 5), Task::new(2, 1, 2, 8)];
///
/// let mut driver = SearchDriver::new(SearchConfig::default().with_max_iterations(200));
/// let start = driver.seed(&vehicles, &tasks, &dm).unwrap();
/// let outcome = driver.run(start.clone(), &dm);
/// assert!(outcome.best.cost() <= start.cost());
/// assert!(outcome.best.is_valid());
/// ```
pub struct SearchDriver {
    config: SearchConfig,
    acceptor: Box<dyn Acceptor>,
    neighborhood: Neighborhood,
    phase: Phase,
}

impl SearchDriver {
    /// Creates a driver using the acceptor named by the configured policy.
    pub fn new(config: SearchConfig) -> Self {
        let acceptor = config.policy.acceptor();
        Self::with_acceptor(config, acceptor)
    }

    /// Creates a driver with a custom acceptance strategy.
    ///
    /// `config.policy` is ignored.
    pub fn with_acceptor(config: SearchConfig, acceptor: Box<dyn Acceptor>) -> Self {
        let neighborhood = Neighborhood::new().with_parallel(config.parallel);
        Self {
            config,
            acceptor,
            neighborhood,
            phase: Phase::Seeding,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Builds the capacity-feasible starting planning.
    ///
    /// # Errors
    ///
    /// See [`Planning::initial`].
    pub fn seed<T: Topology + ?Sized>(
        &mut self,
        vehicles: &[Vehicle],
        tasks: &[Task],
        topology: &T,
    ) -> Result<Planning, PlanError> {
        self.phase = Phase::Seeding;
        Planning::initial(vehicles, tasks, topology)
    }

    /// Runs the search from `start` and returns the best planning seen.
    #[tracing::instrument(
        level = "debug",
        name = "Local Search",
        skip_all,
        fields(acceptor = self.acceptor.name(), seed = self.config.seed)
    )]
    pub fn run<T: Topology + ?Sized>(&mut self, start: Planning, topology: &T) -> SearchOutcome {
        let started = Instant::now();
        let budget = Budget::new(&self.config, started);
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.phase = Phase::Iterating;

        let mut trace = self.config.record_trace.then(CostTrace::new);
        if let Some(trace) = trace.as_mut() {
            trace.record(0, &start);
        }

        if budget.is_unbounded() {
            tracing::warn!("no round or time limit configured, returning the start planning");
        }
        tracing::info!(
            cost = start.cost(),
            tasks = start.num_tasks(),
            vehicles = start.num_vehicles(),
            "search started"
        );

        let mut best = start.clone();
        let mut current = start;
        let mut rounds = 0usize;
        let mut accepted = 0usize;
        let mut improvements = 0usize;

        while !budget.exhausted(rounds) {
            rounds += 1;

            let mut candidates = self.neighborhood.candidates(&current, topology, &mut rng);
            if candidates.is_empty() {
                // With a single busy schedule the move set never changes.
                if busy_schedules(&current) <= 1 {
                    tracing::debug!(round = rounds, "neighborhood exhausted");
                    break;
                }
                tracing::trace!(round = rounds, "no feasible candidate");
                continue;
            }

            let ctx = RoundContext {
                round: rounds,
                temperature: self.config.temperature(rounds),
            };
            if let Some(idx) = self.acceptor.choose(&current, &candidates, &ctx, &mut rng) {
                let chosen = candidates.swap_remove(idx);
                tracing::trace!(round = rounds, mv = ?chosen.mv, cost = chosen.cost(), "accepted");
                current = chosen.planning;
                accepted += 1;
                debug_assert!(current.validate(topology).is_ok());
                if let Some(trace) = trace.as_mut() {
                    trace.record(rounds, &current);
                }
            }

            if current.cost() < best.cost() - IMPROVEMENT_EPSILON {
                tracing::debug!(
                    round = rounds,
                    from = best.cost(),
                    to = current.cost(),
                    "new best planning"
                );
                best = current.clone();
                improvements += 1;
            }
        }

        self.phase = Phase::Done;
        let elapsed = started.elapsed();
        tracing::info!(
            cost = best.cost(),
            rounds,
            accepted,
            improvements,
            elapsed_ms = elapsed.as_millis() as u64,
            "search finished"
        );

        SearchOutcome {
            best,
            rounds,
            accepted,
            improvements,
            elapsed,
            trace,
        }
    }
}

fn busy_schedules(planning: &Planning) -> usize {
    planning.schedules().iter().filter(|s| !s.is_empty()).count()
}
