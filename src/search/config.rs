//! Search configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::acceptance::{Acceptor, Greedy, SimulatedAnnealing, StochasticHillClimbing};

/// Rule used to pick the next current planning among the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptancePolicy {
    /// Move to the cheapest candidate if it strictly improves.
    #[default]
    Greedy,
    /// Move to a uniformly random strictly improving candidate.
    Stochastic,
    /// Move to the cheapest candidate, accepting a worsening with
    /// probability `exp(-Δ / T)`.
    Annealing,
}

impl AcceptancePolicy {
    /// Builds the strategy implementing this policy.
    pub fn acceptor(&self) -> Box<dyn Acceptor> {
        match self {
            AcceptancePolicy::Greedy => Box::new(Greedy),
            AcceptancePolicy::Stochastic => Box::new(StochasticHillClimbing),
            AcceptancePolicy::Annealing => Box::new(SimulatedAnnealing),
        }
    }
}

impl fmt::Display for AcceptancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AcceptancePolicy::Greedy => "greedy",
            AcceptancePolicy::Stochastic => "stochastic",
            AcceptancePolicy::Annealing => "annealing",
        };
        f.write_str(name)
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePolicyError(String);

impl fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown acceptance policy '{}' (expected greedy, stochastic or annealing)",
            self.0
        )
    }
}

impl std::error::Error for ParsePolicyError {}

impl FromStr for AcceptancePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(AcceptancePolicy::Greedy),
            "stochastic" => Ok(AcceptancePolicy::Stochastic),
            "annealing" | "sa" => Ok(AcceptancePolicy::Annealing),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Configuration parameters for the local search driver.
///
/// The search stops when either limit is reached; with no limit at all it
/// performs no round and returns its starting planning.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use pd_planner::search::{AcceptancePolicy, SearchConfig};
///
/// let config = SearchConfig::default()
///     .with_policy(AcceptancePolicy::Annealing)
///     .with_max_iterations(500)
///     .with_time_limit(Duration::from_millis(200))
///     .with_seed(7);
/// assert_eq!(config.max_iterations, Some(500));
/// assert_eq!(config.temperature(5), 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Acceptance policy.
    pub policy: AcceptancePolicy,
    /// Maximum number of rounds (None for no round limit).
    pub max_iterations: Option<usize>,
    /// Wall-clock limit (None for no time limit).
    pub time_limit: Option<Duration>,
    /// Random seed.
    pub seed: u64,
    /// Annealing start temperature `T0`; `T(round) = T0 / round`.
    /// None uses the round limit, or 1000 without one.
    pub initial_temperature: Option<f64>,
    /// Materialise candidates on the rayon pool.
    pub parallel: bool,
    /// Record the per-vehicle cost time series.
    pub record_trace: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            policy: AcceptancePolicy::Greedy,
            max_iterations: Some(10_000),
            time_limit: None,
            seed: 42,
            initial_temperature: None,
            parallel: true,
            record_trace: false,
        }
    }
}

impl SearchConfig {
    /// Sets the acceptance policy.
    pub fn with_policy(mut self, policy: AcceptancePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the maximum number of rounds.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Removes the round limit.
    pub fn without_max_iterations(mut self) -> Self {
        self.max_iterations = None;
        self
    }

    /// Sets the wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the annealing start temperature.
    pub fn with_initial_temperature(mut self, t0: f64) -> Self {
        self.initial_temperature = Some(t0);
        self
    }

    /// Enables or disables parallel candidate materialisation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enables or disables the cost time series.
    pub fn with_trace(mut self, record: bool) -> Self {
        self.record_trace = record;
        self
    }

    /// Annealing temperature at a 1-based round.
    pub fn temperature(&self, round: usize) -> f64 {
        let t0 = self
            .initial_temperature
            .unwrap_or_else(|| self.max_iterations.map_or(1000.0, |n| n as f64));
        t0 / round.max(1) as f64
    }
}
