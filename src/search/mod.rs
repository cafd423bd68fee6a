//! Search over plannings.
//!
//! - [`SearchDriver`]: the iteration loop with round and time budgets.
//! - [`Acceptor`]: pluggable acceptance rule ([`Greedy`],
//!   [`StochasticHillClimbing`], [`SimulatedAnnealing`], [`StepProbability`]).
//! - [`SearchConfig`]: policy, budgets, seed and tracing switches.
//! - [`CostTrace`]: optional per-vehicle cost time series.

mod acceptance;
mod config;
mod driver;
mod trace;

pub use acceptance::{
    cheapest, Acceptor, Greedy, RoundContext, SimulatedAnnealing, StepProbability,
    StochasticHillClimbing, IMPROVEMENT_EPSILON,
};
pub use config::{AcceptancePolicy, ParsePolicyError, SearchConfig};
pub use driver::{Phase, SearchDriver, SearchOutcome};
pub use trace::{CostTrace, TraceRow};
