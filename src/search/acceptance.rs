//! Acceptance strategies.
//!
//! Each round the driver hands the feasible candidates to an [`Acceptor`],
//! which names the one to become the new current planning, or none to stay
//! put. The three policies selectable from [`SearchConfig`](crate::search::SearchConfig):
//!
//! | Strategy | Picks | Worsening moves |
//! |---|---|---|
//! | [`Greedy`] | cheapest candidate | never |
//! | [`StochasticHillClimbing`] | random improving candidate | never |
//! | [`SimulatedAnnealing`] | cheapest candidate | with probability `exp(-Δ / T)` |
//!
//! [`StepProbability`] can be plugged in through
//! [`SearchDriver::with_acceptor`](crate::search::SearchDriver::with_acceptor):
//! it moves to a random cheapest candidate, better or not, with a fixed
//! probability.
//!
//! "Improving" means strictly cheaper than the current planning by more than
//! [`IMPROVEMENT_EPSILON`].

use rand::{Rng, RngCore};

use crate::local_search::Candidate;
use crate::models::Planning;

/// Minimum cost decrease counted as an improvement.
pub const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// Per-round information passed to an [`Acceptor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundContext {
    /// 1-based round number.
    pub round: usize,
    /// Annealing temperature for this round.
    pub temperature: f64,
}

/// Decides which candidate, if any, replaces the current planning.
pub trait Acceptor: Send + Sync {
    /// Short strategy name, used in logs.
    fn name(&self) -> &str;

    /// Returns the index of the chosen candidate, or `None` to keep the
    /// current planning.
    fn choose(
        &self,
        current: &Planning,
        candidates: &[Candidate],
        ctx: &RoundContext,
        rng: &mut dyn RngCore,
    ) -> Option<usize>;
}

/// Index of the cheapest candidate; ties go to the earliest.
pub fn cheapest(candidates: &[Candidate]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, c) in candidates.iter().enumerate() {
        match best {
            Some((_, cost)) if c.cost() >= cost => {}
            _ => best = Some((idx, c.cost())),
        }
    }
    best.map(|(idx, _)| idx)
}

fn improves(candidate: &Candidate, current: &Planning) -> bool {
    candidate.cost() < current.cost() - IMPROVEMENT_EPSILON
}

/// Steepest descent: move to the cheapest candidate only if it improves.
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl Acceptor for Greedy {
    fn name(&self) -> &str {
        "greedy"
    }

    fn choose(
        &self,
        current: &Planning,
        candidates: &[Candidate],
        _ctx: &RoundContext,
        _rng: &mut dyn RngCore,
    ) -> Option<usize> {
        cheapest(candidates).filter(|&idx| improves(&candidates[idx], current))
    }
}

/// Moves to an improving candidate drawn uniformly at random.
#[derive(Debug, Clone, Copy, Default)]
pub struct StochasticHillClimbing;

impl Acceptor for StochasticHillClimbing {
    fn name(&self) -> &str {
        "stochastic"
    }

    fn choose(
        &self,
        current: &Planning,
        candidates: &[Candidate],
        _ctx: &RoundContext,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        let improving: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| improves(c, current))
            .map(|(idx, _)| idx)
            .collect();
        if improving.is_empty() {
            return None;
        }
        Some(improving[rng.random_range(0..improving.len())])
    }
}

/// Metropolis acceptance of the cheapest candidate.
///
/// A candidate no worse than the current planning is always taken. A worse
/// one with cost increase `Δ` is taken with probability `exp(-Δ / T)`.
/// At `T <= 0` it behaves like a greedy step that also allows sideways
/// moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedAnnealing;

impl SimulatedAnnealing {
    /// Probability of accepting a cost increase `delta` at `temperature`.
    pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
        if delta <= 0.0 {
            1.0
        } else if temperature <= 0.0 || !temperature.is_finite() {
            0.0
        } else {
            (-delta / temperature).exp()
        }
    }
}

impl Acceptor for SimulatedAnnealing {
    fn name(&self) -> &str {
        "annealing"
    }

    fn choose(
        &self,
        current: &Planning,
        candidates: &[Candidate],
        ctx: &RoundContext,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        let idx = cheapest(candidates)?;
        let delta = candidates[idx].cost() - current.cost();
        if delta <= 0.0 {
            return Some(idx);
        }
        let p = Self::acceptance_probability(delta, ctx.temperature);
        if rng.random::<f64>() < p {
            tracing::trace!(
                round = ctx.round,
                delta,
                temperature = ctx.temperature,
                "accepting worse candidate"
            );
            Some(idx)
        } else {
            None
        }
    }
}

/// Stochastic local search step: with probability `p`, move to one of the
/// cheapest candidates drawn uniformly at random, whether or not it
/// improves; otherwise stay.
///
/// Candidates whose cost is within [`IMPROVEMENT_EPSILON`] of the cheapest
/// count as tied.
///
/// # Examples
///
/// ```
/// use pd_planner::search::{SearchConfig, SearchDriver, StepProbability};
///
/// let driver = SearchDriver::with_acceptor(
///     SearchConfig::default(),
///     Box::new(StepProbability::new(0.3)),
/// );
/// assert_eq!(driver.config().seed, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepProbability {
    probability: f64,
}

impl Default for StepProbability {
    fn default() -> Self {
        Self { probability: 0.5 }
    }
}

impl StepProbability {
    /// Creates the strategy; `probability` is clamped into `[0, 1]`.
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }

    /// Probability of taking a step in a round.
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Acceptor for StepProbability {
    fn name(&self) -> &str {
        "step_probability"
    }

    fn choose(
        &self,
        _current: &Planning,
        candidates: &[Candidate],
        _ctx: &RoundContext,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        let best = candidates[cheapest(candidates)?].cost();
        let tied: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.cost() <= best + IMPROVEMENT_EPSILON)
            .map(|(idx, _)| idx)
            .collect();
        let pick = tied[rng.random_range(0..tied.len())];
        (rng.random::<f64>() < self.probability).then_some(pick)
    }
}
