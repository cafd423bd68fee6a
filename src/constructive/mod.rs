//! Constructive heuristics for building and growing plannings.
//!
//! - [`first_fit`]: Capacity-aware seed, heaviest task first on the first vehicle
//!   that can take it, O(n log n + n·m)
//! - [`cheapest_insertion`]: Adds one task to an existing planning on the
//!   vehicle with the lowest marginal cost, O(m)

mod cheapest_insertion;
mod first_fit;

pub use cheapest_insertion::cheapest_insertion;
pub use first_fit::first_fit;

use crate::distance::Topology;
use crate::error::PlanError;
use crate::models::{CityId, Task};

/// Fails with [`PlanError::UnknownCity`] on the first home, pickup or
/// delivery city the topology does not contain.
pub(crate) fn check_cities<'a, T: Topology + ?Sized>(
    homes: impl IntoIterator<Item = CityId>,
    tasks: impl IntoIterator<Item = &'a Task>,
    topology: &T,
) -> Result<(), PlanError> {
    let num_cities = topology.num_cities();
    let task_cities = tasks
        .into_iter()
        .flat_map(|t| [t.pickup_city(), t.delivery_city()]);
    match homes
        .into_iter()
        .chain(task_cities)
        .find(|&c| c >= num_cities)
    {
        Some(city) => Err(PlanError::UnknownCity { city, num_cities }),
        None => Ok(()),
    }
}
