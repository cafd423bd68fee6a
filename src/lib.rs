//! # pd-planner
//!
//! Multi-vehicle pickup-and-delivery planning: assign transport tasks to a
//! capacitated fleet and order each vehicle's pickups and deliveries so the
//! total travel cost is low.
//!
//! ## Modules
//!
//! - [`models`]: Domain types (Task, Vehicle, Step, Schedule, Planning)
//! - [`distance`]: City topology (Topology trait, DistanceMatrix, RoadNetwork)
//! - [`constructive`]: Capacity-aware seeding and cheapest insertion
//! - [`local_search`]: One-edit neighborhood (reassignment, reordering)
//! - [`search`]: Search driver with greedy, stochastic and annealing acceptance
//! - [`export`]: Per-vehicle action lists
//! - [`error`]: External error type ([`PlanError`])
//!
//! ## Quick start
//!
//! ```
//! use pd_planner::distance::DistanceMatrix;
//! use pd_planner::models::{Task, Vehicle};
//! use pd_planner::search::SearchConfig;
//!
//! let dm = DistanceMatrix::from_data(3, vec![
//!     0.0, 4.0, 6.0,
//!     4.0, 0.0, 3.0,
//!     6.0, 3.0, 0.0,
//! ]).unwrap();
//! let vehicles = vec![
//!     Vehicle::new(1, 10, 0).with_cost_per_km(5.0),
//!     Vehicle::new(2, 20, 0).with_cost_per_km(3.0),
//! ];
//! let tasks = vec![
//!     Task::new(1, 0, 1, 5).with_reward(100.0),
//!     Task::new(2, 1, 2, 8).with_reward(50.0),
//! ];
//!
//! let config = SearchConfig::default().with_max_iterations(200);
//! let plan = pd_planner::build_plan(&vehicles, &tasks, &dm, &config).unwrap();
//! assert!(plan.cost() <= 21.0);
//!
//! // Price a new task before bidding on it.
//! let extra = Task::new(3, 2, 0, 4);
//! let marginal = pd_planner::marginal_cost(&plan, extra, &dm).unwrap();
//! assert!(marginal >= 0.0);
//!
//! let actions = pd_planner::export(&plan, &dm);
//! assert_eq!(actions.len(), 2);
//! ```

pub mod constructive;
pub mod distance;
pub mod error;
pub mod export;
pub mod local_search;
pub mod models;
pub mod search;

pub use error::PlanError;

use distance::Topology;
use export::VehiclePlan;
use models::{Planning, Task, Vehicle};
use search::{SearchConfig, SearchDriver};

/// Seeds a feasible planning for `tasks` and improves it by local search.
///
/// # Errors
///
/// [`PlanError::Infeasible`] or [`PlanError::NoVehicles`] if some task fits
/// no vehicle, [`PlanError::DuplicateTask`] on repeated task IDs.
pub fn build_plan<T: Topology + ?Sized>(
    vehicles: &[Vehicle],
    tasks: &[Task],
    topology: &T,
    config: &SearchConfig,
) -> Result<Planning, PlanError> {
    let mut driver = SearchDriver::new(config.clone());
    let start = driver.seed(vehicles, tasks, topology)?;
    Ok(driver.run(start, topology).best)
}

/// Returns a copy of `base` with `task` inserted at its cheapest position.
///
/// # Errors
///
/// See [`Planning::extend`].
pub fn extend_plan<T: Topology + ?Sized>(
    base: &Planning,
    task: Task,
    topology: &T,
) -> Result<Planning, PlanError> {
    base.extend(task, topology)
}

/// Cost increase of adding `task` to `base` by cheapest insertion.
///
/// # Errors
///
/// See [`Planning::extend`].
pub fn marginal_cost<T: Topology + ?Sized>(
    base: &Planning,
    task: Task,
    topology: &T,
) -> Result<f64, PlanError> {
    let extended = base.extend(task, topology)?;
    Ok(extended.cost() - base.cost())
}

/// Runs the search from `planning` and returns the best planning found.
///
/// The result is never more expensive than `planning` and covers the same
/// tasks.
pub fn optimize<T: Topology + ?Sized>(
    planning: &Planning,
    topology: &T,
    config: &SearchConfig,
) -> Planning {
    SearchDriver::new(config.clone())
        .run(planning.clone(), topology)
        .best
}

/// Per-vehicle action lists of `planning`, in fleet order.
pub fn export<T: Topology + ?Sized>(planning: &Planning, topology: &T) -> Vec<VehiclePlan> {
    export::to_actions(planning, topology)
}
