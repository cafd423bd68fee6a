//! First-fit-decreasing seed construction.
//!
//! # Algorithm
//!
//! Tasks are sorted by descending weight (ties by ID). Each task is placed
//! on the first vehicle, scanning vehicles by descending remaining capacity
//! (capacity minus the weight already assigned, ties in fleet order), whose
//! schedule accepts it at the front. Every placed task is a contiguous
//! pickup/delivery pair, so capacity holds at every step as long as the
//! task alone fits the vehicle.
//!
//! The result is deterministic and always satisfies every planning
//! invariant; it is a starting point for local search, not a good solution.
//!
//! # Complexity
//!
//! O(n log n + n·m log m) where n = tasks, m = vehicles.

use std::collections::HashSet;

use crate::distance::Topology;
use crate::error::PlanError;
use crate::models::{Planning, Task, Vehicle};

use super::check_cities;

/// Builds a feasible seed planning.
///
/// # Errors
///
/// - [`PlanError::DuplicateTask`] if two tasks share an ID,
/// - [`PlanError::NoVehicles`] if there are tasks but no vehicles,
/// - [`PlanError::UnknownCity`] if a home, pickup or delivery city is not
///   part of the topology,
/// - [`PlanError::Infeasible`] if a task outweighs every vehicle or no
///   vehicle can reach it.
///
/// # Examples
///
/// ```
/// use pd_planner::distance::DistanceMatrix;
/// use pd_planner::constructive::first_fit;
/// use pd_planner::models::{Task, Vehicle};
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
/// let vehicles = vec![Vehicle::new(0, 10, 0), Vehicle::new(1, 20, 0)];
/// let tasks = vec![Task::new(1, 0, 1, 5), Task::new(2, 1, 2, 15)];
///
/// let planning = first_fit(&vehicles, &tasks, &dm).unwrap();
/// assert!(planning.schedule_of(1).unwrap().contains_task(2));
/// assert!(planning.is_valid());
///
/// let too_heavy = vec![Task::new(3, 0, 2, 25)];
/// assert!(first_fit(&vehicles, &too_heavy, &dm).is_err());
/// ```
pub fn first_fit<T: Topology + ?Sized>(
    vehicles: &[Vehicle],
    tasks: &[Task],
    topology: &T,
) -> Result<Planning, PlanError> {
    let mut ids = HashSet::new();
    if let Some(dup) = tasks.iter().find(|t| !ids.insert(t.id())) {
        return Err(PlanError::DuplicateTask { task: dup.id() });
    }
    if vehicles.is_empty() && !tasks.is_empty() {
        return Err(PlanError::NoVehicles);
    }
    check_cities(vehicles.iter().map(Vehicle::home_city), tasks, topology)?;

    let max_capacity = vehicles.iter().map(Vehicle::capacity).max().unwrap_or(0);
    let mut order: Vec<&Task> = tasks.iter().collect();
    order.sort_by(|a, b| b.weight().cmp(&a.weight()).then(a.id().cmp(&b.id())));

    let mut planning = Planning::new(vehicles);
    let mut remaining: Vec<i64> = vehicles
        .iter()
        .map(|v| i64::from(v.capacity()))
        .collect();

    for task in order {
        let infeasible = PlanError::Infeasible {
            task: task.id(),
            weight: task.weight(),
            max_capacity,
        };
        if task.weight() > max_capacity {
            return Err(infeasible);
        }

        let mut scan: Vec<usize> = (0..vehicles.len()).collect();
        scan.sort_by(|&a, &b| remaining[b].cmp(&remaining[a]));

        let placed = scan
            .into_iter()
            .find(|&v| planning.insert_task(v, *task, topology).is_ok())
            .ok_or(infeasible)?;
        remaining[placed] -= i64::from(task.weight());
    }

    tracing::debug!(
        tasks = planning.num_tasks(),
        vehicles = planning.num_vehicles(),
        cost = planning.cost(),
        "seed planning built"
    );
    Ok(planning)
}
