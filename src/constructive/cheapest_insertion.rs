//! Cheapest single-task insertion.
//!
//! Used to price one extra task against an already committed planning: the
//! cost difference between the extended and the base planning is the
//! marginal cost of the task.

use crate::distance::Topology;
use crate::error::PlanError;
use crate::models::{Planning, Task};

use super::check_cities;

/// Returns a copy of `base` with `task` inserted at the front of whichever
/// schedule yields the smallest cost delta. Ties go to the earlier vehicle.
///
/// # Errors
///
/// - [`PlanError::DuplicateTask`] if `task` is already planned,
/// - [`PlanError::NoVehicles`] if the planning has no vehicles,
/// - [`PlanError::UnknownCity`] if a city of the task or a vehicle home is
///   not part of the topology,
/// - [`PlanError::Infeasible`] if no schedule accepts the task.
///
/// # Examples
///
/// ```
/// use pd_planner::distance::DistanceMatrix;
/// use pd_planner::constructive::cheapest_insertion;
/// use pd_planner::models::{Planning, Task, Vehicle};
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
/// let vehicles = vec![
///     Vehicle::new(0, 10, 0).with_cost_per_km(5.0),
///     Vehicle::new(1, 10, 0).with_cost_per_km(2.0),
/// ];
/// let base = Planning::new(&vehicles);
/// let extended = cheapest_insertion(&base, Task::new(1, 0, 2, 3), &dm).unwrap();
/// assert!(extended.schedule_of(1).unwrap().contains_task(1));
/// assert!((extended.cost() - base.cost() - 4.0).abs() < 1e-9);
/// ```
pub fn cheapest_insertion<T: Topology + ?Sized>(
    base: &Planning,
    task: Task,
    topology: &T,
) -> Result<Planning, PlanError> {
    if base.contains_task(task.id()) {
        return Err(PlanError::DuplicateTask { task: task.id() });
    }
    if base.num_vehicles() == 0 {
        return Err(PlanError::NoVehicles);
    }
    check_cities(
        base.schedules().iter().map(|s| s.vehicle().home_city()),
        [&task],
        topology,
    )?;

    let infeasible = PlanError::Infeasible {
        task: task.id(),
        weight: task.weight(),
        max_capacity: base
            .schedules()
            .iter()
            .map(|s| s.vehicle().capacity())
            .max()
            .unwrap_or(0),
    };

    let (vehicle, delta) = base
        .schedules()
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.insertion_delta(&task, topology).ok().map(|d| (i, d)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or_else(|| infeasible.clone())?;

    let mut extended = base.clone();
    extended
        .insert_task(vehicle, task, topology)
        .map_err(|_| infeasible)?;

    tracing::trace!(
        task = task.id(),
        vehicle = base.schedules()[vehicle].vehicle().id(),
        delta,
        "task inserted"
    );
    Ok(extended)
}
