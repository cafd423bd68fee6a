//! Multi-vehicle planning: the unit optimized by search.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::constructive::{cheapest_insertion, first_fit};
use crate::distance::Topology;
use crate::error::PlanError;
use crate::export::{to_actions, VehiclePlan};

use super::{costs_match, Rejection, Schedule, Task, TaskId, Vehicle, VehicleId, Violation};

/// A complete assignment of tasks to vehicle schedules.
///
/// Holds one [`Schedule`] per vehicle, in fleet order, plus the set of
/// tasks being planned. Invariants:
///
/// 1. every task appears in exactly one schedule, once as pickup and once
///    as delivery,
/// 2. every schedule respects its capacity at every step,
/// 3. [`cost`](Self::cost) equals the sum of the schedule costs.
///
/// A planning is a plain value: cloning it yields a fully independent copy,
/// which is how the search derives candidates without touching the parent.
///
/// # Examples
///
/// ```
/// use pd_planner::distance::DistanceMatrix;
/// use pd_planner::models::{Planning, Task, Vehicle};
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
/// let planning = Planning::initial(&vehicles, &tasks, &dm).unwrap();
/// assert!(planning.validate(&dm).is_ok());
/// assert_eq!(planning.num_tasks(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Planning {
    schedules: Vec<Schedule>,
    tasks: Vec<Task>,
    cost: f64,
}

impl Planning {
    /// Creates a planning with an empty schedule for every vehicle.
    pub fn new(vehicles: &[Vehicle]) -> Self {
        Self {
            schedules: vehicles.iter().cloned().map(Schedule::new).collect(),
            tasks: Vec::new(),
            cost: 0.0,
        }
    }

    /// Builds a feasible seed planning for the given fleet and tasks.
    ///
    /// See [`first_fit`](crate::constructive::first_fit).
    ///
    /// # Errors
    ///
    /// [`PlanError::Infeasible`] if some task outweighs every vehicle.
    pub fn initial<T: Topology + ?Sized>(
        vehicles: &[Vehicle],
        tasks: &[Task],
        topology: &T,
    ) -> Result<Self, PlanError> {
        first_fit(vehicles, tasks, topology)
    }

    /// Returns a copy of this planning with `task` inserted where it is
    /// cheapest. `self` is left untouched.
    ///
    /// See [`cheapest_insertion`](crate::constructive::cheapest_insertion).
    pub fn extend<T: Topology + ?Sized>(
        &self,
        task: Task,
        topology: &T,
    ) -> Result<Self, PlanError> {
        cheapest_insertion(self, task, topology)
    }

    /// Total travel cost across all vehicles.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Per-vehicle schedules, in fleet order.
    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Schedule at fleet position `index`.
    pub fn schedule(&self, index: usize) -> Option<&Schedule> {
        self.schedules.get(index)
    }

    /// Schedule of the vehicle with the given ID.
    pub fn schedule_of(&self, vehicle: VehicleId) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.vehicle().id() == vehicle)
    }

    /// Number of vehicles (schedules).
    pub fn num_vehicles(&self) -> usize {
        self.schedules.len()
    }

    /// Tasks covered by this planning.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks covered by this planning.
    pub fn num_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if the task is part of this planning.
    pub fn contains_task(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id() == id)
    }

    /// Sum of the rewards of all planned tasks.
    pub fn total_reward(&self) -> f64 {
        self.tasks.iter().map(Task::reward).sum()
    }

    /// Adds a new task at the front of the schedule at fleet position
    /// `vehicle`. Returns the cost delta.
    ///
    /// # Errors
    ///
    /// [`Rejection::Duplicate`] if the task is already planned, otherwise
    /// whatever [`Schedule::insert_task_at_front`] rejects.
    pub fn insert_task<T: Topology + ?Sized>(
        &mut self,
        vehicle: usize,
        task: Task,
        topology: &T,
    ) -> Result<f64, Rejection> {
        if self.contains_task(task.id()) {
            return Err(Rejection::Duplicate);
        }
        let schedule = self
            .schedules
            .get_mut(vehicle)
            .ok_or(Rejection::OutOfBounds)?;
        let delta = schedule.insert_task_at_front(task, topology)?;
        self.tasks.push(task);
        self.cost += delta;
        Ok(delta)
    }

    /// Moves the first task of schedule `from` to the front of schedule
    /// `to`. Returns the cost delta; on rejection nothing changes.
    pub fn reassign_first_task<T: Topology + ?Sized>(
        &mut self,
        from: usize,
        to: usize,
        topology: &T,
    ) -> Result<f64, Rejection> {
        if from == to {
            return Err(Rejection::SameVehicle);
        }
        if from >= self.schedules.len() || to >= self.schedules.len() {
            return Err(Rejection::OutOfBounds);
        }
        let task = *self.schedules[from].first_task().ok_or(Rejection::Empty)?;
        self.schedules[to].insertion_delta(&task, topology)?;

        let (task, removed) = self.schedules[from].remove_first_task(topology)?;
        let inserted = self.schedules[to].insert_task_at_front(task, topology)?;
        let delta = removed + inserted;
        self.cost += delta;
        Ok(delta)
    }

    /// Swaps steps `i` and `j` of schedule `vehicle`. Returns the cost
    /// delta; on rejection nothing changes.
    pub fn swap_steps<T: Topology + ?Sized>(
        &mut self,
        vehicle: usize,
        i: usize,
        j: usize,
        topology: &T,
    ) -> Result<f64, Rejection> {
        let schedule = self
            .schedules
            .get_mut(vehicle)
            .ok_or(Rejection::OutOfBounds)?;
        let delta = schedule.swap_step_positions(i, j, topology)?;
        self.cost += delta;
        Ok(delta)
    }

    /// Total cost walked from scratch over every schedule.
    pub fn recompute_cost<T: Topology + ?Sized>(&self, topology: &T) -> f64 {
        self.schedules
            .iter()
            .map(|s| s.recompute_cost(topology))
            .sum()
    }

    /// Checks coverage, pairing, ordering and capacity.
    ///
    /// Does not need the topology; see [`validate`](Self::validate) for the
    /// full check including cost consistency.
    pub fn validate_structure(&self) -> Result<(), Violation> {
        let known: HashSet<TaskId> = self.tasks.iter().map(Task::id).collect();
        let mut seen: HashMap<TaskId, VehicleId> = HashMap::new();

        for schedule in &self.schedules {
            schedule.validate()?;
            let vehicle = schedule.vehicle().id();
            for task in schedule.tasks() {
                if !known.contains(&task.id()) {
                    return Err(Violation::UnknownTask {
                        task: task.id(),
                        vehicle,
                    });
                }
                if seen.insert(task.id(), vehicle).is_some() {
                    return Err(Violation::DuplicateStep {
                        task: task.id(),
                        vehicle,
                    });
                }
            }
        }

        if let Some(missing) = self.tasks.iter().find(|t| !seen.contains_key(&t.id())) {
            return Err(Violation::MissingTask { task: missing.id() });
        }
        Ok(())
    }

    /// Full invariant check, including cost consistency against a
    /// from-scratch recomputation.
    pub fn validate<T: Topology + ?Sized>(&self, topology: &T) -> Result<(), Violation> {
        self.validate_structure()?;
        for schedule in &self.schedules {
            let recomputed = schedule.recompute_cost(topology);
            if !costs_match(schedule.cost(), recomputed) {
                return Err(Violation::CostMismatch {
                    cached: schedule.cost(),
                    recomputed,
                });
            }
        }
        let recomputed = self.recompute_cost(topology);
        if !costs_match(self.cost, recomputed) {
            return Err(Violation::CostMismatch {
                cached: self.cost,
                recomputed,
            });
        }
        Ok(())
    }

    /// Returns `true` if [`validate_structure`](Self::validate_structure)
    /// passes.
    pub fn is_valid(&self) -> bool {
        self.validate_structure().is_ok()
    }

    /// Expands every schedule into an executable action list.
    ///
    /// See [`to_actions`](crate::export::to_actions).
    pub fn to_actions<T: Topology + ?Sized>(&self, topology: &T) -> Vec<VehiclePlan> {
        to_actions(self, topology)
    }
}

impl fmt::Display for Planning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for schedule in &self.schedules {
            writeln!(f, "{}", schedule)?;
        }
        write!(f, "cost: {:.2}", self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    fn abc() -> DistanceMatrix {
        DistanceMatrix::from_data(3, vec![0.0, 4.0, 6.0, 4.0, 0.0, 3.0, 6.0, 3.0, 0.0])
            .expect("valid")
    }

    fn fleet() -> Vec<Vehicle> {
        vec![
            Vehicle::new(1, 10, 0).with_cost_per_km(5.0),
            Vehicle::new(2, 20, 0).with_cost_per_km(3.0),
        ]
    }

    fn t1() -> Task {
        Task::new(1, 0, 1, 5).with_reward(100.0)
    }

    fn t2() -> Task {
        Task::new(2, 1, 2, 8).with_reward(50.0)
    }

    #[test]
    fn test_empty_planning() {
        let p = Planning::new(&fleet());
        assert_eq!(p.num_vehicles(), 2);
        assert_eq!(p.num_tasks(), 0);
        assert_eq!(p.cost(), 0.0);
        assert!(p.validate(&abc()).is_ok());
    }

    #[test]
    fn test_insert_task_tracks_cost() {
        let dm = abc();
        let mut p = Planning::new(&fleet());
        let d1 = p.insert_task(0, t1(), &dm).expect("fits");
        let d2 = p.insert_task(1, t2(), &dm).expect("fits");
        assert!((p.cost() - (d1 + d2)).abs() < 1e-9);
        assert!((p.cost() - p.recompute_cost(&dm)).abs() < 1e-9);
        assert!(p.validate(&dm).is_ok());
        assert_eq!(p.total_reward(), 150.0);
    }

    #[test]
    fn test_insert_duplicate_rejected() {
        let dm = abc();
        let mut p = Planning::new(&fleet());
        p.insert_task(0, t1(), &dm).expect("fits");
        assert_eq!(p.insert_task(1, t1(), &dm), Err(Rejection::Duplicate));
        assert_eq!(p.insert_task(5, t2(), &dm), Err(Rejection::OutOfBounds));
    }

    #[test]
    fn test_reassign_first_task() {
        let dm = abc();
        let mut p = Planning::new(&fleet());
        p.insert_task(1, t1(), &dm).expect("fits");
        let delta = p.reassign_first_task(1, 0, &dm).expect("fits");
        // V2: 4 km at 3/km -> V1: 4 km at 5/km
        assert!((delta - 8.0).abs() < 1e-9);
        assert!(p.schedule(1).expect("exists").is_empty());
        assert!(p.schedule_of(1).expect("exists").contains_task(1));
        assert!(p.validate(&dm).is_ok());
    }

    #[test]
    fn test_reassign_rejected_keeps_planning() {
        let dm = abc();
        let mut p = Planning::new(&fleet());
        let heavy = Task::new(3, 0, 2, 15);
        p.insert_task(1, heavy, &dm).expect("fits");
        let before = p.cost();
        assert_eq!(p.reassign_first_task(1, 0, &dm), Err(Rejection::Capacity));
        assert_eq!(p.reassign_first_task(0, 1, &dm), Err(Rejection::Empty));
        assert_eq!(p.reassign_first_task(1, 1, &dm), Err(Rejection::SameVehicle));
        assert_eq!(p.cost(), before);
        assert!(p.schedule(1).expect("exists").contains_task(3));
        assert!(p.validate(&dm).is_ok());
    }

    #[test]
    fn test_swap_steps() {
        let dm = abc();
        let mut p = Planning::new(&fleet());
        p.insert_task(1, t1(), &dm).expect("fits");
        p.insert_task(1, t2(), &dm).expect("fits");
        p.swap_steps(1, 1, 2, &dm).expect("valid swap");
        assert!(p.validate(&dm).is_ok());
        assert_eq!(p.swap_steps(1, 0, 2, &dm), Err(Rejection::Ordering));
        assert_eq!(p.swap_steps(9, 0, 1, &dm), Err(Rejection::OutOfBounds));
    }

    #[test]
    fn test_clone_is_independent() {
        let dm = abc();
        let mut parent = Planning::new(&fleet());
        parent.insert_task(1, t1(), &dm).expect("fits");
        let mut child = parent.clone();
        child.reassign_first_task(1, 0, &dm).expect("fits");
        assert!(parent.schedule(1).expect("exists").contains_task(1));
        assert!(child.schedule(0).expect("exists").contains_task(1));
        assert!(parent.validate(&dm).is_ok());
        assert!(child.validate(&dm).is_ok());
    }

    #[test]
    fn test_validate_detects_missing_task() {
        let dm = abc();
        let mut p = Planning::new(&fleet());
        p.tasks.push(t1());
        assert_eq!(p.validate(&dm), Err(Violation::MissingTask { task: 1 }));
    }

    #[test]
    fn test_validate_detects_cost_drift() {
        let dm = abc();
        let mut p = Planning::new(&fleet());
        p.insert_task(0, t1(), &dm).expect("fits");
        p.cost += 1.0;
        assert!(matches!(p.validate(&dm), Err(Violation::CostMismatch { .. })));
        assert!(p.is_valid());
    }

    #[test]
    fn test_display() {
        let dm = abc();
        let mut p = Planning::new(&fleet());
        p.insert_task(1, t2(), &dm).expect("fits");
        assert_eq!(p.to_string(), "V1.\nV2 -> p2 -> d2.\ncost: 21.00");
    }
}
