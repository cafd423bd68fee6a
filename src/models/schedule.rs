//! Per-vehicle schedule of pickup and delivery steps.
//!
//! # Cost accounting
//!
//! A schedule's route starts at the vehicle's home city and visits the city
//! of every step in order; there is no return leg. The route length is
//! cached and every edit adjusts it by the length of the edges it touches:
//!
//! ```text
//! insert pair (p, d) at front:  d(home, p) + d(p, d) + d(d, first) - d(home, first)
//! remove first pair:            edges around both excised steps, reconnected
//! swap positions i < j:         edges entering i, i+1, j, j+1
//! ```
//!
//! Cost is `length × cost_per_km`.

use std::collections::HashSet;
use std::fmt;

use crate::distance::Topology;

use super::{CityId, Rejection, Step, StepKind, Task, TaskId, Vehicle, Violation};

/// Relative tolerance when comparing cached and recomputed costs.
pub(crate) const COST_TOLERANCE: f64 = 1e-6;

/// Returns `true` if two costs agree within [`COST_TOLERANCE`].
pub(crate) fn costs_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= COST_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// An ordered sequence of steps assigned to a single vehicle.
///
/// Invariants (checked by [`Schedule::validate`]):
/// - every task has exactly one pickup and one later delivery,
/// - the on-board weight never exceeds the vehicle capacity.
///
/// Edits that would break an invariant are rejected and leave the schedule
/// untouched.
///
/// # Examples
///
/// ```
/// use pd_planner::distance::DistanceMatrix;
/// use pd_planner::models::{Schedule, Task, Vehicle};
///
/// // A=0, B=1, C=2
/// let dm = DistanceMatrix::from_data(3, vec![
///     0.0, 4.0, 6.0,
///     4.0, 0.0, 3.0,
///     6.0, 3.0, 0.0,
/// ]).unwrap();
///
/// let mut s = Schedule::new(Vehicle::new(0, 10, 0).with_cost_per_km(5.0));
/// let delta = s.insert_task_at_front(Task::new(1, 0, 1, 5), &dm).unwrap();
/// assert_eq!(delta, 20.0);
/// assert_eq!(s.cost(), 20.0);
/// assert_eq!(s.to_string(), "V0 -> p1 -> d1.");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    vehicle: Vehicle,
    steps: Vec<Step>,
    length: f64,
}

impl Schedule {
    /// Creates an empty schedule for the given vehicle.
    pub fn new(vehicle: Vehicle) -> Self {
        Self {
            vehicle,
            steps: Vec::new(),
            length: 0.0,
        }
    }

    /// The vehicle driving this schedule.
    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    /// The ordered steps.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps (twice the number of tasks).
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if no task is assigned.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of tasks carried.
    pub fn num_tasks(&self) -> usize {
        self.steps.len() / 2
    }

    /// Carried tasks, in pickup order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.steps.iter().filter(|s| s.is_pickup()).map(|s| s.task())
    }

    /// Returns `true` if the task has a step in this schedule.
    pub fn contains_task(&self, id: TaskId) -> bool {
        self.steps.iter().any(|s| s.task_id() == id)
    }

    /// The task picked up first, if any.
    pub fn first_task(&self) -> Option<&Task> {
        self.steps.first().map(|s| s.task())
    }

    /// Cached route length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Cached travel cost (`length × cost_per_km`).
    pub fn cost(&self) -> f64 {
        self.length * self.vehicle.cost_per_km()
    }

    /// On-board weight after each step.
    pub fn loads(&self) -> Vec<i64> {
        self.steps
            .iter()
            .scan(0i64, |load, s| {
                *load += s.load_change();
                Some(*load)
            })
            .collect()
    }

    /// Cost change of [`insert_task_at_front`](Self::insert_task_at_front),
    /// without modifying the schedule.
    pub fn insertion_delta<T: Topology + ?Sized>(
        &self,
        task: &Task,
        topology: &T,
    ) -> Result<f64, Rejection> {
        self.front_insertion_length(task, topology)
            .map(|d| d * self.vehicle.cost_per_km())
    }

    /// Inserts the task's pickup and delivery as a contiguous pair before the
    /// current first step. Returns the cost delta.
    ///
    /// # Errors
    ///
    /// [`Rejection::Capacity`] if the task alone exceeds the capacity,
    /// [`Rejection::OutOfBounds`] if a city is not part of the topology,
    /// [`Rejection::Unreachable`] if the new edges cannot be driven.
    pub fn insert_task_at_front<T: Topology + ?Sized>(
        &mut self,
        task: Task,
        topology: &T,
    ) -> Result<f64, Rejection> {
        let delta = self.front_insertion_length(&task, topology)?;
        self.steps.insert(0, Step::delivery(task));
        self.steps.insert(0, Step::pickup(task));
        self.length += delta;
        Ok(delta * self.vehicle.cost_per_km())
    }

    /// Removes the first task (its pickup and its delivery, wherever that is)
    /// and reconnects the route around both gaps. Returns the task and the
    /// cost delta.
    ///
    /// # Errors
    ///
    /// [`Rejection::Empty`] if there is nothing to remove.
    pub fn remove_first_task<T: Topology + ?Sized>(
        &mut self,
        topology: &T,
    ) -> Result<(Task, f64), Rejection> {
        let first = *self.steps.first().ok_or(Rejection::Empty)?;
        if !first.is_pickup() {
            return Err(Rejection::Ordering);
        }
        let task = *first.task();
        let k = self
            .position_of(task.id(), StepKind::Delivery)
            .ok_or(Rejection::Ordering)?;

        let before = self.edges_length(&[0, 1, k, k + 1], topology);
        self.steps.remove(k);
        self.steps.remove(0);
        let after = self.edges_length(&[0, k - 1], topology);

        let delta = after - before;
        self.length += delta;
        Ok((task, delta * self.vehicle.cost_per_km()))
    }

    /// Exchanges the steps at positions `i` and `j`. Returns the cost delta.
    ///
    /// # Errors
    ///
    /// [`Rejection::OutOfBounds`] for a bad index, [`Rejection::Ordering`]
    /// if a delivery would precede its pickup, [`Rejection::Capacity`] if
    /// the load would exceed capacity, [`Rejection::Unreachable`] if a new
    /// edge cannot be driven.
    pub fn swap_step_positions<T: Topology + ?Sized>(
        &mut self,
        i: usize,
        j: usize,
        topology: &T,
    ) -> Result<f64, Rejection> {
        let (i, j) = if i <= j { (i, j) } else { (j, i) };
        if j >= self.steps.len() {
            return Err(Rejection::OutOfBounds);
        }
        if i == j {
            return Ok(0.0);
        }

        let early = self.steps[i];
        let late = self.steps[j];
        if early.is_pickup() {
            match self.position_of(early.task_id(), StepKind::Delivery) {
                Some(d) if d > j => {}
                _ => return Err(Rejection::Ordering),
            }
        }
        if !late.is_pickup() {
            match self.position_of(late.task_id(), StepKind::Pickup) {
                Some(p) if p < i => {}
                _ => return Err(Rejection::Ordering),
            }
        }

        // Loads before i and after j are unchanged by the swap.
        let capacity = i64::from(self.vehicle.capacity());
        let mut load: i64 = self.steps[..i].iter().map(Step::load_change).sum();
        for pos in i..=j {
            let step = match pos {
                p if p == i => &late,
                p if p == j => &early,
                p => &self.steps[p],
            };
            load += step.load_change();
            if load > capacity {
                return Err(Rejection::Capacity);
            }
        }

        let touched = [i, i + 1, j, j + 1];
        let before = self.edges_length(&touched, topology);
        self.steps.swap(i, j);
        let after = self.edges_length(&touched, topology);
        let delta = after - before;
        // A matrix that is not a shortest-path metric may leave two visited
        // cities without a direct connection.
        if !delta.is_finite() {
            self.steps.swap(i, j);
            return Err(Rejection::Unreachable);
        }

        self.length += delta;
        Ok(delta * self.vehicle.cost_per_km())
    }

    /// Route length walked from scratch.
    pub fn recompute_length<T: Topology + ?Sized>(&self, topology: &T) -> f64 {
        (0..self.steps.len())
            .map(|pos| self.edge_length(pos, topology))
            .sum()
    }

    /// Travel cost walked from scratch.
    pub fn recompute_cost<T: Topology + ?Sized>(&self, topology: &T) -> f64 {
        self.recompute_length(topology) * self.vehicle.cost_per_km()
    }

    /// Re-derives pairing, ordering and capacity invariants from scratch.
    pub fn validate(&self) -> Result<(), Violation> {
        let vehicle = self.vehicle.id();
        let capacity = i64::from(self.vehicle.capacity());
        let mut picked = HashSet::new();
        let mut delivered = HashSet::new();
        let mut load = 0i64;

        for (position, step) in self.steps.iter().enumerate() {
            let task = step.task_id();
            match step.kind() {
                StepKind::Pickup => {
                    if !picked.insert(task) || delivered.contains(&task) {
                        return Err(Violation::DuplicateStep { task, vehicle });
                    }
                }
                StepKind::Delivery => {
                    if delivered.contains(&task) {
                        return Err(Violation::DuplicateStep { task, vehicle });
                    }
                    if !picked.contains(&task) {
                        return Err(Violation::DeliveryBeforePickup { task, vehicle });
                    }
                    delivered.insert(task);
                }
            }
            load += step.load_change();
            if load > capacity {
                return Err(Violation::CapacityExceeded {
                    vehicle,
                    position,
                    load,
                    capacity: self.vehicle.capacity(),
                });
            }
        }

        if let Some(open) = self
            .steps
            .iter()
            .find(|s| !delivered.contains(&s.task_id()))
        {
            return Err(Violation::UnpairedStep {
                task: open.task_id(),
                vehicle,
            });
        }
        Ok(())
    }

    /// Returns `true` if [`validate`](Self::validate) passes.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn front_insertion_length<T: Topology + ?Sized>(
        &self,
        task: &Task,
        topology: &T,
    ) -> Result<f64, Rejection> {
        if task.weight() > self.vehicle.capacity() {
            return Err(Rejection::Capacity);
        }
        let home = self.vehicle.home_city();
        let (pickup, delivery) = (task.pickup_city(), task.delivery_city());
        let n = topology.num_cities();
        if home >= n || pickup >= n || delivery >= n {
            return Err(Rejection::OutOfBounds);
        }
        let mut delta = topology.distance(home, pickup) + topology.distance(pickup, delivery);
        if let Some(first) = self.steps.first() {
            let next = first.city();
            delta += topology.distance(delivery, next) - topology.distance(home, next);
        }
        if !delta.is_finite() {
            return Err(Rejection::Unreachable);
        }
        Ok(delta)
    }

    fn position_of(&self, task: TaskId, kind: StepKind) -> Option<usize> {
        self.steps
            .iter()
            .position(|s| s.task_id() == task && s.kind() == kind)
    }

    fn city_before(&self, pos: usize) -> CityId {
        if pos == 0 {
            self.vehicle.home_city()
        } else {
            self.steps[pos - 1].city()
        }
    }

    /// Length of the edge entering step `pos`.
    fn edge_length<T: Topology + ?Sized>(&self, pos: usize, topology: &T) -> f64 {
        topology.distance(self.city_before(pos), self.steps[pos].city())
    }

    /// Total length of the distinct in-range edges entering `positions`.
    fn edges_length<T: Topology + ?Sized>(&self, positions: &[usize], topology: &T) -> f64 {
        let mut edges: Vec<usize> = positions
            .iter()
            .copied()
            .filter(|&p| p < self.steps.len())
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges.iter().map(|&p| self.edge_length(p, topology)).sum()
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.vehicle.id())?;
        for step in &self.steps {
            write!(f, " -> {}", step)?;
        }
        write!(f, ".")
    }
}
