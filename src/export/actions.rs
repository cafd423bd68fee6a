//! Action lists.
//!
//! Each vehicle starts at its home city. For every step of its schedule the
//! shortest path to the step's city is expanded into [`Action::Move`]s, one
//! per city entered, followed by the [`Action::Pickup`] or
//! [`Action::Delivery`] itself. A step in the city the vehicle already
//! stands in produces no move.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distance::Topology;
use crate::models::{CityId, Planning, Schedule, StepKind, TaskId, VehicleId};

/// One instruction for a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Drive to an adjacent city.
    Move(CityId),
    /// Load a task in the current city.
    Pickup(TaskId),
    /// Unload a task in the current city.
    Delivery(TaskId),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move(city) => write!(f, "move {}", city),
            Action::Pickup(task) => write!(f, "pickup {}", task),
            Action::Delivery(task) => write!(f, "deliver {}", task),
        }
    }
}

/// Ordered actions of one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclePlan {
    /// Vehicle ID.
    pub vehicle: VehicleId,
    /// Home city the plan starts from.
    pub start: CityId,
    /// Actions in execution order.
    pub actions: Vec<Action>,
}

impl VehiclePlan {
    /// City the vehicle stands in after the last action.
    pub fn end_city(&self) -> CityId {
        self.actions
            .iter()
            .rev()
            .find_map(|a| match a {
                Action::Move(city) => Some(*city),
                _ => None,
            })
            .unwrap_or(self.start)
    }

    /// Tasks delivered, in order.
    pub fn delivered(&self) -> Vec<TaskId> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                Action::Delivery(task) => Some(*task),
                _ => None,
            })
            .collect()
    }

    /// Total distance travelled by the moves.
    pub fn distance<T: Topology + ?Sized>(&self, topology: &T) -> f64 {
        let mut at = self.start;
        let mut total = 0.0;
        for action in &self.actions {
            if let Action::Move(next) = *action {
                total += topology.distance(at, next);
                at = next;
            }
        }
        total
    }
}

impl fmt::Display for VehiclePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{} @{}:", self.vehicle, self.start)?;
        for action in &self.actions {
            write!(f, " {};", action)?;
        }
        Ok(())
    }
}

/// Expands one schedule into its action list.
fn schedule_actions<T: Topology + ?Sized>(schedule: &Schedule, topology: &T) -> VehiclePlan {
    let start = schedule.vehicle().home_city();
    let mut actions = Vec::with_capacity(schedule.len() * 2);
    let mut at = start;
    for step in schedule.steps() {
        let target = step.city();
        actions.extend(topology.shortest_path(at, target).into_iter().map(Action::Move));
        at = target;
        actions.push(match step.kind() {
            StepKind::Pickup => Action::Pickup(step.task_id()),
            StepKind::Delivery => Action::Delivery(step.task_id()),
        });
    }
    VehiclePlan {
        vehicle: schedule.vehicle().id(),
        start,
        actions,
    }
}

/// Converts a planning into one action list per vehicle, in fleet order.
///
/// # Examples
///
/// ```
/// use pd_planner::distance::DistanceMatrix;
/// use pd_planner::export::{to_actions, Action};
/// use pd_planner::models::{Planning, Task, Vehicle};
///
/// let dm = DistanceMatrix::from_data(2, vec![0.0, 4.0, 4.0, 0.0]).unwrap();
/// let mut planning = Planning::new(&[Vehicle::new(0, 10, 0)]);
/// planning.insert_task(0, Task::new(3, 0, 1, 2), &dm).unwrap();
///
/// let plans = to_actions(&planning, &dm);
/// assert_eq!(plans[0].start, 0);
/// assert_eq!(
///     plans[0].actions,
///     vec![Action::Pickup(3), Action::Move(1), Action::Delivery(3)]
/// );
/// ```
pub fn to_actions<T: Topology + ?Sized>(planning: &Planning, topology: &T) -> Vec<VehiclePlan> {
    planning
        .schedules()
        .iter()
        .map(|s| schedule_actions(s, topology))
        .collect()
}
