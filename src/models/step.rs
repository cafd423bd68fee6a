//! Pickup and delivery steps.

use std::fmt;

use super::{CityId, Task, TaskId};

/// Whether a step loads or unloads its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Load the task at its pickup city.
    Pickup,
    /// Unload the task at its delivery city.
    Delivery,
}

/// One atomic event in a vehicle's route.
///
/// Steps carry their task by value, so a schedule can be cloned without
/// any shared state.
///
/// # Examples
///
/// ```
/// use pd_planner::models::{Step, Task};
///
/// let task = Task::new(3, 0, 2, 4);
/// let p = Step::pickup(task);
/// let d = Step::delivery(task);
/// assert_eq!(p.city(), 0);
/// assert_eq!(d.city(), 2);
/// assert_eq!(p.load_change(), 4);
/// assert_eq!(d.load_change(), -4);
/// assert_eq!(p.to_string(), "p3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    kind: StepKind,
    task: Task,
}

impl Step {
    /// Creates the pickup step of a task.
    pub fn pickup(task: Task) -> Self {
        Self {
            kind: StepKind::Pickup,
            task,
        }
    }

    /// Creates the delivery step of a task.
    pub fn delivery(task: Task) -> Self {
        Self {
            kind: StepKind::Delivery,
            task,
        }
    }

    /// Pickup or delivery.
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// The task this step belongs to.
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Shorthand for `self.task().id()`.
    pub fn task_id(&self) -> TaskId {
        self.task.id()
    }

    /// Returns `true` for pickup steps.
    pub fn is_pickup(&self) -> bool {
        self.kind == StepKind::Pickup
    }

    /// City where this step happens.
    pub fn city(&self) -> CityId {
        match self.kind {
            StepKind::Pickup => self.task.pickup_city(),
            StepKind::Delivery => self.task.delivery_city(),
        }
    }

    /// Signed change of on-board weight caused by this step.
    pub fn load_change(&self) -> i64 {
        let w = i64::from(self.task.weight());
        match self.kind {
            StepKind::Pickup => w,
            StepKind::Delivery => -w,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            StepKind::Pickup => 'p',
            StepKind::Delivery => 'd',
        };
        write!(f, "{}{}", prefix, self.task.id())
    }
}
