//! Transport task type.

use serde::{Deserialize, Serialize};

use super::{CityId, TaskId};

/// A pickup-and-delivery transport request.
///
/// A task is picked up at one city and delivered at another by the same
/// vehicle. It occupies `weight` units of capacity between the two events.
/// Tasks are plain values and never change once created.
///
/// # Examples
///
/// ```
/// use pd_planner::models::Task;
///
/// let t = Task::new(1, 0, 3, 5).with_reward(100.0);
/// assert_eq!(t.id(), 1);
/// assert_eq!(t.pickup_city(), 0);
/// assert_eq!(t.delivery_city(), 3);
/// assert_eq!(t.weight(), 5);
/// assert_eq!(t.reward(), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    pickup_city: CityId,
    delivery_city: CityId,
    weight: u32,
    reward: f64,
}

impl Task {
    /// Creates a task with zero reward.
    pub fn new(id: TaskId, pickup_city: CityId, delivery_city: CityId, weight: u32) -> Self {
        Self {
            id,
            pickup_city,
            delivery_city,
            weight,
            reward: 0.0,
        }
    }

    /// Sets the reward paid for completing this task.
    pub fn with_reward(mut self, reward: f64) -> Self {
        self.reward = reward;
        self
    }

    /// Task ID.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// City where the load is picked up.
    pub fn pickup_city(&self) -> CityId {
        self.pickup_city
    }

    /// City where the load is delivered.
    pub fn delivery_city(&self) -> CityId {
        self.delivery_city
    }

    /// Capacity units occupied while the task is on board.
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Reward paid on delivery.
    pub fn reward(&self) -> f64 {
        self.reward
    }
}
