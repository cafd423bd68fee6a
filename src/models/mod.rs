//! Domain model types for pickup-and-delivery planning.
//!
//! Provides the core abstractions: transport tasks, capacity-bounded
//! vehicles, pickup/delivery steps, per-vehicle schedules with incremental
//! cost accounting, and the multi-vehicle planning optimized by search.

mod planning;
mod schedule;
mod step;
mod task;
mod vehicle;
mod violation;

pub use planning::Planning;
pub use schedule::Schedule;
pub use step::{Step, StepKind};
pub use task::Task;
pub use vehicle::Vehicle;
pub use violation::{Rejection, Violation};

pub(crate) use schedule::costs_match;

/// City index into a [`Topology`](crate::distance::Topology).
pub type CityId = usize;

/// Task identifier, unique within a planning.
pub type TaskId = usize;

/// Vehicle identifier.
pub type VehicleId = usize;
