//! Rejected edits and invariant violations.

use std::fmt;

use super::{TaskId, VehicleId};

/// Why a schedule or planning edit was refused.
///
/// Rejections are normal during search: the neighborhood generator simply
/// drops the candidate. The edited value is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The schedule has no task to remove.
    Empty,
    /// The load would exceed the vehicle capacity at some step.
    Capacity,
    /// A delivery would precede its pickup.
    Ordering,
    /// A step, vehicle or city index is out of range.
    OutOfBounds,
    /// The new route would need to travel between disconnected cities.
    Unreachable,
    /// Source and destination vehicle are the same.
    SameVehicle,
    /// The task is already part of the planning.
    Duplicate,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Rejection::Empty => "schedule is empty",
            Rejection::Capacity => "capacity exceeded",
            Rejection::Ordering => "delivery before pickup",
            Rejection::OutOfBounds => "index out of bounds",
            Rejection::Unreachable => "city unreachable",
            Rejection::SameVehicle => "source and destination vehicle are the same",
            Rejection::Duplicate => "task already planned",
        };
        f.write_str(msg)
    }
}

/// A broken planning invariant.
///
/// Produced only by the validation backstop
/// ([`Planning::validate`](super::Planning::validate),
/// [`Schedule::validate`](super::Schedule::validate)). Seeing one means the
/// incremental bookkeeping has a bug.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// A task of the planning is not scheduled on any vehicle.
    MissingTask {
        /// Task ID.
        task: TaskId,
    },
    /// A pickup or delivery step appears more than once.
    DuplicateStep {
        /// Task ID.
        task: TaskId,
        /// Vehicle holding the extra step.
        vehicle: VehicleId,
    },
    /// A scheduled task is not part of the planning's task set.
    UnknownTask {
        /// Task ID.
        task: TaskId,
        /// Vehicle holding the step.
        vehicle: VehicleId,
    },
    /// A pickup without delivery, or the reverse.
    UnpairedStep {
        /// Task ID.
        task: TaskId,
        /// Vehicle holding the step.
        vehicle: VehicleId,
    },
    /// A delivery comes before its pickup.
    DeliveryBeforePickup {
        /// Task ID.
        task: TaskId,
        /// Vehicle holding the steps.
        vehicle: VehicleId,
    },
    /// On-board weight exceeds capacity after a step.
    CapacityExceeded {
        /// Vehicle ID.
        vehicle: VehicleId,
        /// Step index where the overload happens.
        position: usize,
        /// Load after that step.
        load: i64,
        /// Vehicle capacity.
        capacity: u32,
    },
    /// The cached cost drifted from a full recomputation.
    CostMismatch {
        /// Incrementally maintained cost.
        cached: f64,
        /// Cost recomputed from scratch.
        recomputed: f64,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingTask { task } => write!(f, "task {} is not scheduled", task),
            Violation::DuplicateStep { task, vehicle } => {
                write!(f, "task {} has a repeated step on vehicle {}", task, vehicle)
            }
            Violation::UnknownTask { task, vehicle } => {
                write!(f, "vehicle {} carries unknown task {}", vehicle, task)
            }
            Violation::UnpairedStep { task, vehicle } => {
                write!(f, "task {} is not paired on vehicle {}", task, vehicle)
            }
            Violation::DeliveryBeforePickup { task, vehicle } => write!(
                f,
                "task {} is delivered before pickup on vehicle {}",
                task, vehicle
            ),
            Violation::CapacityExceeded {
                vehicle,
                position,
                load,
                capacity,
            } => write!(
                f,
                "vehicle {} carries {} > {} after step {}",
                vehicle, load, capacity, position
            ),
            Violation::CostMismatch { cached, recomputed } => write!(
                f,
                "cached cost {} differs from recomputed cost {}",
                cached, recomputed
            ),
        }
    }
}

impl std::error::Error for Violation {}
