//! Error types surfaced to callers of the planner.

use std::fmt;

use crate::models::{CityId, TaskId};

/// Errors returned by plan construction, extension and topology loading.
///
/// Only conditions the caller can act on are reported here. Rejected
/// neighbor moves never escape the search (see
/// [`Rejection`](crate::models::Rejection)) and broken internal invariants
/// are reported by [`Violation`](crate::models::Violation).
///
/// # Examples
///
/// ```
/// use pd_planner::PlanError;
///
/// let err = PlanError::Infeasible { task: 7, weight: 25, max_capacity: 20 };
/// assert!(err.is_infeasible());
/// assert_eq!(
///     err.to_string(),
///     "task 7 (weight 25) cannot be carried by any vehicle (largest capacity 20)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    /// No vehicle is able to take the task.
    Infeasible {
        /// The task that could not be placed.
        task: TaskId,
        /// Its weight.
        weight: u32,
        /// Largest capacity in the fleet.
        max_capacity: u32,
    },
    /// Tasks were supplied but the fleet is empty.
    NoVehicles,
    /// A task id was supplied twice, or is already part of the planning.
    DuplicateTask {
        /// The repeated task id.
        task: TaskId,
    },
    /// A vehicle or task refers to a city the topology does not have.
    UnknownCity {
        /// The offending city.
        city: CityId,
        /// Number of cities in the topology.
        num_cities: usize,
    },
    /// The road network could not be built.
    InvalidTopology {
        /// Human-readable reason.
        reason: String,
    },
}

impl PlanError {
    /// Returns `true` for errors meaning "this task cannot be served".
    ///
    /// Auction callers treat these as "cannot bid".
    pub fn is_infeasible(&self) -> bool {
        matches!(self, PlanError::Infeasible { .. } | PlanError::NoVehicles)
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Infeasible {
                task,
                weight,
                max_capacity,
            } => write!(
                f,
                "task {} (weight {}) cannot be carried by any vehicle (largest capacity {})",
                task, weight, max_capacity
            ),
            PlanError::NoVehicles => write!(f, "no vehicles available to carry tasks"),
            PlanError::DuplicateTask { task } => write!(f, "task {} is assigned twice", task),
            PlanError::UnknownCity { city, num_cities } => write!(
                f,
                "city {} is outside the topology (0..{})",
                city, num_cities
            ),
            PlanError::InvalidTopology { reason } => write!(f, "invalid topology: {}", reason),
        }
    }
}

impl std::error::Error for PlanError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infeasible_classification() {
        assert!(PlanError::NoVehicles.is_infeasible());
        assert!(!PlanError::DuplicateTask { task: 1 }.is_infeasible());
        assert!(!PlanError::InvalidTopology {
            reason: "x".into()
        }
        .is_infeasible());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            PlanError::DuplicateTask { task: 3 }.to_string(),
            "task 3 is assigned twice"
        );
        assert_eq!(
            PlanError::InvalidTopology {
                reason: "negative edge".into()
            }
            .to_string(),
            "invalid topology: negative edge"
        );
        assert_eq!(
            PlanError::UnknownCity {
                city: 7,
                num_cities: 3
            }
            .to_string(),
            "city 7 is outside the topology (0..3)"
        );
    }

    #[test]
    fn test_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&PlanError::NoVehicles);
    }
}
