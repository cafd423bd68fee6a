//! Vehicle type with capacity and cost parameters.

use serde::{Deserialize, Serialize};

use super::{CityId, VehicleId};

/// A vehicle that carries tasks from its home city.
///
/// # Examples
///
/// ```
/// use pd_planner::models::Vehicle;
///
/// let v = Vehicle::new(0, 20, 3).with_cost_per_km(1.5);
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.capacity(), 20);
/// assert_eq!(v.home_city(), 3);
/// assert_eq!(v.cost_per_km(), 1.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: VehicleId,
    capacity: u32,
    home_city: CityId,
    cost_per_km: f64,
}

impl Vehicle {
    /// Creates a vehicle with the given ID, capacity and home city.
    ///
    /// Default: cost_per_km = 1.0.
    pub fn new(id: VehicleId, capacity: u32, home_city: CityId) -> Self {
        Self {
            id,
            capacity,
            home_city,
            cost_per_km: 1.0,
        }
    }

    /// Sets cost per unit distance.
    pub fn with_cost_per_km(mut self, cost: f64) -> Self {
        self.cost_per_km = cost;
        self
    }

    /// Vehicle ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Maximum load carried at any time.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// City where the route starts.
    pub fn home_city(&self) -> CityId {
        self.home_city
    }

    /// Cost per unit distance traveled.
    pub fn cost_per_km(&self) -> f64 {
        self.cost_per_km
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_new() {
        let v = Vehicle::new(0, 200, 4);
        assert_eq!(v.id(), 0);
        assert_eq!(v.capacity(), 200);
        assert_eq!(v.home_city(), 4);
        assert_eq!(v.cost_per_km(), 1.0);
    }

    #[test]
    fn test_vehicle_builder() {
        let v = Vehicle::new(1, 100, 2).with_cost_per_km(5.0);
        assert_eq!(v.id(), 1);
        assert_eq!(v.capacity(), 100);
        assert_eq!(v.cost_per_km(), 5.0);
    }
}
