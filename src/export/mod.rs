//! Conversion of plannings into per-vehicle action lists.

mod actions;

pub use actions::{to_actions, Action, VehiclePlan};
