//! City topology: distances, adjacency and shortest paths.
//!
//! - [`Topology`]: Interface the planner consumes
//! - [`DistanceMatrix`]: Dense matrix for fully-connected instances
//! - [`RoadNetwork`]: Weighted city graph with precomputed shortest paths

mod matrix;
mod network;
mod topology;

pub use matrix::DistanceMatrix;
pub use network::RoadNetwork;
pub use topology::Topology;
