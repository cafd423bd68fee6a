//! Local search neighborhood for plannings.
//!
//! - [`Move`]: One local edit, reassigning a task or swapping two steps
//! - [`Neighborhood`]: Enumerates and materialises the one-edit candidates
//!   of a planning

mod neighborhood;

pub use neighborhood::{Candidate, Move, Neighborhood};
