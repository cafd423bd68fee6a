//! One-edit neighborhood of a planning.
//!
//! # Moves
//!
//! Each round one non-empty schedule is chosen uniformly at random. From it:
//!
//! - **Reassignment**: its first task is moved to the front of every other
//!   vehicle's schedule (one candidate per destination vehicle),
//! - **Reordering**: every pair of step positions `i < j` is swapped (one
//!   candidate per pair).
//!
//! Moves that break capacity or pickup-before-delivery ordering are dropped.
//! Limiting each round to one source schedule keeps the candidate count at
//! O(m + k²) instead of enumerating every schedule.
//!
//! # Concurrency
//!
//! Every candidate is an independent clone of the parent, and applying a
//! move only touches the clone. Candidates are therefore materialised on the
//! rayon pool when [`Neighborhood::parallel`] is enabled; the result order
//! is the move order either way, so runs stay reproducible.

use rand::Rng;
use rayon::prelude::*;

use crate::distance::Topology;
use crate::models::{Planning, Rejection};

/// A single local edit, addressed by fleet position and step index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Move the first task of schedule `from` to the front of schedule `to`.
    Reassign {
        /// Source fleet position.
        from: usize,
        /// Destination fleet position.
        to: usize,
    },
    /// Swap steps `i` and `j` of schedule `vehicle`.
    Swap {
        /// Fleet position.
        vehicle: usize,
        /// First step index.
        i: usize,
        /// Second step index.
        j: usize,
    },
}

impl Move {
    /// Applies the move to a clone of `planning`.
    ///
    /// # Errors
    ///
    /// The [`Rejection`] of the underlying edit; `planning` is never
    /// modified.
    pub fn apply<T: Topology + ?Sized>(
        &self,
        planning: &Planning,
        topology: &T,
    ) -> Result<Planning, Rejection> {
        let mut candidate = planning.clone();
        match *self {
            Move::Reassign { from, to } => candidate.reassign_first_task(from, to, topology)?,
            Move::Swap { vehicle, i, j } => candidate.swap_steps(vehicle, i, j, topology)?,
        };
        debug_assert!(candidate.is_valid(), "move {:?} broke an invariant", self);
        Ok(candidate)
    }
}

/// A neighbor planning together with the move that produced it.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The edit applied to the parent.
    pub mv: Move,
    /// The resulting planning.
    pub planning: Planning,
}

impl Candidate {
    /// Total cost of the candidate planning.
    pub fn cost(&self) -> f64 {
        self.planning.cost()
    }
}

/// Generator of one-edit candidates.
///
/// # Examples
///
/// ```
/// use pd_planner::distance::DistanceMatrix;
/// use pd_planner::local_search::Neighborhood;
/// use pd_planner::models::{Planning, Task, Vehicle};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
/// let vehicles = vec![Vehicle::new(0, 10, 0), Vehicle::new(1, 10, 0)];
/// let tasks = vec![Task::new(1, 0, 1, 3), Task::new(2, 1, 2, 3)];
/// let planning = Planning::initial(&vehicles, &tasks, &dm).unwrap();
///
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// let candidates = Neighborhood::new().candidates(&planning, &dm, &mut rng);
/// assert!(!candidates.is_empty());
/// assert!(candidates.iter().all(|c| c.planning.is_valid()));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood {
    parallel: bool,
}

impl Default for Neighborhood {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighborhood {
    /// Creates a neighborhood that materialises candidates in parallel.
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Enables or disables parallel candidate materialisation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether candidates are materialised on the rayon pool.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Picks a non-empty schedule uniformly at random.
    ///
    /// Returns `None` if every schedule is empty.
    pub fn choose_schedule<R: Rng + ?Sized>(planning: &Planning, rng: &mut R) -> Option<usize> {
        let busy: Vec<usize> = planning
            .schedules()
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_empty())
            .map(|(i, _)| i)
            .collect();
        if busy.is_empty() {
            return None;
        }
        Some(busy[rng.random_range(0..busy.len())])
    }

    /// All reassignment and reordering moves sourced from schedule `chosen`.
    ///
    /// Moves are listed, not checked; applying one may still be rejected.
    pub fn moves(planning: &Planning, chosen: usize) -> Vec<Move> {
        let Some(schedule) = planning.schedule(chosen) else {
            return Vec::new();
        };
        if schedule.is_empty() {
            return Vec::new();
        }

        let mut moves: Vec<Move> = (0..planning.num_vehicles())
            .filter(|&to| to != chosen)
            .map(|to| Move::Reassign { from: chosen, to })
            .collect();

        let n = schedule.len();
        for i in 0..n {
            for j in (i + 1)..n {
                moves.push(Move::Swap {
                    vehicle: chosen,
                    i,
                    j,
                });
            }
        }
        moves
    }

    /// Applies every move and keeps the accepted ones, in move order.
    pub fn materialise<T: Topology + ?Sized>(
        &self,
        planning: &Planning,
        moves: &[Move],
        topology: &T,
    ) -> Vec<Candidate> {
        let build = |mv: &Move| {
            mv.apply(planning, topology)
                .ok()
                .map(|p| Candidate { mv: *mv, planning: p })
        };
        if self.parallel {
            moves.par_iter().filter_map(build).collect()
        } else {
            moves.iter().filter_map(build).collect()
        }
    }

    /// One round of neighbor generation: choose a schedule, list its moves
    /// and materialise the feasible ones.
    ///
    /// Returns an empty list if every schedule is empty.
    pub fn candidates<T: Topology + ?Sized, R: Rng + ?Sized>(
        &self,
        planning: &Planning,
        topology: &T,
        rng: &mut R,
    ) -> Vec<Candidate> {
        match Self::choose_schedule(planning, rng) {
            Some(chosen) => {
                let moves = Self::moves(planning, chosen);
                self.materialise(planning, &moves, topology)
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::{Task, Vehicle};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn abc() -> DistanceMatrix {
        DistanceMatrix::from_data(3, vec![0.0, 4.0, 6.0, 4.0, 0.0, 3.0, 6.0, 3.0, 0.0])
            .expect("valid")
    }

    fn fleet() -> Vec<Vehicle> {
        vec![
            Vehicle::new(1, 10, 0).with_cost_per_km(5.0),
            Vehicle::new(2, 20, 0).with_cost_per_km(3.0),
        ]
    }

    /// Both tasks on V2: p1 d1 p2 d2 after inserting 2 then 1.
    fn loaded() -> Planning {
        let dm = abc();
        let mut p = Planning::new(&fleet());
        p.insert_task(1, Task::new(2, 1, 2, 8), &dm).expect("fits");
        p.insert_task(1, Task::new(1, 0, 1, 5), &dm).expect("fits");
        p
    }

    #[test]
    fn test_moves_enumeration() {
        let moves = Neighborhood::moves(&loaded(), 1);
        // 1 reassignment + C(4, 2) swaps
        assert_eq!(moves.len(), 7);
        assert_eq!(moves[0], Move::Reassign { from: 1, to: 0 });
        assert!(Neighborhood::moves(&loaded(), 0).is_empty());
        assert!(Neighborhood::moves(&loaded(), 9).is_empty());
    }

    #[test]
    fn test_candidates_are_valid_and_independent() {
        let dm = abc();
        let parent = loaded();
        let parent_cost = parent.cost();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let candidates = Neighborhood::new().candidates(&parent, &dm, &mut rng);

        assert!(!candidates.is_empty());
        for c in &candidates {
            assert!(c.planning.validate(&dm).is_ok());
            assert_eq!(c.planning.num_tasks(), 2);
        }
        assert_eq!(parent.cost(), parent_cost);
        assert!(parent.validate(&dm).is_ok());
    }

    #[test]
    fn test_rejected_moves_are_dropped() {
        let dm = abc();
        let parent = loaded();
        let moves = Neighborhood::moves(&parent, 1);
        let candidates = Neighborhood::new().with_parallel(false).materialise(&parent, &moves, &dm);
        let kept: Vec<Move> = candidates.iter().map(|c| c.mv).collect();
        assert_eq!(
            kept,
            vec![
                Move::Reassign { from: 1, to: 0 },
                Move::Swap { vehicle: 1, i: 1, j: 2 },
            ]
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dm = abc();
        let parent = loaded();
        let moves = Neighborhood::moves(&parent, 1);
        let seq = Neighborhood::new().with_parallel(false).materialise(&parent, &moves, &dm);
        let par = Neighborhood::new().with_parallel(true).materialise(&parent, &moves, &dm);
        assert_eq!(seq.len(), par.len());
        for (a, b) in seq.iter().zip(&par) {
            assert_eq!(a.mv, b.mv);
            assert_eq!(a.cost(), b.cost());
        }
    }

    #[test]
    fn test_empty_planning_has_no_candidates() {
        let dm = abc();
        let p = Planning::new(&fleet());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(Neighborhood::choose_schedule(&p, &mut rng).is_none());
        assert!(Neighborhood::new().candidates(&p, &dm, &mut rng).is_empty());
    }

    #[test]
    fn test_choose_schedule_only_non_empty() {
        let p = loaded();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            assert_eq!(Neighborhood::choose_schedule(&p, &mut rng), Some(1));
        }
    }
}
