//! Dense distance matrix.

use crate::models::CityId;

use super::Topology;

/// A dense n×n distance matrix stored in row-major order.
///
/// Describes a fully-connected map: every city is adjacent to every other
/// one and the path between two cities is the direct hop.
///
/// # Examples
///
/// ```
/// use pd_planner::distance::{DistanceMatrix, Topology};
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// assert_eq!(dm.shortest_path(0, 2), vec![2]);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a Euclidean distance matrix from `(x, y)` city coordinates.
    pub fn from_coordinates(points: &[(f64, f64)]) -> Self {
        let n = points.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = points[i].0 - points[j].0;
                let dy = points[i].1 - points[j].1;
                let d = (dx * dx + dy * dy).sqrt();
                dm.set_symmetric(i, j, d);
            }
        }
        dm
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the distance from city `from` to city `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: CityId, to: CityId) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from city `from` to city `to`.
    pub fn set(&mut self, from: CityId, to: CityId, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Sets the distance in both directions.
    pub fn set_symmetric(&mut self, a: CityId, b: CityId, distance: f64) {
        self.set(a, b, distance);
        self.set(b, a, distance);
    }

    /// Number of cities in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

impl Topology for DistanceMatrix {
    fn num_cities(&self) -> usize {
        self.size
    }

    fn distance(&self, a: CityId, b: CityId) -> f64 {
        self.get(a, b)
    }

    fn shortest_path(&self, a: CityId, b: CityId) -> Vec<CityId> {
        if a == b {
            Vec::new()
        } else {
            vec![b]
        }
    }

    fn neighbors(&self, city: CityId) -> Vec<CityId> {
        (0..self.size).filter(|&c| c != city).collect()
    }
}
