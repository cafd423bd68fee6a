//! Road network with precomputed shortest paths.
//!
//! # Algorithm
//!
//! All-pairs shortest distances and a next-hop table are computed once with
//! Floyd–Warshall, so [`Topology::distance`] is a table lookup and
//! [`Topology::shortest_path`] walks the next-hop table.
//!
//! # Complexity
//!
//! O(n³) construction, O(1) distance, O(path length) path queries.

use crate::error::PlanError;
use crate::models::CityId;

use super::{DistanceMatrix, Topology};

/// An undirected weighted graph of cities.
///
/// # Examples
///
/// ```
/// use pd_planner::distance::{RoadNetwork, Topology};
///
/// // A - B - C, plus a long direct road A - C.
/// let net = RoadNetwork::new(3, &[(0, 1, 4.0), (1, 2, 3.0), (0, 2, 10.0)]).unwrap();
/// assert_eq!(net.distance(0, 2), 7.0);
/// assert_eq!(net.shortest_path(0, 2), vec![1, 2]);
/// assert_eq!(net.neighbors(1), vec![0, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    adjacency: Vec<Vec<CityId>>,
    distances: DistanceMatrix,
    next_hop: Vec<Option<CityId>>,
}

impl RoadNetwork {
    /// Builds the network from `(city_a, city_b, length)` roads.
    ///
    /// Parallel roads keep the shortest length; self-loops are ignored.
    ///
    /// # Errors
    ///
    /// [`PlanError::InvalidTopology`] if a city index is out of range or a
    /// length is negative or not finite.
    pub fn new(num_cities: usize, roads: &[(CityId, CityId, f64)]) -> Result<Self, PlanError> {
        let n = num_cities;
        let mut adjacency = vec![Vec::new(); n];
        let mut distances = DistanceMatrix::from_data(n, vec![f64::INFINITY; n * n])
            .ok_or_else(|| PlanError::InvalidTopology {
                reason: "matrix size mismatch".into(),
            })?;
        let mut next_hop = vec![None; n * n];

        for c in 0..n {
            distances.set(c, c, 0.0);
            next_hop[c * n + c] = Some(c);
        }

        for &(a, b, length) in roads {
            if a >= n || b >= n {
                return Err(PlanError::InvalidTopology {
                    reason: format!("road {}-{} references a city outside 0..{}", a, b, n),
                });
            }
            if !length.is_finite() || length < 0.0 {
                return Err(PlanError::InvalidTopology {
                    reason: format!("road {}-{} has invalid length {}", a, b, length),
                });
            }
            if a == b {
                continue;
            }
            if !adjacency[a].contains(&b) {
                adjacency[a].push(b);
                adjacency[b].push(a);
            }
            if length < distances.get(a, b) {
                distances.set_symmetric(a, b, length);
                next_hop[a * n + b] = Some(b);
                next_hop[b * n + a] = Some(a);
            }
        }

        for k in 0..n {
            for i in 0..n {
                let dik = distances.get(i, k);
                if !dik.is_finite() {
                    continue;
                }
                for j in 0..n {
                    let via = dik + distances.get(k, j);
                    if via < distances.get(i, j) {
                        distances.set(i, j, via);
                        next_hop[i * n + j] = next_hop[i * n + k];
                    }
                }
            }
        }

        for list in &mut adjacency {
            list.sort_unstable();
        }

        Ok(Self {
            adjacency,
            distances,
            next_hop,
        })
    }

    /// Shortest-distance matrix between every pair of cities.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }
}

impl Topology for RoadNetwork {
    fn num_cities(&self) -> usize {
        self.adjacency.len()
    }

    fn distance(&self, a: CityId, b: CityId) -> f64 {
        self.distances.get(a, b)
    }

    fn shortest_path(&self, a: CityId, b: CityId) -> Vec<CityId> {
        let n = self.num_cities();
        let mut path = Vec::new();
        let mut current = a;
        while current != b {
            match self.next_hop[current * n + b] {
                Some(hop) if path.len() < n => {
                    path.push(hop);
                    current = hop;
                }
                _ => return Vec::new(),
            }
        }
        path
    }

    fn neighbors(&self, city: CityId) -> Vec<CityId> {
        self.adjacency[city].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lausanne(0) - Geneva(1) - Bern(2) - Zurich(3), plus Lausanne - Bern.
    fn swiss() -> RoadNetwork {
        RoadNetwork::new(
            4,
            &[(0, 1, 62.0), (0, 2, 100.0), (2, 3, 120.0), (1, 2, 170.0)],
        )
        .expect("valid network")
    }

    #[test]
    fn test_direct_road() {
        let net = swiss();
        assert_eq!(net.distance(0, 1), 62.0);
        assert_eq!(net.shortest_path(0, 1), vec![1]);
    }

    #[test]
    fn test_multi_hop() {
        let net = swiss();
        assert_eq!(net.distance(1, 3), 282.0);
        assert_eq!(net.shortest_path(1, 3), vec![0, 2, 3]);
        assert_eq!(net.shortest_path(3, 1), vec![2, 0, 1]);
    }

    #[test]
    fn test_indirect_cheaper_than_direct() {
        // Geneva - Bern direct is 170, via Lausanne 162.
        let net = swiss();
        assert_eq!(net.distance(1, 2), 162.0);
        assert_eq!(net.shortest_path(1, 2), vec![0, 2]);
    }

    #[test]
    fn test_same_city() {
        let net = swiss();
        assert_eq!(net.distance(2, 2), 0.0);
        assert!(net.shortest_path(2, 2).is_empty());
    }

    #[test]
    fn test_symmetric() {
        assert!(swiss().distances().is_symmetric(1e-10));
    }

    #[test]
    fn test_neighbors() {
        let net = swiss();
        assert_eq!(net.neighbors(0), vec![1, 2]);
        assert_eq!(net.neighbors(1), vec![0, 2]);
        assert_eq!(net.neighbors(3), vec![2]);
    }

    #[test]
    fn test_unreachable() {
        let net = RoadNetwork::new(3, &[(0, 1, 1.0)]).expect("valid network");
        assert!(net.distance(0, 2).is_infinite());
        assert!(net.shortest_path(0, 2).is_empty());
    }

    #[test]
    fn test_parallel_roads_keep_shortest() {
        let net = RoadNetwork::new(2, &[(0, 1, 9.0), (1, 0, 4.0)]).expect("valid network");
        assert_eq!(net.distance(0, 1), 4.0);
        assert_eq!(net.neighbors(0), vec![1]);
    }

    #[test]
    fn test_invalid_roads() {
        assert!(matches!(
            RoadNetwork::new(2, &[(0, 2, 1.0)]),
            Err(PlanError::InvalidTopology { .. })
        ));
        assert!(matches!(
            RoadNetwork::new(2, &[(0, 1, -1.0)]),
            Err(PlanError::InvalidTopology { .. })
        ));
        assert!(matches!(
            RoadNetwork::new(2, &[(0, 1, f64::NAN)]),
            Err(PlanError::InvalidTopology { .. })
        ));
    }
}
