//! Topology trait.

use crate::models::CityId;

/// Read-only view of the map the vehicles drive on.
///
/// The planner only ever asks for distances between cities (cost
/// accounting) and for the concrete path between two cities (action
/// export). Implementations must be cheap to query: `distance` sits on the
/// hot path of every neighbor evaluation.
///
/// # Examples
///
/// ```
/// use pd_planner::distance::Topology;
///
/// /// Cities on a line, one unit apart.
/// struct Line(usize);
///
/// impl Topology for Line {
///     fn num_cities(&self) -> usize { self.0 }
///     fn distance(&self, a: usize, b: usize) -> f64 { a.abs_diff(b) as f64 }
///     fn shortest_path(&self, a: usize, b: usize) -> Vec<usize> {
///         if a <= b { (a + 1..=b).collect() } else { (b..a).rev().collect() }
///     }
///     fn neighbors(&self, c: usize) -> Vec<usize> {
///         [c.checked_sub(1), Some(c + 1).filter(|&n| n < self.0)]
///             .into_iter()
///             .flatten()
///             .collect()
///     }
/// }
///
/// let line = Line(5);
/// assert_eq!(line.shortest_path(3, 1), vec![2, 1]);
/// assert_eq!(line.neighbors(0), vec![1]);
/// ```
pub trait Topology: Send + Sync {
    /// Number of cities; valid city IDs are `0..num_cities()`.
    fn num_cities(&self) -> usize;

    /// Shortest travel distance between two cities.
    ///
    /// Symmetric and non-negative; `f64::INFINITY` if `b` cannot be reached.
    fn distance(&self, a: CityId, b: CityId) -> f64;

    /// Cities visited when driving from `a` to `b`, excluding `a` and ending
    /// with `b`. Empty when `a == b` or `b` is unreachable.
    fn shortest_path(&self, a: CityId, b: CityId) -> Vec<CityId>;

    /// Cities directly connected to `city`.
    fn neighbors(&self, city: CityId) -> Vec<CityId>;
}
