//! Per-vehicle cost time series.

use std::io;

use serde::{Deserialize, Serialize};

use crate::models::{Planning, VehicleId};

/// One sample: the cost of one vehicle's schedule at a given round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceRow {
    /// Round at which the sample was taken (0 is the starting planning).
    pub round: usize,
    /// Vehicle ID.
    pub vehicle: VehicleId,
    /// Schedule cost.
    pub cost: f64,
}

/// Cost of every schedule, sampled whenever the current planning changes.
///
/// # Examples
///
/// ```
/// use pd_planner::models::{Planning, Vehicle};
/// use pd_planner::search::CostTrace;
///
/// let planning = Planning::new(&[Vehicle::new(0, 10, 0), Vehicle::new(1, 10, 0)]);
/// let mut trace = CostTrace::new();
/// trace.record(0, &planning);
/// assert_eq!(trace.len(), 2);
///
/// let mut out = Vec::new();
/// trace.write_csv(&mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "round,vehicle,cost\n0,0,0\n0,1,0\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTrace {
    rows: Vec<TraceRow>,
}

impl CostTrace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one row per schedule of `planning`.
    pub fn record(&mut self, round: usize, planning: &Planning) {
        self.rows
            .extend(planning.schedules().iter().map(|s| TraceRow {
                round,
                vehicle: s.vehicle().id(),
                cost: s.cost(),
            }));
    }

    /// All samples in recording order.
    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Samples of one vehicle as `(round, cost)` pairs.
    pub fn series(&self, vehicle: VehicleId) -> Vec<(usize, f64)> {
        self.rows
            .iter()
            .filter(|r| r.vehicle == vehicle)
            .map(|r| (r.round, r.cost))
            .collect()
    }

    /// Writes the trace as CSV with a `round,vehicle,cost` header.
    pub fn write_csv<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "round,vehicle,cost")?;
        for row in &self.rows {
            writeln!(out, "{},{},{}", row.round, row.vehicle, row.cost)?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::{Task, Vehicle};

    #[test]
    fn test_record_and_series() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 4.0, 4.0, 0.0]).expect("valid");
        let vehicles = [
            Vehicle::new(7, 10, 0).with_cost_per_km(2.0),
            Vehicle::new(9, 10, 0),
        ];
        let mut p = Planning::new(&vehicles);
        let mut trace = CostTrace::new();
        trace.record(0, &p);
        p.insert_task(0, Task::new(1, 0, 1, 3), &dm).expect("valid");
        trace.record(4, &p);

        assert_eq!(trace.len(), 4);
        assert_eq!(trace.series(7), vec![(0, 0.0), (4, 8.0)]);
        assert_eq!(trace.series(9), vec![(0, 0.0), (4, 0.0)]);
        assert!(trace.series(3).is_empty());
    }

    #[test]
    fn test_csv_layout() {
        let mut trace = CostTrace::new();
        trace.rows.push(TraceRow {
            round: 3,
            vehicle: 1,
            cost: 12.5,
        });
        let mut out = Vec::new();
        trace.write_csv(&mut out).expect("in-memory write");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "round,vehicle,cost\n3,1,12.5\n");
    }
}
