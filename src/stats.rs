//! Summary statistics over degree distributions
//!
//! Mirrors the descriptive block of the run report: average, median,
//! extremes and the 20/40/60/80% quantiles of a degree vector.

use serde::Serialize;
use std::fmt;

/// Descriptive statistics of one degree distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeStats {
    pub average: f64,
    pub median: f64,
    pub min: usize,
    pub max: usize,
    /// Quantiles at 20/40/60/80%, linearly interpolated between order
    /// statistics.
    pub quintiles: [f64; 4],
}

impl DegreeStats {
    /// Compute statistics for a degree sample. Empty samples yield `None`
    /// rather than NaN-filled stats.
    pub fn from_degrees(degrees: &[usize]) -> Option<Self> {
        if degrees.is_empty() {
            return None;
        }

        let mut sorted = degrees.to_vec();
        sorted.sort_unstable();

        let total: usize = sorted.iter().sum();
        let average = total as f64 / sorted.len() as f64;

        Some(Self {
            average,
            median: quantile(&sorted, 0.5),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            quintiles: [
                quantile(&sorted, 0.2),
                quantile(&sorted, 0.4),
                quantile(&sorted, 0.6),
                quantile(&sorted, 0.8),
            ],
        })
    }
}

impl fmt::Display for DegreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "average: {:.2}", self.average)?;
        writeln!(f, "median:  {:.2}", self.median)?;
        writeln!(f, "min:     {}", self.min)?;
        writeln!(f, "max:     {}", self.max)?;
        write!(
            f,
            "quintiles (20/40/60/80%): {:.2} / {:.2} / {:.2} / {:.2}",
            self.quintiles[0], self.quintiles[1], self.quintiles[2], self.quintiles[3]
        )
    }
}

/// Linearly interpolated quantile of an ascending-sorted sample.
fn quantile(sorted: &[usize], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let lower = sorted[lo] as f64;
    let upper = sorted[hi] as f64;
    lower + (upper - lower) * (pos - lo as f64)
}
