//! Continuous-variable summaries with box-plot geometry.
//!
//! Quartiles use the `sorted[floor(n * q)]` index convention and the
//! standard deviation divides by n. Both match the dashboard charts this
//! engine feeds; report consumers rely on that exact box geometry, so the
//! textbook interpolated quartiles are deliberately not used here.

use serde::Serialize;

/// Summary statistics for one group of continuous values (e.g. the AUC
/// measurements of one inhibitor among the neighbors).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuousSummary {
    pub mean: f64,
    /// Average of the two middle elements on even counts.
    pub median: f64,
    /// Population standard deviation (n denominator).
    pub std: f64,
    /// Minimum over non-outliers; full-range minimum when the IQR fences
    /// exclude everything.
    pub min: f64,
    /// Maximum over non-outliers, same fallback as `min`.
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
    /// Values outside `[q1 - 1.5*IQR, q3 + 1.5*IQR]`, ascending.
    pub outliers: Vec<f64>,
}

impl ContinuousSummary {
    /// Summarize a non-empty list of values. Returns `None` on empty input.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len();
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean = sorted.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
        let std = variance.sqrt();

        let q1 = sorted[(n as f64 * 0.25).floor() as usize];
        let q3 = sorted[(n as f64 * 0.75).floor() as usize];
        let iqr = q3 - q1;
        let lower_fence = q1 - 1.5 * iqr;
        let upper_fence = q3 + 1.5 * iqr;

        let outliers: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|v| *v < lower_fence || *v > upper_fence)
            .collect();
        let non_outliers: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|v| *v >= lower_fence && *v <= upper_fence)
            .collect();

        let (min, max) = if non_outliers.is_empty() {
            (sorted[0], sorted[n - 1])
        } else {
            (non_outliers[0], non_outliers[non_outliers.len() - 1])
        };

        Some(Self {
            mean,
            median,
            std,
            min,
            max,
            q1,
            q3,
            outliers,
        })
    }
}
