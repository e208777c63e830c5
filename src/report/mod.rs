pub mod aberrations;
pub mod assemble;
pub mod drugs;
pub mod genes;
pub mod markdown;
pub mod metadata;
pub mod narrative;
pub mod text;

use serde::Serialize;

pub use assemble::{ReportInputs, SampleReport, assemble_report};
pub use genes::EnrichmentTest;
pub use narrative::{Summarize, SummarizeError, SummarizerUnavailable};

/// Uncorrected significance threshold used across all report sections.
pub const SIGNIFICANCE_ALPHA: f64 = 0.05;

/// Common output shape for categorical, gene and aberration enrichment.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentResult {
    pub label: String,
    pub neighbor_count: usize,
    pub background_count: usize,
    pub neighbor_total: usize,
    pub background_total: usize,
    pub p_value: f64,
    /// Present only in the corrected paths (genes, aberrations).
    pub adjusted_p_value: Option<f64>,
    pub log_enrichment_ratio: f64,
}

impl EnrichmentResult {
    /// Neighborhood occurrence as a display fraction, e.g. `"4/20"`.
    pub fn neighbor_frequency(&self) -> String {
        format!("{}/{}", self.neighbor_count, self.neighbor_total)
    }

    /// Background occurrence as a display fraction, e.g. `"8/100"`.
    pub fn database_frequency(&self) -> String {
        format!("{}/{}", self.background_count, self.background_total)
    }

    /// Neighborhood share in percent.
    pub fn percentage(&self) -> f64 {
        if self.neighbor_total == 0 {
            0.0
        } else {
            self.neighbor_count as f64 / self.neighbor_total as f64 * 100.0
        }
    }

    pub fn is_significant(&self) -> bool {
        self.p_value < SIGNIFICANCE_ALPHA
    }
}

/// Exponential p-value formatting shared by all renderers, e.g. `1.23e-4`.
pub fn format_p(p: f64) -> String {
    format!("{:.2e}", p)
}
