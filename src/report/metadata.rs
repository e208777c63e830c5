//! Metadata breakdown: the fixed clinical attribute set, value by value.
//!
//! Each attribute's neighbor values are binomial-tested against the
//! background frequency and reported per value, uncorrected; multiple-
//! testing correction belongs to the gene and aberration paths only.

use serde::Serialize;

use crate::engine::{Neighborhood, categorical_counts};
use crate::input::Population;
use crate::report::EnrichmentResult;
use crate::stats::{binomial_tail_p, log_enrichment_ratio};

/// The clinical metadata attributes every report covers, in display order.
pub const METADATA_ATTRIBUTES: &[&str] = &[
    "sex",
    "tissue",
    "prim_rec",
    "FAB",
    "WHO_2022",
    "ICC_2022",
    "KMT2A_diagnosis",
    "rare_diagnosis",
    "clusters",
    "blasts",
];

/// The dominant value of one attribute within the neighborhood.
#[derive(Debug, Clone, Serialize)]
pub struct MostProbable {
    pub value: String,
    /// Share of usable neighbor values, in [0, 1].
    pub probability: f64,
}

/// Per-attribute value breakdown. An attribute with no usable neighbor
/// values keeps an empty breakdown and no dominant value.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeBreakdown {
    pub attribute: String,
    pub most_probable: Option<MostProbable>,
    /// Sorted ascending by p-value.
    pub breakdown: Vec<EnrichmentResult>,
}

impl AttributeBreakdown {
    /// Smallest p-value in the breakdown; attributes are ranked by this
    /// in the rendered report.
    pub fn min_p(&self) -> f64 {
        self.breakdown
            .iter()
            .map(|r| r.p_value)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn is_significant(&self) -> bool {
        self.breakdown.iter().any(EnrichmentResult::is_significant)
    }
}

/// Compute the metadata breakdown for every fixed attribute.
pub fn metadata_breakdown(
    hood: &Neighborhood<'_>,
    population: &Population,
) -> Vec<AttributeBreakdown> {
    METADATA_ATTRIBUTES
        .iter()
        .map(|attr| attribute_breakdown(attr, hood, population))
        .collect()
}

fn attribute_breakdown(
    attr: &str,
    hood: &Neighborhood<'_>,
    population: &Population,
) -> AttributeBreakdown {
    let counts = categorical_counts(attr, hood, population);
    if counts.neighbor_total == 0 || counts.background_total == 0 {
        return AttributeBreakdown {
            attribute: attr.to_string(),
            most_probable: None,
            breakdown: Vec::new(),
        };
    }

    let most_probable = counts
        .neighbor
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(value, count)| MostProbable {
            value: value.clone(),
            probability: *count as f64 / counts.neighbor_total as f64,
        });

    let mut breakdown: Vec<EnrichmentResult> = counts
        .neighbor
        .iter()
        .filter_map(|(value, &count)| {
            let background_count = counts.background.get(value).copied().unwrap_or(0);
            let p_background = background_count as f64 / counts.background_total as f64;
            let p_value = binomial_tail_p(counts.neighbor_total, count, p_background)?;
            Some(EnrichmentResult {
                label: value.clone(),
                neighbor_count: count,
                background_count,
                neighbor_total: counts.neighbor_total,
                background_total: counts.background_total,
                p_value,
                adjusted_p_value: None,
                log_enrichment_ratio: log_enrichment_ratio(
                    count as f64 / counts.neighbor_total as f64,
                    p_background,
                ),
            })
        })
        .collect();
    breakdown.sort_by(|a, b| {
        a.p_value
            .total_cmp(&b.p_value)
            .then_with(|| a.label.cmp(&b.label))
    });

    AttributeBreakdown {
        attribute: attr.to_string(),
        most_probable,
        breakdown,
    }
}
