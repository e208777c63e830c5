//! Drug-response comparison: neighbor AUCs vs the rest of the population,
//! per inhibitor.
//!
//! Lower AUC means more sensitive, so the ranking is ascending by the
//! neighborhood mean. Inhibitors with fewer neighbor observations than
//! the `min_drug_samples` gate are dropped entirely.

use serde::Serialize;

use crate::engine::{GatePolicy, Neighborhood, drug_auc_groups};
use crate::input::DrugResponseRecord;
use crate::report::SIGNIFICANCE_ALPHA;
use crate::stats::{ContinuousSummary, welch_t_p};

#[derive(Debug, Clone, Serialize)]
pub struct DrugComparison {
    pub inhibitor: String,
    pub neighbor_n: usize,
    pub rest_n: usize,
    pub neighbor: ContinuousSummary,
    /// Absent when no other sample was measured for this inhibitor.
    pub rest: Option<ContinuousSummary>,
    /// Welch t-test p-value, neighbors vs rest; absent when untestable.
    pub p_value: Option<f64>,
    pub significant: bool,
}

impl DrugComparison {
    /// Mean AUC difference, neighbors minus rest. Negative means the
    /// neighborhood is more sensitive than the rest of the population.
    pub fn mean_difference(&self) -> Option<f64> {
        self.rest.as_ref().map(|rest| self.neighbor.mean - rest.mean)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DrugResponseReport {
    /// Sorted ascending by neighborhood mean AUC (most sensitive first).
    pub comparisons: Vec<DrugComparison>,
}

impl DrugResponseReport {
    pub fn is_empty(&self) -> bool {
        self.comparisons.is_empty()
    }

    /// The statistically significant subset, ascending by p-value.
    pub fn significant(&self) -> Vec<&DrugComparison> {
        let mut out: Vec<&DrugComparison> =
            self.comparisons.iter().filter(|c| c.significant).collect();
        out.sort_by(|a, b| {
            a.p_value
                .unwrap_or(1.0)
                .total_cmp(&b.p_value.unwrap_or(1.0))
        });
        out
    }
}

pub fn drug_response_comparison(
    drug_responses: &[DrugResponseRecord],
    hood: &Neighborhood<'_>,
    gates: &GatePolicy,
) -> DrugResponseReport {
    let groups = drug_auc_groups(drug_responses, hood);

    let mut comparisons: Vec<DrugComparison> = groups
        .into_iter()
        .filter_map(|(inhibitor, group)| {
            if group.neighbor.len() < gates.min_drug_samples {
                return None;
            }
            let neighbor = ContinuousSummary::from_values(&group.neighbor)?;
            let rest = ContinuousSummary::from_values(&group.rest);
            let p_value = welch_t_p(&group.neighbor, &group.rest);
            Some(DrugComparison {
                inhibitor,
                neighbor_n: group.neighbor.len(),
                rest_n: group.rest.len(),
                neighbor,
                rest,
                significant: p_value.is_some_and(|p| p < SIGNIFICANCE_ALPHA),
                p_value,
            })
        })
        .collect();

    comparisons.sort_by(|a, b| {
        a.neighbor
            .mean
            .total_cmp(&b.neighbor.mean)
            .then_with(|| a.inhibitor.cmp(&b.inhibitor))
    });

    DrugResponseReport { comparisons }
}
