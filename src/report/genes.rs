//! Gene enrichment: which mutated genes recur among the neighbors more
//! often than the background rate predicts.
//!
//! Two test strategies exist deliberately. The panels this engine
//! consolidates had drifted between an exact hypergeometric test and a
//! binomial approximation with slightly different gates; rather than
//! silently picking one, both are kept as named strategies and the caller
//! chooses.

use serde::Serialize;

use crate::engine::{GatePolicy, Neighborhood, gene_sample_counts};
use crate::input::{MutationRecord, Population};
use crate::report::{EnrichmentResult, SIGNIFICANCE_ALPHA};
use crate::stats::{
    benjamini_hochberg, binomial_tail_p, hypergeometric_tail_p, log_enrichment_ratio,
};

/// Which tail test scores a candidate gene (or aberration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentTest {
    /// Exact, without replacement; the default.
    Hypergeometric,
    /// Fixed background rate K/N.
    Binomial,
}

impl EnrichmentTest {
    /// Upper-tail probability of seeing >= `k` hits in `n` draws given
    /// `big_k` successes among `big_n`. `None` means untestable.
    pub fn tail_p(&self, k: usize, n: usize, big_k: usize, big_n: usize) -> Option<f64> {
        match self {
            EnrichmentTest::Hypergeometric => hypergeometric_tail_p(k, n, big_k, big_n),
            EnrichmentTest::Binomial => {
                if big_n == 0 {
                    return None;
                }
                binomial_tail_p(n, k, big_k as f64 / big_n as f64)
            }
        }
    }
}

/// One enriched gene with its supporting neighbor mutation records.
#[derive(Debug, Clone, Serialize)]
pub struct GeneEnrichment {
    #[serde(flatten)]
    pub result: EnrichmentResult,
    /// Neighbor mutation rows in this gene, variant detail included.
    pub mutations: Vec<MutationRecord>,
}

/// Compute the gene-enrichment list: gates, tail test, p < 0.05 filter,
/// BH correction over the filtered set, ascending sort.
pub fn gene_enrichment(
    mutations: &[MutationRecord],
    hood: &Neighborhood<'_>,
    population: &Population,
    gates: &GatePolicy,
    test: EnrichmentTest,
) -> Vec<GeneEnrichment> {
    let counts = gene_sample_counts(mutations, hood, population);
    let results = enrich_counts(
        counts.neighbor.iter().map(|(g, c)| (g.as_str(), *c)),
        &counts.background,
        counts.neighbor_total,
        counts.background_total,
        gates,
        test,
    );

    let neighbor_ids = hood.sample_ids();
    results
        .into_iter()
        .map(|result| {
            let supporting = mutations
                .iter()
                .filter(|m| {
                    m.gene_id == result.label && neighbor_ids.contains(m.sample_id.as_str())
                })
                .cloned()
                .collect();
            GeneEnrichment {
                result,
                mutations: supporting,
            }
        })
        .collect()
}

/// Shared gate/test/filter/correct/sort pipeline for gene and aberration
/// candidates.
pub(crate) fn enrich_counts<'a>(
    neighbor_counts: impl Iterator<Item = (&'a str, usize)>,
    background: &std::collections::BTreeMap<String, usize>,
    neighbor_total: usize,
    background_total: usize,
    gates: &GatePolicy,
    test: EnrichmentTest,
) -> Vec<EnrichmentResult> {
    let mut results: Vec<EnrichmentResult> = neighbor_counts
        .filter_map(|(label, neighbor_count)| {
            let background_count = background.get(label).copied().unwrap_or(0);
            if background_count < gates.min_database_count
                || neighbor_count < gates.min_neighbor_count
            {
                return None;
            }
            let p_value =
                test.tail_p(neighbor_count, neighbor_total, background_count, background_total)?;
            if p_value >= SIGNIFICANCE_ALPHA {
                return None;
            }
            Some(EnrichmentResult {
                label: label.to_string(),
                neighbor_count,
                background_count,
                neighbor_total,
                background_total,
                p_value,
                adjusted_p_value: None,
                log_enrichment_ratio: log_enrichment_ratio(
                    neighbor_count as f64 / neighbor_total as f64,
                    background_count as f64 / background_total as f64,
                ),
            })
        })
        .collect();

    // Correct over exactly the filtered set being reported.
    let raw: Vec<f64> = results.iter().map(|r| r.p_value).collect();
    for (result, adjusted) in results.iter_mut().zip(benjamini_hochberg(&raw)) {
        result.adjusted_p_value = Some(adjusted);
    }

    results.sort_by(|a, b| {
        let a_adj = a.adjusted_p_value.unwrap_or(a.p_value);
        let b_adj = b.adjusted_p_value.unwrap_or(b.p_value);
        a_adj
            .total_cmp(&b_adj)
            .then_with(|| a.p_value.total_cmp(&b.p_value))
            .then_with(|| a.label.cmp(&b.label))
    });
    results
}
