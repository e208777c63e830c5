//! Aberration enrichment: the gene pipeline keyed on chromosomal
//! aberration flags instead of gene ids.

use crate::engine::{GatePolicy, Neighborhood, aberration_counts};
use crate::input::{AberrationRecord, Population};
use crate::report::EnrichmentResult;
use crate::report::genes::{EnrichmentTest, enrich_counts};

pub fn aberration_enrichment(
    aberrations: &[AberrationRecord],
    hood: &Neighborhood<'_>,
    population: &Population,
    gates: &GatePolicy,
    test: EnrichmentTest,
) -> Vec<EnrichmentResult> {
    let counts = aberration_counts(aberrations, hood, population);
    enrich_counts(
        counts.neighbor.iter().map(|(name, c)| (name.as_str(), *c)),
        &counts.background,
        counts.neighbor_total,
        counts.background_total,
        gates,
        test,
    )
}
