//! One-pass assembly of the four report sections for a query sample.

use serde::Serialize;
use tracing::warn;

use crate::engine::{GatePolicy, Neighborhood};
use crate::input::DataBundle;
use crate::report::EnrichmentResult;
use crate::report::aberrations::aberration_enrichment;
use crate::report::drugs::{DrugResponseReport, drug_response_comparison};
use crate::report::genes::{EnrichmentTest, GeneEnrichment, gene_enrichment};
use crate::report::markdown::narrative_prompt;
use crate::report::metadata::{AttributeBreakdown, metadata_breakdown};
use crate::report::narrative::{NARRATIVE_FALLBACK, Summarize};

/// Parameters of one report computation.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs {
    pub k: usize,
    pub gates: GatePolicy,
    pub test: EnrichmentTest,
}

/// The complete per-sample report consumed by the renderers.
#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    pub sample_id: String,
    pub k: usize,
    /// Neighbors actually resolved, nearest first.
    pub neighbor_ids: Vec<String>,
    pub test: EnrichmentTest,
    pub metadata: Vec<AttributeBreakdown>,
    pub genes: Vec<GeneEnrichment>,
    pub aberrations: Vec<EnrichmentResult>,
    pub drugs: DrugResponseReport,
    /// AI-generated integrated analysis; absent until attached.
    pub narrative: Option<String>,
}

impl SampleReport {
    /// Generate the integrated-analysis narrative via the injected
    /// summarizer. A summarizer failure substitutes a fixed explanatory
    /// string; the numeric sections are never touched.
    pub fn attach_narrative(&mut self, summarizer: &dyn Summarize, model: &str) {
        let prompt = narrative_prompt(self);
        self.narrative = Some(match summarizer.summarize(&prompt, model) {
            Ok(text) => text,
            Err(err) => {
                warn!(sample = %self.sample_id, %err, "narrative generation failed");
                NARRATIVE_FALLBACK.to_string()
            }
        });
    }
}

/// Assemble the report for `sample_id`, or `None` when the sample has no
/// usable neighborhood (the explicit no-report outcome).
pub fn assemble_report(
    bundle: &DataBundle,
    sample_id: &str,
    inputs: &ReportInputs,
) -> Option<SampleReport> {
    let hood = Neighborhood::resolve(sample_id, inputs.k, &bundle.neighbors, &bundle.population)?;

    let metadata = metadata_breakdown(&hood, &bundle.population);
    let genes = gene_enrichment(
        &bundle.mutations,
        &hood,
        &bundle.population,
        &inputs.gates,
        inputs.test,
    );
    let aberrations = aberration_enrichment(
        &bundle.aberrations,
        &hood,
        &bundle.population,
        &inputs.gates,
        inputs.test,
    );
    let drugs = drug_response_comparison(&bundle.drug_responses, &hood, &inputs.gates);

    Some(SampleReport {
        sample_id: sample_id.to_string(),
        k: inputs.k,
        neighbor_ids: hood
            .samples
            .iter()
            .map(|s| s.sample_id.clone())
            .collect(),
        test: inputs.test,
        metadata,
        genes,
        aberrations,
        drugs,
        narrative: None,
    })
}
