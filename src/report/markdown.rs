//! Markdown rendering of a sample report.
//!
//! The Markdown document serves two consumers: the downloadable report
//! and the prompt body handed to the narrative summarizer.

use crate::report::assemble::SampleReport;
use crate::report::drugs::DrugComparison;
use crate::report::format_p;
use crate::report::narrative::NARRATIVE_FALLBACK;

const TOP_DRUGS: usize = 5;
const TOP_GENES: usize = 5;

pub fn render_report_markdown(report: &SampleReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "## Neighborhood Enrichment Report for Sample {}\n\n",
        report.sample_id
    ));

    out.push_str("### 1. Sample Information Summary\n");
    out.push_str(&format!("- Sample ID: {}\n", report.sample_id));
    out.push_str(&format!(
        "- Neighborhood: {} nearest neighbors (K={})\n",
        report.neighbor_ids.len(),
        report.k
    ));
    out.push_str("- Data sources: Gene expression, Mutations, Aberrations, Drug response\n\n");

    out.push_str("### 2. Metadata Analysis\n");
    out.push_str(&metadata_section(report));
    out.push('\n');

    out.push_str("### 3. Mutation Analysis\n");
    out.push_str(&mutation_section(report));
    out.push('\n');

    out.push_str("### 4. Aberration Analysis\n");
    out.push_str(&aberration_section(report));
    out.push('\n');

    out.push_str("### 5. Drug Response Analysis (ex-vivo)\n");
    out.push_str(&drug_section(report));
    out.push('\n');

    out.push_str("### 6. Integrated Analysis (AI-generated)\n");
    out.push_str(report.narrative.as_deref().unwrap_or(NARRATIVE_FALLBACK));
    out.push_str("\n\n");

    out.push_str(
        "Please note that this report is for research purposes only and should not be used \
         as a substitute for professional medical advice or diagnosis.\n",
    );
    out
}

/// Prompt body for the integrated-analysis summarizer: the numeric
/// sections plus framing instructions.
pub fn narrative_prompt(report: &SampleReport) -> String {
    format!(
        "You are an expert in AML research specializing in hematology. Generate an integrated \
         analysis based on the following information about the patient:\n{}\n{}\n{}\n{}\n\
         Add relevant references to the data used to support the analysis. Make sure to use \
         markdown formatting for the response.",
        metadata_section(report),
        mutation_section(report),
        aberration_section(report),
        drug_section(report),
    )
}

fn metadata_section(report: &SampleReport) -> String {
    let mut ranked: Vec<_> = report.metadata.iter().collect();
    ranked.sort_by(|a, b| a.min_p().total_cmp(&b.min_p()));

    let mut lines = Vec::new();
    for attr in ranked {
        match (&attr.most_probable, attr.breakdown.first()) {
            (Some(mp), Some(best)) => lines.push(format!(
                "- {}: {} (p-value: {}){}",
                attr.attribute,
                mp.value,
                format_p(best.p_value),
                if best.is_significant() {
                    " (significant)"
                } else {
                    ""
                }
            )),
            _ => lines.push(format!("- {}: no data available", attr.attribute)),
        }
    }
    join_or_placeholder(lines, "No metadata available for this neighborhood.")
}

fn mutation_section(report: &SampleReport) -> String {
    let lines: Vec<String> = report
        .genes
        .iter()
        .take(TOP_GENES)
        .map(|gene| {
            format!(
                "- {}: Found in {} neighbors vs {} in the database (p-value: {}, adjusted: {})",
                gene.result.label,
                gene.result.neighbor_frequency(),
                gene.result.database_frequency(),
                format_p(gene.result.p_value),
                gene.result
                    .adjusted_p_value
                    .map(format_p)
                    .unwrap_or_else(|| "N/A".to_string()),
            )
        })
        .collect();
    join_or_placeholder(lines, "No significantly enriched genes.")
}

fn aberration_section(report: &SampleReport) -> String {
    let lines: Vec<String> = report
        .aberrations
        .iter()
        .map(|r| {
            format!(
                "- {}: {} neighbors vs {} in the database (p-value: {})",
                r.label,
                r.neighbor_frequency(),
                r.database_frequency(),
                format_p(r.p_value),
            )
        })
        .collect();
    join_or_placeholder(lines, "No significantly enriched aberrations.")
}

fn drug_section(report: &SampleReport) -> String {
    if report.drugs.is_empty() {
        return "No valid drug response data available for this sample.\n".to_string();
    }

    let mut out = String::new();
    let significant = report.drugs.significant();
    if !significant.is_empty() {
        out.push_str("#### Statistically Significant Drug Responses:\n");
        for drug in significant.iter().take(TOP_DRUGS) {
            out.push_str(&drug_line(drug));
        }
        out.push_str("\nNote: Lower AUC indicates higher sensitivity. P-value threshold: 0.05.\n\n");
    }

    out.push_str(&format!("#### Top {} Most Sensitive Drug Responses:\n", TOP_DRUGS));
    for drug in report.drugs.comparisons.iter().take(TOP_DRUGS) {
        out.push_str(&drug_line(drug));
    }
    out.push_str(
        "\nNote: These drugs show the lowest AUC values among this sample's neighbors, \
         indicating higher sensitivity.\n",
    );
    out
}

fn drug_line(drug: &DrugComparison) -> String {
    let comparison = match drug.mean_difference() {
        Some(diff) => {
            let direction = if diff < 0.0 { "more" } else { "less" };
            format!(
                "{:.2} {} sensitive than average, p={}",
                diff.abs(),
                direction,
                drug.p_value
                    .map(format_p)
                    .unwrap_or_else(|| "N/A".to_string()),
            )
        }
        None => "no comparison group".to_string(),
    };
    format!(
        "- {}: {:.2} AUC ({} neighbor samples; {})\n",
        drug.inhibitor, drug.neighbor.mean, drug.neighbor_n, comparison
    )
}

fn join_or_placeholder(lines: Vec<String>, placeholder: &str) -> String {
    if lines.is_empty() {
        format!("{placeholder}\n")
    } else {
        let mut joined = lines.join("\n");
        joined.push('\n');
        joined
    }
}
