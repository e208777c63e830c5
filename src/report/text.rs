//! Flat text rendering of a sample report, used for file download.

use crate::report::assemble::SampleReport;
use crate::report::format_p;
use crate::report::narrative::NARRATIVE_FALLBACK;

pub fn render_report_text(report: &SampleReport) -> String {
    let mut out = String::new();

    out.push_str("KNN Neighborhood Enrichment Report\n");
    out.push_str("==================================\n\n");
    out.push_str(&format!("Sample: {}\n", report.sample_id));
    out.push_str(&format!(
        "Neighborhood: {} nearest neighbors (K={})\n\n",
        report.neighbor_ids.len(),
        report.k
    ));

    out.push_str("1. Metadata breakdown\n");
    let mut ranked: Vec<_> = report.metadata.iter().collect();
    ranked.sort_by(|a, b| a.min_p().total_cmp(&b.min_p()));
    for attr in ranked {
        match &attr.most_probable {
            Some(mp) => {
                out.push_str(&format!(
                    "{}: {} ({:.1}% of neighbors){}\n",
                    attr.attribute,
                    mp.value,
                    mp.probability * 100.0,
                    if attr.is_significant() {
                        " [significant]"
                    } else {
                        ""
                    }
                ));
                for r in &attr.breakdown {
                    out.push_str(&format!(
                        "  {} {} ({:.1}%) vs {} p={}\n",
                        r.label,
                        r.neighbor_frequency(),
                        r.percentage(),
                        r.database_frequency(),
                        format_p(r.p_value)
                    ));
                }
            }
            None => out.push_str(&format!("{}: no data available\n", attr.attribute)),
        }
    }
    out.push('\n');

    out.push_str("2. Enriched genes\n");
    if report.genes.is_empty() {
        out.push_str("None passed the support and significance filters.\n");
    } else {
        for gene in &report.genes {
            out.push_str(&format!(
                "{} {} vs {} p={} adj={} log-ratio={:.2}\n",
                gene.result.label,
                gene.result.neighbor_frequency(),
                gene.result.database_frequency(),
                format_p(gene.result.p_value),
                gene.result
                    .adjusted_p_value
                    .map(format_p)
                    .unwrap_or_else(|| "N/A".to_string()),
                gene.result.log_enrichment_ratio,
            ));
        }
    }
    out.push('\n');

    out.push_str("3. Enriched aberrations\n");
    if report.aberrations.is_empty() {
        out.push_str("None passed the support and significance filters.\n");
    } else {
        for r in &report.aberrations {
            out.push_str(&format!(
                "{} {} vs {} p={} adj={}\n",
                r.label,
                r.neighbor_frequency(),
                r.database_frequency(),
                format_p(r.p_value),
                r.adjusted_p_value
                    .map(format_p)
                    .unwrap_or_else(|| "N/A".to_string()),
            ));
        }
    }
    out.push('\n');

    out.push_str("4. Drug response (lower AUC = more sensitive)\n");
    if report.drugs.is_empty() {
        out.push_str("No inhibitor had enough neighbor measurements.\n");
    } else {
        for drug in &report.drugs.comparisons {
            out.push_str(&format!(
                "{}: mean={:.2} median={:.2} n={}{}{}\n",
                drug.inhibitor,
                drug.neighbor.mean,
                drug.neighbor.median,
                drug.neighbor_n,
                match drug.p_value {
                    Some(p) => format!(" p={}", format_p(p)),
                    None => String::new(),
                },
                if drug.significant {
                    " [significant]"
                } else {
                    ""
                },
            ));
        }
    }
    out.push('\n');

    out.push_str("5. Integrated analysis\n");
    out.push_str(report.narrative.as_deref().unwrap_or(NARRATIVE_FALLBACK));
    out.push('\n');

    out
}
