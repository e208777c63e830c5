mod engine;
mod input;
mod report;
mod stats;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::engine::GatePolicy;
use crate::input::{BundlePaths, DataBundle, load_bundle};
use crate::report::markdown::render_report_markdown;
use crate::report::text::render_report_text;
use crate::report::{
    EnrichmentTest, ReportInputs, SampleReport, SummarizerUnavailable, assemble_report,
};

#[derive(Debug, Parser)]
#[command(name = "knn-enrich", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute enrichment reports for uploaded samples.
    Run(RunArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TestStrategy {
    Hypergeometric,
    Binomial,
}

impl From<TestStrategy> for EnrichmentTest {
    fn from(value: TestStrategy) -> Self {
        match value {
            TestStrategy::Hypergeometric => EnrichmentTest::Hypergeometric,
            TestStrategy::Binomial => EnrichmentTest::Binomial,
        }
    }
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Population table (JSON array of sample rows).
    #[arg(long)]
    population: PathBuf,
    /// Neighbor table (JSON array of {sample_id, knn_indices, knn_distances}).
    #[arg(long)]
    knn: PathBuf,
    /// Mutation call table.
    #[arg(long)]
    mutations: Option<PathBuf>,
    /// Aberration flag table.
    #[arg(long)]
    aberrations: Option<PathBuf>,
    /// Drug response table (row- or column-oriented).
    #[arg(long)]
    drugs: Option<PathBuf>,
    /// Output directory for per-sample reports.
    #[arg(long)]
    out: PathBuf,
    /// Neighborhood size.
    #[arg(long, default_value_t = 20)]
    k: usize,
    /// Report only this sample instead of every uploaded sample.
    #[arg(long)]
    sample: Option<String>,
    /// Tail test for gene/aberration enrichment.
    #[arg(long, value_enum, default_value = "hypergeometric")]
    test: TestStrategy,
    /// Narrative model name passed to the summarizer backend.
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,
    #[arg(long, default_value_t = 5)]
    min_db_count: usize,
    #[arg(long, default_value_t = 2)]
    min_neighbor_count: usize,
    #[arg(long, default_value_t = 5)]
    min_drug_samples: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(&args),
    };
    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &RunArgs) -> Result<(), String> {
    let bundle = load_bundle(&BundlePaths {
        population: &args.population,
        knn: &args.knn,
        mutations: args.mutations.as_deref(),
        aberrations: args.aberrations.as_deref(),
        drugs: args.drugs.as_deref(),
    })
    .map_err(|e| e.to_string())?;

    let inputs = ReportInputs {
        k: args.k,
        gates: GatePolicy {
            min_database_count: args.min_db_count,
            min_neighbor_count: args.min_neighbor_count,
            min_drug_samples: args.min_drug_samples,
        },
        test: args.test.into(),
    };

    let sample_ids = select_samples(&bundle, args.sample.as_deref())?;
    if sample_ids.is_empty() {
        return Err("no uploaded samples in the population table".to_string());
    }

    fs::create_dir_all(&args.out).map_err(|e| e.to_string())?;

    let mut written = 0usize;
    for sample_id in &sample_ids {
        match assemble_report(&bundle, sample_id, &inputs) {
            Some(mut report) => {
                report.attach_narrative(&SummarizerUnavailable, &args.model);
                write_reports(&report, &args.out).map_err(|e| e.to_string())?;
                written += 1;
            }
            None => warn!(
                sample = %sample_id,
                "no neighborhood available; skipping report"
            ),
        }
    }

    info!(written, total = sample_ids.len(), "report generation finished");
    Ok(())
}

fn select_samples(bundle: &DataBundle, requested: Option<&str>) -> Result<Vec<String>, String> {
    match requested {
        Some(id) => {
            if bundle.population.find(id).is_none() {
                return Err(format!("sample {} not found in population table", id));
            }
            Ok(vec![id.to_string()])
        }
        None => Ok(bundle
            .population
            .uploaded()
            .map(|s| s.sample_id.clone())
            .collect()),
    }
}

fn write_reports(report: &SampleReport, out_dir: &Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(out_dir.join(format!("{}.report.json", report.sample_id)), json)?;
    fs::write(
        out_dir.join(format!("{}.report.txt", report.sample_id)),
        render_report_text(report),
    )?;
    fs::write(
        out_dir.join(format!("{}.report.md", report.sample_id)),
        render_report_markdown(report),
    )?;
    Ok(())
}
