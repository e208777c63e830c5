use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::{info, warn};

pub mod aberrations;
pub mod drugs;
pub mod knn;
pub mod mutations;
pub mod population;

pub use aberrations::AberrationRecord;
pub use drugs::DrugResponseRecord;
pub use knn::NeighborTable;
pub use mutations::MutationRecord;
pub use population::{DataSource, Population, Sample};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for InputError {
    fn from(value: serde_json::Error) -> Self {
        InputError::Parse(value.to_string())
    }
}

/// All tables one report computation reads. Loaded once, then treated as a
/// frozen snapshot; nothing in the engine mutates it.
#[derive(Debug, Clone)]
pub struct DataBundle {
    pub population: Population,
    pub neighbors: NeighborTable,
    pub mutations: Vec<MutationRecord>,
    pub aberrations: Vec<AberrationRecord>,
    pub drug_responses: Vec<DrugResponseRecord>,
}

/// Paths to the input tables. Mutation, aberration and drug tables are
/// optional; a missing table yields an empty report section.
#[derive(Debug, Clone)]
pub struct BundlePaths<'a> {
    pub population: &'a Path,
    pub knn: &'a Path,
    pub mutations: Option<&'a Path>,
    pub aberrations: Option<&'a Path>,
    pub drugs: Option<&'a Path>,
}

pub fn load_bundle(paths: &BundlePaths<'_>) -> Result<DataBundle, InputError> {
    let population = population::load_population(paths.population)?;
    if population.is_empty() {
        warn!("population table is empty; every report will be skipped");
    }
    info!(
        n_samples = population.len(),
        n_uploaded = population.uploaded().count(),
        "loaded population table"
    );

    let neighbors = knn::load_neighbor_table(paths.knn, population.len())?;
    info!(n_entries = neighbors.len(), "loaded neighbor table");

    let mutations = match paths.mutations {
        Some(path) => mutations::load_mutations(path)?,
        None => Vec::new(),
    };
    let aberrations = match paths.aberrations {
        Some(path) => aberrations::load_aberrations(path)?,
        None => Vec::new(),
    };
    let drug_responses = match paths.drugs {
        Some(path) => drugs::load_drug_responses(path)?,
        None => Vec::new(),
    };

    Ok(DataBundle {
        population,
        neighbors,
        mutations,
        aberrations,
        drug_responses,
    })
}

/// Open a table file, transparently decompressing `.gz` inputs.
pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            InputError::MissingInput(format!("{} not found", path.display()))
        }
        _ => InputError::Io(e),
    })?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read a table file into a JSON value.
pub fn read_json(path: &Path) -> Result<serde_json::Value, InputError> {
    let reader = open_maybe_gz(path)?;
    Ok(serde_json::from_reader(reader)?)
}
