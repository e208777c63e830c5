//! Mutation call table: one row per (sample, variant).
//!
//! A sample may carry several mutations in the same gene; the frequency
//! engine collapses those to distinct samples, so this loader keeps every
//! row as-is, variant detail included.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::input::{InputError, open_maybe_gz};

fn default_na() -> String {
    "NA".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MutationRecord {
    pub sample_id: String,
    pub gene_id: String,
    #[serde(default = "default_na")]
    pub variant: String,
    #[serde(default = "default_na")]
    pub aa_position: String,
    #[serde(default, rename = "VAF")]
    pub vaf: Option<f64>,
    #[serde(default = "default_na", rename = "ref")]
    pub ref_allele: String,
    #[serde(default = "default_na", rename = "alt")]
    pub alt_allele: String,
    #[serde(default = "default_na")]
    pub study: String,
}

pub fn load_mutations(path: &Path) -> Result<Vec<MutationRecord>, InputError> {
    let reader = open_maybe_gz(path)?;
    let rows: Vec<MutationRecord> = serde_json::from_reader(reader)?;
    Ok(rows)
}
