//! Population table: one row per sample with its metadata attributes.
//!
//! The payload is a JSON array of objects carrying `sample_id`,
//! `data_source`, the embedding coordinates and an open-ended set of
//! metadata attributes. Attribute values arrive as strings or numbers;
//! both are normalized to strings here. JSON null and the literal string
//! `"NA"` mean "missing" and are dropped at this boundary, so the engine
//! never has to re-check for sentinels.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::input::{InputError, read_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Uploaded,
    Reference,
}

#[derive(Debug, Clone)]
pub struct Sample {
    pub sample_id: String,
    pub data_source: DataSource,
    /// Metadata attribute name -> value. Missing values are absent.
    pub metadata: BTreeMap<String, String>,
}

impl Sample {
    /// Metadata value for `attr`, if present and non-missing.
    pub fn metadata_value(&self, attr: &str) -> Option<&str> {
        self.metadata.get(attr).map(String::as_str)
    }
}

/// Ordered collection of samples. Neighbor positions index into this
/// ordering; the order of the input table is preserved.
#[derive(Debug, Clone)]
pub struct Population {
    samples: Vec<Sample>,
}

impl Population {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn uploaded(&self) -> impl Iterator<Item = &Sample> {
        self.samples
            .iter()
            .filter(|s| s.data_source == DataSource::Uploaded)
    }

    pub fn find(&self, sample_id: &str) -> Option<&Sample> {
        self.samples.iter().find(|s| s.sample_id == sample_id)
    }
}

/// Keys that are part of the row structure rather than metadata.
const STRUCTURAL_KEYS: &[&str] = &["sample_id", "data_source", "X1", "X2"];

pub fn load_population(path: &Path) -> Result<Population, InputError> {
    let value = read_json(path)?;
    let rows = value
        .as_array()
        .ok_or_else(|| InputError::InvalidInput("population table is not a JSON array".into()))?;

    let mut samples = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        samples.push(parse_sample(i, row)?);
    }
    Ok(Population::new(samples))
}

fn parse_sample(i: usize, row: &Value) -> Result<Sample, InputError> {
    let obj = row
        .as_object()
        .ok_or_else(|| InputError::InvalidInput(format!("population row {} is not an object", i)))?;
    let sample_id = obj
        .get("sample_id")
        .and_then(Value::as_str)
        .ok_or_else(|| InputError::InvalidInput(format!("population row {} has no sample_id", i)))?
        .to_string();
    let data_source = match obj.get("data_source").and_then(Value::as_str) {
        Some("uploaded") => DataSource::Uploaded,
        _ => DataSource::Reference,
    };

    let mut metadata = BTreeMap::new();
    for (key, raw) in obj {
        if STRUCTURAL_KEYS.contains(&key.as_str()) {
            continue;
        }
        if let Some(value) = normalize_value(raw) {
            metadata.insert(key.clone(), value);
        }
    }

    Ok(Sample {
        sample_id,
        data_source,
        metadata,
    })
}

/// Normalize a raw JSON attribute value to a string, or `None` when it is
/// missing (`null` or the literal `"NA"`).
fn normalize_value(raw: &Value) -> Option<String> {
    match raw {
        Value::Null => None,
        Value::String(s) if s == "NA" => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
