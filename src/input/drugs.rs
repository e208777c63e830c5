//! Ex-vivo drug response table: (sample, inhibitor, AUC) triples.
//!
//! The upstream service has shipped this payload in two shapes: a plain
//! row array and a column-oriented object (`{"sample_id": {"0": "...},
//! "inhibitor": {...}, "auc": {...}}`). Both are accepted. A payload in
//! neither shape is logged and treated as zero usable rows; a malformed
//! drug table must never take the numeric report sections down with it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::input::{InputError, read_json};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DrugResponseRecord {
    pub sample_id: String,
    pub inhibitor: String,
    pub auc: f64,
}

pub fn load_drug_responses(path: &Path) -> Result<Vec<DrugResponseRecord>, InputError> {
    let value = read_json(path)?;
    Ok(parse_drug_responses(&value))
}

/// Parse either payload shape; unusable payloads yield an empty list.
pub fn parse_drug_responses(value: &Value) -> Vec<DrugResponseRecord> {
    let records = match value {
        Value::Array(rows) => parse_rows(rows),
        Value::Object(columns) => parse_columns(columns),
        _ => {
            warn!("drug response payload is neither rows nor columns; treating as empty");
            Vec::new()
        }
    };
    records
        .into_iter()
        .filter(|r| r.auc.is_finite() && !r.inhibitor.is_empty())
        .collect()
}

fn parse_rows(rows: &[Value]) -> Vec<DrugResponseRecord> {
    let mut out = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        match serde_json::from_value::<DrugResponseRecord>(row.clone()) {
            Ok(record) => out.push(record),
            Err(_) => warn!("drug response row {} is malformed; skipping", i),
        }
    }
    out
}

fn parse_columns(columns: &serde_json::Map<String, Value>) -> Vec<DrugResponseRecord> {
    let (Some(sample_ids), Some(inhibitors), Some(aucs)) = (
        columns.get("sample_id").and_then(Value::as_object),
        columns.get("inhibitor").and_then(Value::as_object),
        columns.get("auc").and_then(Value::as_object),
    ) else {
        warn!("column-oriented drug response payload is missing columns; treating as empty");
        return Vec::new();
    };

    let mut out = Vec::with_capacity(sample_ids.len());
    for (key, sample_id) in sample_ids {
        let (Some(sample_id), Some(inhibitor), Some(auc)) = (
            sample_id.as_str(),
            inhibitors.get(key).and_then(Value::as_str),
            aucs.get(key).and_then(Value::as_f64),
        ) else {
            continue;
        };
        out.push(DrugResponseRecord {
            sample_id: sample_id.to_string(),
            inhibitor: inhibitor.to_string(),
            auc,
        });
    }
    out
}
