//! Chromosomal aberration table: one row per sample, one 0/1 flag per
//! aberration name.
//!
//! Rows arrive as flat JSON objects (`{"sample_id": "...", "inv(16)": 1,
//! "t(8;21)": 0, ...}`). Flag values are tolerated as numbers or booleans;
//! anything nonzero counts as present.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::warn;

use crate::input::{InputError, read_json};

#[derive(Debug, Clone)]
pub struct AberrationRecord {
    pub sample_id: String,
    /// Aberration name -> presence.
    pub flags: BTreeMap<String, bool>,
}

pub fn load_aberrations(path: &Path) -> Result<Vec<AberrationRecord>, InputError> {
    let value = read_json(path)?;
    let Some(rows) = value.as_array() else {
        warn!(
            path = %path.display(),
            "aberration table is not a JSON array; treating as zero usable rows"
        );
        return Ok(Vec::new());
    };

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        match parse_row(row) {
            Some(record) => records.push(record),
            None => warn!("aberration row {} is malformed; skipping", i),
        }
    }
    Ok(records)
}

fn parse_row(row: &Value) -> Option<AberrationRecord> {
    let obj = row.as_object()?;
    let sample_id = obj.get("sample_id")?.as_str()?.to_string();

    let mut flags = BTreeMap::new();
    for (key, raw) in obj {
        if key == "sample_id" {
            continue;
        }
        if let Some(present) = parse_flag(raw) {
            flags.insert(key.clone(), present);
        }
    }
    Some(AberrationRecord { sample_id, flags })
}

fn parse_flag(raw: &Value) -> Option<bool> {
    match raw {
        Value::Number(n) => Some(n.as_f64().is_some_and(|v| v != 0.0)),
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}
