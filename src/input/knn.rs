//! Precomputed KNN table: per sample, the nearest reference positions and
//! their distances.
//!
//! The upstream service emits 1-based positions into the population table.
//! They are converted to 0-based exactly once, here; everything past this
//! boundary works with 0-based indices only.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::input::{InputError, open_maybe_gz};

#[derive(Debug, Clone, Deserialize)]
struct RawNeighborRow {
    sample_id: String,
    knn_indices: Vec<i64>,
    knn_distances: Vec<f64>,
}

/// One sample's neighborhood: 0-based positions into the population,
/// nearest first, with parallel distances.
#[derive(Debug, Clone)]
pub struct NeighborList {
    pub indices: Vec<usize>,
    pub distances: Vec<f64>,
}

/// Neighbor lists keyed by sample id.
#[derive(Debug, Clone, Default)]
pub struct NeighborTable {
    by_sample: HashMap<String, NeighborList>,
}

impl NeighborTable {
    pub fn len(&self) -> usize {
        self.by_sample.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sample.is_empty()
    }

    pub fn get(&self, sample_id: &str) -> Option<&NeighborList> {
        self.by_sample.get(sample_id)
    }

    pub fn insert(&mut self, sample_id: String, list: NeighborList) {
        self.by_sample.insert(sample_id, list);
    }
}

pub fn load_neighbor_table(path: &Path, population_len: usize) -> Result<NeighborTable, InputError> {
    let reader = open_maybe_gz(path)?;
    let rows: Vec<RawNeighborRow> = serde_json::from_reader(reader)?;
    build_neighbor_table(rows, population_len)
}

fn build_neighbor_table(
    rows: Vec<RawNeighborRow>,
    population_len: usize,
) -> Result<NeighborTable, InputError> {
    let mut table = NeighborTable::default();
    for row in rows {
        // Mismatched parallel arrays is programming misuse upstream, not a
        // data condition we can repair.
        if row.knn_indices.len() != row.knn_distances.len() {
            return Err(InputError::InvalidInput(format!(
                "sample {}: knn_indices length {} != knn_distances length {}",
                row.sample_id,
                row.knn_indices.len(),
                row.knn_distances.len()
            )));
        }

        let mut indices = Vec::with_capacity(row.knn_indices.len());
        for raw in &row.knn_indices {
            // 1-based in the payload; 0-based from here on.
            if *raw < 1 || *raw as usize > population_len {
                return Err(InputError::InvalidInput(format!(
                    "sample {}: neighbor index {} out of range 1..={}",
                    row.sample_id, raw, population_len
                )));
            }
            indices.push((*raw - 1) as usize);
        }

        table.insert(
            row.sample_id,
            NeighborList {
                indices,
                distances: row.knn_distances,
            },
        );
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sample_id: &str, indices: Vec<i64>, distances: Vec<f64>) -> RawNeighborRow {
        RawNeighborRow {
            sample_id: sample_id.to_string(),
            knn_indices: indices,
            knn_distances: distances,
        }
    }

    #[test]
    fn test_one_based_conversion() {
        let table =
            build_neighbor_table(vec![row("s1", vec![1, 5, 3], vec![0.1, 0.2, 0.3])], 5).unwrap();
        let list = table.get("s1").unwrap();
        assert_eq!(list.indices, vec![0, 4, 2]);
        assert_eq!(list.distances, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_index_zero_rejected() {
        let err = build_neighbor_table(vec![row("s1", vec![0], vec![0.1])], 5).unwrap_err();
        assert!(matches!(err, InputError::InvalidInput(_)));
    }

    #[test]
    fn test_index_past_population_rejected() {
        let err = build_neighbor_table(vec![row("s1", vec![6], vec![0.1])], 5).unwrap_err();
        assert!(matches!(err, InputError::InvalidInput(_)));
    }

    #[test]
    fn test_mismatched_parallel_arrays_rejected() {
        let err = build_neighbor_table(vec![row("s1", vec![1, 2], vec![0.1])], 5).unwrap_err();
        assert!(matches!(err, InputError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_sample_lookup() {
        let table = build_neighbor_table(vec![], 5).unwrap();
        assert!(table.get("absent").is_none());
        assert!(table.is_empty());
    }
}
