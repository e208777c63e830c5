//! Resolving a query sample's K-neighborhood against the population.

use std::collections::HashSet;

use tracing::warn;

use crate::input::{NeighborTable, Population, Sample};

/// The first K neighbors of one query sample, resolved to population rows.
///
/// Holds borrowed sample rows; the population snapshot must outlive the
/// report computation, which it does by construction (nothing mutates the
/// bundle while a report is in flight).
#[derive(Debug)]
pub struct Neighborhood<'a> {
    pub query_id: &'a str,
    pub k: usize,
    pub samples: Vec<&'a Sample>,
}

impl<'a> Neighborhood<'a> {
    /// Resolve the neighborhood of `query_id` at `k`.
    ///
    /// Returns `None` when the query sample has no neighbor entry or an
    /// empty neighbor list — the explicit "no report" condition; callers
    /// render a placeholder instead of failing.
    pub fn resolve(
        query_id: &'a str,
        k: usize,
        neighbors: &NeighborTable,
        population: &'a Population,
    ) -> Option<Self> {
        let list = neighbors.get(query_id)?;
        if list.indices.is_empty() || k == 0 {
            return None;
        }
        debug_assert_eq!(list.indices.len(), list.distances.len());

        let mut samples = Vec::with_capacity(k.min(list.indices.len()));
        for &index in list.indices.iter().take(k) {
            match population.get(index) {
                Some(sample) => samples.push(sample),
                // Indices were bounds-checked at load time; a miss here
                // means the tables are from different snapshots.
                None => warn!(
                    query = query_id,
                    index, "neighbor index has no population row; skipping"
                ),
            }
        }
        if samples.is_empty() {
            return None;
        }

        Some(Self {
            query_id,
            k,
            samples,
        })
    }

    /// Number of neighbors actually resolved (<= k).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample ids of the resolved neighbors, for joining against the
    /// mutation/aberration/drug tables.
    pub fn sample_ids(&self) -> HashSet<&'a str> {
        self.samples.iter().map(|s| s.sample_id.as_str()).collect()
    }
}
