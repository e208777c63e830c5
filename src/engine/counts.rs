//! Neighbor-vs-background count tabulation.
//!
//! Every enrichment panel reduces to the same two maps: how often a value
//! occurs among the neighbors and how often it occurs in the whole
//! population. The functions here build those maps for each attribute
//! family; the significance tests never see raw tables.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::engine::Neighborhood;
use crate::input::{AberrationRecord, DrugResponseRecord, MutationRecord, Population};

/// Minimum-support gates, applied before any statistical testing. Values
/// failing a gate are dropped from the report entirely, not deprioritized.
#[derive(Debug, Clone, Copy)]
pub struct GatePolicy {
    /// Minimum distinct background samples carrying a gene/aberration.
    pub min_database_count: usize,
    /// Minimum distinct neighbor samples carrying a gene/aberration.
    pub min_neighbor_count: usize,
    /// Minimum neighbor AUC observations per inhibitor.
    pub min_drug_samples: usize,
}

impl GatePolicy {
    pub fn default_v1() -> Self {
        Self {
            min_database_count: 5,
            min_neighbor_count: 2,
            min_drug_samples: 5,
        }
    }
}

/// Neighbor and background occurrence counts for one attribute family.
///
/// Totals are the usable denominators: for categorical metadata they count
/// samples with a non-missing value, so missing entries neither inflate
/// the denominator nor appear as a category; for genes and aberrations
/// every sample is observable and the totals are the neighborhood size
/// and the population size.
#[derive(Debug, Clone, Default)]
pub struct ValueCounts {
    pub neighbor: BTreeMap<String, usize>,
    pub neighbor_total: usize,
    pub background: BTreeMap<String, usize>,
    pub background_total: usize,
}

/// Tabulate one categorical metadata attribute.
pub fn categorical_counts(
    attr: &str,
    hood: &Neighborhood<'_>,
    population: &Population,
) -> ValueCounts {
    let mut counts = ValueCounts::default();

    for sample in population.iter() {
        if let Some(value) = sample.metadata_value(attr) {
            *counts.background.entry(value.to_string()).or_insert(0) += 1;
            counts.background_total += 1;
        }
    }
    for sample in &hood.samples {
        if let Some(value) = sample.metadata_value(attr) {
            *counts.neighbor.entry(value.to_string()).or_insert(0) += 1;
            counts.neighbor_total += 1;
        }
    }
    counts
}

/// Tabulate mutated genes, counting distinct samples rather than mutation
/// rows on both sides.
///
/// A sample with three variants in the same gene contributes one to that
/// gene's count; the set-of-sample-ids accumulator is what keeps the
/// denominators honest.
pub fn gene_sample_counts(
    mutations: &[MutationRecord],
    hood: &Neighborhood<'_>,
    population: &Population,
) -> ValueCounts {
    let neighbor_ids = hood.sample_ids();

    let mut background_sets: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut neighbor_sets: HashMap<&str, HashSet<&str>> = HashMap::new();
    for record in mutations {
        let gene = record.gene_id.as_str();
        if gene.is_empty() || gene == "NA" {
            continue;
        }
        background_sets
            .entry(gene)
            .or_default()
            .insert(record.sample_id.as_str());
        if neighbor_ids.contains(record.sample_id.as_str()) {
            neighbor_sets
                .entry(gene)
                .or_default()
                .insert(record.sample_id.as_str());
        }
    }

    ValueCounts {
        neighbor: neighbor_sets
            .into_iter()
            .map(|(gene, set)| (gene.to_string(), set.len()))
            .collect(),
        neighbor_total: hood.len(),
        background: background_sets
            .into_iter()
            .map(|(gene, set)| (gene.to_string(), set.len()))
            .collect(),
        background_total: population.len(),
    }
}

/// Tabulate aberration flags across the union of flag names seen in the
/// table.
pub fn aberration_counts(
    aberrations: &[AberrationRecord],
    hood: &Neighborhood<'_>,
    population: &Population,
) -> ValueCounts {
    let neighbor_ids = hood.sample_ids();

    let mut counts = ValueCounts {
        neighbor_total: hood.len(),
        background_total: population.len(),
        ..Default::default()
    };
    for record in aberrations {
        let in_neighborhood = neighbor_ids.contains(record.sample_id.as_str());
        for (name, present) in &record.flags {
            if !present {
                continue;
            }
            *counts.background.entry(name.clone()).or_insert(0) += 1;
            if in_neighborhood {
                *counts.neighbor.entry(name.clone()).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// AUC observations for one inhibitor, split into neighborhood and
/// rest-of-population groups.
#[derive(Debug, Clone, Default)]
pub struct DrugAucGroups {
    pub neighbor: Vec<f64>,
    pub rest: Vec<f64>,
}

/// Group drug-response AUCs by inhibitor, splitting neighbors from the
/// rest of the population by sample id. The comparison group is the
/// complement, never the full set including the neighbors.
pub fn drug_auc_groups(
    drug_responses: &[DrugResponseRecord],
    hood: &Neighborhood<'_>,
) -> BTreeMap<String, DrugAucGroups> {
    let neighbor_ids = hood.sample_ids();

    let mut groups: BTreeMap<String, DrugAucGroups> = BTreeMap::new();
    for record in drug_responses {
        // Serialized JS nulls show up as the literal string "null".
        if record.inhibitor == "null" {
            continue;
        }
        let entry = groups.entry(record.inhibitor.clone()).or_default();
        if neighbor_ids.contains(record.sample_id.as_str()) {
            entry.neighbor.push(record.auc);
        } else {
            entry.rest.push(record.auc);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::NeighborTable;
    use crate::input::knn::NeighborList;
    use crate::input::population::{DataSource, Sample};

    fn sample(id: &str, attrs: &[(&str, &str)]) -> Sample {
        Sample {
            sample_id: id.to_string(),
            data_source: DataSource::Reference,
            metadata: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn mutation(sample_id: &str, gene: &str) -> MutationRecord {
        MutationRecord {
            sample_id: sample_id.to_string(),
            gene_id: gene.to_string(),
            variant: "NA".into(),
            aa_position: "NA".into(),
            vaf: None,
            ref_allele: "NA".into(),
            alt_allele: "NA".into(),
            study: "NA".into(),
        }
    }

    fn fixture(samples: Vec<Sample>, neighbor_positions: Vec<usize>) -> (Population, NeighborTable) {
        let population = Population::new(samples);
        let mut table = NeighborTable::default();
        let distances = neighbor_positions.iter().map(|_| 0.0).collect();
        table.insert(
            "q".to_string(),
            NeighborList {
                indices: neighbor_positions,
                distances,
            },
        );
        (population, table)
    }

    #[test]
    fn test_categorical_counts_exclude_missing() {
        let (pop, table) = fixture(
            vec![
                sample("q", &[("sex", "F")]),
                sample("s1", &[("sex", "M")]),
                sample("s2", &[]),
                sample("s3", &[("sex", "M")]),
            ],
            vec![1, 2, 3],
        );
        let hood = Neighborhood::resolve("q", 3, &table, &pop).unwrap();
        let counts = categorical_counts("sex", &hood, &pop);

        // s2 has no value: absent from maps and from both totals.
        assert_eq!(counts.neighbor.get("M"), Some(&2));
        assert_eq!(counts.neighbor_total, 2);
        assert_eq!(counts.background.get("M"), Some(&2));
        assert_eq!(counts.background.get("F"), Some(&1));
        assert_eq!(counts.background_total, 3);
    }

    #[test]
    fn test_gene_counts_collapse_to_distinct_samples() {
        let (pop, table) = fixture(
            vec![
                sample("q", &[]),
                sample("s1", &[]),
                sample("s2", &[]),
                sample("s3", &[]),
            ],
            vec![1, 2],
        );
        let hood = Neighborhood::resolve("q", 2, &table, &pop).unwrap();
        let mutations = vec![
            // s1 carries three TP53 variants: one sample, not three.
            mutation("s1", "TP53"),
            mutation("s1", "TP53"),
            mutation("s1", "TP53"),
            mutation("s2", "TP53"),
            mutation("s3", "TP53"),
            mutation("s3", "NPM1"),
            mutation("s9", "NA"),
        ];
        let counts = gene_sample_counts(&mutations, &hood, &pop);

        assert_eq!(counts.neighbor.get("TP53"), Some(&2));
        assert_eq!(counts.background.get("TP53"), Some(&3));
        assert_eq!(counts.neighbor.get("NPM1"), None);
        assert_eq!(counts.background.get("NPM1"), Some(&1));
        assert!(!counts.background.contains_key("NA"));
        assert_eq!(counts.neighbor_total, 2);
        assert_eq!(counts.background_total, 4);
    }

    #[test]
    fn test_aberration_counts_union_of_flags() {
        let (pop, table) = fixture(
            vec![sample("q", &[]), sample("s1", &[]), sample("s2", &[])],
            vec![1],
        );
        let hood = Neighborhood::resolve("q", 1, &table, &pop).unwrap();
        let aberrations = vec![
            AberrationRecord {
                sample_id: "s1".into(),
                flags: [("inv(16)".to_string(), true)].into_iter().collect(),
            },
            AberrationRecord {
                sample_id: "s2".into(),
                flags: [
                    ("inv(16)".to_string(), true),
                    ("t(8;21)".to_string(), true),
                ]
                .into_iter()
                .collect(),
            },
        ];
        let counts = aberration_counts(&aberrations, &hood, &pop);

        assert_eq!(counts.neighbor.get("inv(16)"), Some(&1));
        assert_eq!(counts.background.get("inv(16)"), Some(&2));
        assert_eq!(counts.neighbor.get("t(8;21)"), None);
        assert_eq!(counts.background.get("t(8;21)"), Some(&1));
    }

    #[test]
    fn test_drug_groups_split_neighbors_from_rest() {
        let (pop, table) = fixture(
            vec![sample("q", &[]), sample("s1", &[]), sample("s2", &[])],
            vec![1],
        );
        let hood = Neighborhood::resolve("q", 1, &table, &pop).unwrap();
        let responses = vec![
            DrugResponseRecord {
                sample_id: "s1".into(),
                inhibitor: "Venetoclax".into(),
                auc: 100.0,
            },
            DrugResponseRecord {
                sample_id: "s2".into(),
                inhibitor: "Venetoclax".into(),
                auc: 180.0,
            },
            DrugResponseRecord {
                sample_id: "q".into(),
                inhibitor: "Venetoclax".into(),
                auc: 160.0,
            },
            DrugResponseRecord {
                sample_id: "s2".into(),
                inhibitor: "null".into(),
                auc: 50.0,
            },
        ];
        let groups = drug_auc_groups(&responses, &hood);

        let venetoclax = groups.get("Venetoclax").unwrap();
        assert_eq!(venetoclax.neighbor, vec![100.0]);
        assert_eq!(venetoclax.rest, vec![180.0, 160.0]);
        assert!(!groups.contains_key("null"));
    }

    #[test]
    fn test_gate_policy_defaults() {
        let gates = GatePolicy::default_v1();
        assert_eq!(gates.min_database_count, 5);
        assert_eq!(gates.min_neighbor_count, 2);
        assert_eq!(gates.min_drug_samples, 5);
    }
}
