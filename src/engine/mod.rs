pub mod counts;
pub mod neighborhood;

pub use counts::{
    DrugAucGroups, GatePolicy, ValueCounts, aberration_counts, categorical_counts,
    drug_auc_groups, gene_sample_counts,
};
pub use neighborhood::Neighborhood;
