pub mod correction;
pub mod special;
pub mod summary;
pub mod tail;
pub mod ttest;

pub use correction::benjamini_hochberg;
pub use summary::ContinuousSummary;
pub use tail::{binomial_tail_p, hypergeometric_tail_p, log_enrichment_ratio};
pub use ttest::welch_t_p;
