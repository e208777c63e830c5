//! Exact tail probabilities for discrete enrichment tests.
//!
//! Both tests answer the same question — how surprising is it to see at
//! least `k` hits among the neighbors — under different sampling models:
//! without replacement ([`hypergeometric_tail_p`]) and with a fixed
//! background rate ([`binomial_tail_p`]). Domain violations return `None`
//! ("untestable") rather than panicking; the report assembler drops such
//! candidates before display.

use crate::stats::special::{ln_choose, normal_sf};

/// Exact-sum cutoff for the binomial tail; larger trial counts switch to
/// the normal approximation with continuity correction.
const BINOMIAL_EXACT_MAX_N: usize = 1000;

/// Hypergeometric upper-tail probability P(X >= k).
///
/// Probability of observing at least `k` successes when drawing `n` items
/// without replacement from a population of `big_n` containing `big_k`
/// successes. Accumulated in log space so populations in the thousands
/// stay stable.
///
/// Returns `None` when the configuration is untestable: empty population,
/// zero successes in the population, `k > n`, `big_k > big_n`, or
/// `n > big_n`.
pub fn hypergeometric_tail_p(k: usize, n: usize, big_k: usize, big_n: usize) -> Option<f64> {
    if big_n == 0 || big_k == 0 || k > n || big_k > big_n || n > big_n {
        return None;
    }
    if k == 0 {
        return Some(1.0);
    }

    let max_i = n.min(big_k);
    if k > max_i {
        return Some(0.0);
    }

    let log_denom = ln_choose(big_n, n);
    let mut sum = 0.0_f64;
    for i in k..=max_i {
        // PMF is zero when the failures would exceed the failure population.
        if big_n - big_k < n - i {
            continue;
        }
        let log_p = ln_choose(big_k, i) + ln_choose(big_n - big_k, n - i) - log_denom;
        sum += log_p.exp();
    }
    Some(sum.min(1.0))
}

/// Binomial upper-tail probability P(X >= k) for X ~ Binomial(n, p).
///
/// `p` is the background frequency `K/N`. Exact log-space summation up to
/// `n = 1000`; beyond that, normal approximation with continuity
/// correction.
///
/// Returns `None` when `n == 0`, `k > n`, or `p` is outside [0, 1].
pub fn binomial_tail_p(n: usize, k: usize, p: f64) -> Option<f64> {
    if n == 0 || k > n || !(0.0..=1.0).contains(&p) {
        return None;
    }
    if k == 0 {
        return Some(1.0);
    }
    if p == 0.0 {
        return Some(0.0);
    }
    if p == 1.0 {
        return Some(1.0);
    }

    if n > BINOMIAL_EXACT_MAX_N {
        let mean = n as f64 * p;
        let sd = (n as f64 * p * (1.0 - p)).sqrt();
        let z = (k as f64 - 0.5 - mean) / sd;
        return Some(normal_sf(z).clamp(0.0, 1.0));
    }

    let ln_p = p.ln();
    let ln_q = (1.0 - p).ln();
    let mut sum = 0.0_f64;
    for i in k..=n {
        let log_mass = ln_choose(n, i) + i as f64 * ln_p + (n - i) as f64 * ln_q;
        sum += log_mass.exp();
    }
    Some(sum.min(1.0))
}

/// Natural log of the neighbor-to-background frequency ratio.
///
/// Returns 0.0 when either frequency is zero or non-finite. That
/// zero-fallback is a contract the report consumers rely on: an
/// unobserved category reads as "no enrichment signal", never ±inf.
pub fn log_enrichment_ratio(neighbor_freq: f64, background_freq: f64) -> f64 {
    if neighbor_freq <= 0.0
        || background_freq <= 0.0
        || !neighbor_freq.is_finite()
        || !background_freq.is_finite()
    {
        return 0.0;
    }
    (neighbor_freq / background_freq).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_hypergeometric_untestable_inputs() {
        assert_eq!(hypergeometric_tail_p(1, 5, 0, 100), None);
        assert_eq!(hypergeometric_tail_p(1, 5, 10, 0), None);
        assert_eq!(hypergeometric_tail_p(6, 5, 10, 100), None);
        assert_eq!(hypergeometric_tail_p(1, 5, 101, 100), None);
        assert_eq!(hypergeometric_tail_p(1, 101, 10, 100), None);
    }

    #[test]
    fn test_hypergeometric_zero_hits_is_certain() {
        assert_eq!(hypergeometric_tail_p(0, 5, 10, 100), Some(1.0));
    }

    #[test]
    fn test_hypergeometric_exact_small_case() {
        // Urn with 5 success / 5 failure, draw 5, P(X >= 5) = C(5,5)/C(10,5)
        let p = hypergeometric_tail_p(5, 5, 5, 10).unwrap();
        assert!((p - 1.0 / 252.0).abs() < TOL, "p={p}");
    }

    #[test]
    fn test_hypergeometric_certain_overlap() {
        // Drawing 5 from a population that is all successes.
        let p = hypergeometric_tail_p(5, 5, 10, 10).unwrap();
        assert!((p - 1.0).abs() < TOL);
    }

    #[test]
    fn test_hypergeometric_monotone_in_k() {
        let mut prev = f64::INFINITY;
        for k in 1..=20 {
            let p = hypergeometric_tail_p(k, 20, 60, 100).unwrap();
            assert!((0.0..=1.0).contains(&p));
            assert!(p <= prev + TOL, "tail not monotone at k={k}");
            prev = p;
        }
    }

    #[test]
    fn test_hypergeometric_stable_for_large_population() {
        let p = hypergeometric_tail_p(30, 50, 400, 4000).unwrap();
        assert!(p.is_finite());
        assert!(p > 0.0 && p < 1e-6, "p={p}");
    }

    #[test]
    fn test_binomial_untestable_inputs() {
        assert_eq!(binomial_tail_p(0, 0, 0.5), None);
        assert_eq!(binomial_tail_p(5, 6, 0.5), None);
        assert_eq!(binomial_tail_p(5, 2, -0.1), None);
        assert_eq!(binomial_tail_p(5, 2, 1.5), None);
    }

    #[test]
    fn test_binomial_boundary_rates() {
        assert_eq!(binomial_tail_p(10, 0, 0.3), Some(1.0));
        assert_eq!(binomial_tail_p(10, 3, 0.0), Some(0.0));
        assert_eq!(binomial_tail_p(10, 3, 1.0), Some(1.0));
    }

    #[test]
    fn test_binomial_exact_fair_coin() {
        // P(X >= 8 | n=10, p=0.5) = (45 + 10 + 1) / 1024
        let p = binomial_tail_p(10, 8, 0.5).unwrap();
        assert!((p - 56.0 / 1024.0).abs() < TOL, "p={p}");
    }

    #[test]
    fn test_binomial_example_scenario() {
        // 18 of 20 neighbors at background rate 0.6 is a strong signal.
        let p = binomial_tail_p(20, 18, 0.6).unwrap();
        assert!(p < 0.01, "p={p}");
    }

    #[test]
    fn test_binomial_matches_hypergeometric_in_large_n_limit() {
        // Fixed k, n and success fraction; the finite-population tail
        // approaches the binomial tail as N grows.
        let binom = binomial_tail_p(20, 8, 0.1).unwrap();
        let hyper = hypergeometric_tail_p(8, 20, 2000, 20000).unwrap();
        assert!((binom - hyper).abs() < 1e-3, "binom={binom} hyper={hyper}");
    }

    #[test]
    fn test_binomial_normal_approximation_branch() {
        let exact_regime = binomial_tail_p(1000, 550, 0.5).unwrap();
        let approx_regime = binomial_tail_p(2000, 1100, 0.5).unwrap();
        // Both deep in the tail, both finite, same order of magnitude in z.
        assert!(exact_regime < 0.01);
        assert!(approx_regime < 0.01);
    }

    #[test]
    fn test_log_enrichment_ratio_zero_fallback() {
        assert_eq!(log_enrichment_ratio(0.0, 0.5), 0.0);
        assert_eq!(log_enrichment_ratio(0.5, 0.0), 0.0);
        assert_eq!(log_enrichment_ratio(0.0, 0.0), 0.0);
        assert_eq!(log_enrichment_ratio(f64::NAN, 0.5), 0.0);
    }

    #[test]
    fn test_log_enrichment_ratio_signs() {
        assert!(log_enrichment_ratio(0.9, 0.6) > 0.0);
        assert!(log_enrichment_ratio(0.1, 0.4) < 0.0);
        assert_eq!(log_enrichment_ratio(0.4, 0.4), 0.0);
    }
}
