//! Two-sample Welch t-test.
//!
//! The drug-response comparison asks whether neighbor AUC values differ
//! from the rest of the population. Callers pass the complement — never
//! the full population including the neighbors — as the second group.

use crate::stats::special::betai;

/// Two-tailed p-value of the unequal-variance (Welch) t-test.
///
/// Returns `None` when either group has fewer than 2 observations or when
/// the pooled standard error is zero (all values identical); both are
/// untestable rather than errors.
pub fn welch_t_p(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() < 2 || b.len() < 2 {
        return None;
    }

    let na = a.len() as f64;
    let nb = b.len() as f64;
    let mean_a = a.iter().sum::<f64>() / na;
    let mean_b = b.iter().sum::<f64>() / nb;
    // Sample variance (n-1 denominator), as the test statistic requires.
    let var_a = a.iter().map(|v| (v - mean_a).powi(2)).sum::<f64>() / (na - 1.0);
    let var_b = b.iter().map(|v| (v - mean_b).powi(2)).sum::<f64>() / (nb - 1.0);

    let vn_a = var_a / na;
    let vn_b = var_b / nb;
    let se = (vn_a + vn_b).sqrt();
    if se == 0.0 || !se.is_finite() {
        return None;
    }

    let t = (mean_a - mean_b) / se;
    // Welch-Satterthwaite degrees of freedom.
    let df = (vn_a + vn_b).powi(2) / (vn_a.powi(2) / (na - 1.0) + vn_b.powi(2) / (nb - 1.0));
    if !df.is_finite() || df <= 0.0 {
        return None;
    }

    let x = df / (df + t * t);
    betai(df / 2.0, 0.5, x).map(|p| p.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welch_untestable_groups() {
        assert_eq!(welch_t_p(&[1.0], &[1.0, 2.0]), None);
        assert_eq!(welch_t_p(&[1.0, 2.0], &[1.0]), None);
        assert_eq!(welch_t_p(&[], &[]), None);
    }

    #[test]
    fn test_welch_zero_variance_is_untestable() {
        assert_eq!(welch_t_p(&[2.0, 2.0, 2.0], &[2.0, 2.0, 2.0]), None);
    }

    #[test]
    fn test_welch_identical_groups_not_significant() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let p = welch_t_p(&a, &a).unwrap();
        assert!(p > 0.99, "p={p}");
    }

    #[test]
    fn test_welch_separated_groups_significant() {
        let a = [1.0, 1.1, 0.9, 1.05, 0.95];
        let b = [5.0, 5.2, 4.9, 5.1, 4.8];
        let p = welch_t_p(&a, &b).unwrap();
        assert!(p < 1e-6, "p={p}");
    }

    #[test]
    fn test_welch_symmetry() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.5, 3.5, 4.5, 5.5];
        let p_ab = welch_t_p(&a, &b).unwrap();
        let p_ba = welch_t_p(&b, &a).unwrap();
        assert!((p_ab - p_ba).abs() < 1e-12);
    }

    #[test]
    fn test_welch_reference_value() {
        // Cross-checked against scipy.stats.ttest_ind(equal_var=False).
        let a = [20.0, 22.0, 19.0, 20.5, 21.0];
        let b = [24.0, 25.0, 23.5, 26.0, 24.5];
        let p = welch_t_p(&a, &b).unwrap();
        assert!((p - 0.000507).abs() < 5e-4, "p={p}");
    }
}
