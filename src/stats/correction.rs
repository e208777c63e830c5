//! Benjamini-Hochberg false discovery rate correction.

/// Adjust `p_values` with the Benjamini-Hochberg step-up procedure.
///
/// Order-preserving: `out[i]` corresponds to `p_values[i]`, not to the
/// sorted order. Each adjusted value is `min(1, p * m / rank)` followed by
/// a cumulative-minimum pass from the largest rank down — omitting that
/// pass breaks monotonicity and is the classic implementation bug.
///
/// `m` is the number of p-values passed in; callers must pass exactly the
/// filtered candidate set being reported.
pub fn benjamini_hochberg(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len();
    if m == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let m_f = m as f64;
    let mut adjusted = vec![0.0; m];
    let mut running_min = f64::INFINITY;
    for rank in (0..m).rev() {
        let idx = order[rank];
        let adj = (p_values[idx] * m_f / (rank + 1) as f64).min(1.0);
        running_min = running_min.min(adj);
        adjusted[idx] = running_min;
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn test_bh_empty_and_single() {
        assert!(benjamini_hochberg(&[]).is_empty());
        let adj = benjamini_hochberg(&[0.03]);
        assert!((adj[0] - 0.03).abs() < TOL);
    }

    #[test]
    fn test_bh_known_values() {
        // Sorted: 0.005(idx3) 0.01(idx0) 0.03(idx2) 0.04(idx1)
        // Raw:    0.02        0.02       0.04       0.04
        let adj = benjamini_hochberg(&[0.01, 0.04, 0.03, 0.005]);
        assert!((adj[3] - 0.02).abs() < TOL);
        assert!((adj[0] - 0.02).abs() < TOL);
        assert!((adj[2] - 0.04).abs() < TOL);
        assert!((adj[1] - 0.04).abs() < TOL);
    }

    #[test]
    fn test_bh_order_preserved() {
        let p = [0.04, 0.01, 0.03, 0.005];
        let adj = benjamini_hochberg(&p);
        // Smallest raw p keeps the smallest adjusted p at its own index.
        assert!((adj[3] - 0.02).abs() < TOL);
        assert!((adj[1] - 0.02).abs() < TOL);
    }

    #[test]
    fn test_bh_dominates_raw() {
        let p = [0.001, 0.02, 0.3, 0.7, 0.04, 0.05];
        let adj = benjamini_hochberg(&p);
        for (raw, a) in p.iter().zip(adj.iter()) {
            assert!(*a >= *raw - TOL, "adjusted {a} < raw {raw}");
        }
    }

    #[test]
    fn test_bh_monotone_on_sorted_input() {
        let p = [0.001, 0.01, 0.02, 0.05, 0.1, 0.5];
        let adj = benjamini_hochberg(&p);
        for w in adj.windows(2) {
            assert!(w[1] >= w[0] - TOL);
        }
    }

    #[test]
    fn test_bh_clamped_to_one() {
        for a in benjamini_hochberg(&[0.5, 0.8, 0.9, 0.99]) {
            assert!(a <= 1.0 + TOL);
        }
    }

    #[test]
    fn test_bh_cumulative_minimum_required() {
        // Without the right-to-left pass, rank 2 of [0.01, 0.011] would be
        // adjusted to 0.011 * 2 / 2 = 0.011 while rank 1 gets 0.02; the
        // monotone form pulls rank 1 down to 0.011.
        let adj = benjamini_hochberg(&[0.01, 0.011]);
        assert!((adj[0] - 0.011).abs() < TOL);
        assert!((adj[1] - 0.011).abs() < TOL);
    }
}
