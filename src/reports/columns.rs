//! Column-width normalization

/// Rescale `nominal` widths so they sum exactly to `total`
///
/// Every width is scaled by `total / sum(nominal)`; the last column then
/// takes whatever is left so rounding never leaves a gap. When the nominal
/// widths do not add up to a positive number the result is a single column
/// spanning `total`.
pub fn normalize_widths(nominal: &[f64], total: f64) -> Vec<f64> {
    let sum: f64 = nominal.iter().sum();
    if !(sum > 0.0) || !sum.is_finite() {
        return vec![total];
    }

    let factor = total / sum;
    let mut widths: Vec<f64> = nominal.iter().map(|w| w * factor).collect();
    if let Some((last, rest)) = widths.split_last_mut() {
        *last = total - rest.iter().sum::<f64>();
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scales_proportionally() {
        let widths = normalize_widths(&[10.0, 30.0, 60.0], 200.0);
        assert_eq!(widths, vec![20.0, 60.0, 120.0]);
    }

    #[test]
    fn test_last_column_absorbs_rounding() {
        let widths = normalize_widths(&[1.0, 1.0, 1.0], 190.0);
        assert_eq!(widths.len(), 3);
        assert_eq!(widths[0] + widths[1] + widths[2], 190.0);
    }

    #[test]
    fn test_degenerate_input_is_one_full_column() {
        assert_eq!(normalize_widths(&[], 190.0), vec![190.0]);
        assert_eq!(normalize_widths(&[0.0, 0.0], 190.0), vec![190.0]);
        assert_eq!(normalize_widths(&[5.0, -5.0], 190.0), vec![190.0]);
    }

    proptest! {
        #[test]
        fn prop_sums_to_total(
            nominal in prop::collection::vec(0.1f64..500.0, 1..12),
            total in 1.0f64..1000.0,
        ) {
            let widths = normalize_widths(&nominal, total);
            prop_assert_eq!(widths.len(), nominal.len());
            let sum: f64 = widths.iter().sum();
            prop_assert!((sum - total).abs() <= total * 1e-12);
        }
    }
}
