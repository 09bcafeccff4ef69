//! Moving-average smoothing and peak normalization of dB curves

use crate::error::{EqError, Result};

/// Default moving-average width (bins)
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Centered moving average with zero-padded edges
///
/// Output index `i` is the full convolution of `curve` with a boxcar of
/// `window` taps, taken at `i + (window - 1) - window / 2`. Bins near either
/// edge average in implicit zeros, so they are pulled toward 0 dB rather than
/// reflected or clamped.
///
/// # Arguments
/// * `curve` - dB values
/// * `window` - Number of taps (must be non-zero)
///
/// # Returns
/// Smoothed curve with the same length as `curve`
pub fn smooth(curve: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(EqError::empty_input("smoothing window must have at least one tap"));
    }

    let n = curve.len() as isize;
    let taps = window as isize;
    let offset = (taps - 1) - taps / 2;
    let weight = 1.0 / window as f64;

    let smoothed = (0..n)
        .map(|i| {
            let hi = (i + offset).min(n - 1);
            let lo = (i + offset - (taps - 1)).max(0);
            if lo > hi {
                return 0.0;
            }
            curve[lo as usize..=hi as usize]
                .iter()
                .map(|&v| v * weight)
                .sum()
        })
        .collect();

    Ok(smoothed)
}

/// Shift a dB curve so its maximum sits at exactly 0 dB
pub fn normalize(curve: &[f64]) -> Result<Vec<f64>> {
    let peak = curve
        .iter()
        .copied()
        .reduce(f64::max)
        .ok_or_else(|| EqError::empty_input("cannot normalize an empty curve"))?;

    Ok(curve.iter().map(|&v| v - peak).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_smooth_constant_interior() {
        let curve = vec![-10.0; 20];
        let smoothed = smooth(&curve, 5).unwrap();

        assert_eq!(smoothed.len(), 20);
        for &v in &smoothed[2..18] {
            assert_relative_eq!(v, -10.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_smooth_zero_padded_edges() {
        // Edges see two (then one) implicit zeros out of five taps
        let curve = vec![-10.0; 20];
        let smoothed = smooth(&curve, 5).unwrap();

        assert_relative_eq!(smoothed[0], -6.0, epsilon = 1e-12);
        assert_relative_eq!(smoothed[1], -8.0, epsilon = 1e-12);
        assert_relative_eq!(smoothed[18], -8.0, epsilon = 1e-12);
        assert_relative_eq!(smoothed[19], -6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_smooth_even_window_alignment() {
        // np.convolve([1, 2, 3, 4], [0.5, 0.5], mode='same') == [0.5, 1.5, 2.5, 3.5]
        let smoothed = smooth(&[1.0, 2.0, 3.0, 4.0], 2).unwrap();
        let expected = [0.5, 1.5, 2.5, 3.5];

        for (s, e) in smoothed.iter().zip(expected.iter()) {
            assert_relative_eq!(*s, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_smooth_impulse() {
        let mut curve = vec![0.0; 9];
        curve[4] = 5.0;
        let smoothed = smooth(&curve, 5).unwrap();

        for (i, &v) in smoothed.iter().enumerate() {
            let expected = if (2..=6).contains(&i) { 1.0 } else { 0.0 };
            assert_relative_eq!(v, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_smooth_curve_shorter_than_window() {
        let smoothed = smooth(&[-6.0, -6.0], 5).unwrap();
        assert_eq!(smoothed.len(), 2);
        assert_relative_eq!(smoothed[0], -2.4, epsilon = 1e-12);
        assert_relative_eq!(smoothed[1], -2.4, epsilon = 1e-12);
    }

    #[test]
    fn test_smooth_zero_window_rejected() {
        assert!(matches!(smooth(&[1.0], 0), Err(EqError::EmptyInput(_))));
    }

    #[test]
    fn test_normalize_peak_is_zero() {
        let curve = vec![-42.5, -3.25, -17.0, -3.5];
        let normalized = normalize(&curve).unwrap();

        let peak = normalized.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(peak, 0.0);
        assert_relative_eq!(normalized[0], -39.25);
    }

    #[test]
    fn test_normalize_positive_curve() {
        let normalized = normalize(&[3.0, 12.0, 6.0]).unwrap();
        assert_eq!(normalized, vec![-9.0, 0.0, -6.0]);
    }

    #[test]
    fn test_normalize_empty_rejected() {
        assert!(matches!(normalize(&[]), Err(EqError::EmptyInput(_))));
    }
}
