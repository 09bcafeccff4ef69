//! Piecewise-linear interpolation with flat extrapolation
//!
//! Used both to align a source curve onto a target frequency axis and to map
//! an EQ curve onto the bins of an arbitrary-length transform.

use crate::error::{EqError, Result};

/// Evaluate the curve `(xp, fp)` at every point of `x`
///
/// # Arguments
/// * `x` - Query points (any order)
/// * `xp` - Known abscissae, ascending
/// * `fp` - Known values at `xp`
///
/// # Returns
/// One value per query point. Queries left of `xp[0]` take `fp[0]`, queries
/// right of the last point take the last value.
pub fn interpolate(x: &[f64], xp: &[f64], fp: &[f64]) -> Result<Vec<f64>> {
    if xp.len() != fp.len() {
        return Err(EqError::LengthMismatch {
            frequencies: xp.len(),
            magnitudes: fp.len(),
        });
    }
    if xp.is_empty() {
        return Err(EqError::empty_input("cannot interpolate over an empty curve"));
    }

    Ok(x.iter().map(|&q| interpolate_point(q, xp, fp)).collect())
}

fn interpolate_point(q: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let last = xp.len() - 1;

    // First index whose abscissa lies strictly right of q
    let upper = xp.partition_point(|&p| p <= q);

    if upper == 0 {
        return fp[0];
    }
    if upper > last {
        return fp[last];
    }

    let lower = upper - 1;
    let slope = (fp[upper] - fp[lower]) / (xp[upper] - xp[lower]);
    slope * (q - xp[lower]) + fp[lower]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interior_points() {
        let xp = [0.0, 10.0, 20.0];
        let fp = [0.0, -10.0, 10.0];
        let y = interpolate(&[5.0, 10.0, 15.0], &xp, &fp).unwrap();

        assert_relative_eq!(y[0], -5.0);
        assert_relative_eq!(y[1], -10.0);
        assert_relative_eq!(y[2], 0.0);
    }

    #[test]
    fn test_flat_extrapolation() {
        let xp = [100.0, 1000.0];
        let fp = [-3.0, 6.0];
        let y = interpolate(&[0.0, 50.0, 5000.0, 1e6], &xp, &fp).unwrap();

        assert_eq!(y, vec![-3.0, -3.0, 6.0, 6.0]);
    }

    #[test]
    fn test_exact_endpoints() {
        let xp = [1.0, 2.0, 4.0];
        let fp = [7.0, 8.0, 9.0];
        let y = interpolate(&xp, &xp, &fp).unwrap();

        assert_eq!(y, fp.to_vec());
    }

    #[test]
    fn test_single_point_curve() {
        let y = interpolate(&[-1.0, 0.0, 1.0], &[0.0], &[4.5]).unwrap();
        assert_eq!(y, vec![4.5, 4.5, 4.5]);
    }

    #[test]
    fn test_empty_curve_rejected() {
        let err = interpolate(&[1.0], &[], &[]).unwrap_err();
        assert!(matches!(err, EqError::EmptyInput(_)));
    }

    #[test]
    fn test_mismatched_curve_rejected() {
        let err = interpolate(&[1.0], &[0.0, 1.0], &[0.0]).unwrap_err();
        assert!(matches!(err, EqError::LengthMismatch { frequencies: 2, magnitudes: 1 }));
    }

    #[test]
    fn test_empty_query() {
        let y = interpolate(&[], &[0.0, 1.0], &[0.0, 1.0]).unwrap();
        assert!(y.is_empty());
    }
}
