//! Decibel / linear conversions

/// Floor added to magnitudes before taking the logarithm, so exact silence
/// maps to a finite value (-180 dB) instead of -inf.
pub const MAGNITUDE_EPSILON: f64 = 1e-9;

/// Convert a linear magnitude to dB: 20*log10(magnitude + 1e-9)
#[inline]
pub fn magnitude_to_db(magnitude: f64) -> f64 {
    20.0 * (magnitude + MAGNITUDE_EPSILON).log10()
}

/// Convert a dB gain to a linear multiplier: 10^(db/20)
#[inline]
pub fn db_to_gain(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_silence_floor() {
        assert_relative_eq!(magnitude_to_db(0.0), -180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_gain_conversion() {
        assert_relative_eq!(db_to_gain(0.0), 1.0);
        assert_relative_eq!(db_to_gain(20.0), 10.0, epsilon = 1e-12);
        assert_relative_eq!(db_to_gain(-6.0), 0.501_187_233_627_272_2, epsilon = 1e-12);
    }
}
