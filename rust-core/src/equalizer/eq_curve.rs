//! EQ curve derivation and zero-phase application

use num_complex::Complex;
use serde::Serialize;

use super::profile::DeviceProfile;
use crate::curve::{db_to_gain, interpolate};
use crate::error::{EqError, Result};
use crate::spectrum::fft::{real_bin_frequencies, RealFftEngine};

/// Per-frequency gain (dB) that moves a source device toward a target
///
/// Defined on the target profile's frequency axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EqCurve {
    frequencies: Vec<f64>,
    gains_db: Vec<f64>,
}

impl EqCurve {
    /// Target-minus-source difference of two profiles
    ///
    /// When the axes differ in length the source is first interpolated onto
    /// the target axis (flat beyond its ends). Equal-length axes are
    /// subtracted index by index without checking that the frequencies agree.
    pub fn between(source: &DeviceProfile, target: &DeviceProfile) -> Result<Self> {
        let target_db = target.magnitudes();

        let resampled;
        let source_db = if source.frequencies().len() != target.frequencies().len() {
            log::debug!(
                "Resampling source '{}' from {} to {} bins",
                source.name(),
                source.frequencies().len(),
                target.frequencies().len()
            );
            resampled = interpolate(
                target.frequencies(),
                source.frequencies(),
                source.magnitudes(),
            )?;
            &resampled[..]
        } else {
            source.magnitudes()
        };

        let gains_db = target_db
            .iter()
            .zip(source_db)
            .map(|(t, s)| t - s)
            .collect();

        Ok(Self {
            frequencies: target.frequencies().to_vec(),
            gains_db,
        })
    }

    /// Frequency axis (Hz) the gains are defined on
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn gains_db(&self) -> &[f64] {
        &self.gains_db
    }

    pub fn len(&self) -> usize {
        self.gains_db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gains_db.is_empty()
    }

    /// Apply the curve to a whole signal
    ///
    /// The signal's magnitude spectrum is scaled by the interpolated gain and
    /// resynthesized with zero phase; the input phase is not kept. Output
    /// length equals input length.
    pub fn apply(&self, signal: &[f64], sample_rate: u32) -> Result<Vec<f64>> {
        if sample_rate == 0 {
            return Err(EqError::InvalidSampleRate(sample_rate));
        }
        if signal.is_empty() {
            return Ok(Vec::new());
        }

        let engine = RealFftEngine::new(signal.len());
        let spectrum = engine.forward(signal)?;

        let bins = real_bin_frequencies(signal.len(), sample_rate);
        let gains_db = interpolate(&bins, &self.frequencies, &self.gains_db)?;

        let scaled: Vec<Complex<f64>> = spectrum
            .iter()
            .zip(&gains_db)
            .map(|(bin, &db)| Complex::new(bin.norm() * db_to_gain(db), 0.0))
            .collect();

        log::debug!(
            "Applied {}-point EQ curve to {} samples ({} bins)",
            self.len(),
            signal.len(),
            scaled.len()
        );

        engine.inverse(&scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::FrequencyResponse;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn profile(name: &str, freqs: &[f64], mags: &[f64]) -> DeviceProfile {
        let response = FrequencyResponse::new(freqs.to_vec(), mags.to_vec()).unwrap();
        DeviceProfile::new(name, response, None)
    }

    fn magnitudes(signal: &[f64]) -> Vec<f64> {
        RealFftEngine::new(signal.len())
            .forward(signal)
            .unwrap()
            .iter()
            .map(|c| c.norm())
            .collect()
    }

    #[test]
    fn test_equal_axes_subtract() {
        let freqs = [100.0, 1000.0, 10000.0];
        let source = profile("source", &freqs, &[0.0, -3.0, -6.0]);
        let target = profile("target", &freqs, &[0.0, 0.0, 0.0]);

        let curve = EqCurve::between(&source, &target).unwrap();
        assert_eq!(curve.gains_db(), &[0.0, 3.0, 6.0]);
        assert_eq!(curve.frequencies(), &freqs);
    }

    #[test]
    fn test_equal_length_axes_not_resampled() {
        // Different frequency values but same length: index-wise difference
        let source = profile("source", &[0.0, 10.0], &[-1.0, -2.0]);
        let target = profile("target", &[0.0, 20.0], &[-4.0, -8.0]);

        let curve = EqCurve::between(&source, &target).unwrap();
        assert_eq!(curve.gains_db(), &[-3.0, -6.0]);
    }

    #[test]
    fn test_mismatched_axes_resampled_onto_target() {
        let source = profile("source", &[100.0, 200.0], &[0.0, -10.0]);
        let target = profile("target", &[50.0, 150.0, 400.0], &[0.0, 0.0, 0.0]);

        let curve = EqCurve::between(&source, &target).unwrap();
        assert_eq!(curve.len(), 3);
        assert_relative_eq!(curve.gains_db()[0], 0.0);
        assert_relative_eq!(curve.gains_db()[1], 5.0);
        assert_relative_eq!(curve.gains_db()[2], 10.0);
    }

    #[test]
    fn test_swap_negates() {
        let freqs = [0.0, 1.0, 2.0, 3.0];
        let a = profile("a", &freqs, &[0.0, -1.5, -7.25, -3.0]);
        let b = profile("b", &freqs, &[-2.0, 0.0, -0.5, -9.0]);

        let ab = EqCurve::between(&a, &b).unwrap();
        let ba = EqCurve::between(&b, &a).unwrap();

        for (x, y) in ab.gains_db().iter().zip(ba.gains_db()) {
            assert_eq!(*x, -*y);
        }
    }

    #[test]
    fn test_flat_curve_preserves_magnitude() {
        let curve = EqCurve {
            frequencies: vec![0.0, 4000.0, 8000.0],
            gains_db: vec![0.0; 3],
        };
        let signal: Vec<f64> = (0..1000)
            .map(|n| (2.0 * PI * 440.0 * n as f64 / 16000.0).sin() + 0.3 * (n as f64 * 0.01).cos())
            .collect();

        let out = curve.apply(&signal, 16000).unwrap();
        assert_eq!(out.len(), signal.len());

        for (a, b) in magnitudes(&signal).iter().zip(magnitudes(&out).iter()) {
            assert!((a - b).abs() < 1e-6 * a.max(1.0), "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_gain_scales_magnitude() {
        let curve = EqCurve {
            frequencies: vec![0.0, 100.0],
            gains_db: vec![6.0, 6.0],
        };
        let signal: Vec<f64> = (0..512).map(|n| ((n * 31) % 17) as f64 - 8.0).collect();

        let out = curve.apply(&signal, 8000).unwrap();
        let gain = db_to_gain(6.0);

        for (a, b) in magnitudes(&signal).iter().zip(magnitudes(&out).iter()) {
            assert!((a * gain - b).abs() < 1e-6 * b.max(1.0));
        }
    }

    #[test]
    fn test_output_is_zero_phase() {
        // A delayed impulse comes back centred on sample 0
        let curve = EqCurve {
            frequencies: vec![0.0],
            gains_db: vec![0.0],
        };
        let mut signal = vec![0.0; 64];
        signal[10] = 1.0;

        let out = curve.apply(&signal, 8000).unwrap();
        assert_relative_eq!(out[0], 1.0, epsilon = 1e-9);
        assert!(out[1..].iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn test_input_not_mutated_and_odd_length() {
        let curve = EqCurve {
            frequencies: vec![0.0, 1000.0],
            gains_db: vec![-3.0, 3.0],
        };
        let signal: Vec<f64> = (0..101).map(|n| (n as f64 * 0.2).sin()).collect();
        let copy = signal.clone();

        let out = curve.apply(&signal, 4000).unwrap();
        assert_eq!(out.len(), 101);
        assert_eq!(signal, copy);
    }

    #[test]
    fn test_empty_signal() {
        let curve = EqCurve {
            frequencies: vec![0.0],
            gains_db: vec![1.0],
        };
        assert!(curve.apply(&[], 44100).unwrap().is_empty());
    }

    #[test]
    fn test_empty_curve_rejected() {
        let curve = EqCurve {
            frequencies: vec![],
            gains_db: vec![],
        };
        assert!(matches!(curve.apply(&[0.0; 8], 8000), Err(EqError::EmptyInput(_))));
    }
}
