//! FFT engines
//!
//! `FftEngine` runs a fixed-size complex transform (rustfft) for chunked
//! analysis. `RealFftEngine` runs forward/inverse real transforms (realfft) of
//! arbitrary length for whole-signal equalization.

use num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

use crate::error::{EqError, Result};

/// Frequencies (Hz) of the first `count` bins of an `fft_size`-point transform
///
/// Bin `k` sits at `k * sample_rate / fft_size`.
pub fn bin_frequencies(fft_size: usize, sample_rate: u32, count: usize) -> Vec<f64> {
    if fft_size == 0 {
        return Vec::new();
    }
    let d = 1.0 / sample_rate as f64;
    let spacing = 1.0 / (fft_size as f64 * d);
    (0..count).map(|k| k as f64 * spacing).collect()
}

/// Frequencies (Hz) of the `n/2 + 1` bins produced by a real forward transform
pub fn real_bin_frequencies(signal_len: usize, sample_rate: u32) -> Vec<f64> {
    bin_frequencies(signal_len, sample_rate, signal_len / 2 + 1)
}

/// Fixed-size complex FFT engine
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Complex FFT processor
    fft: Arc<dyn Fft<f64>>,

    /// Reusable in-place buffer
    buffer: Vec<Complex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(fft_size);

        Self {
            fft_size,
            fft,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
        }
    }

    /// Compute the magnitude of the first `bins` FFT bins
    ///
    /// # Arguments
    /// * `signal` - Input samples (zero-padded or truncated to fft_size)
    /// * `bins` - Number of leading bins to keep (at most fft_size)
    pub fn compute_magnitude(&mut self, signal: &[f64], bins: usize) -> Vec<f64> {
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let re = signal.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(re, 0.0);
        }

        self.fft.process(&mut self.buffer);

        self.buffer
            .iter()
            .take(bins.min(self.fft_size))
            .map(|c| c.norm())
            .collect()
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

/// Forward and inverse real FFT of a single length
pub struct RealFftEngine {
    len: usize,
    r2c: Arc<dyn RealToComplex<f64>>,
    c2r: Arc<dyn ComplexToReal<f64>>,
}

impl RealFftEngine {
    /// Plan both directions for signals of `len` samples
    pub fn new(len: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(len);
        let c2r = planner.plan_fft_inverse(len);

        Self { len, r2c, c2r }
    }

    /// Signal length this engine was planned for
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of spectrum bins (`len/2 + 1`)
    pub fn num_bins(&self) -> usize {
        self.len / 2 + 1
    }

    /// Forward transform of `signal` (must be `len` samples)
    pub fn forward(&self, signal: &[f64]) -> Result<Vec<Complex<f64>>> {
        let mut input = self.r2c.make_input_vec();
        if signal.len() != input.len() {
            return Err(EqError::Transform(format!(
                "expected {} samples, got {}",
                input.len(),
                signal.len()
            )));
        }
        input.copy_from_slice(signal);

        let mut spectrum = self.r2c.make_output_vec();
        self.r2c
            .process(&mut input, &mut spectrum)
            .map_err(|e| EqError::Transform(e.to_string()))?;

        Ok(spectrum)
    }

    /// Inverse transform back to `len` samples, scaled by 1/len
    ///
    /// The imaginary parts of the DC bin (and of the Nyquist bin for even
    /// lengths) cannot be represented in a real signal and are ignored.
    pub fn inverse(&self, spectrum: &[Complex<f64>]) -> Result<Vec<f64>> {
        let mut input = self.c2r.make_input_vec();
        if spectrum.len() != input.len() {
            return Err(EqError::Transform(format!(
                "expected {} bins, got {}",
                input.len(),
                spectrum.len()
            )));
        }
        input.copy_from_slice(spectrum);

        if let Some(dc) = input.first_mut() {
            dc.im = 0.0;
        }
        if self.len % 2 == 0 {
            if let Some(nyquist) = input.last_mut() {
                nyquist.im = 0.0;
            }
        }

        let mut output = self.c2r.make_output_vec();
        self.c2r
            .process(&mut input, &mut output)
            .map_err(|e| EqError::Transform(e.to_string()))?;

        let scale = 1.0 / self.len as f64;
        for s in output.iter_mut() {
            *s *= scale;
        }

        Ok(output)
    }
}
