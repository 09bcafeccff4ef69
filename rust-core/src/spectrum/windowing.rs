//! Tapering windows applied to analysis chunks before the FFT

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    #[default]
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    Blackman,

    /// Rectangular window (no tapering)
    Rectangular,
}

/// Generate symmetric window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Coefficients w[n] for n = 0..M-1. A single-sample window is `[1.0]`.
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    if length == 1 {
        return vec![1.0];
    }

    let denom = (length as f64) - 1.0;

    (0..length)
        .map(|n| {
            let angle = 2.0 * PI * n as f64 / denom;
            match window_type {
                WindowType::Hann => 0.5 - 0.5 * angle.cos(),
                WindowType::Hamming => 0.54 - 0.46 * angle.cos(),
                WindowType::Blackman => 0.42 - 0.5 * angle.cos() + 0.08 * (2.0 * angle).cos(),
                WindowType::Rectangular => 1.0,
            }
        })
        .collect()
}

/// Multiply `signal` by a precomputed window into `out`
///
/// All three slices must have equal length.
pub fn apply_window_into(signal: &[f64], window: &[f64], out: &mut [f64]) {
    for ((o, &s), &w) in out.iter_mut().zip(signal).zip(window) {
        *o = s * w;
    }
}

/// Apply window to signal
pub fn apply_window(signal: &[f64], window_type: WindowType) -> Vec<f64> {
    let window = generate_window(window_type, signal.len());
    let mut out = vec![0.0; signal.len()];
    apply_window_into(signal, &window, &mut out);
    out
}
