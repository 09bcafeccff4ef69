//! Frequency response: paired frequency axis and dB magnitudes

use serde::{Deserialize, Serialize};

use super::smoothing::{normalize, smooth};
use crate::error::{EqError, Result};

/// Magnitude (dB) versus frequency (Hz)
///
/// Both sequences always have the same length; the frequency axis is
/// ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResponse")]
pub struct FrequencyResponse {
    frequencies: Vec<f64>,
    magnitudes: Vec<f64>,
}

#[derive(Deserialize)]
struct RawResponse {
    frequencies: Vec<f64>,
    magnitudes: Vec<f64>,
}

impl TryFrom<RawResponse> for FrequencyResponse {
    type Error = EqError;

    fn try_from(raw: RawResponse) -> Result<Self> {
        Self::new(raw.frequencies, raw.magnitudes)
    }
}

impl FrequencyResponse {
    /// Pair a frequency axis with its magnitudes
    pub fn new(frequencies: Vec<f64>, magnitudes: Vec<f64>) -> Result<Self> {
        if frequencies.len() != magnitudes.len() {
            return Err(EqError::LengthMismatch {
                frequencies: frequencies.len(),
                magnitudes: magnitudes.len(),
            });
        }
        Ok(Self {
            frequencies,
            magnitudes,
        })
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Moving-average the magnitudes, keeping the axis
    pub fn smoothed(self, window: usize) -> Result<Self> {
        let magnitudes = smooth(&self.magnitudes, window)?;
        Ok(Self {
            frequencies: self.frequencies,
            magnitudes,
        })
    }

    /// Shift the magnitudes so the peak is 0 dB
    pub fn normalized(self) -> Result<Self> {
        let magnitudes = normalize(&self.magnitudes)?;
        Ok(Self {
            frequencies: self.frequencies,
            magnitudes,
        })
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.frequencies, self.magnitudes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_rejected() {
        let err = FrequencyResponse::new(vec![0.0, 1.0], vec![0.0]).unwrap_err();
        assert!(matches!(err, EqError::LengthMismatch { frequencies: 2, magnitudes: 1 }));
    }

    #[test]
    fn test_serde_record_shape() {
        let response = FrequencyResponse::new(vec![0.0, 2.0], vec![-1.5, 0.0]).unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["frequencies"], serde_json::json!([0.0, 2.0]));
        assert_eq!(json["magnitudes"], serde_json::json!([-1.5, 0.0]));

        let back: FrequencyResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn test_deserialize_rejects_mismatch() {
        let json = serde_json::json!({ "frequencies": [0.0], "magnitudes": [] });
        assert!(serde_json::from_value::<FrequencyResponse>(json).is_err());
    }

    #[test]
    fn test_normalized_keeps_axis() {
        let response = FrequencyResponse::new(vec![10.0, 20.0], vec![-4.0, -1.0])
            .unwrap()
            .normalized()
            .unwrap();

        assert_eq!(response.frequencies(), &[10.0, 20.0]);
        assert_eq!(response.magnitudes(), &[-3.0, 0.0]);
    }
}
