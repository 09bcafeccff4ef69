//! Device profiles: a named, normalized frequency response

use serde::{Deserialize, Serialize};

use crate::curve::FrequencyResponse;

/// Frequency-response snapshot of one playback device
///
/// Immutable once built. Re-profiling a device produces a new, unrelated
/// instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    name: String,
    #[serde(flatten)]
    response: FrequencyResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_ref: Option<String>,
}

impl DeviceProfile {
    pub fn new(
        name: impl Into<String>,
        response: FrequencyResponse,
        source_ref: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            response,
            source_ref,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn response(&self) -> &FrequencyResponse {
        &self.response
    }

    pub fn frequencies(&self) -> &[f64] {
        self.response.frequencies()
    }

    /// Magnitudes in dB
    pub fn magnitudes(&self) -> &[f64] {
        self.response.magnitudes()
    }

    /// Where the reference capture came from, if known
    pub fn source_ref(&self) -> Option<&str> {
        self.source_ref.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let response = FrequencyResponse::new(vec![100.0, 1000.0], vec![-3.0, 0.0]).unwrap();
        let profile = DeviceProfile::new("studio monitors", response, Some("monitors.wav".into()));

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["name"], "studio monitors");
        assert_eq!(json["frequencies"], serde_json::json!([100.0, 1000.0]));
        assert_eq!(json["magnitudes"], serde_json::json!([-3.0, 0.0]));
        assert_eq!(json["source_ref"], "monitors.wav");

        let back: DeviceProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }
}
