//! Device EQ Core - Frequency-Response Analysis and Device Equalization
//!
//! Profiles a source and a target playback device from reference captures,
//! derives the per-frequency EQ curve between them and applies it to audio.
//! Python bindings are available behind the `python` feature.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod audio;
pub mod config;
pub mod curve;
pub mod equalizer;
pub mod error;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use audio::{AudioBuffer, AudioSource};
pub use config::{EngineConfig, ProfileStore};
pub use curve::FrequencyResponse;
pub use equalizer::{DeviceComparison, DeviceEqualizer, DeviceProfile, EqCurve};
pub use error::{EqError, Result};
pub use spectrum::{AnalyzerConfig, FrequencyAnalyzer};
