//! Source/target device equalizer session

use serde::Serialize;

use super::eq_curve::EqCurve;
use super::profile::DeviceProfile;
use crate::audio::AudioSource;
use crate::config::EngineConfig;
use crate::error::{EqError, Result};
use crate::spectrum::{AnalyzerConfig, FrequencyAnalyzer};

/// Lifecycle of an equalizer session
///
/// Either slot may be (re)assigned in any state. Reassigning a slot after the
/// curve was computed keeps the old curve, marked stale, until
/// `calculate_eq_curve` runs again.
#[derive(Debug, Clone, Default)]
pub enum EqualizerState {
    #[default]
    Empty,
    SourceSet {
        source: DeviceProfile,
    },
    TargetSet {
        target: DeviceProfile,
    },
    SourceAndTargetSet {
        source: DeviceProfile,
        target: DeviceProfile,
    },
    CurveComputed {
        source: DeviceProfile,
        target: DeviceProfile,
        curve: EqCurve,
        stale: bool,
    },
}

impl EqualizerState {
    fn source(&self) -> Option<&DeviceProfile> {
        match self {
            EqualizerState::SourceSet { source }
            | EqualizerState::SourceAndTargetSet { source, .. }
            | EqualizerState::CurveComputed { source, .. } => Some(source),
            _ => None,
        }
    }

    fn target(&self) -> Option<&DeviceProfile> {
        match self {
            EqualizerState::TargetSet { target }
            | EqualizerState::SourceAndTargetSet { target, .. }
            | EqualizerState::CurveComputed { target, .. } => Some(target),
            _ => None,
        }
    }

    fn with_source(self, source: DeviceProfile) -> Self {
        match self {
            EqualizerState::Empty | EqualizerState::SourceSet { .. } => {
                EqualizerState::SourceSet { source }
            }
            EqualizerState::TargetSet { target }
            | EqualizerState::SourceAndTargetSet { target, .. } => {
                EqualizerState::SourceAndTargetSet { source, target }
            }
            EqualizerState::CurveComputed { target, curve, .. } => EqualizerState::CurveComputed {
                source,
                target,
                curve,
                stale: true,
            },
        }
    }

    fn with_target(self, target: DeviceProfile) -> Self {
        match self {
            EqualizerState::Empty | EqualizerState::TargetSet { .. } => {
                EqualizerState::TargetSet { target }
            }
            EqualizerState::SourceSet { source }
            | EqualizerState::SourceAndTargetSet { source, .. } => {
                EqualizerState::SourceAndTargetSet { source, target }
            }
            EqualizerState::CurveComputed { source, curve, .. } => EqualizerState::CurveComputed {
                source,
                target,
                curve,
                stale: true,
            },
        }
    }

    fn name(&self) -> &'static str {
        match self {
            EqualizerState::Empty => "Empty",
            EqualizerState::SourceSet { .. } => "SourceSet",
            EqualizerState::TargetSet { .. } => "TargetSet",
            EqualizerState::SourceAndTargetSet { .. } => "SourceAndTargetSet",
            EqualizerState::CurveComputed { .. } => "CurveComputed",
        }
    }
}

/// Side-by-side view of both devices and the current curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceComparison {
    pub source_name: String,
    pub source_frequencies: Vec<f64>,
    pub source_curve: Vec<f64>,
    pub target_name: String,
    pub target_frequencies: Vec<f64>,
    pub target_curve: Vec<f64>,
    pub eq_curve: Option<Vec<f64>>,
}

/// Builds device profiles, derives the EQ curve between them and applies it
pub struct DeviceEqualizer {
    analyzer: FrequencyAnalyzer,
    normalize_profiles: bool,
    state: EqualizerState,
}

impl DeviceEqualizer {
    /// Equalizer with the default analyzer (44.1 kHz, 1024-sample chunks)
    pub fn new() -> Result<Self> {
        Ok(Self::with_analyzer(FrequencyAnalyzer::new(AnalyzerConfig::default())?))
    }

    pub fn with_analyzer(analyzer: FrequencyAnalyzer) -> Self {
        Self {
            analyzer,
            normalize_profiles: true,
            state: EqualizerState::Empty,
        }
    }

    /// Equalizer configured from persisted engine settings
    pub fn with_config(config: &EngineConfig) -> Result<Self> {
        let analyzer = FrequencyAnalyzer::new(config.analyzer.to_analyzer_config())?;
        let mut equalizer = Self::with_analyzer(analyzer);
        equalizer.normalize_profiles = config.emulation.auto_normalize;
        Ok(equalizer)
    }

    pub fn analyzer(&self) -> &FrequencyAnalyzer {
        &self.analyzer
    }

    pub fn state(&self) -> &EqualizerState {
        &self.state
    }

    /// Analyze a reference capture into a profile
    ///
    /// The response is smoothed, then shifted so its peak is 0 dB (unless
    /// normalization was disabled in the engine configuration).
    pub fn load_device_profile(
        &mut self,
        source: &dyn AudioSource,
        device_name: &str,
    ) -> Result<DeviceProfile> {
        let buffer = source.decode()?;
        let mut response = self.analyzer.get_frequency_response_curve(&buffer, true)?;
        if self.normalize_profiles {
            response = response.normalized()?;
        }

        Ok(DeviceProfile::new(device_name, response, source.source_ref()))
    }

    /// Profile the device being played through
    pub fn set_source_device(&mut self, source: &dyn AudioSource, device_name: &str) -> Result<()> {
        let profile = self.load_device_profile(source, device_name)?;
        self.set_source_profile(profile);
        Ok(())
    }

    /// Profile the device to emulate
    pub fn set_target_device(&mut self, source: &dyn AudioSource, device_name: &str) -> Result<()> {
        let profile = self.load_device_profile(source, device_name)?;
        self.set_target_profile(profile);
        Ok(())
    }

    /// Install an already-built source profile (e.g. from the profile store)
    pub fn set_source_profile(&mut self, profile: DeviceProfile) {
        log::info!("Source device set to '{}'", profile.name());
        let state = std::mem::take(&mut self.state);
        self.state = state.with_source(profile);
    }

    /// Install an already-built target profile
    pub fn set_target_profile(&mut self, profile: DeviceProfile) {
        log::info!("Target device set to '{}'", profile.name());
        let state = std::mem::take(&mut self.state);
        self.state = state.with_target(profile);
    }

    pub fn source_profile(&self) -> Option<&DeviceProfile> {
        self.state.source()
    }

    pub fn target_profile(&self) -> Option<&DeviceProfile> {
        self.state.target()
    }

    /// Derive `target - source` on the target's frequency axis
    pub fn calculate_eq_curve(&mut self) -> Result<&EqCurve> {
        let (source, target) = match (self.state.source(), self.state.target()) {
            (Some(source), Some(target)) => (source, target),
            _ => {
                return Err(EqError::precondition(format!(
                    "both source and target devices must be set before calculating the EQ curve (state: {})",
                    self.state.name()
                )))
            }
        };

        let curve = EqCurve::between(source, target)?;
        log::info!(
            "Computed {}-point EQ curve from '{}' to '{}'",
            curve.len(),
            source.name(),
            target.name()
        );

        self.state = match std::mem::take(&mut self.state) {
            EqualizerState::SourceAndTargetSet { source, target }
            | EqualizerState::CurveComputed { source, target, .. } => EqualizerState::CurveComputed {
                source,
                target,
                curve,
                stale: false,
            },
            other => other,
        };

        self.eq_curve()
            .ok_or_else(|| EqError::precondition("EQ curve could not be stored"))
    }

    /// The most recently computed curve, possibly stale
    pub fn eq_curve(&self) -> Option<&EqCurve> {
        match &self.state {
            EqualizerState::CurveComputed { curve, .. } => Some(curve),
            _ => None,
        }
    }

    /// True when a slot was reassigned after the curve was computed
    pub fn is_curve_stale(&self) -> bool {
        matches!(self.state, EqualizerState::CurveComputed { stale: true, .. })
    }

    /// Apply the computed curve to a signal (zero-phase resynthesis)
    pub fn apply_eq_to_audio(&self, signal: &[f64], sample_rate: u32) -> Result<Vec<f64>> {
        match &self.state {
            EqualizerState::CurveComputed { curve, stale, .. } => {
                if *stale {
                    log::warn!("Applying an EQ curve computed before the last device change");
                }
                curve.apply(signal, sample_rate)
            }
            other => Err(EqError::precondition(format!(
                "EQ curve must be calculated before applying it to audio (state: {})",
                other.name()
            ))),
        }
    }

    /// Both device curves plus the current EQ curve, for reporting
    pub fn get_device_comparison(&self) -> Result<DeviceComparison> {
        let (source, target) = match (self.state.source(), self.state.target()) {
            (Some(source), Some(target)) => (source, target),
            _ => {
                return Err(EqError::precondition(format!(
                    "both devices must be set for comparison (state: {})",
                    self.state.name()
                )))
            }
        };

        Ok(DeviceComparison {
            source_name: source.name().to_string(),
            source_frequencies: source.frequencies().to_vec(),
            source_curve: source.magnitudes().to_vec(),
            target_name: target.name().to_string(),
            target_frequencies: target.frequencies().to_vec(),
            target_curve: target.magnitudes().to_vec(),
            eq_curve: self.eq_curve().map(|c| c.gains_db().to_vec()),
        })
    }
}
