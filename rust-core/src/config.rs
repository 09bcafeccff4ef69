//! Engine configuration and persisted device-profile store
//!
//! Stored as a single JSON document:
//!
//! ```json
//! {
//!   "analyzer": { "sample_rate": 44100, "chunk_size": 1024 },
//!   "emulation": { "source_device": null, "target_device": null, "auto_normalize": true },
//!   "devices": { "<name>": { "name": ..., "frequencies": [...], "magnitudes": [...], "source_path": ... } }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::curve::FrequencyResponse;
use crate::equalizer::DeviceProfile;
use crate::error::{EqError, Result};
use crate::spectrum::AnalyzerConfig;

/// Analyzer settings as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// Analysis sample rate (Hz)
    pub sample_rate: u32,
    /// FFT chunk length (samples)
    pub chunk_size: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        let defaults = AnalyzerConfig::default();
        Self {
            sample_rate: defaults.sample_rate,
            chunk_size: defaults.chunk_size,
        }
    }
}

impl AnalyzerSettings {
    pub fn to_analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            sample_rate: self.sample_rate,
            chunk_size: self.chunk_size,
            ..AnalyzerConfig::default()
        }
    }
}

/// Which stored devices the host last paired, and how profiles are built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulationSettings {
    pub source_device: Option<String>,
    pub target_device: Option<String>,
    /// Shift every new profile to a 0 dB peak
    pub auto_normalize: bool,
}

impl Default for EmulationSettings {
    fn default() -> Self {
        Self {
            source_device: None,
            target_device: None,
            auto_normalize: true,
        }
    }
}

/// Persisted form of a device profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    pub name: String,
    pub frequencies: Vec<f64>,
    pub magnitudes: Vec<f64>,
    #[serde(default)]
    pub source_path: Option<String>,
}

impl From<&DeviceProfile> for StoredProfile {
    fn from(profile: &DeviceProfile) -> Self {
        Self {
            name: profile.name().to_string(),
            frequencies: profile.frequencies().to_vec(),
            magnitudes: profile.magnitudes().to_vec(),
            source_path: profile.source_ref().map(str::to_string),
        }
    }
}

impl TryFrom<StoredProfile> for DeviceProfile {
    type Error = EqError;

    fn try_from(stored: StoredProfile) -> Result<Self> {
        let response = FrequencyResponse::new(stored.frequencies, stored.magnitudes)?;
        Ok(DeviceProfile::new(stored.name, response, stored.source_path))
    }
}

/// Whole configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub analyzer: AnalyzerSettings,
    pub emulation: EmulationSettings,
    pub devices: BTreeMap<String, StoredProfile>,
}

/// JSON-backed configuration with a device-profile library
pub struct ProfileStore {
    path: PathBuf,
    config: EngineConfig,
}

impl ProfileStore {
    /// Load the store at `path`
    ///
    /// A missing file is created with default settings. A file that exists but
    /// does not parse is an error; it is never overwritten.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            log::info!("No configuration at {}; writing defaults", path.display());
            let store = Self {
                path,
                config: EngineConfig::default(),
            };
            store.save()?;
            return Ok(store);
        }

        let text = fs::read_to_string(&path).map_err(|e| EqError::config(&path, e))?;
        let config: EngineConfig =
            serde_json::from_str(&text).map_err(|e| EqError::config(&path, e))?;

        log::debug!(
            "Loaded configuration from {} ({} stored devices)",
            path.display(),
            config.devices.len()
        );

        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the analyzer settings (not persisted until `save`)
    pub fn set_analyzer(&mut self, analyzer: AnalyzerSettings) {
        self.config.analyzer = analyzer;
    }

    /// Replace the emulation settings (not persisted until `save`)
    pub fn set_emulation(&mut self, emulation: EmulationSettings) {
        self.config.emulation = emulation;
    }

    /// Write the current configuration to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| EqError::config(&self.path, e))?;
        }

        let text = serde_json::to_string_pretty(&self.config)
            .map_err(|e| EqError::config(&self.path, e))?;
        fs::write(&self.path, text).map_err(|e| EqError::config(&self.path, e))?;

        Ok(())
    }

    /// Store a profile under its name, replacing any previous entry, and save
    pub fn add_device(&mut self, profile: &DeviceProfile) -> Result<()> {
        self.config
            .devices
            .insert(profile.name().to_string(), StoredProfile::from(profile));
        log::info!("Stored profile '{}' in {}", profile.name(), self.path.display());
        self.save()
    }

    /// Look up a stored profile by name
    pub fn get_device(&self, name: &str) -> Result<Option<DeviceProfile>> {
        self.config
            .devices
            .get(name)
            .cloned()
            .map(DeviceProfile::try_from)
            .transpose()
    }

    /// Names of every stored device, sorted
    pub fn list_devices(&self) -> Vec<&str> {
        self.config.devices.keys().map(String::as_str).collect()
    }

    /// Delete a stored profile; returns whether it existed
    pub fn remove_device(&mut self, name: &str) -> Result<bool> {
        let removed = self.config.devices.remove(name).is_some();
        if removed {
            self.save()?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> DeviceProfile {
        let response = FrequencyResponse::new(vec![0.0, 100.0, 200.0], vec![-1.0, 0.0, -4.5]).unwrap();
        DeviceProfile::new(name, response, Some(format!("{}.wav", name)))
    }

    #[test]
    fn test_missing_file_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("config.json");

        let store = ProfileStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.config(), &EngineConfig::default());
        assert_eq!(store.config().analyzer.sample_rate, 44100);
        assert_eq!(store.config().analyzer.chunk_size, 1024);
        assert!(store.config().emulation.auto_normalize);
    }

    #[test]
    fn test_invalid_json_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(ProfileStore::open(&path), Err(EqError::Config { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "analyzer": { "chunk_size": 2048 }, "room_settings": {} }"#).unwrap();

        let store = ProfileStore::open(&path).unwrap();
        assert_eq!(store.config().analyzer.chunk_size, 2048);
        assert_eq!(store.config().analyzer.sample_rate, 44100);
        assert!(store.config().devices.is_empty());
    }

    #[test]
    fn test_devices_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        {
            let mut store = ProfileStore::open(&path).unwrap();
            store.add_device(&profile("speaker")).unwrap();
            store.add_device(&profile("earbuds")).unwrap();
        }

        let store = ProfileStore::open(&path).unwrap();
        assert_eq!(store.list_devices(), vec!["earbuds", "speaker"]);

        let loaded = store.get_device("speaker").unwrap().unwrap();
        assert_eq!(loaded, profile("speaker"));
        assert_eq!(loaded.source_ref(), Some("speaker.wav"));
        assert!(store.get_device("headphones").unwrap().is_none());
    }

    #[test]
    fn test_remove_device() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut store = ProfileStore::open(&path).unwrap();
        store.add_device(&profile("speaker")).unwrap();

        assert!(store.remove_device("speaker").unwrap());
        assert!(!store.remove_device("speaker").unwrap());

        let reopened = ProfileStore::open(&path).unwrap();
        assert!(reopened.list_devices().is_empty());
    }

    #[test]
    fn test_corrupt_stored_profile_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "devices": { "bad": { "name": "bad", "frequencies": [0.0, 1.0], "magnitudes": [0.0] } } }"#,
        )
        .unwrap();

        let store = ProfileStore::open(&path).unwrap();
        assert!(matches!(
            store.get_device("bad"),
            Err(EqError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_settings_feed_equalizer() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::open(dir.path().join("config.json")).unwrap();
        store.set_analyzer(AnalyzerSettings {
            sample_rate: 8000,
            chunk_size: 255,
        });
        store.set_emulation(EmulationSettings {
            auto_normalize: false,
            ..EmulationSettings::default()
        });
        store.save().unwrap();

        let mut equalizer = crate::equalizer::DeviceEqualizer::with_config(store.config()).unwrap();
        assert_eq!(equalizer.analyzer().config().sample_rate, 8000);
        assert_eq!(equalizer.analyzer().chunk_size(), 256);

        // Without auto-normalization the silent capture keeps its absolute level
        let silence = crate::audio::AudioBuffer::new(vec![0.0; 1024], 8000).unwrap();
        let profile = equalizer.load_device_profile(&silence, "quiet").unwrap();
        assert!(profile.magnitudes()[64] < -170.0);
    }
}
