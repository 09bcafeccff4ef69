//! Decoded mono audio handed to the analyzer
//!
//! Decoding itself belongs to the host application; this crate only sees the
//! resulting samples and their rate.

use std::path::{Path, PathBuf};

use crate::error::{EqError, Result};

/// Mono sample buffer with its sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer
    ///
    /// # Arguments
    /// * `samples` - Mono samples
    /// * `sample_rate` - Sample rate in Hz (must be positive)
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(EqError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

/// Anything that can produce a decoded buffer
pub trait AudioSource {
    /// Produce the decoded buffer
    fn decode(&self) -> Result<AudioBuffer>;

    /// Where the audio came from (file path, URL, ...), if known
    fn source_ref(&self) -> Option<String> {
        None
    }
}

impl AudioSource for AudioBuffer {
    fn decode(&self) -> Result<AudioBuffer> {
        Ok(self.clone())
    }
}

/// File-backed source decoded by a host-supplied function
///
/// Decoder failures are reported as [`EqError::Decode`] carrying the path and
/// the decoder's own message.
pub struct FileSource<F> {
    path: PathBuf,
    decoder: F,
}

impl<F, E> FileSource<F>
where
    F: Fn(&Path) -> std::result::Result<AudioBuffer, E>,
    E: std::fmt::Display,
{
    pub fn new(path: impl Into<PathBuf>, decoder: F) -> Self {
        Self {
            path: path.into(),
            decoder,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<F, E> AudioSource for FileSource<F>
where
    F: Fn(&Path) -> std::result::Result<AudioBuffer, E>,
    E: std::fmt::Display,
{
    fn decode(&self) -> Result<AudioBuffer> {
        (self.decoder)(&self.path).map_err(|e| EqError::Decode {
            path: self.path.clone(),
            cause: e.to_string(),
        })
    }

    fn source_ref(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }
}
