//! Error types shared by the analysis and equalization pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EqError {
    #[error("Failed to decode audio from {path}: {cause}")]
    Decode { path: PathBuf, cause: String },

    #[error("Precondition not met: {0}")]
    Precondition(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Frequency axis has {frequencies} points but magnitude curve has {magnitudes}")]
    LengthMismatch { frequencies: usize, magnitudes: usize },

    #[error("Sample rate must be positive (got {0} Hz)")]
    InvalidSampleRate(u32),

    #[error("Spectral transform failed: {0}")]
    Transform(String),

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("Configuration error in {path}: {cause}")]
    Config { path: PathBuf, cause: String },
}

impl EqError {
    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        EqError::Precondition(msg.into())
    }

    pub(crate) fn empty_input(msg: impl Into<String>) -> Self {
        EqError::EmptyInput(msg.into())
    }

    pub(crate) fn config(path: impl Into<PathBuf>, cause: impl ToString) -> Self {
        EqError::Config {
            path: path.into(),
            cause: cause.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EqError>;
