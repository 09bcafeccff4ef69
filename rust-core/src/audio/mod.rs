//! Decoded audio input and sample-rate conversion

pub mod buffer;
pub mod resample;

pub use buffer::{AudioBuffer, AudioSource, FileSource};
pub use resample::resample;
