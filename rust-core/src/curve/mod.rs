//! Curve utilities: dB conversion, smoothing, normalization, interpolation

pub mod db;
pub mod interpolate;
pub mod response;
pub mod smoothing;

pub use db::{db_to_gain, magnitude_to_db};
pub use interpolate::interpolate;
pub use response::FrequencyResponse;
pub use smoothing::{normalize, smooth, DEFAULT_SMOOTHING_WINDOW};
