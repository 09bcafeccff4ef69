//! Spectral analysis with FFT

pub mod analysis;
pub mod fft;
pub mod windowing;

pub use analysis::{AnalyzerConfig, FrequencyAnalyzer};
pub use fft::{FftEngine, RealFftEngine};
pub use windowing::{generate_window, WindowType};
