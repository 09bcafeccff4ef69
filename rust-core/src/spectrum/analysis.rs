//! Averaged frequency-response analysis of a whole capture
//!
//! The capture is cut into back-to-back chunks, each chunk is windowed and
//! transformed, and the per-chunk dB spectra are averaged.

use ndarray::{Array2, ArrayView1, Axis};
use std::borrow::Cow;

use super::fft::{bin_frequencies, FftEngine};
use super::windowing::{apply_window_into, generate_window, WindowType};
use crate::audio::{resample, AudioBuffer, AudioSource};
use crate::curve::{magnitude_to_db, FrequencyResponse, DEFAULT_SMOOTHING_WINDOW};
use crate::error::{EqError, Result};

/// Frequency-response analyzer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Analysis sample rate in Hz; captures at other rates are resampled
    pub sample_rate: u32,

    /// Chunk (FFT) length in samples; odd values are rounded up
    pub chunk_size: usize,

    /// Taper applied to each chunk
    pub window_type: WindowType,

    /// Moving-average width used by `get_frequency_response_curve`
    pub smoothing_window: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            chunk_size: 1024,
            window_type: WindowType::Hann,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
        }
    }
}

impl AnalyzerConfig {
    /// Chunk length actually used (next even value)
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size + self.chunk_size % 2
    }
}

/// Capture-to-curve analyzer
pub struct FrequencyAnalyzer {
    config: AnalyzerConfig,
    chunk_size: usize,
    window: Vec<f64>,
    fft_engine: FftEngine,
    scratch: Vec<f64>,
}

impl FrequencyAnalyzer {
    /// Create a new analyzer
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        if config.sample_rate == 0 {
            return Err(EqError::InvalidSampleRate(config.sample_rate));
        }
        if config.chunk_size == 0 {
            return Err(EqError::empty_input("analysis chunk size must be positive"));
        }

        let chunk_size = config.effective_chunk_size();
        Ok(Self {
            window: generate_window(config.window_type, chunk_size),
            fft_engine: FftEngine::new(chunk_size),
            scratch: vec![0.0; chunk_size],
            chunk_size,
            config,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Chunk length after even rounding
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of frequency bins in every response (`chunk_size / 2`)
    pub fn num_bins(&self) -> usize {
        self.chunk_size / 2
    }

    /// Bin frequencies in Hz, starting at 0
    pub fn frequency_axis(&self) -> Vec<f64> {
        bin_frequencies(self.chunk_size, self.config.sample_rate, self.num_bins())
    }

    /// Average dB spectrum of a capture
    ///
    /// Chunks do not overlap and a trailing partial chunk is dropped. dB values
    /// are averaged directly (not via linear power). A capture shorter than one
    /// chunk yields an all-zero curve.
    pub fn analyze(&mut self, buffer: &AudioBuffer) -> Result<FrequencyResponse> {
        let buffer = if buffer.sample_rate() == self.config.sample_rate {
            Cow::Borrowed(buffer)
        } else {
            Cow::Owned(resample(buffer, self.config.sample_rate)?)
        };

        let bins = self.num_bins();
        let frequencies = self.frequency_axis();
        let chunks = buffer.samples().chunks_exact(self.chunk_size);
        let num_chunks = chunks.len();

        if num_chunks == 0 {
            log::warn!(
                "Capture of {} samples is shorter than one {}-sample chunk; returning flat response",
                buffer.len(),
                self.chunk_size
            );
            return FrequencyResponse::new(frequencies, vec![0.0; bins]);
        }

        let mut db_rows = Array2::<f64>::zeros((num_chunks, bins));
        for (mut row, chunk) in db_rows.axis_iter_mut(Axis(0)).zip(chunks) {
            apply_window_into(chunk, &self.window, &mut self.scratch);
            let db: Vec<f64> = self
                .fft_engine
                .compute_magnitude(&self.scratch, bins)
                .into_iter()
                .map(magnitude_to_db)
                .collect();
            row.assign(&ArrayView1::from(&db[..]));
        }

        let magnitudes = db_rows
            .mean_axis(Axis(0))
            .map(|mean| mean.to_vec())
            .unwrap_or_else(|| vec![0.0; bins]);

        log::debug!(
            "Analyzed {} chunks of {} samples at {} Hz",
            num_chunks,
            self.chunk_size,
            self.config.sample_rate
        );

        FrequencyResponse::new(frequencies, magnitudes)
    }

    /// Decode `source` and analyze it
    pub fn analyze_source(&mut self, source: &dyn AudioSource) -> Result<FrequencyResponse> {
        let buffer = source.decode()?;
        self.analyze(&buffer)
    }

    /// Analyze and optionally smooth with the configured moving-average width
    pub fn get_frequency_response_curve(
        &mut self,
        buffer: &AudioBuffer,
        smooth: bool,
    ) -> Result<FrequencyResponse> {
        let response = self.analyze(buffer)?;
        if smooth {
            response.smoothed(self.config.smoothing_window)
        } else {
            Ok(response)
        }
    }
}
