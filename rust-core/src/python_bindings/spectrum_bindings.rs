//! Python bindings for frequency-response analysis

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::audio::AudioBuffer;
use crate::curve;
use crate::spectrum::{AnalyzerConfig, FrequencyAnalyzer, WindowType};

/// Window type enum exposed to Python
#[pyclass(name = "WindowType")]
#[derive(Clone)]
pub enum PyWindowType {
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl From<PyWindowType> for WindowType {
    fn from(py_win: PyWindowType) -> Self {
        match py_win {
            PyWindowType::Hann => WindowType::Hann,
            PyWindowType::Hamming => WindowType::Hamming,
            PyWindowType::Blackman => WindowType::Blackman,
            PyWindowType::Rectangular => WindowType::Rectangular,
        }
    }
}

pub(super) fn readonly_slice<'a>(array: &'a PyReadonlyArray1<f64>) -> PyResult<&'a [f64]> {
    array
        .as_slice()
        .map_err(|e| PyValueError::new_err(format!("expected a contiguous array: {}", e)))
}

type Curve<'py> = (&'py PyArray1<f64>, &'py PyArray1<f64>);

/// Frequency-response analyzer exposed to Python
#[pyclass(name = "FrequencyAnalyzer")]
pub struct PyFrequencyAnalyzer {
    analyzer: FrequencyAnalyzer,
}

#[pymethods]
impl PyFrequencyAnalyzer {
    /// Create a new analyzer
    ///
    /// Args:
    ///     sample_rate: Analysis sample rate in Hz
    ///     chunk_size: Chunk (FFT) length; odd values are rounded up
    ///     window_type: Taper applied to each chunk
    ///     smoothing_window: Moving-average width for smoothed curves
    #[new]
    #[pyo3(signature = (sample_rate=44100, chunk_size=1024, window_type=PyWindowType::Hann, smoothing_window=5))]
    fn new(
        sample_rate: u32,
        chunk_size: usize,
        window_type: PyWindowType,
        smoothing_window: usize,
    ) -> PyResult<Self> {
        let config = AnalyzerConfig {
            sample_rate,
            chunk_size,
            window_type: window_type.into(),
            smoothing_window,
        };

        Ok(Self {
            analyzer: FrequencyAnalyzer::new(config)?,
        })
    }

    /// Average dB spectrum of a capture
    ///
    /// Args:
    ///     samples: Mono samples as numpy array
    ///     sample_rate: Rate of `samples` in Hz
    ///
    /// Returns:
    ///     Tuple of (frequencies, magnitudes_db)
    fn analyze<'py>(
        &mut self,
        py: Python<'py>,
        samples: PyReadonlyArray1<f64>,
        sample_rate: u32,
    ) -> PyResult<Curve<'py>> {
        let buffer = AudioBuffer::new(readonly_slice(&samples)?.to_vec(), sample_rate)?;
        let (freqs, mags) = self.analyzer.analyze(&buffer)?.into_parts();

        Ok((PyArray1::from_vec(py, freqs), PyArray1::from_vec(py, mags)))
    }

    /// Analyze and optionally smooth
    #[pyo3(signature = (samples, sample_rate, smooth=true))]
    fn get_frequency_response_curve<'py>(
        &mut self,
        py: Python<'py>,
        samples: PyReadonlyArray1<f64>,
        sample_rate: u32,
        smooth: bool,
    ) -> PyResult<Curve<'py>> {
        let buffer = AudioBuffer::new(readonly_slice(&samples)?.to_vec(), sample_rate)?;
        let (freqs, mags) = self
            .analyzer
            .get_frequency_response_curve(&buffer, smooth)?
            .into_parts();

        Ok((PyArray1::from_vec(py, freqs), PyArray1::from_vec(py, mags)))
    }

    /// Get frequency bins in Hz
    fn frequency_bins_hz<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.analyzer.frequency_axis())
    }

    /// Get number of frequency bins
    fn num_bins(&self) -> usize {
        self.analyzer.num_bins()
    }

    /// Get current sample rate
    fn get_sample_rate(&self) -> u32 {
        self.analyzer.config().sample_rate
    }

    /// Get effective chunk size
    fn get_chunk_size(&self) -> usize {
        self.analyzer.chunk_size()
    }
}

/// Centered moving average with zero-padded edges
#[pyfunction]
#[pyo3(signature = (curve, window=5))]
pub fn smooth<'py>(
    py: Python<'py>,
    curve: PyReadonlyArray1<f64>,
    window: usize,
) -> PyResult<&'py PyArray1<f64>> {
    let smoothed = curve::smooth(readonly_slice(&curve)?, window)?;
    Ok(PyArray1::from_vec(py, smoothed))
}

/// Shift a dB curve so its peak is 0 dB
#[pyfunction]
pub fn normalize<'py>(py: Python<'py>, curve: PyReadonlyArray1<f64>) -> PyResult<&'py PyArray1<f64>> {
    let normalized = curve::normalize(readonly_slice(&curve)?)?;
    Ok(PyArray1::from_vec(py, normalized))
}
