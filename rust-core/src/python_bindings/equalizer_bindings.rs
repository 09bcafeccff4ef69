//! Python bindings for the device equalizer

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::spectrum_bindings::readonly_slice;
use crate::audio::{AudioBuffer, AudioSource};
use crate::equalizer::DeviceEqualizer;
use crate::error::Result;
use crate::spectrum::{AnalyzerConfig, FrequencyAnalyzer};

/// Host-decoded buffer tagged with the path it was read from
struct DecodedCapture {
    buffer: AudioBuffer,
    source_path: Option<String>,
}

impl AudioSource for DecodedCapture {
    fn decode(&self) -> Result<AudioBuffer> {
        Ok(self.buffer.clone())
    }

    fn source_ref(&self) -> Option<String> {
        self.source_path.clone()
    }
}

/// Device equalizer exposed to Python
#[pyclass(name = "DeviceEqualizer")]
pub struct PyDeviceEqualizer {
    equalizer: DeviceEqualizer,
}

#[pymethods]
impl PyDeviceEqualizer {
    /// Create a new equalizer session
    ///
    /// Args:
    ///     sample_rate: Analysis sample rate in Hz
    ///     chunk_size: Analysis chunk length
    #[new]
    #[pyo3(signature = (sample_rate=44100, chunk_size=1024))]
    fn new(sample_rate: u32, chunk_size: usize) -> PyResult<Self> {
        let analyzer = FrequencyAnalyzer::new(AnalyzerConfig {
            sample_rate,
            chunk_size,
            ..AnalyzerConfig::default()
        })?;

        Ok(Self {
            equalizer: DeviceEqualizer::with_analyzer(analyzer),
        })
    }

    /// Profile the device being played through
    ///
    /// Args:
    ///     samples: Decoded mono reference capture
    ///     sample_rate: Rate of `samples` in Hz
    ///     device_name: Display name of the device
    ///     source_path: Where the capture was loaded from (optional)
    #[pyo3(signature = (samples, sample_rate, device_name, source_path=None))]
    fn set_source_device(
        &mut self,
        samples: PyReadonlyArray1<f64>,
        sample_rate: u32,
        device_name: &str,
        source_path: Option<String>,
    ) -> PyResult<()> {
        let capture = DecodedCapture {
            buffer: AudioBuffer::new(readonly_slice(&samples)?.to_vec(), sample_rate)?,
            source_path,
        };
        Ok(self.equalizer.set_source_device(&capture, device_name)?)
    }

    /// Profile the device to emulate
    #[pyo3(signature = (samples, sample_rate, device_name, source_path=None))]
    fn set_target_device(
        &mut self,
        samples: PyReadonlyArray1<f64>,
        sample_rate: u32,
        device_name: &str,
        source_path: Option<String>,
    ) -> PyResult<()> {
        let capture = DecodedCapture {
            buffer: AudioBuffer::new(readonly_slice(&samples)?.to_vec(), sample_rate)?,
            source_path,
        };
        Ok(self.equalizer.set_target_device(&capture, device_name)?)
    }

    /// Compute the EQ curve (dB, on the target frequency axis)
    fn calculate_eq_curve<'py>(&mut self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        let curve = self.equalizer.calculate_eq_curve()?;
        Ok(PyArray1::from_slice(py, curve.gains_db()))
    }

    /// Current EQ curve, or None if not calculated
    fn get_eq_curve<'py>(&self, py: Python<'py>) -> Option<&'py PyArray1<f64>> {
        self.equalizer
            .eq_curve()
            .map(|curve| PyArray1::from_slice(py, curve.gains_db()))
    }

    /// Apply the EQ curve to a signal
    ///
    /// The output is resynthesized from the scaled magnitude spectrum with
    /// zero phase.
    fn apply_eq_to_audio<'py>(
        &self,
        py: Python<'py>,
        audio_signal: PyReadonlyArray1<f64>,
        sample_rate: u32,
    ) -> PyResult<&'py PyArray1<f64>> {
        let output = self
            .equalizer
            .apply_eq_to_audio(readonly_slice(&audio_signal)?, sample_rate)?;
        Ok(PyArray1::from_vec(py, output))
    }

    /// Comparison data for visualization
    ///
    /// Returns:
    ///     Dictionary with keys: 'source_name', 'target_name',
    ///     'source_frequencies', 'source_db', 'target_frequencies',
    ///     'target_db', 'eq_curve' (None if not calculated)
    fn get_device_comparison<'py>(&self, py: Python<'py>) -> PyResult<&'py PyDict> {
        let comparison = self.equalizer.get_device_comparison()?;
        let dict = PyDict::new(py);

        dict.set_item("source_name", comparison.source_name)?;
        dict.set_item("target_name", comparison.target_name)?;
        dict.set_item("source_frequencies", PyArray1::from_vec(py, comparison.source_frequencies))?;
        dict.set_item("source_db", PyArray1::from_vec(py, comparison.source_curve))?;
        dict.set_item("target_frequencies", PyArray1::from_vec(py, comparison.target_frequencies))?;
        dict.set_item("target_db", PyArray1::from_vec(py, comparison.target_curve))?;
        dict.set_item(
            "eq_curve",
            comparison.eq_curve.map(|curve| PyArray1::from_vec(py, curve)),
        )?;

        Ok(dict)
    }
}
