//! PyO3 bindings for Python integration

use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::error::EqError;

mod equalizer_bindings;
mod spectrum_bindings;

impl From<EqError> for PyErr {
    fn from(err: EqError) -> PyErr {
        match err {
            EqError::Decode { .. } | EqError::Config { .. } => PyIOError::new_err(err.to_string()),
            EqError::Precondition(_) | EqError::Resample(_) | EqError::Transform(_) => {
                PyRuntimeError::new_err(err.to_string())
            }
            EqError::EmptyInput(_) | EqError::LengthMismatch { .. } | EqError::InvalidSampleRate(_) => {
                PyValueError::new_err(err.to_string())
            }
        }
    }
}

/// Python module definition
#[pymodule]
fn device_eq(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<spectrum_bindings::PyFrequencyAnalyzer>()?;
    m.add_class::<equalizer_bindings::PyDeviceEqualizer>()?;

    // Add WindowType enum
    m.add_class::<spectrum_bindings::PyWindowType>()?;

    m.add_function(wrap_pyfunction!(spectrum_bindings::smooth, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::normalize, m)?)?;

    Ok(())
}
