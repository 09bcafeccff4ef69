//! Sample-rate conversion of whole buffers
//!
//! Captures arrive at whatever rate the host decoded them at; analysis always
//! runs at the analyzer's configured rate.

use rubato::{FftFixedIn, Resampler};

use super::buffer::AudioBuffer;
use crate::error::{EqError, Result};

/// Input block size fed to the FFT resampler
const RESAMPLER_CHUNK: usize = 1024;

/// Resample a buffer to `target_rate`
///
/// Returns the buffer unchanged when the rates already agree. The output holds
/// `ceil(len * target_rate / source_rate)` samples with the resampler's
/// latency removed.
pub fn resample(buffer: &AudioBuffer, target_rate: u32) -> Result<AudioBuffer> {
    if target_rate == 0 {
        return Err(EqError::InvalidSampleRate(target_rate));
    }
    if buffer.sample_rate() == target_rate {
        return Ok(buffer.clone());
    }

    let samples = buffer.samples();
    let ratio = target_rate as f64 / buffer.sample_rate() as f64;
    let expected = (samples.len() as f64 * ratio).ceil() as usize;

    if samples.is_empty() {
        return AudioBuffer::new(Vec::new(), target_rate);
    }

    log::debug!(
        "Resampling {} samples from {} Hz to {} Hz",
        samples.len(),
        buffer.sample_rate(),
        target_rate
    );

    let mut resampler = FftFixedIn::<f64>::new(
        buffer.sample_rate() as usize,
        target_rate as usize,
        RESAMPLER_CHUNK,
        2,
        1,
    )
    .map_err(|e| EqError::Resample(e.to_string()))?;

    let delay = resampler.output_delay();
    let mut output: Vec<f64> = Vec::with_capacity(expected + delay);
    let mut pos = 0;

    while samples.len() - pos >= resampler.input_frames_next() {
        let take = resampler.input_frames_next();
        let block_in: [&[f64]; 1] = [&samples[pos..pos + take]];
        let block = resampler
            .process(&block_in[..], None)
            .map_err(|e| EqError::Resample(e.to_string()))?;
        output.extend_from_slice(&block[0]);
        pos += take;
    }

    if pos < samples.len() {
        let tail: [&[f64]; 1] = [&samples[pos..]];
        let block = resampler
            .process_partial(Some(&tail[..]), None)
            .map_err(|e| EqError::Resample(e.to_string()))?;
        output.extend_from_slice(&block[0]);
    }

    // Flush the resampler's internal latency
    while output.len() < expected + delay {
        let block = resampler
            .process_partial(None::<&[&[f64]]>, None)
            .map_err(|e| EqError::Resample(e.to_string()))?;
        if block[0].is_empty() {
            break;
        }
        output.extend_from_slice(&block[0]);
    }

    output.drain(..delay.min(output.len()));
    output.resize(expected, 0.0);

    AudioBuffer::new(output, target_rate)
}
