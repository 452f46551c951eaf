use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use super::decode::Waveform;
use crate::error::{ChordError, Result};

/// Length of the sinc anti-aliasing kernel, in input samples.
const SINC_LEN: usize = 256;

fn sinc_params() -> SincInterpolationParameters {
    SincInterpolationParameters {
        sinc_len: SINC_LEN,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    }
}

/// Band-limited resampling of mono audio from `from_rate` to `to_rate`.
///
/// When the rate goes down, rubato scales the sinc cutoff to the new Nyquist
/// frequency, so content above it is removed rather than folded back.
/// The resampler's output delay is trimmed: output sample `m` lines up with
/// input time `m / to_rate`. Output length is `ceil(len * to_rate / from_rate)`.
fn sinc_resample(samples: &[f32], from_rate: f64, to_rate: f64) -> Result<Vec<f32>> {
    let expected = (samples.len() as f64 * to_rate / from_rate).ceil() as usize;
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    // Trailing zeros flush the kernel so the tail survives the delay trim.
    let mut padded = Vec::with_capacity(samples.len() + SINC_LEN);
    padded.extend_from_slice(samples);
    padded.resize(samples.len() + SINC_LEN, 0.0);

    let ratio = to_rate / from_rate;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, sinc_params(), padded.len(), 1)
        .map_err(|e| ChordError::Resample(e.to_string()))?;
    let delay = resampler.output_delay();

    let input = vec![padded];
    let output = resampler
        .process(&input, None)
        .map_err(|e| ChordError::Resample(e.to_string()))?;

    let mut channel = output.into_iter().next().unwrap_or_default();
    channel.drain(..delay.min(channel.len()));
    channel.resize(expected, 0.0);
    Ok(channel)
}

/// Resample to a fixed analysis rate so every input is analyzed with the
/// same frequency resolution and hop duration.
pub fn resample_to(waveform: &Waveform, sample_rate: u32) -> Result<Waveform> {
    let target = sample_rate as f32;
    if waveform.sample_rate == target {
        return Ok(waveform.clone());
    }

    let samples = sinc_resample(&waveform.samples, waveform.sample_rate as f64, target as f64)?;
    log::debug!(
        "Resampled {} -> {} samples ({}Hz -> {}Hz)",
        waveform.len(),
        samples.len(),
        waveform.sample_rate,
        target
    );
    Waveform::new(samples, target)
}

/// Reduce the sample rate by an integer factor.
///
/// The anti-aliasing low-pass runs before samples are dropped, so content
/// above the new Nyquist frequency does not fold into the audible band.
/// Output length is `ceil(len / factor)`.
pub fn decimate(waveform: &Waveform, factor: usize) -> Result<Waveform> {
    if factor <= 1 {
        return Ok(waveform.clone());
    }

    let rate = waveform.sample_rate as f64;
    let reduced_rate = rate / factor as f64;
    let samples = sinc_resample(&waveform.samples, rate, reduced_rate)?;

    log::debug!(
        "Decimated {} -> {} samples ({}Hz -> {}Hz)",
        waveform.len(),
        samples.len(),
        waveform.sample_rate,
        reduced_rate
    );

    Waveform::new(samples, reduced_rate as f32)
}
