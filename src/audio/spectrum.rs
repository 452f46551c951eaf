use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

use super::decode::Waveform;

/// Magnitude short-time spectrum, one column per frame.
///
/// Frames are centered: the signal is zero-padded by half a window on both
/// sides and frame `t` is centered on sample `t * hop_size`, so there are
/// `1 + len / hop_size` frames.
#[derive(Clone, Debug)]
pub struct Spectrogram {
    frames: Vec<Vec<f32>>,
    num_bins: usize,
    window_size: usize,
    hop_size: usize,
    sample_rate: f32,
}

impl Spectrogram {
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Magnitudes of frame `t`, indexed by bin.
    pub fn frame(&self, t: usize) -> &[f32] {
        &self.frames[t]
    }

    pub fn frames(&self) -> impl Iterator<Item = &[f32]> {
        self.frames.iter().map(|f| f.as_slice())
    }

    /// Center frequency of bin `k` in Hz.
    pub fn bin_frequency(&self, k: usize) -> f32 {
        k as f32 * self.sample_rate / self.window_size as f32
    }
}

/// Compute the magnitude STFT of a waveform.
pub fn stft(waveform: &Waveform, window_size: usize, hop_size: usize) -> Spectrogram {
    let samples = &waveform.samples;
    let half_window = window_size / 2;
    let num_bins = window_size / 2 + 1;
    let num_frames = 1 + samples.len() / hop_size;

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(window_size);
    let hann = hann_window(window_size);

    let frames: Vec<Vec<f32>> = (0..num_frames)
        .into_par_iter()
        .map(|t| {
            let mut buffer = vec![Complex::new(0.0f32, 0.0); window_size];

            // Padded position p maps to sample p - half_window.
            let start = t * hop_size;
            for (i, slot) in buffer.iter_mut().enumerate() {
                let p = start + i;
                if p >= half_window && p - half_window < samples.len() {
                    *slot = Complex::new(samples[p - half_window] * hann[i], 0.0);
                }
            }

            fft.process(&mut buffer);
            buffer[..num_bins].iter().map(|c| c.norm()).collect()
        })
        .collect();

    log::debug!(
        "STFT: {} frames x {} bins (window={}, hop={}, {:.1}Hz)",
        num_frames,
        num_bins,
        window_size,
        hop_size,
        waveform.sample_rate
    );

    Spectrogram {
        frames,
        num_bins,
        window_size,
        hop_size,
        sample_rate: waveform.sample_rate,
    }
}

/// Periodic Hann window.
fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_follows_centered_convention() {
        let w = Waveform::new(vec![0.0; 10_000], 8000.0).unwrap();
        let spec = stft(&w, 1024, 256);
        assert_eq!(spec.num_frames(), 1 + 10_000 / 256);
        assert_eq!(spec.num_bins(), 513);
    }

    #[test]
    fn peak_bin_matches_tone_frequency() {
        let sr = 8000.0;
        let freq = 1000.0;
        let samples = (0..16_000)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sr).sin())
            .collect();
        let w = Waveform::new(samples, sr).unwrap();
        let spec = stft(&w, 2048, 512);

        let mid = spec.frame(spec.num_frames() / 2);
        let (peak_bin, _) = mid
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |best, (k, &m)| if m > best.1 { (k, m) } else { best });
        assert!((spec.bin_frequency(peak_bin) - freq).abs() < sr / 2048.0);
    }

    #[test]
    fn magnitudes_are_non_negative() {
        let samples = (0..5000).map(|i| ((i * 7919) % 101) as f32 / 50.0 - 1.0).collect();
        let w = Waveform::new(samples, 8000.0).unwrap();
        let spec = stft(&w, 512, 128);
        assert!(spec.frames().all(|f| f.iter().all(|&m| m >= 0.0)));
    }

    #[test]
    fn periodic_hann_starts_at_zero() {
        let w = hann_window(8);
        assert_eq!(w[0], 0.0);
        assert!((w[4] - 1.0).abs() < 1e-6);
    }
}
