//! Pitch-class folding of a magnitude spectrogram.
//!
//! Each spectral bin is assigned to the nearest equal-tempered semitone
//! relative to the tuning frequency, and its magnitude is added to that
//! semitone's pitch class. Octave information is discarded.

use super::spectrum::Spectrogram;

pub const PITCH_CLASSES: usize = 12;

pub const PITCH_CLASS_NAMES: [&str; PITCH_CLASSES] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Pitch class of the tuning reference (A).
const REFERENCE_CLASS: i64 = 9;

/// 12 x frames chroma matrix, stored column-wise.
#[derive(Clone, Debug, PartialEq)]
pub struct Chromagram {
    pub frames: Vec<[f32; PITCH_CLASSES]>,
}

impl Chromagram {
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Energy of pitch class `class` over time.
    pub fn row(&self, class: usize) -> Vec<f32> {
        self.frames.iter().map(|f| f[class]).collect()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ChromaParams {
    pub tuning_frequency: f32,
    pub min_frequency: f32,
    pub max_frequency: f32,
    pub normalize: bool,
}

/// Pitch class (0 = C) of a frequency in Hz.
pub fn pitch_class(freq: f32, tuning_frequency: f32) -> usize {
    let semitones = (12.0 * (freq as f64 / tuning_frequency as f64).log2()).round() as i64;
    (semitones + REFERENCE_CLASS).rem_euclid(PITCH_CLASSES as i64) as usize
}

/// Fold every spectrogram frame into 12 pitch classes.
pub fn extract_chroma(spec: &Spectrogram, params: &ChromaParams) -> Chromagram {
    let nyquist = spec.sample_rate() / 2.0;
    let max_frequency = params.max_frequency.min(nyquist);

    // Computed once: None for bins outside the analysed band.
    let bin_classes: Vec<Option<usize>> = (0..spec.num_bins())
        .map(|k| {
            let freq = spec.bin_frequency(k);
            if k == 0 || freq < params.min_frequency || freq > max_frequency {
                None
            } else {
                Some(pitch_class(freq, params.tuning_frequency))
            }
        })
        .collect();

    let frames = spec
        .frames()
        .map(|magnitudes| {
            let mut chroma = [0.0f32; PITCH_CLASSES];
            for (mag, class) in magnitudes.iter().zip(&bin_classes) {
                if let Some(c) = class {
                    chroma[*c] += mag;
                }
            }
            if params.normalize {
                let max = chroma.iter().copied().fold(0.0f32, f32::max);
                if max > 0.0 {
                    for v in chroma.iter_mut() {
                        *v /= max;
                    }
                }
            }
            chroma
        })
        .collect::<Vec<_>>();

    log::debug!(
        "Chroma: {} frames, band {:.0}-{:.0}Hz, A={}Hz",
        frames.len(),
        params.min_frequency,
        max_frequency,
        params.tuning_frequency
    );

    Chromagram { frames }
}
