use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::time::Instant;

use crate::audio::chroma::extract_chroma;
use crate::audio::decode::{decode_bytes, decode_file, Waveform};
use crate::audio::resample::{decimate, resample_to};
use crate::audio::smoothing::median_smooth;
use crate::audio::spectrum::stft;
use crate::chords::classify::classify;
use crate::chords::segment::{segment, ChordEvent};
use crate::config::AnalysisConfig;
use crate::error::{ChordError, Result};

/// Pipeline stages, reported to the progress hook as each one starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Downsampling,
    Spectrum,
    Chroma,
    Smoothing,
    Classifying,
    Segmenting,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Loading,
        Stage::Downsampling,
        Stage::Spectrum,
        Stage::Chroma,
        Stage::Smoothing,
        Stage::Classifying,
        Stage::Segmenting,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Loading => "loading audio",
            Stage::Downsampling => "downsampling",
            Stage::Spectrum => "computing spectrum",
            Stage::Chroma => "extracting chroma",
            Stage::Smoothing => "smoothing chroma",
            Stage::Classifying => "classifying frames",
            Stage::Segmenting => "segmenting events",
        };
        f.write_str(label)
    }
}

type ProgressHook = Box<dyn Fn(Stage) + Send + Sync>;

/// Result of one analysis run.
#[derive(Clone, Debug, Serialize)]
pub struct ChordAnalysis {
    pub events: Vec<ChordEvent>,
    /// Template index per frame.
    pub classifications: Vec<usize>,
    pub frame_count: usize,
    /// Seconds between consecutive frames.
    pub frame_seconds: f64,
    /// Duration of the input before downsampling.
    pub duration_seconds: f64,
    /// Rate the spectrum was computed at: the analysis rate after decimation.
    pub sample_rate: f32,
}

impl ChordAnalysis {
    /// Events with `time` converted from track fraction to seconds.
    pub fn events_in_seconds(&self) -> Vec<ChordEvent> {
        self.events
            .iter()
            .map(|e| ChordEvent {
                time: e.frame as f64 * self.frame_seconds,
                ..e.clone()
            })
            .collect()
    }
}

/// Chord recognition pipeline.
///
/// Holds only its configuration and an optional progress hook, so one
/// recognizer can serve concurrent runs on separate threads.
pub struct ChordRecognizer {
    config: AnalysisConfig,
    progress: Option<ProgressHook>,
}

impl ChordRecognizer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            progress: None,
        })
    }

    /// Call `hook` when each stage starts.
    pub fn with_progress<F>(mut self, hook: F) -> Self
    where
        F: Fn(Stage) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(hook));
        self
    }

    pub fn analyze_file(&self, path: &Path) -> Result<ChordAnalysis> {
        self.report(Stage::Loading);
        let waveform = decode_file(path)?;
        let analysis = self.analyze_waveform(&waveform)?;
        log::info!(
            "{}: {} chord events over {:.1}s",
            path.display(),
            analysis.events.len(),
            analysis.duration_seconds
        );
        Ok(analysis)
    }

    pub fn analyze_bytes(&self, bytes: Vec<u8>, extension: Option<&str>) -> Result<ChordAnalysis> {
        self.report(Stage::Loading);
        let waveform = decode_bytes(bytes, extension)?;
        self.analyze_waveform(&waveform)
    }

    /// Run every stage after loading on an in-memory waveform.
    pub fn analyze_waveform(&self, waveform: &Waveform) -> Result<ChordAnalysis> {
        let start = Instant::now();
        let cfg = &self.config;

        if !(waveform.sample_rate.is_finite() && waveform.sample_rate > 0.0) {
            return Err(ChordError::InvalidInput(format!(
                "sample rate must be positive, got {}",
                waveform.sample_rate
            )));
        }

        self.report(Stage::Downsampling);
        let normalized = resample_to(waveform, cfg.sample_rate)?;
        let reduced = decimate(&normalized, cfg.decimation)?;
        if reduced.len() < cfg.window_size {
            return Err(ChordError::EmptyInput {
                samples: reduced.len(),
                required: cfg.window_size,
            });
        }

        self.report(Stage::Spectrum);
        let spectrum = stft(&reduced, cfg.window_size, cfg.hop_size);

        self.report(Stage::Chroma);
        let chroma = extract_chroma(&spectrum, &cfg.chroma_params());

        self.report(Stage::Smoothing);
        let smoothed = median_smooth(&chroma, cfg.median_window);

        self.report(Stage::Classifying);
        let classifications = classify(&smoothed);

        self.report(Stage::Segmenting);
        let events = segment(&classifications);

        log::debug!(
            "Analysis finished in {:.1}ms ({} frames)",
            start.elapsed().as_secs_f64() * 1000.0,
            classifications.len()
        );

        Ok(ChordAnalysis {
            frame_count: classifications.len(),
            frame_seconds: spectrum.hop_size() as f64 / spectrum.sample_rate() as f64,
            duration_seconds: waveform.duration_seconds(),
            sample_rate: reduced.sample_rate,
            events,
            classifications,
        })
    }

    fn report(&self, stage: Stage) {
        log::debug!("Stage: {}", stage);
        if let Some(ref hook) = self.progress {
            hook(stage);
        }
    }
}

/// Recognize chords in a file with the default configuration.
pub fn calculate_chords(path: &Path) -> Result<Vec<ChordEvent>> {
    let recognizer = ChordRecognizer::new(AnalysisConfig::default())?;
    Ok(recognizer.analyze_file(path)?.events)
}
