use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::audio::chroma::ChromaParams;
use crate::error::{ChordError, Result};

/// Contents of a `chordscan.toml` file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Parameters of the recognition pipeline.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnalysisConfig {
    /// Rate in Hz every input is resampled to before decimation.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Integer sample-rate reduction applied before the STFT.
    #[serde(default = "default_decimation")]
    pub decimation: usize,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_hop_size")]
    pub hop_size: usize,
    /// Median filter length in frames, odd.
    #[serde(default = "default_median_window")]
    pub median_window: usize,
    /// Frequency of A4 in Hz.
    #[serde(default = "default_tuning_frequency")]
    pub tuning_frequency: f32,
    #[serde(default = "default_min_frequency")]
    pub min_frequency: f32,
    #[serde(default = "default_max_frequency")]
    pub max_frequency: f32,
    #[serde(default)]
    pub normalize_chroma: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Fraction of the track, in [0, 1).
    #[default]
    Fraction,
    Seconds,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub time: TimeUnit,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            decimation: default_decimation(),
            window_size: default_window_size(),
            hop_size: default_hop_size(),
            median_window: default_median_window(),
            tuning_frequency: default_tuning_frequency(),
            min_frequency: default_min_frequency(),
            max_frequency: default_max_frequency(),
            normalize_chroma: false,
        }
    }
}

/// Largest accepted decimation factor.
pub const MAX_DECIMATION: usize = 64;

/// Largest accepted STFT window, in samples.
pub const MAX_WINDOW_SIZE: usize = 1 << 20;

/// Accepted analysis sample rates, in Hz.
pub const SAMPLE_RATE_RANGE: std::ops::RangeInclusive<u32> = 1000..=384_000;

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(ChordError::InvalidConfig(msg));

        if !SAMPLE_RATE_RANGE.contains(&self.sample_rate) {
            return fail(format!(
                "sample_rate must be in {}..={}Hz, got {}",
                SAMPLE_RATE_RANGE.start(),
                SAMPLE_RATE_RANGE.end(),
                self.sample_rate
            ));
        }
        if self.decimation == 0 || self.decimation > MAX_DECIMATION {
            return fail(format!(
                "decimation factor must be in 1..={}, got {}",
                MAX_DECIMATION, self.decimation
            ));
        }
        if self.window_size < 2 || self.window_size > MAX_WINDOW_SIZE {
            return fail(format!(
                "window_size must be in 2..={}, got {}",
                MAX_WINDOW_SIZE, self.window_size
            ));
        }
        if self.hop_size == 0 || self.hop_size > self.window_size {
            return fail(format!(
                "hop_size must be in 1..={}, got {}",
                self.window_size, self.hop_size
            ));
        }
        if self.median_window == 0 || self.median_window % 2 == 0 {
            return fail(format!("median_window must be odd, got {}", self.median_window));
        }
        if !(self.tuning_frequency.is_finite() && self.tuning_frequency > 0.0) {
            return fail(format!("tuning_frequency must be positive, got {}", self.tuning_frequency));
        }
        if !(self.min_frequency.is_finite() && self.min_frequency >= 0.0)
            || !(self.max_frequency.is_finite() && self.max_frequency > self.min_frequency)
        {
            return fail(format!(
                "frequency band {}-{}Hz is empty",
                self.min_frequency, self.max_frequency
            ));
        }
        Ok(())
    }

    pub fn chroma_params(&self) -> ChromaParams {
        ChromaParams {
            tuning_frequency: self.tuning_frequency,
            min_frequency: self.min_frequency,
            max_frequency: self.max_frequency,
            normalize: self.normalize_chroma,
        }
    }
}

fn default_sample_rate() -> u32 { 22050 }
fn default_decimation() -> usize { 4 }
fn default_window_size() -> usize { 8192 }
fn default_hop_size() -> usize { 1024 }
fn default_median_window() -> usize { 17 }
fn default_tuning_frequency() -> f32 { 440.0 }
fn default_min_frequency() -> f32 { 55.0 }
fn default_max_frequency() -> f32 { 5000.0 }

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ChordError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: Config = toml::from_str(&content).map_err(|e| ChordError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    config.analysis.validate()?;
    Ok(config)
}

/// First existing config file: `./chordscan.toml`, then the user config dirs.
pub fn find_config() -> Option<PathBuf> {
    let local = PathBuf::from("chordscan.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("chordscan").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("chordscan").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = AnalysisConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.sample_rate, 22050);
        assert_eq!(cfg.decimation, 4);
        assert_eq!(cfg.window_size, 8192);
        assert_eq!(cfg.hop_size, 1024);
        assert_eq!(cfg.median_window, 17);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [analysis]
            median_window = 9

            [output]
            format = "json"
            time = "seconds"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.analysis.median_window, 9);
        assert_eq!(cfg.analysis.hop_size, 1024);
        assert_eq!(cfg.output.format, OutputFormat::Json);
        assert_eq!(cfg.output.time, TimeUnit::Seconds);
    }

    #[test]
    fn empty_file_is_default() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.analysis, AnalysisConfig::default());
        assert_eq!(cfg.output.format, OutputFormat::Text);
    }

    #[test]
    fn rejects_bad_parameters() {
        let bad = [
            AnalysisConfig { decimation: 0, ..Default::default() },
            AnalysisConfig { decimation: MAX_DECIMATION + 1, ..Default::default() },
            AnalysisConfig { decimation: usize::MAX / 8, ..Default::default() },
            AnalysisConfig { window_size: 4_000_000_000, hop_size: 1024, ..Default::default() },
            AnalysisConfig { window_size: usize::MAX, ..Default::default() },
            AnalysisConfig { sample_rate: 0, ..Default::default() },
            AnalysisConfig { sample_rate: 10_000_000, ..Default::default() },
            AnalysisConfig { hop_size: 0, ..Default::default() },
            AnalysisConfig { hop_size: 10_000, ..Default::default() },
            AnalysisConfig { median_window: 16, ..Default::default() },
            AnalysisConfig { min_frequency: 6000.0, ..Default::default() },
            AnalysisConfig { tuning_frequency: 0.0, ..Default::default() },
        ];
        for cfg in bad {
            assert!(matches!(cfg.validate(), Err(ChordError::InvalidConfig(_))), "{:?}", cfg);
        }
    }

    #[test]
    fn accepts_upper_limits() {
        let cfg = AnalysisConfig {
            decimation: MAX_DECIMATION,
            window_size: MAX_WINDOW_SIZE,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn load_config_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chordscan.toml");
        std::fs::write(&path, "[analysis]\nhop_size = \"lots\"\n").unwrap();
        assert!(matches!(load_config(&path), Err(ChordError::Config { .. })));

        std::fs::write(&path, "[analysis]\nmedian_window = 4\n").unwrap();
        assert!(matches!(load_config(&path), Err(ChordError::InvalidConfig(_))));
    }
}
