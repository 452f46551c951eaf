use std::path::PathBuf;
use thiserror::Error;

/// Containers the default symphonia build can open, for error messages.
pub const SUPPORTED_FORMATS: &str = "WAV, MP3, FLAC, OGG, AAC";

#[derive(Debug, Error)]
pub enum ChordError {
    #[error("Failed to decode audio '{path}': {reason}\n  Supported formats: {SUPPORTED_FORMATS}")]
    Decode { path: PathBuf, reason: String },

    #[error("Audio too short: {samples} samples after downsampling, need at least {required} (one analysis window)")]
    EmptyInput { samples: usize, required: usize },

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid analysis configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config '{path}': {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChordError>;

impl ChordError {
    pub(crate) fn decode(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        ChordError::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
