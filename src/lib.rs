//! # chordscan
//!
//! Chord recognition for recorded music: decode a file, fold its spectrum
//! into pitch classes, match each frame against 24 major/minor triads and
//! report where the chord changes.
//!
//! ```no_run
//! use chordscan::{AnalysisConfig, ChordRecognizer};
//! use std::path::Path;
//!
//! let recognizer = ChordRecognizer::new(AnalysisConfig::default())?;
//! let analysis = recognizer.analyze_file(Path::new("song.mp3"))?;
//! for event in &analysis.events {
//!     println!("{:.3} {}", event.time, event.chord);
//! }
//! # Ok::<(), chordscan::ChordError>(())
//! ```
//!
//! Pipeline: decode -> resample to 22.05 kHz -> decimate -> STFT -> chroma ->
//! median smoothing -> cosine template match -> change segmentation.

pub mod audio;
pub mod chords;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;

pub use audio::decode::Waveform;
pub use chords::segment::ChordEvent;
pub use chords::templates::{ChordQuality, ChordTemplate, CHORD_TEMPLATES};
pub use config::{AnalysisConfig, Config, OutputFormat, TimeUnit};
pub use error::{ChordError, Result};
pub use pipeline::{calculate_chords, ChordAnalysis, ChordRecognizer, Stage};
