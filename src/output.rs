//! Rendering of chord events for the command line.

use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use crate::chords::segment::ChordEvent;
use crate::config::OutputFormat;
use crate::error::Result;

/// Events found in one input file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub events: Vec<ChordEvent>,
}

/// Write reports as `time<TAB>chord` lines or as JSON.
///
/// With `with_paths` unset (one input), events are written without a file
/// header (text) or as a bare event array (JSON). Otherwise every report
/// carries its path.
pub fn write_reports<W: Write>(
    out: &mut W,
    reports: &[FileReport],
    format: OutputFormat,
    with_paths: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let written = match reports {
                [single] if !with_paths => serde_json::to_writer_pretty(&mut *out, &single.events),
                _ => serde_json::to_writer_pretty(&mut *out, reports),
            };
            written.map_err(std::io::Error::from)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for report in reports {
                if with_paths {
                    writeln!(out, "# {}", report.path.display())?;
                }
                for event in &report.events {
                    writeln!(out, "{:.3}\t{}", event.time, event.chord)?;
                }
            }
        }
    }
    Ok(())
}
