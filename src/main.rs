mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};

use chordscan::config::{find_config, load_config};
use chordscan::output::{write_reports, FileReport};
use chordscan::{ChordRecognizer, Config, Stage, TimeUnit};
use cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    // Explicit --config path, or auto-detect chordscan.toml / user config
    let config = match cli.config.clone().or_else(find_config) {
        Some(path) => {
            let cfg = load_config(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            log::info!("Loaded config from {}", path.display());
            cfg
        }
        None => Config::default(),
    };

    let mut analysis_config = config.analysis;
    if let Some(r) = cli.sample_rate { analysis_config.sample_rate = r; }
    if let Some(d) = cli.decimation { analysis_config.decimation = d; }
    if let Some(w) = cli.window { analysis_config.window_size = w; }
    if let Some(h) = cli.hop { analysis_config.hop_size = h; }
    if let Some(m) = cli.median { analysis_config.median_window = m; }
    let format = cli.format.map(Into::into).unwrap_or(config.output.format);
    let time_unit = cli.time_unit(config.output.time);

    log::info!(
        "Analyzing {} file(s): rate={}Hz, decimation={}, window={}, hop={}, median={}",
        cli.inputs.len(),
        analysis_config.sample_rate,
        analysis_config.decimation,
        analysis_config.window_size,
        analysis_config.hop_size,
        analysis_config.median_window
    );

    let pb = if cli.no_progress {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new((cli.inputs.len() * Stage::ALL.len()) as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} stages {msg}")
                .context("Invalid progress bar template")?
                .progress_chars("=>-"),
        );
        pb
    };

    let hook_pb = pb.clone();
    let recognizer = ChordRecognizer::new(analysis_config)?.with_progress(move |stage| {
        hook_pb.set_message(stage.to_string());
        hook_pb.inc(1);
    });

    // Runs share nothing but the read-only recognizer
    let results: Vec<_> = cli
        .inputs
        .par_iter()
        .map(|path| (path, recognizer.analyze_file(path)))
        .collect();

    pb.finish_and_clear();

    let mut reports = Vec::with_capacity(results.len());
    let mut failures = 0;
    for (path, result) in results {
        match result {
            Ok(analysis) => {
                let events = match time_unit {
                    TimeUnit::Fraction => analysis.events,
                    TimeUnit::Seconds => analysis.events_in_seconds(),
                };
                reports.push(FileReport {
                    path: path.clone(),
                    events,
                });
            }
            Err(err) => {
                log::error!("{}: {}", path.display(), err);
                failures += 1;
            }
        }
    }

    // Paths are kept whenever more than one input was named, even if only
    // one of them produced a report.
    let with_paths = cli.inputs.len() > 1;

    match cli.output {
        Some(ref out_path) => {
            let file = File::create(out_path)
                .with_context(|| format!("Failed to create output file: {}", out_path.display()))?;
            let mut writer = BufWriter::new(file);
            write_reports(&mut writer, &reports, format, with_paths)?;
            writer.flush()?;
            log::info!("Wrote {} report(s) to {}", reports.len(), out_path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_reports(&mut lock, &reports, format, with_paths)?;
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} file(s) failed", failures, cli.inputs.len());
    }
    Ok(())
}
