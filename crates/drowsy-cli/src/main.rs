//! Continuous Eye-Closure Detection - Batch Runner
//!
//! Loads a detector config and a JSON frame list, runs one detector over
//! the stream, and writes or prints the per-frame results plus a summary.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use drowsy_core::{DetectorConfig, DrowsyDetector, FrameResult, InputFrame};

/// Run the continuous eye-closure detector over a recorded frame stream.
#[derive(Parser)]
#[command(name = "drowsy-detect", version)]
struct Cli {
    /// Detector configuration file (JSON or TOML); defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input JSON file: an array of frame records.
    #[arg(long, required_unless_present_any = ["create_sample_config", "create_sample_input"])]
    input: Option<PathBuf>,

    /// Output JSON file for per-frame results (prints to stdout when omitted).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Frame rate used to derive dt for records that do not carry one.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Enable debug logging.
    #[arg(long, short)]
    verbose: bool,

    /// Write a sample configuration file and exit.
    #[arg(long, value_name = "PATH")]
    create_sample_config: Option<PathBuf>,

    /// Write a sample input file and exit.
    #[arg(long, value_name = "PATH")]
    create_sample_input: Option<PathBuf>,

    /// Number of frames for the sample input file.
    #[arg(long, default_value_t = 100)]
    frames: usize,
}

/// One recorded frame. `dt` is optional; the `--fps` fallback covers
/// recordings that only carry frame numbers.
#[derive(Debug, Serialize, Deserialize)]
struct InputRecord {
    frame_num: i64,
    left_eye_open: f64,
    right_eye_open: f64,
    face_confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    dt: Option<f64>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn load_config(path: &Path) -> Result<DetectorConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.to_path_buf()))
        .build()
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let detector_config: DetectorConfig = settings
        .try_deserialize()
        .with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(detector_config)
}

fn load_input(path: &Path) -> Result<Vec<InputRecord>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open input file {}", path.display()))?;
    let records: Vec<InputRecord> = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("invalid JSON in input file {}", path.display()))?;
    Ok(records)
}

fn write_sample_config(path: &Path) -> Result<()> {
    let config = DetectorConfig::default();
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &config)?;
    println!("Sample configuration file created: {}", path.display());
    Ok(())
}

/// Deterministic synthetic stream: periodic closure bursts over an
/// otherwise open-eyed recording.
fn sample_records(frames: usize) -> Vec<InputRecord> {
    (0..frames)
        .map(|i| {
            let burst = i % 50 < 10;
            let jitter = (i % 7) as f64 * 0.01;
            let (left, right) = if burst {
                (0.05 + jitter, 0.08 + jitter)
            } else {
                (0.72 + jitter, 0.75 + jitter)
            };
            InputRecord {
                frame_num: i as i64 + 1,
                left_eye_open: left,
                right_eye_open: right,
                face_confidence: 0.90 + jitter,
                dt: None,
            }
        })
        .collect()
}

fn write_sample_input(path: &Path, frames: usize) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &sample_records(frames))?;
    println!(
        "Sample input file created: {} ({} frames)",
        path.display(),
        frames
    );
    Ok(())
}

#[derive(Debug, Default, PartialEq)]
struct Summary {
    total: usize,
    normal: usize,
    drowsy: usize,
    errors: usize,
}

fn summarize(results: &[FrameResult]) -> Summary {
    let mut summary = Summary {
        total: results.len(),
        ..Default::default()
    };
    for result in results {
        match result.is_drowsy {
            1 => summary.drowsy += 1,
            -1 => summary.errors += 1,
            _ => summary.normal += 1,
        }
    }
    summary
}

fn print_summary(summary: &Summary) {
    let pct = |count: usize| {
        if summary.total == 0 {
            0.0
        } else {
            count as f64 / summary.total as f64 * 100.0
        }
    };
    println!("\n=== Processing summary ===");
    println!("Total frames:  {}", summary.total);
    println!("Normal frames: {} ({:.1}%)", summary.normal, pct(summary.normal));
    println!("Drowsy frames: {} ({:.1}%)", summary.drowsy, pct(summary.drowsy));
    println!("Error frames:  {} ({:.1}%)", summary.errors, pct(summary.errors));

    if summary.drowsy > 0 {
        println!("\nDrowsiness detected in this stream.");
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(path) = &cli.create_sample_config {
        return write_sample_config(path);
    }
    if let Some(path) = &cli.create_sample_input {
        return write_sample_input(path, cli.frames);
    }

    ensure!(cli.fps > 0.0 && cli.fps.is_finite(), "--fps must be positive");
    let input_path = cli.input.as_ref().expect("clap enforces --input");

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            info!("no config file given, using defaults");
            DetectorConfig::default()
        }
    };

    let mut detector = DrowsyDetector::new(config).context("invalid detector configuration")?;

    let records = load_input(input_path)?;
    info!(frames = records.len(), input = %input_path.display(), "loaded input");

    let fallback_dt = 1.0 / cli.fps;
    let mut results = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let result = detector.update(&InputFrame {
            frame_num: record.frame_num,
            left_eye_open: record.left_eye_open,
            right_eye_open: record.right_eye_open,
            face_confidence: record.face_confidence,
            dt: record.dt.unwrap_or(fallback_dt),
        });
        results.push(result);

        if (i + 1) % 100 == 0 || i + 1 == records.len() {
            info!("processed {}/{} frames", i + 1, records.len());
        }
    }

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            serde_json::to_writer_pretty(BufWriter::new(file), &results)?;
            println!("Results saved to: {}", path.display());
        }
        None => {
            println!("=== Results (first 10) ===");
            for result in results.iter().take(10) {
                println!("{}", serde_json::to_string(result)?);
            }
            if results.len() > 10 {
                println!("... and {} more results", results.len() - 10);
            }
        }
    }

    print_summary(&summarize(&results));

    if cli.verbose {
        println!("\n=== Detector state ===");
        println!("{}", serde_json::to_string_pretty(&detector.snapshot())?);
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}
