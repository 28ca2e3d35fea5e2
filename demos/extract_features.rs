//! Example: Extract normalized MFCC matrices for a directory of raw captures
//!
//! Usage:
//!   cargo run --release --example extract_features -- [--jobs N] [--config cfg.json] [--json] <input_dir> <output_dir>
//!
//! Notes:
//! - Inputs are headerless 16-bit little-endian PCM (`.bin`, `.pcm`, `.raw`).
//! - Each input produces `<output_dir>/<stem>.mfcc` (row-major little-endian f32).

use kws_dsp::batch::extract::extract_directory;
use kws_dsp::{BatchConfig, PipelineConfig};
use std::env;
use std::path::PathBuf;
use std::time::Instant;

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--config" => {
                let v = args.first().ok_or("--config requires a path")?.clone();
                args.remove(0);
                config_path = Some(PathBuf::from(v));
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: extract_features [--jobs N] [--config cfg.json] [--json] <input_dir> <output_dir>\n\
                     \n\
                     --jobs N         Parallel workers (default: CPU-1)\n\
                     --config PATH    Pipeline configuration as JSON\n\
                     --json           Print the run report as JSON\n"
                );
                return Ok(());
            }
            _ => positional.push(a),
        }
    }

    if positional.len() != 2 {
        eprintln!("ERROR: Provide an input and an output directory. Use --help for usage.");
        std::process::exit(2);
    }

    let config = match &config_path {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    let batch = BatchConfig {
        input_dir: PathBuf::from(&positional[0]),
        output_dir: PathBuf::from(&positional[1]),
        jobs: jobs.unwrap_or_else(default_jobs),
        ..BatchConfig::default()
    };

    let t0 = Instant::now();
    let report = extract_directory(&batch, &config)?;
    let elapsed = t0.elapsed().as_secs_f32();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let (frames, coefficients) = config.expected_shape();
        println!("Extracted {} feature matrices ({}x{})", report.processed, frames, coefficients);
        println!("  skipped (undecodable): {}", report.skipped);
        println!("  shape mismatches:      {}", report.shape_mismatches);
        println!("  failed:                {}", report.failed);
        println!("  elapsed:               {:.2}s", elapsed);
    }

    Ok(())
}
