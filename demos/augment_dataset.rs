//! Example: Build an augmented keyword dataset plus negatives
//!
//! Usage:
//!   cargo run --release --example augment_dataset -- --noise noise.pcm [--jobs N] [--seed S]
//!       [--negatives LABEL=DIR ...] [--json] <input_dir> <output_dir>
//!
//! Notes:
//! - Every keyword capture produces 11 units by default (clean, 5 noise, 3 volume, 2 shift).
//! - With `--negatives`, pure-noise slices and noise-mixed speech are written
//!   to `<output_dir>/negative`.

use kws_dsp::batch::augment::augment_directory;
use kws_dsp::batch::negative::{generate_negatives, NegativeSource, NegativeSpec};
use kws_dsp::{BatchConfig, PipelineConfig};
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs = 1usize;
    let mut seed = 0u64;
    let mut noise: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut negatives: Vec<NegativeSource> = Vec::new();
    let mut positional: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                jobs = args.first().ok_or("--jobs requires a value")?.parse::<usize>()?;
                args.remove(0);
            }
            "--seed" => {
                seed = args.first().ok_or("--seed requires a value")?.parse::<u64>()?;
                args.remove(0);
            }
            "--noise" => {
                noise = Some(PathBuf::from(args.first().ok_or("--noise requires a path")?));
                args.remove(0);
            }
            "--config" => {
                config_path = Some(PathBuf::from(args.first().ok_or("--config requires a path")?));
                args.remove(0);
            }
            "--negatives" => {
                let v = args.first().ok_or("--negatives requires LABEL=DIR")?.clone();
                args.remove(0);
                let (label, dir) = v.split_once('=').ok_or("--negatives expects LABEL=DIR")?;
                negatives.push(NegativeSource {
                    label: label.to_string(),
                    dir: PathBuf::from(dir),
                });
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: augment_dataset --noise PATH [--jobs N] [--seed S] [--config cfg.json]\n\
                     \x20      [--negatives LABEL=DIR ...] [--json] <input_dir> <output_dir>\n\
                     \n\
                     --noise PATH          Raw PCM background noise library (required)\n\
                     --jobs N              Parallel workers (default: 1)\n\
                     --seed S              Base random seed (default: 0)\n\
                     --negatives LABEL=DIR Non-keyword speech to mix into negatives\n\
                     --json                Print run reports as JSON\n"
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

    let output_dir = PathBuf::from(&positional[1]);
    let batch = BatchConfig {
        input_dir: PathBuf::from(&positional[0]),
        output_dir: output_dir.clone(),
        noise_path: noise,
        jobs,
        seed,
        ..BatchConfig::default()
    };

    let report = augment_directory(&batch, &config)?;
    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!(
            "Augmented {} sources into {} units ({} skipped, {} failed)",
            report.sources, report.generated, report.skipped, report.failed
        );
    }

    if !negatives.is_empty() {
        let negative_batch = BatchConfig {
            output_dir: output_dir.join("negative"),
            ..batch
        };
        let spec = NegativeSpec {
            sources: negatives,
            ..NegativeSpec::default()
        };
        let report = generate_negatives(&negative_batch, &config, &spec)?;
        if json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!(
                "Negatives: {} noise slices, {} mixed ({} skipped, {} failed)",
                report.noise_slices, report.mixed, report.skipped, report.failed
            );
        }
    }

    Ok(())
}
