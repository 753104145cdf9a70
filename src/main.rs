//! adb-screen-ocr - device screenshot OCR with text correction
//!
//! Captures a screenshot over adb, crops and scales it, recognizes text with
//! an external OCR engine, corrects low-confidence results against a vehicle
//! UI vocabulary, and writes an annotated image plus a text report.

mod app;
mod capture;
mod config;
mod correction;
mod overlay;
mod storage;
mod vision;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::app::{build_corrector, FrameSource, OcrPipeline};
use crate::config::AppConfig;

/// adb-screen-ocr - screenshot OCR with dictionary correction
#[derive(Parser, Debug)]
#[command(name = "adb-screen-ocr")]
#[command(about = "Capture a device screenshot, run OCR and correct low-confidence text")]
struct Args {
    /// Use an existing screenshot instead of capturing over adb
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Read OCR results from a JSON file instead of running the OCR command
    #[arg(long)]
    ocr_json: Option<PathBuf>,

    /// Confidence below which text is corrected
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Skip the text correction pass
    #[arg(long)]
    no_correction: bool,

    /// Apply contrast and sharpening before OCR
    #[arg(long)]
    enhance: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for output files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print dictionary statistics and exit
    #[arg(long)]
    dict_stats: bool,

    /// Write the default configuration to the config path and exit
    #[arg(long)]
    write_default_config: bool,
}

fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(Args::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.write_default_config {
        let path = config_path(&args)?;
        config::save_config(&AppConfig::default(), &path)?;
        println!("Default configuration written to {}", path.display());
        return Ok(());
    }

    let mut config = load_or_create_config(&args)?;
    apply_overrides(&mut config, &args);

    if args.dict_stats {
        let stats = build_corrector(&config.correction).dictionary_stats();
        println!("Domain terms:       {}", stats.domain_terms);
        println!("Common corrections: {}", stats.confusion_terms);
        println!("Total:              {}", stats.total);
        return Ok(());
    }

    let pipeline = match &args.ocr_json {
        Some(path) => OcrPipeline::with_precomputed(config.clone(), path),
        None => OcrPipeline::new(config.clone())?,
    };

    let output_dir = match &config.output.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory {:?}", dir))?;
            dir.clone()
        }
        None => storage::get_data_dir()?,
    };

    let source = match &args.input {
        Some(path) => FrameSource::File(path.clone()),
        None => FrameSource::Device,
    };

    info!("adb-screen-ocr starting...");
    let outcome = pipeline.run(&source, &output_dir)?;
    outcome.timings.log_summary();

    info!("Complete! {} regions, {} corrected", outcome.spans.len(), outcome.correction_count);
    info!("Processed:  {:?}", outcome.outputs.processed);
    info!("Visualized: {:?}", outcome.outputs.visualized);
    info!("Results:    {:?}", outcome.outputs.results);

    Ok(())
}

fn config_path(args: &Args) -> Result<PathBuf> {
    match &args.config {
        Some(path) => Ok(path.clone()),
        None => Ok(storage::get_config_dir()?.join("config.toml")),
    }
}

/// Load configuration from file, or fall back to defaults
///
/// An explicitly named file must exist and parse.
fn load_or_create_config(args: &Args) -> Result<AppConfig> {
    if let Some(path) = &args.config {
        let config = config::load_config(path)
            .with_context(|| format!("Failed to load configuration {:?}", path))?;
        info!("Loaded configuration from {:?}", path);
        return Ok(config);
    }

    if let Ok(config_path) = config_path(args) {
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return Ok(config);
            }
        }
    }

    info!("Using default configuration");
    Ok(AppConfig::default())
}

/// Command-line flags take precedence over the config file
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(threshold) = args.threshold {
        config.correction.threshold = threshold;
    }
    if args.no_correction {
        config.correction.enabled = false;
    }
    if args.enhance {
        config.processing.enhance = true;
    }
    if let Some(dir) = &args.output_dir {
        config.output.directory = Some(dir.clone());
    }
}
