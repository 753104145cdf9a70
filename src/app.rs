//! Pipeline Coordinator
//!
//! Runs capture, processing, recognition, correction, visualization and
//! persistence in sequence, timing each step.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

use crate::capture::{CapturedFrame, ScreenCapture};
use crate::config::{AppConfig, CorrectionSettings};
use crate::correction::Corrector;
use crate::overlay::draw_ocr_results;
use crate::storage;
use crate::vision::{process_image, CommandOcr, JsonFileOcr, OcrEngine, RecognizedSpan};

/// Where the screenshot comes from
#[derive(Debug, Clone)]
pub enum FrameSource {
    /// Capture from the device over adb
    Device,
    /// Use an existing image file
    File(PathBuf),
}

/// Duration of each pipeline step
#[derive(Debug, Clone, Default)]
pub struct StepTimings {
    pub capture: Duration,
    pub process: Duration,
    pub ocr: Duration,
    /// None when correction was disabled
    pub correction: Option<Duration>,
    pub visualize: Duration,
    pub save: Duration,
    pub total: Duration,
}

impl StepTimings {
    /// Log the performance summary table
    pub fn log_summary(&self) {
        let rule = "=".repeat(60);
        info!("{}", rule);
        info!("PERFORMANCE SUMMARY");
        info!("{}", rule);
        info!("Step 1 (ADB Capture):     {:>10.2}ms", ms(self.capture));
        info!("Step 2 (Image Process):   {:>10.2}ms", ms(self.process));
        info!("Step 3 (OCR Extract):     {:>10.2}ms", ms(self.ocr));
        if let Some(correction) = self.correction {
            info!("Step 3.5 (Text Correct):  {:>10.2}ms", ms(correction));
        }
        info!("Step 4 (Visualization):   {:>10.2}ms", ms(self.visualize));
        info!("Step 5 (Save Results):    {:>10.2}ms", ms(self.save));
        info!("{}", "-".repeat(60));
        info!(
            "Total Time:               {:>10.2}ms ({:.2}s)",
            ms(self.total),
            self.total.as_secs_f64()
        );
        info!("{}", rule);
    }
}

fn ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Files written by a pipeline run
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub screenshot: PathBuf,
    pub processed: PathBuf,
    pub visualized: PathBuf,
    pub results: PathBuf,
    pub json: Option<PathBuf>,
}

impl OutputPaths {
    /// Resolve configured file names against an output directory
    pub fn resolve(config: &AppConfig, directory: &Path) -> Self {
        let output = &config.output;
        Self {
            screenshot: directory.join(&output.screenshot),
            processed: directory.join(&output.processed),
            visualized: directory.join(&output.visualized),
            results: directory.join(&output.results),
            json: output.json.as_ref().map(|name| directory.join(name)),
        }
    }
}

/// Result of a full run
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Spans after correction, in recognition order
    pub spans: Vec<RecognizedSpan>,
    /// Number of spans whose text was corrected
    pub correction_count: usize,
    pub timings: StepTimings,
    pub outputs: OutputPaths,
}

/// Built-in dictionary plus the configured custom words in the domain table
pub fn build_corrector(settings: &CorrectionSettings) -> Corrector {
    let mut corrector = Corrector::new();
    for (original, corrected) in &settings.custom_words {
        corrector.add_custom_word(original.as_str(), corrected.as_str());
    }
    corrector
}

/// Main pipeline
pub struct OcrPipeline {
    config: AppConfig,
    corrector: Corrector,
    engine: Box<dyn OcrEngine>,
}

impl OcrPipeline {
    /// Build a pipeline with the configured OCR command
    pub fn new(config: AppConfig) -> Result<Self> {
        let engine = CommandOcr::new(&config.ocr.command, &config.ocr.languages)
            .context("Invalid OCR command in configuration")?;
        Ok(Self::with_engine(config, Box::new(engine)))
    }

    /// Build a pipeline that reads recognition results from a JSON file
    pub fn with_precomputed(config: AppConfig, results: impl Into<PathBuf>) -> Self {
        Self::with_engine(config, Box::new(JsonFileOcr::new(results)))
    }

    /// Build a pipeline around any engine
    pub fn with_engine(config: AppConfig, engine: Box<dyn OcrEngine>) -> Self {
        let corrector = build_corrector(&config.correction);
        Self {
            config,
            corrector,
            engine,
        }
    }

    /// Run every step and write all outputs under `directory`
    pub fn run(&self, source: &FrameSource, directory: &Path) -> Result<PipelineOutcome> {
        let total_start = Instant::now();
        let outputs = OutputPaths::resolve(&self.config, directory);
        let mut timings = StepTimings::default();

        // Step 1: capture
        info!("STEP 1: Capture Screenshot");
        let start = Instant::now();
        let frame = match source {
            FrameSource::Device => {
                ScreenCapture::new(self.config.capture.clone()).capture(&outputs.screenshot)?
            }
            FrameSource::File(path) => {
                info!("Using existing screenshot {:?}", path);
                CapturedFrame::open(path)?
            }
        };
        timings.capture = start.elapsed();
        let (width, height) = frame.dimensions();
        info!(
            "Screenshot {:?} {}x{} ({:.2}ms)",
            frame.path, width, height, ms(timings.capture)
        );

        // Step 2: process
        info!("STEP 2: Process Image");
        let start = Instant::now();
        let processed = process_image(&frame.image, &self.config.processing);
        processed
            .save(&outputs.processed)
            .with_context(|| format!("Failed to save processed image {:?}", outputs.processed))?;
        timings.process = start.elapsed();
        info!("Processed image saved to {:?} ({:.2}ms)", outputs.processed, ms(timings.process));

        // Step 3: recognize
        info!("STEP 3: Extract Text with OCR ({})", self.engine.name());
        let start = Instant::now();
        let spans = self.engine.recognize(&outputs.processed)?;
        timings.ocr = start.elapsed();
        info!("Recognized {} regions ({:.2}ms)", spans.len(), ms(timings.ocr));

        // Step 3.5: correct
        let (spans, correction_count) = if self.config.correction.enabled {
            info!("STEP 3.5: Text Correction");
            let start = Instant::now();
            let stats = self.corrector.dictionary_stats();
            info!("Dictionary loaded: {} terms", stats.total);

            let report = self.corrector.correct_all(&spans, self.config.correction.threshold);
            let elapsed = start.elapsed();
            timings.correction = Some(elapsed);
            info!("Corrected {} spans ({:.2}ms)", report.correction_count, ms(elapsed));
            (report.spans, report.correction_count)
        } else {
            (spans, 0)
        };

        // Step 4: visualize
        info!("STEP 4: Visualize OCR Results");
        let start = Instant::now();
        let annotated = draw_ocr_results(&processed, &spans, &self.config.output.style);
        annotated
            .save(&outputs.visualized)
            .with_context(|| format!("Failed to save visualization {:?}", outputs.visualized))?;
        timings.visualize = start.elapsed();
        info!("Visualization saved to {:?} ({:.2}ms)", outputs.visualized, ms(timings.visualize));

        // Step 5: save
        info!("STEP 5: Save Results");
        let start = Instant::now();
        storage::save_results(&spans, &outputs.results)?;
        if let Some(json) = &outputs.json {
            storage::export_json(&spans, json)?;
        }
        storage::print_results(&spans);
        timings.save = start.elapsed();

        timings.total = total_start.elapsed();

        Ok(PipelineOutcome {
            spans,
            correction_count,
            timings,
            outputs,
        })
    }
}
