//! OCR (Optical Character Recognition) module
//!
//! The recognizer is a black box: an external command is run against the
//! processed image and its JSON output is parsed into spans.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};

use super::RecognizedSpan;

/// Failures coming from the external recognizer
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("failed to launch OCR command `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("OCR command exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("OCR command produced no command line")]
    EmptyCommand,

    #[error("malformed OCR output: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A text recognizer producing spans in reading order
pub trait OcrEngine {
    /// Recognize text in the image at `image_path`
    fn recognize(&self, image_path: &Path) -> Result<Vec<RecognizedSpan>>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Runs an EasyOCR-style command and reads JSON results from its stdout
///
/// The command is invoked as `<program> <args...> --lang <l1,l2> <image>` and
/// must print `[[[x, y] x4], "text", confidence]` tuples as a JSON array.
pub struct CommandOcr {
    program: String,
    args: Vec<String>,
    languages: Vec<String>,
}

impl CommandOcr {
    /// Create an engine from a command line (program followed by arguments)
    pub fn new(command: &[String], languages: &[String]) -> Result<Self, OcrError> {
        let (program, args) = command.split_first().ok_or(OcrError::EmptyCommand)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            languages: languages.to_vec(),
        })
    }

    fn build_command(&self, image_path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if !self.languages.is_empty() {
            command.arg("--lang").arg(self.languages.join(","));
        }
        command.arg(image_path);
        command
    }
}

impl OcrEngine for CommandOcr {
    fn recognize(&self, image_path: &Path) -> Result<Vec<RecognizedSpan>> {
        info!(
            "Running OCR command `{}` ({})",
            self.program,
            self.languages.join(", ")
        );

        let output = self
            .build_command(image_path)
            .output()
            .map_err(|source| OcrError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let stdout = String::from_utf8(output.stdout).context("OCR output is not valid UTF-8")?;
        let spans = parse_ocr_json(&stdout)?;
        info!("Found {} text regions", spans.len());
        Ok(spans)
    }

    fn name(&self) -> &str {
        "command"
    }
}

/// Reads previously recognized results from a JSON file
pub struct JsonFileOcr {
    path: PathBuf,
}

impl JsonFileOcr {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OcrEngine for JsonFileOcr {
    fn recognize(&self, _image_path: &Path) -> Result<Vec<RecognizedSpan>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read OCR results from {:?}", self.path))?;
        let spans = parse_ocr_json(&content)?;
        info!("Loaded {} text regions from {:?}", spans.len(), self.path);
        Ok(spans)
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

/// Parse a JSON array of recognized spans
///
/// Log lines around the array (common with Python tooling, including
/// bracketed ones like `[INFO] ...`) are skipped: decoding starts at each `[`
/// in turn and the first offset holding a complete array wins. Text after
/// the array is ignored.
pub fn parse_ocr_json(output: &str) -> Result<Vec<RecognizedSpan>, OcrError> {
    let mut first_error = None;

    for (start, _) in output.match_indices('[') {
        let payload = &output[start..];
        let mut stream = serde_json::Deserializer::from_str(payload)
            .into_iter::<Vec<RecognizedSpan>>();
        match stream.next() {
            Some(Ok(spans)) => {
                debug!("Parsed {} spans from OCR output at offset {}", spans.len(), start);
                return Ok(spans);
            }
            Some(Err(e)) => {
                first_error.get_or_insert(e);
            }
            None => {}
        }
    }

    // Nothing decoded; report the earliest failure, or why the text is not an array
    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(serde_json::from_str(output)?),
    }
}
