//! Text report and JSON export of recognized spans

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::vision::RecognizedSpan;

const RULE_WIDTH: usize = 60;
const TITLE: &str = "OCR EXTRACTION RESULTS";

/// Numbered report, one block per span in input order
pub fn format_results(spans: &[RecognizedSpan]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("{rule}\n{TITLE}\n{rule}\n\n"));

    for (i, span) in spans.iter().enumerate() {
        out.push_str(&format!("{}. Text: {}\n", i + 1, span.text));
        out.push_str(&format!("   Confidence: {:.2}%\n", span.confidence * 100.0));
        out.push_str(&format!("   BBox: {}\n\n", span.region));
    }

    out
}

/// Write the text report to `path`
pub fn save_results(spans: &[RecognizedSpan], path: &Path) -> Result<()> {
    info!("Saving results to {:?}...", path);
    std::fs::write(path, format_results(spans))
        .with_context(|| format!("Failed to write results to {:?}", path))?;
    info!("Results saved");
    Ok(())
}

/// Write spans as a JSON array in the OCR tuple shape
pub fn export_json(spans: &[RecognizedSpan], path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(spans)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
    info!("Exported {} spans to {:?}", spans.len(), path);
    Ok(())
}

/// Print the report to stdout
pub fn print_results(spans: &[RecognizedSpan]) {
    println!("\n{}", format_results(spans));
}
