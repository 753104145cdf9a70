//! Application Configuration
//!
//! User settings stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::capture::CaptureConfig;
use crate::correction::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::overlay::OverlayStyle;
use crate::vision::ProcessSettings;

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Device capture settings
    pub capture: CaptureConfig,
    /// Crop/scale/enhance settings
    pub processing: ProcessSettings,
    /// Recognizer settings
    pub ocr: OcrSettings,
    /// Text correction settings
    pub correction: CorrectionSettings,
    /// Output file settings
    pub output: OutputSettings,
}

/// Recognizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Command line of the OCR tool; the image path is appended
    pub command: Vec<String>,
    /// Recognition languages
    pub languages: Vec<String>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            command: vec!["easyocr-json".to_string()],
            languages: vec!["ko".to_string(), "en".to_string()],
        }
    }
}

/// Text correction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionSettings {
    /// Run the correction pass
    pub enabled: bool,
    /// Spans below this confidence are corrected
    pub threshold: f32,
    /// Extra domain entries, misread form -> corrected form
    pub custom_words: BTreeMap<String, String>,
}

impl Default for CorrectionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            custom_words: BTreeMap::new(),
        }
    }
}

/// Output file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory for all outputs; None uses the application data directory
    pub directory: Option<PathBuf>,
    /// Raw screenshot file name
    pub screenshot: String,
    /// Processed image file name
    pub processed: String,
    /// Annotated image file name
    pub visualized: String,
    /// Text report file name
    pub results: String,
    /// Optional JSON export file name
    pub json: Option<String>,
    /// Overlay drawing style
    pub style: OverlayStyle,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: None,
            screenshot: "screenshot.png".to_string(),
            processed: "screenshot_processed.png".to_string(),
            visualized: "screenshot_with_ocr.png".to_string(),
            results: "ocr_results.txt".to_string(),
            json: None,
            style: OverlayStyle::default(),
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        // Capture defaults
        assert_eq!(config.capture.adb_path, "adb");
        assert!(config.capture.serial.is_none());

        // Processing defaults
        assert_eq!(config.processing.crop_left, 850);
        assert!((config.processing.scale_factor - 0.6).abs() < 0.01);

        // OCR defaults
        assert_eq!(config.ocr.languages, vec!["ko", "en"]);

        // Correction defaults
        assert!(config.correction.enabled);
        assert!((config.correction.threshold - 0.8).abs() < 0.01);
        assert!(config.correction.custom_words.is_empty());

        // Output defaults
        assert!(config.output.directory.is_none());
        assert_eq!(config.output.results, "ocr_results.txt");
        assert!(config.output.json.is_none());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = AppConfig::default();
        config
            .correction
            .custom_words
            .insert("끌람".to_string(), "클램".to_string());
        config.capture.serial = Some("R58M123".to_string());
        config.output.json = Some("ocr_results.json".to_string());

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
            [correction]
            threshold = 0.7

            [correction.custom_words]
            "끌람" = "클램"
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();

        assert!((config.correction.threshold - 0.7).abs() < 0.001);
        assert!(config.correction.enabled);
        let custom = &config.correction.custom_words;
        assert_eq!(custom.get("끌람").map(String::as_str), Some("클램"));
        assert_eq!(config.processing, ProcessSettings::default());
        assert_eq!(config.capture, CaptureConfig::default());
    }

    #[test]
    fn test_save_and_load_config() {
        let config = AppConfig::default();
        let temp_file = NamedTempFile::new().unwrap();

        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
