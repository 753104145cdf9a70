//! Screen Capture Layer
//!
//! Pulls a screenshot from an Android device through the `adb` binary:
//! `screencap` on the device, `pull` to the host, then remove the remote copy.

pub mod frame;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use frame::CapturedFrame;

/// Failures while talking to the device
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`adb {args}` exited with {status}: {stderr}")]
    CommandFailed {
        args: String,
        status: String,
        stderr: String,
    },
}

/// Screen capture configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Path or name of the adb executable
    pub adb_path: String,
    /// Device serial (`adb -s`), or None for the only attached device
    pub serial: Option<String>,
    /// Temporary screenshot location on the device
    pub remote_path: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            adb_path: "adb".to_string(),
            serial: None,
            remote_path: "/sdcard/screenshot.png".to_string(),
        }
    }
}

/// Screenshot capture over adb
pub struct ScreenCapture {
    config: CaptureConfig,
}

impl ScreenCapture {
    /// Create a new screen capture instance
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    /// Capture the device screen and save it to `output_path`
    pub fn capture(&self, output_path: &Path) -> Result<CapturedFrame> {
        info!("Capturing screenshot via adb...");

        let remote = self.config.remote_path.as_str();
        let local = output_path.to_string_lossy();

        self.run_adb(&["shell", "screencap", "-p", remote])?;
        self.run_adb(&["pull", remote, local.as_ref()])?;

        // A stale file on the device is harmless; keep the local screenshot
        if let Err(e) = self.run_adb(&["shell", "rm", remote]) {
            warn!("Could not remove {} on device: {}", remote, e);
        }

        info!("Screenshot saved to {:?}", output_path);
        CapturedFrame::open(output_path)
            .with_context(|| format!("Pulled screenshot {:?} is not a readable image", output_path))
    }

    /// Arguments passed to adb, including the serial selector
    fn adb_args<'a>(&'a self, args: &[&'a str]) -> Vec<&'a str> {
        let mut full = Vec::with_capacity(args.len() + 2);
        if let Some(serial) = &self.config.serial {
            full.push("-s");
            full.push(serial.as_str());
        }
        full.extend_from_slice(args);
        full
    }

    fn run_adb(&self, args: &[&str]) -> Result<(), CaptureError> {
        let full = self.adb_args(args);
        debug!("adb {}", full.join(" "));

        let output = Command::new(&self.config.adb_path)
            .args(&full)
            .output()
            .map_err(|source| CaptureError::Spawn {
                program: self.config.adb_path.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CaptureError::CommandFailed {
                args: full.join(" "),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capture_config() {
        let config = CaptureConfig::default();
        assert_eq!(config.adb_path, "adb");
        assert!(config.serial.is_none());
        assert_eq!(config.remote_path, "/sdcard/screenshot.png");
    }

    #[test]
    fn test_adb_args_without_serial() {
        let capture = ScreenCapture::new(CaptureConfig::default());
        assert_eq!(capture.adb_args(&["pull", "a", "b"]), vec!["pull", "a", "b"]);
    }

    #[test]
    fn test_adb_args_with_serial() {
        let capture = ScreenCapture::new(CaptureConfig {
            serial: Some("emulator-5554".to_string()),
            ..Default::default()
        });
        assert_eq!(
            capture.adb_args(&["shell", "rm", "/sdcard/x.png"]),
            vec!["-s", "emulator-5554", "shell", "rm", "/sdcard/x.png"]
        );
    }

    #[test]
    fn test_missing_adb_binary() {
        let capture = ScreenCapture::new(CaptureConfig {
            adb_path: "/nonexistent/bin/adb".to_string(),
            ..Default::default()
        });
        let result = capture.run_adb(&["devices"]);
        assert!(matches!(result, Err(CaptureError::Spawn { .. })));
    }
}
