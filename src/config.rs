use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const DEFAULT_CLASSES: &[&str] = &["truck", "car"];
const DEFAULT_CONFIDENCE: f32 = 0.5;
const DEFAULT_SCRATCH_DIR: &str = "/tmp/framesift-scratch";
const DEFAULT_MODEL_PATH: &str = "yolo11n.onnx";
const DEFAULT_INPUT_WIDTH: u32 = 640;
const DEFAULT_INPUT_HEIGHT: u32 = 640;

#[derive(Debug, Deserialize, Default)]
struct PipelineConfigFile {
    classes: Option<Vec<String>>,
    detector: Option<DetectorConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectorConfigFile {
    model_path: Option<PathBuf>,
    confidence: Option<f32>,
    scratch_dir: Option<PathBuf>,
    input_width: Option<u32>,
    input_height: Option<u32>,
}

/// Startup configuration for the batch detector.
///
/// Loaded once in `main`: optional JSON file named by `FRAMESIFT_CONFIG`,
/// then env-var overrides, then validation. Paths on the CLI take precedence
/// over everything here.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Class catalog, in column order.
    pub classes: Vec<String>,
    pub detector: DetectorSettings,
}

#[derive(Debug, Clone)]
pub struct DetectorSettings {
    pub model_path: PathBuf,
    pub confidence: f32,
    pub scratch_dir: PathBuf,
    pub input_width: u32,
    pub input_height: u32,
}

impl PipelineConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("FRAMESIFT_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: PipelineConfigFile) -> Self {
        let classes = file
            .classes
            .unwrap_or_else(|| DEFAULT_CLASSES.iter().map(|s| s.to_string()).collect());
        let detector = DetectorSettings {
            model_path: file
                .detector
                .as_ref()
                .and_then(|d| d.model_path.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            confidence: file
                .detector
                .as_ref()
                .and_then(|d| d.confidence)
                .unwrap_or(DEFAULT_CONFIDENCE),
            scratch_dir: file
                .detector
                .as_ref()
                .and_then(|d| d.scratch_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRATCH_DIR)),
            input_width: file
                .detector
                .as_ref()
                .and_then(|d| d.input_width)
                .unwrap_or(DEFAULT_INPUT_WIDTH),
            input_height: file
                .detector
                .and_then(|d| d.input_height)
                .unwrap_or(DEFAULT_INPUT_HEIGHT),
        };
        Self { classes, detector }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(classes) = std::env::var("FRAMESIFT_CLASSES") {
            let parsed = split_csv(&classes);
            if !parsed.is_empty() {
                self.classes = parsed;
            }
        }
        if let Ok(path) = std::env::var("FRAMESIFT_MODEL_PATH") {
            if !path.trim().is_empty() {
                self.detector.model_path = PathBuf::from(path);
            }
        }
        if let Ok(path) = std::env::var("FRAMESIFT_SCRATCH_DIR") {
            if !path.trim().is_empty() {
                self.detector.scratch_dir = PathBuf::from(path);
            }
        }
        if let Ok(confidence) = std::env::var("FRAMESIFT_CONFIDENCE") {
            self.detector.confidence = confidence
                .trim()
                .parse()
                .map_err(|_| anyhow!("FRAMESIFT_CONFIDENCE must be a number in (0, 1]"))?;
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(ConfigError::EmptyCatalog.into());
        }
        for class in &mut self.classes {
            let trimmed = class.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::EmptyCatalog.into());
            }
            *class = trimmed.to_string();
        }
        let confidence = self.detector.confidence;
        if !(confidence > 0.0 && confidence <= 1.0) {
            return Err(ConfigError::InvalidConfidence { value: confidence }.into());
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<PipelineConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
