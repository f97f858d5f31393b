//! Configuration for sevoice

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::normalize;

/// Main configuration, loaded from `sevoice.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Extraction utility configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Output location configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Body text normalization configuration
    #[serde(default)]
    pub normalize: NormalizeConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects every violation and reports them together so the user can
    /// fix the file in one pass.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.extraction.seven_zip.as_os_str().is_empty() {
            errors.push("extraction.seven_zip must not be empty".to_string());
        }

        if self.output.base_dir.as_os_str().is_empty() {
            errors.push("output.base_dir must not be empty".to_string());
        }

        if self.normalize.link_placeholder.is_empty() {
            errors.push("normalize.link_placeholder must not be empty".to_string());
        }
        if self.normalize.image_placeholder.is_empty() {
            errors.push("normalize.image_placeholder must not be empty".to_string());
        }
        for tag in &self.normalize.strip_tags {
            if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                errors.push(format!("normalize.strip_tags entry '{tag}' is not a tag name"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("Invalid configuration:\n  - {}", errors.join("\n  - "))
        }
    }
}

/// Extraction utility configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Path to the 7-Zip executable (name alone resolves via PATH).
    #[serde(default = "default_seven_zip")]
    pub seven_zip: PathBuf,
}

fn default_seven_zip() -> PathBuf {
    PathBuf::from("7z")
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            seven_zip: default_seven_zip(),
        }
    }
}

/// Output location configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory under which the timestamped run directory is created.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
        }
    }
}

/// Body text normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Spoken replacement for anchor constructs.
    #[serde(default = "default_link_placeholder")]
    pub link_placeholder: String,
    /// Spoken replacement for image constructs.
    #[serde(default = "default_image_placeholder")]
    pub image_placeholder: String,
    /// Open/close tags removed entirely.
    #[serde(default = "default_strip_tags")]
    pub strip_tags: Vec<String>,
}

impl NormalizeConfig {
    /// Build the normalizer this configuration describes.
    pub fn normalizer(&self) -> normalize::TextNormalizer {
        normalize::TextNormalizer::new(
            self.link_placeholder.clone(),
            self.image_placeholder.clone(),
            self.strip_tags.clone(),
        )
    }
}

fn default_link_placeholder() -> String {
    normalize::DEFAULT_LINK_PLACEHOLDER.to_string()
}

fn default_image_placeholder() -> String {
    normalize::DEFAULT_IMAGE_PLACEHOLDER.to_string()
}

fn default_strip_tags() -> Vec<String> {
    normalize::DEFAULT_STRIP_TAGS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            link_placeholder: default_link_placeholder(),
            image_placeholder: default_image_placeholder(),
            strip_tags: default_strip_tags(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Log severity level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log format
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: LogLevel,
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: LogLevel::Info,
        }
    }
}
