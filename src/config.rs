//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.surveytally.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".surveytally.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Document store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Where the content document lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON document.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("content.json")
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Report heading.
    #[serde(default = "default_title")]
    pub title: String,

    /// Include respondents' suggestions.
    #[serde(default = "default_true")]
    pub include_suggestions: bool,

    /// Maximum suggestions listed in the Markdown report.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// How many low-scoring questions to highlight.
    #[serde(default = "default_weakest_questions")]
    pub weakest_questions: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            title: default_title(),
            include_suggestions: true,
            max_suggestions: default_max_suggestions(),
            weakest_questions: default_weakest_questions(),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("survey_report.md")
}

fn default_title() -> String {
    "Academic Services Satisfaction Survey".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_suggestions() -> usize {
    50
}

fn default_weakest_questions() -> usize {
    3
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only explicitly provided CLI values override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref store) = args.store {
            self.store.path = store.clone();
        }

        if args.verbose {
            self.general.verbose = true;
        }

        if let crate::cli::Command::Analyze(ref analyze) = args.command {
            if let Some(ref output) = analyze.output {
                self.report.output = output.clone();
            }
            if let Some(ref title) = analyze.title {
                self.report.title = title.clone();
            }
            if analyze.no_suggestions {
                self.report.include_suggestions = false;
            }
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
