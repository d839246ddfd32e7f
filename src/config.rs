//! Configuration for both pipelines. The original scripts hard-coded every
//! path; here they live in a YAML file, with defaults reproducing the
//! original layout.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked for in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "newsclean.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub merge: MergeConfig,
    pub normalize: NormalizeConfig,
}

/// Inputs for the merger. Order matters: deduplication keeps the first
/// occurrence of each key, so the most recent export goes first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub inputs: Vec<PathBuf>,
    pub dedup_key: String,
    pub sort_key: String,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub forecast_column: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            merge: MergeConfig::default(),
            normalize: NormalizeConfig::default(),
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            inputs: vec![
                PathBuf::from("csv ze stron/money_pl_2023.csv"),
                PathBuf::from("csv ze stron/money_pl_2022.csv"),
                PathBuf::from("csv ze stron/money_pl_2021.csv"),
            ],
            dedup_key: "url".to_string(),
            sort_key: "google_detected_date".to_string(),
            output: PathBuf::from("csv ze stron/money_pl_combined.csv"),
        }
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        NormalizeConfig {
            source: PathBuf::from("obserwatorfinansowy_llm_extracted.csv"),
            dest: PathBuf::from("obserwatorfinansowy_llm_extracted_clean.csv"),
            forecast_column: "forecasts_json".to_string(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file `{}`", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config file `{}`", path.display()))
    }

    /// Load `path` when given; otherwise the default config file if it
    /// exists, otherwise built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::load(DEFAULT_CONFIG_FILE),
            None => Ok(Config::default()),
        }
    }
}
