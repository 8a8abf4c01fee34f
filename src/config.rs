use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::templates::DEFAULT_LIMIT;
use crate::{query, summary};

const APP_NAME: &str = "dsc-notebook";
const CONFIG_FILE: &str = "config.json";
/// Overrides the program used to execute notebooks.
pub const JUPYTER_ENV: &str = "DSC_NOTEBOOK_JUPYTER";

/// User defaults for generated notebooks. Command line flags take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Title of database summary notebooks
    pub summary_title: String,
    /// Title of query notebooks
    pub query_title: String,
    /// Paragraphs placed under the title when none are given on the command line
    pub description: Vec<String>,
    /// Preview row limit, negative for no limit
    pub limit: i64,
    /// Execute notebooks before writing them
    pub execute: bool,
    /// Program providing `nbconvert`
    pub jupyter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            summary_title: summary::DEFAULT_TITLE.to_string(),
            query_title: query::DEFAULT_TITLE.to_string(),
            description: Vec::new(),
            limit: DEFAULT_LIMIT,
            execute: false,
            jupyter: "jupyter".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the user's config directory.
    /// Returns defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let settings = match get_config_path().and_then(|path| Self::load_from(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        settings.with_env()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let settings = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(settings)
    }

    fn with_env(mut self) -> Self {
        if let Ok(jupyter) = std::env::var(JUPYTER_ENV) {
            if !jupyter.trim().is_empty() {
                self.jupyter = jupyter;
            }
        }
        self
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"limit": 20, "execute": true}"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.limit, 20);
        assert!(settings.execute);
        assert_eq!(settings.summary_title, "Database Summary");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }
}
