use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::logging;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentConfig {
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            title: default_title(),
            subtitle: default_subtitle(),
        }
    }
}

fn default_file_name() -> String {
    "CLAUDE.md".to_string()
}
fn default_title() -> String {
    "GitHub Knowledge Base".to_string()
}
fn default_subtitle() -> String {
    "本地 GitHub 仓库知识库".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&content).with_context(|| "Failed to parse config file")?;
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let file_name = config.document.file_name.as_str();
    if file_name.trim().is_empty() {
        anyhow::bail!("document.file_name must not be empty");
    }
    if file_name == "." || file_name == ".." || file_name.contains(['/', '\\']) {
        anyhow::bail!(
            "document.file_name must be a bare file name, got '{}'",
            file_name
        );
    }

    if config.document.title.trim().is_empty() {
        anyhow::bail!("document.title must not be empty");
    }

    logging::parse_level(&config.logging.level)?;

    Ok(())
}
