use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

const APP_DIR: &str = "daily-digest";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_markdown_dir")]
    pub markdown_dir: String,

    #[serde(default)]
    pub markdown_file_prefix: String,

    #[serde(default)]
    pub markdown_file_suffix: String,

    /// Render to the terminal instead of a dated markdown file.
    #[serde(default)]
    pub terminal_mode: bool,

    /// Prefix every link with an Instapaper "read later" link.
    #[serde(default)]
    pub instapaper: bool,

    pub claude_api_key: Option<String>,

    #[serde(default = "default_claude_model")]
    pub claude_model: String,

    /// ntfy-style endpoint that receives "new items" pushes.
    pub notify_url: Option<String>,

    #[serde(default)]
    pub analyst: AnalystConfig,

    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub url: String,

    /// Overrides the title published by the feed itself.
    pub title: Option<String>,

    #[serde(default)]
    pub summarize: bool,

    #[serde(default)]
    pub notify: bool,

    pub max_items: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_analyst_days")]
    pub days: usize,

    pub prompt: Option<String>,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            days: default_analyst_days(),
            prompt: None,
        }
    }
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("digest.db").to_string_lossy().to_string()
}

fn default_markdown_dir() -> String {
    dirs::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .to_string_lossy()
        .to_string()
}

fn default_claude_model() -> String {
    "claude-3-5-haiku-20241022".to_string()
}

fn default_analyst_days() -> usize {
    7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            markdown_dir: default_markdown_dir(),
            markdown_file_prefix: String::new(),
            markdown_file_suffix: String::new(),
            terminal_mode: false,
            instapaper: false,
            claude_api_key: None,
            claude_model: default_claude_model(),
            notify_url: None,
            analyst: AnalystConfig::default(),
            feeds: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads the config at `path`, writing the defaults there first if it
    /// does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(feed) = self.feeds.iter().find(|f| f.url.trim().is_empty()) {
            return Err(AppError::Config(format!(
                "feed {:?} has an empty url",
                feed.title.as_deref().unwrap_or("<untitled>")
            )));
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }
}
