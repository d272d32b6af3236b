use crate::error::{Result, TuberError};
use crate::request::DEFAULT_PROMPT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fetch tool binary.
    pub ytdlp_path: String,
    /// Summarizer binary.
    pub summarizer_path: String,
    /// Directory downloads land in when no `-o` flag is given.
    pub output_dir: PathBuf,
    /// Subtitle language requested from the fetch tool.
    pub subtitle_language: String,
    pub default_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ytdlp_path: "yt-dlp".to_string(),
            summarizer_path: "claude".to_string(),
            output_dir: PathBuf::from("."),
            subtitle_language: "en".to_string(),
            default_prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(path) = std::env::var("TUBER_YTDLP") {
            config.ytdlp_path = path;
        }
        if let Ok(path) = std::env::var("TUBER_SUMMARIZER") {
            config.summarizer_path = path;
        }
        if let Ok(dir) = std::env::var("TUBER_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(lang) = std::env::var("TUBER_SUB_LANG") {
            config.subtitle_language = lang;
        }
        if let Ok(prompt) = std::env::var("TUBER_PROMPT") {
            config.default_prompt = prompt;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ytdlp_path.trim().is_empty() {
            return Err(TuberError::Config("yt-dlp path must not be empty".to_string()));
        }
        if self.summarizer_path.trim().is_empty() {
            return Err(TuberError::Config(
                "summarizer path must not be empty".to_string(),
            ));
        }
        if self.subtitle_language.trim().is_empty() {
            return Err(TuberError::Config(
                "subtitle language must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Prompt to use when the request does not carry its own.
    pub fn prompt(&self) -> &str {
        if self.default_prompt.trim().is_empty() {
            DEFAULT_PROMPT
        } else {
            &self.default_prompt
        }
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tuber").join("config.toml"))
    }
}
