use crate::config::Config;
use crate::error::{Result, TuberError};
use std::process::Command;
use tracing::debug;

const YTDLP_HINT: &str = "Install it from: https://github.com/yt-dlp/yt-dlp";
const SUMMARIZER_HINT: &str = "Install it from: https://claude.ai/download";

/// Which external tools can be used in this run.
#[derive(Debug, Clone, Default)]
pub struct ToolStatus {
    pub fetcher_version: Option<String>,
    pub summarizer_available: bool,
}

impl ToolStatus {
    pub fn fetcher_available(&self) -> bool {
        self.fetcher_version.is_some()
    }
}

/// Check that `binary --version` runs and succeeds, returning its first
/// output line.
pub fn check_tool(binary: &str) -> Result<String> {
    let output = Command::new(binary)
        .arg("--version")
        .output()
        .map_err(|e| TuberError::MissingTool {
            tool: binary.to_string(),
            hint: format!("({e})"),
        })?;

    if !output.status.success() {
        return Err(TuberError::Tool {
            tool: binary.to_string(),
            reason: "version check failed".to_string(),
        });
    }

    let version = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    debug!("{} is available ({})", binary, version);
    Ok(version)
}

/// Check the fetch tool, and the summarizer when `with_summarizer` is set.
/// An unchecked summarizer is reported as unavailable.
pub fn detect_tools(config: &Config, with_summarizer: bool) -> ToolStatus {
    ToolStatus {
        fetcher_version: check_tool(&config.ytdlp_path).ok(),
        summarizer_available: with_summarizer && check_tool(&config.summarizer_path).is_ok(),
    }
}

/// The fetch tool is mandatory for every run.
pub fn require_fetcher(config: &Config, status: &ToolStatus) -> Result<()> {
    if status.fetcher_available() {
        return Ok(());
    }
    Err(TuberError::MissingTool {
        tool: config.ytdlp_path.clone(),
        hint: YTDLP_HINT.to_string(),
    })
}

/// The summarizer is only needed when a summary is requested.
pub fn require_summarizer(config: &Config, status: &ToolStatus) -> Result<()> {
    if status.summarizer_available {
        return Ok(());
    }
    Err(TuberError::MissingTool {
        tool: config.summarizer_path.clone(),
        hint: SUMMARIZER_HINT.to_string(),
    })
}
