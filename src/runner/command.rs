use super::Runner;
use crate::config::Config;
use crate::error::{Result, TuberError};
use crate::request::Artifact;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Keep at most this many bytes of stderr in error messages.
const STDERR_TAIL: usize = 500;

/// Runs `yt-dlp` and `claude` as child processes.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    ytdlp: String,
    summarizer: String,
    subtitle_language: String,
}

impl CommandRunner {
    pub fn new(ytdlp: impl Into<String>, summarizer: impl Into<String>) -> Self {
        Self {
            ytdlp: ytdlp.into(),
            summarizer: summarizer.into(),
            subtitle_language: "en".to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ytdlp_path.clone(), config.summarizer_path.clone())
            .with_subtitle_language(config.subtitle_language.clone())
    }

    /// Set the caption language requested from yt-dlp.
    pub fn with_subtitle_language(mut self, language: String) -> Self {
        self.subtitle_language = language;
        self
    }

    /// yt-dlp arguments for one artifact, without the trailing URL.
    pub fn fetch_args(&self, artifact: Artifact, pattern: &str) -> Vec<String> {
        let mut args: Vec<String> = match artifact {
            Artifact::Video => vec![
                "-f",
                "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best",
                "--merge-output-format",
                "mp4",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            Artifact::Audio => vec!["-x", "--audio-format", "mp3", "--audio-quality", "0"]
                .into_iter()
                .map(String::from)
                .collect(),
            Artifact::Subtitles => vec![
                "--write-subs".to_string(),
                "--write-auto-subs".to_string(),
                "--sub-lang".to_string(),
                self.subtitle_language.clone(),
                "--sub-format".to_string(),
                "vtt".to_string(),
                "--skip-download".to_string(),
            ],
        };
        args.extend(["-q", "--no-warnings", "-o"].map(String::from));
        args.push(pattern.to_string());
        args
    }
}

#[async_trait]
impl Runner for CommandRunner {
    async fn fetch(&self, artifact: Artifact, pattern: &str, url: &str) -> Result<()> {
        let args = self.fetch_args(artifact, pattern);
        debug!("Running {} {} {}", self.ytdlp, args.join(" "), url);

        let output = Command::new(&self.ytdlp)
            .args(&args)
            .arg(url)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| tool_error(&self.ytdlp, format!("failed to run: {e}")))?;

        if !output.status.success() {
            return Err(tool_error(
                &self.ytdlp,
                exit_reason(output.status, &output.stderr),
            ));
        }

        Ok(())
    }

    async fn fetch_title(&self, url: &str) -> Result<String> {
        debug!("Fetching title for {}", url);

        let output = Command::new(&self.ytdlp)
            .args(["--get-title", url])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| tool_error(&self.ytdlp, format!("failed to run: {e}")))?;

        if !output.status.success() {
            return Err(tool_error(
                &self.ytdlp,
                exit_reason(output.status, &output.stderr),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn summarize(&self, transcript: &str, prompt: &str) -> Result<()> {
        debug!(
            "Piping {} bytes of transcript to {}",
            transcript.len(),
            self.summarizer
        );

        let mut child = Command::new(&self.summarizer)
            .args(["-p", prompt])
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| tool_error(&self.summarizer, format!("failed to run: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(transcript.as_bytes())
                .await
                .map_err(|e| tool_error(&self.summarizer, format!("failed to write transcript: {e}")))?;
            // Dropping stdin closes the pipe so the summarizer sees EOF.
        }

        let status = child
            .wait()
            .await
            .map_err(|e| tool_error(&self.summarizer, format!("failed to wait: {e}")))?;

        if !status.success() {
            return Err(tool_error(&self.summarizer, exit_reason(status, &[])));
        }

        Ok(())
    }
}

fn tool_error(tool: &str, reason: String) -> TuberError {
    TuberError::Tool {
        tool: tool.to_string(),
        reason,
    }
}

fn exit_reason(status: std::process::ExitStatus, stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        return format!("exited with {status}");
    }

    let mut start = stderr.len().saturating_sub(STDERR_TAIL);
    while !stderr.is_char_boundary(start) {
        start += 1;
    }
    format!("exited with {status}: {}", &stderr[start..])
}
