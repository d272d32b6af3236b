pub mod command;
pub mod tools;

pub use command::CommandRunner;
pub use tools::{check_tool, detect_tools, require_fetcher, require_summarizer, ToolStatus};

use crate::error::Result;
use crate::request::Artifact;
use async_trait::async_trait;

/// The external collaborators: a media fetch tool and a text summarizer.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Download one artifact for `url`, naming output after `pattern`.
    async fn fetch(&self, artifact: Artifact, pattern: &str, url: &str) -> Result<()>;

    /// Title of the video, as reported by the fetch tool.
    async fn fetch_title(&self, url: &str) -> Result<String>;

    /// Feed `transcript` to the summarizer; the summary goes to stdout.
    async fn summarize(&self, transcript: &str, prompt: &str) -> Result<()>;
}
