use crate::error::{Result, TuberError};

/// Prompt handed to the summarizer when the user does not supply one.
pub const DEFAULT_PROMPT: &str = "Summarize this transcript of a YouTube video. Provide a concise summary of the main points and key takeaways.";

/// A file-producing artifact. The derived ordering is the order in which
/// downloads run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Artifact {
    Video,
    Audio,
    Subtitles,
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Artifact::Video => write!(f, "video"),
            Artifact::Audio => write!(f, "audio"),
            Artifact::Subtitles => write!(f, "subtitles"),
        }
    }
}

impl Artifact {
    pub const ALL: [Artifact; 3] = [Artifact::Video, Artifact::Audio, Artifact::Subtitles];

    /// Extension of the final file on disk.
    pub fn extension(&self) -> &'static str {
        match self {
            Artifact::Video => "mp4",
            Artifact::Audio => "mp3",
            Artifact::Subtitles => "txt",
        }
    }

    /// Capitalized label used in menus and request summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Artifact::Video => "Video",
            Artifact::Audio => "Audio",
            Artifact::Subtitles => "Subtitles",
        }
    }
}

/// What the user asked for in one run.
///
/// Selection is a set of flags: any combination of artifacts may be
/// requested together with a summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactRequest {
    pub video: bool,
    pub audio: bool,
    pub subtitles: bool,
    pub summary: bool,
    /// Custom summary prompt. `None` or empty means the default prompt.
    pub prompt: Option<String>,
}

impl ArtifactRequest {
    /// Build a request from a list of selected artifacts.
    pub fn from_artifacts(artifacts: &[Artifact], summary: bool) -> Self {
        let mut request = Self {
            summary,
            ..Self::default()
        };
        for artifact in artifacts {
            request.set(*artifact, true);
        }
        request
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn set(&mut self, artifact: Artifact, value: bool) {
        match artifact {
            Artifact::Video => self.video = value,
            Artifact::Audio => self.audio = value,
            Artifact::Subtitles => self.subtitles = value,
        }
    }

    pub fn contains(&self, artifact: Artifact) -> bool {
        match artifact {
            Artifact::Video => self.video,
            Artifact::Audio => self.audio,
            Artifact::Subtitles => self.subtitles,
        }
    }

    /// Requested file artifacts, always in video, audio, subtitles order.
    pub fn steps(&self) -> Vec<Artifact> {
        Artifact::ALL
            .into_iter()
            .filter(|a| self.contains(*a))
            .collect()
    }

    pub fn has_file_steps(&self) -> bool {
        self.video || self.audio || self.subtitles
    }

    pub fn is_empty(&self) -> bool {
        !self.has_file_steps() && !self.summary
    }

    /// Reject a request that selects nothing.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(TuberError::InvalidRequest(
                "select at least one of video, audio, subtitles or summary".to_string(),
            ));
        }
        Ok(())
    }

    pub fn prompt_or_default(&self) -> &str {
        match self.prompt.as_deref() {
            Some(p) if !p.trim().is_empty() => p,
            _ => DEFAULT_PROMPT,
        }
    }
}

impl std::fmt::Display for ArtifactRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<&str> = self.steps().iter().map(|a| a.label()).collect();
        if self.summary {
            parts.push("Summary");
        }
        if parts.is_empty() {
            return write!(f, "Nothing");
        }
        write!(f, "{}", parts.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_follow_fixed_order() {
        let request =
            ArtifactRequest::from_artifacts(&[Artifact::Subtitles, Artifact::Video], false);
        assert_eq!(request.steps(), vec![Artifact::Video, Artifact::Subtitles]);
    }

    #[test]
    fn test_display() {
        let request = ArtifactRequest {
            video: true,
            subtitles: true,
            summary: true,
            ..Default::default()
        };
        assert_eq!(request.to_string(), "Video + Subtitles + Summary");
        assert_eq!(ArtifactRequest::default().to_string(), "Nothing");
    }

    #[test]
    fn test_validate_empty_request() {
        assert!(ArtifactRequest::default().validate().is_err());

        let summary_only = ArtifactRequest {
            summary: true,
            ..Default::default()
        };
        assert!(summary_only.validate().is_ok());
        assert!(!summary_only.has_file_steps());
    }

    #[test]
    fn test_prompt_or_default() {
        let request = ArtifactRequest::default();
        assert_eq!(request.prompt_or_default(), DEFAULT_PROMPT);

        let request = ArtifactRequest::default().with_prompt("   ");
        assert_eq!(request.prompt_or_default(), DEFAULT_PROMPT);

        let request = ArtifactRequest::default().with_prompt("List key points");
        assert_eq!(request.prompt_or_default(), "List key points");
    }

    #[test]
    fn test_artifact_extension() {
        assert_eq!(Artifact::Video.extension(), "mp4");
        assert_eq!(Artifact::Audio.extension(), "mp3");
        assert_eq!(Artifact::Subtitles.extension(), "txt");
    }
}
