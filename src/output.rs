use crate::request::{Artifact, ArtifactRequest};
use std::path::{Path, PathBuf};

/// Fetch-tool placeholder for the video title.
pub const TITLE_PLACEHOLDER: &str = "%(title)s";
/// Fetch-tool placeholder for the extension it picks.
pub const EXT_PLACEHOLDER: &str = "%(ext)s";

/// Make `s` safe as a single path component.
///
/// Separators and `:` become `-`; `* ? " < > |` are dropped.
pub fn sanitize_filename(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '/' | '\\' | ':' => out.push('-'),
            '*' | '?' | '"' | '<' | '>' | '|' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Directory part of a user-typed output path.
///
/// Everything before the last separator when there is one, `fallback`
/// otherwise.
pub fn derive_directory(custom: &str, fallback: &Path) -> PathBuf {
    match custom.rfind(['/', '\\']) {
        Some(0) => PathBuf::from(&custom[..1]),
        Some(idx) => PathBuf::from(&custom[..idx]),
        None => fallback.to_path_buf(),
    }
}

/// Where the artifacts of one run are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    dir: PathBuf,
    stem: Option<String>,
}

impl OutputTarget {
    /// Let the fetch tool name files after the video title.
    pub fn titled(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stem: None,
        }
    }

    /// Use a known title as the stem.
    pub fn from_title(dir: impl Into<PathBuf>, title: &str) -> Self {
        let stem = sanitize_filename(title.trim());
        Self {
            dir: dir.into(),
            stem: (!stem.is_empty()).then_some(stem),
        }
    }

    /// Parse a path typed by the user (directory + stem, no extension).
    pub fn from_custom_path(path: &str, fallback_dir: &Path) -> Self {
        let path = path.trim();
        let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        Self::from_title(derive_directory(path, fallback_dir), name)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stem(&self) -> Option<&str> {
        self.stem.as_deref()
    }

    /// Output template handed to the fetch tool.
    pub fn fetch_pattern(&self) -> String {
        let name = format!(
            "{}.{}",
            self.stem.as_deref().unwrap_or(TITLE_PLACEHOLDER),
            EXT_PLACEHOLDER
        );
        self.dir.join(name).to_string_lossy().into_owned()
    }

    /// Final file for an artifact. `None` while the title is left to the
    /// fetch tool.
    pub fn artifact_path(&self, artifact: Artifact) -> Option<PathBuf> {
        self.stem
            .as_ref()
            .map(|stem| self.dir.join(format!("{}.{}", stem, artifact.extension())))
    }

    /// Directory in which produced caption files are looked for.
    pub fn search_dir(&self) -> &Path {
        &self.dir
    }

    /// Path without extension, for display and editing.
    pub fn base_path(&self) -> PathBuf {
        self.dir
            .join(self.stem.as_deref().unwrap_or(TITLE_PLACEHOLDER))
    }

    /// Describe what a request will produce, e.g. `./clip.{mp4,txt} + summary`.
    pub fn preview(&self, request: &ArtifactRequest) -> String {
        if request.is_empty() {
            return "(select at least one option)".to_string();
        }

        let exts: Vec<&str> = request.steps().iter().map(|a| a.extension()).collect();
        let base = self.base_path().display().to_string();

        let files = match exts.as_slice() {
            [] => None,
            [ext] => Some(format!("{}.{}", base, ext)),
            many => Some(format!("{}.{{{}}}", base, many.join(","))),
        };

        match (files, request.summary) {
            (Some(files), true) => format!("{} + summary", files),
            (Some(files), false) => files,
            (None, _) => "(summary to stdout)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b\\c:d"), "a-b-c-d");
        assert_eq!(sanitize_filename("what? \"yes\" <no> |*"), "what yes no ");
        assert_eq!(sanitize_filename("Ünïcödé – ok"), "Ünïcödé – ok");
    }

    #[test]
    fn test_fetch_pattern() {
        let titled = OutputTarget::titled("downloads");
        assert_eq!(titled.fetch_pattern(), "downloads/%(title)s.%(ext)s");

        let named = OutputTarget::from_title(".", "Talk: Part 1/2");
        assert_eq!(named.stem(), Some("Talk- Part 1-2"));
        assert_eq!(named.fetch_pattern(), "./Talk- Part 1-2.%(ext)s");
    }

    #[test]
    fn test_artifact_path() {
        let target = OutputTarget::from_title("out", "clip");
        assert_eq!(
            target.artifact_path(Artifact::Audio),
            Some(PathBuf::from("out/clip.mp3"))
        );
        assert_eq!(OutputTarget::titled("out").artifact_path(Artifact::Video), None);
    }

    #[test]
    fn test_custom_path() {
        let fallback = Path::new("fallback");

        let target = OutputTarget::from_custom_path("videos/my:clip", fallback);
        assert_eq!(target.dir(), Path::new("videos"));
        assert_eq!(target.stem(), Some("my-clip"));

        let target = OutputTarget::from_custom_path("clip", fallback);
        assert_eq!(target.dir(), Path::new("fallback"));
        assert_eq!(target.stem(), Some("clip"));

        let target = OutputTarget::from_custom_path("/clip", fallback);
        assert_eq!(target.dir(), Path::new("/"));

        let target = OutputTarget::from_custom_path("videos/", fallback);
        assert_eq!(target.stem(), None);
    }

    #[test]
    fn test_derive_directory() {
        let fallback = Path::new(".");
        assert_eq!(derive_directory("a/b/c", fallback), PathBuf::from("a/b"));
        assert_eq!(derive_directory("a\\c", fallback), PathBuf::from("a"));
        assert_eq!(derive_directory("c", fallback), PathBuf::from("."));
        assert_eq!(derive_directory("/c", fallback), PathBuf::from("/"));
    }

    #[test]
    fn test_preview() {
        let target = OutputTarget::from_title(".", "clip");

        assert_eq!(
            target.preview(&ArtifactRequest::default()),
            "(select at least one option)"
        );

        let summary_only = ArtifactRequest {
            summary: true,
            ..Default::default()
        };
        assert_eq!(target.preview(&summary_only), "(summary to stdout)");

        let video = ArtifactRequest::from_artifacts(&[Artifact::Video], false);
        assert_eq!(target.preview(&video), "./clip.mp4");

        let all = ArtifactRequest::from_artifacts(&Artifact::ALL, true);
        assert_eq!(target.preview(&all), "./clip.{mp4,mp3,txt} + summary");
    }
}
