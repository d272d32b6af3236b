// WebVTT caption text extraction
use crate::error::Result;
use std::collections::HashSet;
use std::path::Path;

/// Lines shorter than this that look like `HH:MM:SS.mmm` are treated as timing.
const TIMESTAMP_MAX_LEN: usize = 30;

/// Extract deduplicated plain text from WebVTT content, one line per kept
/// caption line.
pub fn normalize_vtt(content: &str) -> String {
    transcript_lines(content).join("\n")
}

/// The kept transcript lines, in first-occurrence order.
pub fn transcript_lines(content: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut lines = Vec::new();

    for raw in content.lines() {
        let line = raw.trim();
        if is_metadata(line) {
            continue;
        }

        let text = strip_tags(line);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        if seen.insert(text.to_string()) {
            lines.push(text.to_string());
        }
    }

    lines
}

/// Read and normalize a caption file.
pub fn normalize_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(normalize_vtt(&String::from_utf8_lossy(&bytes)))
}

fn is_metadata(line: &str) -> bool {
    line.is_empty()
        || line == "WEBVTT"
        || line == "Kind: captions"
        || line.starts_with("Language:")
        || line.starts_with("NOTE")
        || line.contains("-->")
        || is_timestamp(line)
}

/// Loose timing heuristic: a short line with a colon and a period or comma.
///
/// Also swallows cue-position metadata. Short dialogue such as `4:30, right?`
/// matches too and is dropped.
pub fn is_timestamp(line: &str) -> bool {
    line.contains(':') && (line.contains('.') || line.contains(',')) && line.len() < TIMESTAMP_MAX_LEN
}

/// Remove `<...>` markup. No nesting: every `<` enters a tag, every `>` leaves it.
pub fn strip_tags(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}
