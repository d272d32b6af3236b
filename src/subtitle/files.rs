use super::normalize::normalize_file;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of converting the caption files of one download.
#[derive(Debug, Default, Clone)]
pub struct ConversionReport {
    /// Transcript files written.
    pub converted: Vec<PathBuf>,
    /// Caption files that could not be converted, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

/// List `.vtt` files directly inside `dir`, sorted by name.
pub fn find_vtt_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("vtt") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Whether `path` is a caption file yt-dlp wrote for `stem`
/// (`<stem>.vtt` or `<stem>.<lang>.vtt`).
pub fn is_caption_for(path: &Path, stem: &str) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.strip_suffix(".vtt")
        .is_some_and(|rest| rest == stem || rest.starts_with(&format!("{stem}.")))
}

/// Caption files in `dir` that belong to this download.
///
/// With a known stem only that stem's captions count. Without one, files
/// already listed in `before` are left alone.
pub fn produced_captions(
    dir: &Path,
    stem: Option<&str>,
    before: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    Ok(find_vtt_files(dir)?
        .into_iter()
        .filter(|path| match stem {
            Some(stem) => is_caption_for(path, stem),
            None => !before.contains(path),
        })
        .collect())
}

/// Write the normalized transcript of `vtt` to `txt` and remove the caption
/// file. The caption file stays when writing fails.
pub fn convert_vtt_file(vtt: &Path, txt: &Path) -> Result<()> {
    let transcript = normalize_file(vtt)?;
    fs::write(txt, transcript)?;
    fs::remove_file(vtt)?;
    debug!("Converted {} -> {}", vtt.display(), txt.display());
    Ok(())
}

/// Convert caption files to `.txt`, logging and skipping failures.
///
/// The first file is written to `primary` when given; the rest keep their
/// name with a `.txt` extension.
pub fn convert_files(files: &[PathBuf], primary: Option<&Path>) -> ConversionReport {
    let mut report = ConversionReport::default();

    for (i, vtt) in files.iter().enumerate() {
        let txt = match primary {
            Some(primary) if i == 0 => primary.to_path_buf(),
            _ => vtt.with_extension("txt"),
        };
        match convert_vtt_file(vtt, &txt) {
            Ok(()) => report.converted.push(txt),
            Err(e) => {
                warn!("Skipping {}: {}", vtt.display(), e);
                report.skipped.push((vtt.clone(), e.to_string()));
            }
        }
    }

    report
}
