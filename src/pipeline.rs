use crate::error::{Result, TuberError};
use crate::orchestrator::{DownloadJob, StepEvent, StepOrchestrator};
use crate::output::OutputTarget;
use crate::request::Artifact;
use crate::runner::Runner;
use crate::subtitle::{find_vtt_files, normalize_file};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Scratch directory of an in-flight summary, removed by the interrupt handler.
static ACTIVE_SCRATCH: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Options for a download run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Show a spinner while steps run.
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
        }
    }
}

/// What a run produced.
#[derive(Debug, Default, Clone)]
pub struct DownloadReport {
    /// Artifacts downloaded, in execution order.
    pub completed: Vec<Artifact>,
    /// Transcript files written by the subtitle step.
    pub transcripts: Vec<PathBuf>,
    /// Caption files that could not be converted.
    pub warnings: Vec<String>,
    /// Whether a summary was written to stdout.
    pub summarized: bool,
}

/// Scratch directory for a summary-only subtitle fetch.
///
/// Deleted when dropped; registered with the interrupt handler while alive.
struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("tuber-summary-")
            .tempdir()
            .map_err(|e| TuberError::Summary(format!("failed to create temp dir: {e}")))?;

        if let Ok(mut active) = ACTIVE_SCRATCH.lock() {
            *active = Some(dir.path().to_path_buf());
        }
        debug!("Using scratch directory: {:?}", dir.path());
        Ok(Self { dir })
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Ok(mut active) = ACTIVE_SCRATCH.lock() {
            *active = None;
        }
        debug!("Cleaning up scratch directory: {:?}", self.dir.path());
        // TempDir deletes itself on drop
    }
}

/// Install a Ctrl+C handler that removes any live scratch directory and
/// exits with status 130.
pub fn install_interrupt_handler() -> std::result::Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        if let Ok(mut active) = ACTIVE_SCRATCH.lock() {
            if let Some(path) = active.take() {
                let _ = std::fs::remove_dir_all(path);
            }
        }
        eprintln!();
        std::process::exit(130);
    })
}

/// Download the requested artifacts, then produce the summary if asked for.
///
/// File downloads run first, in video, audio, subtitles order, and the first
/// failure ends the run. The summary runs only after they all succeed.
pub async fn run_download(
    runner: &dyn Runner,
    job: &DownloadJob,
    config: &PipelineConfig,
) -> Result<DownloadReport> {
    job.request.validate()?;

    let mut report = DownloadReport::default();

    if job.request.has_file_steps() {
        let mut orchestrator = StepOrchestrator::new(&job.request);
        let (tx, rx) = mpsc::unbounded_channel();
        let display = spawn_display(rx, config.show_progress);

        let result = orchestrator.run_to_completion(runner, job, Some(&tx)).await;
        drop(tx);
        if let Err(e) = display.await {
            debug!("Progress display task ended abnormally: {}", e);
        }

        report.completed = orchestrator.completed().to_vec();
        report.transcripts = orchestrator.conversion().converted.clone();
        report.warnings = orchestrator
            .conversion()
            .skipped
            .iter()
            .map(|(path, reason)| format!("{}: {}", path.display(), reason))
            .collect();
        result?;
    }

    if job.request.summary {
        summarize(runner, &job.url, job.request.prompt_or_default()).await?;
        report.summarized = true;
    }

    Ok(report)
}

/// Fetch captions into a fresh scratch directory, normalize them and pipe the
/// transcript to the summarizer.
pub async fn summarize(runner: &dyn Runner, url: &str, prompt: &str) -> Result<()> {
    eprintln!("📝 Fetching subtitles for summary...");

    let scratch = ScratchDir::create()?;
    let pattern = OutputTarget::titled(scratch.path()).fetch_pattern();

    runner
        .fetch(Artifact::Subtitles, &pattern, url)
        .await
        .map_err(|e| TuberError::Summary(format!("failed to download subtitles: {e}")))?;

    let vtt = find_vtt_files(scratch.path())
        .map_err(|e| TuberError::Summary(format!("failed to read subtitles: {e}")))?
        .into_iter()
        .next()
        .ok_or_else(|| TuberError::Summary("no subtitles found for this video".to_string()))?;

    let transcript = normalize_file(&vtt)
        .map_err(|e| TuberError::Summary(format!("failed to extract text: {e}")))?;
    if transcript.is_empty() {
        return Err(TuberError::Summary(
            "subtitles contained no spoken text".to_string(),
        ));
    }
    info!("Transcript has {} lines", transcript.lines().count());

    eprintln!("\n🤖 Generating summary...\n");

    runner
        .summarize(&transcript, prompt)
        .await
        .map_err(|e| TuberError::Summary(e.to_string()))
}

fn spawn_display(mut rx: UnboundedReceiver<StepEvent>, show_progress: bool) -> JoinHandle<()> {
    tokio::spawn(async move {
        let pb = show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.magenta} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        while let Some(event) = rx.recv().await {
            match event {
                StepEvent::Started(step) => {
                    if let Some(ref pb) = pb {
                        pb.set_message(step.status_text());
                    }
                }
                StepEvent::Finished(step) => {
                    if let Some(ref pb) = pb {
                        pb.println(format!("{} Downloaded {}", style("✓").green(), step.artifact));
                    }
                }
                StepEvent::Failed { step, message } => {
                    warn!("Step {} failed: {}", step.index + 1, message);
                    break;
                }
                StepEvent::Completed => break,
            }
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
    })
}
