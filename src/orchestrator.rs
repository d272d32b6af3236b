use crate::error::{Result, TuberError};
use crate::output::OutputTarget;
use crate::request::{Artifact, ArtifactRequest};
use crate::runner::Runner;
use crate::subtitle::{convert_files, find_vtt_files, produced_captions, ConversionReport};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

/// Everything a run needs besides the runner.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub url: String,
    pub request: ArtifactRequest,
    pub target: OutputTarget,
}

impl DownloadJob {
    pub fn new(url: impl Into<String>, request: ArtifactRequest, target: OutputTarget) -> Self {
        Self {
            url: url.into(),
            request,
            target,
        }
    }
}

/// One download in the sequence, with its 0-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadStep {
    pub artifact: Artifact,
    pub index: usize,
    pub total: usize,
}

impl DownloadStep {
    pub fn status_text(&self) -> String {
        if self.total > 1 {
            format!(
                "Downloading {} ({}/{})...",
                self.artifact,
                self.index + 1,
                self.total
            )
        } else {
            format!("Downloading {}...", self.artifact)
        }
    }
}

/// `Running(i)` means step `i` is the one in flight or next to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepState {
    Idle,
    Running(usize),
    Completed,
    Failed(String),
}

impl StepState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepState::Completed | StepState::Failed(_))
    }
}

/// Progress notifications for a display running alongside the steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    Started(DownloadStep),
    Finished(DownloadStep),
    Failed { step: DownloadStep, message: String },
    Completed,
}

/// Runs the requested downloads one at a time, stopping at the first failure.
pub struct StepOrchestrator {
    steps: Vec<Artifact>,
    state: StepState,
    completed: Vec<Artifact>,
    conversion: ConversionReport,
}

impl StepOrchestrator {
    pub fn new(request: &ArtifactRequest) -> Self {
        Self {
            steps: request.steps(),
            state: StepState::Idle,
            completed: Vec::new(),
            conversion: ConversionReport::default(),
        }
    }

    pub fn state(&self) -> &StepState {
        &self.state
    }

    pub fn steps(&self) -> &[Artifact] {
        &self.steps
    }

    /// Artifacts that finished successfully, in execution order.
    pub fn completed(&self) -> &[Artifact] {
        &self.completed
    }

    /// Transcript conversion results from the subtitle step.
    pub fn conversion(&self) -> &ConversionReport {
        &self.conversion
    }

    pub fn current_step(&self) -> Option<DownloadStep> {
        let index = match self.state {
            StepState::Idle => 0,
            StepState::Running(i) => i,
            _ => return None,
        };
        self.steps.get(index).map(|artifact| DownloadStep {
            artifact: *artifact,
            index,
            total: self.steps.len(),
        })
    }

    pub fn status_text(&self) -> String {
        match &self.state {
            StepState::Completed => "Done!".to_string(),
            StepState::Failed(message) => format!("Failed: {}", message),
            _ => self
                .current_step()
                .map(|step| step.status_text())
                .unwrap_or_else(|| "Done!".to_string()),
        }
    }

    /// Execute the current step and advance.
    ///
    /// Does nothing once the orchestrator is completed or failed.
    pub async fn run_next_step(
        &mut self,
        runner: &dyn Runner,
        job: &DownloadJob,
    ) -> Result<&StepState> {
        if self.state.is_terminal() {
            return Ok(&self.state);
        }

        let Some(step) = self.current_step() else {
            self.state = StepState::Completed;
            return Ok(&self.state);
        };
        self.state = StepState::Running(step.index);

        info!("{}", step.status_text());
        match self.execute(step.artifact, runner, job).await {
            Ok(()) => {
                self.completed.push(step.artifact);
                self.state = if step.index + 1 < self.steps.len() {
                    StepState::Running(step.index + 1)
                } else {
                    StepState::Completed
                };
                Ok(&self.state)
            }
            Err(e) => {
                let err = TuberError::StepFailed {
                    artifact: step.artifact,
                    reason: e.to_string(),
                };
                self.state = StepState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Run every remaining step, reporting progress on `events` if given.
    pub async fn run_to_completion(
        &mut self,
        runner: &dyn Runner,
        job: &DownloadJob,
        events: Option<&UnboundedSender<StepEvent>>,
    ) -> Result<()> {
        let notify = |event: StepEvent| {
            if let Some(tx) = events {
                // A closed display is not a reason to stop downloading.
                let _ = tx.send(event);
            }
        };

        while !self.state.is_terminal() {
            let Some(step) = self.current_step() else {
                self.state = StepState::Completed;
                break;
            };

            notify(StepEvent::Started(step));
            if let Err(e) = self.run_next_step(runner, job).await {
                notify(StepEvent::Failed {
                    step,
                    message: e.to_string(),
                });
                return Err(e);
            }
            notify(StepEvent::Finished(step));
        }

        notify(StepEvent::Completed);
        Ok(())
    }

    async fn execute(
        &mut self,
        artifact: Artifact,
        runner: &dyn Runner,
        job: &DownloadJob,
    ) -> Result<()> {
        let pattern = job.target.fetch_pattern();
        let search_dir = job.target.search_dir();
        let stem = job.target.stem();

        // Without a stem the caption name is unknown up front; remember what
        // was already there so only this run's captions are touched.
        let existing = if artifact == Artifact::Subtitles && stem.is_none() {
            find_vtt_files(search_dir).unwrap_or_default()
        } else {
            Vec::new()
        };

        debug!("Fetching {} to {}", artifact, pattern);
        runner.fetch(artifact, &pattern, &job.url).await?;

        if artifact == Artifact::Subtitles {
            let captions = produced_captions(search_dir, stem, &existing)?;
            let primary = job.target.artifact_path(Artifact::Subtitles);
            let report = convert_files(&captions, primary.as_deref());
            self.conversion.converted.extend(report.converted);
            self.conversion.skipped.extend(report.skipped);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text_with_counter() {
        let request = ArtifactRequest::from_artifacts(&[Artifact::Video, Artifact::Audio], false);
        let orchestrator = StepOrchestrator::new(&request);
        assert_eq!(orchestrator.status_text(), "Downloading video (1/2)...");
    }

    #[test]
    fn test_status_text_single_step() {
        let request = ArtifactRequest::from_artifacts(&[Artifact::Subtitles], false);
        let orchestrator = StepOrchestrator::new(&request);
        assert_eq!(orchestrator.status_text(), "Downloading subtitles...");
    }

    #[test]
    fn test_initial_state() {
        let request = ArtifactRequest::from_artifacts(&Artifact::ALL, false);
        let orchestrator = StepOrchestrator::new(&request);
        assert_eq!(orchestrator.state(), &StepState::Idle);
        assert_eq!(
            orchestrator.current_step(),
            Some(DownloadStep {
                artifact: Artifact::Video,
                index: 0,
                total: 3
            })
        );
    }

    #[test]
    fn test_empty_request_has_no_steps() {
        let orchestrator = StepOrchestrator::new(&ArtifactRequest::default());
        assert!(orchestrator.steps().is_empty());
        assert_eq!(orchestrator.current_step(), None);
        assert_eq!(orchestrator.status_text(), "Done!");
    }
}
