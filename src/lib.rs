pub mod config;
pub mod error;
pub mod interactive;
pub mod orchestrator;
pub mod output;
pub mod pipeline;
pub mod request;
pub mod runner;
pub mod subtitle;

pub use config::Config;
pub use error::{Result, TuberError};
pub use orchestrator::{DownloadJob, DownloadStep, StepEvent, StepOrchestrator, StepState};
pub use output::{sanitize_filename, OutputTarget};
pub use pipeline::{run_download, summarize, DownloadReport, PipelineConfig};
pub use request::{Artifact, ArtifactRequest, DEFAULT_PROMPT};
pub use runner::{CommandRunner, Runner};
