use crate::request::Artifact;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TuberError {
    #[error("{tool} not found in PATH. {hint}")]
    MissingTool { tool: String, hint: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{tool} failed: {reason}")]
    Tool { tool: String, reason: String },

    #[error("{artifact} download failed: {reason}")]
    StepFailed { artifact: Artifact, reason: String },

    #[error("summary failed: {0}")]
    Summary(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TuberError>;
