use crate::device::{Action, SetupStage};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while creating, driving or tearing down a virtual device.
///
/// Every variant names the step that failed. Nothing is retried internally.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid device path: {0}")]
    InvalidPath(String),
    #[error("invalid device name: {0}")]
    InvalidName(String),
    #[error("invalid axis bounds: {0}")]
    InvalidBounds(String),
    #[error("could not open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to {stage}: {source}")]
    Setup {
        stage: SetupStage,
        #[source]
        source: io::Error,
    },
    #[error("{action}: failed to write {event} event: {source}")]
    Write {
        action: Action,
        event: String,
        #[source]
        source: io::Error,
    },
    #[error("{action}: failed to write sync event: {source}")]
    Sync {
        action: Action,
        #[source]
        source: io::Error,
    },
    #[error("failed to release device: {source}")]
    Teardown {
        #[source]
        source: io::Error,
    },
    #[error("device closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, Error>;
