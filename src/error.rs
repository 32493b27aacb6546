use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Application-wide error type for vuesweep.
///
/// Only precondition and configuration failures surface here. Unreadable
/// entries, bad manifests and per-target deletion failures are recovered
/// where they happen.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Not a directory: {}", .0.display())]
    InvalidRoot(PathBuf),

    #[error("A scan is already running")]
    ScanInProgress,

    #[error("Moving to the trash is not supported here; pass --permanent to delete outright")]
    TrashUnavailable,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown sort key '{0}' (expected one of: {})", crate::index::SortKey::names())]
    InvalidSortKey(String),

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("Failed to launch editor: {0}")]
    Editor(String),

    #[error("Background worker terminated unexpectedly")]
    WorkerPanicked,

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to write configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid exclude pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl AppError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        AppError::Config(msg.into())
    }
}
