//! Error types for the tracker

use std::path::PathBuf;
use thiserror::Error;
use trophytrack_core::ProgressError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("no backing store at {}", .0.display())]
    MissingStore(PathBuf),

    #[error("Trophy '{0}' not found. Checklist progress not saved.")]
    NotFound(String),

    #[error("Trophy '{0}' not found")]
    UnknownTrophy(String),

    #[error("'{0}' is not an item of this trophy's checklist")]
    UnknownItem(String),

    #[error("'{0}' is a reserved sheet name")]
    ReservedSheet(String),

    #[error("row {0} does not exist")]
    NoSuchRow(usize),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Progress(#[from] ProgressError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("could not write config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
