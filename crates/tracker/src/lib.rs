//! Trophy hunting tracker: SQLite-backed store, session plans, checklist
//! progress and the command line on top of `trophytrack-core`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod render;

pub use error::{Result, TrackerError};
