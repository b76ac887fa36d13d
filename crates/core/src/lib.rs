//! Shared trophy model and table logic for the tracker

pub mod aggregate;
pub mod cell;
pub mod checklist;
pub mod constants;
pub mod filter;
pub mod session;
pub mod table;
pub mod trophy;

pub use aggregate::{Completion, Dashboard, GroupKey, SessionSummary, TimeProgress};
pub use cell::Cell;
pub use checklist::{extract_checklist_items, ChecklistProgress, ProgressError};
pub use filter::{DifficultyMode, FilterCriteria, SortOrder, TriFilter};
pub use session::SessionPlan;
pub use table::{Row, Table};
pub use trophy::{Trophy, TrophyKey};
