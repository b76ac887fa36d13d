//! Column names and sheet names of the backing store
//!
//! Column names are matched exactly; a renamed column in the store is simply
//! treated as absent.

pub const GAME: &str = "Game";
pub const TROPHY_NAME: &str = "Trophy Name";
pub const DESCRIPTION: &str = "Description";
pub const TROPHY_TYPE: &str = "Trophy Type";
pub const TROPHY_CATEGORY: &str = "Trophy Category";
pub const GAME_RUN_TYPE: &str = "Game Run Type";
pub const CONSOLE: &str = "Console";
pub const DLC: &str = "DLC";
pub const RARITY: &str = "Rarity";
pub const SESSION_TYPE: &str = "Session Type";
pub const GUIDE: &str = "Guide";
pub const GUIDE_AVAILABLE: &str = "Guide Available";
pub const NOTES_TIPS: &str = "Notes / Tips";
pub const ESTIMATED_TIME: &str = "Estimated Time";
pub const DATE_EARNED: &str = "Date Earned";
pub const EARNED: &str = "Earned?";
pub const DIFFICULTY: &str = "Difficulty";
pub const CHECKLIST_REQUIRED: &str = "Checklist Required";
pub const CHECKLIST_PROGRESS: &str = "Checklist Progress";
pub const MULTIPLAYER: &str = "Multiplayer";
pub const MISSABLE: &str = "Missable?";
pub const COLLECTIBLE: &str = "Collectible?";
pub const GRINDY: &str = "Grindy?";

/// Sheets that never hold game trophies
pub const RESERVED_SHEETS: [&str; 6] = [
    "Dashboard",
    "GameTags",
    "Data",
    "Checklist",
    "TrophyDetails",
    "Lookup",
];

pub const SESSION_PLAN_SHEET: &str = "SessionPlan";
pub const CHECKLIST_SHEET: &str = "Checklist";

/// True for sheet names the repository must not read as a game
pub fn is_reserved_sheet(name: &str) -> bool {
    RESERVED_SHEETS.contains(&name) || name == SESSION_PLAN_SHEET
}
