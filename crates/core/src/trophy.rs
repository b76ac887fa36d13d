//! Typed view of a trophy row

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cell::Cell;
use crate::checklist::ChecklistProgress;
use crate::constants as col;
use crate::table::{Row, Table};

/// Composite identity of a trophy: names are only unique within a game.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrophyKey {
    pub game: String,
    pub trophy_name: String,
}

impl TrophyKey {
    pub fn new(game: impl Into<String>, trophy_name: impl Into<String>) -> Self {
        Self { game: game.into(), trophy_name: trophy_name.into() }
    }

    /// Key of a row, if the row carries a trophy name
    pub fn of_row(row: &Row) -> Option<Self> {
        let trophy_name = row.get(col::TROPHY_NAME).as_text()?;
        let game = row.get(col::GAME).as_text().unwrap_or_default();
        Some(Self { game, trophy_name })
    }
}

impl fmt::Display for TrophyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.game, self.trophy_name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Trophy {
    pub game: String,
    pub trophy_name: String,
    pub trophy_type: Option<String>,
    pub trophy_category: Option<String>,
    pub game_run_type: Option<String>,
    pub console: Option<String>,
    pub dlc: Option<String>,
    pub rarity: Option<String>,
    pub session_type: Option<String>,
    pub description: Option<String>,
    pub guide: Option<String>,
    pub notes_tips: Option<String>,
    pub estimated_time: f64,
    pub earned: bool,
    pub date_earned: Option<NaiveDateTime>,
    pub difficulty: Option<f64>,
    pub checklist_required: bool,
    pub multiplayer: bool,
    pub missable: bool,
    pub collectible: bool,
    pub grindy: bool,
    pub checklist_progress: ChecklistProgress,
}

impl Trophy {
    /// Project a row onto the typed model. Unparsable progress reads as empty.
    pub fn from_row(row: &Row) -> Self {
        let text = |column: &str| row.get(column).as_text();
        let flag = |column: &str| row.get(column).as_flag().unwrap_or(false);

        Self {
            game: text(col::GAME).unwrap_or_default(),
            trophy_name: text(col::TROPHY_NAME).unwrap_or_default(),
            trophy_type: text(col::TROPHY_TYPE),
            trophy_category: text(col::TROPHY_CATEGORY),
            game_run_type: text(col::GAME_RUN_TYPE),
            console: text(col::CONSOLE),
            dlc: text(col::DLC),
            rarity: text(col::RARITY),
            session_type: text(col::SESSION_TYPE),
            description: text(col::DESCRIPTION),
            guide: text(col::GUIDE),
            notes_tips: text(col::NOTES_TIPS),
            estimated_time: estimated_hours(row),
            earned: is_earned(row),
            date_earned: parse_date(row.get(col::DATE_EARNED)),
            difficulty: row.get(col::DIFFICULTY).as_number(),
            checklist_required: flag(col::CHECKLIST_REQUIRED),
            multiplayer: flag(col::MULTIPLAYER),
            missable: flag(col::MISSABLE),
            collectible: flag(col::COLLECTIBLE),
            grindy: flag(col::GRINDY),
            checklist_progress: ChecklistProgress::from_cell(row.get(col::CHECKLIST_PROGRESS))
                .unwrap_or_default(),
        }
    }

    /// Trophy name prefixed with ⚠️ (missable), 🧩 (collectible) and ⏳ (grindy)
    pub fn indicator_name(&self) -> String {
        let mut icons = String::new();
        if self.missable {
            icons.push_str("⚠️ ");
        }
        if self.collectible {
            icons.push_str("🧩 ");
        }
        if self.grindy {
            icons.push_str("⏳ ");
        }
        icons + &self.trophy_name
    }
}

/// A trophy counts as earned when its `Date Earned` cell holds anything.
pub fn is_earned(row: &Row) -> bool {
    !row.get(col::DATE_EARNED).is_blank()
}

/// Estimated hours; blank or non-numeric cells count as zero.
pub fn estimated_hours(row: &Row) -> f64 {
    row.get(col::ESTIMATED_TIME).as_number().unwrap_or(0.0)
}

/// Parse a `Date Earned` cell. Numbers are spreadsheet serial dates.
pub fn parse_date(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::Number(serial) => {
            let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
            let seconds = (serial * 86_400.0).round() as i64;
            epoch.checked_add_signed(Duration::try_seconds(seconds)?)
        }
        Cell::Text(s) => {
            let s = s.trim();
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
                return Some(dt.naive_utc());
            }
            for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                    return Some(dt);
                }
            }
            for format in ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"] {
                if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                    return date.and_hms_opt(0, 0, 0);
                }
            }
            None
        }
        _ => None,
    }
}

/// First row whose trophy name matches, in table order.
pub fn find_by_name(table: &Table, trophy_name: &str) -> Option<usize> {
    table
        .rows()
        .iter()
        .position(|row| row.get(col::TROPHY_NAME).as_text().as_deref() == Some(trophy_name))
}

pub fn find_by_key(table: &Table, key: &TrophyKey) -> Option<usize> {
    table
        .rows()
        .iter()
        .position(|row| TrophyKey::of_row(row).as_ref() == Some(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        Row::new()
            .with(col::GAME, "Elden Ring")
            .with(col::TROPHY_NAME, "Elden Lord")
            .with(col::ESTIMATED_TIME, 60.0)
            .with(col::MISSABLE, "Yes")
            .with(col::GRINDY, "Yes")
            .with(col::CHECKLIST_REQUIRED, true)
            .with(col::DATE_EARNED, "2024-03-01")
    }

    #[test]
    fn test_from_row_normalizes_flags() {
        let trophy = Trophy::from_row(&row());
        assert!(trophy.missable);
        assert!(!trophy.collectible);
        assert!(trophy.checklist_required);
        assert!(trophy.earned);
        assert_eq!(trophy.estimated_time, 60.0);
        assert_eq!(
            trophy.date_earned,
            NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
    }

    #[test]
    fn test_indicator_name() {
        let trophy = Trophy::from_row(&row());
        assert_eq!(trophy.indicator_name(), "⚠️ ⏳ Elden Lord");
    }

    #[test]
    fn test_unparsable_date_still_counts_as_earned() {
        let row = row().with(col::DATE_EARNED, "sometime last year");
        let trophy = Trophy::from_row(&row);
        assert!(trophy.earned);
        assert!(trophy.date_earned.is_none());
    }

    #[test]
    fn test_serial_date() {
        let parsed = parse_date(&Cell::Number(45352.5)).unwrap();
        assert_eq!(parsed.to_string(), "2024-03-01 12:00:00");
    }

    #[test]
    fn test_find_first_match_and_by_key() {
        let table = Table::from_rows(
            vec![],
            vec![
                Row::new().with(col::GAME, "A").with(col::TROPHY_NAME, "Platinum"),
                Row::new().with(col::GAME, "B").with(col::TROPHY_NAME, "Platinum"),
            ],
        );
        assert_eq!(find_by_name(&table, "Platinum"), Some(0));
        assert_eq!(find_by_key(&table, &TrophyKey::new("B", "Platinum")), Some(1));
        assert_eq!(find_by_name(&table, "Gold"), None);
    }
}
