//! Grouped sums and counts for the dashboard and session views
//!
//! Rows without a group value land in [`GroupKey::Unknown`]. A reducer over a
//! column the table does not have returns an empty breakdown.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::cell::Cell;
use crate::constants as col;
use crate::table::{Row, Table};
use crate::trophy::{estimated_hours, is_earned, Trophy};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Named(String),
    Unknown,
}

impl GroupKey {
    pub fn of(cell: &Cell) -> Self {
        cell.as_text().map(GroupKey::Named).unwrap_or(GroupKey::Unknown)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Named(name) => write!(f, "{}", name),
            GroupKey::Unknown => write!(f, "(unknown)"),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub type Breakdown<T> = BTreeMap<GroupKey, T>;

/// Fold every row into the bucket named by `column`
pub fn group_by<T, F>(table: &Table, column: &str, mut fold: F) -> Breakdown<T>
where
    T: Default,
    F: FnMut(&mut T, &Row),
{
    let mut groups = Breakdown::new();
    if !table.has_column(column) {
        return groups;
    }
    for row in table.rows() {
        fold(groups.entry(GroupKey::of(row.get(column))).or_default(), row);
    }
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Completion {
    pub earned: usize,
    pub total: usize,
}

impl Completion {
    /// Earned fraction; 0 for an empty group
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.earned as f64 / self.total as f64
        }
    }

    fn count(&mut self, earned: bool) {
        self.total += 1;
        if earned {
            self.earned += 1;
        }
    }
}

pub fn completion_by_game(table: &Table) -> Breakdown<Completion> {
    group_by(table, col::GAME, |c: &mut Completion, row| c.count(is_earned(row)))
}

pub fn completion_rate_by_game(table: &Table) -> Breakdown<f64> {
    completion_by_game(table)
        .into_iter()
        .map(|(game, completion)| (game, completion.rate()))
        .collect()
}

fn hours_by(table: &Table, column: &str, include: impl Fn(&Row) -> bool) -> Breakdown<f64> {
    group_by(table, column, |sum: &mut f64, row| {
        if include(row) {
            *sum += estimated_hours(row);
        }
    })
}

pub fn time_by_category(table: &Table) -> Breakdown<f64> {
    hours_by(table, col::TROPHY_CATEGORY, |_| true)
}

pub fn time_by_run_type(table: &Table) -> Breakdown<f64> {
    hours_by(table, col::GAME_RUN_TYPE, |_| true)
}

/// Hours still to go per game. Games with nothing left are listed with 0.
pub fn time_remaining_by_game(table: &Table) -> Breakdown<f64> {
    hours_by(table, col::GAME, |row| !is_earned(row))
}

/// (earned, total) over the whole table
pub fn overall_progress(table: &Table) -> (usize, usize) {
    let earned = table.rows().iter().filter(|row| is_earned(row)).count();
    (earned, table.len())
}

/// Trophy type counts, most frequent first, capped at `limit` entries
pub fn trophy_type_distribution(table: &Table, limit: usize) -> Vec<(GroupKey, usize)> {
    let counts = group_by(table, col::TROPHY_TYPE, |n: &mut usize, _| *n += 1);
    let mut counts: Vec<(GroupKey, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts.truncate(limit);
    counts
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TimeProgress {
    pub earned_hours: f64,
    pub total_hours: f64,
}

impl TimeProgress {
    pub fn of(table: &Table) -> Self {
        table.rows().iter().fold(Self::default(), |mut acc, row| {
            let hours = estimated_hours(row);
            acc.total_hours += hours;
            if is_earned(row) {
                acc.earned_hours += hours;
            }
            acc
        })
    }

    pub fn fraction(&self) -> f64 {
        if self.total_hours > 0.0 {
            self.earned_hours / self.total_hours
        } else {
            0.0
        }
    }
}

/// Everything the dashboard shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_games: usize,
    pub total_trophies: usize,
    pub trophies_earned: usize,
    pub type_distribution: Vec<(GroupKey, usize)>,
    pub completion_by_game: Breakdown<Completion>,
    pub time: TimeProgress,
    pub time_by_category: Breakdown<f64>,
    pub time_by_run_type: Breakdown<f64>,
    pub time_remaining_by_game: Breakdown<f64>,
}

impl Dashboard {
    pub const TYPE_LIMIT: usize = 10;

    pub fn build(table: &Table, games: &[String]) -> Self {
        let (trophies_earned, total_trophies) = overall_progress(table);
        Self {
            total_games: games.len(),
            total_trophies,
            trophies_earned,
            type_distribution: trophy_type_distribution(table, Self::TYPE_LIMIT),
            completion_by_game: completion_by_game(table),
            time: TimeProgress::of(table),
            time_by_category: time_by_category(table),
            time_by_run_type: time_by_run_type(table),
            time_remaining_by_game: time_remaining_by_game(table),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionNote {
    pub trophy: String,
    pub notes: Option<String>,
}

/// Totals for a set of trophies picked for one session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub total_hours: f64,
    pub time_by_category: Breakdown<f64>,
    pub time_by_run_type: Breakdown<f64>,
    /// Earned according to `Date Earned`
    pub earned: Completion,
    /// Earned according to the `Earned?` column
    pub earned_flagged: Completion,
    pub notes: Vec<SessionNote>,
}

impl SessionSummary {
    pub fn build(session: &Table) -> Self {
        let mut earned = Completion::default();
        let mut earned_flagged = Completion::default();
        let mut notes = Vec::with_capacity(session.len());
        for row in session.rows() {
            earned.count(is_earned(row));
            earned_flagged.count(row.get(col::EARNED).as_flag() == Some(true));
            let trophy = Trophy::from_row(row);
            notes.push(SessionNote { trophy: trophy.indicator_name(), notes: trophy.notes_tips });
        }
        Self {
            total_hours: TimeProgress::of(session).total_hours,
            time_by_category: time_by_category(session),
            time_by_run_type: time_by_run_type(session),
            earned,
            earned_flagged,
            notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let row = |game: &str, category: Option<&str>, hours: Option<f64>, earned: bool| {
            Row::new()
                .with(col::GAME, game)
                .with(col::TROPHY_NAME, format!("{game} trophy"))
                .with(col::TROPHY_CATEGORY, category)
                .with(col::ESTIMATED_TIME, hours)
                .with(col::DATE_EARNED, earned.then_some("2024-01-01"))
        };
        Table::from_rows(
            vec![
                col::GAME.into(),
                col::TROPHY_NAME.into(),
                col::TROPHY_CATEGORY.into(),
                col::ESTIMATED_TIME.into(),
                col::DATE_EARNED.into(),
            ],
            vec![
                row("Hades", Some("Story"), Some(10.0), true),
                row("Hades", Some("Combat"), Some(5.0), false),
                row("Hades", None, None, false),
                row("Celeste", Some("Story"), Some(3.0), false),
            ],
        )
    }

    #[test]
    fn test_completion_rate_by_game() {
        let rates = completion_rate_by_game(&table());
        assert!((rates[&GroupKey::Named("Hades".into())] - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(rates[&GroupKey::Named("Celeste".into())], 0.0);
    }

    #[test]
    fn test_empty_group_rate_is_zero() {
        assert_eq!(Completion::default().rate(), 0.0);
        assert!(completion_rate_by_game(&Table::new(vec![col::GAME.into()])).is_empty());
    }

    #[test]
    fn test_time_breakdowns_keep_unknown_bucket() {
        let table = table();
        let by_category = time_by_category(&table);
        assert_eq!(by_category[&GroupKey::Named("Story".into())], 13.0);
        assert_eq!(by_category[&GroupKey::Unknown], 0.0);

        let remaining = time_remaining_by_game(&table);
        assert_eq!(remaining[&GroupKey::Named("Hades".into())], 5.0);
        assert_eq!(remaining[&GroupKey::Named("Celeste".into())], 3.0);

        assert!(time_by_run_type(&table).is_empty());
    }

    #[test]
    fn test_overall_and_time_progress() {
        let table = table();
        assert_eq!(overall_progress(&table), (1, 4));
        let time = TimeProgress::of(&table);
        assert_eq!(time.total_hours, 18.0);
        assert_eq!(time.earned_hours, 10.0);
        assert_eq!(TimeProgress::default().fraction(), 0.0);
    }

    #[test]
    fn test_type_distribution_orders_by_count() {
        let mut table = table();
        for (i, kind) in ["Bronze", "Bronze", "Gold"].iter().enumerate() {
            table.set_cell(i, col::TROPHY_TYPE, *kind);
        }
        let distribution = trophy_type_distribution(&table, 2);
        assert_eq!(
            distribution,
            vec![(GroupKey::Named("Bronze".into()), 2), (GroupKey::Named("Gold".into()), 1)]
        );
    }

    #[test]
    fn test_dashboard_serializes_group_keys_as_strings() {
        let dashboard = Dashboard::build(&table(), &["Hades".into(), "Celeste".into()]);
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["total_games"], 2);
        assert_eq!(json["time_by_category"]["(unknown)"], 0.0);
        assert_eq!(json["completion_by_game"]["Hades"]["total"], 3);
    }

    #[test]
    fn test_cleared_category_lands_in_unknown() {
        let mut session = table();
        session.set_cell(0, col::TROPHY_CATEGORY, "");

        let summary = SessionSummary::build(&session);
        assert_eq!(summary.time_by_category[&GroupKey::Unknown], 10.0);
        assert!(!summary.time_by_category.contains_key(&GroupKey::Named(String::new())));
        assert_eq!(summary.time_by_category[&GroupKey::Named("Story".into())], 3.0);
    }

    #[test]
    fn test_session_summary() {
        let mut session = table();
        session.set_cell(1, col::EARNED, "Yes");
        session.set_cell(1, col::NOTES_TIPS, "Use the shield");
        session.set_cell(1, col::MISSABLE, "Yes");

        let summary = SessionSummary::build(&session);
        assert_eq!(summary.total_hours, 18.0);
        assert_eq!(summary.earned, Completion { earned: 1, total: 4 });
        assert_eq!(summary.earned_flagged, Completion { earned: 1, total: 4 });
        assert_eq!(summary.notes[1].trophy, "⚠️ Hades trophy");
        assert_eq!(summary.notes[1].notes.as_deref(), Some("Use the shield"));
    }
}
