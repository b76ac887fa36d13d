//! Filter and sort engine over the trophy table
//!
//! A [`FilterCriteria`] turns into a list of row predicates. Every predicate
//! looks at one row only, so the conjunction is independent of the order the
//! predicates are evaluated in, and filtering twice gives the same rows as
//! filtering once. Predicates that reference a column the table does not have
//! are dropped instead of failing.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::constants as col;
use crate::table::{Row, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending { SortOrder::Ascending } else { SortOrder::Descending }
    }
}

/// Tri-state filter: All, Only With, Only Without
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriFilter {
    #[default]
    All,
    With,
    Without,
}

impl TriFilter {
    /// The required flag value, or `None` when the filter is off
    pub fn required(&self) -> Option<bool> {
        match self {
            TriFilter::All => None,
            TriFilter::With => Some(true),
            TriFilter::Without => Some(false),
        }
    }
}

/// When the difficulty range applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyMode {
    /// Whenever a range is given
    #[default]
    Independent,
    /// Only while the checklist-required filter is engaged, as older
    /// versions of the tracker behaved
    ChecklistGated,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub games: BTreeSet<String>,
    pub trophy_types: BTreeSet<String>,
    pub consoles: BTreeSet<String>,
    pub dlc_values: BTreeSet<String>,
    pub guide_available: BTreeSet<String>,
    pub rarity: BTreeSet<String>,
    pub session_types: BTreeSet<String>,
    pub checklist_required: TriFilter,
    pub difficulty_range: Option<(f64, f64)>,
    pub difficulty_mode: DifficultyMode,
    pub time_range: Option<(f64, f64)>,
    pub multiplayer_only: bool,
    pub not_earned_only: bool,
    pub missable_only: bool,
    pub collectible_only: bool,
    pub grindy_only: bool,
    pub dlc_only: bool,
    pub name_contains: Option<String>,
    pub description_contains: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

/// A single row test
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Cell text is one of the values; blank cells never match
    OneOf { column: &'static str, values: BTreeSet<String> },
    /// Normalized flag equals the expected value
    Flag { column: &'static str, expected: bool },
    /// Numeric cell within the inclusive range. Blank cells fail; text that is
    /// not a number is left alone.
    Range { column: &'static str, min: f64, max: f64 },
    /// Cell is blank
    Missing { column: &'static str },
    /// Cell is not blank
    Present { column: &'static str },
    /// Case-insensitive substring; blank cells never match
    Contains { column: &'static str, needle: String },
}

impl Predicate {
    pub fn column(&self) -> &'static str {
        match self {
            Predicate::OneOf { column, .. }
            | Predicate::Flag { column, .. }
            | Predicate::Range { column, .. }
            | Predicate::Missing { column }
            | Predicate::Present { column }
            | Predicate::Contains { column, .. } => *column,
        }
    }

    pub fn matches(&self, row: &Row) -> bool {
        let cell = row.get(self.column());
        match self {
            Predicate::OneOf { values, .. } => {
                cell.as_text().map(|text| values.contains(&text)).unwrap_or(false)
            }
            Predicate::Flag { expected, .. } => cell.as_flag() == Some(*expected),
            Predicate::Range { min, max, .. } => {
                if cell.is_blank() {
                    return false;
                }
                match cell.as_number() {
                    Some(n) => *min <= n && n <= *max,
                    None => true,
                }
            }
            Predicate::Missing { .. } => cell.is_blank(),
            Predicate::Present { .. } => !cell.is_blank(),
            Predicate::Contains { needle, .. } => cell
                .as_text()
                .map(|text| text.to_lowercase().contains(needle.as_str()))
                .unwrap_or(false),
        }
    }
}

impl FilterCriteria {
    /// Predicates engaged by these criteria that the table can evaluate
    pub fn predicates(&self, table: &Table) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        let memberships = [
            (col::GAME, &self.games),
            (col::TROPHY_TYPE, &self.trophy_types),
            (col::CONSOLE, &self.consoles),
            (col::DLC, &self.dlc_values),
            (col::GUIDE_AVAILABLE, &self.guide_available),
            (col::RARITY, &self.rarity),
            (col::SESSION_TYPE, &self.session_types),
        ];
        for (column, values) in memberships {
            if !values.is_empty() {
                predicates.push(Predicate::OneOf { column, values: values.clone() });
            }
        }

        if let Some(expected) = self.checklist_required.required() {
            predicates.push(Predicate::Flag { column: col::CHECKLIST_REQUIRED, expected });
        }

        let difficulty_engaged = match self.difficulty_mode {
            DifficultyMode::Independent => true,
            DifficultyMode::ChecklistGated => self.checklist_required != TriFilter::All,
        };
        if let Some((min, max)) = self.difficulty_range.filter(|_| difficulty_engaged) {
            predicates.push(Predicate::Range { column: col::DIFFICULTY, min, max });
        }
        if let Some((min, max)) = self.time_range {
            predicates.push(Predicate::Range { column: col::ESTIMATED_TIME, min, max });
        }

        let flags = [
            (self.multiplayer_only, col::MULTIPLAYER),
            (self.missable_only, col::MISSABLE),
            (self.collectible_only, col::COLLECTIBLE),
            (self.grindy_only, col::GRINDY),
        ];
        for (engaged, column) in flags {
            if engaged {
                predicates.push(Predicate::Flag { column, expected: true });
            }
        }

        if self.not_earned_only {
            predicates.push(Predicate::Missing { column: col::DATE_EARNED });
        }
        if self.dlc_only {
            predicates.push(Predicate::Present { column: col::DLC });
        }

        let searches = [
            (col::TROPHY_NAME, &self.name_contains),
            (col::DESCRIPTION, &self.description_contains),
        ];
        for (column, needle) in searches {
            if let Some(needle) = needle.as_deref().filter(|n| !n.is_empty()) {
                predicates.push(Predicate::Contains { column, needle: needle.to_lowercase() });
            }
        }

        predicates.retain(|p| table.has_column(p.column()));
        predicates
    }

    /// True when no filter is engaged. Sorting and the difficulty mode alone
    /// do not count.
    pub fn is_empty(&self) -> bool {
        *self
            == FilterCriteria {
                sort_by: self.sort_by.clone(),
                sort_order: self.sort_order,
                difficulty_mode: self.difficulty_mode,
                ..Default::default()
            }
    }
}

/// Indices of the rows that pass every engaged filter, in output order
pub fn filtered_indices(table: &Table, criteria: &FilterCriteria) -> Vec<usize> {
    let predicates = criteria.predicates(table);
    let mut indices: Vec<usize> = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| predicates.iter().all(|p| p.matches(row)))
        .map(|(idx, _)| idx)
        .collect();

    if let Some(column) = criteria.sort_by.as_deref().filter(|c| table.has_column(c)) {
        let rows = table.rows();
        indices.sort_by(|&a, &b| compare_rows(&rows[a], &rows[b], column, criteria.sort_order));
    }
    indices
}

/// Filter then sort. The input table is left untouched.
pub fn apply(table: &Table, criteria: &FilterCriteria) -> Table {
    table.select(&filtered_indices(table, criteria))
}

/// Blank cells go last regardless of direction.
fn compare_rows(a: &Row, b: &Row, column: &str, order: SortOrder) -> Ordering {
    let (a, b) = (a.get(column), b.get(column));
    match (a.is_blank(), b.is_blank()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let cmp = a.sort_cmp(b);
            if order == SortOrder::Descending { cmp.reverse() } else { cmp }
        }
    }
}
