//! Checklist items derived from guide text, and per-trophy checklist progress

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;

use crate::cell::Cell;

/// A bullet marker (•, -, *, digits or dots) at the start of the text or of a line
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\n)[•\-*\d.]+\s*(.+)").expect("valid bullet pattern"));

/// Split guide text into checklist items.
///
/// Rules are tried in order and the first one that applies wins:
/// bullet/numbered lines, then comma separated, then semicolon separated,
/// then the whole text as a single item.
pub fn extract_checklist_items(guide_text: &str) -> Vec<String> {
    let bullets: Vec<String> = BULLET
        .captures_iter(guide_text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    if !bullets.is_empty() {
        return bullets;
    }

    for separator in [',', ';'] {
        if guide_text.contains(separator) {
            return guide_text
                .split(separator)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect();
        }
    }

    let trimmed = guide_text.trim();
    if trimmed.is_empty() {
        Vec::new()
    } else {
        vec![trimmed.to_string()]
    }
}

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("malformed checklist progress: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("checklist progress cell holds {0} instead of JSON text")]
    NotText(String),
}

/// Completion state of one trophy's checklist, keyed by item text.
/// Stored in a single cell as a JSON object of item to bool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistProgress(BTreeMap<String, bool>);

impl ChecklistProgress {
    /// Progress for the current `items`, carrying over the checked state of
    /// items whose text is unchanged. Items no longer present are dropped.
    pub fn merge(items: &[String], previous: &ChecklistProgress) -> Self {
        Self(
            items
                .iter()
                .map(|item| (item.clone(), previous.is_checked(item)))
                .collect(),
        )
    }

    pub fn is_checked(&self, item: &str) -> bool {
        self.0.get(item).copied().unwrap_or(false)
    }

    pub fn set(&mut self, item: impl Into<String>, checked: bool) {
        self.0.insert(item.into(), checked);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn completed(&self) -> usize {
        self.0.values().filter(|checked| **checked).count()
    }

    pub fn to_json(&self) -> Result<String, ProgressError> {
        Ok(serde_json::to_string(&self.0)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ProgressError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a progress cell. A blank cell means no progress recorded.
    pub fn from_cell(cell: &Cell) -> Result<Self, ProgressError> {
        match cell {
            Cell::Empty => Ok(Self::default()),
            Cell::Text(text) if text.trim().is_empty() => Ok(Self::default()),
            Cell::Text(text) => Self::from_json(text),
            Cell::Bool(_) => Err(ProgressError::NotText("a boolean".into())),
            Cell::Number(_) => Err(ProgressError::NotText("a number".into())),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for ChecklistProgress {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(item, checked)| (item.into(), checked)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_lines_win() {
        assert_eq!(
            extract_checklist_items("1. grab sword\n2. defeat boss"),
            vec!["grab sword", "defeat boss"]
        );
    }

    #[test]
    fn test_bullets_win_over_commas() {
        assert_eq!(
            extract_checklist_items("• wood, stone\n• iron"),
            vec!["wood, stone", "iron"]
        );
    }

    #[test]
    fn test_comma_then_semicolon_then_single() {
        assert_eq!(extract_checklist_items("wood, stone, iron"), vec!["wood", "stone", "iron"]);
        assert_eq!(extract_checklist_items("wood; ;stone"), vec!["wood", "stone"]);
        assert_eq!(extract_checklist_items("only one item"), vec!["only one item"]);
        assert!(extract_checklist_items("").is_empty());
        assert!(extract_checklist_items("   \n ").is_empty());
    }

    #[test]
    fn test_bullets_after_intro_text() {
        let guide = "Collect these:\n- Red gem\n* Blue gem\n";
        assert_eq!(extract_checklist_items(guide), vec!["Red gem", "Blue gem"]);
    }

    #[test]
    fn test_merge_keeps_matching_items_only() {
        let previous: ChecklistProgress = [("wood", true), ("stone", true), ("gold", false)]
            .into_iter()
            .collect();
        let items = vec!["wood".to_string(), "iron".to_string()];

        let merged = ChecklistProgress::merge(&items, &previous);
        assert_eq!(merged.len(), 2);
        assert!(merged.is_checked("wood"));
        assert!(!merged.is_checked("iron"));
        assert!(!merged.is_checked("stone"));
    }

    #[test]
    fn test_cell_parsing_fails_closed_for_callers() {
        assert!(ChecklistProgress::from_cell(&Cell::Empty).unwrap().is_empty());
        assert!(ChecklistProgress::from_cell(&Cell::from("{not json")).is_err());
        assert!(ChecklistProgress::from_cell(&Cell::Number(1.0)).is_err());

        let progress = ChecklistProgress::from_cell(&Cell::from(r#"{"x": true}"#)).unwrap();
        assert!(progress.is_checked("x"));
        assert_eq!(progress.to_json().unwrap(), r#"{"x":true}"#);
    }
}
