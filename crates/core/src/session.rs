//! Session plan: trophies picked for one play session

use serde::{Deserialize, Serialize};

use crate::constants as col;
use crate::table::Table;

/// Ordered selection of rows from a source table. The selection refers to rows
/// by index; [`SessionPlan::materialize`] copies them into a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPlan {
    selected: Vec<usize>,
}

impl SessionPlan {
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut plan = Self::default();
        for index in indices {
            plan.add(index);
        }
        plan
    }

    /// Add a row. Returns false if it was already selected.
    pub fn add(&mut self, index: usize) -> bool {
        if self.selected.contains(&index) {
            return false;
        }
        self.selected.push(index);
        true
    }

    pub fn remove(&mut self, index: usize) -> bool {
        let before = self.selected.len();
        self.selected.retain(|&i| i != index);
        self.selected.len() != before
    }

    pub fn indices(&self) -> &[usize] {
        &self.selected
    }

    /// Copy the selected rows, in selection order, out of `source`
    pub fn materialize(&self, source: &Table) -> Table {
        source.select(&self.selected)
    }
}

/// "Game - Trophy Name" label for a row, used when listing choices
pub fn row_label(table: &Table, index: usize) -> Option<String> {
    let row = table.row(index)?;
    Some(format!(
        "{} - {}",
        row.get(col::GAME),
        row.get(col::TROPHY_NAME)
    ))
}
