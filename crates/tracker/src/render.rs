//! Plain-text rendering of tables, the dashboard and session summaries

use std::fmt::Write;
use trophytrack_core::aggregate::Breakdown;
use trophytrack_core::constants as col;
use trophytrack_core::{ChecklistProgress, Dashboard, SessionSummary, Table, Trophy, TrophyKey};

const MAX_CELL_WIDTH: usize = 40;

/// Columns shown in list views, when the table has them
pub const LIST_COLUMNS: [&str; 7] = [
    col::GAME,
    col::TROPHY_NAME,
    col::TROPHY_TYPE,
    col::ESTIMATED_TIME,
    col::DIFFICULTY,
    col::RARITY,
    col::DATE_EARNED,
];

pub fn hours(value: f64) -> String {
    format!("{:.1}h", value)
}

pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn clip(text: &str) -> String {
    let text = text.replace('\n', " ");
    if text.chars().count() <= MAX_CELL_WIDTH {
        text
    } else {
        let mut clipped: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        clipped.push('…');
        clipped
    }
}

/// Aligned table of `columns` (those the table lacks are left out), with a
/// leading `#` column of row positions.
pub fn table_view(table: &Table, columns: &[&str]) -> String {
    if table.is_empty() {
        return "No trophies.\n".to_string();
    }
    let columns: Vec<&str> = columns.iter().copied().filter(|c| table.has_column(c)).collect();

    let mut header = vec!["#".to_string()];
    header.extend(columns.iter().map(|c| c.to_string()));
    let body: Vec<Vec<String>> = table
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let mut line = vec![index.to_string()];
            line.extend(columns.iter().map(|c| clip(&row.get(c).to_string())));
            line
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in &body {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for line in std::iter::once(&header).chain(&body) {
        let padded: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        let _ = writeln!(out, "{}", padded.join("  ").trim_end());
    }
    out
}

fn breakdown_lines(out: &mut String, title: &str, breakdown: &Breakdown<f64>) {
    if breakdown.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}:", title);
    for (key, value) in breakdown {
        let _ = writeln!(out, "  {:<30} {:>8}", key.to_string(), hours(*value));
    }
}

pub fn dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Games:    {}", dashboard.total_games);
    let _ = writeln!(out, "Trophies: {}", dashboard.total_trophies);
    let _ = writeln!(out, "Earned:   {}", dashboard.trophies_earned);
    let _ = writeln!(
        out,
        "Time:     {} of {} ({})",
        hours(dashboard.time.earned_hours),
        hours(dashboard.time.total_hours),
        percent(dashboard.time.fraction())
    );

    if !dashboard.type_distribution.is_empty() {
        let _ = writeln!(out, "\nTrophy types:");
        for (kind, count) in &dashboard.type_distribution {
            let _ = writeln!(out, "  {:<30} {:>8}", kind.to_string(), count);
        }
    }

    if !dashboard.completion_by_game.is_empty() {
        let _ = writeln!(out, "\nCompletion by game:");
        for (game, completion) in &dashboard.completion_by_game {
            let _ = writeln!(
                out,
                "  {:<30} {:>4}/{:<4} {:>7}",
                game.to_string(),
                completion.earned,
                completion.total,
                percent(completion.rate())
            );
        }
    }

    breakdown_lines(&mut out, "Time by category", &dashboard.time_by_category);
    breakdown_lines(&mut out, "Time by run type", &dashboard.time_by_run_type);
    breakdown_lines(&mut out, "Time remaining by game", &dashboard.time_remaining_by_game);
    out
}

pub fn session_summary(summary: &SessionSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Session time: {}", hours(summary.total_hours));
    let _ = writeln!(
        out,
        "Earned: {}/{} (Date Earned), {}/{} (Earned?)",
        summary.earned.earned,
        summary.earned.total,
        summary.earned_flagged.earned,
        summary.earned_flagged.total
    );
    breakdown_lines(&mut out, "By category", &summary.time_by_category);
    breakdown_lines(&mut out, "By run type", &summary.time_by_run_type);

    if !summary.notes.is_empty() {
        let _ = writeln!(out, "\nNotes:");
        for note in &summary.notes {
            match &note.notes {
                Some(notes) => {
                    let _ = writeln!(out, "  {}: {}", note.trophy, notes);
                }
                None => {
                    let _ = writeln!(out, "  {}", note.trophy);
                }
            }
        }
    }
    out
}

pub fn checklist(items: &[String], progress: &ChecklistProgress) -> String {
    if items.is_empty() {
        return "No checklist items in the guide.\n".to_string();
    }
    let mut out = String::new();
    for item in items {
        let mark = if progress.is_checked(item) { 'x' } else { ' ' };
        let _ = writeln!(out, "[{}] {}", mark, item);
    }
    let _ = writeln!(out, "{}/{} done", progress.completed(), items.len());
    out
}

/// Checklist of one trophy, headed by its key
pub fn trophy_checklist(
    key: &TrophyKey,
    required: bool,
    items: &[String],
    progress: &ChecklistProgress,
) -> String {
    let mut out = format!("{}\n", key);
    if !required {
        out.push_str("This trophy does not require a checklist.\n");
    }
    out.push_str(&checklist(items, progress));
    out
}

pub fn trophy(trophy: &Trophy) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", trophy.indicator_name(), trophy.game);

    let optional = [
        ("Type", &trophy.trophy_type),
        ("Category", &trophy.trophy_category),
        ("Run type", &trophy.game_run_type),
        ("Console", &trophy.console),
        ("DLC", &trophy.dlc),
        ("Rarity", &trophy.rarity),
        ("Session", &trophy.session_type),
        ("Description", &trophy.description),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            let _ = writeln!(out, "{:<12} {}", label, value);
        }
    }
    let _ = writeln!(out, "{:<12} {}", "Estimated", hours(trophy.estimated_time));
    if let Some(difficulty) = trophy.difficulty {
        let _ = writeln!(out, "{:<12} {}", "Difficulty", difficulty);
    }
    match (trophy.earned, trophy.date_earned) {
        (true, Some(date)) => {
            let _ = writeln!(out, "{:<12} {}", "Earned", date.format("%Y-%m-%d"));
        }
        (true, None) => {
            let _ = writeln!(out, "{:<12} yes", "Earned");
        }
        (false, _) => {
            let _ = writeln!(out, "{:<12} no", "Earned");
        }
    }
    if let Some(notes) = &trophy.notes_tips {
        let _ = writeln!(out, "{:<12} {}", "Notes", notes);
    }
    if let Some(guide) = &trophy.guide {
        let _ = writeln!(out, "\nGuide:\n{}", guide);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use trophytrack_core::Row;

    #[test]
    fn test_table_view_aligns_and_skips_missing_columns() {
        let table = Table::from_rows(
            vec![col::GAME.into(), col::TROPHY_NAME.into()],
            vec![
                Row::new().with(col::GAME, "Hades").with(col::TROPHY_NAME, "Escape"),
                Row::new().with(col::GAME, "Celeste").with(col::TROPHY_NAME, "Summit"),
            ],
        );
        let text = table_view(&table, &LIST_COLUMNS);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "#  Game     Trophy Name");
        assert_eq!(lines[1], "0  Hades    Escape");
        assert_eq!(lines[2], "1  Celeste  Summit");
        assert_eq!(table_view(&Table::default(), &LIST_COLUMNS), "No trophies.\n");
    }

    #[test]
    fn test_clip_long_text() {
        let clipped = clip(&"a".repeat(100));
        assert_eq!(clipped.chars().count(), MAX_CELL_WIDTH);
        assert!(clipped.ends_with('…'));
    }

    #[test]
    fn test_checklist_marks() {
        let items = vec!["wood".to_string(), "stone".to_string()];
        let progress: ChecklistProgress = [("wood", true)].into_iter().collect();
        assert_eq!(checklist(&items, &progress), "[x] wood\n[ ] stone\n1/2 done\n");
    }

    #[test]
    fn test_trophy_checklist_notes_when_not_required() {
        let key = TrophyKey::new("Minecraft", "Getting Wood");
        let items = vec!["wood".to_string()];
        let progress = ChecklistProgress::default();

        let optional = trophy_checklist(&key, false, &items, &progress);
        assert!(optional.starts_with(&format!("{}\n", key)));
        assert!(optional.contains("does not require a checklist"));

        let required = trophy_checklist(&key, true, &items, &progress);
        assert!(!required.contains("does not require"));
        assert!(required.ends_with("[ ] wood\n0/1 done\n"));
    }
}
