//! End-to-end store workflows: import, filter, plan, checklist progress

use trophytrack::db::{
    checklist_entries, checklist_progress, import_sheet, list_sheets, load_session_plan,
    load_trophies, save_checklist_progress, save_checklist_progress_for_key, save_session_plan,
    Workbook,
};
use trophytrack::TrackerError;
use trophytrack_core::constants as col;
use trophytrack_core::filter::apply;
use trophytrack_core::{ChecklistProgress, Dashboard, FilterCriteria, SessionPlan, Table, TrophyKey};

fn records(json: &str) -> Table {
    Table::from_records(serde_json::from_str(json).unwrap())
}

fn seeded() -> (tempfile::TempDir, Workbook) {
    let dir = tempfile::tempdir().unwrap();
    let workbook = Workbook::new(dir.path().join("trophy_tracker.db"));
    import_sheet(
        &workbook,
        "Hollow Knight",
        &records(
            r#"[
                {"Game": "Hollow Knight", "Trophy Name": "Completion", "Trophy Type": "Gold",
                 "Estimated Time": 40, "Guide": "Charms, Masks, Vessels", "Checklist Required": "Yes"},
                {"Game": "Hollow Knight", "Trophy Name": "Speedrun", "Trophy Type": "Gold",
                 "Estimated Time": 5, "Difficulty": 9, "Date Earned": "2024-03-01"},
                {"Game": "Hollow Knight", "Trophy Name": "Platinum", "Trophy Type": "Platinum",
                 "Estimated Time": 60}
            ]"#,
        ),
    )
    .unwrap();
    import_sheet(
        &workbook,
        "Celeste",
        &records(
            r#"[
                {"Game": "Celeste", "Trophy Name": "Platinum", "Trophy Type": "Platinum",
                 "Estimated Time": 30, "Console": "PS4"},
                {"Game": "Celeste", "Trophy Name": "Strawberries", "Trophy Type": "Silver",
                 "Estimated Time": "", "Collectible?": "Yes"}
            ]"#,
        ),
    )
    .unwrap();
    (dir, workbook)
}

#[test]
fn test_repository_union_and_dashboard() {
    let (_dir, workbook) = seeded();
    let (trophies, games) = load_trophies(&workbook);

    assert_eq!(games, vec!["Hollow Knight", "Celeste"]);
    assert_eq!(trophies.len(), 5);
    assert!(trophies.has_column(col::CONSOLE));
    assert!(trophies.has_column(col::COLLECTIBLE));

    let dashboard = Dashboard::build(&trophies, &games);
    assert_eq!(dashboard.total_games, 2);
    assert_eq!(dashboard.trophies_earned, 1);
    assert_eq!(dashboard.time.total_hours, 135.0);
}

#[test]
fn test_checklist_progress_round_trip() {
    let (_dir, workbook) = seeded();
    let progress: ChecklistProgress = [("Charms", true), ("Masks", false)].into_iter().collect();

    let key = save_checklist_progress(&workbook, "Completion", &progress).unwrap();
    assert_eq!(key, TrophyKey::new("Hollow Knight", "Completion"));
    assert_eq!(checklist_progress(&workbook, &key), progress);

    // The overlay makes the progress visible in the merged table too
    let (trophies, _) = load_trophies(&workbook);
    let criteria = FilterCriteria { name_contains: Some("completion".into()), ..Default::default() };
    let row = apply(&trophies, &criteria);
    let stored = ChecklistProgress::from_cell(row.row(0).unwrap().get(col::CHECKLIST_PROGRESS)).unwrap();
    assert_eq!(stored, progress);

    // Progress lives in its own sheet
    let conn = workbook.open().unwrap();
    assert!(list_sheets(&conn).unwrap().contains(&"Checklist".to_string()));
}

#[test]
fn test_unknown_trophy_leaves_store_unchanged() {
    let (_dir, workbook) = seeded();
    let before = std::fs::read(workbook.path()).unwrap();

    let progress: ChecklistProgress = [("x", true)].into_iter().collect();
    let result = save_checklist_progress(&workbook, "Does Not Exist", &progress);

    match result {
        Err(TrackerError::NotFound(name)) => assert_eq!(name, "Does Not Exist"),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert!(checklist_entries(&workbook).unwrap().is_empty());
    assert_eq!(std::fs::read(workbook.path()).unwrap(), before);
}

#[test]
fn test_shared_names_use_composite_key() {
    let (_dir, workbook) = seeded();
    let celeste = TrophyKey::new("Celeste", "Platinum");
    let progress: ChecklistProgress = [("A-Side", true)].into_iter().collect();
    save_checklist_progress_for_key(&workbook, &celeste, &progress).unwrap();

    assert_eq!(checklist_progress(&workbook, &celeste), progress);
    assert!(checklist_progress(&workbook, &TrophyKey::new("Hollow Knight", "Platinum")).is_empty());
}

#[test]
fn test_session_plan_workflow() {
    let (_dir, workbook) = seeded();
    let (trophies, _) = load_trophies(&workbook);
    let criteria = FilterCriteria {
        not_earned_only: true,
        sort_by: Some(col::ESTIMATED_TIME.into()),
        ..Default::default()
    };
    let view = apply(&trophies, &criteria);
    assert_eq!(view.len(), 4);

    let plan = SessionPlan::from_indices([2, 0]).materialize(&view);
    save_session_plan(&workbook, &plan).unwrap();

    let reloaded = load_session_plan(&workbook);
    assert_eq!(reloaded, plan);
    assert_eq!(
        reloaded.unique_values(col::GAME),
        vec!["Hollow Knight", "Celeste"]
    );

    // The saved plan is not a game sheet
    let (after, games) = load_trophies(&workbook);
    assert_eq!(after.len(), 5);
    assert!(!games.contains(&"SessionPlan".to_string()));
}
