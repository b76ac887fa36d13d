//! Command handlers. Each request builds its own state from the store; nothing
//! is kept between commands.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use trophytrack_core::aggregate::trophy_type_distribution;
use trophytrack_core::constants::SESSION_PLAN_SHEET;
use trophytrack_core::filter::filtered_indices;
use trophytrack_core::session::row_label;
use trophytrack_core::trophy::{find_by_key, find_by_name};
use trophytrack_core::{
    extract_checklist_items, ChecklistProgress, Dashboard, SessionPlan, SessionSummary, Table,
    Trophy, TrophyKey,
};

use crate::cli::{
    ChecklistCommand, Cli, Command, ConfigCommand, OutputFormat, PlanCli, SessionCommand,
    SheetCommand, TrophyCommand, TrophyRef,
};
use crate::config::Config;
use crate::db::{self, Workbook};
use crate::error::{Result, TrackerError};
use crate::render;

pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    pub workbook: Workbook,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config: Config, cli: &Cli) -> Self {
        let workbook = Workbook::new(config.resolve_store_path(cli.store.as_deref()));
        tracing::debug!("Using store {}", workbook.path().display());
        Self { config, config_path: cli.config.clone(), workbook, format: cli.format }
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => print!("{}", text()),
        }
        Ok(())
    }
}

pub fn run(ctx: &Context, command: &Command) -> Result<()> {
    match command {
        Command::Dashboard => dashboard(ctx),
        Command::Plan(args) => plan(ctx, args),
        Command::Session { command } => session(ctx, command),
        Command::Trophy { command: TrophyCommand::Show(trophy) } => trophy_show(ctx, trophy),
        Command::Checklist { command } => match command {
            ChecklistCommand::Show(trophy) => checklist_show(ctx, trophy),
            ChecklistCommand::Save { trophy, check, uncheck, all, none } => {
                checklist_save(ctx, trophy, check, uncheck, *all, *none)
            }
        },
        Command::Sheet { command } => match command {
            SheetCommand::List => sheet_list(ctx),
            SheetCommand::Import { name, file } => sheet_import(ctx, name, file),
        },
        Command::Config { command } => match command {
            ConfigCommand::Show => config_show(ctx),
            ConfigCommand::Init { force } => config_init(ctx, *force),
        },
    }
}

fn dashboard(ctx: &Context) -> Result<()> {
    let (trophies, games) = db::load_trophies(&ctx.workbook);
    let mut dashboard = Dashboard::build(&trophies, &games);
    if ctx.config.type_distribution_limit != Dashboard::TYPE_LIMIT {
        dashboard.type_distribution =
            trophy_type_distribution(&trophies, ctx.config.type_distribution_limit);
    }
    ctx.emit(&dashboard, || render::dashboard(&dashboard))
}

#[derive(Serialize)]
struct PlanView<'a> {
    trophies: &'a Table,
    selected: Option<&'a Table>,
    summary: Option<&'a SessionSummary>,
}

fn plan(ctx: &Context, args: &PlanCli) -> Result<()> {
    let (trophies, _) = db::load_trophies(&ctx.workbook);
    let criteria = args.filters.criteria(&ctx.config);
    let view = trophies.select(&filtered_indices(&trophies, &criteria));
    tracing::debug!(shown = view.len(), total = trophies.len(), "filters applied");

    if args.select.is_empty() {
        return ctx.emit(&PlanView { trophies: &view, selected: None, summary: None }, || {
            render::table_view(&view, &render::LIST_COLUMNS)
        });
    }

    if let Some(&missing) = args.select.iter().find(|&&index| index >= view.len()) {
        return Err(TrackerError::NoSuchRow(missing));
    }
    let selected = SessionPlan::from_indices(args.select.iter().copied()).materialize(&view);

    if args.save {
        db::save_session_plan(&ctx.workbook, &selected)?;
    }
    if let Some(path) = &args.export {
        write_export(&selected, path)?;
    }

    let summary = args.summary.then(|| SessionSummary::build(&selected));
    let shown = PlanView { trophies: &view, selected: Some(&selected), summary: summary.as_ref() };
    ctx.emit(&shown, || {
        let mut out = render::table_view(&selected, &render::LIST_COLUMNS);
        if let Some(summary) = &summary {
            out.push('\n');
            out.push_str(&render::session_summary(summary));
        }
        if args.save {
            out.push_str(&format!("\nSaved {} trophies to the session plan.\n", selected.len()));
        }
        out
    })
}

fn session(ctx: &Context, command: &SessionCommand) -> Result<()> {
    let mut plan = db::load_session_plan(&ctx.workbook);
    match command {
        SessionCommand::Show => {
            ctx.emit(&plan, || render::table_view(&plan, &render::LIST_COLUMNS))
        }
        SessionCommand::Summary => {
            let summary = SessionSummary::build(&plan);
            ctx.emit(&summary, || render::session_summary(&summary))
        }
        SessionCommand::Edit { row, column, value } => {
            if !plan.set_cell(*row, column, value.as_str()) {
                return Err(TrackerError::NoSuchRow(*row));
            }
            db::save_session_plan(&ctx.workbook, &plan)?;
            ctx.emit(&plan, || format!("Updated '{}' of row {}.\n", column, row))
        }
        SessionCommand::Drop { row } => {
            let label = row_label(&plan, *row).ok_or(TrackerError::NoSuchRow(*row))?;
            plan.remove_row(*row);
            db::save_session_plan(&ctx.workbook, &plan)?;
            ctx.emit(&plan, || format!("Removed {} from the session plan.\n", label))
        }
        SessionCommand::Export { out } => {
            let path = out
                .clone()
                .unwrap_or_else(|| ctx.config.export_path(&format!("{}.xlsx", SESSION_PLAN_SHEET)));
            write_export(&plan, &path)?;
            ctx.emit(&path, || format!("Exported {} trophies to {}\n", plan.len(), path.display()))
        }
    }
}

fn write_export(plan: &Table, path: &Path) -> Result<()> {
    let bytes = db::export_session_plan(plan)?;
    fs::write(path, bytes)?;
    tracing::info!("Exported session plan to {}", path.display());
    Ok(())
}

/// Locate a trophy by key when a game is given, otherwise by first name match
fn find_trophy(ctx: &Context, trophy: &TrophyRef) -> Result<(Table, usize)> {
    let (trophies, _) = db::load_trophies(&ctx.workbook);
    let found = match &trophy.game {
        Some(game) => find_by_key(&trophies, &TrophyKey::new(game.as_str(), trophy.name.as_str())),
        None => find_by_name(&trophies, &trophy.name),
    };
    match found {
        Some(index) => Ok((trophies, index)),
        None => Err(TrackerError::UnknownTrophy(describe(trophy))),
    }
}

fn describe(trophy: &TrophyRef) -> String {
    match &trophy.game {
        Some(game) => TrophyKey::new(game.as_str(), trophy.name.as_str()).to_string(),
        None => trophy.name.clone(),
    }
}

fn trophy_show(ctx: &Context, trophy: &TrophyRef) -> Result<()> {
    let (trophies, index) = find_trophy(ctx, trophy)?;
    let row = trophies.row(index).ok_or(TrackerError::NoSuchRow(index))?;
    let trophy = Trophy::from_row(row);
    ctx.emit(&trophy, || render::trophy(&trophy))
}

/// A trophy's guide items with the stored progress carried over onto them
#[derive(Serialize)]
struct ChecklistView {
    trophy: TrophyKey,
    required: bool,
    items: Vec<String>,
    progress: ChecklistProgress,
}

impl ChecklistView {
    fn of(trophies: &Table, index: usize) -> Result<Self> {
        let row = trophies.row(index).ok_or(TrackerError::NoSuchRow(index))?;
        let trophy = Trophy::from_row(row);
        let items = trophy.guide.as_deref().map(extract_checklist_items).unwrap_or_default();
        let progress = ChecklistProgress::merge(&items, &trophy.checklist_progress);
        Ok(Self {
            trophy: TrophyKey::of_row(row).ok_or(TrackerError::NoSuchRow(index))?,
            required: trophy.checklist_required,
            items,
            progress,
        })
    }

    fn render(&self) -> String {
        render::trophy_checklist(&self.trophy, self.required, &self.items, &self.progress)
    }
}

fn checklist_show(ctx: &Context, trophy: &TrophyRef) -> Result<()> {
    let (trophies, index) = find_trophy(ctx, trophy)?;
    let view = ChecklistView::of(&trophies, index)?;
    ctx.emit(&view, || view.render())
}

fn checklist_save(
    ctx: &Context,
    trophy: &TrophyRef,
    check: &[String],
    uncheck: &[String],
    all: bool,
    none: bool,
) -> Result<()> {
    let (trophies, index) = find_trophy(ctx, trophy).map_err(|e| match e {
        TrackerError::UnknownTrophy(name) => TrackerError::NotFound(name),
        e => e,
    })?;
    let mut view = ChecklistView::of(&trophies, index)?;

    // Progress keys are exactly the guide's items
    if let Some(unknown) = check.iter().chain(uncheck).find(|item| !view.items.contains(*item)) {
        return Err(TrackerError::UnknownItem(unknown.clone()));
    }
    if all || none {
        for item in &view.items {
            view.progress.set(item.as_str(), all);
        }
    }
    for item in check {
        view.progress.set(item.as_str(), true);
    }
    for item in uncheck {
        view.progress.set(item.as_str(), false);
    }

    view.trophy = match &trophy.game {
        Some(game) => {
            let key = TrophyKey::new(game.as_str(), trophy.name.as_str());
            db::save_checklist_progress_for_key(&ctx.workbook, &key, &view.progress)?;
            key
        }
        None => db::save_checklist_progress(&ctx.workbook, &trophy.name, &view.progress)?,
    };

    ctx.emit(&view, || format!("Saved progress for {}", view.render()))
}

fn sheet_list(ctx: &Context) -> Result<()> {
    let names = match ctx.workbook.connect() {
        Ok(conn) => db::list_sheets(&conn)?,
        Err(TrackerError::MissingStore(path)) => {
            tracing::info!("No backing store at {} yet", path.display());
            Vec::new()
        }
        Err(e) => return Err(e),
    };
    ctx.emit(&names, || {
        if names.is_empty() {
            "No sheets yet.\n".to_string()
        } else {
            names.iter().map(|name| format!("{}\n", name)).collect()
        }
    })
}

fn sheet_import(ctx: &Context, name: &str, file: &Path) -> Result<()> {
    let content = fs::read_to_string(file)?;
    let records: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(&content)?;
    let table = Table::from_records(records);
    db::import_sheet(&ctx.workbook, name, &table)?;
    ctx.emit(&table.len(), || format!("Imported {} trophies into '{}'.\n", table.len(), name))
}

#[derive(Serialize)]
struct ConfigView<'a> {
    #[serde(flatten)]
    config: &'a Config,
    resolved_store: &'a Path,
}

fn config_show(ctx: &Context) -> Result<()> {
    let view = ConfigView { config: &ctx.config, resolved_store: ctx.workbook.path() };
    let text = toml::to_string_pretty(&ctx.config)?;
    ctx.emit(&view, || {
        format!("# {}\n{}\n# store in use: {}\n", ctx.config_path.display(), text, ctx.workbook.path().display())
    })
}

fn config_init(ctx: &Context, force: bool) -> Result<()> {
    if ctx.config_path.exists() && !force {
        return ctx.emit(&ctx.config_path, || {
            format!("{} already exists (use --force to overwrite)\n", ctx.config_path.display())
        });
    }
    Config::default().save_to(&ctx.config_path)?;
    tracing::info!("Wrote {}", ctx.config_path.display());
    ctx.emit(&ctx.config_path, || format!("Wrote {}\n", ctx.config_path.display()))
}
