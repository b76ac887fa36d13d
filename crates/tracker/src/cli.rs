//! CLI struct definitions for the trophytrack command line.
//!
//! All clap-derived types live here. Dispatch lives in `commands`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use trophytrack_core::{DifficultyMode, FilterCriteria, SortOrder, TriFilter};

use crate::config::Config;

#[derive(Parser, Debug)]
#[clap(
    name = "trophytrack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Plan trophy hunting sessions, track checklists and see completion stats."
)]
pub struct Cli {
    /// Backing store file (overrides TROPHYTRACK_STORE and the config file)
    #[clap(long, global = true)]
    pub store: Option<PathBuf>,

    /// Config file to read
    #[clap(long, global = true, default_value = crate::config::CONFIG_PATH)]
    pub config: PathBuf,

    /// Output format
    #[clap(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Totals, completion per game and time breakdowns
    Dashboard,
    /// Filter and sort trophies, optionally picking a session plan
    Plan(PlanCli),
    /// Work with the saved session plan
    Session {
        #[clap(subcommand)]
        command: SessionCommand,
    },
    /// Trophy details
    Trophy {
        #[clap(subcommand)]
        command: TrophyCommand,
    },
    /// Checklist items derived from a trophy's guide
    Checklist {
        #[clap(subcommand)]
        command: ChecklistCommand,
    },
    /// Game sheets in the backing store
    Sheet {
        #[clap(subcommand)]
        command: SheetCommand,
    },
    /// Show or create the config file
    Config {
        #[clap(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct FilterArgs {
    /// Only these games (repeatable)
    #[clap(long = "game")]
    pub games: Vec<String>,
    /// Trophy types, e.g. Gold (repeatable)
    #[clap(long = "type")]
    pub trophy_types: Vec<String>,
    #[clap(long = "console")]
    pub consoles: Vec<String>,
    /// DLC names (repeatable)
    #[clap(long = "dlc")]
    pub dlc_values: Vec<String>,
    /// Values of the "Guide Available" column (repeatable)
    #[clap(long = "guide")]
    pub guide_available: Vec<String>,
    #[clap(long = "rarity")]
    pub rarity: Vec<String>,
    #[clap(long = "session-type")]
    pub session_types: Vec<String>,
    /// Require (yes) or exclude (no) trophies that need a checklist
    #[clap(long, value_enum, default_value_t = ChecklistChoice::Any)]
    pub checklist_required: ChecklistChoice,
    #[clap(long)]
    pub min_difficulty: Option<f64>,
    #[clap(long)]
    pub max_difficulty: Option<f64>,
    /// Apply the difficulty range only while --checklist-required is set
    #[clap(long)]
    pub gated_difficulty: bool,
    /// Minimum estimated hours
    #[clap(long)]
    pub min_time: Option<f64>,
    /// Maximum estimated hours
    #[clap(long)]
    pub max_time: Option<f64>,
    #[clap(long)]
    pub multiplayer_only: bool,
    /// Hide trophies that have a Date Earned
    #[clap(long)]
    pub not_earned: bool,
    #[clap(long)]
    pub missable: bool,
    #[clap(long)]
    pub collectible: bool,
    #[clap(long)]
    pub grindy: bool,
    /// Only DLC trophies
    #[clap(long)]
    pub dlc_only: bool,
    /// Case-insensitive search in trophy names
    #[clap(long)]
    pub name: Option<String>,
    /// Case-insensitive search in descriptions
    #[clap(long)]
    pub description: Option<String>,
    /// Column to sort by
    #[clap(long)]
    pub sort_by: Option<String>,
    #[clap(long)]
    pub descending: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChecklistChoice {
    #[default]
    Any,
    Yes,
    No,
}

impl From<ChecklistChoice> for TriFilter {
    fn from(choice: ChecklistChoice) -> Self {
        match choice {
            ChecklistChoice::Any => TriFilter::All,
            ChecklistChoice::Yes => TriFilter::With,
            ChecklistChoice::No => TriFilter::Without,
        }
    }
}

/// A range is engaged when either bound is given; the missing bound is open.
fn range(min: Option<f64>, max: Option<f64>) -> Option<(f64, f64)> {
    match (min, max) {
        (None, None) => None,
        (min, max) => Some((min.unwrap_or(f64::NEG_INFINITY), max.unwrap_or(f64::INFINITY))),
    }
}

impl FilterArgs {
    /// Criteria for one request. Sorting falls back to the config defaults.
    pub fn criteria(&self, config: &Config) -> FilterCriteria {
        let difficulty_mode = if self.gated_difficulty {
            DifficultyMode::ChecklistGated
        } else {
            config.difficulty_mode
        };
        let (sort_by, sort_order) = match &self.sort_by {
            Some(column) => (Some(column.clone()), SortOrder::from_ascending(!self.descending)),
            None if self.descending => (config.default_sort_by.clone(), SortOrder::Descending),
            None => (config.default_sort_by.clone(), config.sort_order()),
        };

        FilterCriteria {
            games: self.games.iter().cloned().collect(),
            trophy_types: self.trophy_types.iter().cloned().collect(),
            consoles: self.consoles.iter().cloned().collect(),
            dlc_values: self.dlc_values.iter().cloned().collect(),
            guide_available: self.guide_available.iter().cloned().collect(),
            rarity: self.rarity.iter().cloned().collect(),
            session_types: self.session_types.iter().cloned().collect(),
            checklist_required: self.checklist_required.into(),
            difficulty_range: range(self.min_difficulty, self.max_difficulty),
            difficulty_mode,
            time_range: range(self.min_time, self.max_time),
            multiplayer_only: self.multiplayer_only,
            not_earned_only: self.not_earned,
            missable_only: self.missable,
            collectible_only: self.collectible,
            grindy_only: self.grindy,
            dlc_only: self.dlc_only,
            name_contains: self.name.clone(),
            description_contains: self.description.clone(),
            sort_by,
            sort_order,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct PlanCli {
    #[clap(flatten)]
    pub filters: FilterArgs,
    /// Rows of the filtered view to put in the session (the # column)
    #[clap(long, value_delimiter = ',')]
    pub select: Vec<usize>,
    /// Save the selection as the session plan
    #[clap(long, requires = "select")]
    pub save: bool,
    /// Print the session summary of the selection
    #[clap(long, requires = "select")]
    pub summary: bool,
    /// Write the selection to an .xlsx file
    #[clap(long, requires = "select")]
    pub export: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Print the saved plan
    Show,
    /// Time, earned counts and notes of the saved plan
    Summary,
    /// Change one cell of the saved plan
    Edit {
        #[clap(long)]
        row: usize,
        #[clap(long)]
        column: String,
        /// New value; empty clears the cell
        #[clap(long)]
        value: String,
    },
    /// Remove a row from the saved plan
    Drop {
        #[clap(long)]
        row: usize,
    },
    /// Write the saved plan to an .xlsx file
    Export {
        /// Output file (defaults to SessionPlan.xlsx in the export directory)
        #[clap(long)]
        out: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
pub struct TrophyRef {
    /// Trophy name
    pub name: String,
    /// Game, for names shared by several games
    #[clap(long)]
    pub game: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TrophyCommand {
    /// All fields of one trophy
    Show(TrophyRef),
}

#[derive(Subcommand, Debug)]
pub enum ChecklistCommand {
    /// Checklist items and their state
    Show(TrophyRef),
    /// Tick or untick items and save the progress
    Save {
        #[clap(flatten)]
        trophy: TrophyRef,
        /// Item to mark done (repeatable)
        #[clap(long)]
        check: Vec<String>,
        /// Item to mark not done (repeatable)
        #[clap(long)]
        uncheck: Vec<String>,
        /// Mark every item done
        #[clap(long, conflicts_with = "none")]
        all: bool,
        /// Mark every item not done
        #[clap(long)]
        none: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SheetCommand {
    /// Sheet names in workbook order
    List,
    /// Replace or add a game sheet from a JSON array of row objects
    Import {
        /// Sheet name, usually the game title
        name: String,
        #[clap(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[clap(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_plan_arguments_build_criteria() {
        let cli = Cli::parse_from([
            "trophytrack", "plan", "--type", "Gold", "--type", "Silver", "--min-time", "1",
            "--checklist-required", "yes", "--not-earned", "--sort-by", "Estimated Time",
            "--descending", "--select", "0,2",
        ]);
        let Command::Plan(plan) = cli.command else { panic!("expected plan") };
        assert_eq!(plan.select, vec![0, 2]);

        let criteria = plan.filters.criteria(&Config::default());
        assert_eq!(criteria.trophy_types.len(), 2);
        assert_eq!(criteria.time_range, Some((1.0, f64::INFINITY)));
        assert_eq!(criteria.difficulty_range, None);
        assert_eq!(criteria.checklist_required, TriFilter::With);
        assert!(criteria.not_earned_only);
        assert_eq!(criteria.sort_by.as_deref(), Some("Estimated Time"));
        assert_eq!(criteria.sort_order, SortOrder::Descending);
    }

    #[test]
    fn test_config_defaults_apply_without_flags() {
        let config = Config {
            difficulty_mode: DifficultyMode::ChecklistGated,
            default_sort_by: Some("Game".into()),
            default_sort_ascending: false,
            ..Config::default()
        };
        let criteria = FilterArgs::default().criteria(&config);
        assert!(criteria.is_empty());
        assert_eq!(criteria.difficulty_mode, DifficultyMode::ChecklistGated);
        assert_eq!(criteria.sort_by.as_deref(), Some("Game"));
        assert_eq!(criteria.sort_order, SortOrder::Descending);
    }

    #[test]
    fn test_save_requires_selection() {
        assert!(Cli::try_parse_from(["trophytrack", "plan", "--save"]).is_err());
    }
}
