use std::path::{Path, PathBuf};

use colored::Colorize;
use dialoguer::{Input, Select};

use homeshelf::config::Settings;
use homeshelf::error::{AppError, AppResult};
use homeshelf::query::SortMode;

use super::done;
use crate::cli::ConfigCommand;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const SORT_MODES: [SortMode; 4] =
    [SortMode::Name, SortMode::Category, SortMode::Date, SortMode::Secondary];

pub fn run(
    command: ConfigCommand,
    settings: Settings,
    data_dir_override: Option<&Path>,
) -> AppResult<()> {
    let path = Settings::default_path()
        .ok_or_else(|| AppError::Config("could not resolve a config directory".into()))?;
    match command {
        ConfigCommand::Show => {
            println!("{} {}", "settings:".bold(), path.display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
            let data_dir = settings.resolve_data_dir(data_dir_override)?;
            println!("{} {}", "data dir:".bold(), data_dir.display());
        }
        ConfigCommand::Edit => {
            let edited = edit(settings)?;
            edited.save_to(&path)?;
            done(format!("Saved {}", path.display()));
        }
    }
    Ok(())
}

fn edit(mut settings: Settings) -> AppResult<Settings> {
    let current_dir = settings
        .data_dir
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_default();
    let data_dir: String = Input::new()
        .with_prompt("Data directory (empty for the platform default)")
        .default(current_dir)
        .allow_empty(true)
        .interact_text()?;
    settings.data_dir = Some(data_dir.trim())
        .filter(|d| !d.is_empty())
        .map(PathBuf::from);

    let level_idx = LOG_LEVELS
        .iter()
        .position(|l| l.eq_ignore_ascii_case(&settings.log_level))
        .unwrap_or(1);
    let level = Select::new()
        .with_prompt("Log level")
        .items(&LOG_LEVELS)
        .default(level_idx)
        .interact()?;
    settings.log_level = LOG_LEVELS[level].to_string();

    let sort_labels: Vec<&str> = SORT_MODES.iter().map(SortMode::as_str).collect();
    let sort_idx = SORT_MODES
        .iter()
        .position(|m| *m == settings.default_sort)
        .unwrap_or(0);
    let sort = Select::new()
        .with_prompt("Default sort")
        .items(&sort_labels)
        .default(sort_idx)
        .interact()?;
    settings.default_sort = SORT_MODES[sort];

    Ok(settings)
}
