mod cli;
mod commands;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use homeshelf::config::Settings;
use homeshelf::error::AppResult;
use homeshelf::metadata::{PKG_NAME, PKG_VERSION};
use homeshelf::storage::{FileStore, SharedStore};

use crate::cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    // Read before the subscriber exists; a broken settings file falls back
    // to defaults silently.
    let settings = Settings::load();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, settings: Settings) -> AppResult<()> {
    let data_dir_override = cli.data_dir.as_deref();
    match cli.command {
        Command::Version => {
            println!("{PKG_NAME} {PKG_VERSION}");
            Ok(())
        }
        Command::Config(command) => commands::config::run(command, settings, data_dir_override),
        Command::Plants(command) => {
            let store = open_store(&settings, data_dir_override)?;
            commands::plants::run(command, store, &settings)
        }
        Command::Cosmetics(command) => {
            let store = open_store(&settings, data_dir_override)?;
            commands::cosmetics::run(command, store, &settings)
        }
        Command::Crafts(command) => {
            let store = open_store(&settings, data_dir_override)?;
            commands::crafts::run(command, store, &settings)
        }
    }
}

fn open_store(
    settings: &Settings,
    data_dir_override: Option<&std::path::Path>,
) -> AppResult<SharedStore> {
    let data_dir = settings.resolve_data_dir(data_dir_override)?;
    tracing::debug!(data_dir = %data_dir.display(), "opening store");
    Ok(Arc::new(FileStore::open(data_dir)?))
}
