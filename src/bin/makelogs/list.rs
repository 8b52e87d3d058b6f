use std::io::IsTerminal;
use std::process::ExitCode;

use makelogs::config_file::load_all;
use makelogs::search;
use makelogs::settings::Settings;
use makelogs::theme::{self, paint};

/// Print every catalog with its actions and localized titles.
///
/// # Errors
///
/// Returns an error if a catalog cannot be loaded.
pub fn run(settings: &Settings) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let color = std::io::stdout().is_terminal();
    for catalog in load_all(&settings.resource_dir)? {
        println!(
            "\n{}{}",
            paint(theme::NAME, &format!("{:41}", catalog.id), color),
            catalog.caption
        );
        for action in &catalog.actions {
            println!(
                "  {:38}{}",
                action.name,
                paint(theme::GRAY, action.title.get(&settings.lang), color)
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the id of every action, one per line.
///
/// # Errors
///
/// Returns an error if a catalog cannot be loaded.
pub fn run_ids(settings: &Settings) -> Result<ExitCode, Box<dyn std::error::Error>> {
    for id in search::run_ids(&load_all(&settings.resource_dir)?) {
        println!("{id}");
    }
    Ok(ExitCode::SUCCESS)
}
