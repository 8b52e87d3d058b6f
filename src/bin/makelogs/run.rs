use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Instant;

use makelogs::catalog::{Catalog, PICKED_CAPTION};
use makelogs::config_file::load_all;
use makelogs::dispatch::Dispatcher;
use makelogs::extensions::Registry;
use makelogs::search::find_by_run_ids;
use makelogs::settings::Settings;
use makelogs::shell::SystemShell;
use makelogs::theme::{self, paint};
use makelogs::{exit_code, load_named_catalog};

/// Run `catalog`, write its log and report where it went.
///
/// # Errors
///
/// Returns `DispatchError` if the run is refused or the log cannot be written.
pub fn run_catalog(
    catalog: &Catalog,
    settings: &Settings,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let color = std::io::stdout().is_terminal();
    let registry = Registry::builtin();
    let dispatcher = Dispatcher::new(&SystemShell, &registry, settings).with_color(color);

    let start = Instant::now();
    let report = dispatcher.run_to_log(catalog, &settings.log_path, &mut std::io::stdout())?;
    let Some(report) = report else {
        eprintln!("No results, no log written");
        return Ok(ExitCode::from(exit_code::NO_RESULTS));
    };

    let path = settings.log_path.display().to_string();
    println!(
        "\n{} results saved in \"{}\"",
        report.len(),
        paint(theme::NAME, &path, color)
    );
    println!("Duration: {:.2}s", start.elapsed().as_secs_f64());
    println!("Share it with: makelogs -s");
    Ok(ExitCode::SUCCESS)
}

/// Run the catalog named on the command line.
///
/// # Errors
///
/// Returns `CatalogError` if the catalog cannot be loaded, then the errors of
/// [`run_catalog`].
pub fn run_named(name: &str, settings: &Settings) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let catalog = load_named_catalog(name, settings)?;
    run_catalog(&catalog, settings)
}

/// Run actions picked by id across every catalog.
///
/// # Errors
///
/// Returns `CatalogError` if a catalog cannot be loaded, then the errors of
/// [`run_catalog`].
pub fn run_ids(ids: &[String], settings: &Settings) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let catalogs = load_all(&settings.resource_dir)?;
    let actions = find_by_run_ids(&catalogs, ids);
    if actions.is_empty() {
        eprintln!("Nothing selected");
        return Ok(ExitCode::from(exit_code::NO_RESULTS));
    }
    run_catalog(&Catalog::adhoc(PICKED_CAPTION, actions), settings)
}
