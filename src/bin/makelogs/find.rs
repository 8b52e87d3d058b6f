use std::io::IsTerminal;
use std::process::ExitCode;

use makelogs::catalog::Catalog;
use makelogs::config_file::load_all;
use makelogs::exit_code;
use makelogs::search::{SEARCH_CAPTION, SearchError, build_pattern, parse_selection, search};
use makelogs::settings::Settings;
use makelogs::theme::{self, paint};

use crate::prompt;
use crate::run::run_catalog;

/// Search every catalog for `terms`, ask which hits to run, then run them.
///
/// # Errors
///
/// Returns an error if a catalog cannot be loaded, the pattern is not a valid
/// regex, the prompt fails, or the run fails.
pub fn run(terms: &[String], settings: &Settings) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let regex = match build_pattern(terms) {
        Ok(regex) => regex,
        Err(e @ SearchError::PatternTooShort(_)) => {
            eprintln!("{e}");
            return Ok(ExitCode::from(exit_code::NO_RESULTS));
        }
        Err(e) => return Err(e.into()),
    };

    let catalogs = load_all(&settings.resource_dir)?;
    let hits = search(&catalogs, &regex, &settings.lang);
    if hits.is_empty() {
        eprintln!("No action matches `{}`", regex.as_str());
        return Ok(ExitCode::from(exit_code::NO_RESULTS));
    }

    let color = std::io::stdout().is_terminal();
    for (i, hit) in hits.iter().enumerate() {
        println!(
            "\n{:2} :: {}{}",
            i + 1,
            paint(theme::NAME, &format!("{:38}", hit.action.name), color),
            paint(theme::GRAY, hit.action.title.get(&settings.lang), color)
        );
        if let Some(cmd) = hit.action.command() {
            println!("{:6}{}", "", paint(theme::GRAY, cmd, color));
        }
    }
    println!();

    let range = if hits.len() > 1 {
        format!("1..{}", hits.len())
    } else {
        "1".to_string()
    };
    let answer = prompt::text(&format!("Run which actions? [{range}]"))?;

    let actions: Vec<_> = parse_selection(&answer, hits.len())
        .into_iter()
        .map(|index| hits[index].action.clone())
        .collect();
    if actions.is_empty() {
        eprintln!("Nothing selected");
        return Ok(ExitCode::from(exit_code::NO_RESULTS));
    }
    run_catalog(&Catalog::adhoc(SEARCH_CAPTION, actions), settings)
}
