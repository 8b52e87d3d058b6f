mod find;
mod list;
mod pick;
mod prompt;
mod run;
mod send;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use log::debug;

use makelogs::dispatch::DispatchError;
use makelogs::exit_code;
use makelogs::resources::{self, ResourceError};
use makelogs::settings::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "makelogs",
    version,
    about = "Collect system diagnostics described by YAML catalogs into a Markdown log"
)]
#[command(group(ArgGroup::new("mode").args(["list", "ids", "find", "run", "send", "tui"])))]
struct Cli {
    /// Catalog to run: a short name shown by `-l`, or a path to a YAML file
    log: Option<String>,

    /// List catalogs and their actions
    #[arg(short, long)]
    list: bool,

    /// List the action ids accepted by `-r`
    #[arg(long)]
    ids: bool,

    /// Find actions matching TERMS and pick the ones to run
    #[arg(short, long, num_args = 1.., value_name = "TERMS")]
    find: Option<Vec<String>>,

    /// Run actions by id (`catalog:action_name`)
    #[arg(short, long, num_args = 1.., value_name = "IDS")]
    run: Option<Vec<String>>,

    /// Send the last log to a paste service
    #[arg(short, long)]
    send: bool,

    /// Send without asking for confirmation
    #[arg(long, requires = "send")]
    yes: bool,

    /// Pick actions to run in a terminal tree
    #[arg(long)]
    tui: bool,

    /// Extract the bundled catalogs again, discarding local changes
    #[arg(short = 'c', long = "refresh")]
    refresh: bool,

    /// Keep addresses and the user name in captured output
    #[arg(long)]
    raw: bool,

    /// Where to write the Markdown log
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also write diagnostics to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Show debug diagnostics
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> Settings {
        let mut settings = Settings::detect();
        settings.redact = !self.raw;
        if self.tui {
            let home_log = settings.home_log_path();
            settings = settings.with_log_path(home_log);
        }
        if let Some(ref output) = self.output {
            settings = settings.with_log_path(output);
        }
        settings
    }
}

/// Map a failure to the process exit status
fn failure_code(error: &(dyn Error + 'static)) -> u8 {
    if let Some(DispatchError::SudoRequired(_)) = error.downcast_ref::<DispatchError>() {
        exit_code::SUDO_REQUIRED
    } else if error.is::<ResourceError>() {
        exit_code::RESOURCES
    } else {
        exit_code::FAILURE
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(failure_code(e.as_ref()))
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();

    let log_file = cli.log_file.as_ref().map(std::fs::File::create).transpose()?;
    makelogs::logger::init(log_file, cli.verbose)?;

    let settings = cli.settings();
    if resources::extract(&settings.resource_dir, cli.refresh)? {
        debug!("Catalogs ready in {}", settings.resource_dir.display());
    }

    if cli.list {
        return list::run(&settings);
    }
    if cli.ids {
        return list::run_ids(&settings);
    }
    if let Some(ref terms) = cli.find {
        return find::run(terms, &settings);
    }
    if let Some(ref ids) = cli.run {
        return run::run_ids(ids, &settings);
    }
    if cli.send {
        return send::run(&settings, cli.yes);
    }
    if cli.tui {
        return pick::run(&settings);
    }
    if cli.refresh && cli.log.is_none() {
        println!("Catalogs extracted to {}", settings.resource_dir.display());
        return Ok(ExitCode::SUCCESS);
    }

    let name = cli.log.as_deref().unwrap_or(resources::DEFAULT_CATALOG);
    run::run_named(name, &settings)
}
