use std::io::IsTerminal;
use std::process::ExitCode;

use makelogs::exit_code;
use makelogs::settings::Settings;
use makelogs::shell::SystemShell;
use makelogs::theme::{self, paint};
use makelogs::upload::{append_url, upload};

use crate::prompt;

/// Upload the last log, print its url and record it in the log.
///
/// # Errors
///
/// Returns `UploadError` if no paste service answers or the url cannot be
/// appended, or the prompt error.
pub fn run(settings: &Settings, yes: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let log_path = &settings.log_path;
    if !log_path.exists() {
        eprintln!("No log to send at {}", log_path.display());
        return Ok(ExitCode::from(exit_code::MISSING_LOG));
    }

    if !yes {
        let question = format!("Send {} to a public paste service?", log_path.display());
        if !prompt::confirm(&question)? {
            return Ok(ExitCode::SUCCESS);
        }
    }

    let url = upload(log_path, &settings.paste_endpoints, &SystemShell)?;
    append_url(log_path, &url)?;
    let color = std::io::stdout().is_terminal();
    println!("\nUrl to share: \"{}\"\n", paint(theme::NAME, &url, color));
    Ok(ExitCode::SUCCESS)
}
