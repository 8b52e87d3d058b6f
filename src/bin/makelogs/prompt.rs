//! Questions asked on the terminal, or answered line by line when stdin is piped

use std::io::{self, BufRead, IsTerminal, Write};

use inquire::InquireError;
use log::debug;

/// Ask for free text. Cancelling gives an empty answer.
///
/// # Errors
///
/// Returns an error if the terminal prompt fails or stdin cannot be read.
pub fn text(question: &str) -> Result<String, Box<dyn std::error::Error>> {
    if !io::stdin().is_terminal() {
        return Ok(read_answer(question, &mut io::stdin().lock(), &mut io::stdout())?);
    }
    match inquire::Text::new(question).prompt() {
        Ok(answer) => Ok(answer),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            debug!("Prompt cancelled");
            Ok(String::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Ask a yes/no question defaulting to no.
///
/// # Errors
///
/// Returns an error if the terminal prompt fails or stdin cannot be read.
pub fn confirm(question: &str) -> Result<bool, Box<dyn std::error::Error>> {
    if !io::stdin().is_terminal() {
        let question = format!("{question} [y/N]");
        let answer = read_answer(&question, &mut io::stdin().lock(), &mut io::stdout())?;
        return Ok(is_yes(&answer));
    }
    match inquire::Confirm::new(question).with_default(false).prompt() {
        Ok(confirmed) => Ok(confirmed),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Print `question` and read one line from `input`; end of input is an empty answer
fn read_answer(question: &str, input: &mut dyn BufRead, out: &mut dyn Write) -> io::Result<String> {
    write!(out, "{question} ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    writeln!(out)?;
    Ok(line.trim().to_string())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}
