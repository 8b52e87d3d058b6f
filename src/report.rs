//! Markdown log of a run

use std::fmt::Write as _;
use std::path::Path;

use log::info;

use crate::catalog::action::Action;

/// An action paired with the output it produced
#[derive(Debug, Clone)]
pub struct ResultEntry {
    pub action: Action,
    pub output: String,
}

/// Results of one run, in the order the actions ran
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub caption: String,
    entries: Vec<ResultEntry>,
}

impl Report {
    #[must_use]
    pub fn new(caption: &str) -> Self {
        Self {
            caption: caption.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, action: Action, output: String) {
        self.entries.push(ResultEntry { action, output });
    }

    #[must_use]
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the caption heading followed by one section per result
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut md = format!("## {}\n", self.caption);
        for entry in &self.entries {
            let _ = write!(md, "\n**{}**\n", entry.action.name);
            if let Some(cmd) = entry.action.command() {
                let _ = writeln!(md, "> `{cmd}`");
            }
            let _ = write!(
                md,
                "\n```\n{}\n```\n",
                entry.output.trim_end_matches('\n')
            );
        }
        md
    }

    /// Write the Markdown log, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_markdown())?;
        info!("Wrote {} results to {}", self.len(), path.display());
        Ok(())
    }
}
