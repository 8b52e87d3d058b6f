//! Shell abstraction for running action commands.
//!
//! `Shell` is the seam every subprocess goes through. `SystemShell` is the
//! production implementation spawning `bash -c` with a fixed locale and
//! terminal; `RecordingShell` is the test double that records scripts and
//! answers from pre-configured rules.

use std::cell::RefCell;
use std::io;
use std::process::{Command as ProcessCommand, Stdio};

use log::debug;

/// Environment forced on every subprocess
pub const SHELL_ENV: [(&str, &str); 3] = [("TERM", "xterm"), ("LANG", "C"), ("LC_ALL", "C")];

/// Captured result of one shell script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
}

impl ShellOutput {
    #[must_use]
    pub fn ok(stdout: &str) -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            stdout: stdout.to_string(),
        }
    }

    #[must_use]
    pub fn failed(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code: Some(exit_code),
            stdout: String::new(),
        }
    }
}

/// Runs shell scripts to completion, capturing standard output
pub trait Shell {
    /// # Errors
    ///
    /// Returns an I/O error if the shell cannot be spawned.
    fn run(&self, script: &str) -> io::Result<ShellOutput>;
}

/// Production shell: `bash -c <script>` with `TERM=xterm LANG=C LC_ALL=C`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShell;

impl Shell for SystemShell {
    fn run(&self, script: &str) -> io::Result<ShellOutput> {
        debug!("Running: {script}");
        let output = ProcessCommand::new("bash")
            .arg("-c")
            .arg(script)
            .envs(SHELL_ENV)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()?;
        Ok(ShellOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Quote a string for use as a single shell word.
#[must_use]
pub fn quote(s: &str) -> String {
    if !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+".contains(c))
    {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Test double: records every script and answers from rules.
///
/// A rule matches when the script contains its pattern; the first matching
/// rule wins. Scripts without a rule succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingShell {
    rules: Vec<(String, ShellOutput)>,
    scripts: RefCell<Vec<String>>,
}

impl RecordingShell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer scripts containing `pattern` with a successful `stdout`
    #[must_use]
    pub fn respond(mut self, pattern: &str, stdout: &str) -> Self {
        self.rules
            .push((pattern.to_string(), ShellOutput::ok(stdout)));
        self
    }

    /// Answer scripts containing `pattern` with exit status 1
    #[must_use]
    pub fn fail(mut self, pattern: &str) -> Self {
        self.rules.push((pattern.to_string(), ShellOutput::failed(1)));
        self
    }

    /// Every script run so far, in order
    #[must_use]
    pub fn scripts(&self) -> Vec<String> {
        self.scripts.borrow().clone()
    }
}

impl Shell for RecordingShell {
    fn run(&self, script: &str) -> io::Result<ShellOutput> {
        self.scripts.borrow_mut().push(script.to_string());
        Ok(self
            .rules
            .iter()
            .find(|(pattern, _)| script.contains(pattern.as_str()))
            .map_or_else(|| ShellOutput::ok(""), |(_, output)| output.clone()))
    }
}
