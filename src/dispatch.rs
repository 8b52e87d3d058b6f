//! Sequential execution of a catalog's actions
//!
//! Each action prints a header, has its preconditions checked, then runs its
//! command or extension. Captured output is cleaned and collected into a
//! [`Report`]. A failed precondition or extension skips one action, never the
//! whole run.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::catalog::action::{Action, ActionKind};
use crate::catalog::precondition::Precondition;
use crate::extensions::pkg_exists::PkgExists;
use crate::extensions::{Extension, Registry};
use crate::report::Report;
use crate::sanitize;
use crate::settings::Settings;
use crate::shell::Shell;
use crate::theme;

const RULE_WIDTH: usize = 12;
const NAME_WIDTH: usize = 32;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("'{0}' needs administrator rights, run it with sudo")]
    SudoRequired(String),
    #[error("Unable to write run output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unable to write log {path}: {source}")]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runs catalogs through a shell and a set of extensions
pub struct Dispatcher<'a> {
    shell: &'a dyn Shell,
    registry: &'a Registry,
    lang: &'a str,
    redact: bool,
    user: Option<&'a str>,
    color: bool,
}

impl<'a> Dispatcher<'a> {
    #[must_use]
    pub fn new(shell: &'a dyn Shell, registry: &'a Registry, settings: &'a Settings) -> Self {
        Self {
            shell,
            registry,
            lang: &settings.lang,
            redact: settings.redact,
            user: settings.user.as_deref(),
            color: false,
        }
    }

    /// Style headers with terminal colours
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Run every action of `catalog` in order, echoing progress to `out`.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::SudoRequired` before anything runs when the
    /// catalog or one of its actions needs administrator rights, and
    /// `DispatchError::Io` if `out` cannot be written.
    pub fn run(&self, catalog: &Catalog, out: &mut dyn Write) -> Result<Report, DispatchError> {
        if catalog.requires_sudo() {
            return Err(DispatchError::SudoRequired(catalog.caption.clone()));
        }
        writeln!(out, "### {}", catalog.caption)?;

        let mut report = Report::new(&catalog.caption);
        for action in &catalog.actions {
            self.print_header(action, out)?;
            if let Some(unmet) = self.unmet_precondition(action) {
                warn!("Skipping '{}': {unmet} not satisfied", action.name);
                continue;
            }
            writeln!(out, "{}\n", "-".repeat(NAME_WIDTH + 2 + 2 * RULE_WIDTH))?;

            let Some(output) = self.execute(action, out)? else {
                continue;
            };
            let output = sanitize::clean(&output, self.redact, self.user);
            if output.trim().is_empty() {
                debug!("'{}' produced no output", action.name);
                continue;
            }
            writeln!(out, "{output}")?;
            report.push(action.clone(), output);
        }
        Ok(report)
    }

    /// Run `catalog` and write its log to `log_path`.
    ///
    /// Returns `None`, leaving any existing log untouched, when no action
    /// produced output.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Dispatcher::run`], and `DispatchError::Log` if
    /// the log cannot be written.
    pub fn run_to_log(
        &self,
        catalog: &Catalog,
        log_path: &Path,
        out: &mut dyn Write,
    ) -> Result<Option<Report>, DispatchError> {
        let report = self.run(catalog, out)?;
        if report.is_empty() {
            return Ok(None);
        }
        report.write_to(log_path).map_err(|e| DispatchError::Log {
            path: log_path.to_path_buf(),
            source: e,
        })?;
        Ok(Some(report))
    }

    fn print_header(&self, action: &Action, out: &mut dyn Write) -> std::io::Result<()> {
        let rule = "-".repeat(RULE_WIDTH);
        let header = format!("{rule} {:^NAME_WIDTH$} {rule}", action.name);
        writeln!(out, "\n\n{}", theme::paint(theme::HEADER, &header, self.color))?;
        let title = action.title.get(self.lang);
        if !title.is_empty() {
            writeln!(out, "  {}", theme::paint(theme::GRAY, title, self.color))?;
        }
        if let Some(cmd) = action.command() {
            let cmd = format!("`{cmd}`");
            writeln!(out, "  {}", theme::paint(theme::GRAY, &cmd, self.color))?;
        }
        Ok(())
    }

    fn unmet_precondition<'b>(&self, action: &'b Action) -> Option<&'b Precondition> {
        action.requires.iter().find(|pre| !self.is_satisfied(pre))
    }

    fn is_satisfied(&self, precondition: &Precondition) -> bool {
        match precondition {
            Precondition::Package(name) => {
                let mut check = PkgExists::for_package(name);
                match check.invoke(self.shell) {
                    Ok(()) => check.is_installed(),
                    Err(e) => {
                        warn!("Unable to check package {name}: {e}");
                        false
                    }
                }
            }
            Precondition::File(path) => path.exists(),
            Precondition::Shell(script) => match self.shell.run(script) {
                Ok(output) => output.success,
                Err(e) => {
                    warn!("Unable to run condition `{script}`: {e}");
                    false
                }
            },
        }
    }

    fn execute(&self, action: &Action, out: &mut dyn Write) -> std::io::Result<Option<String>> {
        let output = match &action.kind {
            ActionKind::Command(cmd) => match self.shell.run(cmd) {
                Ok(output) => {
                    if !output.success {
                        let note = output.exit_code.map_or_else(
                            || "killed by a signal".to_string(),
                            |code| format!("exit status {code}"),
                        );
                        warn!("`{cmd}` failed: {note}");
                        writeln!(out, "  {}", theme::paint(theme::WARNING, &note, self.color))?;
                    }
                    Some(output.stdout)
                }
                Err(e) => {
                    warn!("Unable to run `{cmd}`: {e}");
                    None
                }
            },
            ActionKind::Extension { object, params } => {
                if let Some(mut extension) = self.registry.create(object, params) {
                    match extension.invoke(self.shell) {
                        Ok(()) => Some(extension.to_string()),
                        Err(e) => {
                            warn!("Extension '{object}' of '{}' failed: {e}", action.name);
                            None
                        }
                    }
                } else {
                    warn!("Extension '{object}' does not exist");
                    None
                }
            }
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;
    use crate::catalog::action::{ExtensionParams, Title};
    use crate::extensions::ExtensionError;
    use crate::shell::RecordingShell;

    fn command(name: &str, cmd: &str) -> Action {
        Action {
            name: name.to_string(),
            title: Title::english(name),
            kind: ActionKind::Command(cmd.to_string()),
            requires: Vec::new(),
            sudo: false,
        }
    }

    fn extension(name: &str, object: &str) -> Action {
        Action {
            kind: ActionKind::Extension {
                object: object.to_string(),
                params: ExtensionParams::default(),
            },
            ..command(name, "")
        }
    }

    fn catalog(actions: Vec<Action>) -> Catalog {
        Catalog {
            id: "test".to_string(),
            caption: "Test".to_string(),
            actions,
            ..Default::default()
        }
    }

    fn settings() -> Settings {
        let mut settings = Settings::with_resource_dir("/nonexistent");
        settings.redact = false;
        settings
    }

    fn names(report: &Report) -> Vec<&str> {
        report
            .entries()
            .iter()
            .map(|entry| entry.action.name.as_str())
            .collect()
    }

    struct Broken;

    impl Extension for Broken {
        fn invoke(&mut self, _shell: &dyn Shell) -> Result<(), ExtensionError> {
            Err(ExtensionError::Failed {
                script: "broken".to_string(),
                code: Some(1),
            })
        }
    }

    impl fmt::Display for Broken {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "never shown")
        }
    }

    fn broken(_: &ExtensionParams) -> Box<dyn Extension> {
        Box::new(Broken)
    }

    #[test]
    fn test_commands_run_in_order_with_output() {
        let shell = RecordingShell::new()
            .respond("uname", "Linux\n")
            .respond("uptime", "up 2 days\n");
        let registry = Registry::builtin();
        let settings = settings();
        let dispatcher = Dispatcher::new(&shell, &registry, &settings);
        let mut out = Vec::new();
        let report = dispatcher
            .run(
                &catalog(vec![command("kernel", "uname -r"), command("up", "uptime")]),
                &mut out,
            )
            .unwrap();
        assert_eq!(names(&report), vec!["kernel", "up"]);
        assert_eq!(report.entries()[0].output, "Linux\n");
        assert_eq!(shell.scripts(), vec!["uname -r", "uptime"]);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(&format!("------------ {:^32} ------------", "kernel")));
        assert!(out.contains("  `uname -r`"));
    }

    #[test]
    fn test_empty_output_makes_no_entry() {
        let shell = RecordingShell::new().respond("quiet", "\n");
        let registry = Registry::builtin();
        let settings = settings();
        let report = Dispatcher::new(&shell, &registry, &settings)
            .run(&catalog(vec![command("quiet", "quiet")]), &mut Vec::new())
            .unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_failed_precondition_skips_only_that_action() {
        let shell = RecordingShell::new()
            .fail("pacman -Qq missing")
            .fail("test -d /nope")
            .respond("echo", "ok\n");
        let registry = Registry::builtin();
        let settings = settings();
        let mut by_package = command("by package", "never-run-1");
        by_package.requires = vec![Precondition::Package("missing".to_string())];
        let mut by_file = command("by file", "never-run-2");
        by_file.requires = vec![Precondition::File(PathBuf::from("/nonexistent/file"))];
        let mut by_shell = command("by shell", "never-run-3");
        by_shell.requires = vec![Precondition::Shell("test -d /nope".to_string())];
        let report = Dispatcher::new(&shell, &registry, &settings)
            .run(
                &catalog(vec![by_package, by_file, by_shell, command("fine", "echo ok")]),
                &mut Vec::new(),
            )
            .unwrap();
        assert_eq!(names(&report), vec!["fine"]);
        assert!(!shell.scripts().iter().any(|s| s.starts_with("never-run")));
    }

    #[test]
    fn test_satisfied_package_precondition_runs_action() {
        let shell = RecordingShell::new().respond("lsblk", "sda\n");
        let registry = Registry::builtin();
        let settings = settings();
        let mut action = command("disks", "lsblk");
        action.requires = vec![Precondition::Package("util-linux".to_string())];
        let report = Dispatcher::new(&shell, &registry, &settings)
            .run(&catalog(vec![action]), &mut Vec::new())
            .unwrap();
        assert_eq!(names(&report), vec!["disks"]);
        assert_eq!(
            shell.scripts(),
            vec!["pacman -Qq util-linux >/dev/null 2>&1", "lsblk"]
        );
    }

    #[test]
    fn test_sudo_catalog_runs_nothing() {
        let shell = RecordingShell::new();
        let registry = Registry::builtin();
        let settings = settings();
        let mut sudo = catalog(vec![command("a", "echo a")]);
        sudo.sudo = true;
        let result = Dispatcher::new(&shell, &registry, &settings).run(&sudo, &mut Vec::new());
        assert!(matches!(result, Err(DispatchError::SudoRequired(caption)) if caption == "Test"));
        assert!(shell.scripts().is_empty());
    }

    #[test]
    fn test_sudo_action_runs_nothing() {
        let shell = RecordingShell::new();
        let registry = Registry::builtin();
        let settings = settings();
        let mut admin = command("admin", "echo b");
        admin.sudo = true;
        let result = Dispatcher::new(&shell, &registry, &settings)
            .run(&catalog(vec![command("a", "echo a"), admin]), &mut Vec::new());
        assert!(matches!(result, Err(DispatchError::SudoRequired(_))));
        assert!(shell.scripts().is_empty());
    }

    #[test]
    fn test_unknown_or_failing_extension_is_skipped() {
        let shell = RecordingShell::new().respond("echo", "still here\n");
        let registry = Registry::empty().with("Broken", broken);
        let settings = settings();
        let report = Dispatcher::new(&shell, &registry, &settings)
            .run(
                &catalog(vec![
                    extension("ghost", "Nope"),
                    extension("broken", "Broken"),
                    command("after", "echo"),
                ]),
                &mut Vec::new(),
            )
            .unwrap();
        assert_eq!(names(&report), vec!["after"]);
    }

    #[test]
    fn test_extension_output_is_captured() {
        let shell = RecordingShell::new()
            .respond("pacman -Qi", "Name            : linux\nVersion         : 6.6.7\n");
        let registry = Registry::builtin();
        let settings = settings();
        let mut versions = extension("versions", "PkgVer");
        versions.kind = ActionKind::Extension {
            object: "PkgVer".to_string(),
            params: ExtensionParams {
                pkgs: Some("linux".to_string()),
                ..Default::default()
            },
        };
        let report = Dispatcher::new(&shell, &registry, &settings)
            .run(&catalog(vec![versions]), &mut Vec::new())
            .unwrap();
        assert_eq!(report.entries()[0].output, "linux: 6.6.7\n");
    }

    #[test]
    fn test_output_is_cleaned() {
        let shell = RecordingShell::new().respond("ip", "\x1b[32mUP\x1b[0m 82.64.1.12\n");
        let registry = Registry::builtin();
        let mut settings = settings();
        settings.redact = true;
        let report = Dispatcher::new(&shell, &registry, &settings)
            .run(&catalog(vec![command("ip", "ip a")]), &mut Vec::new())
            .unwrap();
        assert_eq!(report.entries()[0].output, "UP [**ipv4**]\n");
    }

    #[test]
    fn test_user_name_from_settings_is_masked() {
        let shell = RecordingShell::new().respond("ls", "/home/alice/.config\n");
        let registry = Registry::builtin();
        let mut settings = settings();
        settings.redact = true;
        settings.user = Some("alice".to_string());
        let report = Dispatcher::new(&shell, &registry, &settings)
            .run(&catalog(vec![command("home", "ls -d ~/.config")]), &mut Vec::new())
            .unwrap();
        assert_eq!(report.entries()[0].output, "/home/[**$USER**]/.config\n");
    }

    #[test]
    fn test_failing_command_is_reported() {
        let shell = RecordingShell::new().fail("mdstat");
        let registry = Registry::builtin();
        let settings = settings();
        let mut out = Vec::new();
        let report = Dispatcher::new(&shell, &registry, &settings)
            .run(&catalog(vec![command("raid", "cat /proc/mdstat")]), &mut out)
            .unwrap();
        assert!(report.is_empty());
        assert!(String::from_utf8(out).unwrap().contains("  exit status 1"));
    }

    #[test]
    fn test_localized_title_is_printed() {
        let shell = RecordingShell::new();
        let registry = Registry::builtin();
        let settings = settings().with_lang("FR");
        let mut up = command("up", "uptime");
        up.title = Title::new(std::collections::BTreeMap::from([
            ("en".to_string(), "Time since boot".to_string()),
            ("fr".to_string(), "Temps depuis le démarrage".to_string()),
        ]));
        let mut out = Vec::new();
        Dispatcher::new(&shell, &registry, &settings)
            .run(&catalog(vec![up]), &mut out)
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("  Temps depuis le démarrage\n"));
    }

    #[test]
    fn test_no_results_writes_no_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("logs.md");
        let shell = RecordingShell::new();
        let registry = Registry::builtin();
        let settings = settings();
        let result = Dispatcher::new(&shell, &registry, &settings)
            .run_to_log(&catalog(vec![command("silent", "true")]), &log, &mut Vec::new())
            .unwrap();
        assert!(result.is_none());
        assert!(!log.exists());
    }

    #[test]
    fn test_log_has_one_block_per_result() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("logs.md");
        let shell = RecordingShell::new()
            .respond("first", "1\n")
            .respond("second", "2\n");
        let registry = Registry::builtin();
        let settings = settings();
        let report = Dispatcher::new(&shell, &registry, &settings)
            .run_to_log(
                &catalog(vec![
                    command("a", "first"),
                    command("b", "nothing"),
                    command("c", "second"),
                ]),
                &log,
                &mut Vec::new(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(report.len(), 2);
        let written = std::fs::read_to_string(&log).unwrap();
        assert_eq!(written.matches("```\n").count(), 4);
        assert!(written.find("**a**").unwrap() < written.find("**c**").unwrap());
    }
}
