use std::fmt;

use crate::catalog::action::ExtensionParams;
use crate::shell::{Shell, quote};

use super::{Extension, ExtensionError, run_script};

/// Lists installed packages with their version
#[derive(Debug, Default)]
pub struct PkgVer {
    pkgs: Vec<String>,
    versions: Vec<(String, String)>,
}

impl PkgVer {
    #[must_use]
    pub fn new(params: &ExtensionParams) -> Self {
        Self {
            pkgs: params.packages(),
            versions: Vec::new(),
        }
    }

    #[must_use]
    pub fn create(params: &ExtensionParams) -> Box<dyn Extension> {
        Box::new(Self::new(params))
    }
}

/// Pair each `Name` field of `pacman -Qi` output with the `Version` that follows it
fn parse_versions(stdout: &str) -> Vec<(String, String)> {
    let mut versions = Vec::new();
    let mut name: Option<&str> = None;
    for line in stdout.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "Name" => name = Some(value.trim()),
            "Version" => {
                if let Some(name) = name.take() {
                    versions.push((name.to_string(), value.trim().to_string()));
                }
            }
            _ => {}
        }
    }
    versions
}

impl Extension for PkgVer {
    fn invoke(&mut self, shell: &dyn Shell) -> Result<(), ExtensionError> {
        if self.pkgs.is_empty() {
            return Ok(());
        }
        let names: Vec<String> = self.pkgs.iter().map(|p| quote(p)).collect();
        let script = format!("pacman -Qi {}", names.join(" "));
        // Missing packages make pacman exit non-zero, the installed ones are still listed
        let output = run_script(shell, &script)?;
        self.versions = parse_versions(&output.stdout);
        Ok(())
    }
}

impl fmt::Display for PkgVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, version) in &self.versions {
            writeln!(f, "{name}: {version}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::RecordingShell;

    const PACMAN_QI: &str = "\
Name            : linux
Version         : 6.6.7.arch1-1
Description     : The Linux kernel and modules
Architecture    : x86_64

Name            : mesa
Version         : 1:23.3.1-1
Description     : An open-source implementation of the OpenGL specification
";

    fn params(pkgs: &str) -> ExtensionParams {
        ExtensionParams {
            pkgs: Some(pkgs.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_versions_are_listed() {
        let shell = RecordingShell::new().respond("pacman -Qi", PACMAN_QI);
        let mut ext = PkgVer::new(&params("Linux mesa"));
        ext.invoke(&shell).unwrap();
        assert_eq!(shell.scripts(), vec!["pacman -Qi linux mesa"]);
        assert_eq!(ext.to_string(), "linux: 6.6.7.arch1-1\nmesa: 1:23.3.1-1\n");
    }

    #[test]
    fn test_no_packages_runs_nothing() {
        let shell = RecordingShell::new();
        let mut ext = PkgVer::new(&ExtensionParams::default());
        ext.invoke(&shell).unwrap();
        assert!(shell.scripts().is_empty());
        assert_eq!(ext.to_string(), "");
    }
}
