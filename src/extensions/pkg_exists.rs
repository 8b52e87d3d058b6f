use std::fmt;

use crate::catalog::action::ExtensionParams;
use crate::shell::{Shell, quote};

use super::{Extension, ExtensionError, run_script};

/// Checks whether packages are installed
#[derive(Debug, Default)]
pub struct PkgExists {
    pkgs: Vec<String>,
    installed: bool,
}

impl PkgExists {
    #[must_use]
    pub fn new(params: &ExtensionParams) -> Self {
        Self {
            pkgs: params.packages(),
            installed: false,
        }
    }

    #[must_use]
    pub fn create(params: &ExtensionParams) -> Box<dyn Extension> {
        Box::new(Self::new(params))
    }

    /// Check for a single package, as used by `require` entries
    #[must_use]
    pub fn for_package(name: &str) -> Self {
        Self {
            pkgs: vec![name.to_lowercase()],
            installed: false,
        }
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installed
    }
}

impl Extension for PkgExists {
    fn invoke(&mut self, shell: &dyn Shell) -> Result<(), ExtensionError> {
        if self.pkgs.is_empty() {
            self.installed = false;
            return Ok(());
        }
        let names: Vec<String> = self.pkgs.iter().map(|p| quote(p)).collect();
        let script = format!("pacman -Qq {} >/dev/null 2>&1", names.join(" "));
        self.installed = run_script(shell, &script)?.success;
        Ok(())
    }
}

impl fmt::Display for PkgExists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.installed {
            writeln!(f, "installed: {}", self.pkgs.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::RecordingShell;

    #[test]
    fn test_installed_package() {
        let shell = RecordingShell::new();
        let mut ext = PkgExists::for_package("Firefox");
        ext.invoke(&shell).unwrap();
        assert!(ext.is_installed());
        assert_eq!(shell.scripts(), vec!["pacman -Qq firefox >/dev/null 2>&1"]);
        assert_eq!(ext.to_string(), "installed: firefox\n");
    }

    #[test]
    fn test_missing_package() {
        let shell = RecordingShell::new().fail("pacman -Qq");
        let mut ext = PkgExists::for_package("nope");
        ext.invoke(&shell).unwrap();
        assert!(!ext.is_installed());
        assert_eq!(ext.to_string(), "");
    }

    #[test]
    fn test_without_packages_is_not_installed() {
        let shell = RecordingShell::new();
        let mut ext = PkgExists::new(&ExtensionParams::default());
        ext.invoke(&shell).unwrap();
        assert!(!ext.is_installed());
        assert!(shell.scripts().is_empty());
    }
}
