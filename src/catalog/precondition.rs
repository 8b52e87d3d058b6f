use std::fmt;
use std::path::PathBuf;

/// Prefix marking a `require` entry as a shell check
pub const SHELL_PREFIX: &str = "bash:";

/// A check gating whether an action runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// Package must be installed
    Package(String),
    /// Absolute path must exist
    File(PathBuf),
    /// Shell snippet must exit with status 0
    Shell(String),
}

impl Precondition {
    /// Classify a raw `require` entry: `bash:` prefix, absolute path, or package name.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(script) = raw.strip_prefix(SHELL_PREFIX) {
            Precondition::Shell(script.trim().to_string())
        } else if raw.starts_with('/') {
            Precondition::File(PathBuf::from(raw))
        } else {
            Precondition::Package(raw.to_lowercase())
        }
    }
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precondition::Package(name) => write!(f, "package \"{name}\""),
            Precondition::File(path) => write!(f, "file \"{}\"", path.display()),
            Precondition::Shell(script) => write!(f, "bash condition \"{script}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shell_condition() {
        assert_eq!(
            Precondition::parse("bash: test -d /sys/firmware/efi"),
            Precondition::Shell("test -d /sys/firmware/efi".to_string())
        );
    }

    #[test]
    fn test_parse_file() {
        assert_eq!(
            Precondition::parse("/etc/fstab"),
            Precondition::File(PathBuf::from("/etc/fstab"))
        );
    }

    #[test]
    fn test_parse_package_is_lowercased() {
        assert_eq!(
            Precondition::parse("NetworkManager"),
            Precondition::Package("networkmanager".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Precondition::parse("bash:false").to_string(),
            "bash condition \"false\""
        );
    }
}
