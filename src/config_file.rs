//! Catalog file handling for makelogs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use regex_cache::LazyRegex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::catalog::action::{Action, ActionKind, ExtensionParams, Title};
use crate::catalog::precondition::Precondition;

/// Errors that can occur while loading a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unable to read catalog {path}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to parse YAML catalog {path}: {source}")]
    Yaml {
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("Invalid regex pattern `{pattern}`: {source}")]
    Regex {
        source: regex::Error,
        pattern: String,
    },
    #[error("Invalid catalog: {0}")]
    Validation(String),
}

/// Parse a regex parameter into a lazily compiled regex.
///
/// # Errors
///
/// Returns `CatalogError::Regex` if the pattern fails to compile.
pub fn parse_regex(pattern: String) -> Result<LazyRegex, CatalogError> {
    LazyRegex::new(&pattern).map_err(|e| CatalogError::Regex {
        source: e,
        pattern,
    })
}

/// A yes/no flag written either as `1`/`0` or `true`/`false`
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
#[serde(untagged)]
pub enum ConfigFlag {
    Bool(bool),
    Int(i64),
}

impl ConfigFlag {
    #[must_use]
    pub fn is_set(self) -> bool {
        match self {
            ConfigFlag::Bool(b) => b,
            ConfigFlag::Int(i) => i == 1,
        }
    }
}

/// Title as written in YAML: a language map or a bare English string
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ConfigTitle {
    Text(String),
    Localized(BTreeMap<String, String>),
}

impl From<ConfigTitle> for Title {
    fn from(config: ConfigTitle) -> Self {
        match config {
            ConfigTitle::Text(text) => Title::english(&text),
            ConfigTitle::Localized(entries) => Title::new(entries),
        }
    }
}

/// Configuration for a single action
#[derive(Debug, Deserialize, Serialize)]
pub struct ConfigAction {
    pub name: String,
    pub title: Option<ConfigTitle>,
    pub command: Option<String>,
    pub object: Option<String>,
    pub require: Option<Vec<String>>,
    pub sudo: Option<ConfigFlag>,
    pub pkgs: Option<String>,
    pub level: Option<u8>,
    pub count: Option<usize>,
    pub regex: Option<String>,
}

impl TryFrom<ConfigAction> for Action {
    type Error = CatalogError;

    fn try_from(config: ConfigAction) -> Result<Self, Self::Error> {
        let name = config.name;
        let command = config.command.filter(|cmd| !cmd.trim().is_empty());
        let kind = match (command, config.object) {
            (Some(cmd), object) => {
                if let Some(object) = object {
                    warn!("Action '{name}' has both a command and object '{object}', running the command");
                }
                ActionKind::Command(cmd)
            }
            (None, Some(object)) => ActionKind::Extension {
                object,
                params: ExtensionParams {
                    pkgs: config.pkgs,
                    level: config.level,
                    count: config.count,
                    regex: config.regex.map(parse_regex).transpose()?,
                },
            },
            (None, None) => {
                return Err(CatalogError::Validation(format!(
                    "Action '{name}' has neither a command nor an object"
                )));
            }
        };
        Ok(Action {
            title: config.title.map(Title::from).unwrap_or_default(),
            requires: config
                .require
                .unwrap_or_default()
                .iter()
                .map(String::as_str)
                .map(Precondition::parse)
                .collect(),
            sudo: config.sudo.is_some_and(ConfigFlag::is_set),
            kind,
            name,
        })
    }
}

/// Root structure of a catalog file
#[derive(Debug, Deserialize, Serialize)]
pub struct ConfigCatalog {
    pub caption: Option<String>,
    pub version: Option<String>,
    pub sudo: Option<ConfigFlag>,
    pub actions: Option<Vec<ConfigAction>>,
}

impl ConfigCatalog {
    /// Loads and parses a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the file cannot be read, or
    /// `CatalogError::Yaml` if parsing fails.
    pub fn from_file(file: &Path) -> Result<ConfigCatalog, CatalogError> {
        let contents = std::fs::read_to_string(file).map_err(|e| CatalogError::NotFound {
            path: file.to_path_buf(),
            source: e,
        })?;
        serde_yaml::from_str(&contents).map_err(|e| CatalogError::Yaml {
            source: e,
            path: file.to_path_buf(),
        })
    }

    /// Convert into a domain catalog identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Regex` or `CatalogError::Validation` for the
    /// first action that cannot be converted.
    pub fn into_catalog(self, id: &str) -> Result<Catalog, CatalogError> {
        let actions = self
            .actions
            .unwrap_or_default()
            .into_iter()
            .map(Action::try_from)
            .collect::<Result<Vec<Action>, CatalogError>>()?;
        Ok(Catalog {
            id: id.to_string(),
            caption: self.caption.unwrap_or_else(|| id.to_string()),
            version: self.version,
            sudo: self.sudo.is_some_and(ConfigFlag::is_set),
            actions,
        })
    }
}

/// Load a catalog file into its domain form, identified by the file stem.
///
/// # Errors
///
/// Returns any `CatalogError` raised while reading, parsing or converting.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!("Loading catalog '{id}' from {}", path.display());
    ConfigCatalog::from_file(path)?.into_catalog(&id)
}

/// Load every catalog of `dir`, sorted by file name, skipping the reserved one.
///
/// # Errors
///
/// Returns the first `CatalogError` met.
pub fn load_all(dir: &Path) -> Result<Vec<Catalog>, CatalogError> {
    crate::resources::catalog_files(dir)
        .iter()
        .map(|path| load_catalog(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<Catalog, CatalogError> {
        let config: ConfigCatalog = serde_yaml::from_str(yaml).unwrap();
        config.into_catalog("test")
    }

    #[test]
    fn test_from_file_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk.yaml");
        std::fs::write(
            &path,
            "caption: Disks\nactions:\n  - name: lsblk\n    command: lsblk -f\n",
        )
        .unwrap();
        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.id, "disk");
        assert_eq!(catalog.caption, "Disks");
        assert_eq!(catalog.actions.len(), 1);
        assert_eq!(catalog.actions[0].command(), Some("lsblk -f"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_catalog(&dir.path().join("nope.yaml"));
        assert!(matches!(result, Err(CatalogError::NotFound { .. })));
    }

    #[test]
    fn test_malformed_yaml_keeps_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "caption: [unclosed\n").unwrap();
        match load_catalog(&path) {
            Err(CatalogError::Yaml { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected CatalogError::Yaml, got: {other:?}"),
        }
    }

    #[test]
    fn test_sudo_flag_accepts_int_and_bool() {
        let catalog = parse("caption: x\nsudo: 1\nactions: []\n").unwrap();
        assert!(catalog.sudo);
        let catalog = parse("caption: x\nsudo: true\nactions: []\n").unwrap();
        assert!(catalog.sudo);
        let catalog = parse("caption: x\nsudo: 0\nactions: []\n").unwrap();
        assert!(!catalog.sudo);
    }

    #[test]
    fn test_title_as_plain_string() {
        let catalog =
            parse("caption: x\nactions:\n  - name: a\n    title: Hello\n    command: echo\n")
                .unwrap();
        assert_eq!(catalog.actions[0].title.get("fr"), "Hello");
    }

    #[test]
    fn test_extension_action_keeps_params() {
        let catalog = parse(
            "caption: x\nactions:\n  - name: journal\n    object: Journald\n    level: 4\n    count: 10\n",
        )
        .unwrap();
        match &catalog.actions[0].kind {
            ActionKind::Extension { object, params } => {
                assert_eq!(object, "Journald");
                assert_eq!(params.level, Some(4));
                assert_eq!(params.count, Some(10));
            }
            ActionKind::Command(_) => panic!("Expected an extension action"),
        }
    }

    #[test]
    fn test_command_wins_over_object() {
        let catalog = parse(
            "caption: x\nactions:\n  - name: a\n    command: uname -a\n    object: PkgVer\n",
        )
        .unwrap();
        assert_eq!(catalog.actions[0].command(), Some("uname -a"));
    }

    #[test]
    fn test_action_without_command_or_object_is_rejected() {
        let result = parse("caption: x\nactions:\n  - name: empty\n");
        match result {
            Err(CatalogError::Validation(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected CatalogError::Validation, got: {other:?}"),
        }
    }

    #[test]
    fn test_regex_error_preserves_pattern() {
        let result = parse(
            "caption: x\nactions:\n  - name: a\n    object: LogsActivity\n    regex: '[invalid'\n",
        );
        match result {
            Err(CatalogError::Regex { pattern, .. }) => assert_eq!(pattern, "[invalid"),
            other => panic!("Expected CatalogError::Regex, got: {other:?}"),
        }
    }

    #[test]
    fn test_load_all_keeps_file_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.yaml"),
            "caption: B\nactions:\n  - name: two\n    command: echo 2\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a.yaml"),
            "caption: A\nactions:\n  - name: one\n    command: echo 1\n",
        )
        .unwrap();
        let ids: Vec<_> = load_all(dir.path())
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_caption_defaults_to_id() {
        let catalog = parse("actions: []\n").unwrap();
        assert_eq!(catalog.caption, "test");
        assert!(catalog.actions.is_empty());
    }
}
