use std::collections::BTreeMap;

use regex_cache::LazyRegex;

use crate::catalog::precondition::Precondition;

/// Localized display strings keyed by language code
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Title(BTreeMap<String, String>);

impl Title {
    #[must_use]
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Title(
            entries
                .into_iter()
                .map(|(lang, text)| (lang.to_lowercase(), text))
                .collect(),
        )
    }

    /// Title with only an English entry
    #[must_use]
    pub fn english(text: &str) -> Self {
        Title(BTreeMap::from([("en".to_string(), text.to_string())]))
    }

    /// Title in `lang`, falling back to English, then to an empty string
    #[must_use]
    pub fn get(&self, lang: &str) -> &str {
        self.0
            .get(lang)
            .filter(|text| !text.is_empty())
            .or_else(|| self.0.get("en"))
            .map_or("", String::as_str)
    }
}

/// Parameters handed to an extension factory
#[derive(Debug, Clone, Default)]
pub struct ExtensionParams {
    /// Space separated package names
    pub pkgs: Option<String>,
    /// Journal priority threshold
    pub level: Option<u8>,
    /// Entry cap or day window, depending on the extension
    pub count: Option<usize>,
    pub regex: Option<LazyRegex>,
}

impl ExtensionParams {
    /// Package names, lowercased and split on whitespace
    #[must_use]
    pub fn packages(&self) -> Vec<String> {
        self.pkgs
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect()
    }
}

/// What an action does when it runs
#[derive(Debug, Clone)]
pub enum ActionKind {
    /// Shell command whose standard output is captured
    Command(String),
    /// Registered extension, resolved by name at run time
    Extension {
        object: String,
        params: ExtensionParams,
    },
}

/// One runnable step of a catalog
#[derive(Debug, Clone)]
pub struct Action {
    pub name: String,
    pub title: Title,
    pub kind: ActionKind,
    pub requires: Vec<Precondition>,
    pub sudo: bool,
}

impl Action {
    /// The shell command, if this action runs one
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        match &self.kind {
            ActionKind::Command(cmd) => Some(cmd),
            ActionKind::Extension { .. } => None,
        }
    }

    /// The extension name, if this action invokes one
    #[must_use]
    pub fn object(&self) -> Option<&str> {
        match &self.kind {
            ActionKind::Command(_) => None,
            ActionKind::Extension { object, .. } => Some(object),
        }
    }

    /// Text searched by `-f`: name, localized title and command
    #[must_use]
    pub fn haystack(&self, lang: &str) -> String {
        format!(
            "{} {} {}",
            self.name,
            self.title.get(lang),
            self.command().unwrap_or_default()
        )
    }
}
