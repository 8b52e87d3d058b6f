//! Extension classes: named units of custom log-gathering logic
//!
//! A catalog action with an `object` key is resolved through a [`Registry`],
//! a closed table mapping names to factories. The factory builds the extension
//! from the action's parameters, [`Extension::invoke`] does the work, and the
//! extension's `Display` output becomes the captured log text.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::action::ExtensionParams;
use crate::shell::{Shell, ShellOutput};

pub mod journald;
pub mod logs_activity;
pub mod pkg_exists;
pub mod pkg_ver;

/// Errors raised while an extension does its work
#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("failed to run `{script}`: {source}")]
    Spawn {
        script: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{script}` exited with status {code:?}")]
    Failed { script: String, code: Option<i32> },
    #[error("unable to parse journal entry: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Contract shared by every extension class
pub trait Extension: fmt::Display {
    /// Perform the work; the result is read back through `Display`.
    ///
    /// # Errors
    ///
    /// Returns `ExtensionError` if the underlying command or file access fails.
    fn invoke(&mut self, shell: &dyn Shell) -> Result<(), ExtensionError>;
}

/// Builds an extension from an action's parameters
pub type Factory = fn(&ExtensionParams) -> Box<dyn Extension>;

const BUILTIN: &[(&str, Factory)] = &[
    ("PkgVer", pkg_ver::PkgVer::create),
    ("Journald", journald::Journald::create),
    ("PkgExists", pkg_exists::PkgExists::create),
    ("LogsActivity", logs_activity::LogsActivity::create),
];

/// Closed table of extension names and their factories
#[derive(Clone)]
pub struct Registry {
    entries: Vec<(&'static str, Factory)>,
}

impl Registry {
    /// Registry holding the built-in extensions
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN.to_vec(),
        }
    }

    /// Registry with no entries
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add or replace an entry
    #[must_use]
    pub fn with(mut self, name: &'static str, factory: Factory) -> Self {
        self.entries.retain(|(existing, _)| *existing != name);
        self.entries.push((name, factory));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Factory> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, factory)| *factory)
    }

    /// Instantiate `name` with `params`, or `None` if it is not registered
    #[must_use]
    pub fn create(&self, name: &str, params: &ExtensionParams) -> Option<Box<dyn Extension>> {
        self.get(name).map(|factory| factory(params))
    }

    /// Registered names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Run `script`, turning spawn failures into `ExtensionError::Spawn`.
pub(crate) fn run_script(shell: &dyn Shell, script: &str) -> Result<ShellOutput, ExtensionError> {
    shell.run(script).map_err(|e| ExtensionError::Spawn {
        script: script.to_string(),
        source: e,
    })
}
