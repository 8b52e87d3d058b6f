//! Catalog domain model
//!
//! A catalog is a captioned, ordered list of actions loaded from one YAML file.
//! Each action either runs a shell command or invokes a registered extension,
//! and may be gated by preconditions. See [`crate::config_file`] for the YAML
//! representation these types are built from.

pub mod action;
pub mod precondition;

use crate::catalog::action::Action;

/// Caption of the ad-hoc catalog built from picked or named actions
pub const PICKED_CAPTION: &str = "My logs";

/// A captioned group of actions, one per YAML file
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// File stem the catalog was loaded from, used in run ids
    pub id: String,
    pub caption: String,
    pub version: Option<String>,
    /// The whole catalog needs administrator rights
    pub sudo: bool,
    pub actions: Vec<Action>,
}

impl Catalog {
    /// An unsaved catalog grouping actions picked across files
    #[must_use]
    pub fn adhoc(caption: &str, actions: Vec<Action>) -> Self {
        Catalog {
            id: String::new(),
            caption: caption.to_string(),
            version: None,
            sudo: false,
            actions,
        }
    }

    /// Whether running this catalog needs administrator rights
    #[must_use]
    pub fn requires_sudo(&self) -> bool {
        self.sudo || self.actions.iter().any(|action| action.sudo)
    }

    /// Run id of an action: `catalog:action_name` with spaces replaced by `_`
    #[must_use]
    pub fn run_id(&self, action: &Action) -> String {
        format!("{}:{}", self.id, action.name.replace(' ', "_"))
    }
}
