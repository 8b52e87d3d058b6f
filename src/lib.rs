//! Core implementation of makelogs
//!
//! makelogs reads YAML catalogs of diagnostic shell commands, runs the ones the
//! user picks (by catalog, search, run id or from a terminal tree), captures
//! their output and writes it as a Markdown log that can be shared through a
//! paste service.

use std::path::Path;

use log::{debug, warn};

use crate::catalog::Catalog;
use crate::config_file::{CatalogError, load_catalog};
use crate::settings::Settings;

pub mod catalog;
pub mod config_file;
pub mod dispatch;
pub mod extensions;
pub mod logger;
pub mod report;
pub mod resources;
pub mod sanitize;
pub mod search;
pub mod settings;
pub mod shell;
pub mod theme;
pub mod tui;
pub mod upload;

/// Process exit statuses
pub mod exit_code {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
    /// The catalog needs administrator rights
    pub const SUDO_REQUIRED: u8 = 3;
    /// The catalog directory cannot be prepared
    pub const RESOURCES: u8 = 4;
    /// No log to upload
    pub const MISSING_LOG: u8 = 8;
    /// Nothing matched, nothing selected, or nothing produced output
    pub const NO_RESULTS: u8 = 12;
}

/// Load the catalog named on the command line.
///
/// # Errors
///
/// Returns `CatalogError` if the file is missing, malformed or invalid.
pub fn load_named_catalog(name: &str, settings: &Settings) -> Result<Catalog, CatalogError> {
    let path = resources::resolve(name, &settings.resource_dir);
    debug!("Catalog '{name}' resolved to {}", path.display());
    let catalog = load_catalog(&path)?;
    validate_version(&catalog, &path);
    Ok(catalog)
}

/// Warn if a catalog targets another makelogs version
fn validate_version(catalog: &Catalog, path: &Path) {
    let binary_version = env!("CARGO_PKG_VERSION");
    if let Some(version) = catalog.version.as_deref()
        && version.split('.').next() != binary_version.split('.').next()
    {
        warn!(
            "Catalog {} version '{version}' differs from makelogs version '{binary_version}'",
            path.display()
        );
    }
}
