//! Bundled catalogs and the directory they are extracted to

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

/// File extension of catalog files
pub const EXTENSION: &str = "yaml";

/// Catalog name used when none is given
pub const DEFAULT_CATALOG: &str = "default";

/// File stem skipped by listing and search
pub const RESERVED_CATALOG: &str = "search";

const BUNDLED: &[(&str, &str)] = &[
    ("default.yaml", include_str!("../catalogs/default.yaml")),
    ("disk.yaml", include_str!("../catalogs/disk.yaml")),
    ("journal.yaml", include_str!("../catalogs/journal.yaml")),
    ("network.yaml", include_str!("../catalogs/network.yaml")),
    ("packages.yaml", include_str!("../catalogs/packages.yaml")),
];

/// Errors raised while preparing the resource directory
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Unable to reset resource directory {path}: {source}")]
    Reset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to extract catalog to {path}: {source}")]
    Extract {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Names of the catalogs bundled in the binary
pub fn bundled_names() -> impl Iterator<Item = &'static str> {
    BUNDLED.iter().map(|(name, _)| *name)
}

/// Extract the bundled catalogs into `dir`.
///
/// Nothing happens when `dir` already exists, unless `force` is set, in which
/// case the directory is removed and rebuilt. Returns whether files were written.
///
/// # Errors
///
/// Returns `ResourceError` if the directory cannot be removed, created or written.
pub fn extract(dir: &Path, force: bool) -> Result<bool, ResourceError> {
    if dir.exists() {
        if !force {
            debug!("Resource directory {} already present", dir.display());
            return Ok(false);
        }
        std::fs::remove_dir_all(dir).map_err(|e| ResourceError::Reset {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::create_dir_all(dir).map_err(|e| ResourceError::Extract {
        path: dir.to_path_buf(),
        source: e,
    })?;
    for (name, contents) in BUNDLED {
        let path = dir.join(name);
        std::fs::write(&path, contents).map_err(|e| ResourceError::Extract {
            path: path.clone(),
            source: e,
        })?;
    }
    info!("Extracted {} catalogs to {}", BUNDLED.len(), dir.display());
    Ok(true)
}

/// Catalog files in `dir`, sorted by name, without the reserved one
#[must_use]
pub fn catalog_files(dir: &Path) -> Vec<PathBuf> {
    let pattern = format!(
        "{}/*.{EXTENSION}",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let entries = match glob::glob(&pattern) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Invalid catalog pattern {pattern}: {e}");
            return Vec::new();
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable catalog: {e}");
                None
            }
        })
        .filter(|path| path.file_stem().is_none_or(|stem| stem != RESERVED_CATALOG))
        .collect();
    files.sort();
    files
}

/// Resolve a catalog name given on the command line.
///
/// `.yaml` is appended when the name has no extension. Absolute paths are kept,
/// names that look like a path (`./x`, `../x`, `dir/x`) are taken relative to the
/// current directory, bare names are looked up in `dir`.
#[must_use]
pub fn resolve(name: &str, dir: &Path) -> PathBuf {
    let mut file = PathBuf::from(name);
    if file.extension().is_none() {
        file.set_extension(EXTENSION);
    }
    if file.is_absolute() {
        file
    } else if name.starts_with('.') || name.contains(std::path::MAIN_SEPARATOR) {
        std::env::current_dir().map_or(file.clone(), |cwd| cwd.join(&file))
    } else {
        dir.join(file)
    }
}
