//! Runtime configuration shared by the loader, search, dispatcher and uploader

use std::path::PathBuf;

use log::debug;

/// Name of the log file written by every run
pub const LOG_FILENAME: &str = "logs.md";

/// Environment variable overriding the resource directory
pub const RESOURCE_DIR_ENV: &str = "MAKELOGS_DIR";

/// A paste service the log can be uploaded to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteEndpoint {
    pub name: String,
    /// Argument given to `curl -F`, the form field reads the log from stdin
    pub form: String,
    pub url: String,
}

impl PasteEndpoint {
    #[must_use]
    pub fn new(name: &str, form: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            form: form.to_string(),
            url: url.to_string(),
        }
    }
}

fn default_endpoints() -> Vec<PasteEndpoint> {
    vec![
        PasteEndpoint::new("ix.io", "f:1;read:1=<-", "http://ix.io"),
        PasteEndpoint::new("sprunge", "sprunge=<-", "http://sprunge.us?md"),
    ]
}

/// Explicit configuration, built once and passed down
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the extracted catalogs
    pub resource_dir: PathBuf,
    /// Two-letter language code used to pick localized titles
    pub lang: String,
    /// Where the Markdown log is written
    pub log_path: PathBuf,
    /// Mask addresses and the user name in captured output
    pub redact: bool,
    /// Login name masked in captured output
    pub user: Option<String>,
    /// Paste services, tried in order
    pub paste_endpoints: Vec<PasteEndpoint>,
}

impl Settings {
    /// Build settings from the process environment.
    ///
    /// The log lands in the current directory; callers running the picker
    /// move it to the home directory with [`Settings::with_log_path`].
    #[must_use]
    pub fn detect() -> Self {
        let resource_dir = std::env::var_os(RESOURCE_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map_or_else(default_resource_dir, PathBuf::from);
        let lang = detect_lang(|key| std::env::var(key).ok());
        let log_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(LOG_FILENAME);
        debug!(
            "Settings: resources in {}, lang '{lang}', log {}",
            resource_dir.display(),
            log_path.display()
        );
        Self {
            resource_dir,
            lang,
            log_path,
            redact: true,
            user: std::env::var("USER").ok().filter(|user| !user.is_empty()),
            paste_endpoints: default_endpoints(),
        }
    }

    /// Settings rooted at an explicit resource directory, used by tests and embedders
    #[must_use]
    pub fn with_resource_dir(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            lang: "en".to_string(),
            log_path: PathBuf::from(LOG_FILENAME),
            redact: true,
            user: None,
            paste_endpoints: default_endpoints(),
        }
    }

    #[must_use]
    pub fn with_log_path(mut self, log_path: impl Into<PathBuf>) -> Self {
        self.log_path = log_path.into();
        self
    }

    #[must_use]
    pub fn with_lang(mut self, lang: &str) -> Self {
        self.lang = lang.to_lowercase();
        self
    }

    /// `~/logs.md`, falling back to the current log path without a home directory
    #[must_use]
    pub fn home_log_path(&self) -> PathBuf {
        directories::BaseDirs::new()
            .map_or_else(|| self.log_path.clone(), |dirs| dirs.home_dir().join(LOG_FILENAME))
    }
}

fn default_resource_dir() -> PathBuf {
    std::env::temp_dir().join("makelogs").join("yaml")
}

/// Language code from the first set locale variable (`LC_ALL`, `LC_MESSAGES`, `LANG`).
///
/// `fr_FR.UTF-8` gives `fr`; `C`, `POSIX` or nothing gives `en`.
pub fn detect_lang(lookup: impl Fn(&str) -> Option<String>) -> String {
    let locale = ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.is_empty());
    let Some(locale) = locale else {
        return "en".to_string();
    };
    let lang: String = locale
        .split(['_', '.', '@', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    if lang.len() < 2 || lang == "c" || lang == "posix" {
        "en".to_string()
    } else {
        lang
    }
}
