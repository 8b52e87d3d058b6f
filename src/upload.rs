//! Share the Markdown log through a paste service

use std::io::Write as _;
use std::path::Path;

use log::{debug, info, warn};
use thiserror::Error;

use crate::settings::PasteEndpoint;
use crate::shell::{Shell, quote};

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No paste service returned a url")]
    NoUrl,
    #[error("Unable to append the url to {path}: {source}")]
    Append {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `curl` invocation posting `log_path` to `endpoint`
#[must_use]
pub fn curl_script(endpoint: &PasteEndpoint, log_path: &Path) -> String {
    format!(
        "curl -s -F {} {} < {}",
        quote(&endpoint.form),
        quote(&endpoint.url),
        quote(&log_path.to_string_lossy())
    )
}

/// Post the log to each endpoint in turn until one answers with a url.
///
/// # Errors
///
/// Returns `UploadError::NoUrl` when every endpoint fails or answers nothing.
pub fn upload(
    log_path: &Path,
    endpoints: &[PasteEndpoint],
    shell: &dyn Shell,
) -> Result<String, UploadError> {
    for endpoint in endpoints {
        debug!("Uploading {} to {}", log_path.display(), endpoint.name);
        match shell.run(&curl_script(endpoint, log_path)) {
            Ok(output) => {
                let url = output.stdout.trim();
                if !url.is_empty() {
                    info!("Uploaded to {}: {url}", endpoint.name);
                    return Ok(url.to_string());
                }
                warn!("{} returned no url", endpoint.name);
            }
            Err(e) => warn!("Unable to reach {}: {e}", endpoint.name),
        }
    }
    Err(UploadError::NoUrl)
}

/// Append the shared url at the end of the log.
///
/// # Errors
///
/// Returns `UploadError::Append` if the log cannot be opened or written.
pub fn append_url(log_path: &Path, url: &str) -> Result<(), UploadError> {
    let append = || -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new().append(true).open(log_path)?;
        writeln!(file, "\n\n[Logs on the web]({url})")
    };
    append().map_err(|e| UploadError::Append {
        path: log_path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::RecordingShell;

    fn endpoints() -> Vec<PasteEndpoint> {
        vec![
            PasteEndpoint::new("ix.io", "f:1;read:1=<-", "http://ix.io"),
            PasteEndpoint::new("sprunge", "sprunge=<-", "http://sprunge.us?md"),
        ]
    }

    #[test]
    fn test_curl_script_quotes_arguments() {
        let endpoint = PasteEndpoint::new("sprunge", "sprunge=<-", "http://sprunge.us?md");
        assert_eq!(
            curl_script(&endpoint, Path::new("/home/me/my logs.md")),
            "curl -s -F 'sprunge=<-' 'http://sprunge.us?md' < '/home/me/my logs.md'"
        );
    }

    #[test]
    fn test_first_endpoint_wins() {
        let shell = RecordingShell::new().respond("ix.io", "http://ix.io/abc\n");
        let url = upload(Path::new("logs.md"), &endpoints(), &shell).unwrap();
        assert_eq!(url, "http://ix.io/abc");
        assert_eq!(shell.scripts().len(), 1);
    }

    #[test]
    fn test_falls_back_when_first_is_silent() {
        let shell = RecordingShell::new()
            .respond("ix.io", "  \n")
            .respond("sprunge", "http://sprunge.us/xyz?md\n");
        let url = upload(Path::new("logs.md"), &endpoints(), &shell).unwrap();
        assert_eq!(url, "http://sprunge.us/xyz?md");
        assert_eq!(shell.scripts().len(), 2);
    }

    #[test]
    fn test_no_url_when_every_endpoint_fails() {
        let shell = RecordingShell::new().fail("curl");
        assert!(matches!(
            upload(Path::new("logs.md"), &endpoints(), &shell),
            Err(UploadError::NoUrl)
        ));
    }

    #[test]
    fn test_append_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.md");
        std::fs::write(&path, "## Test\n").unwrap();
        append_url(&path, "http://ix.io/abc").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("## Test\n"));
        assert!(content.trim_end().ends_with("(http://ix.io/abc)"));
    }
}
