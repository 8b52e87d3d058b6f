use std::fmt::{self, Write as _};

use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::action::ExtensionParams;
use crate::shell::Shell;

use super::{Extension, ExtensionError, run_script};

const DEFAULT_LEVEL: u8 = 3;
const DEFAULT_COUNT: usize = 44;

/// Fields requested from journalctl, the rest of each entry is dropped
const OUTPUT_FIELDS: &str = "__REALTIME_TIMESTAMP,PRIORITY,_UID,_CMDLINE,SYSLOG_IDENTIFIER,MESSAGE";

/// One journal entry as printed by `journalctl -o json`
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "__REALTIME_TIMESTAMP")]
    realtime_timestamp: Option<String>,
    #[serde(rename = "PRIORITY")]
    priority: Option<String>,
    #[serde(rename = "_UID")]
    uid: Option<String>,
    #[serde(rename = "_CMDLINE")]
    cmdline: Option<String>,
    #[serde(rename = "SYSLOG_IDENTIFIER")]
    syslog_identifier: Option<String>,
    #[serde(rename = "MESSAGE")]
    message: Option<Value>,
}

/// The retained fields of a journal entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalRecord {
    /// Local time, `YYYY-MM-DD HH:MM`
    pub date: String,
    pub priority: String,
    pub uid: String,
    pub cmdline: String,
    pub message: String,
}

/// Message text; journald encodes non UTF-8 messages as a byte array
fn message_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(text)) => text,
        Some(Value::Array(items)) => {
            let bytes: Vec<u8> = items
                .iter()
                .filter_map(Value::as_u64)
                .filter_map(|b| u8::try_from(b).ok())
                .collect();
            String::from_utf8_lossy(&bytes).into_owned()
        }
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Render a microsecond timestamp as local `YYYY-MM-DD HH:MM`
fn format_timestamp(micros: &str) -> String {
    micros
        .parse::<i64>()
        .ok()
        .and_then(|micros| DateTime::from_timestamp(micros / 1_000_000, 0))
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Parse one line of `journalctl -o json` output.
///
/// # Errors
///
/// Returns `serde_json::Error` if the line is not a JSON object.
pub fn parse_record(line: &str) -> Result<JournalRecord, serde_json::Error> {
    let raw: RawEntry = serde_json::from_str(line)?;
    Ok(JournalRecord {
        date: raw
            .realtime_timestamp
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_default(),
        priority: raw.priority.unwrap_or_default(),
        uid: raw.uid.unwrap_or_else(|| "0".to_string()),
        cmdline: raw
            .cmdline
            .or(raw.syslog_identifier)
            .unwrap_or_default(),
        message: message_text(raw.message),
    })
}

/// Format at most `count` records; a date equal to the previous entry's is left blank.
#[must_use]
pub fn format_records(records: &[JournalRecord], count: usize) -> String {
    let mut out = String::new();
    let mut previous: Option<&str> = None;
    for record in records.iter().take(count) {
        let date = if previous == Some(record.date.as_str()) {
            ""
        } else {
            record.date.as_str()
        };
        let _ = write!(
            out,
            "\n{date}\n\t({}) [{:>4}] {}\n\t{}",
            record.priority, record.uid, record.cmdline, record.message
        );
        previous = Some(record.date.as_str());
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Recent journal entries of the current boot at or above a priority
#[derive(Debug)]
pub struct Journald {
    level: u8,
    count: usize,
    records: Vec<JournalRecord>,
}

impl Journald {
    #[must_use]
    pub fn new(params: &ExtensionParams) -> Self {
        Self {
            level: params.level.unwrap_or(DEFAULT_LEVEL),
            count: params.count.filter(|c| *c > 0).unwrap_or(DEFAULT_COUNT),
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn create(params: &ExtensionParams) -> Box<dyn Extension> {
        Box::new(Self::new(params))
    }

    fn script(&self) -> String {
        format!(
            "SYSTEMD_COLORS=0 journalctl -b0 -p{} -qr -n{} --no-pager --output-fields={OUTPUT_FIELDS} -o json",
            self.level, self.count
        )
    }
}

impl Extension for Journald {
    fn invoke(&mut self, shell: &dyn Shell) -> Result<(), ExtensionError> {
        let script = self.script();
        let output = run_script(shell, &script)?;
        if !output.success {
            return Err(ExtensionError::Failed {
                script,
                code: output.exit_code,
            });
        }
        self.records = output
            .stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_record)
            .collect::<Result<_, _>>()?;
        Ok(())
    }
}

impl fmt::Display for Journald {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_records(&self.records, self.count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::RecordingShell;

    fn record(date: &str, message: &str) -> JournalRecord {
        JournalRecord {
            date: date.to_string(),
            priority: "3".to_string(),
            uid: "1000".to_string(),
            cmdline: "/usr/bin/foo".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_parse_record_falls_back_to_identifier_and_root_uid() {
        let rec = parse_record(
            r#"{"PRIORITY":"3","SYSLOG_IDENTIFIER":"kernel","MESSAGE":"oops","__REALTIME_TIMESTAMP":"1700000000000000"}"#,
        )
        .unwrap();
        assert_eq!(rec.cmdline, "kernel");
        assert_eq!(rec.uid, "0");
        assert_eq!(rec.priority, "3");
        assert_eq!(rec.message, "oops");
        assert_eq!(rec.date.len(), "2023-11-14 22:13".len());
    }

    #[test]
    fn test_parse_record_decodes_byte_messages() {
        let rec = parse_record(r#"{"MESSAGE":[104,105]}"#).unwrap();
        assert_eq!(rec.message, "hi");
        assert_eq!(rec.date, "");
    }

    #[test]
    fn test_repeated_dates_are_blank() {
        let records = vec![
            record("2024-01-02 10:00", "first"),
            record("2024-01-02 10:00", "second"),
            record("2024-01-02 10:01", "third"),
        ];
        assert_eq!(
            format_records(&records, 10),
            "\n2024-01-02 10:00\n\t(3) [1000] /usr/bin/foo\n\tfirst\
             \n\n\t(3) [1000] /usr/bin/foo\n\tsecond\
             \n2024-01-02 10:01\n\t(3) [1000] /usr/bin/foo\n\tthird\n"
        );
    }

    #[test]
    fn test_output_is_capped() {
        let records: Vec<_> = (0..5).map(|i| record("d", &format!("m{i}"))).collect();
        let out = format_records(&records, 2);
        assert!(out.contains("m1"));
        assert!(!out.contains("m2"));
    }

    #[test]
    fn test_invoke_reads_json_lines() {
        let shell = RecordingShell::new().respond(
            "journalctl",
            "{\"PRIORITY\":\"2\",\"_UID\":\"0\",\"_CMDLINE\":\"sshd\",\"MESSAGE\":\"a\"}\n\
             {\"PRIORITY\":\"3\",\"_UID\":\"0\",\"_CMDLINE\":\"sshd\",\"MESSAGE\":\"b\"}\n",
        );
        let mut ext = Journald::new(&ExtensionParams {
            level: Some(2),
            ..Default::default()
        });
        ext.invoke(&shell).unwrap();
        assert!(shell.scripts()[0].contains("-p2 -qr -n44"));
        let out = ext.to_string();
        assert!(out.contains("(2) [   0] sshd\n\ta"));
        assert!(out.contains("(3) [   0] sshd\n\tb"));
    }

    #[test]
    fn test_invoke_fails_on_journalctl_error() {
        let shell = RecordingShell::new().fail("journalctl");
        let mut ext = Journald::new(&ExtensionParams::default());
        assert!(matches!(
            ext.invoke(&shell),
            Err(ExtensionError::Failed { .. })
        ));
    }
}
