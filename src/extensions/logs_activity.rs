use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDate};
use regex_cache::LazyRegex;

use crate::catalog::action::ExtensionParams;
use crate::shell::Shell;

use super::{Extension, ExtensionError};

const PACMAN_LOG: &str = "/var/log/pacman.log";
const DEFAULT_DAYS: usize = 30;
const BAR_WIDTH: usize = 50;
const MAX_DAYS: usize = 36_500;

/// Per-day count of package transactions from the pacman log
#[derive(Debug)]
pub struct LogsActivity {
    days: usize,
    regex: Option<LazyRegex>,
    path: PathBuf,
    calendar: BTreeMap<NaiveDate, usize>,
}

impl LogsActivity {
    #[must_use]
    pub fn new(params: &ExtensionParams) -> Self {
        Self {
            days: params.count.filter(|c| *c > 0).unwrap_or(DEFAULT_DAYS),
            regex: params.regex.clone(),
            path: PathBuf::from(PACMAN_LOG),
            calendar: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn create(params: &ExtensionParams) -> Box<dyn Extension> {
        Box::new(Self::new(params))
    }

    /// Read another log file instead of the system pacman log
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }
}

/// Count `[ALPM]` lines matching `regex` per day, for days strictly after `since`.
///
/// Lines look like `[2021-10-31T01:22:07+0200] [ALPM] upgraded xmlsec (1.2.32-1 -> 1.2.33-1)`.
#[must_use]
pub fn tally<'a>(
    lines: impl Iterator<Item = &'a str>,
    since: NaiveDate,
    regex: Option<&LazyRegex>,
) -> BTreeMap<NaiveDate, usize> {
    let mut calendar = BTreeMap::new();
    for line in lines {
        if line.len() <= 20 || !line.starts_with('[') || !line.contains("[ALPM] ") {
            continue;
        }
        let Some(day) = line
            .get(1..11)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        else {
            continue;
        };
        if day <= since || regex.is_some_and(|re| !re.is_match(line)) {
            continue;
        }
        *calendar.entry(day).or_insert(0) += 1;
    }
    calendar
}

impl Extension for LogsActivity {
    fn invoke(&mut self, _shell: &dyn Shell) -> Result<(), ExtensionError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| ExtensionError::Read {
                path: self.path.clone(),
                source: e,
            })?;
        let days = i64::try_from(self.days.min(MAX_DAYS)).unwrap_or_default();
        let since = Local::now().date_naive() - Duration::days(days);
        self.calendar = tally(contents.lines(), since, self.regex.as_ref());
        Ok(())
    }
}

impl fmt::Display for LogsActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max = self.calendar.values().copied().max().unwrap_or(0);
        for (day, count) in &self.calendar {
            let width = (count * BAR_WIDTH).div_ceil(max);
            writeln!(f, "{day} {count:<3} {}", "━".repeat(width))?;
        }
        Ok(())
    }
}
