//! Free-text search across catalogs and selection of the hits to run

use std::collections::HashSet;

use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::catalog::action::Action;

/// Caption of the catalog built from search hits
pub const SEARCH_CAPTION: &str = "Search";

/// Patterns shorter than this match almost everything
pub const MIN_PATTERN_LEN: usize = 3;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search pattern `{0}` is shorter than {MIN_PATTERN_LEN} characters")]
    PatternTooShort(String),
    #[error("Invalid search pattern `{pattern}`: {source}")]
    Regex {
        source: regex::Error,
        pattern: String,
    },
}

/// An action matched by a search, with the catalog it came from
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub catalog: String,
    pub action: Action,
}

/// Build the case-insensitive search regex from command line terms.
///
/// Terms are joined with a space; several terms become alternatives and `+`
/// matches anything in between.
///
/// # Errors
///
/// Returns `SearchError::PatternTooShort` for a pattern under three characters
/// and `SearchError::Regex` if the result does not compile.
pub fn build_pattern<S: AsRef<str>>(terms: &[S]) -> Result<Regex, SearchError> {
    let mut pattern = terms
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    if pattern.chars().count() < MIN_PATTERN_LEN {
        return Err(SearchError::PatternTooShort(pattern));
    }
    if terms.len() > 1 {
        pattern = pattern.replace(' ', "|");
    }
    pattern = pattern.replace('+', ".*");
    debug!("Search pattern: {pattern}");
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| SearchError::Regex { source: e, pattern })
}

/// Every action whose name, localized title or command matches `regex`,
/// in catalog order then action order
#[must_use]
pub fn search(catalogs: &[Catalog], regex: &Regex, lang: &str) -> Vec<SearchHit> {
    catalogs
        .iter()
        .flat_map(|catalog| {
            catalog
                .actions
                .iter()
                .filter(|action| regex.is_match(&action.haystack(lang)))
                .map(|action| SearchHit {
                    catalog: catalog.id.clone(),
                    action: action.clone(),
                })
        })
        .collect()
}

/// Parse a whitespace separated list of 1-based hit numbers.
///
/// Returns zero-based indices below `count`, duplicates dropped, in the order
/// first given. Anything else is ignored.
#[must_use]
pub fn parse_selection(input: &str, count: usize) -> Vec<usize> {
    let mut seen = HashSet::new();
    input
        .split_whitespace()
        .filter_map(|token| match token.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => Some(n - 1),
            _ => {
                debug!("Ignoring selection `{token}`");
                None
            }
        })
        .filter(|index| seen.insert(*index))
        .collect()
}

/// Run ids of every action, in catalog order
#[must_use]
pub fn run_ids(catalogs: &[Catalog]) -> Vec<String> {
    catalogs
        .iter()
        .flat_map(|catalog| catalog.actions.iter().map(|action| catalog.run_id(action)))
        .collect()
}

/// Actions named by run ids, in the order requested.
///
/// Unknown ids are reported with a warning and skipped.
#[must_use]
pub fn find_by_run_ids<S: AsRef<str>>(catalogs: &[Catalog], ids: &[S]) -> Vec<Action> {
    ids.iter()
        .map(AsRef::as_ref)
        .filter_map(|id| {
            let found = catalogs.iter().find_map(|catalog| {
                catalog
                    .actions
                    .iter()
                    .find(|action| catalog.run_id(action) == id)
            });
            if found.is_none() {
                warn!("Unknown action id `{id}`");
            }
            found.cloned()
        })
        .collect()
}
