//! Lookup of release years keyed by bare folder name.
//!
//! A reference library such as `Movie Title (2001)` yields the entry
//! `"Movie Title" -> "(2001)"`. Keys are exact post-strip, post-trim strings;
//! lookups never fold case or whitespace.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::Result;
use crate::scanner::candidate_folders;

fn year_token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(\d*\)").expect("year token pattern is valid"))
}

/// Splits the first parenthesized digit run out of `name`.
///
/// Returns the trimmed remainder and the token (parentheses included), or
/// `None` when the name carries no year token.
pub fn split_year_token(name: &str) -> Option<(String, String)> {
    let token = year_token_pattern().find(name)?.as_str();
    let cleaned = name.replacen(token, "", 1).trim().to_string();
    Some((cleaned, token.to_string()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearTable {
    years: HashMap<String, String>,
}

impl YearTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from the visible subdirectories of `path`.
    ///
    /// Fails only if `path` itself cannot be listed.
    pub fn from_directory(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Parsing years folder");

        let mut table = Self::new();
        for entry in candidate_folders(path)? {
            let name = entry.display_name();
            debug!(folder = %name, "Processing year folder");
            table.record(&name);
        }

        Ok(table)
    }

    /// Builds the table from bare names, in order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for name in names {
            table.record(name.as_ref());
        }
        table
    }

    /// Adds `name` if it carries a year token. Later names overwrite earlier
    /// ones that clean to the same key.
    fn record(&mut self, name: &str) -> bool {
        let Some((cleaned, year)) = split_year_token(name) else {
            return false;
        };

        debug!(folder = %cleaned, year = %year, "Add year");
        if let Some(previous) = self.years.insert(cleaned.clone(), year.clone()) {
            if previous != year {
                warn!(folder = %cleaned, previous = %previous, year = %year, "Duplicate year folder, keeping the later one");
            }
        }
        true
    }

    pub fn year_for(&self, name: &str) -> Option<&str> {
        self.years.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}
