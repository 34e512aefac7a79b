use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};
use tracing::{debug, error, info};

use crate::error::{RenameError, Result};
use crate::scanner::{candidate_folders, DirectoryEntry};
use crate::year_table::YearTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub year_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderRename {
    #[serde(serialize_with = "serialize_path_lossy")]
    pub original_path: PathBuf,
    /// Display form of the original name
    pub original_name: String,
    /// Display form of the target name; `destination` keeps the raw bytes
    pub new_name: String,
    #[serde(serialize_with = "serialize_path_lossy")]
    pub destination: PathBuf,
}

fn serialize_path_lossy<P, S>(path: &P, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    P: AsRef<Path>,
    S: Serializer,
{
    serializer.serialize_str(&path.as_ref().to_string_lossy())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenameStatus {
    Renamed,
    Unchanged,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameResult {
    #[serde(flatten)]
    pub folder_rename: FolderRename,
    pub status: RenameStatus,
    pub error_message: Option<String>,
}

/// Outcome of a whole batch; failures are per entry and never abort it
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenameSummary {
    pub renamed: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub results: Vec<RenameResult>,
}

impl RenameSummary {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    fn push(&mut self, result: RenameResult) {
        match result.status {
            RenameStatus::Renamed => self.renamed += 1,
            RenameStatus::Unchanged => self.unchanged += 1,
            RenameStatus::Failed => self.failed += 1,
        }
        self.results.push(result);
    }
}

fn tmdb_token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{tmdb-\d*\}").expect("tmdb token pattern is valid"))
}

/// Strips every `{tmdb-<digits>}` token and trims surrounding whitespace
pub fn normalize_name(name: &str) -> String {
    tmdb_token_pattern().replace_all(name, "").trim().to_string()
}

/// [`normalize_name`] over an OS name. Names that are not valid UTF-8 keep
/// their original bytes on Unix.
pub fn normalize_os_name(name: &OsStr) -> OsString {
    match name.to_str() {
        Some(name) => OsString::from(normalize_name(name)),
        None => normalize_raw_name(name),
    }
}

#[cfg(unix)]
fn normalize_raw_name(name: &OsStr) -> OsString {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    static RE: OnceLock<regex::bytes::Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        regex::bytes::Regex::new(r"\{tmdb-\d*\}").expect("tmdb token pattern is valid")
    });

    let stripped = re.replace_all(name.as_bytes(), &b""[..]);
    OsString::from_vec(stripped.trim_ascii().to_vec())
}

#[cfg(not(unix))]
fn normalize_raw_name(name: &OsStr) -> OsString {
    OsString::from(normalize_name(&name.to_string_lossy()))
}

/// Appends `" (YYYY)"` when `name` is an exact key of a non-empty table
pub fn enrich_name(name: &str, years: Option<&YearTable>) -> String {
    match years.filter(|table| !table.is_empty()).and_then(|table| table.year_for(name)) {
        Some(year) => format!("{name} {year}"),
        None => name.to_string(),
    }
}

#[derive(Debug)]
pub struct RenameEngine {
    config: RenameConfig,
    year_table: Option<YearTable>,
}

impl RenameEngine {
    /// Builds the year table up front when a year path is configured, so an
    /// unreadable reference directory fails before anything is moved.
    pub fn new(config: RenameConfig) -> Result<Self> {
        let year_table = match &config.year_path {
            Some(path) => Some(YearTable::from_directory(path)?),
            None => None,
        };

        Ok(Self::with_year_table(config, year_table))
    }

    pub fn with_year_table(config: RenameConfig, year_table: Option<YearTable>) -> Self {
        Self { config, year_table }
    }

    pub fn year_table(&self) -> Option<&YearTable> {
        self.year_table.as_ref()
    }

    /// Computes the target for one input entry without touching the filesystem
    pub fn plan_rename(&self, entry: &DirectoryEntry) -> FolderRename {
        let normalized = normalize_os_name(&entry.name);
        // Year keys are text, so only UTF-8 names can pick up a year.
        let target = match normalized.to_str() {
            Some(name) => OsString::from(enrich_name(name, self.year_table())),
            None => normalized,
        };

        FolderRename {
            original_path: self.config.input.join(&entry.name),
            destination: self.config.output.join(&target),
            original_name: entry.display_name().into_owned(),
            new_name: target.to_string_lossy().into_owned(),
        }
    }

    pub fn scan_directory(&self) -> Result<Vec<FolderRename>> {
        debug!(path = %self.config.input.display(), "Processing folders");

        let folders = candidate_folders(&self.config.input)?;
        debug!(folders = folders.len(), "Found folders");

        Ok(folders.iter().map(|entry| self.plan_rename(entry)).collect())
    }

    pub fn rename_folder(&self, folder_rename: &FolderRename) -> RenameResult {
        debug!(folder = %folder_rename.original_name, "Processing folder");

        let (status, error_message) = match execute_rename(folder_rename) {
            Ok(RenameStatus::Unchanged) => {
                info!(folder = %folder_rename.original_name, "No changes needed");
                (RenameStatus::Unchanged, None)
            }
            Ok(status) => {
                info!(
                    from = %folder_rename.original_name,
                    to = %folder_rename.new_name,
                    "Renamed folder"
                );
                (status, None)
            }
            Err(err) => {
                error!(
                    from = %folder_rename.original_path.display(),
                    to = %folder_rename.destination.display(),
                    %err,
                    "Error renaming folder"
                );
                (RenameStatus::Failed, Some(err.to_string()))
            }
        };

        RenameResult {
            folder_rename: folder_rename.clone(),
            status,
            error_message,
        }
    }

    pub fn rename_folders(&self, folders: &[FolderRename]) -> RenameSummary {
        let mut summary = RenameSummary::default();
        for folder in folders {
            summary.push(self.rename_folder(folder));
        }
        summary
    }

    /// Lists the input root and renames every visible subdirectory in turn
    pub fn run(&self) -> Result<RenameSummary> {
        let folders = self.scan_directory()?;
        Ok(self.rename_folders(&folders))
    }
}

fn execute_rename(folder_rename: &FolderRename) -> Result<RenameStatus> {
    let from = &folder_rename.original_path;
    let to = &folder_rename.destination;

    if folder_rename.new_name.is_empty() {
        return Err(RenameError::EmptyTargetName {
            original: folder_rename.original_name.clone(),
        });
    }
    if same_location(from, to) {
        return Ok(RenameStatus::Unchanged);
    }
    if destination_exists(to) {
        return Err(RenameError::DestinationExists { path: to.clone() });
    }

    fs::rename(from, to).map_err(|source| RenameError::Io {
        from: from.clone(),
        to: to.clone(),
        source,
    })?;

    Ok(RenameStatus::Renamed)
}

/// Same file name under parents that resolve to the same directory, so
/// `media/Movie` and `./media/Movie` compare equal.
fn same_location(from: &Path, to: &Path) -> bool {
    if from == to {
        return true;
    }

    match (from.parent(), to.parent(), from.file_name(), to.file_name()) {
        (Some(from_parent), Some(to_parent), Some(from_name), Some(to_name))
            if from_name == to_name =>
        {
            match (fs::canonicalize(from_parent), fs::canonicalize(to_parent)) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            }
        }
        _ => false,
    }
}

// Dangling symlinks count as occupied.
fn destination_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

pub struct ConfigBuilder {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    year_path: Option<PathBuf>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            input: None,
            output: None,
            year_path: None,
        }
    }

    pub fn input<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.input = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn output<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output = Some(dir.as_ref().to_path_buf());
        self
    }

    /// A blank year path counts as no year path
    pub fn year_path<P: AsRef<Path>>(mut self, dir: Option<P>) -> Self {
        self.year_path = dir
            .map(|d| d.as_ref().to_path_buf())
            .filter(|d| !is_blank(d));
        self
    }

    pub fn build(self) -> Result<RenameConfig> {
        let input = self
            .input
            .filter(|p| !is_blank(p))
            .ok_or(RenameError::BlankPath { flag: "input" })?;

        let output = self
            .output
            .filter(|p| !is_blank(p))
            .ok_or(RenameError::BlankPath { flag: "output" })?;

        Ok(RenameConfig {
            input,
            output,
            year_path: self.year_path,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Movie Title {tmdb-12345}"), "Movie Title");
        assert_eq!(normalize_name("  Plain  "), "Plain");
        assert_eq!(normalize_name("Empty Id {tmdb-}"), "Empty Id");
    }

    #[test]
    fn test_normalize_strips_every_token() {
        let name = normalize_name("{tmdb-1} Movie {tmdb-22} Title {tmdb-333}");
        assert_eq!(name, "Movie  Title");
        assert!(!tmdb_token_pattern().is_match(&name));
    }

    #[test]
    fn test_normalize_leaves_other_braces() {
        assert_eq!(normalize_name("Movie {imdb-tt01}"), "Movie {imdb-tt01}");
        assert_eq!(normalize_name("Movie {tmdb-12a}"), "Movie {tmdb-12a}");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["Movie Title {tmdb-12345}", "  spaced  ", "", "A {tmdb-1}{tmdb-2} B"] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_normalize_os_name_keeps_invalid_utf8_bytes() {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};

        let raw = OsStr::from_bytes(b" Caf\xe9 {tmdb-7} ");
        assert_eq!(normalize_os_name(raw).into_vec(), b"Caf\xe9".to_vec());
    }

    #[test]
    fn test_normalize_os_name_matches_text_path() {
        let name = OsStr::new("Movie Title {tmdb-12345}");
        assert_eq!(normalize_os_name(name), OsString::from("Movie Title"));
    }

    #[test]
    fn test_enrich_name() {
        let table = YearTable::from_names(["Movie Title (2001)"]);
        assert_eq!(enrich_name("Movie Title", Some(&table)), "Movie Title (2001)");
        assert_eq!(enrich_name("Other", Some(&table)), "Other");
        assert_eq!(enrich_name("Movie Title", None), "Movie Title");
        assert_eq!(enrich_name("Movie Title", Some(&YearTable::new())), "Movie Title");
    }

    #[test]
    fn test_enrich_requires_exact_match() {
        let table = YearTable::from_names(["Movie Title (2001)"]);
        assert_eq!(enrich_name("movie title", Some(&table)), "movie title");
        assert_eq!(enrich_name("Movie  Title", Some(&table)), "Movie  Title");
    }

    #[test]
    fn test_plan_rename_joins_roots() {
        let config = ConfigBuilder::new().input("/in").output("/out").build().unwrap();
        let table = YearTable::from_names(["Movie Title (2001)"]);
        let engine = RenameEngine::with_year_table(config, Some(table));

        let plan = engine.plan_rename(&DirectoryEntry::new("Movie Title {tmdb-12345}", true));
        assert_eq!(plan.original_path, PathBuf::from("/in/Movie Title {tmdb-12345}"));
        assert_eq!(plan.new_name, "Movie Title (2001)");
        assert_eq!(plan.destination, PathBuf::from("/out/Movie Title (2001)"));
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .input("/media/in")
            .output("/media/out")
            .year_path(Some("/media/reference"))
            .build()
            .unwrap();

        assert_eq!(config.input, PathBuf::from("/media/in"));
        assert_eq!(config.output, PathBuf::from("/media/out"));
        assert_eq!(config.year_path, Some(PathBuf::from("/media/reference")));
    }

    #[test]
    fn test_config_builder_rejects_blank_paths() {
        let err = ConfigBuilder::new().output("/out").build().unwrap_err();
        assert!(matches!(err, RenameError::BlankPath { flag: "input" }));

        let err = ConfigBuilder::new().input("/in").output("   ").build().unwrap_err();
        assert!(matches!(err, RenameError::BlankPath { flag: "output" }));
    }

    #[test]
    fn test_config_builder_blank_year_path_is_absent() {
        let config = ConfigBuilder::new()
            .input("/in")
            .output("/out")
            .year_path(Some(""))
            .build()
            .unwrap();
        assert_eq!(config.year_path, None);
    }
}
