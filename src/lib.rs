//! Renames Plex-style media folders (`Movie Title {tmdb-12345}`) to Jellyfin
//! style, optionally appending a year looked up from a reference library.

pub mod cli;
pub mod error;
pub mod logging;
pub mod rename_engine;
pub mod scanner;
pub mod year_table;

pub use error::{RenameError, Result};
pub use rename_engine::{
    enrich_name, normalize_name, normalize_os_name, ConfigBuilder, FolderRename, RenameConfig,
    RenameEngine, RenameResult, RenameStatus, RenameSummary,
};
pub use scanner::DirectoryEntry;
pub use year_table::YearTable;
