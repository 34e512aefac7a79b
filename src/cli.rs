//! Command-line interface definition
//!
//! ```bash
//! jellyfin-folder-rename --input /media/plex --output /media/jellyfin
//! jellyfin-folder-rename --input /media/plex --output /media/plex --yearPath /media/reference
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::Result;
use crate::rename_engine::{ConfigBuilder, RenameConfig};

/// How the batch summary is printed to stdout
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "jellyfin-folder-rename",
    version,
    about = "Rename Plex-style media folders to Jellyfin naming"
)]
pub struct Cli {
    /// Folder of media folders named using Plex naming
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Folder to move the renamed folders into (may equal --input)
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Folder of folders carrying the right years to compare against
    #[arg(long = "yearPath", visible_alias = "year-path", value_name = "PATH")]
    pub year_path: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Summary format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Blank paths are rejected here rather than by clap so they surface as
    /// configuration errors.
    pub fn to_config(&self) -> Result<RenameConfig> {
        let mut builder = ConfigBuilder::new().year_path(self.year_path.as_ref());
        if let Some(input) = &self.input {
            builder = builder.input(input);
        }
        if let Some(output) = &self.output {
            builder = builder.output(output);
        }
        builder.build()
    }
}
