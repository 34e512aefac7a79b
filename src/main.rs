use anyhow::{Context, Result};

use jellyfin_folder_rename::cli::{Cli, OutputFormat};
use jellyfin_folder_rename::{logging, RenameEngine, RenameStatus, RenameSummary};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init(cli.log_level());

    let config = cli.to_config().context("Invalid configuration")?;
    let engine = RenameEngine::new(config).context("Failed to read year folder")?;
    let summary = engine.run().context("Failed to read input directory")?;

    match cli.format {
        OutputFormat::Text => print_summary(&summary),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        ),
    }

    Ok(())
}

fn print_summary(summary: &RenameSummary) {
    for result in &summary.results {
        let rename = &result.folder_rename;
        match result.status {
            RenameStatus::Renamed => println!("✓ {} -> {}", rename.original_name, rename.new_name),
            RenameStatus::Unchanged => println!("ℹ {} (no changes needed)", rename.original_name),
            RenameStatus::Failed => println!(
                "✗ {}: {}",
                rename.original_name,
                result.error_message.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    println!("===================");
    println!(
        "Summary: {} renamed, {} unchanged, {} failed ({} folders)",
        summary.renamed,
        summary.unchanged,
        summary.failed,
        summary.total()
    );

    if summary.total() == 0 {
        println!("No folders to rename.");
    } else if summary.failed == 0 {
        println!("✓ All folders processed successfully!");
    } else if summary.renamed > 0 {
        println!("⚠ Some folders were renamed, but there were errors with others.");
    } else {
        println!("✗ No folders were renamed.");
    }
}
