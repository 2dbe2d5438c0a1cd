//! `tidemark status` - list the applied script records.

use crate::cli::StatusArgs;
use crate::commands::build_reconciler;
use crate::config::Settings;
use crate::error::CliResult;
use crate::output;

/// Run the status command
pub async fn run(args: StatusArgs) -> CliResult<()> {
    output::header("Status");

    let settings = Settings::resolve(&args.store, None)?;
    output::kv("Database", &settings.database.display().to_string());
    output::newline();

    let reconciler = build_reconciler(&settings);
    reconciler.initialize().await?;

    let records = reconciler.status().await?;
    if records.is_empty() {
        output::info("No scripts have been applied.");
        return Ok(());
    }

    output::list(&format!("{} applied scripts:", records.len()));
    for record in &records {
        output::list_item(&format!(
            "{}  content {}  applied {}",
            &record.name_fingerprint[..8.min(record.name_fingerprint.len())],
            &record.content_fingerprint[..8.min(record.content_fingerprint.len())],
            record.applied_at.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    Ok(())
}
