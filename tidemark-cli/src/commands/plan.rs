//! `tidemark plan` - show what would execute, without applying.

use crate::cli::PlanArgs;
use crate::commands::build_reconciler;
use crate::commands::update::{print_plan, report_conflicts};
use crate::config::Settings;
use crate::error::{CliError, CliResult};
use crate::output;

/// Run the plan command
pub async fn run(args: PlanArgs) -> CliResult<()> {
    output::header("Plan");

    let settings = Settings::resolve(&args.store, None)?;
    output::kv("Scripts", &settings.scripts_dir.display().to_string());
    output::kv("Database", &settings.database.display().to_string());
    output::newline();

    let reconciler = build_reconciler(&settings);
    reconciler.initialize().await?;

    let plan = reconciler.plan().await?;

    if plan.is_aborted() {
        report_conflicts(&plan);
        return Err(CliError::Aborted {
            conflicts: plan.conflicts.len(),
        });
    }

    print_plan(&plan);
    if plan.is_empty() {
        output::success("Nothing to apply.");
    }
    Ok(())
}
