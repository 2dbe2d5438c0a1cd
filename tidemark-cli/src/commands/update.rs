//! `tidemark update` - plan and apply pending scripts.

use std::io::{BufRead, Write};
use std::sync::Arc;

use tidemark_engine::Plan;

use crate::cli::UpdateArgs;
use crate::commands::build_reconciler;
use crate::config::Settings;
use crate::error::{CliError, CliResult};
use crate::output::{self, ConsoleSink};

/// Run the update command
pub async fn run(args: UpdateArgs) -> CliResult<()> {
    output::header("Update");

    let settings = Settings::resolve(&args.store, args.group_size)?;
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
        return Ok(());
    }

    if !args.yes && !confirm(plan.to_apply_count())? {
        output::info("Aborting...");
        return Ok(());
    }

    output::newline();
    let outcome = reconciler.apply(plan, Arc::new(ConsoleSink)).await?;
    output::newline();

    if outcome.succeeded() {
        output::success(&outcome.summary());
        Ok(())
    } else {
        output::error(&outcome.summary());
        Err(CliError::Failed {
            count: outcome.failures.len(),
        })
    }
}

pub(crate) fn report_conflicts(plan: &Plan) {
    for conflict in &plan.conflicts {
        output::conflict(&conflict.script_name, conflict.applied_at);
    }
    output::newline();
    output::warn("Scripts will not execute until conflicts are resolved.");
}

pub(crate) fn print_plan(plan: &Plan) {
    for script in &plan.to_skip {
        output::list_item(&format!("{} (unchanged, skipped)", script.name));
    }
    for script in &plan.to_apply_ordered {
        output::list_item(&format!("{} (ordered)", script.name));
    }
    for script in &plan.to_apply_repeatable {
        output::list_item(&format!("{} (repeatable)", script.name));
    }
    output::newline();
    output::list(&plan.summary());
    output::newline();
}

/// Interactive gate between planning and execution.
fn confirm(count: usize) -> CliResult<bool> {
    print!("About to execute {count} scripts. Continue? [y/N] ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
