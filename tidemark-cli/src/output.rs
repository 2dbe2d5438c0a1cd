//! Styled terminal output utilities.

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;

use tidemark_engine::{EventSink, ExecutionEvent};

/// Print a header/title
pub fn header(text: &str) {
    println!();
    println!("{}", text.bold().cyan());
    println!("{}", "─".repeat(text.len()).dimmed());
    println!();
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a success message
pub fn success(text: &str) {
    println!("{} {}", "✔".green().bold(), text.green());
}

/// Print an info message
pub fn info(text: &str) {
    println!("{} {}", "ℹ".blue().bold(), text);
}

/// Print a warning message
pub fn warn(text: &str) {
    println!("{} {}", "⚠".yellow().bold(), text.yellow());
}

/// Print an error message
pub fn error(text: &str) {
    eprintln!("{} {}", "✖".red().bold(), text.red());
}

/// Print a list header
pub fn list(text: &str) {
    println!("{}", text);
}

/// Print a list item
pub fn list_item(text: &str) {
    println!("  {} {}", "•".dimmed(), text);
}

/// Print a conflict line with the original application time
pub fn conflict(name: &str, applied_at: DateTime<Utc>) {
    println!(
        "{}",
        format!(
            "CONFLICT: \"{}\" has changed since it was applied on {}.",
            name,
            applied_at.format("%Y-%m-%d %H:%M:%S")
        )
        .red()
    );
}

/// Print a newline
pub fn newline() {
    println!();
}

/// Event sink that reports execution progress to the console.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn on_event(&self, event: ExecutionEvent) {
        match event {
            ExecutionEvent::Skipped { name } => {
                println!("  {} {}", "skip ".dimmed(), name.dimmed());
            }
            ExecutionEvent::Applying { name } => {
                println!("  {} {}...", "apply".green(), name);
            }
            ExecutionEvent::Applied { name } => {
                println!("  {} {}", "done ".green().bold(), name);
            }
            ExecutionEvent::Failed { name, reason } => {
                eprintln!("  {} {}: {}", "FAIL ".red().bold(), name, reason.red());
            }
            ExecutionEvent::ConflictDetected { name, applied_at } => {
                conflict(&name, applied_at);
            }
        }
    }
}
