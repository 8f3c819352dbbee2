//! Human-readable and JSON output.
//!
//! Listings and run results are produced by the project editor as plain
//! data. This module turns them into colored terminal output, or, when the
//! `--json` flag is passed, into a single JSON object on stdout that replaces
//! all human-readable output.

use colored::Colorize;
use serde::Serialize;

use crate::project::{AddReport, FileType, ProjectSummary, RemoveReport};

/// What a run did to the project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Files, groups and include paths were added
    Added(AddReport),

    /// Files, include paths and a group were removed
    Removed(RemoveReport),

    /// A single group was deleted by name
    GroupDeleted { name: String, removed: bool },

    /// The project was only listed
    Listed(ProjectSummary),
}

/// Top-level JSON output emitted when `--json` is active.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// The execution mode: `"dry_run"`, `"edit"` or `"list"`.
    pub mode: String,

    /// Absolute path of the project file.
    pub project: String,

    /// Whether the project file was written.
    pub saved: bool,

    /// The operation and its counters.
    pub result: RunOutcome,
}

impl JsonOutput {
    /// Build the JSON document for a finished run.
    #[must_use]
    pub fn new(project: &std::path::Path, outcome: RunOutcome, dry_run: bool, saved: bool) -> Self {
        let mode = if matches!(outcome, RunOutcome::Listed(_)) {
            "list"
        } else if dry_run {
            "dry_run"
        } else {
            "edit"
        };

        Self {
            mode: mode.to_string(),
            project: project.display().to_string(),
            saved,
            result: outcome,
        }
    }
}

impl RunOutcome {
    /// Whether the run changed the in-memory document.
    #[must_use]
    pub const fn changed(&self) -> bool {
        match self {
            Self::Added(report) => !report.is_empty(),
            Self::Removed(report) => !report.is_empty(),
            Self::GroupDeleted { removed, .. } => *removed,
            Self::Listed(_) => false,
        }
    }

    /// One-line, uncolored description of the result.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Added(report) => format!(
                "Added {} files, {} groups, {} include paths",
                report.files_added, report.groups_created, report.include_paths_added
            ),
            Self::Removed(report) => format!(
                "Removed {} files, {} include paths{}",
                report.files_removed,
                report.include_paths_removed,
                if report.group_removed { " and the group" } else { "" }
            ),
            Self::GroupDeleted { name, removed: true } => format!("Deleted group '{name}'"),
            Self::GroupDeleted { name, removed: false } => format!("No group named '{name}'"),
            Self::Listed(summary) => format!(
                "{} groups, {} files",
                summary.groups.len(),
                summary.file_count()
            ),
        }
    }
}

/// Print the one-line summary of a mutating run.
pub fn print_outcome(outcome: &RunOutcome, dry_run: bool) {
    let message = outcome.message();

    if dry_run {
        println!("{} {}", "🧪 Dry run:".yellow(), message.bright_white());
    } else if outcome.changed() {
        println!("{} {}", "✅".green(), message.green());
    } else {
        println!("{} {}", "✨".green(), format!("{message} (nothing changed)").bright_white());
    }
}

/// Print targets, include paths, groups and files.
pub fn print_listing(summary: &ProjectSummary) {
    println!("{} {}", "📁 Project:".bold(), summary.project.display());

    if summary.legacy_default {
        println!("\n{}", "🎯 No targets, using the default compiler settings".bold());
    } else {
        println!(
            "\n{} {}",
            "🎯 Targets:".bold(),
            summary.target_count.to_string().bright_white()
        );
    }

    for target in &summary.targets {
        let name = target.name.as_deref().unwrap_or("(default)");
        println!("  {}", name.cyan());
        if target.include_paths.is_empty() {
            println!("    {}", "(no include paths)".dimmed());
        }
        for path in &target.include_paths {
            println!("    {path}");
        }
    }

    println!(
        "\n{} {}",
        "📂 Groups:".bold(),
        summary.groups.len().to_string().bright_white()
    );

    for group in &summary.groups {
        println!(
            "  {} ({} files)",
            group.name.cyan(),
            group.files.len().to_string().bright_white()
        );
        for file in &group.files {
            println!(
                "    {:<24} {:<12} {}",
                file.name,
                file_type_label(file.file_type),
                file.path.dimmed()
            );
        }
    }
}

fn file_type_label(code: Option<u8>) -> String {
    match code {
        Some(code) => FileType::from_code(code)
            .map_or_else(|| format!("type {code}"), |file_type| file_type.to_string()),
        None => "unknown".to_string(),
    }
}
