//! # uvproj-edit
//!
//! A CLI tool for keeping Keil µVision project files in sync with the source
//! tree: scan a folder and add its sources, headers and include paths to a
//! `.uvprojx` / `.uvproj` project, or remove them again.
//!
//! ## Features
//!
//! - Single-group mode (default) and one-group-per-directory mode
//! - Include paths registered on every build target
//! - Removal of a folder's files, include paths and group
//! - Listing of targets, include paths, groups and files
//! - Dry-run mode and JSON output for scripting
//! - Persistent configuration via `~/.config/uvproj-edit/config.toml`
//!
//! ## Usage
//!
//! ```bash
//! # Add a folder as one group
//! uvproj-edit -p Project/App.uvprojx -f Source/Drivers
//!
//! # One group per directory
//! uvproj-edit -p Project/App.uvprojx -f Source/Middleware --recursive
//!
//! # Remove the folder again
//! uvproj-edit -p Project/App.uvprojx -f Source/Drivers --delete
//!
//! # Show what the project contains
//! uvproj-edit -p Project/App.uvprojx --list
//! ```

mod cli;

use std::{
    io,
    path::{Path, PathBuf},
    process::exit,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Commands, ConfigCommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use uvproj_edit::{
    config::{FileConfig, Mode, RunOptions},
    output::{JsonOutput, RunOutcome, print_listing, print_outcome},
    project::ProjectEditor,
};

/// Entry point for the uvproj-edit application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and printing
/// any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err:#}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// This function orchestrates the full pipeline: parse arguments, validate
/// the project and folder, apply the selected operation, save, and report.
///
/// # Errors
///
/// Returns errors for a missing or malformed project file, a missing or
/// non-existent folder, a failed scan, a failed save, or JSON serialization.
fn inner_main() -> Result<()> {
    let args = parse_args();

    if let Some(Commands::Config { command }) = &args.subcommand {
        return handle_config_command(command);
    }

    let json_mode = args.json();
    init_tracing(json_mode);
    let file_config = load_config(json_mode);

    let run = args.run_options(&file_config);

    let Some(project) = args.project_path(&file_config) else {
        bail!("No project file given; pass --project or set `project` in the config file");
    };
    if !project.is_file() {
        bail!("Project file {} does not exist", project.display());
    }

    let folder = resolve_folder(&run)?;

    let mut editor = ProjectEditor::open(&project, args.editor_options(&file_config))?;
    let outcome = apply(&mut editor, &run, folder.as_deref())?;

    let saved = run.mode.is_mutating() && !run.dry_run;
    if saved {
        editor
            .save()
            .with_context(|| format!("Project was not modified on disk: {}", project.display()))?;
    }

    if json_mode {
        let output = JsonOutput::new(editor.path(), outcome, run.dry_run, saved);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match &outcome {
        RunOutcome::Listed(summary) => print_listing(summary),
        _ => print_outcome(&outcome, run.dry_run),
    }

    Ok(())
}

// ── Helper functions ────────────────────────────────────────────────────

/// Parse the command line.
///
/// Usage errors such as conflicting flags exit with status 1 like every other
/// failure; `--help` and `--version` exit with status 0.
fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            exit(1);
        }
        Err(err) => err.exit(),
    }
}

/// Check the folder argument for the modes that scan.
///
/// Returns `None` for modes that do not need a folder.
fn resolve_folder(run: &RunOptions) -> Result<Option<PathBuf>> {
    if !run.mode.needs_folder() {
        return Ok(None);
    }

    let Some(folder) = &run.folder else {
        bail!("A folder is required; pass --folder <path>");
    };

    if !folder.is_dir() {
        bail!("Folder {} does not exist", folder.display());
    }

    Ok(Some(folder.clone()))
}

/// Run the selected operation on the open project.
fn apply(editor: &mut ProjectEditor, run: &RunOptions, folder: Option<&Path>) -> Result<RunOutcome> {
    let group = run.group.as_deref();

    let outcome = match (&run.mode, folder) {
        (Mode::List, _) => RunOutcome::Listed(editor.summary()),
        (Mode::DeleteGroup(name), _) => RunOutcome::GroupDeleted {
            name: name.clone(),
            removed: editor.remove_group_by_name(name),
        },
        (Mode::Delete, Some(folder)) => RunOutcome::Removed(editor.remove_folder(folder, group)?),
        (Mode::Add, Some(folder)) if run.recursive => {
            RunOutcome::Added(editor.scan_and_add_files(folder)?)
        }
        (Mode::Add, Some(folder)) => {
            RunOutcome::Added(editor.scan_and_add_files_to_single_group(folder, group)?)
        }
        (Mode::Add | Mode::Delete, None) => bail!("A folder is required; pass --folder <path>"),
    };

    Ok(outcome)
}

/// Install the log subscriber.
///
/// Progress goes to stdout; in JSON mode only warnings are shown and they go
/// to stderr so stdout stays a single JSON document. `RUST_LOG` overrides the
/// level.
fn init_tracing(json_mode: bool) {
    let default_level = if json_mode { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false);

    if json_mode {
        builder.with_writer(io::stderr).init();
    } else {
        builder.init();
    }
}

// ── Config subcommand ────────────────────────────────────────────────

/// Default config file template written by `config init`.
const CONFIG_TEMPLATE: &str = r#"# uvproj-edit configuration
# All values shown are their defaults. Uncomment and change as needed.

# Project file to edit when --project is not given
# project = "~/work/firmware/Project/Firmware.uvprojx"

[scanning]
# Print every file and include path that is added or removed
# verbose = false

# Directory names to skip during scanning
# skip = []

# Glob patterns for files or directories to leave out (e.g. "*_test.c")
# exclude = []

# Maximum directory depth to scan (unset = unlimited)
# max_depth = 8

[editing]
# Create one group per directory instead of one group per folder
# recursive = false

# Report the changes without saving the project
# dry_run = false
"#;

/// Dispatch a `config` subcommand.
fn handle_config_command(cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Path => match FileConfig::config_path() {
            Some(path) => println!("{}", path.display()),
            None => bail!("Could not determine the config directory on this platform"),
        },
        ConfigCommand::Show => show_config()?,
        ConfigCommand::Init => init_config()?,
    }
    Ok(())
}

/// Print the effective configuration (file values merged with defaults).
fn show_config() -> Result<()> {
    let path = FileConfig::config_path();

    let (file_exists, config) = match &path {
        Some(p) if p.exists() => (true, FileConfig::load()?),
        _ => (false, FileConfig::default()),
    };

    match &path {
        Some(p) if file_exists => println!("Config file: {} (found)", p.display()),
        Some(p) => println!(
            "Config file: {} (not found - showing defaults)",
            p.display()
        ),
        None => println!("Config file: (cannot determine path on this platform)"),
    }

    println!();
    println!("{}", format_config(&config));
    Ok(())
}

/// Format a [`FileConfig`] as a human-readable table, showing defaults for `None` fields.
fn format_config(config: &FileConfig) -> String {
    fn show_bool(val: Option<bool>, default: bool) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }
    fn show_usize(val: Option<usize>, default: &str) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }
    fn show_list<T: std::fmt::Display>(val: Option<&[T]>) -> String {
        match val {
            Some(v) if !v.is_empty() => {
                let items: Vec<String> = v.iter().map(|item| format!("\"{item}\"")).collect();
                format!("[{}]", items.join(", "))
            }
            _ => "[]  (default)".to_string(),
        }
    }

    let project_str = config.project.as_ref().map_or_else(
        || "(none)  (default)".to_string(),
        |p| format!("\"{}\"", p.display()),
    );
    let skip: Option<Vec<String>> = config
        .scanning
        .skip
        .as_ref()
        .map(|paths| paths.iter().map(|p| p.display().to_string()).collect());

    format!(
        "\
project   = {project}

[scanning]
verbose   = {verbose}
skip      = {skip}
exclude   = {exclude}
max_depth = {max_depth}

[editing]
recursive = {recursive}
dry_run   = {dry_run}",
        project = project_str,
        verbose = show_bool(config.scanning.verbose, false),
        skip = show_list(skip.as_deref()),
        exclude = show_list(config.scanning.exclude.as_deref()),
        max_depth = show_usize(config.scanning.max_depth, "unlimited"),
        recursive = show_bool(config.editing.recursive, false),
        dry_run = show_bool(config.editing.dry_run, false),
    )
}

/// Write a default config template to the config file path if it does not exist yet.
fn init_config() -> Result<()> {
    let Some(path) = FileConfig::config_path() else {
        bail!("Could not determine the config directory on this platform");
    };

    if path.exists() {
        println!("Config file already exists at: {}", path.display());
        println!("Remove it first if you want to regenerate it.");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory {}", parent.display())
        })?;
    }

    std::fs::write(&path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;

    println!("Config file written to: {}", path.display());
    Ok(())
}

/// Load the configuration file, falling back to defaults on failure.
fn load_config(json_mode: bool) -> FileConfig {
    match FileConfig::load() {
        Ok(config) => config,
        Err(e) => {
            if !json_mode {
                eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            }
            FileConfig::default()
        }
    }
}
