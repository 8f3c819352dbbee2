//! Command-line interface definition and argument parsing.
//!
//! This module defines all command-line arguments, options, and their validation
//! using the [clap](https://docs.rs/clap/) library. It provides structured access
//! to user input and handles argument conflicts and defaults.
//!
//! Helper methods on [`Cli`] accept a [`FileConfig`] reference so that config-file
//! values act as defaults that CLI arguments can override (layered config).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use uvproj_edit::config::file::{FileConfig, expand_tilde};
use uvproj_edit::config::{EditorOptions, Mode, RunOptions, ScanOptions};

/// Command-line arguments selecting the operation.
///
/// Without any of these flags the folder is added to the project.
#[derive(Parser)]
struct ModeArgs {
    /// Remove the folder's files, include paths and group from the project
    ///
    /// The group removed is the one named by --group, or the one named after
    /// the folder. Groups created per subdirectory by --recursive stay.
    #[arg(short = 'd', long)]
    delete: bool,

    /// List targets, include paths, groups and files without changing anything
    #[arg(short = 'l', long, conflicts_with_all = ["delete", "delete_group"])]
    list: bool,

    /// Remove the group with this name, then save
    #[arg(long, value_name = "NAME", conflicts_with = "delete")]
    delete_group: Option<String>,
}

/// Command-line arguments controlling how files are added or removed.
#[derive(Parser)]
struct EditingArgs {
    /// Folder to scan for source files and headers
    ///
    /// Required when adding or deleting; ignored by --list and --delete-group.
    #[arg(short = 'f', long)]
    folder: Option<PathBuf>,

    /// Group name to use instead of the folder name
    #[arg(short = 'g', long)]
    group: Option<String>,

    /// Create one group per directory instead of a single group
    ///
    /// Groups are named `<folder>` and `<folder>/<sub/dir>`, and every
    /// directory with recognized files becomes an include path.
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Apply the changes in memory and report them, but do not save
    #[arg(long)]
    dry_run: bool,
}

/// Command-line arguments for controlling folder scanning behavior.
#[derive(Parser)]
struct ScanningArgs {
    /// Print every file and include path that is added or removed
    ///
    /// Also reports entries that could not be read while scanning.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Directory names to skip during scanning
    ///
    /// The directory and everything below it is left out. Can be specified
    /// multiple times.
    #[arg(long, action = clap::ArgAction::Append)]
    skip: Vec<PathBuf>,

    /// Glob patterns for files or directories to leave out
    ///
    /// Matched against the path relative to the folder and against the entry
    /// name, e.g. `*_test.c` or `Drivers/CMSIS`. Can be specified multiple times.
    #[arg(long, action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Maximum directory depth to scan
    ///
    /// A value of 0 only looks at the files directly inside the folder.
    /// When not set, the scan is unlimited.
    #[arg(long)]
    max_depth: Option<usize>,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Subcommands for `config`.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file values + defaults for unset keys)
    Show,
    /// Write a default config.toml if none exists yet
    Init,
    /// Print the path to the config file
    Path,
}

/// Main command-line interface structure.
///
/// Helper methods accept a [`FileConfig`] reference so that config-file values act as
/// defaults when the corresponding CLI argument is not provided.
#[derive(Parser)]
#[command(name = "uvproj-edit")]
#[command(
    about = "Add or remove source files, groups and include paths in Keil µVision project files from folder scans"
)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand (e.g. `config`)
    #[command(subcommand)]
    pub subcommand: Option<Commands>,

    /// Project file to edit (.uvprojx or .uvproj)
    #[arg(short = 'p', long)]
    project: Option<PathBuf>,

    /// Output results as a single JSON object for scripting/piping
    ///
    /// With --list the listing is printed as JSON; otherwise the summary of
    /// the run.
    #[arg(long)]
    json: bool,

    /// Operation options
    #[command(flatten)]
    mode: ModeArgs,

    /// Editing options
    #[command(flatten)]
    editing: EditingArgs,

    /// Scanning options
    #[command(flatten)]
    scanning: ScanningArgs,
}

impl Cli {
    /// Whether `--json` structured output mode is enabled.
    #[must_use]
    pub const fn json(&self) -> bool {
        self.json
    }

    /// Resolve the project file from CLI args or config file.
    ///
    /// Priority: CLI argument > config file `project`. Tilde expansion is
    /// applied to the config file value.
    #[must_use]
    pub fn project_path(&self, config: &FileConfig) -> Option<PathBuf> {
        self.project
            .clone()
            .or_else(|| config.project.as_deref().map(expand_tilde))
    }

    /// The operation selected by the mode flags.
    ///
    /// `--list` wins over everything (clap rejects it together with the
    /// delete flags), then `--delete-group`, then `--delete`; the default is
    /// adding.
    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.mode.list {
            Mode::List
        } else if let Some(name) = &self.mode.delete_group {
            Mode::DeleteGroup(name.clone())
        } else if self.mode.delete {
            Mode::Delete
        } else {
            Mode::Add
        }
    }

    /// Extract scanning options from CLI args and config file.
    ///
    /// - **verbose**: CLI flag `||` config value `||` `false`
    /// - **skip**, **exclude**: merged from both sources (config values first, then CLI)
    /// - **`max_depth`**: CLI > config > unlimited
    #[must_use]
    pub fn scan_options(&self, config: &FileConfig) -> ScanOptions {
        let mut skip = config.scanning.skip.clone().unwrap_or_default();
        skip.extend(self.scanning.skip.clone());

        let mut exclude = config.scanning.exclude.clone().unwrap_or_default();
        exclude.extend(self.scanning.exclude.clone());

        ScanOptions {
            verbose: self.verbose(config),
            skip,
            exclude,
            max_depth: self.scanning.max_depth.or(config.scanning.max_depth),
        }
    }

    /// Options the project editor is opened with.
    #[must_use]
    pub fn editor_options(&self, config: &FileConfig) -> EditorOptions {
        EditorOptions {
            verbose: self.verbose(config),
            scan: self.scan_options(config),
        }
    }

    /// Extract the options of this run from CLI args and config file.
    ///
    /// For boolean flags, the CLI flag (if set to `true`) takes priority,
    /// then the config file value, then `false`.
    #[must_use]
    pub fn run_options(&self, config: &FileConfig) -> RunOptions {
        RunOptions {
            mode: self.mode(),
            folder: self.editing.folder.clone(),
            group: self.editing.group.clone(),
            recursive: self.editing.recursive || config.editing.recursive.unwrap_or(false),
            dry_run: self.editing.dry_run || config.editing.dry_run.unwrap_or(false),
        }
    }

    fn verbose(&self, config: &FileConfig) -> bool {
        self.scanning.verbose || config.scanning.verbose.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use uvproj_edit::config::file::{FileEditConfig, FileScanConfig};

    #[test]
    fn test_default_values() {
        let args = Cli::parse_from(["uvproj-edit"]);
        let config = FileConfig::default();

        assert!(args.project_path(&config).is_none());
        assert_eq!(args.mode(), Mode::Add);
        assert!(!args.json());

        let run_opts = args.run_options(&config);
        assert!(run_opts.folder.is_none());
        assert!(run_opts.group.is_none());
        assert!(!run_opts.recursive);
        assert!(!run_opts.dry_run);

        let scan_opts = args.scan_options(&config);
        assert!(!scan_opts.verbose);
        assert!(scan_opts.skip.is_empty());
        assert!(scan_opts.exclude.is_empty());
        assert!(scan_opts.max_depth.is_none());

        assert!(!args.editor_options(&config).verbose);
    }

    #[test]
    fn test_add_with_short_flags() {
        let args = Cli::parse_from([
            "uvproj-edit",
            "-p",
            "Project/App.uvprojx",
            "-f",
            "Source/Test",
            "-g",
            "Tests",
            "-r",
            "-v",
        ]);
        let config = FileConfig::default();
        let run_opts = args.run_options(&config);

        assert_eq!(
            args.project_path(&config),
            Some(PathBuf::from("Project/App.uvprojx"))
        );
        assert_eq!(run_opts.mode, Mode::Add);
        assert_eq!(run_opts.folder, Some(PathBuf::from("Source/Test")));
        assert_eq!(run_opts.group.as_deref(), Some("Tests"));
        assert!(run_opts.recursive);
        assert!(args.editor_options(&config).verbose);
        assert!(args.scan_options(&config).verbose);
    }

    #[test]
    fn test_long_flags() {
        let args = Cli::parse_from([
            "uvproj-edit",
            "--project",
            "App.uvprojx",
            "--folder",
            "Src",
            "--group",
            "Src",
            "--recursive",
            "--dry-run",
            "--json",
        ]);
        let run_opts = args.run_options(&FileConfig::default());

        assert!(run_opts.recursive);
        assert!(run_opts.dry_run);
        assert!(args.json());
    }

    #[test]
    fn test_modes() {
        assert_eq!(Cli::parse_from(["uvproj-edit", "-d"]).mode(), Mode::Delete);
        assert_eq!(Cli::parse_from(["uvproj-edit", "--delete"]).mode(), Mode::Delete);
        assert_eq!(Cli::parse_from(["uvproj-edit", "-l"]).mode(), Mode::List);
        assert_eq!(Cli::parse_from(["uvproj-edit", "--list"]).mode(), Mode::List);
        assert_eq!(
            Cli::parse_from(["uvproj-edit", "--delete-group", "Old"]).mode(),
            Mode::DeleteGroup("Old".to_string())
        );
    }

    #[test]
    fn test_list_conflicts_with_delete() {
        assert!(Cli::try_parse_from(["uvproj-edit", "--list", "--delete"]).is_err());
        assert!(Cli::try_parse_from(["uvproj-edit", "-l", "-d"]).is_err());
        assert!(Cli::try_parse_from(["uvproj-edit", "--list", "--delete-group", "A"]).is_err());
        assert!(Cli::try_parse_from(["uvproj-edit", "--delete", "--delete-group", "A"]).is_err());
    }

    #[test]
    fn test_delete_group_requires_name() {
        assert!(Cli::try_parse_from(["uvproj-edit", "--delete-group"]).is_err());
    }

    #[test]
    fn test_multiple_skip_and_exclude() {
        let args = Cli::parse_from([
            "uvproj-edit",
            "--skip",
            "build",
            "--skip",
            ".git",
            "--exclude",
            "*_test.c",
            "--exclude",
            "Drivers/CMSIS",
        ]);
        let scan_opts = args.scan_options(&FileConfig::default());

        assert_eq!(
            scan_opts.skip,
            vec![PathBuf::from("build"), PathBuf::from(".git")]
        );
        assert_eq!(scan_opts.exclude, vec!["*_test.c", "Drivers/CMSIS"]);
    }

    #[test]
    fn test_max_depth() {
        let args = Cli::parse_from(["uvproj-edit", "--max-depth", "2"]);
        assert_eq!(args.scan_options(&FileConfig::default()).max_depth, Some(2));
    }

    #[test]
    fn test_config_subcommand() {
        let args = Cli::parse_from(["uvproj-edit", "config", "path"]);
        assert!(matches!(
            args.subcommand,
            Some(Commands::Config {
                command: ConfigCommand::Path
            })
        ));

        let args = Cli::parse_from(["uvproj-edit", "config", "init"]);
        assert!(matches!(
            args.subcommand,
            Some(Commands::Config {
                command: ConfigCommand::Init
            })
        ));
    }

    #[test]
    fn test_invalid_max_depth() {
        assert!(Cli::try_parse_from(["uvproj-edit", "--max-depth", "deep"]).is_err());
    }

    // ── Layered config tests ───────────────────────────────────────────

    #[test]
    fn test_config_provides_project() {
        let args = Cli::parse_from(["uvproj-edit"]);
        let config = FileConfig {
            project: Some(PathBuf::from("/work/Project/App.uvprojx")),
            ..FileConfig::default()
        };

        assert_eq!(
            args.project_path(&config),
            Some(PathBuf::from("/work/Project/App.uvprojx"))
        );
    }

    #[test]
    fn test_cli_project_overrides_config() {
        let args = Cli::parse_from(["uvproj-edit", "-p", "Other.uvprojx"]);
        let config = FileConfig {
            project: Some(PathBuf::from("/work/Project/App.uvprojx")),
            ..FileConfig::default()
        };

        assert_eq!(
            args.project_path(&config),
            Some(PathBuf::from("Other.uvprojx"))
        );
    }

    #[test]
    fn test_config_project_tilde_expansion() {
        let args = Cli::parse_from(["uvproj-edit"]);
        let config = FileConfig {
            project: Some(PathBuf::from("~/work/App.uvprojx")),
            ..FileConfig::default()
        };

        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                args.project_path(&config),
                Some(home.join("work/App.uvprojx"))
            );
        }
    }

    #[test]
    fn test_config_editing_defaults() {
        let args = Cli::parse_from(["uvproj-edit"]);
        let config = FileConfig {
            editing: FileEditConfig {
                recursive: Some(true),
                dry_run: Some(true),
            },
            ..FileConfig::default()
        };

        let run_opts = args.run_options(&config);
        assert!(run_opts.recursive);
        assert!(run_opts.dry_run);
    }

    #[test]
    fn test_config_scanning_merges_with_cli() {
        let args = Cli::parse_from([
            "uvproj-edit",
            "--skip",
            "out",
            "--exclude",
            "*.hpp",
            "--max-depth",
            "1",
        ]);
        let config = FileConfig {
            scanning: FileScanConfig {
                verbose: Some(true),
                skip: Some(vec![PathBuf::from("build")]),
                exclude: Some(vec!["*_test.c".to_string()]),
                max_depth: Some(5),
            },
            ..FileConfig::default()
        };

        let scan_opts = args.scan_options(&config);
        assert!(scan_opts.verbose);
        assert_eq!(
            scan_opts.skip,
            vec![PathBuf::from("build"), PathBuf::from("out")]
        );
        assert_eq!(scan_opts.exclude, vec!["*_test.c", "*.hpp"]);
        assert_eq!(scan_opts.max_depth, Some(1));
        assert!(args.editor_options(&config).verbose);
    }

    #[test]
    fn test_config_max_depth_used_when_cli_absent() {
        let args = Cli::parse_from(["uvproj-edit"]);
        let config = FileConfig {
            scanning: FileScanConfig {
                max_depth: Some(3),
                ..FileScanConfig::default()
            },
            ..FileConfig::default()
        };

        assert_eq!(args.scan_options(&config).max_depth, Some(3));
    }
}
