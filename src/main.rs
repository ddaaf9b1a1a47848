//! jingtool - list, search, rename and delete files from the command line.
//!
//! Usage:
//!   jingtool pick                     Prompt for a folder
//!   jingtool ls [PATH]                List a directory
//!   jingtool search KEYWORD [-r ROOT] Recursive name search
//!   jingtool rename PATH NEW_NAME     Rename one file
//!   jingtool batch-rename [-f FILE]   Rename from a JSON list
//!   jingtool delete PATH...           Permanently delete
//!   jingtool call                     Run one JSON request from stdin
//!   jingtool --help                   Show help

mod settings;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use dialoguer::{Confirm, Input};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use jingtool_core::{BatchSummary, DirEntry, OperationOutcome, PathWarning, RenameRequest};
use jingtool_ops::{FileEngine, FolderPicker, OperationType, Request};
use jingtool_scan::SearchProgress;

use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "jingtool",
    version,
    about = "List, search, batch rename and delete files",
    long_about = "jingtool is the file browser engine of the jingtool desktop app, \
                  exposed as a command-line tool.\n\n\
                  Deletion is permanent: nothing is moved to a trash folder."
)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prompt for a folder and print it
    Pick,

    /// List the immediate children of a directory
    Ls {
        /// Directory to list
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Also print errors that made the listing empty
        #[arg(short, long)]
        warnings: bool,
    },

    /// Search a directory tree for names containing a keyword
    Search {
        /// Case-sensitive substring to look for
        keyword: String,

        /// Directory to search (defaults to settings, then the current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Follow symbolic links
        #[arg(long)]
        follow_symlinks: bool,

        /// Maximum depth below the root
        #[arg(short = 'd', long)]
        max_depth: Option<u32>,

        /// Also print unreadable directories
        #[arg(short, long)]
        warnings: bool,
    },

    /// Rename a file or directory within its parent directory
    Rename {
        /// File to rename
        path: PathBuf,

        /// New bare file name
        new_name: String,
    },

    /// Rename several files from a JSON list of {"path", "newName"} objects
    BatchRename {
        /// JSON file (defaults to stdin)
        #[arg(short = 'F', long)]
        file: Option<PathBuf>,
    },

    /// Permanently delete files and directories
    Delete {
        /// Paths to delete
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Read one JSON request from stdin and print the JSON response
    Call,

    /// Show the settings file, or write the defaults with --init
    Config {
        /// Write default settings to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Folder picker that prompts on the terminal.
struct PromptPicker;

impl FolderPicker for PromptPicker {
    fn pick(&self) -> Option<PathBuf> {
        let input: String = Input::new()
            .with_prompt("Folder (empty to cancel)")
            .allow_empty(true)
            .interact_text()
            .ok()?;

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(expand_home(trimmed))
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load();
    let format = cli.format;

    match cli.command {
        Command::Pick => {
            let engine = FileEngine::with_config(settings.walk).with_picker(PromptPicker);
            let folder = engine.select_folder().await;
            match format {
                OutputFormat::Text => {
                    if let Some(folder) = &folder {
                        println!("{}", folder.display());
                    }
                }
                OutputFormat::Json => print_json(&folder)?,
            }
            Ok(exit_status(folder.is_some()))
        }
        Command::Ls { path, warnings } => {
            let engine = FileEngine::with_config(settings.walk);
            let report = engine.read_dir_report(path).await;
            match format {
                OutputFormat::Text => {
                    print_entries(&report.entries);
                    if warnings {
                        print_warnings(&report.warnings);
                    }
                }
                OutputFormat::Json if warnings => print_json(&report)?,
                OutputFormat::Json => print_json(&report.entries)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Search {
            keyword,
            root,
            follow_symlinks,
            max_depth,
            warnings,
        } => {
            let mut walk = settings.walk;
            walk.follow_symlinks |= follow_symlinks;
            if max_depth.is_some() {
                walk.max_depth = max_depth;
            }
            let root = root
                .or(settings.default_root)
                .unwrap_or_else(|| PathBuf::from("."));

            let engine = FileEngine::with_config(walk);
            tokio::spawn(log_search_progress(engine.subscribe_search()));

            let report = engine
                .search_files(root, keyword, cancel_on_ctrl_c())
                .await;
            match format {
                OutputFormat::Text => {
                    for result in &report.results {
                        println!("{}", result.path.display());
                    }
                    if warnings {
                        print_warnings(&report.warnings);
                    }
                    if report.cancelled {
                        eprintln!("Search cancelled, results are partial");
                    }
                    eprintln!("{} matches", report.len());
                }
                OutputFormat::Json if warnings => print_json(&report)?,
                OutputFormat::Json => print_json(&report.results)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Rename { path, new_name } => {
            let engine = FileEngine::new();
            let outcome = engine.rename_file(absolute(&path)?, new_name).await;
            let ok = report_outcomes(OperationType::Rename, std::slice::from_ref(&outcome), format)?;
            Ok(exit_status(ok))
        }
        Command::BatchRename { file } => {
            let json = match file {
                Some(file) => std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?,
                None => read_stdin()?,
            };
            let items: Vec<RenameRequest> =
                serde_json::from_str(&json).context("Invalid rename list")?;

            let engine = FileEngine::new();
            let outcomes = engine.batch_rename(items, cancel_on_ctrl_c()).await;
            Ok(exit_status(report_outcomes(OperationType::Rename, &outcomes, format)?))
        }
        Command::Delete { paths, yes } => {
            let paths = paths
                .iter()
                .map(|p| absolute(p))
                .collect::<Result<Vec<_>>>()?;

            if settings.confirm_delete && !yes && !confirm_delete(&paths)? {
                eprintln!("Nothing deleted");
                return Ok(ExitCode::SUCCESS);
            }

            let engine = FileEngine::new();
            let outcomes = engine.delete_files(paths, cancel_on_ctrl_c()).await;
            Ok(exit_status(report_outcomes(OperationType::Delete, &outcomes, format)?))
        }
        Command::Call => {
            let request: Request =
                serde_json::from_str(&read_stdin()?).context("Invalid request")?;
            if request.is_destructive() {
                tracing::info!(op = request.name(), "running destructive request");
            }
            let engine = FileEngine::with_config(settings.walk).with_picker(PromptPicker);
            let response = engine.handle(request, cancel_on_ctrl_c()).await;
            print_json(&response)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config { init } => {
            let path = Settings::config_path();
            if init {
                Settings::default()
                    .save()
                    .context("Failed to write settings")?;
            }
            match path {
                Some(path) => eprintln!("Settings file: {}", path.display()),
                None => eprintln!("No config directory on this platform"),
            }
            let current = if init { Settings::default() } else { settings };
            match format {
                OutputFormat::Text => print!("{}", toml::to_string_pretty(&current)?),
                OutputFormat::Json => print_json(&current)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Install the tracing subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Log search progress until the searcher goes away. Returns the number of
/// snapshots logged.
async fn log_search_progress(mut progress_rx: broadcast::Receiver<SearchProgress>) -> usize {
    let mut logged = 0;
    loop {
        match progress_rx.recv().await {
            Ok(progress) => {
                tracing::info!(
                    visited = progress.entries_visited,
                    matches = progress.matches,
                    "searching {}",
                    progress.current_path.display()
                );
                logged += 1;
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "progress logger lagged");
            }
            Err(RecvError::Closed) => return logged,
        }
    }
}

/// Token that fires on Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after the current item");
            child.cancel();
        }
    });
    token
}

/// Ask before an irreversible delete.
fn confirm_delete(paths: &[PathBuf]) -> Result<bool> {
    eprintln!("The following will be permanently deleted (no undo):");
    for path in paths {
        eprintln!("  {}", path.display());
    }
    let confirmed = Confirm::new()
        .with_prompt(format!("Delete {} item(s)?", paths.len()))
        .default(false)
        .interact()?;
    Ok(confirmed)
}

/// Print batch outcomes. Returns whether every item succeeded.
fn report_outcomes(
    operation: OperationType,
    outcomes: &[OperationOutcome],
    format: OutputFormat,
) -> Result<bool> {
    match format {
        OutputFormat::Text => {
            for outcome in outcomes {
                match &outcome.error {
                    None => println!("ok    {}", outcome.path.display()),
                    Some(error) => println!("FAIL  {}: {}", outcome.path.display(), error),
                }
            }
        }
        OutputFormat::Json if outcomes.len() == 1 && operation == OperationType::Rename => {
            print_json(&outcomes[0])?
        }
        OutputFormat::Json => print_json(&outcomes)?,
    }

    let summary = BatchSummary::from_outcomes(outcomes);
    eprintln!("{}", summary.describe(operation.past_tense()));

    Ok(summary.is_success())
}

fn exit_status(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_entries(entries: &[DirEntry]) {
    for entry in entries {
        let marker = if entry.is_directory { "/" } else { "" };
        println!("{}{}", entry.name, marker);
    }
}

fn print_warnings(warnings: &[PathWarning]) {
    for warning in warnings {
        eprintln!("warning: {}: {}", warning.path.display(), warning.message);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(buffer)
}

/// Resolve a user-supplied path against the current directory.
fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Invalid path: {}", path.display()))
}

/// Expand a leading `~` to the home directory.
fn expand_home(input: &str) -> PathBuf {
    match (input.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(input),
    }
}
