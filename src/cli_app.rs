//! Top-level CLI definition and dispatch.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use humansize::{BINARY, format_size};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::core::config::{Config, DEFAULT_CLEAN_MIN_SIZE};
use crate::core::errors::SweepError;
use crate::core::types::FileRecord;
use crate::history::{DeletionEvent, DeletionHistory};
use crate::remote::actions::{delete_file, stat_size};
use crate::remote::resolver::resolve_inventory;
use crate::remote::shell::{AdbShell, CommandChannel};
use crate::scanner::candidates::{build_candidates, matches_extensions};
use crate::scanner::walker::{WalkFilter, collect_large_files};
use crate::snapshot::SnapshotStore;

/// Root scanned by `clean-device` when no explicit paths are given.
const CLEAN_ROOT: &str = "/storage/emulated/0";

/// Phrase the operator must type to confirm a device deletion.
const CONFIRM_PHRASE: &str = "DELETE";

/// Storage Sweeper: find and remove the largest files locally and on device.
#[derive(Debug, Parser)]
#[command(
    name = "ssw",
    version,
    about = "Storage Sweeper - large file scanner and cleaner",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Machine-readable JSON output, one object per line.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Verbose diagnostics on stderr.
    #[arg(long, global = true, conflicts_with = "quiet")]
    debug: bool,
    /// Quiet mode (warnings and errors only).
    #[arg(short, long, global = true, conflicts_with = "debug")]
    quiet: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Scan local paths for large files.
    Scan(ScanArgs),
    /// Scan a connected device for large files.
    ScanDevice(ScanDeviceArgs),
    /// Scan a connected device and delete the largest files.
    CleanDevice(CleanDeviceArgs),
    /// Delete device files selected by saved scan index or explicit path.
    DeleteDevice(DeleteDeviceArgs),
    /// Print the last saved device scan.
    Snapshot,
    /// Print the effective config file location.
    ConfigPath,
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct ScanArgs {
    /// Paths to scan (defaults to your home directory).
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,
    /// Minimum file size to report (e.g. 100M, 2G).
    #[arg(long, value_name = "SIZE")]
    min_size: Option<String>,
    /// Comma separated extensions to include (e.g. .mp4,.zip).
    #[arg(long, value_name = "EXTS", default_value = "")]
    extensions: String,
    /// Comma separated directory names to exclude (e.g. .cache,node_modules).
    #[arg(long, value_name = "DIRS", default_value = "")]
    exclude_dirs: String,
    /// Show top N largest files.
    #[arg(long, value_name = "N")]
    top: Option<usize>,
    /// Write the full filtered report to a JSON file.
    #[arg(long, value_name = "PATH")]
    json_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Args, Default)]
struct ScanDeviceArgs {
    /// Root path on device to scan.
    #[arg(long, value_name = "PATH")]
    root: Option<String>,
    /// Minimum file size to report on device.
    #[arg(long, value_name = "SIZE")]
    min_size: Option<String>,
    /// Comma separated extensions to include.
    #[arg(long, value_name = "EXTS", default_value = "")]
    extensions: String,
    /// Show top N files on device.
    #[arg(long, value_name = "N")]
    top: Option<usize>,
    /// Write the full filtered report to a JSON file.
    #[arg(long, value_name = "PATH")]
    json_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Args, Default)]
struct CleanDeviceArgs {
    /// Device paths to delete directly (skips the scan).
    #[arg(value_name = "PATH")]
    paths: Vec<String>,
    /// Minimum file size to consider for deletion.
    #[arg(long, value_name = "SIZE")]
    min_size: Option<String>,
    /// Comma separated extensions to include.
    #[arg(long, value_name = "EXTS", default_value = "")]
    extensions: String,
    /// Consider only top N files for deletion.
    #[arg(long, value_name = "N")]
    top: Option<usize>,
    /// Show what would be deleted but don't delete.
    #[arg(long)]
    dry_run: bool,
    /// Do not prompt for deletion.
    #[arg(long)]
    yes: bool,
}

#[derive(Debug, Clone, Args, Default)]
struct DeleteDeviceArgs {
    /// Index from last scan to delete (repeatable, accepts comma lists).
    #[arg(long = "index", value_name = "N")]
    index: Vec<String>,
    /// Exact device path to delete (repeatable).
    #[arg(long = "path", value_name = "PATH")]
    path: Vec<String>,
    /// Select every entry from the last saved scan.
    #[arg(long)]
    from_scan: bool,
    /// Show what would be deleted but don't delete.
    #[arg(long)]
    dry_run: bool,
    /// Do not prompt; perform deletion.
    #[arg(long)]
    yes: bool,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

/// CLI-level failure classification; the variant decides the exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// Operation partially succeeded.
    #[error("{0}")]
    Partial(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
            Self::Partial(_) => 4,
        }
    }
}

impl From<SweepError> for CliError {
    fn from(err: SweepError) -> Self {
        let message = err.to_string();
        match err {
            SweepError::EmptySelection { .. } => Self::User(message),
            SweepError::Serialization { .. } | SweepError::SnapshotCorrupt { .. } => {
                Self::Internal(message)
            }
            _ => Self::Runtime(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// Parse arguments, run the selected command, map failures to exit codes.
#[must_use]
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);
    if cli.no_color {
        control::set_override(false);
    }
    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("error: {err}").red());
            ExitCode::from(err.exit_code())
        }
    }
}

fn dispatch(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Scan(args) => run_scan(cli, args),
        Command::ScanDevice(args) => run_scan_device(cli, args),
        Command::CleanDevice(args) => run_clean_device(cli, args),
        Command::DeleteDevice(args) => run_delete_device(cli, args),
        Command::Snapshot => run_snapshot(cli),
        Command::ConfigPath => run_config_path(cli),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn init_tracing(cli: &Cli) {
    let fallback = if cli.debug {
        "storage_sweeper=debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let ansi = io::stderr().is_terminal() && !cli.no_color;
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time()
                .with_ansi(ansi),
        )
        .with(filter)
        .try_init();
}

// ---------------------------------------------------------------------------
// Subcommand bodies
// ---------------------------------------------------------------------------

fn run_scan(cli: &Cli, args: &ScanArgs) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let min_size = resolve_size(args.min_size.as_deref(), config.scan.min_size_bytes)?;
    let extensions = split_csv(&args.extensions);
    let exclude_dirs = if args.exclude_dirs.trim().is_empty() {
        config.scan.exclude_dirs.clone()
    } else {
        split_csv(&args.exclude_dirs)
    };
    let top = args.top.unwrap_or(config.scan.top);
    let roots: Vec<PathBuf> = if args.paths.is_empty() {
        vec![
            dirs::home_dir()
                .ok_or_else(|| CliError::Runtime("could not determine home directory".to_owned()))?,
        ]
    } else {
        args.paths.clone()
    };

    if output_mode(cli) == OutputMode::Human && !cli.quiet {
        let listed: Vec<String> = roots.iter().map(|p| p.display().to_string()).collect();
        println!(
            "Scanning paths: {} (min size {})",
            listed.join(", "),
            human_bytes(min_size)
        );
    }

    let filter = WalkFilter {
        min_size,
        extensions: extensions.clone(),
        exclude_dirs,
    };
    let mut inventory: Vec<FileRecord> = Vec::new();
    for root in &roots {
        if root.is_file() {
            let Ok(meta) = fs::metadata(root) else { continue };
            let name = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if meta.len() >= min_size && matches_extensions(&name, &extensions) {
                inventory.push(FileRecord::new(
                    meta.len(),
                    root.to_string_lossy().into_owned(),
                ));
            }
        } else {
            inventory.extend(collect_large_files(root, &filter));
        }
    }

    let ranked = build_candidates(&inventory, 0, &[], usize::MAX);
    let shown: Vec<FileRecord> = ranked.iter().take(top).cloned().collect();

    if shown.is_empty() {
        match output_mode(cli) {
            OutputMode::Human => println!("{}", "No files found matching criteria.".yellow()),
            OutputMode::Json => write_json_line(&json!({
                "command": "scan",
                "min_size_bytes": min_size,
                "total_matches": 0,
                "candidates": [],
            }))?,
        }
        return Ok(());
    }

    match output_mode(cli) {
        OutputMode::Human => {
            println!("{}", format!("Top {} files:", shown.len()).green());
            for record in &shown {
                println!("{:>10}    {}", human_bytes(record.size), record.path);
            }
        }
        OutputMode::Json => write_json_line(&json!({
            "command": "scan",
            "min_size_bytes": min_size,
            "total_matches": ranked.len(),
            "candidates": shown,
        }))?,
    }

    if let Some(path) = &args.json_file {
        export_records(path, &ranked)?;
        note(cli, &format!("Saved report to {}", path.display()));
    }
    Ok(())
}

fn run_scan_device(cli: &Cli, args: &ScanDeviceArgs) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let channel = AdbShell::new(config.remote.channel_binary.clone());
    channel.ensure_available()?;
    let min_size = resolve_size(args.min_size.as_deref(), config.remote.min_size_bytes)?;
    let extensions = split_csv(&args.extensions);
    let top = args.top.unwrap_or(config.remote.top);
    let root = args.root.clone().unwrap_or_else(|| config.remote.root.clone());

    note(cli, "Listing files on device (this may take a while)...");
    let inventory = resolve_inventory(&channel, &root);
    let filtered = build_candidates(&inventory, min_size, &extensions, usize::MAX);
    let candidates: Vec<FileRecord> = filtered.iter().take(top).cloned().collect();

    if candidates.is_empty() {
        match output_mode(cli) {
            OutputMode::Human => println!("{}", "No large files found on device.".yellow()),
            OutputMode::Json => write_json_line(&json!({
                "command": "scan-device",
                "root": root,
                "min_size_bytes": min_size,
                "total_matches": 0,
                "candidates": [],
            }))?,
        }
        return Ok(());
    }

    let store = SnapshotStore::new(config.snapshot_path());
    match output_mode(cli) {
        OutputMode::Human => {
            println!(
                "{}",
                format!("Top {} files on device:", candidates.len()).green()
            );
            print_indexed(&candidates);
        }
        OutputMode::Json => write_json_line(&json!({
            "command": "scan-device",
            "root": root,
            "min_size_bytes": min_size,
            "total_matches": filtered.len(),
            "candidates": candidates,
            "snapshot": store.path().display().to_string(),
        }))?,
    }

    match store.save(&candidates) {
        Ok(()) => note(cli, &format!("Saved last scan to {}", store.path().display())),
        Err(err) => warn!(%err, "could not persist scan snapshot"),
    }

    if let Some(path) = &args.json_file {
        export_records(path, &filtered)?;
        note(cli, &format!("Saved device report to {}", path.display()));
    }
    Ok(())
}

fn run_clean_device(cli: &Cli, args: &CleanDeviceArgs) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let channel = AdbShell::new(config.remote.channel_binary.clone());
    channel.ensure_available()?;
    let extensions = split_csv(&args.extensions);

    let pool: Vec<FileRecord> = if args.paths.is_empty() {
        let min_size = resolve_size(args.min_size.as_deref(), DEFAULT_CLEAN_MIN_SIZE)?;
        let inventory = resolve_inventory(&channel, CLEAN_ROOT);
        build_candidates(&inventory, min_size, &extensions, usize::MAX)
    } else {
        // Explicit paths are stat'd directly; the extension filter still
        // applies but the size floor does not.
        let mut picked = Vec::new();
        for path in &args.paths {
            match stat_size(&channel, path) {
                Some(size) => {
                    if matches_extensions(path, &extensions) {
                        picked.push(FileRecord::new(size, path.clone()));
                    }
                }
                None => warn_line(cli, &format!("Could not stat {path}; skipping.")),
            }
        }
        picked
    };

    let top = args.top.unwrap_or(config.remote.top);
    let candidates = build_candidates(&pool, 0, &[], top);
    if candidates.is_empty() {
        match output_mode(cli) {
            OutputMode::Human => println!("{}", "No candidates to delete on device.".yellow()),
            OutputMode::Json => write_json_line(&json!({
                "command": "clean-device",
                "selected": [],
                "deleted": 0,
                "failed": 0,
                "bytes_freed": 0,
            }))?,
        }
        return Ok(());
    }

    let history = DeletionHistory::new(config.history_path());
    execute_deletions(
        cli,
        &channel,
        &history,
        &candidates,
        args.dry_run,
        args.yes,
        "clean-device",
        "Device deletion candidates (PERMANENT):",
    )
}

fn run_delete_device(cli: &Cli, args: &DeleteDeviceArgs) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let channel = AdbShell::new(config.remote.channel_binary.clone());
    channel.ensure_available()?;

    let store = SnapshotStore::new(config.snapshot_path());
    let indices = flatten_indices(&args.index);
    let mut candidates: Vec<FileRecord> = Vec::new();

    if args.from_scan || !indices.is_empty() {
        let entries = if store.exists() {
            store.load()
        } else {
            warn_line(
                cli,
                &format!(
                    "No last scan found at {}. Run scan-device first.",
                    store.path().display()
                ),
            );
            Vec::new()
        };
        if args.from_scan {
            candidates.extend(
                entries
                    .iter()
                    .map(|entry| FileRecord::new(entry.size, entry.path.clone())),
            );
        } else {
            for wanted in &indices {
                match entries.iter().find(|entry| entry.index == *wanted) {
                    Some(entry) => {
                        candidates.push(FileRecord::new(entry.size, entry.path.clone()));
                    }
                    None => {
                        warn_line(
                            cli,
                            &format!("Index {wanted} not found in last scan; skipping."),
                        );
                    }
                }
            }
        }
    }

    for path in &args.path {
        match stat_size(&channel, path) {
            Some(size) => candidates.push(FileRecord::new(size, path.clone())),
            None => warn_line(cli, &format!("Could not stat {path}; skipping.")),
        }
    }

    if candidates.is_empty() {
        return Err(SweepError::EmptySelection {
            details: "no files selected for deletion".to_owned(),
        }
        .into());
    }

    let history = DeletionHistory::new(config.history_path());
    execute_deletions(
        cli,
        &channel,
        &history,
        &candidates,
        args.dry_run,
        args.yes,
        "delete-device",
        "Selected files for deletion (PERMANENT):",
    )
}

fn run_snapshot(cli: &Cli) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let store = SnapshotStore::new(config.snapshot_path());
    let entries = store.load();
    match output_mode(cli) {
        OutputMode::Human => {
            if entries.is_empty() {
                println!(
                    "{}",
                    format!("No snapshot found at {}.", store.path().display()).yellow()
                );
            } else {
                for entry in &entries {
                    println!(
                        "[{}] {:>10}    {}",
                        entry.index,
                        human_bytes(entry.size),
                        entry.path
                    );
                }
            }
            Ok(())
        }
        OutputMode::Json => write_json_line(&json!({
            "command": "snapshot",
            "path": store.path().display().to_string(),
            "entries": entries,
        })),
    }
}

fn run_config_path(cli: &Cli) -> Result<(), CliError> {
    let path = cli.config.clone().unwrap_or_else(Config::default_path);
    match output_mode(cli) {
        OutputMode::Human => {
            println!("{}", path.display());
            Ok(())
        }
        OutputMode::Json => write_json_line(&json!({
            "command": "config-path",
            "path": path.display().to_string(),
        })),
    }
}

/// Shared tail of the two deletion commands: banner, dry-run short-circuit,
/// typed confirmation, per-path dispatch, history, summary.
#[allow(clippy::too_many_arguments)]
fn execute_deletions(
    cli: &Cli,
    channel: &dyn CommandChannel,
    history: &DeletionHistory,
    candidates: &[FileRecord],
    dry_run: bool,
    yes: bool,
    command: &str,
    banner: &str,
) -> Result<(), CliError> {
    if output_mode(cli) == OutputMode::Human {
        println!("{}", banner.red());
        print_indexed(candidates);
    }

    if dry_run {
        for record in candidates {
            history.record(&DeletionEvent::now(
                &record.path,
                record.size,
                true,
                true,
                "dry run",
            ));
        }
        match output_mode(cli) {
            OutputMode::Human => {
                println!("{}", "Dry-run: no files will be removed.".yellow());
            }
            OutputMode::Json => write_json_line(&json!({
                "command": command,
                "dry_run": true,
                "selected": candidates,
                "deleted": 0,
                "failed": 0,
                "bytes_freed": 0,
            }))?,
        }
        return Ok(());
    }

    if !yes && !confirm_delete_phrase()? {
        match output_mode(cli) {
            OutputMode::Human => println!("{}", "Aborted by user.".yellow()),
            OutputMode::Json => write_json_line(&json!({
                "command": command,
                "aborted": true,
                "deleted": 0,
                "failed": 0,
                "bytes_freed": 0,
            }))?,
        }
        return Ok(());
    }

    let mut freed: u64 = 0;
    let mut failed: usize = 0;
    let mut outcomes: Vec<Value> = Vec::new();
    for record in candidates {
        let outcome = delete_file(channel, &record.path);
        history.record(&DeletionEvent::now(
            &record.path,
            record.size,
            false,
            outcome.ok,
            &outcome.message,
        ));
        if outcome.ok {
            freed += record.size;
            if output_mode(cli) == OutputMode::Human {
                println!("{}", format!("Deleted: {}", record.path).green());
            }
        } else {
            failed += 1;
            warn_line(
                cli,
                &format!("Failed to delete {}: {}", record.path, outcome.message),
            );
        }
        outcomes.push(json!({
            "path": record.path,
            "size": record.size,
            "ok": outcome.ok,
            "message": outcome.message,
        }));
    }

    match output_mode(cli) {
        OutputMode::Human => {
            if !cli.quiet {
                println!(
                    "Freed {} across {} files.",
                    human_bytes(freed),
                    candidates.len() - failed
                );
            }
        }
        OutputMode::Json => write_json_line(&json!({
            "command": command,
            "dry_run": false,
            "deleted": candidates.len() - failed,
            "failed": failed,
            "bytes_freed": freed,
            "outcomes": outcomes,
        }))?,
    }

    if failed > 0 {
        return Err(CliError::Partial(format!(
            "{failed} of {} deletions failed",
            candidates.len()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

fn output_mode(cli: &Cli) -> OutputMode {
    if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    }
}

/// Informational line: blue, suppressed by `--quiet`, routed to stderr in
/// JSON mode so stdout stays machine-parseable.
fn note(cli: &Cli, text: &str) {
    if cli.quiet {
        return;
    }
    if cli.json {
        eprintln!("{}", text.blue());
    } else {
        println!("{}", text.blue());
    }
}

/// Per-item warning: yellow, never suppressed, stderr in JSON mode.
fn warn_line(cli: &Cli, text: &str) {
    if cli.json {
        eprintln!("{}", text.yellow());
    } else {
        println!("{}", text.yellow());
    }
}

fn print_indexed(records: &[FileRecord]) {
    for (i, record) in records.iter().enumerate() {
        println!(
            "[{}] {:>10}    {}",
            i + 1,
            human_bytes(record.size),
            record.path
        );
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn export_records(path: &Path, records: &[FileRecord]) -> Result<(), CliError> {
    let mut body = serde_json::to_string_pretty(records)?;
    body.push('\n');
    fs::write(path, body)?;
    Ok(())
}

fn human_bytes(bytes: u64) -> String {
    format_size(bytes, BINARY)
}

fn confirm_delete_phrase() -> Result<bool, CliError> {
    eprint!(
        "This will PERMANENTLY delete the listed files on device. Type '{CONFIRM_PHRASE}' to confirm: "
    );
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim_end_matches(['\r', '\n']) == CONFIRM_PHRASE)
}

// ---------------------------------------------------------------------------
// Flag parsing helpers
// ---------------------------------------------------------------------------

/// Parses `100M`-style size values: decimal multipliers, optional `B`
/// suffix, fractional values allowed.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn parse_size_spec(spec: &str) -> Result<u64, CliError> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(CliError::User("empty size value".to_owned()));
    }
    let upper = trimmed.to_ascii_uppercase();
    let body = upper.strip_suffix('B').unwrap_or(upper.as_str());
    let (digits, multiplier) = match body.as_bytes().last() {
        Some(b'K') => (&body[..body.len() - 1], 1_000_u64),
        Some(b'M') => (&body[..body.len() - 1], 1_000_000),
        Some(b'G') => (&body[..body.len() - 1], 1_000_000_000),
        Some(b'T') => (&body[..body.len() - 1], 1_000_000_000_000),
        _ => (body, 1),
    };
    let value: f64 = digits
        .trim()
        .parse()
        .map_err(|_| CliError::User(format!("invalid size value {spec:?}")))?;
    if value < 0.0 {
        return Err(CliError::User(format!("negative size value {spec:?}")));
    }
    Ok((value * multiplier as f64).round() as u64)
}

fn resolve_size(flag: Option<&str>, fallback: u64) -> Result<u64, CliError> {
    flag.map(parse_size_spec)
        .transpose()
        .map(|parsed| parsed.unwrap_or(fallback))
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Flattens repeatable `--index` values, each possibly a comma list.
/// Unparseable tokens are dropped.
fn flatten_indices(values: &[String]) -> Vec<usize> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .filter_map(|token| token.trim().parse().ok())
        .collect()
}
