//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use homedash::board::catalog::{Catalog, FAVORITES_CAP};
use homedash::board::model::{BoardCmd, BoardModel, BoardMsg};
use homedash::board::reorder::{DragResult, DropLocation, DropOutcome};
use homedash::board::runtime::BoardRuntime;
use homedash::board::shortcut::{Shortcut, ShortcutId};
use homedash::board::update::update;
use homedash::core::config::{BackendKind, Config};
use homedash::core::errors::DashError;
use homedash::logger::jsonl::JsonlConfig;
#[cfg(feature = "http")]
use homedash::logger::jsonl::{EventType, JsonlWriter, LogEntry};
#[cfg(feature = "http")]
use homedash::store::http::HttpBackend;
#[cfg(feature = "http")]
use homedash::store::probe::{ProbeOutcome, ProbingSource, probe_store, unix_now};
use homedash::store::sqlite::ShortcutStore;
use homedash::sync::poller::{Poller, fetch_message};
use homedash::sync::sink::{PersistenceSink, RecordingSink, ShortcutSource};
use homedash::sync::worker::{CHANNEL_CAPACITY, SyncWorker};

/// homedash: arrange, inspect and persist home-lab dashboard shortcuts.
#[derive(Debug, Parser)]
#[command(
    name = "homedash",
    author,
    version,
    about = "Home-lab dashboard shortcut board",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Create the local store and sync configured services into it.
    Init,
    /// Render one page of the shortcut grid.
    Grid(ViewArgs),
    /// Run one edit session: unlock, drag one shortcut, lock (saves once).
    Move(MoveArgs),
    /// Print the save payload for the current arrangement.
    Payload,
    /// Resolve the launch URL of a shortcut (by id or name).
    Open(OpenArgs),
    /// Refetch every `poll.interval_secs` and print each refresh.
    Watch(WatchArgs),
    /// Probe every service URL and record its status.
    #[cfg(feature = "http")]
    Probe(ProbeArgs),
    /// View configuration state.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct ViewArgs {
    /// Viewport width in pixels (selects 2, 3 or 5 columns).
    #[arg(long, value_name = "PIXELS")]
    width: Option<u32>,
    /// Page to show (1-indexed, clamped).
    #[arg(long, default_value_t = 1, value_name = "N")]
    page: usize,
    /// Search text filtering the grid.
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,
}

#[derive(Debug, Clone, Args)]
struct MoveArgs {
    /// Drag source, e.g. `row-0:2` or `favorites:1`.
    #[arg(value_name = "FROM")]
    from: DropLocation,
    /// Drop target, e.g. `favorites:0` or `row-1:0`.
    #[arg(value_name = "TO")]
    to: DropLocation,
    #[command(flatten)]
    view: ViewArgs,
    /// Run the session without writing to the backend.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Args)]
struct WatchArgs {
    #[command(flatten)]
    view: ViewArgs,
    /// Stop after this many fetches (runs until interrupted when omitted).
    #[arg(long, value_name = "N")]
    count: Option<u64>,
}

#[derive(Debug, Clone, Args)]
struct OpenArgs {
    /// Shortcut id or (case-insensitive) name.
    #[arg(value_name = "SHORTCUT")]
    shortcut: String,
}

#[cfg(feature = "http")]
#[derive(Debug, Clone, Args)]
struct ProbeArgs {
    /// Probe even if the last probe is recent.
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Clone, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print the config file path.
    Path,
    /// Print the effective configuration.
    Show,
    /// Validate the configuration and print its hash.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Json(_) => 3,
        }
    }
}

impl From<DashError> for CliError {
    fn from(error: DashError) -> Self {
        match error {
            DashError::InvalidConfig { .. }
            | DashError::MissingConfig { .. }
            | DashError::ConfigParse { .. }
            | DashError::UnknownShortcut { .. }
            | DashError::InvalidZone { .. } => Self::User(error.to_string()),
            other => Self::Runtime(other.to_string()),
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Init => run_init(cli),
        Command::Grid(args) => run_grid(cli, args),
        Command::Move(args) => run_move(cli, args),
        Command::Payload => run_payload(cli),
        Command::Open(args) => run_open(cli, args),
        Command::Watch(args) => run_watch(cli, args),
        #[cfg(feature = "http")]
        Command::Probe(args) => run_probe(cli, args),
        Command::Config(args) => run_config(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    Ok(Config::load(cli.config.as_deref())?)
}

/// Open the configured shortcut source, syncing services first for SQLite.
fn open_source(config: &Config) -> Result<Box<dyn ShortcutSource>, CliError> {
    match config.backend.kind {
        BackendKind::Sqlite => {
            let store = ShortcutStore::open(&config.paths.sqlite_db)?;
            store.sync_services(&config.services)?;
            Ok(Box::new(store))
        }
        #[cfg(feature = "http")]
        BackendKind::Http => Ok(Box::new(HttpBackend::from_config(&config.backend)?)),
        #[cfg(not(feature = "http"))]
        BackendKind::Http => Err(http_disabled()),
    }
}

/// Open the configured persistence sink.
fn open_sink(config: &Config) -> Result<Box<dyn PersistenceSink>, CliError> {
    match config.backend.kind {
        BackendKind::Sqlite => Ok(Box::new(ShortcutStore::open(&config.paths.sqlite_db)?)),
        #[cfg(feature = "http")]
        BackendKind::Http => Ok(Box::new(HttpBackend::from_config(&config.backend)?)),
        #[cfg(not(feature = "http"))]
        BackendKind::Http => Err(http_disabled()),
    }
}

/// Source for long-running polls: the SQLite store refreshes service health
/// before each listing when probing is available.
#[cfg(feature = "http")]
fn open_watch_source(config: &Config) -> Result<Box<dyn ShortcutSource>, CliError> {
    if config.backend.kind != BackendKind::Sqlite {
        return open_source(config);
    }
    let store = ShortcutStore::open(&config.paths.sqlite_db)?;
    store.sync_services(&config.services)?;
    Ok(Box::new(ProbingSource::new(store, config.poll.clone())))
}

#[cfg(not(feature = "http"))]
fn open_watch_source(config: &Config) -> Result<Box<dyn ShortcutSource>, CliError> {
    open_source(config)
}

#[cfg(not(feature = "http"))]
fn http_disabled() -> CliError {
    CliError::User("backend.kind = \"http\" requires the `http` feature".to_string())
}

/// Fetch once and apply the view options; a failed fetch is an error here.
fn load_board(config: &Config, view: &ViewArgs) -> Result<BoardModel, CliError> {
    let source = open_source(config)?;
    let mut model = view
        .width
        .map_or_else(BoardModel::new, BoardModel::with_width);
    for msg in view_messages(fetch_message(source.as_ref()), view) {
        if let BoardMsg::FetchFailed { message, .. } = &msg {
            return Err(DashError::NotLoaded {
                details: message.clone(),
            }
            .into());
        }
        let _ = update(&mut model, msg);
    }
    Ok(model)
}

/// Fetch result followed by the messages that reproduce the requested view.
fn view_messages(fetched: BoardMsg, view: &ViewArgs) -> Vec<BoardMsg> {
    let mut msgs = vec![fetched];
    if let Some(search) = &view.search {
        msgs.push(BoardMsg::SetSearch(search.clone()));
    }
    msgs.push(BoardMsg::SetPage(view.page));
    msgs
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn run_init(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    if config.backend.kind != BackendKind::Sqlite {
        return Err(CliError::User(
            "init only applies to the sqlite backend".to_string(),
        ));
    }
    let store = ShortcutStore::open(&config.paths.sqlite_db)?;
    let report = store.sync_services(&config.services)?;
    let total = store.list_shortcuts()?.len();

    match output_mode(cli) {
        OutputMode::Human => {
            println!(
                "{} {}",
                "Store ready:".green().bold(),
                store.path().display()
            );
            println!(
                "  services: {total} (added {}, removed {})",
                report.added, report.removed
            );
        }
        OutputMode::Json => write_json_line(&json!({
            "command": "init",
            "path": store.path().to_string_lossy(),
            "services": total,
            "added": report.added,
            "removed": report.removed,
        }))?,
    }
    Ok(())
}

fn run_grid(cli: &Cli, args: &ViewArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let model = load_board(&config, args)?;
    match output_mode(cli) {
        OutputMode::Human => print_board(&model),
        OutputMode::Json => write_json_line(&board_json(&model))?,
    }
    Ok(())
}

fn run_move(cli: &Cli, args: &MoveArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let source = open_source(&config)?;
    let sink: Box<dyn PersistenceSink> = if args.dry_run {
        Box::new(RecordingSink::new())
    } else {
        open_sink(&config)?
    };
    let endpoint = sink.endpoint();
    let worker = SyncWorker::spawn(
        sink,
        JsonlConfig::for_path(&config.paths.jsonl_log),
        CHANNEL_CAPACITY,
    )?;

    let model = args
        .view
        .width
        .map_or_else(BoardModel::new, BoardModel::with_width);
    let mut runtime = BoardRuntime::new(model, worker.handle());
    for msg in view_messages(fetch_message(source.as_ref()), &args.view) {
        runtime.dispatch(msg);
    }
    if !runtime.model().is_loaded() {
        let counters = worker.shutdown();
        return Err(CliError::Runtime(format!(
            "shortcuts could not be fetched ({} sync entries written)",
            counters.records
        )));
    }

    runtime.dispatch(BoardMsg::ToggleLock);
    runtime.dispatch(BoardMsg::DragStart);
    runtime.dispatch(BoardMsg::DragEnd(DragResult {
        source: args.from,
        destination: Some(args.to),
    }));
    runtime.dispatch(BoardMsg::ToggleLock);

    let model = runtime.into_model();
    let counters = worker.shutdown();
    let outcome = model.last_drop.unwrap_or(DropOutcome::Ignored);
    let saved = counters.saves_ok == 1;

    match output_mode(cli) {
        OutputMode::Human => {
            match outcome {
                DropOutcome::Applied { id, kind } => println!(
                    "{} shortcut {id} ({})",
                    "Moved".green().bold(),
                    kind.label()
                ),
                DropOutcome::Rejected(reason) => println!(
                    "{} move rejected: {}",
                    "!".yellow().bold(),
                    reason.label()
                ),
                DropOutcome::Ignored => println!("{} nothing to move", "-".dimmed()),
            }
            if args.dry_run {
                println!("  dry run: arrangement not written");
            } else if saved {
                println!("  saved to {endpoint}");
            } else {
                println!("  {} save to {endpoint} failed", "x".red().bold());
            }
            print_board(&model);
        }
        OutputMode::Json => {
            let payload = model.catalog.as_ref().map(Catalog::save_payload);
            write_json_line(&json!({
                "command": "move",
                "from": args.from.to_string(),
                "to": args.to.to_string(),
                "outcome": outcome_json(outcome),
                "dry_run": args.dry_run,
                "saved": saved,
                "endpoint": endpoint,
                "payload": payload,
                "board": board_json(&model),
            }))?;
        }
    }

    if !args.dry_run && !saved {
        return Err(CliError::Runtime(format!("save to {endpoint} failed")));
    }
    Ok(())
}

fn run_watch(cli: &Cli, args: &WatchArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let source = open_watch_source(&config)?;
    let worker = SyncWorker::spawn(
        open_sink(&config)?,
        JsonlConfig::for_path(&config.paths.jsonl_log),
        CHANNEL_CAPACITY,
    )?;
    let (tx, rx) = crossbeam_channel::unbounded();
    let poller = Poller::from_config(source, &config.poll, tx)?;

    let model = args
        .view
        .width
        .map_or_else(BoardModel::new, BoardModel::with_width);
    let mut runtime = BoardRuntime::new(model, worker.handle());
    if let Some(search) = &args.view.search {
        runtime.dispatch(BoardMsg::SetSearch(search.clone()));
    }

    let mode = output_mode(cli);
    let mut fetches = 0_u64;
    while args.count.is_none_or(|limit| fetches < limit) {
        let msg = rx.recv().map_err(|_| DashError::ChannelClosed {
            component: "poller",
        })?;
        fetches += 1;
        let failure = match &msg {
            BoardMsg::FetchFailed { message, .. } => Some(message.clone()),
            _ => None,
        };
        runtime.dispatch(msg);
        runtime.dispatch(BoardMsg::SetPage(args.view.page));
        let model = runtime.model();

        match mode {
            OutputMode::Human => {
                if let Some(message) = &failure {
                    println!("{} fetch {fetches} failed: {message}", "x".red().bold());
                } else {
                    let (healthy, total) = health_summary(model);
                    println!("{} fetch {fetches}: {healthy}/{total} healthy", "●".green());
                    print_board(model);
                }
            }
            OutputMode::Json => {
                let mut line = board_json(model);
                line["command"] = json!("watch");
                line["fetch"] = json!(fetches);
                line["ok"] = json!(failure.is_none());
                if let Some(message) = failure {
                    line["error"] = json!(message);
                }
                write_json_line(&line)?;
            }
        }
    }

    let polls = poller.stop();
    let counters = worker.shutdown();
    if mode == OutputMode::Human {
        println!(
            "Stopped after {polls} fetches ({} activity entries)",
            counters.records
        );
    }
    Ok(())
}

fn health_summary(model: &BoardModel) -> (usize, usize) {
    model.catalog.as_ref().map_or((0, 0), |catalog| {
        let healthy = catalog
            .favorites()
            .iter()
            .chain(catalog.others())
            .filter(|s| s.is_healthy())
            .count();
        (healthy, catalog.len())
    })
}

fn run_payload(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let model = load_board(&config, &ViewArgs::default())?;
    let payload = model
        .catalog
        .as_ref()
        .map(Catalog::save_payload)
        .unwrap_or_default();
    match output_mode(cli) {
        OutputMode::Human => println!("{}", serde_json::to_string_pretty(&payload)?),
        OutputMode::Json => write_json_line(&json!({
            "command": "payload",
            "payload": payload,
        }))?,
    }
    Ok(())
}

fn run_open(cli: &Cli, args: &OpenArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let mut model = load_board(&config, &ViewArgs::default())?;
    let id = resolve_shortcut(&model, &args.shortcut)?;
    let BoardCmd::Launch { url, .. } = update(&mut model, BoardMsg::Activate(id)) else {
        return Err(CliError::User(format!(
            "shortcut {} cannot be launched",
            args.shortcut
        )));
    };
    match output_mode(cli) {
        OutputMode::Human => println!("{url}"),
        OutputMode::Json => write_json_line(&json!({
            "command": "open",
            "id": id,
            "url": url,
        }))?,
    }
    Ok(())
}

/// Match a shortcut by numeric id, then by exact name, then by display label.
fn resolve_shortcut(model: &BoardModel, key: &str) -> Result<ShortcutId, CliError> {
    let all: Vec<&Shortcut> = model
        .catalog
        .as_ref()
        .map(|c| c.favorites().iter().chain(c.others()).collect())
        .unwrap_or_default();
    if let Ok(id) = key.parse::<ShortcutId>()
        && all.iter().any(|s| s.id == id)
    {
        return Ok(id);
    }
    all.iter()
        .find(|s| s.name.eq_ignore_ascii_case(key))
        .or_else(|| all.iter().find(|s| s.display_name().eq_ignore_ascii_case(key)))
        .map(|s| s.id)
        .ok_or_else(|| {
            DashError::UnknownShortcut {
                key: key.to_string(),
            }
            .into()
        })
}

#[cfg(feature = "http")]
fn run_probe(cli: &Cli, args: &ProbeArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    if config.backend.kind != BackendKind::Sqlite {
        return Err(CliError::User(
            "probe records into the local store; set backend.kind = \"sqlite\"".to_string(),
        ));
    }
    let store = ShortcutStore::open(&config.paths.sqlite_db)?;
    store.sync_services(&config.services)?;
    let outcome = probe_store(&store, &config.poll, unix_now(), args.force)?;

    if let ProbeOutcome::Completed {
        results,
        duration_ms,
        ..
    } = &outcome
    {
        let mut writer = JsonlWriter::open(JsonlConfig::for_path(&config.paths.jsonl_log));
        let mut entry = LogEntry::info(EventType::ProbeComplete);
        entry.shortcuts = Some(results.len());
        entry.duration_ms = Some(*duration_ms);
        entry.details = Some(format!(
            "{} healthy",
            results.iter().filter(|r| is_healthy_status(r.status)).count()
        ));
        writer.write_entry(&entry);
    }

    match (output_mode(cli), &outcome) {
        (OutputMode::Human, ProbeOutcome::Skipped { age_secs, .. }) => println!(
            "Skipped: last probe was {age_secs}s ago (minimum {}s, use --force)",
            config.poll.probe_min_interval_secs
        ),
        (
            OutputMode::Human,
            ProbeOutcome::Completed {
                results,
                duration_ms,
                ..
            },
        ) => {
            for result in results {
                let status = if is_healthy_status(result.status) {
                    result.status.to_string().green()
                } else {
                    result.status.to_string().red()
                };
                println!("{status:>5}  {:>5}ms  {}", result.elapsed_ms, result.url);
            }
            println!("Probed {} services in {duration_ms}ms", results.len());
        }
        (
            OutputMode::Json,
            ProbeOutcome::Skipped {
                last_probe,
                age_secs,
            },
        ) => {
            write_json_line(&json!({
                "command": "probe",
                "skipped": true,
                "last_probe": last_probe,
                "age_secs": age_secs,
            }))?;
        }
        (
            OutputMode::Json,
            ProbeOutcome::Completed {
                checked_at,
                results,
                duration_ms,
            },
        ) => {
            let rows: Vec<Value> = results
                .iter()
                .map(|r| json!({"url": r.url, "status": r.status, "elapsed_ms": r.elapsed_ms}))
                .collect();
            write_json_line(&json!({
                "command": "probe",
                "skipped": false,
                "checked_at": checked_at,
                "duration_ms": duration_ms,
                "results": rows,
            }))?;
        }
    }
    Ok(())
}

#[cfg(feature = "http")]
fn is_healthy_status(status: u32) -> bool {
    homedash::board::shortcut::HEALTHY_STATUSES.contains(&status)
}

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();
            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => write_json_line(&json!({
                    "command": "config path",
                    "path": path.to_string_lossy(),
                    "exists": exists,
                }))?,
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = load_config(cli)?;
            match output_mode(cli) {
                OutputMode::Human => {
                    let toml_str = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::Runtime(format!("serialize config: {e}")))?;
                    println!("{toml_str}");
                }
                OutputMode::Json => write_json_line(&json!({
                    "command": "config show",
                    "config": serde_json::to_value(&config)?,
                }))?,
            }
            Ok(())
        }
        Some(ConfigCommand::Validate) => {
            let config = load_config(cli)?;
            let hash = config.stable_hash()?;
            match output_mode(cli) {
                OutputMode::Human => {
                    println!("Configuration is valid.");
                    println!("  Backend: {}", config.backend.kind.label());
                    println!("  Services: {}", config.services.len());
                    println!("  Hash: {hash}");
                }
                OutputMode::Json => write_json_line(&json!({
                    "command": "config validate",
                    "valid": true,
                    "backend": config.backend.kind.label(),
                    "services": config.services.len(),
                    "hash": hash,
                }))?,
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn print_board(model: &BoardModel) {
    let favorites: Vec<String> = model
        .favorites()
        .iter()
        .map(|s| format!("[{}]", tile(s)))
        .collect();
    let free = FAVORITES_CAP.saturating_sub(model.favorites().len());
    println!(
        "{} {}{}",
        "Favorites".bold(),
        favorites.join(" "),
        if free > 0 {
            format!(" ({free} free)").dimmed().to_string()
        } else {
            String::new()
        }
    );
    println!(
        "{} {}/{}  ({} columns, {} per page{})",
        "Page".bold(),
        model.current_page,
        model.total_pages(),
        model.layout.columns,
        model.layout.items_per_page,
        if model.search.is_empty() {
            String::new()
        } else {
            format!(", search {:?}", model.search)
        }
    );
    for (row, shortcuts) in model.page_rows().iter().enumerate() {
        let cells: Vec<String> = shortcuts.iter().map(tile).collect();
        println!("  row-{row}: {}", cells.join("  "));
    }
}

fn tile(shortcut: &Shortcut) -> String {
    let dot = if shortcut.is_healthy() {
        "●".green()
    } else {
        "●".red()
    };
    format!("{dot} {}#{}", shortcut.display_name(), shortcut.id)
}

fn shortcut_json(shortcut: &Shortcut) -> Value {
    json!({
        "id": shortcut.id,
        "name": shortcut.name,
        "label": shortcut.display_name(),
        "status": shortcut.status,
        "healthy": shortcut.is_healthy(),
        "url": shortcut.launch_url(),
    })
}

fn board_json(model: &BoardModel) -> Value {
    let rows: Vec<Vec<Value>> = model
        .page_rows()
        .iter()
        .map(|row| row.iter().map(shortcut_json).collect())
        .collect();
    json!({
        "command": "grid",
        "page": model.current_page,
        "total_pages": model.total_pages(),
        "columns": model.layout.columns,
        "items_per_page": model.layout.items_per_page,
        "search": model.search,
        "favorites": model.favorites().iter().map(shortcut_json).collect::<Vec<_>>(),
        "rows": rows,
    })
}

fn outcome_json(outcome: DropOutcome) -> Value {
    match outcome {
        DropOutcome::Applied { id, kind } => json!({
            "result": "applied",
            "id": id,
            "kind": kind.label(),
        }),
        DropOutcome::Rejected(reason) => json!({
            "result": "rejected",
            "reason": reason.label(),
        }),
        DropOutcome::Ignored => json!({ "result": "ignored" }),
    }
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("HOMEDASH_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}
