pub mod agent_core;
pub mod cli;
pub mod commands;
pub mod config;
pub mod documents;
pub mod inference;

use anyhow::Context;
use clap::Parser;

use agent_core::{CredentialDatabase, Orchestrator};
use commands::AppState;
use config::AppConfig;

/// Return the platform-standard data directory for the assistant.
///
/// - macOS: `~/Library/Application Support/ethics-assistant/`
/// - Windows: `{FOLDERID_RoamingAppData}\ethics-assistant\`
/// - Linux: `$XDG_DATA_HOME/ethics-assistant/` (fallback `~/.local/share/...`)
///
/// Falls back to `~/.ethics-assistant/` only if none of the above can be resolved.
pub(crate) fn data_dir() -> std::path::PathBuf {
    if let Some(dir) = dirs::data_dir() {
        return dir.join("ethics-assistant");
    }
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".ethics-assistant")
}

/// Initialize the tracing subscriber, writing structured logs to the data directory.
///
/// Logs never go to the terminal the user is chatting in. On each startup:
/// 1. Rotates existing logs (assistant.log → assistant.log.1 → .2 → .3, keeps last 3).
/// 2. Opens a fresh assistant.log with a line-flushing writer.
/// 3. Logs a startup banner with the data directory path.
fn init_tracing() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = data_dir();
    let _ = std::fs::create_dir_all(&log_dir);

    let log_path = log_dir.join("assistant.log");
    rotate_log_file(&log_path, 3);

    let log_file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("warning: logging disabled, cannot open {}: {e}", log_path.display());
            return;
        }
    };

    let flushing_writer = FlushingWriter::new(log_file);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ethics_assistant=info,warn"));

    let _ = fmt::fmt()
        .with_env_filter(filter)
        .with_writer(flushing_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .try_init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %log_dir.display(),
        log_file = %log_path.display(),
        pid = std::process::id(),
        "=== Ethics Assistant starting ==="
    );
}

/// Rotate log files: `assistant.log` → `assistant.log.1` → `.2` → … → `.{keep}`.
///
/// Oldest file beyond `keep` is deleted. Missing files in the chain are skipped.
fn rotate_log_file(base_path: &std::path::Path, keep: u32) {
    let oldest = format!("{}.{keep}", base_path.display());
    let _ = std::fs::remove_file(&oldest);

    for i in (1..keep).rev() {
        let from = format!("{}.{i}", base_path.display());
        let to = format!("{}.{}", base_path.display(), i + 1);
        let _ = std::fs::rename(&from, &to);
    }

    if base_path.exists() {
        let to = format!("{}.1", base_path.display());
        let _ = std::fs::rename(base_path, &to);
    }
}

/// A writer that wraps `std::fs::File` and flushes after every write.
///
/// Each log line is on disk immediately, so nothing is lost if the process
/// is killed mid-request.
#[derive(Clone)]
struct FlushingWriter {
    file: std::sync::Arc<std::sync::Mutex<std::fs::File>>,
}

impl FlushingWriter {
    fn new(file: std::fs::File) -> Self {
        Self {
            file: std::sync::Arc::new(std::sync::Mutex::new(file)),
        }
    }
}

impl std::io::Write for FlushingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut f = self
            .file
            .lock()
            .map_err(|e| std::io::Error::other(format!("lock poisoned: {e}")))?;
        let n = std::io::Write::write(&mut *f, buf)?;
        std::io::Write::flush(&mut *f)?;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut f = self
            .file
            .lock()
            .map_err(|e| std::io::Error::other(format!("lock poisoned: {e}")))?;
        std::io::Write::flush(&mut *f)
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for FlushingWriter {
    type Writer = FlushingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Resolve the path for the credential SQLite database.
///
/// Uses `database_path` from config when set, otherwise `api_data.db` in the
/// data directory. The parent directory is created if needed.
fn resolve_db_path(config: &AppConfig) -> String {
    let path = match &config.database_path {
        Some(p) => std::path::PathBuf::from(config::expand_tilde(p)),
        None => data_dir().join("api_data.db"),
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            let _ = std::fs::create_dir_all(parent);
        }
    }
    path.to_string_lossy().into_owned()
}

/// Run the assistant.
///
/// Failing to open the credential database is fatal.
pub fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize tracing FIRST, before any tracing::info!() calls
    init_tracing();

    let config = config::resolve_config(cli.config.as_deref())?;
    let db_path = resolve_db_path(&config);

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(async move {
        let db = CredentialDatabase::open(&db_path)
            .with_context(|| format!("failed to open credential database at {db_path}"))?;
        tracing::info!(db_path = %db_path, "credential database initialized");

        let orchestrator = Orchestrator::from_config(&config)?;
        let state = AppState::new(db, orchestrator);

        cli::execute(cli.command.unwrap_or(cli::Command::Chat), &state).await
    })
}
