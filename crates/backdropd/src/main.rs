// # backdropd - image change watcher daemon
//
// The daemon is a thin integration layer:
// 1. Reading configuration from environment variables
// 2. Installing logging (stdout + log file)
// 3. Building the source, notifier and state store
// 4. Running the watch engine until SIGINT/SIGTERM
//
// All watch logic lives in backdrop-core.
//
// ## Configuration
//
// ### Source
// - `BACKDROP_SOURCE_URL`: Endpoint publishing the backgrounds (default: Fortnite dynamic backgrounds)
//
// ### Notifier
// - `BACKDROP_WEBHOOK_URL`: Webhook receiving change notifications (required)
// - `BACKDROP_EMBED_TITLE`: Embed title
// - `BACKDROP_EMBED_DESCRIPTION`: Embed description
//
// ### State Store
// - `BACKDROP_STATE_STORE`: Type of state store (file, memory)
// - `BACKDROP_STATE_PATH`: Path to state file (default: image_data.json)
//
// ### Engine
// - `BACKDROP_POLL_INTERVAL_SECS`: Seconds between checks (default: 60)
//
// ### Logging
// - `BACKDROP_LOG_LEVEL`: trace, debug, info, warn, error (default: debug)
// - `BACKDROP_LOG_FILE`: Log file, appended to (default: webhook_log.txt)
//
// ## Example
//
// ```bash
// export BACKDROP_WEBHOOK_URL=https://discord.com/api/webhooks/<id>/<token>
// export BACKDROP_STATE_PATH=/var/lib/backdrop/image_data.json
//
// backdropd
// ```

use anyhow::{Context, Result};
use backdrop_core::config::{
    BackdropConfig, DEFAULT_EMBED_DESCRIPTION, DEFAULT_EMBED_TITLE, DEFAULT_SOURCE_URL,
    DEFAULT_STATE_PATH, EngineConfig, NotifierConfig, SourceConfig, StateStoreConfig,
};
use backdrop_core::{FileStateStore, FixedInterval, MemoryStateStore, StateStore, WatchEngine};
use backdrop_notify_discord::DiscordNotifier;
use backdrop_source_http::HttpImageSource;
use std::env;
use std::fs::OpenOptions;
use std::future::Future;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{Level, error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Webhook values that are clearly copied from documentation
const PLACEHOLDER_WEBHOOKS: &[&str] = &["your_webhook_url", "replace_me", "<token>"];

/// Application configuration
///
/// No `Debug`: the webhook URL carries a secret token.
struct Config {
    source_url: String,
    webhook_url: String,
    embed_title: String,
    embed_description: String,
    state_store_type: String,
    state_path: String,
    poll_interval_secs: u64,
    log_level: String,
    log_file: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let poll_interval_secs = match lookup("BACKDROP_POLL_INTERVAL_SECS") {
            Some(raw) => raw.trim().parse().with_context(|| {
                format!("BACKDROP_POLL_INTERVAL_SECS must be a number of seconds. Got: {}", raw)
            })?,
            None => EngineConfig::default().poll_interval_secs,
        };

        Ok(Self {
            source_url: get("BACKDROP_SOURCE_URL", DEFAULT_SOURCE_URL),
            webhook_url: lookup("BACKDROP_WEBHOOK_URL").context(
                "BACKDROP_WEBHOOK_URL is required. \
                Set it via: export BACKDROP_WEBHOOK_URL=https://discord.com/api/webhooks/<id>/<token>",
            )?,
            embed_title: get("BACKDROP_EMBED_TITLE", DEFAULT_EMBED_TITLE),
            embed_description: get("BACKDROP_EMBED_DESCRIPTION", DEFAULT_EMBED_DESCRIPTION),
            state_store_type: get("BACKDROP_STATE_STORE", "file"),
            state_path: get("BACKDROP_STATE_PATH", DEFAULT_STATE_PATH),
            poll_interval_secs,
            log_level: get("BACKDROP_LOG_LEVEL", "debug"),
            log_file: get("BACKDROP_LOG_FILE", "webhook_log.txt"),
        })
    }

    /// Validate the daemon-level settings the library does not know about
    ///
    /// Returns the parsed log level.
    fn validate(&self) -> Result<Level> {
        let webhook_lower = self.webhook_url.to_lowercase();
        if PLACEHOLDER_WEBHOOKS
            .iter()
            .any(|placeholder| webhook_lower.contains(placeholder))
        {
            anyhow::bail!(
                "BACKDROP_WEBHOOK_URL appears to be a placeholder. \
                Use the webhook URL from your channel's integration settings."
            );
        }

        match self.state_store_type.as_str() {
            "file" | "memory" => {}
            _ => anyhow::bail!(
                "BACKDROP_STATE_STORE '{}' is not supported. \
                Supported types: file, memory",
                self.state_store_type
            ),
        }

        if !(1..=86_400).contains(&self.poll_interval_secs) {
            anyhow::bail!(
                "BACKDROP_POLL_INTERVAL_SECS must be between 1 and 86400 seconds. Got: {}",
                self.poll_interval_secs
            );
        }

        if self.log_file.is_empty() {
            anyhow::bail!("BACKDROP_LOG_FILE cannot be empty");
        }

        let log_level = parse_log_level(&self.log_level)?;

        self.to_backdrop_config()
            .validate()
            .context("Invalid watcher configuration")?;

        Ok(log_level)
    }

    /// Library configuration derived from the environment
    fn to_backdrop_config(&self) -> BackdropConfig {
        let state_store = match self.state_store_type.as_str() {
            "memory" => StateStoreConfig::Memory,
            _ => StateStoreConfig::File {
                path: self.state_path.clone(),
            },
        };

        BackdropConfig {
            source: SourceConfig {
                url: self.source_url.clone(),
            },
            notifier: NotifierConfig::new(self.webhook_url.clone())
                .with_title(self.embed_title.clone())
                .with_description(self.embed_description.clone()),
            state_store,
            engine: EngineConfig {
                poll_interval_secs: self.poll_interval_secs,
            },
        }
    }
}

fn parse_log_level(raw: &str) -> Result<Level> {
    match raw.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "BACKDROP_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            raw
        ),
    }
}

/// Local wall-clock timestamps, e.g. `2025-01-09 12:00:00`
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Install a subscriber writing every event to stdout and to the log file
fn init_logging(level: Level, log_file: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file))?;

    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(tracing_subscriber::fmt::layer().with_timer(LocalTimer))
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(LocalTimer)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        );

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    Ok(())
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    let log_level = match config.validate() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration validation error: {:#}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    if let Err(e) = init_logging(log_level, &config.log_file) {
        eprintln!("Logging setup error: {:#}", e);
        return DaemonExitCode::ConfigError.into();
    }

    info!("Starting backdropd... Monitoring {}", config.source_url);

    // One cycle at a time: a current-thread runtime is all the loop needs
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config.to_backdrop_config()).await {
            error!("Daemon error: {:#}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Build the components and run the engine until a shutdown signal
async fn run_daemon(config: BackdropConfig) -> Result<()> {
    let shutdown = shutdown_signal()?;

    let source = HttpImageSource::from_config(&config.source)?;
    let notifier = DiscordNotifier::from_config(&config.notifier)?;

    let state_store: Box<dyn StateStore> = match &config.state_store {
        StateStoreConfig::File { path } => {
            info!("State store: file ({})", path);
            Box::new(FileStateStore::new(path).await?)
        }
        StateStoreConfig::Memory => {
            info!("State store: memory (state is lost on restart)");
            Box::new(MemoryStateStore::new())
        }
    };

    let engine = WatchEngine::new(
        Box::new(source),
        Box::new(notifier),
        state_store,
        Box::new(FixedInterval::new(config.engine.poll_interval())),
    );

    engine.run_until(shutdown).await;

    info!("Shutting down daemon");
    Ok(())
}

/// Install SIGTERM and SIGINT handlers; the returned future resolves on either
///
/// The handlers are live as soon as this returns, before the future is first
/// polled.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;

    Ok(async move {
        let received = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        info!("Received shutdown signal: {}", received);
    })
}

/// Install a Ctrl-C handler; the returned future resolves on Ctrl-C
#[cfg(windows)]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    let mut ctrl_c =
        tokio::signal::windows::ctrl_c().context("Failed to install Ctrl-C handler")?;

    Ok(async move {
        ctrl_c.recv().await;
        info!("Received shutdown signal: Ctrl-C");
    })
}
