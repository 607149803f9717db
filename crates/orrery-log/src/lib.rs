//! Structured logging for the orrery.
//!
//! Installs a `tracing` subscriber with console output and, in debug builds, a
//! JSON log file for post-mortem analysis. Records emitted by the library
//! crates through the `log` facade are forwarded into the same subscriber.

use std::fs::File;
use std::path::{Path, PathBuf};

use orrery_config::Config;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE: &str = "orrery.log";

const DEFAULT_FILTER: &str = "info";

/// Filter directive from the config's `debug.log_level`, or `info`.
pub fn filter_directive(config: Option<&Config>) -> String {
    config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Initialize the global subscriber.
///
/// - Console output with targets, levels and time since start
/// - `RUST_LOG` takes precedence over the configured level
/// - In debug builds with a `log_dir`, a JSON copy of every event in
///   [`LOG_FILE`]
///
/// Returns the log file path when one was opened.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
///
/// # Examples
///
/// ```no_run
/// use orrery_config::Config;
/// use orrery_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config)).unwrap();
/// ```
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Result<Option<PathBuf>, TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && let Some((file, path)) = open_log_file(log_dir)
    {
        subscriber.with(file_layer(file)).try_init()?;
        return Ok(Some(path));
    }

    subscriber.try_init()?;
    Ok(None)
}

/// Filter used when neither `RUST_LOG` nor a config is available.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

fn open_log_file(log_dir: &Path) -> Option<(File, PathBuf)> {
    std::fs::create_dir_all(log_dir).ok()?;
    let path = log_dir.join(LOG_FILE);
    let file = File::create(&path).ok()?;
    Some((file, path))
}

/// JSON lines, no ANSI codes.
fn file_layer<S>(file: File) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime())
        .json()
        .boxed()
}
