use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use settings::LoggingSettings;
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const FALLBACK_DIRECTIVE: &str = "info";

/// Parse a filter directive such as `debug` or `flow=debug,info`; `None` if it is blank or
/// malformed.
pub fn env_filter(directive: &str) -> Option<EnvFilter> {
    let directive = directive.trim();
    if directive.is_empty() {
        return None;
    }
    EnvFilter::try_new(directive).ok()
}

/// Install the global subscriber: console always, plus a non-blocking file writer when
/// `settings.file` is set.
///
/// The returned guard flushes the file writer on drop and must live as long as the
/// application. A subscriber installed earlier (e.g. by a test harness) is kept.
pub fn init_logging(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let parsed = env_filter(&settings.level);
    let malformed = parsed.is_none();
    let filter = parsed.unwrap_or_else(|| EnvFilter::new(FALLBACK_DIRECTIVE));

    let (file_layer, guard) = match settings.file.as_deref() {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("log file `{file}` has no file name"))?;
            fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::Layer::default()
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = fmt::Layer::default().with_target(false);

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
    {
        debug!(%err, "global subscriber already installed");
    }
    if malformed {
        warn!(level = %settings.level, "invalid log filter, using {FALLBACK_DIRECTIVE}");
    }
    Ok(guard)
}
