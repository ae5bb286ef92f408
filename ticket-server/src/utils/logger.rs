//! Logging Infrastructure
//!
//! Console output (plain or JSON) plus an optional daily-rolling file.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Initialize the logger with console output only
pub fn init_logger(log_level: &str) -> anyhow::Result<()> {
    init_logger_with_file(log_level, false, None)
}

/// Initialize the logger
///
/// `RUST_LOG` overrides `log_level` when set. With `log_dir`, JSON lines are
/// also written to `<log_dir>/ticket-server.log.<date>`.
pub fn init_logger_with_file(
    log_level: &str,
    json: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{log_level},ticket_server={log_level},tower_http=info,sqlx=warn"
        ))
    });

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if json {
        layers.push(fmt::layer().json().with_target(true).boxed());
    } else {
        layers.push(fmt::layer().with_target(true).boxed());
    }

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)?;
        let file_appender = tracing_appender::rolling::daily(dir, "ticket-server.log");
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(file_appender)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    Ok(())
}
