use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use super::TracingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber: console output on stderr, plain or JSON,
/// plus an optional log file. Keep the returned guard alive until exit or
/// buffered file lines are lost.
pub fn init_tracing(config: &TracingConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);
    layers.push(if config.json_format {
        console.json().boxed()
    } else {
        console.boxed()
    });

    let mut guard = None;
    let mut file_error = None;
    if let Some(path) = &config.log_file {
        match file_writer(path) {
            Ok((writer, file_guard)) => {
                layers.push(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer)
                        .with_target(true)
                        .boxed(),
                );
                guard = Some(file_guard);
            }
            Err(e) => file_error = Some(e),
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    if let Some(e) = file_error {
        tracing::warn!(error = %e, "Log file disabled");
    }

    tracing::info!(
        environment = %config.environment,
        json_format = config.json_format,
        log_file = ?config.log_file,
        "Tracing initialized"
    );

    guard
}

fn file_writer(
    path: &std::path::Path,
) -> std::io::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => std::path::Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "log file path has no file name")
    })?;

    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}
