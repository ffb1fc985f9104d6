use pickem::config::LoggingConfig;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_DIRECTIVES: &str = "info,pickem=debug";

type FilteredRegistry = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

fn env_filter(settings: &LoggingConfig) -> EnvFilter {
    // RUST_LOG wins over the configured level
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if settings.level.trim().is_empty() {
            EnvFilter::new(DEFAULT_DIRECTIVES)
        } else {
            EnvFilter::new(settings.level.trim())
        }
    })
}

/// Console output on stderr; stdout carries command output
fn console_layer(json: bool) -> BoxedLayer {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    if json {
        layer.json().boxed()
    } else {
        layer
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed()
    }
}

/// Daily rolling file output under `log_dir`.
///
/// `tracing_appender::rolling::daily` panics if it can't create the initial
/// log file, so writability is checked first.
fn file_layer(log_dir: &str) -> Option<BoxedLayer> {
    if std::fs::create_dir_all(log_dir).is_err() {
        eprintln!(
            "Warning: Could not create log directory {}, file logging disabled",
            log_dir
        );
        return None;
    }
    let test_path = std::path::Path::new(log_dir).join(".pickem_write_test");
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&test_path)
    {
        Ok(_) => {
            let _ = std::fs::remove_file(&test_path);

            let file_appender = tracing_appender::rolling::daily(log_dir, "pickem.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // The guard must outlive the process for buffered lines to flush
            Box::leak(Box::new(guard));

            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_target(true)
                    .boxed(),
            )
        }
        Err(e) => {
            eprintln!(
                "Warning: Could not write to log directory {} ({}), file logging disabled",
                log_dir, e
            );
            None
        }
    }
}

pub fn init_logging(settings: &LoggingConfig) {
    // File logging only when PICKEM_LOG_DIR is set
    let log_dir = std::env::var("PICKEM_LOG_DIR").ok();
    let file = log_dir.as_deref().and_then(file_layer);
    let file_logging_enabled = file.is_some();

    let mut layers = vec![console_layer(settings.json)];
    layers.extend(file);

    tracing_subscriber::registry()
        .with(env_filter(settings))
        .with(layers)
        .init();

    if let (true, Some(dir)) = (file_logging_enabled, log_dir) {
        eprintln!("Logging to: {}/pickem.log", dir);
    }
}

pub fn init_logging_simple() {
    // Minimal logging for quick commands
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .try_init();
}
