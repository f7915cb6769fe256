//! Tracing subscriber setup used by the application.
//!
//! `RUST_LOG` filters (default `info`), `LOG_FORMAT=json` switches to JSON lines and
//! `LOG_DIR` adds a daily rolling file next to stdout.

use std::{env, sync::OnceLock};

use tracing_appender::{
    non_blocking,
    non_blocking::NonBlocking,
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        fmt,
        time::ChronoLocal,
        writer::{BoxMakeWriter, MakeWriterExt},
    },
};

/// Guard to ensure buffered logs are flushed on shutdown.
static LOG_GUARD: OnceLock<non_blocking::WorkerGuard> = OnceLock::new();

pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let mut to_file = false;
    let writer = match env::var("LOG_DIR") {
        Ok(dir) => match init_file_writer(&dir) {
            Ok(file) => {
                to_file = true;
                let stdout = std::io::stdout.with_max_level(tracing::Level::INFO);
                BoxMakeWriter::new(stdout.and(file))
            }
            Err(e) => {
                eprintln!("cannot log to {dir}: {e}, logging to stdout only");
                BoxMakeWriter::new(std::io::stdout)
            }
        },
        Err(_) => BoxMakeWriter::new(std::io::stdout),
    };

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(false)
        .with_level(true)
        .with_writer(writer);

    if json {
        builder.json().init();
    } else {
        builder.with_ansi(!to_file).init();
    }

    tracing::info!(json, to_file, "logger initialized");
}

fn init_file_writer(dir: &str) -> Result<NonBlocking, InitError> {
    let max_files = env::var("LOG_MAX_FILES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok());

    let mut file_builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("rankwatch.log");

    if let Some(n) = max_files {
        file_builder = file_builder.max_log_files(n);
    }

    let file_appender = file_builder.build(dir)?;
    let (file_writer, guard) = non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    Ok(file_writer)
}
