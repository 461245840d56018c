//! Logging setup for Casement.
//!
//! Installs one global `tracing` subscriber from [`LoggingConfig`]. Routing
//! emits a `route` span per notification; enable `logging.span_events.close`
//! to get one line per routed notification with its elapsed time.
//!
//! ```rust,ignore
//! use casement_runtime::{config::load_config, logging};
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging)?;
//! ```
//!
//! `RUST_LOG` replaces `logging.level` when set; `logging.filters` directives
//! are applied on top of either.

use std::path::Path;

use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{Directive, ParseError};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::{
    ConfigError, ConfigResult, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig,
    SpanEventConfig,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber described by `config`.
///
/// Fails if file output is configured and the log file cannot be opened.
/// An already installed global subscriber is kept.
pub fn init_from_config(config: &LoggingConfig) -> ConfigResult<()> {
    let writer = make_writer(config)?;
    let installed = tracing_subscriber::registry()
        .with(fmt_layer(config, writer))
        .with(env_filter(config))
        .try_init();

    if installed.is_err() {
        debug!("Global subscriber already installed, keeping it");
    }
    Ok(())
}

/// Parses a `target=level` filter directive.
pub(crate) fn filter_directive(target: &str, level: LogLevel) -> Result<Directive, ParseError> {
    format!("{target}={}", level.as_str()).parse()
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = LevelFilter::from_level(config.level.to_tracing_level());
        EnvFilter::default().add_directive(level.into())
    });

    // Targets are checked by validate_config.
    for (target, level) in &config.filters {
        if let Ok(directive) = filter_directive(target, *level) {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

fn span_events(config: &SpanEventConfig) -> FmtSpan {
    [
        (config.new, FmtSpan::NEW),
        (config.enter, FmtSpan::ENTER),
        (config.exit, FmtSpan::EXIT),
        (config.close, FmtSpan::CLOSE),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .fold(FmtSpan::NONE, |acc, (_, span)| acc | span)
}

fn fmt_layer(config: &LoggingConfig, writer: BoxMakeWriter) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(writer)
        .with_span_events(span_events(&config.span_events))
        .with_thread_ids(config.thread_ids)
        .with_file(config.file_location)
        .with_line_number(config.file_location);

    match config.format {
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Full => layer.boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
        #[cfg(feature = "json-log")]
        LogFormat::Json => layer.json().boxed(),
    }
}

fn make_writer(config: &LoggingConfig) -> ConfigResult<BoxMakeWriter> {
    Ok(match config.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::File => {
            let path = config
                .file_path
                .as_deref()
                .ok_or_else(|| ConfigError::missing_field("logging.file_path"))?;
            BoxMakeWriter::new(file_appender(path, config.rotation)?)
        }
    })
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
        }
    }
}

/// Opens a rolling appender for `path`. Rotated files get a date suffix.
fn file_appender(path: &Path, rotation: LogRotation) -> ConfigResult<RollingFileAppender> {
    let name = path.file_name().ok_or_else(|| {
        ConfigError::validation(format!("Log file path has no file name: {}", path.display()))
    })?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    RollingFileAppender::builder()
        .rotation(rotation.into())
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .map_err(|e| {
            ConfigError::validation(format!("Cannot open log file {}: {e}", path.display()))
        })
}
