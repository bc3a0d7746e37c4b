//! Structured logging setup for sitelog
//!
//! # Features
//!
//! - **JSONL Output**: Structured JSON lines format for log aggregation (default)
//! - **Pretty Output**: Human-readable console output for development
//! - **File Rotation**: Daily/hourly log rotation via tracing-appender
//! - **Target Overrides**: Per-crate levels on top of `RUST_LOG`
//!
//! # Quick Start
//!
//! ```ignore
//! use sitelog_logging::{LogConfig, SitelogSubscriberBuilder};
//!
//! // JSONL to console
//! let _guard = SitelogSubscriberBuilder::new().init()?;
//!
//! // Development mode with pretty human-readable output
//! let _guard = SitelogSubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init()?;
//! ```

pub mod config;

pub use config::{ConsoleConfig, FileConfig, JsonlConfig, LogConfig, RotationStrategy};

use thiserror::Error;
use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::{Format, Json, JsonFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid filter directive: {0}")]
    InvalidFilter(String),

    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    #[error("Failed to open log file: {0}")]
    File(String),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Builder for configuring and initializing the sitelog logging subscriber
///
/// By default, console output uses JSONL format. Use `LogConfig::development()`
/// for human-readable pretty output during development.
pub struct SitelogSubscriberBuilder {
    config: LogConfig,
}

impl SitelogSubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    /// Get the configuration that will be installed
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Initialize the subscriber globally
    ///
    /// Returns a guard that must be kept alive for the duration of the
    /// program when file output is enabled, so buffered lines get flushed.
    pub fn init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(self.config.directives())
                .map_err(|e| LoggingError::InvalidFilter(e.to_string()))?,
        };

        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        if self.config.console.enabled {
            let level = parse_level(self.config.console.level.as_deref())?;
            if self.config.console.pretty {
                let layer = fmt::layer()
                    .with_ansi(self.config.console.ansi)
                    .with_target(true);
                push_layer(&mut layers, layer, level);
            } else {
                push_layer(&mut layers, json_layer(&self.config.jsonl), level);
            }
        }

        if let Some(file_config) = &self.config.file {
            let appender = file_appender(file_config)?;
            let (non_blocking, file_guard) = tracing_appender::non_blocking(appender);
            guard = Some(file_guard);

            let layer = json_layer(&self.config.jsonl).with_writer(non_blocking);
            push_layer(&mut layers, layer, None);
        }

        Registry::default()
            .with(layers)
            .with(env_filter)
            .try_init()
            .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

        Ok(guard)
    }
}

impl Default for SitelogSubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_level(level: Option<&str>) -> Result<Option<LevelFilter>, LoggingError> {
    level
        .map(|l| {
            l.parse::<LevelFilter>()
                .map_err(|_| LoggingError::InvalidLevel(l.to_string()))
        })
        .transpose()
}

fn push_layer<L>(layers: &mut Vec<BoxedLayer>, layer: L, level: Option<LevelFilter>)
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    match level {
        Some(level) => layers.push(layer.with_filter(level).boxed()),
        None => layers.push(layer.boxed()),
    }
}

fn json_layer<S>(config: &JsonlConfig) -> fmt::Layer<S, JsonFields, Format<Json>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .json()
        .with_current_span(config.include_current_span)
        .with_span_list(config.include_spans)
        .flatten_event(config.flatten_events)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_thread_ids(config.include_thread_info)
        .with_thread_names(config.include_thread_info)
}

fn file_appender(config: &FileConfig) -> Result<RollingFileAppender, LoggingError> {
    let rotation = match config.rotation {
        RotationStrategy::Daily => Rotation::DAILY,
        RotationStrategy::Hourly => Rotation::HOURLY,
        RotationStrategy::Never => Rotation::NEVER,
    };

    let mut builder = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(config.prefix.as_str())
        .filename_suffix("log");
    if let Some(max_files) = config.max_files {
        builder = builder.max_log_files(max_files);
    }

    builder
        .build(&config.directory)
        .map_err(|e| LoggingError::File(e.to_string()))
}

/// Initialize logging with default settings (JSONL to console)
pub fn init_default() -> Result<(), LoggingError> {
    SitelogSubscriberBuilder::new().init().map(|_| ())
}

/// Initialize logging for development (verbose, pretty console output)
pub fn init_development() -> Result<(), LoggingError> {
    SitelogSubscriberBuilder::new()
        .with_config(LogConfig::development())
        .init()
        .map(|_| ())
}

/// Initialize logging for testing (minimal output, ignores double init)
pub fn init_testing() {
    let _ = SitelogSubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .init();
}
