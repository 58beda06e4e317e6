//! Structured logging for the ticknet simulator
//!
//! Builds a `tracing` subscriber from a [`LogConfig`]: human-readable or
//! JSONL console output, plus optional JSONL file output through
//! `tracing-appender`.
//!
//! # Quick Start
//!
//! ```ignore
//! use ticknet_logging::{LogConfig, SubscriberBuilder};
//!
//! // Pretty console output at info level
//! let _guard = SubscriberBuilder::new().init()?;
//!
//! // Verbose output while working on a protocol
//! let _guard = SubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init()?;
//! ```
//!
//! The engine logs every tick inside a `tick` span and every node step
//! inside a `node` span, so JSONL output can be filtered by simulated time
//! and node without any extra context plumbing.

pub mod config;

pub use config::{ConsoleConfig, FileConfig, JsonlConfig, LogConfig, RotationStrategy};

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// A type-erased formatting layer
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// The subscriber assembled by [`SubscriberBuilder::build`]
pub type TicknetSubscriber = Layered<EnvFilter, Layered<Vec<BoxedLayer>, Registry>>;

/// Errors raised while setting up logging
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Failed to open log file: {0}")]
    File(#[from] InitError),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Builder for configuring and initializing the ticknet logging subscriber
pub struct SubscriberBuilder {
    config: LogConfig,
    test_writer: bool,
}

impl SubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
            test_writer: false,
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

    /// Switch console output between pretty and JSONL
    pub fn with_pretty_console(mut self, pretty: bool) -> Self {
        self.config.console.pretty = pretty;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    /// Route console output through the test harness capture
    pub fn with_test_writer(mut self) -> Self {
        self.test_writer = true;
        self
    }

    /// Assemble the subscriber without installing it
    ///
    /// The returned guard, if any, must be kept alive for as long as file
    /// output should be flushed.
    pub fn build(self) -> Result<(TicknetSubscriber, Option<WorkerGuard>), LoggingError> {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&self.config.default_level).map_err(|e| {
                LoggingError::InvalidFilter {
                    directive: self.config.default_level.clone(),
                    reason: e.to_string(),
                }
            })?,
        };

        let jsonl = &self.config.jsonl;
        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        if self.config.console.enabled {
            let console = &self.config.console;
            let layer = match (console.pretty, self.test_writer) {
                (true, true) => tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_test_writer()
                    .boxed(),
                (true, false) => tracing_subscriber::fmt::layer()
                    .with_ansi(console.ansi)
                    .with_target(true)
                    .boxed(),
                (false, true) => tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(jsonl.include_spans)
                    .flatten_event(jsonl.flatten_events)
                    .with_file(jsonl.include_location)
                    .with_line_number(jsonl.include_location)
                    .with_test_writer()
                    .boxed(),
                (false, false) => tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(jsonl.include_spans)
                    .flatten_event(jsonl.flatten_events)
                    .with_file(jsonl.include_location)
                    .with_line_number(jsonl.include_location)
                    .boxed(),
            };
            layers.push(layer);
        }

        if let Some(file_config) = &self.config.file {
            let (writer, file_guard) = file_writer(file_config)?;
            guard = Some(file_guard);
            layers.push(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_current_span(true)
                    .with_span_list(jsonl.include_spans)
                    .flatten_event(jsonl.flatten_events)
                    .with_file(jsonl.include_location)
                    .with_line_number(jsonl.include_location)
                    .with_writer(writer)
                    .boxed(),
            );
        }

        let subscriber = Registry::default().with(layers).with(env_filter);
        Ok((subscriber, guard))
    }

    /// Initialize the subscriber globally
    ///
    /// Fails if a global subscriber has already been set.
    pub fn init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let (subscriber, guard) = self.build()?;
        subscriber.try_init()?;
        Ok(guard)
    }
}

impl Default for SubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn file_writer(config: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    let rotation = match config.rotation {
        RotationStrategy::Daily => Rotation::DAILY,
        RotationStrategy::Hourly => Rotation::HOURLY,
        RotationStrategy::Never => Rotation::NEVER,
    };
    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(&config.prefix)
        .filename_suffix("log")
        .build(&config.directory)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Initialize logging for development (verbose, pretty console output)
pub fn init_development() -> Result<Option<WorkerGuard>, LoggingError> {
    SubscriberBuilder::new()
        .with_config(LogConfig::development())
        .init()
}

/// Initialize logging for tests
///
/// Safe to call from every test: only the first call installs a subscriber.
pub fn init_testing() {
    let _ = SubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .with_test_writer()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_creation() {
        let builder = SubscriberBuilder::new();
        assert_eq!(builder.config.default_level, "info");
        assert!(!builder.test_writer);
    }

    #[test]
    fn test_builder_with_config() {
        let builder = SubscriberBuilder::new().with_config(LogConfig::development());
        assert_eq!(builder.config.default_level, "debug");
    }

    #[test]
    fn test_builder_setters() {
        let builder = SubscriberBuilder::new()
            .with_level("trace")
            .with_console(false)
            .with_pretty_console(false);
        assert_eq!(builder.config.default_level, "trace");
        assert!(!builder.config.console.enabled);
        assert!(!builder.config.console.pretty);
    }

    #[test]
    fn test_init_testing_is_idempotent() {
        init_testing();
        init_testing();
    }

    #[test]
    fn test_file_output_is_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let (subscriber, guard) = SubscriberBuilder::new()
            .with_level("info")
            .with_console(false)
            .with_file_output(FileConfig {
                directory: dir.path().to_path_buf(),
                prefix: "run".to_string(),
                rotation: RotationStrategy::Never,
            })
            .build()
            .unwrap();
        assert!(guard.is_some());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(seed = 42u64, "run started");
        });
        drop(guard);

        let contents = std::fs::read_to_string(dir.path().join("run.log")).unwrap();
        let line = contents.lines().next().unwrap();
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["message"], "run started");
        assert_eq!(value["seed"], 42);
    }
}
