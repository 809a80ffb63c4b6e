//! Structured logging setup over `tracing-subscriber`.
//!
//! `RUST_LOG` takes precedence over the configured filters. Initialization is
//! idempotent: the first call wins and later calls are ignored.

use std::io;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleFilter {
    pub module: String,
    pub level: LogLevel,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub default_level: LogLevel,
    pub show_targets: bool,
    pub module_filters: Vec<ModuleFilter>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            show_targets: true,
            module_filters: vec![ModuleFilter {
                module: "janitor_core::sim".to_string(),
                level: LogLevel::Warn,
            }],
        }
    }
}

impl LoggingSettings {
    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for filter in &self.module_filters {
            parts.push(format!("{}={}", filter.module, filter.level.as_str()));
        }
        parts.join(",")
    }
}

static TRACING_INIT: Once = Once::new();

pub fn init_tracing(settings: &LoggingSettings) {
    let filter_str = settings.to_env_filter_string();
    let show_targets = settings.show_targets;
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(show_targets)
            .with_writer(io::stderr)
            .compact();

        // Another subscriber may already be installed by an embedding host.
        let _ = subscriber.try_init();
    });
}
