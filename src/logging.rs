//! Log level pass-through for hosts that want the controller's diagnostics.
//!
//! The crate itself only emits `tracing` events. Hosts either install their
//! own subscriber or call [`init_logging`] once with the configured level:
//! in the browser (`hydrate`) events reach the console through `log`, on
//! native hosts a `tracing_subscriber` formatter is installed.

#[cfg(test)]
#[path = "logging_test.rs"]
mod logging_test;

use serde::{Deserialize, Deserializer};
use tracing::level_filters::LevelFilter;

use crate::error::AuthError;

/// Verbosity levels, numbered like the identity client library's (`0` = none .. `4` = debug).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    #[default]
    None,
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// Parse a level from its name (`"warn"`) or number (`"2"`).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Config` for anything else.
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" | "off" | "0" => Ok(Self::None),
            "error" | "1" => Ok(Self::Error),
            "warn" | "warning" | "2" => Ok(Self::Warn),
            "info" | "3" => Ok(Self::Info),
            "debug" | "4" => Ok(Self::Debug),
            other => Err(AuthError::Config(format!("unknown log level: {other}"))),
        }
    }

    /// Equivalent `tracing` filter.
    #[must_use]
    pub fn filter(self) -> LevelFilter {
        match self {
            Self::None => LevelFilter::OFF,
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u8),
            Name(String),
        }

        let raw = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Name(name) => name,
        };
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Install a log sink at `level`. `LogLevel::None` installs nothing.
///
/// Returns `false` when nothing was installed, including when another
/// logger or subscriber was already set.
pub fn init_logging(level: LogLevel) -> bool {
    if level == LogLevel::None {
        return false;
    }
    install_sink(level)
}

#[cfg(feature = "hydrate")]
fn install_sink(level: LogLevel) -> bool {
    let level = match level {
        LogLevel::None | LogLevel::Error => log::Level::Error,
        LogLevel::Warn => log::Level::Warn,
        LogLevel::Info => log::Level::Info,
        LogLevel::Debug => log::Level::Debug,
    };
    console_error_panic_hook::set_once();
    console_log::init_with_level(level).is_ok()
}

#[cfg(all(not(feature = "hydrate"), not(target_arch = "wasm32")))]
fn install_sink(level: LogLevel) -> bool {
    tracing_subscriber::fmt().with_max_level(level.filter()).try_init().is_ok()
}

#[cfg(all(not(feature = "hydrate"), target_arch = "wasm32"))]
fn install_sink(_level: LogLevel) -> bool {
    false
}
