//! logmux-core - Severity levels, category filters, and configuration types
//!
//! This crate provides the foundational types shared by every logmux crate:
//! - [`LogLevel`] ordered severity levels
//! - [`CategoryFilterTree`] for resolving per-category thresholds
//! - [`LogAttributes`] attached to individual log messages
//! - [`LogError`] for error handling
//! - [`LoggingConfig`] and [`HandlerSpec`] for handler configuration

mod attributes;
mod config;
mod error;
mod filter;

pub use attributes::LogAttributes;
pub use config::{HandlerSpec, LoggingConfig, ObjectSpec};
pub use error::{LogError, LogResult};
pub use filter::{CategoryFilter, CategoryFilterTree, Subcategories, Subcategory};

use serde::{Deserialize, Serialize};

/// Log severity levels
///
/// Levels are ordered from most verbose to least verbose. A message at level
/// `l` passes a threshold `t` when `l >= t`, so [`LogLevel::All`] as a
/// threshold accepts everything and [`LogLevel::Off`] accepts nothing.
/// `Off` is also the default used when nothing was configured.
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    All = 0,
    Trace = 1,
    Info = 30,
    Warn = 40,
    Error = 50,
    Panic = 60,
    #[default]
    #[serde(rename = "none")]
    Off = 70,
}

impl LogLevel {
    /// Names accepted in configuration and control requests
    pub const NAMES: [(&'static str, LogLevel); 7] = [
        ("none", LogLevel::Off),
        ("trace", LogLevel::Trace),
        ("info", LogLevel::Info),
        ("warn", LogLevel::Warn),
        ("error", LogLevel::Error),
        ("panic", LogLevel::Panic),
        ("all", LogLevel::All),
    ];

    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::All,
            1 => LogLevel::Trace,
            30 => LogLevel::Info,
            40 => LogLevel::Warn,
            50 => LogLevel::Error,
            60 => LogLevel::Panic,
            _ => LogLevel::Off,
        }
    }

    /// Look up a level by its configuration name (case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, level)| *level)
    }

    /// Uppercase display name used in formatted output
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::All => "ALL",
            LogLevel::Trace => "TRACE",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Panic => "PANIC",
            LogLevel::Off => "NONE",
        }
    }

    /// Check whether a message at this level passes `threshold`
    ///
    /// An `Off` threshold rejects every message, including one logged at `Off`.
    pub fn passes(self, threshold: LogLevel) -> bool {
        threshold != LogLevel::Off && self >= threshold
    }
}

impl std::str::FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| LogError::UnknownLevel(s.to_string()))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CategoryFilter, CategoryFilterTree, HandlerSpec, LogAttributes, LogError, LogLevel,
        LogResult, LoggingConfig, ObjectSpec,
    };
}

#[cfg(test)]
mod lib_tests;
