//! Tracing layer that forwards to the platform dispatch

use crate::platform::Platform;
use logmux_core::{LogAttributes, LogLevel};
use std::fmt::Write as _;
use tracing::field::{Field, Visit};
use tracing::subscriber::Interest;
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Tracing layer that forwards events to a [`Platform`]
///
/// The event target becomes the category with `::` replaced by `.`, so
/// `app::net` is filtered under `app.net`. Whether an event is enabled is
/// asked from the platform on every call, because the active handlers change
/// at runtime.
pub struct PlatformLayer {
    platform: &'static Platform,
}

impl PlatformLayer {
    /// Create a layer using the global platform
    pub fn new() -> Self {
        Self {
            platform: Platform::global(),
        }
    }

    /// Create a layer with a specific platform
    pub fn with_platform(platform: &'static Platform) -> Self {
        Self { platform }
    }

    /// Convert tracing Level to our LogLevel
    fn convert_level(level: &Level) -> LogLevel {
        match *level {
            Level::TRACE | Level::DEBUG => LogLevel::Trace,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }

    fn category(target: &str) -> String {
        target.replace("::", ".")
    }
}

impl Default for PlatformLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for PlatformLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        Interest::sometimes()
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        let level = Self::convert_level(metadata.level());
        let category = Self::category(metadata.target());
        self.platform.log_enabled(level, Some(&category))
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::convert_level(metadata.level());
        let category = Self::category(metadata.target());

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut attrs = LogAttributes::new();
        if let Some(file) = metadata.file() {
            attrs = attrs.with_file(file);
        }
        if let Some(line) = metadata.line() {
            attrs = attrs.with_line(line);
        }

        self.platform
            .log_message(&visitor.finish(), level, Some(&category), &attrs);
    }
}

/// Visitor collecting the message and any structured fields
///
/// Fields other than `message` are appended as `name=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, name: &str, value: std::fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }
}

/// Initialize tracing with the platform layer
///
/// Installs a global subscriber that routes `tracing` events into the
/// global platform, and from there into the log manager's handlers. Does
/// nothing if a global subscriber is already set.
pub fn init_logging() {
    use tracing_subscriber::prelude::*;

    let subscriber = tracing_subscriber::registry().with(PlatformLayer::new());
    let _ = tracing::subscriber::set_global_default(subscriber);
}
