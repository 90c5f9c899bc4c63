//! Log handlers

use crate::format::{extract_file_name, extract_func_name};
use crate::stream::OutputStream;
use logmux_core::{CategoryFilter, CategoryFilterTree, LogAttributes, LogLevel};
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;

/// Destination for log events
///
/// Every handler filters by its own [`CategoryFilterTree`]: [`message`] and
/// [`write`] only reach the output when the event's level passes the
/// threshold resolved for its category.
///
/// Handlers are invoked with the log manager's lock held and must not block
/// or call back into the manager. Output failures are absorbed.
///
/// [`message`]: LogHandler::message
/// [`write`]: LogHandler::write
pub trait LogHandler: Send + Sync {
    /// Filter tree used to resolve thresholds
    fn filter(&self) -> &CategoryFilterTree;

    /// Format and emit a message that already passed the filter
    fn log_message(
        &self,
        msg: &str,
        level: LogLevel,
        category: Option<&str>,
        attrs: &LogAttributes,
    );

    /// Emit raw data that already passed the filter
    fn write_raw(&self, data: &[u8], level: LogLevel, category: Option<&str>);

    /// Threshold for a category
    fn level(&self, category: Option<&str>) -> LogLevel {
        self.filter().level(category)
    }

    fn message(&self, msg: &str, level: LogLevel, category: Option<&str>, attrs: &LogAttributes) {
        if level.passes(self.level(category)) {
            self.log_message(msg, level, category, attrs);
        }
    }

    fn write(&self, data: &[u8], level: LogLevel, category: Option<&str>) {
        if level.passes(self.level(category)) {
            self.write_raw(data, level, category);
        }
    }
}

/// Handler writing human-readable lines to a stream
///
/// Line layout:
///
/// ```text
/// 0000012345 [app.net] socket.cpp:42, connect(): WARN: timed out [code = -110, details = retry]
/// ```
pub struct StreamLogHandler {
    stream: Arc<dyn OutputStream>,
    filter: CategoryFilterTree,
}

impl StreamLogHandler {
    pub fn new(stream: Arc<dyn OutputStream>, level: LogLevel, filters: Vec<CategoryFilter>) -> Self {
        Self {
            stream,
            filter: CategoryFilterTree::build(level, filters),
        }
    }

    /// Render a message line, including the trailing `\r\n`
    pub fn format_message(
        msg: &str,
        level: LogLevel,
        category: Option<&str>,
        attrs: &LogAttributes,
    ) -> String {
        let mut line = String::with_capacity(msg.len() + 64);
        // Writing to a String cannot fail
        if let Some(time) = attrs.time {
            let _ = write!(line, "{:010} ", time);
        }
        if let Some(category) = category {
            line.push('[');
            line.push_str(category);
            line.push_str("] ");
        }
        if let Some(file) = attrs.file.as_deref() {
            line.push_str(extract_file_name(file));
            if let Some(num) = attrs.line {
                let _ = write!(line, ":{}", num);
            }
            line.push_str(if attrs.function.is_some() { ", " } else { ": " });
        }
        if let Some(function) = attrs.function.as_deref() {
            line.push_str(extract_func_name(function));
            line.push_str("(): ");
        }
        line.push_str(level.as_str());
        line.push_str(": ");
        line.push_str(msg);
        if attrs.code.is_some() || attrs.details.is_some() {
            line.push_str(" [");
            if let Some(code) = attrs.code {
                let _ = write!(line, "code = {}", code);
            }
            if let Some(details) = attrs.details.as_deref() {
                if attrs.code.is_some() {
                    line.push_str(", ");
                }
                line.push_str("details = ");
                line.push_str(details);
            }
            line.push(']');
        }
        line.push_str("\r\n");
        line
    }
}

impl LogHandler for StreamLogHandler {
    fn filter(&self) -> &CategoryFilterTree {
        &self.filter
    }

    fn log_message(
        &self,
        msg: &str,
        level: LogLevel,
        category: Option<&str>,
        attrs: &LogAttributes,
    ) {
        let line = Self::format_message(msg, level, category, attrs);
        let _ = self.stream.write_bytes(line.as_bytes());
    }

    fn write_raw(&self, data: &[u8], _level: LogLevel, _category: Option<&str>) {
        let _ = self.stream.write_bytes(data);
    }
}

/// One JSON log record; field order is the output key order
#[derive(Serialize)]
struct JsonRecord<'a> {
    level: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

/// Handler writing one JSON object per line to a stream
pub struct JsonStreamLogHandler {
    stream: Arc<dyn OutputStream>,
    filter: CategoryFilterTree,
}

impl JsonStreamLogHandler {
    pub fn new(stream: Arc<dyn OutputStream>, level: LogLevel, filters: Vec<CategoryFilter>) -> Self {
        Self {
            stream,
            filter: CategoryFilterTree::build(level, filters),
        }
    }

    /// Render a message record, including the trailing `\r\n`
    pub fn format_message(
        msg: &str,
        level: LogLevel,
        category: Option<&str>,
        attrs: &LogAttributes,
    ) -> Result<Vec<u8>, serde_json::Error> {
        let record = JsonRecord {
            level: level.as_str(),
            message: msg,
            category,
            file: attrs.file.as_deref().map(extract_file_name),
            line: attrs.line,
            function: attrs.function.as_deref().map(extract_func_name),
            time: attrs.time,
            code: attrs.code,
            details: attrs.details.as_deref(),
        };
        let mut out = serde_json::to_vec(&record)?;
        out.extend_from_slice(b"\r\n");
        Ok(out)
    }
}

impl LogHandler for JsonStreamLogHandler {
    fn filter(&self) -> &CategoryFilterTree {
        &self.filter
    }

    fn log_message(
        &self,
        msg: &str,
        level: LogLevel,
        category: Option<&str>,
        attrs: &LogAttributes,
    ) {
        if let Ok(out) = Self::format_message(msg, level, category, attrs) {
            let _ = self.stream.write_bytes(&out);
        }
    }

    // Raw data is wrapped so the stream stays line-delimited JSON
    fn write_raw(&self, data: &[u8], level: LogLevel, category: Option<&str>) {
        let text = String::from_utf8_lossy(data);
        self.log_message(&text, level, category, &LogAttributes::default());
    }
}
