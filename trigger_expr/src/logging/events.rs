//! Log events emitted while parsing and validating expressions

use super::codes::Code;
use crate::utils::Span;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Ordered from most to least severe; a filter level admits everything at or above it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub span: Option<Span>,
    pub context: HashMap<String, String>,
}

impl LogEvent {
    fn with_level(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: message.to_string(),
            span: None,
            context: HashMap::new(),
        }
    }

    pub fn error(error_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Error, error_code, message)
    }

    /// Warning without a specific code
    pub fn warning(message: &str) -> Self {
        Self::with_level(LogLevel::Warning, Code::new("W000"), message)
    }

    pub fn info(message: &str) -> Self {
        Self::with_level(LogLevel::Info, Code::new("I000"), message)
    }

    /// Info event carrying a success code
    pub fn success(success_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Info, success_code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::with_level(LogLevel::Debug, Code::new("D000"), message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    pub fn severity(&self) -> &'static str {
        super::codes::get_severity(self.code.as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        super::codes::get_category(self.code.as_str())
    }

    pub fn description(&self) -> &'static str {
        super::codes::get_description(self.code.as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        super::codes::get_action(self.code.as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        super::codes::is_recoverable(self.code.as_str())
    }

    pub fn requires_halt(&self) -> bool {
        super::codes::requires_halt(self.code.as_str())
    }

    /// Single-line rendering: `[LEVEL] CODE - message at line:col`
    pub fn format(&self) -> String {
        let mut line = format!("[{}] {} - {}", self.level.as_str(), self.code, self.message);
        if let Some(span) = self.span {
            line.push_str(&format!(" at {}", span.start()));
        }
        line
    }

    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let record = JsonRecord {
            timestamp: self.timestamp.to_rfc3339(),
            level: self.level.as_str(),
            code: self.code.as_str(),
            message: &self.message,
            category: self.category(),
            severity: self.severity(),
            error_metadata: self.is_error().then(|| ErrorMetadata {
                recoverable: self.is_recoverable(),
                requires_halt: self.requires_halt(),
                description: self.description(),
                recommended_action: self.recommended_action(),
            }),
            span: self.span.map(|span| SpanRecord {
                offset: span.start.offset,
                start_line: span.start.line,
                start_column: span.start.column,
                end_line: span.end.line,
                end_column: span.end.column,
            }),
            context: (!self.context.is_empty()).then_some(&self.context),
        };
        serde_json::to_string(&record)
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    timestamp: String,
    level: &'static str,
    code: &'a str,
    message: &'a str,
    category: &'static str,
    severity: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_metadata: Option<ErrorMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    span: Option<SpanRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a HashMap<String, String>>,
}

#[derive(Serialize)]
struct ErrorMetadata {
    recoverable: bool,
    requires_halt: bool,
    description: &'static str,
    recommended_action: &'static str,
}

#[derive(Serialize)]
struct SpanRecord {
    offset: usize,
    start_line: u32,
    start_column: u32,
    end_line: u32,
    end_column: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_error_event_creation() {
        let event = LogEvent::error(codes::syntax::ILLEGAL_TRANSITION, "unexpected '+'");

        assert!(event.is_error());
        assert_eq!(event.code.as_str(), "E043");
        assert_eq!(event.category(), "Syntax");
    }

    #[test]
    fn test_generic_codes() {
        assert_eq!(LogEvent::warning("w").code.as_str(), "W000");
        assert_eq!(LogEvent::info("i").code.as_str(), "I000");
        assert_eq!(LogEvent::debug("d").code.as_str(), "D000");
        assert!(LogEvent::success(codes::success::EXPRESSION_VALID, "ok").is_info());
    }

    #[test]
    fn test_event_formatting_with_span() {
        let span = Span::new(
            crate::utils::Position::new(4, 1, 5),
            crate::utils::Position::new(5, 1, 6),
        );
        let event =
            LogEvent::error(codes::syntax::ILLEGAL_TRANSITION, "unexpected '+'").with_span(span);

        assert_eq!(event.format(), "[ERROR] E043 - unexpected '+' at 1:5");
    }

    #[test]
    fn test_json_formatting() {
        let event = LogEvent::error(codes::semantic::UNKNOWN_FUNCTION, "unknown function 'foo'")
            .with_context("function", "foo");

        let json = event.format_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["code"], "E182");
        assert_eq!(value["context"]["function"], "foo");
        assert_eq!(value["error_metadata"]["recoverable"], true);
        assert!(value["timestamp"].as_str().unwrap().contains('T'));
    }
}
