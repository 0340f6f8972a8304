//! Logging service and sinks

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Destination for events that passed the service's level filter
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Level-filtering front end over a `Logger` sink
pub struct LoggingService {
    sink: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(sink: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { sink, min_level }
    }

    /// Service configured from the installed runtime preferences
    pub fn with_config() -> Self {
        let sink: Arc<dyn Logger> = if !config::use_console_logging() {
            Arc::new(NullLogger)
        } else if config::use_structured_logging() {
            Arc::new(StderrLogger::json())
        } else {
            Arc::new(StderrLogger::text())
        };
        Self::new(sink, config::get_min_log_level())
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.sink.log(&event);
        }
    }

    pub fn log_error(&self, error_code: Code, message: &str) {
        self.log_event(LogEvent::error(error_code, message));
    }

    pub fn log_success(&self, success_code: Code, message: &str) {
        self.log_event(LogEvent::success(success_code, message));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StderrFormat {
    /// `[LEVEL] CODE - message`
    Text,
    /// One JSON object per line
    Json,
}

/// Writes to stderr; stdout is left for command output
pub struct StderrLogger {
    format: StderrFormat,
}

impl StderrLogger {
    pub fn text() -> Self {
        Self {
            format: StderrFormat::Text,
        }
    }

    pub fn json() -> Self {
        Self {
            format: StderrFormat::Json,
        }
    }

    pub fn format(&self) -> StderrFormat {
        self.format
    }

    fn render(&self, event: &LogEvent) -> String {
        match self.format {
            StderrFormat::Text => event.format(),
            StderrFormat::Json => event.format_json().unwrap_or_else(|_| event.format()),
        }
    }
}

impl Logger for StderrLogger {
    fn log(&self, event: &LogEvent) {
        eprintln!("{}", self.render(event));
    }
}

/// Discards everything; used when console output is disabled
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _event: &LogEvent) {}
}

/// In-memory ring of the most recent events
pub struct MemoryLogger {
    capacity: usize,
    events: Mutex<VecDeque<LogEvent>>,
}

impl MemoryLogger {
    /// Capacity taken from the compile-time log buffer size
    pub fn new() -> Self {
        Self::with_capacity(config::get_error_buffer_size())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: Mutex::new(VecDeque::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.lock().iter().filter(|e| e.is_error()).cloned().collect()
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.is_error() && e.code == code)
    }

    pub fn has_success_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.is_info() && e.code == code)
    }

    pub fn get_summary(&self) -> EventSummary {
        self.lock()
            .iter()
            .fold(EventSummary::default(), |mut summary, event| {
                summary.total_count += 1;
                match event.level {
                    LogLevel::Error => summary.error_count += 1,
                    LogLevel::Warning => summary.warning_count += 1,
                    LogLevel::Info => summary.info_count += 1,
                    LogLevel::Debug => {}
                }
                summary
            })
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.lock();
        while events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSummary {
    pub total_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

impl EventSummary {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}
