//! Global logging for the trigger expression parser
//!
//! Parsing never depends on whether logging is initialized: every entry point
//! below is a no-op until `init_global_logging` installs a service.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::Cell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    EventSummary, Logger, LoggingService, MemoryLogger, NullLogger, StderrFormat, StderrLogger,
};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    // Index of the expression currently being processed by a batch caller
    static EXPRESSION_CONTEXT: Cell<Option<usize>> = const { Cell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the installed runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let required_codes = [
        codes::system::INTERNAL_ERROR,
        codes::syntax::ILLEGAL_TRANSITION,
        codes::semantic::UNKNOWN_FUNCTION,
        codes::success::EXPRESSION_VALID,
    ];
    for code in required_codes {
        if codes::get_description(code.as_str()) == "Unknown error" {
            return Err(format!("Missing metadata for code: {}", code));
        }
    }

    let logging_service = Arc::new(LoggingService::with_config());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized".to_string())?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with a caller-provided service
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// EXPRESSION CONTEXT
// ============================================================================

/// Run `f` with every event it logs tagged with the expression index
pub fn with_expression_context<F, R>(index: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = EXPRESSION_CONTEXT.with(|ctx| ctx.replace(Some(index)));
    let result = f();
    EXPRESSION_CONTEXT.with(|ctx| ctx.set(previous));
    result
}

pub fn get_current_expression_context() -> Option<usize> {
    EXPRESSION_CONTEXT.with(|ctx| ctx.get())
}

fn attach_expression_context(event: LogEvent) -> LogEvent {
    match get_current_expression_context() {
        Some(index) => event.with_context("expression", &index.to_string()),
        None => event,
    }
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn emit(event: LogEvent, context: Vec<(&str, String)>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };
    let event = context
        .iter()
        .fold(event, |event, (key, value)| event.with_context(key, value));
    logger.log_event(attach_expression_context(event));
}

/// Used by `log_error!`
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, String)>,
) {
    if !is_initialized() {
        return;
    }
    let event = LogEvent::error(code, config::truncate_message(message));
    emit(
        match span {
            Some(span) => event.with_span(span),
            None => event,
        },
        context,
    );
}

/// Used by `log_success!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, String)>) {
    if is_initialized() {
        emit(LogEvent::success(code, config::truncate_message(message)), context);
    }
}

/// Used by `log_info!`
pub fn log_info_with_context(message: &str, context: Vec<(&str, String)>) {
    log_uncoded_with_context(LogLevel::Info, message, context);
}

/// Used by `log_warning!` and `log_debug!`; errors always carry a code
pub fn log_uncoded_with_context(level: LogLevel, message: &str, context: Vec<(&str, String)>) {
    if !is_initialized() {
        return;
    }
    let message = config::truncate_message(message);
    let event = match level {
        LogLevel::Warning => LogEvent::warning(message),
        LogLevel::Debug => LogEvent::debug(message),
        LogLevel::Info | LogLevel::Error => LogEvent::info(message),
    };
    emit(event, context);
}

/// Error logging that falls back to stderr when logging is not initialized
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(attach_expression_context(LogEvent::error(code, message)));
    } else {
        eprintln!("[ERROR] {} - {}", code.as_str(), message);
    }
}
