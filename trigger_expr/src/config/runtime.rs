// RUNTIME PREFERENCES (User Experience)
//
// Compile-time limits live in the generated `compile_time` module. Everything here is a
// user preference: defaults come from TRIGGER_EXPR_* environment variables and may be
// overridden by a TOML file passed to the CLI.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Errors raised while loading a runtime configuration file
#[derive(Debug, thiserror::Error)]
pub enum RuntimeConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid runtime configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserPreferences {
    /// Whether `{#MACRO}` low-level discovery macros are recognized as constants
    pub allow_lld_macros: bool,

    /// Whether to log every accepted token at debug level
    pub trace_tokens: bool,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            allow_lld_macros: env::var("TRIGGER_EXPR_ALLOW_LLD_MACROS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            trace_tokens: env::var("TRIGGER_EXPR_TRACE_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPreferences {
    /// Reject expressions that reference no `{host:key.func()}` at all
    pub require_item_reference: bool,
}

impl Default for ValidationPreferences {
    fn default() -> Self {
        Self {
            require_item_reference: env::var("TRIGGER_EXPR_REQUIRE_ITEM_REFERENCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Preferred minimum log level (security floor still applies)
    pub min_log_level: LogLevel,

    /// Whether to render errors with a source excerpt and caret
    pub enable_cargo_style_output: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var("TRIGGER_EXPR_LOGGING_USE_STRUCTURED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var("TRIGGER_EXPR_LOGGING_ENABLE_CONSOLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var("TRIGGER_EXPR_LOGGING_MIN_LEVEL")
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            enable_cargo_style_output: env::var("TRIGGER_EXPR_LOGGING_CARGO_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
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

    /// Convert to events::LogLevel
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables and CLI flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub parser: ParserPreferences,
    pub validation: ValidationPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse a TOML document; missing sections fall back to environment defaults
    pub fn from_toml_str(content: &str) -> Result<Self, RuntimeConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load preferences from a TOML file
    pub fn load(path: &Path) -> Result<Self, RuntimeConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Parser
    pub const ALLOW_LLD_MACROS: &str = "TRIGGER_EXPR_ALLOW_LLD_MACROS";
    pub const TRACE_TOKENS: &str = "TRIGGER_EXPR_TRACE_TOKENS";

    // Validation
    pub const REQUIRE_ITEM_REFERENCE: &str = "TRIGGER_EXPR_REQUIRE_ITEM_REFERENCE";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "TRIGGER_EXPR_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "TRIGGER_EXPR_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "TRIGGER_EXPR_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "TRIGGER_EXPR_LOGGING_CARGO_STYLE";
}
