//! Semantic error types for function macro validation
//!
//! Errors carry the span of the function macro they were raised for. Messages
//! that embed user text are truncated to `MAX_ERROR_MESSAGE_LENGTH`.

use crate::config::compile_time::semantic::{MAX_ERROR_MESSAGE_LENGTH, MAX_SEMANTIC_ERRORS};
use crate::lexical::ItemKeyError;
use crate::logging::{codes, Code};
use crate::utils::Span;
use thiserror::Error;

/// Result type for semantic analysis operations
pub type SemanticResult<T> = Result<T, SemanticError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    /// Host name is empty or contains characters outside the host set (E180)
    #[error("Invalid host name '{host}' at {span}")]
    InvalidHost { host: String, span: Span },

    /// Item key does not scan completely (E181)
    #[error("Invalid item key '{item_key}': {reason} at {span}")]
    InvalidItemKey {
        item_key: String,
        reason: ItemKeyError,
        span: Span,
    },

    /// Function is not in the registry (E182)
    #[error("Unknown function '{function}' at {span}")]
    UnknownFunction { function: String, span: Span },

    /// More parameters than the signature declares (E183)
    #[error("Function '{function}' takes at most {max} parameter(s), got {given} at {span}")]
    TooManyParameters {
        function: String,
        max: usize,
        given: usize,
        span: Span,
    },

    /// Mandatory parameter absent or empty (E184)
    #[error("Function '{function}' is missing mandatory parameter {position} at {span}")]
    MissingMandatoryParameter {
        function: String,
        position: usize,
        span: Span,
    },

    /// Parameter does not satisfy its kind (E185)
    #[error("Invalid parameter {position} '{value}' of function '{function}': expected {expected} at {span}")]
    InvalidParameter {
        function: String,
        position: usize,
        value: String,
        expected: &'static str,
        span: Span,
    },

    /// Expression references no item at all (E186)
    #[error("Expression must contain at least one item reference")]
    NoItemReference { span: Span },
}

impl SemanticError {
    pub fn invalid_host(host: &str, span: Span) -> Self {
        Self::InvalidHost {
            host: truncate_value(host),
            span,
        }
    }

    pub fn invalid_item_key(item_key: &str, reason: ItemKeyError, span: Span) -> Self {
        Self::InvalidItemKey {
            item_key: truncate_value(item_key),
            reason,
            span,
        }
    }

    pub fn unknown_function(function: &str, span: Span) -> Self {
        Self::UnknownFunction {
            function: truncate_value(function),
            span,
        }
    }

    /// `position` is 1-based
    pub fn invalid_parameter(
        function: &str,
        position: usize,
        value: &str,
        expected: &'static str,
        span: Span,
    ) -> Self {
        Self::InvalidParameter {
            function: function.to_string(),
            position,
            value: truncate_value(value),
            expected,
            span,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::InvalidHost { .. } => codes::semantic::INVALID_HOST,
            Self::InvalidItemKey { .. } => codes::semantic::INVALID_ITEM_KEY,
            Self::UnknownFunction { .. } => codes::semantic::UNKNOWN_FUNCTION,
            Self::TooManyParameters { .. } => codes::semantic::TOO_MANY_PARAMETERS,
            Self::MissingMandatoryParameter { .. } => codes::semantic::MISSING_MANDATORY_PARAMETER,
            Self::InvalidParameter { .. } => codes::semantic::INVALID_PARAMETER,
            Self::NoItemReference { .. } => codes::semantic::NO_ITEM_REFERENCE,
        }
    }

    /// Error type string for logging context
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidHost { .. } => "InvalidHost",
            Self::InvalidItemKey { .. } => "InvalidItemKey",
            Self::UnknownFunction { .. } => "UnknownFunction",
            Self::TooManyParameters { .. } => "TooManyParameters",
            Self::MissingMandatoryParameter { .. } => "MissingMandatoryParameter",
            Self::InvalidParameter { .. } => "InvalidParameter",
            Self::NoItemReference { .. } => "NoItemReference",
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::InvalidHost { span, .. }
            | Self::InvalidItemKey { span, .. }
            | Self::UnknownFunction { span, .. }
            | Self::TooManyParameters { span, .. }
            | Self::MissingMandatoryParameter { span, .. }
            | Self::InvalidParameter { span, .. }
            | Self::NoItemReference { span } => *span,
        }
    }

    pub fn offset(&self) -> usize {
        self.span().start.offset
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

// ============================================================================
// ANALYSIS OUTPUT
// ============================================================================

/// Errors found by one semantic pass, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemanticOutput {
    pub errors: Vec<SemanticError>,
    pub is_successful: bool,
    pub error_limit_reached: bool,
}

impl SemanticOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success() -> Self {
        Self {
            is_successful: true,
            ..Self::default()
        }
    }

    /// Add an error unless the collection limit has been reached
    pub fn add_error(&mut self, error: SemanticError) {
        if self.errors.len() < MAX_SEMANTIC_ERRORS {
            self.errors.push(error);
            self.is_successful = false;
        } else {
            self.error_limit_reached = true;
        }
    }

    pub fn remaining_capacity(&self) -> usize {
        MAX_SEMANTIC_ERRORS.saturating_sub(self.errors.len())
    }

    /// The error reported for the expression as a whole
    pub fn first_error(&self) -> Option<&SemanticError> {
        self.errors.first()
    }
}

fn truncate_value(value: &str) -> String {
    if value.len() <= MAX_ERROR_MESSAGE_LENGTH {
        return value.to_string();
    }
    let mut end = MAX_ERROR_MESSAGE_LENGTH;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &value[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_offsets() {
        let error = SemanticError::unknown_function("somefunc", Span::from_offsets(0, 23));
        assert_eq!(error.error_code(), codes::semantic::UNKNOWN_FUNCTION);
        assert_eq!(error.offset(), 0);
        assert_eq!(error.category(), "Semantic");
        assert_eq!(error.error_type(), "UnknownFunction");
    }

    #[test]
    fn test_long_values_are_truncated() {
        let host = "h".repeat(MAX_ERROR_MESSAGE_LENGTH + 10);
        match SemanticError::invalid_host(&host, Span::dummy()) {
            SemanticError::InvalidHost { host, .. } => {
                assert!(host.ends_with("..."));
                assert_eq!(host.len(), MAX_ERROR_MESSAGE_LENGTH + 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_output_caps_errors() {
        let mut output = SemanticOutput::success();
        assert!(output.is_successful);

        for _ in 0..MAX_SEMANTIC_ERRORS + 1 {
            output.add_error(SemanticError::NoItemReference { span: Span::dummy() });
        }
        assert!(!output.is_successful);
        assert!(output.error_limit_reached);
        assert_eq!(output.errors.len(), MAX_SEMANTIC_ERRORS);
        assert_eq!(output.remaining_capacity(), 0);
    }

    #[test]
    fn test_parameter_message() {
        let error = SemanticError::invalid_parameter(
            "nodata",
            1,
            "#5",
            "seconds",
            Span::from_offsets(3, 20),
        );
        assert!(error
            .to_string()
            .starts_with("Invalid parameter 1 '#5' of function 'nodata': expected seconds"));
    }
}
