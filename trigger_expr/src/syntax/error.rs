//! Syntax errors for trigger expressions
//!
//! Every variant carries the span of the offending text so callers can render a
//! caret under it and report a byte offset.

use super::state::ParseState;
use crate::config::compile_time::expression::{
    MAX_EXPRESSION_LENGTH, MAX_NESTING_DEPTH, MAX_TOKEN_COUNT,
};
use crate::lexical::FunctionMacroFault;
use crate::logging::{codes, Code};
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Expression is empty")]
    EmptyExpression { span: Span },

    #[error("Expression cannot start with '{found}'")]
    IllegalStart { found: char, span: Span },

    #[error("Unexpected ')' without matching '(' at {span}")]
    UnexpectedCloseParen { span: Span },

    #[error("{depth} unclosed '(' at end of expression")]
    UnclosedParen { depth: usize, span: Span },

    #[error("Unexpected '{found}' after {state} at {span}")]
    IllegalTransition {
        found: char,
        state: ParseState,
        span: Span,
    },

    #[error("Unexpected end of expression after {state}")]
    UnexpectedEnd { state: ParseState, span: Span },

    #[error("Malformed function macro: {fault} at {span}")]
    MalformedFunctionMacro {
        fault: FunctionMacroFault,
        span: Span,
    },

    #[error("Malformed number '{text}' at {span}")]
    MalformedNumber { text: String, span: Span },

    #[error("Unmatched '}}' at {span}")]
    UnmatchedBrace { span: Span },

    #[error("Expression too long: {length} bytes (max {MAX_EXPRESSION_LENGTH})")]
    ExpressionTooLong { length: usize, span: Span },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize, span: Span },

    #[error("Parentheses nested too deep: {depth} (max {MAX_NESTING_DEPTH})")]
    NestingTooDeep { depth: usize, span: Span },
}

impl SyntaxError {
    pub fn illegal_transition(found: char, state: ParseState, span: Span) -> Self {
        Self::IllegalTransition { found, state, span }
    }

    pub fn unexpected_end(state: ParseState, span: Span) -> Self {
        Self::UnexpectedEnd { state, span }
    }

    pub fn malformed_function_macro(fault: FunctionMacroFault, span: Span) -> Self {
        Self::MalformedFunctionMacro { fault, span }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::EmptyExpression { .. } => codes::syntax::EMPTY_EXPRESSION,
            Self::IllegalStart { .. } => codes::syntax::ILLEGAL_START,
            Self::UnexpectedCloseParen { .. } | Self::UnclosedParen { .. } => {
                codes::syntax::UNBALANCED_PARENTHESES
            }
            Self::IllegalTransition { .. } => codes::syntax::ILLEGAL_TRANSITION,
            Self::UnexpectedEnd { .. } => codes::syntax::UNEXPECTED_END,
            Self::MalformedFunctionMacro { .. } => codes::syntax::MALFORMED_FUNCTION_MACRO,
            Self::MalformedNumber { .. } => codes::syntax::MALFORMED_NUMBER,
            Self::UnmatchedBrace { .. } => codes::syntax::UNMATCHED_BRACE,
            Self::ExpressionTooLong { .. } => codes::syntax::EXPRESSION_TOO_LONG,
            Self::TooManyTokens { .. } => codes::syntax::TOO_MANY_TOKENS,
            Self::NestingTooDeep { .. } => codes::syntax::NESTING_TOO_DEEP,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::EmptyExpression { span }
            | Self::IllegalStart { span, .. }
            | Self::UnexpectedCloseParen { span }
            | Self::UnclosedParen { span, .. }
            | Self::IllegalTransition { span, .. }
            | Self::UnexpectedEnd { span, .. }
            | Self::MalformedFunctionMacro { span, .. }
            | Self::MalformedNumber { span, .. }
            | Self::UnmatchedBrace { span }
            | Self::ExpressionTooLong { span, .. }
            | Self::TooManyTokens { span, .. }
            | Self::NestingTooDeep { span, .. } => *span,
        }
    }

    /// Byte offset the error points at
    pub fn offset(&self) -> usize {
        self.span().start.offset
    }

    /// Limit violations abort regardless of where they occur
    pub fn is_limit_violation(&self) -> bool {
        matches!(
            self,
            Self::ExpressionTooLong { .. } | Self::TooManyTokens { .. } | Self::NestingTooDeep { .. }
        )
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
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
