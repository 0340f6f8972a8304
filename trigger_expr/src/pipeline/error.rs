use crate::logging::{codes, Code};
use crate::semantic_analysis::SemanticError;
use crate::syntax::SyntaxError;
use crate::utils::Span;

/// The error that made an expression invalid
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpressionError {
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Semantic error: {0}")]
    Semantic(#[from] SemanticError),
}

impl ExpressionError {
    /// Message without the stage prefix
    pub fn message(&self) -> String {
        match self {
            Self::Syntax(error) => error.to_string(),
            Self::Semantic(error) => error.to_string(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Syntax(error) => error.span(),
            Self::Semantic(error) => error.span(),
        }
    }

    /// Byte offset into the expression
    pub fn offset(&self) -> usize {
        self.span().start.offset
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::Syntax(error) => error.error_code(),
            Self::Semantic(error) => error.error_code(),
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ParseState;

    #[test]
    fn test_wraps_both_stages() {
        let syntax: ExpressionError =
            SyntaxError::unexpected_end(ParseState::AfterBinaryOperator, Span::from_offsets(3, 4))
                .into();
        assert!(syntax.is_syntax());
        assert_eq!(syntax.offset(), 3);
        assert_eq!(syntax.error_code(), codes::syntax::UNEXPECTED_END);
        assert!(syntax.to_string().starts_with("Syntax error: "));
        assert!(!syntax.message().starts_with("Syntax error: "));

        let semantic: ExpressionError =
            SemanticError::unknown_function("somefunc", Span::from_offsets(0, 23)).into();
        assert!(!semantic.is_syntax());
        assert_eq!(semantic.category(), "Semantic");
    }
}
