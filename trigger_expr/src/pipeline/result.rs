use super::error::ExpressionError;
use crate::lexical::FunctionMacro;
use crate::semantic_analysis::SemanticError;
use crate::tokens::{Token, TokenKind};
use crate::utils::SourceMap;

/// Tokens and verdict for one expression
///
/// A syntax error leaves `tokens` empty. Semantic errors keep the tokens; the
/// first one becomes `error` and the rest stay in `semantic_errors`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub source: String,
    pub tokens: Vec<Token>,
    pub is_valid: bool,
    pub error: Option<ExpressionError>,
    pub semantic_errors: Vec<SemanticError>,
}

impl ParseResult {
    pub fn valid(source: &str, tokens: Vec<Token>) -> Self {
        Self {
            source: source.to_string(),
            tokens,
            is_valid: true,
            error: None,
            semantic_errors: Vec::new(),
        }
    }

    pub fn invalid(source: &str, tokens: Vec<Token>, error: ExpressionError) -> Self {
        Self {
            source: source.to_string(),
            tokens,
            is_valid: false,
            error: Some(error),
            semantic_errors: Vec::new(),
        }
    }

    pub fn function_macros(&self) -> Vec<&FunctionMacro> {
        self.tokens
            .iter()
            .filter_map(Token::as_function_macro)
            .collect()
    }

    pub fn user_macros(&self) -> Vec<&str> {
        self.macro_names(TokenKind::UserMacro)
    }

    pub fn lld_macros(&self) -> Vec<&str> {
        self.macro_names(TokenKind::LldMacro)
    }

    pub fn builtin_macros(&self) -> Vec<&str> {
        self.macro_names(TokenKind::BuiltinMacro)
    }

    fn macro_names(&self, kind: TokenKind) -> Vec<&str> {
        self.tokens
            .iter()
            .filter(|token| token.kind == kind)
            .filter_map(Token::macro_name)
            .collect()
    }

    /// Structure was accepted, whatever the semantic verdict
    pub fn is_structurally_valid(&self) -> bool {
        !matches!(self.error, Some(ExpressionError::Syntax(_)))
    }

    /// Cargo-style rendering of the error with a caret under the offending text
    pub fn format_error(&self) -> Option<String> {
        let error = self.error.as_ref()?;
        let source_map = SourceMap::new(&self.source);
        Some(source_map.format_error(&error.span(), &error.message()))
    }
}
