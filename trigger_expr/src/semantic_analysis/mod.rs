//! Pass 3: semantic analysis of function macros
//!
//! Runs over a structurally valid token stream. Every function macro is checked
//! for a well-formed host, a complete item key and a call matching a registered
//! signature. Optionally the expression must reference at least one item.

pub mod functions;
pub mod macro_checker;
pub mod param_checker;
pub mod types;

pub use functions::{lookup_function, FunctionSignature, ParamKind, ParamSpec};
pub use types::{SemanticError, SemanticOutput, SemanticResult};

use crate::config::compile_time::semantic::MAX_SEMANTIC_ERRORS;
use crate::logging::codes;
use crate::tokens::{Token, TokenKind};
use crate::utils::Span;
use crate::{log_debug, log_error, log_info, log_success, log_warning};

/// Pass number
pub const PASS_NUMBER: u8 = 3;

/// Semantic analyzer for tokenized expressions
#[derive(Debug, Clone, Copy)]
pub struct SemanticAnalyzer {
    allow_lld_macros: bool,
    require_item_reference: bool,
}

impl SemanticAnalyzer {
    pub fn new(allow_lld_macros: bool, require_item_reference: bool) -> Self {
        Self {
            allow_lld_macros,
            require_item_reference,
        }
    }

    pub fn analyze(&self, tokens: &[Token]) -> SemanticOutput {
        let function_macros: Vec<&Token> = tokens
            .iter()
            .filter(|token| token.kind == TokenKind::FunctionMacro)
            .collect();

        log_info!("Starting Pass 3: Semantic Analysis",
            "function_macros" => function_macros.len(),
            "require_item_reference" => self.require_item_reference,
            "max_errors_limit" => MAX_SEMANTIC_ERRORS
        );

        let mut output = SemanticOutput::new();

        // Step 1: host, item key and signature of every function macro
        log_debug!("Step 1: Validating function macros");
        for token in &function_macros {
            if output.remaining_capacity() == 0 {
                output.error_limit_reached = true;
                log_warning!("Semantic error limit reached",
                    "max_errors" => MAX_SEMANTIC_ERRORS);
                break;
            }

            let Some(function_macro) = token.as_function_macro() else {
                continue;
            };

            if let Err(error) =
                macro_checker::check_function_macro(function_macro, token.span, self.allow_lld_macros)
            {
                log_error!(error.error_code(), "Function macro failed validation",
                    span = error.span(),
                    "error" => &error,
                    "macro" => &token.text
                );
                output.add_error(error);
            }
        }

        // Step 2: at least one item reference
        if self.require_item_reference {
            log_debug!("Step 2: Checking for an item reference");
            if function_macros.is_empty() {
                let error = SemanticError::NoItemReference {
                    span: expression_span(tokens),
                };
                log_error!(error.error_code(), "Expression references no item",
                    span = error.span()
                );
                output.add_error(error);
            }
        }

        output.is_successful = output.errors.is_empty();

        if output.is_successful {
            log_success!(codes::success::SEMANTIC_VALIDATION_COMPLETE,
                "Semantic analysis completed successfully",
                "function_macros" => function_macros.len()
            );
        } else {
            log_info!("Semantic analysis completed with errors",
                "total_errors" => output.errors.len(),
                "limit_reached" => output.error_limit_reached
            );
        }

        output
    }

    /// True when the tokens pass every semantic check
    pub fn quick_validate(&self, tokens: &[Token]) -> bool {
        let output = self.analyze(tokens);
        log_debug!("Quick validation result", "success" => output.is_successful);
        output.is_successful
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new(true, false)
    }
}

/// Span from the first token to the last
fn expression_span(tokens: &[Token]) -> Span {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => first.span.merge(last.span),
        _ => Span::dummy(),
    }
}

// ============================================================================
// CONVENIENCE FUNCTIONS
// ============================================================================

/// Analyze `tokens` with LLD macros allowed and no item reference requirement
pub fn analyze_semantics(tokens: &[Token]) -> SemanticOutput {
    SemanticAnalyzer::default().analyze(tokens)
}
