//! Expression pipeline: structure check, then semantic analysis
//!
//! `parse_with_options` is the library entry point. It never panics and never
//! returns `Err`: every outcome, valid or not, is a `ParseResult`.

mod error;
mod options;
pub mod output;
mod result;
mod stats;

pub use error::ExpressionError;
pub use options::ParseOptions;
pub use output::{ErrorReport, ExpressionOutput};
pub use result::ParseResult;
pub use stats::ValidationStats;

use crate::logging::codes;
use crate::semantic_analysis::SemanticAnalyzer;
use crate::syntax::ExpressionParser;
use crate::tokens::Token;
use crate::{log_debug, log_success};

/// Parse with default options
pub fn parse(expression: &str) -> ParseResult {
    parse_with_options(expression, &ParseOptions::default())
}

pub fn parse_with_options(expression: &str, options: &ParseOptions) -> ParseResult {
    log_debug!("Starting expression pipeline",
        "length" => expression.len(),
        "allow_lld_macros" => options.allow_lld_macros
    );

    // Stage 1: structure
    let parser = ExpressionParser::new(options.allow_lld_macros).with_token_trace(options.trace_tokens);
    let tokens = match parser.parse(expression) {
        Ok(tokens) => tokens,
        Err(error) => return ParseResult::invalid(expression, Vec::new(), error.into()),
    };

    // Stage 2: semantics
    check_semantics(expression, tokens, options)
}

/// Check an already parsed expression again under `options`.
///
/// The source is scanned again, so options that change the grammar (LLD macros)
/// apply as well as the semantic ones. The outcome always equals
/// `parse_with_options(&result.source, options)`.
pub fn validate(result: &ParseResult, options: &ParseOptions) -> ParseResult {
    parse_with_options(&result.source, options)
}

fn check_semantics(expression: &str, tokens: Vec<Token>, options: &ParseOptions) -> ParseResult {
    let analyzer = SemanticAnalyzer::new(options.allow_lld_macros, options.require_item_reference);
    let mut errors = analyzer.analyze(&tokens).errors.into_iter();

    match errors.next() {
        None => {
            log_success!(codes::success::EXPRESSION_VALID, "Expression is valid",
                "tokens" => tokens.len()
            );
            ParseResult::valid(expression, tokens)
        }
        Some(first) => {
            let mut result = ParseResult::invalid(expression, tokens, first.into());
            result.semantic_errors = errors.collect();
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic_analysis::SemanticError;
    use crate::syntax::SyntaxError;
    use crate::tokens::{Operator, TokenKind};
    use assert_matches::assert_matches;

    #[test]
    fn test_item_comparison() {
        let result = parse("{Zabbix server:agent.ping.last(0)}=1");
        assert!(result.is_valid);
        assert!(result.error.is_none());

        let macros = result.function_macros();
        assert_eq!(macros.len(), 1);
        assert_eq!(macros[0].host, "Zabbix server");
        assert_eq!(macros[0].item_key, "agent.ping");
        assert_eq!(macros[0].function_name, "last");
        assert_eq!(macros[0].params, vec!["0"]);

        let numbers: Vec<_> = result.tokens.iter().filter(|t| t.kind == TokenKind::Number).collect();
        assert_eq!(numbers.len(), 1);
        assert_eq!(numbers[0].text, "1");
        let operators: Vec<_> = result.tokens.iter().filter_map(|t| t.as_operator()).collect();
        assert_eq!(operators, vec![Operator::Equal]);
    }

    #[test]
    fn test_empty_expression() {
        let result = parse("");
        assert!(!result.is_valid);
        assert_matches!(
            result.error,
            Some(ExpressionError::Syntax(SyntaxError::EmptyExpression { .. }))
        );
        assert!(result.tokens.is_empty());
    }

    #[test]
    fn test_bracketed_key_with_empty_parameter() {
        let result = parse("{host:key[,80].last(0)}");
        assert!(result.is_valid);
        assert_eq!(result.function_macros()[0].item_key, "key[,80]");
    }

    #[test]
    fn test_lld_macro_rejected_when_disabled() {
        let options = ParseOptions::default().with_lld_macros(false);
        let result = parse_with_options("{host:item.last(0)} | {#MACRO}", &options);
        assert!(!result.is_valid);
        let error = result.error.unwrap();
        assert_eq!(error.error_code(), codes::syntax::ILLEGAL_TRANSITION);
        assert_eq!(error.offset(), 22);
    }

    #[test]
    fn test_unknown_function_keeps_tokens() {
        let result = parse("{host:item.somefunc(0)}");
        assert!(!result.is_valid);
        assert!(result.is_structurally_valid());
        assert_eq!(result.tokens.len(), 1);
        assert_matches!(
            result.error,
            Some(ExpressionError::Semantic(SemanticError::UnknownFunction { .. }))
        );
    }

    #[test]
    fn test_item_reference_required() {
        assert!(parse("6 & 0 | 0").is_valid);

        let options = ParseOptions::default().with_item_reference_required(true);
        let result = parse_with_options("6 & 0 | 0", &options);
        assert!(!result.is_valid);
        assert_eq!(result.tokens.len(), 5);
        assert_matches!(
            result.error,
            Some(ExpressionError::Semantic(SemanticError::NoItemReference { .. }))
        );
    }

    #[test]
    fn test_remaining_semantic_errors_are_kept() {
        let result = parse("{h:k.foo()}=1 or {h:k.bar()}=1 or {h:k.last()}=1");
        assert_matches!(
            result.error,
            Some(ExpressionError::Semantic(SemanticError::UnknownFunction { ref function, .. })) if function == "foo"
        );
        assert_eq!(result.semantic_errors.len(), 1);
    }

    #[test]
    fn test_function_macro_round_trip() {
        let expressions = [
            "{Zabbix server:agent.ping.last(0)}",
            "{host:key[,80].last(0)}",
            r#"{h:log[/var/log/x,"a b"].str("fatal, \"error\"",#5)}"#,
            "{h:k.count(#10,,eq,1h)}",
        ];
        for expression in expressions {
            let result = parse(expression);
            let function_macro = result.function_macros()[0].clone();
            let rebuilt = parse(&function_macro.to_expression());
            let reparsed = rebuilt.function_macros()[0];
            assert_eq!(reparsed.host, function_macro.host, "{expression}");
            assert_eq!(reparsed.item_key, function_macro.item_key, "{expression}");
            assert_eq!(reparsed.function_name, function_macro.function_name, "{expression}");
            assert_eq!(reparsed.params, function_macro.params, "{expression}");
        }
    }

    #[test]
    fn test_validate_is_idempotent() {
        let options = ParseOptions::default();
        for expression in ["{h:k.last(0)}=1", "{h:k.avg(0)}=1", "1 +"] {
            let first = parse_with_options(expression, &options);
            let again = validate(&first, &options);
            assert_eq!(validate(&again, &options), again);
            assert_eq!(again.is_valid, first.is_valid);
        }
    }

    #[test]
    fn test_validate_with_stricter_options() {
        let relaxed = parse("1=1");
        assert!(relaxed.is_valid);
        let strict = validate(&relaxed, &ParseOptions::default().with_item_reference_required(true));
        assert!(!strict.is_valid);
        assert_eq!(strict.tokens, relaxed.tokens);
    }

    #[test]
    fn test_validate_applies_lld_option() {
        let expression = "{h:k.last(0)}={#M}";
        let relaxed = parse(expression);
        assert!(relaxed.is_valid);

        let no_lld = ParseOptions::default().with_lld_macros(false);
        let strict = validate(&relaxed, &no_lld);
        assert!(!strict.is_valid);
        assert_eq!(strict, parse_with_options(expression, &no_lld));
        assert_matches!(
            strict.error,
            Some(ExpressionError::Syntax(SyntaxError::IllegalTransition { .. }))
        );

        assert!(validate(&strict, &ParseOptions::default()).is_valid);
    }

    #[test]
    fn test_percentile_and_count_arguments() {
        for expression in [
            "{h:k.percentile(#1,,-15)}=1",
            "{h:k.percentile(#1,,1K)}=1",
            "{h:k.percentile(#1,,150)}=1",
            "{h:k.count(#1,,bogus)}=1",
            "{h:k.count(#1,,0)}=1",
        ] {
            let result = parse(expression);
            assert_matches!(
                result.error,
                Some(ExpressionError::Semantic(SemanticError::InvalidParameter { position: 3, .. })),
                "{expression}"
            );
        }

        assert!(parse("{h:k.percentile(#1,,99.5)}=1").is_valid);
        assert!(parse("{h:k.count(#1,5,gt)}=1").is_valid);
        assert!(parse("{h:k.count(#1,,{$OP})}=1").is_valid);
    }

    #[test]
    fn test_format_error_points_at_offset() {
        let result = parse("1 + )");
        let rendered = result.format_error().unwrap();
        assert!(rendered.starts_with("error: "));
        assert!(rendered.contains("  --> 1:5"));
        assert!(rendered.contains("^"));
    }

    #[test]
    fn test_deterministic() {
        let expression = "({h:k.last(0)}>5 or {TRIGGER.VALUE}=1) and -{$LIMIT}<2K";
        assert_eq!(parse(expression), parse(expression));
    }
}
