//! Expression state machine
//!
//! Each step reads one token (or skips one whitespace character) and moves the
//! cursor to the next state. The machine halts at the first character that is
//! not allowed in the current state.

use super::cursor::ParserCursor;
use super::error::{SyntaxError, SyntaxResult};
use super::state::ParseState;
use crate::config::compile_time::expression::MAX_EXPRESSION_LENGTH;
use crate::lexical::charset::is_expression_space;
use crate::lexical::{parse_constant, ConstantScan};
use crate::logging::codes;
use crate::tokens::{Operator, OperatorKind, Token, TokenData, TokenKind};
use crate::utils::SourceMap;
use crate::{log_debug, log_error, log_success};

/// Tokenizes and structurally validates trigger expressions
#[derive(Debug, Clone)]
pub struct ExpressionParser {
    allow_lld_macros: bool,
    trace_tokens: bool,
}

impl ExpressionParser {
    pub fn new(allow_lld_macros: bool) -> Self {
        Self {
            allow_lld_macros,
            trace_tokens: false,
        }
    }

    /// Log every accepted token at debug level
    pub fn with_token_trace(mut self, enabled: bool) -> Self {
        self.trace_tokens = enabled;
        self
    }

    pub fn allow_lld_macros(&self) -> bool {
        self.allow_lld_macros
    }

    /// Run the state machine over `source` and return its tokens
    pub fn parse(&self, source: &str) -> SyntaxResult<Vec<Token>> {
        log_debug!("Starting expression scan", "length" => source.len());

        let source_map = SourceMap::new(source);
        let result = self.run(&source_map);

        match &result {
            Ok(tokens) => {
                log_success!(
                    codes::success::EXPRESSION_TOKENIZED,
                    "Expression tokenized",
                    "tokens" => tokens.len()
                );
            }
            Err(error) => {
                log_error!(
                    error.error_code(),
                    "Expression syntax check failed",
                    span = error.span(),
                    "error" => error,
                    "offset" => error.offset()
                );
            }
        }

        result
    }

    fn run(&self, source_map: &SourceMap<'_>) -> SyntaxResult<Vec<Token>> {
        check_length(source_map)?;
        check_start(source_map)?;

        let length = source_map.source().len();
        let mut cursor = ParserCursor::new();

        while cursor.pos < length {
            cursor = self.step(cursor, source_map)?;
        }

        finish(cursor, source_map)
    }

    fn step(&self, cursor: ParserCursor, source_map: &SourceMap<'_>) -> SyntaxResult<ParserCursor> {
        let bytes = source_map.source().as_bytes();
        if is_expression_space(bytes[cursor.pos]) {
            return Ok(cursor.skip_space());
        }

        let transition = if cursor.state.expects_operand() {
            operand_transition(&cursor, source_map, self.allow_lld_macros)
        } else {
            operator_transition(&cursor, source_map)
        };

        match transition {
            Some((token, state)) => {
                if self.trace_tokens {
                    log_debug!("Token accepted",
                        "kind" => token.kind,
                        "text" => &token.text,
                        "offset" => token.start_offset()
                    );
                }
                cursor.accept(token, state)
            }
            None => Err(diagnose(&cursor, source_map, self.allow_lld_macros)),
        }
    }
}

// ============================================================================
// PRE-CHECKS
// ============================================================================

fn check_length(source_map: &SourceMap<'_>) -> SyntaxResult<()> {
    let length = source_map.source().len();
    if length > MAX_EXPRESSION_LENGTH {
        return Err(SyntaxError::ExpressionTooLong {
            length,
            span: source_map.span(MAX_EXPRESSION_LENGTH, length),
        });
    }
    Ok(())
}

/// The first non-space character must be `(`, `{`, `-` or a digit
fn check_start(source_map: &SourceMap<'_>) -> SyntaxResult<()> {
    let source = source_map.source();
    let first = source
        .char_indices()
        .find(|(_, c)| !c.is_ascii() || !is_expression_space(*c as u8));

    match first {
        None => Err(SyntaxError::EmptyExpression {
            span: source_map.span(0, 0),
        }),
        Some((_, c)) if matches!(c, '(' | '{' | '-') || c.is_ascii_digit() => Ok(()),
        Some((offset, c)) => Err(SyntaxError::IllegalStart {
            found: c,
            span: source_map.span(offset, offset + c.len_utf8()),
        }),
    }
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// `keyword` at `pos`, not followed by a letter or digit
fn keyword_at(bytes: &[u8], pos: usize, keyword: &str) -> bool {
    bytes[pos..].starts_with(keyword.as_bytes())
        && !bytes
            .get(pos + keyword.len())
            .is_some_and(|b| b.is_ascii_alphanumeric())
}

fn operator_token(
    source_map: &SourceMap<'_>,
    pos: usize,
    len: usize,
    kind: OperatorKind,
    op: Operator,
) -> Token {
    let end = pos + len;
    Token::new(
        TokenKind::Operator(kind),
        &source_map.source()[pos..end],
        source_map.span(pos, end),
        TokenData::Operator(op),
    )
}

fn paren_token(source_map: &SourceMap<'_>, pos: usize, kind: TokenKind) -> Token {
    Token::new(
        kind,
        &source_map.source()[pos..pos + 1],
        source_map.span(pos, pos + 1),
        TokenData::None,
    )
}

/// From a state that expects an operand: `-`, `(`, `not` or a constant
fn operand_transition(
    cursor: &ParserCursor,
    source_map: &SourceMap<'_>,
    allow_lld_macros: bool,
) -> Option<(Token, ParseState)> {
    let bytes = source_map.source().as_bytes();
    let pos = cursor.pos;

    match bytes[pos] {
        b'-' if cursor.state != ParseState::AfterMinusOperator => {
            let token = operator_token(source_map, pos, 1, OperatorKind::Minus, Operator::Minus);
            return Some((token, ParseState::AfterMinusOperator));
        }
        b'(' => {
            let token = paren_token(source_map, pos, TokenKind::OpenBrace);
            return Some((token, ParseState::AfterOpenBrace));
        }
        _ => {}
    }

    if cursor.after_space
        && cursor.state.accepts_not_as_operand()
        && keyword_at(bytes, pos, "not")
    {
        let token = operator_token(source_map, pos, 3, OperatorKind::Not, Operator::Not);
        return Some((token, ParseState::AfterNotOperator));
    }

    match parse_constant(source_map, pos, allow_lld_macros) {
        ConstantScan::Found(token) => Some((token, ParseState::AfterConstant)),
        ConstantScan::NotFound(_) => None,
    }
}

/// From after a constant or `)`: `)`, a binary operator, or a logical operator
fn operator_transition(
    cursor: &ParserCursor,
    source_map: &SourceMap<'_>,
) -> Option<(Token, ParseState)> {
    let bytes = source_map.source().as_bytes();
    let pos = cursor.pos;

    if bytes[pos] == b')' && cursor.bracket_depth > 0 {
        let token = paren_token(source_map, pos, TokenKind::CloseBrace);
        return Some((token, ParseState::AfterCloseBrace));
    }

    if let Some((symbol, op)) = Operator::BINARY_SYMBOLS
        .iter()
        .find(|(symbol, _)| bytes[pos..].starts_with(symbol.as_bytes()))
    {
        let token = operator_token(source_map, pos, symbol.len(), OperatorKind::Binary, *op);
        return Some((token, ParseState::AfterBinaryOperator));
    }

    // Legacy symbolic logical operators need no surrounding whitespace
    let legacy = match bytes[pos] {
        b'&' => Some(Operator::And),
        b'|' => Some(Operator::Or),
        _ => None,
    };
    if let Some(op) = legacy {
        let token = operator_token(source_map, pos, 1, OperatorKind::Logical, op);
        return Some((token, ParseState::AfterLogicalOperator));
    }

    if !cursor.after_space {
        return None;
    }

    for (keyword, op) in [("and", Operator::And), ("or", Operator::Or)] {
        if keyword_at(bytes, pos, keyword) {
            let token =
                operator_token(source_map, pos, keyword.len(), OperatorKind::Logical, op);
            return Some((token, ParseState::AfterLogicalOperator));
        }
    }

    if keyword_at(bytes, pos, "not") {
        let token = operator_token(source_map, pos, 3, OperatorKind::Not, Operator::Not);
        return Some((token, ParseState::AfterNotOperator));
    }

    None
}

// ============================================================================
// FAILURE CLASSIFICATION
// ============================================================================

/// Name the error for the character the machine stopped at
fn diagnose(cursor: &ParserCursor, source_map: &SourceMap<'_>, allow_lld_macros: bool) -> SyntaxError {
    let source = source_map.source();
    let pos = cursor.pos;
    let found = source
        .get(pos..)
        .and_then(|rest| rest.chars().next())
        .unwrap_or('\0');
    let span = source_map.span(pos, pos + found.len_utf8());

    match found {
        ')' if cursor.bracket_depth == 0 => SyntaxError::UnexpectedCloseParen { span },
        '}' => SyntaxError::UnmatchedBrace { span },
        '{' if cursor.state.expects_operand() => {
            match parse_constant(source_map, pos, allow_lld_macros) {
                ConstantScan::NotFound(Some(mismatch)) => SyntaxError::malformed_function_macro(
                    mismatch.fault,
                    source_map.span(mismatch.offset, mismatch.offset),
                ),
                _ => SyntaxError::illegal_transition(found, cursor.state, span),
            }
        }
        '.' if cursor
            .last_token()
            .is_some_and(|t| t.kind == TokenKind::Number && t.end_offset() == pos) =>
        {
            let text = cursor
                .last_token()
                .map(|t| format!("{}.", t.text))
                .unwrap_or_default();
            SyntaxError::MalformedNumber { text, span }
        }
        _ => SyntaxError::illegal_transition(found, cursor.state, span),
    }
}

/// Accept only in a terminal state with every parenthesis closed
fn finish(cursor: ParserCursor, source_map: &SourceMap<'_>) -> SyntaxResult<Vec<Token>> {
    // Last byte of the last accepted token; trailing whitespace is not blamed
    let end = cursor
        .last_token()
        .map_or(source_map.source().len(), |token| token.end_offset());
    let span = source_map.span(end.saturating_sub(1), end);

    if !cursor.state.is_terminal() {
        return Err(SyntaxError::unexpected_end(cursor.state, span));
    }
    if cursor.bracket_depth > 0 {
        return Err(SyntaxError::UnclosedParen {
            depth: cursor.bracket_depth,
            span,
        });
    }

    Ok(cursor.tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::FunctionMacroFault;
    use assert_matches::assert_matches;

    fn parse(text: &str) -> SyntaxResult<Vec<Token>> {
        ExpressionParser::new(true).parse(text)
    }

    fn kinds(text: &str) -> Vec<TokenKind> {
        parse(text).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_item_comparison() {
        let tokens = parse("{Zabbix server:agent.ping.last(0)}=1").unwrap();
        assert_eq!(tokens.len(), 3);

        let function_macro = tokens[0].as_function_macro().unwrap();
        assert_eq!(function_macro.host, "Zabbix server");
        assert_eq!(function_macro.item_key, "agent.ping");
        assert_eq!(function_macro.function_name, "last");
        assert_eq!(function_macro.params, vec!["0"]);

        assert_eq!(tokens[1].as_operator(), Some(Operator::Equal));
        assert_eq!(tokens[1].kind, TokenKind::Operator(OperatorKind::Binary));
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].text, "1");
    }

    #[test]
    fn test_empty_and_illegal_start() {
        assert_matches!(parse(""), Err(SyntaxError::EmptyExpression { .. }));
        assert_matches!(parse(" \t\n"), Err(SyntaxError::EmptyExpression { .. }));

        let error = parse("  and 1").unwrap_err();
        assert_matches!(error, SyntaxError::IllegalStart { found: 'a', .. });
        assert_eq!(error.offset(), 2);
    }

    #[test]
    fn test_bracketed_item_key() {
        let tokens = parse("{host:key[,80].last(0)}").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].as_function_macro().unwrap().item_key, "key[,80]");
    }

    #[test]
    fn test_lld_macro_switch() {
        let text = "{host:item.last(0)} | {#MACRO}";

        let error = ExpressionParser::new(false).parse(text).unwrap_err();
        assert_matches!(
            error,
            SyntaxError::IllegalTransition {
                found: '{',
                state: ParseState::AfterLogicalOperator,
                ..
            }
        );
        assert_eq!(error.offset(), 22);

        let tokens = ExpressionParser::new(true).parse(text).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].kind, TokenKind::LldMacro);
        assert_eq!(tokens[2].macro_name(), Some("MACRO"));
    }

    #[test]
    fn test_word_operators_need_space_before() {
        assert_eq!(
            kinds("1 and 2 or not 3"),
            vec![
                TokenKind::Number,
                TokenKind::Operator(OperatorKind::Logical),
                TokenKind::Number,
                TokenKind::Operator(OperatorKind::Logical),
                TokenKind::Operator(OperatorKind::Not),
                TokenKind::Number,
            ]
        );

        let error = parse("1and 2").unwrap_err();
        assert_matches!(error, SyntaxError::IllegalTransition { found: 'a', .. });
        assert_eq!(error.offset(), 1);

        assert_matches!(
            parse("1 andy 2"),
            Err(SyntaxError::IllegalTransition { found: 'a', .. })
        );
    }

    #[test]
    fn test_legacy_operators() {
        let tokens = parse("{h:k.last(0)}#0&{TRIGGER.VALUE}=1|{$M}>=5K").unwrap();
        let ops: Vec<Operator> = tokens.iter().filter_map(|t| t.as_operator()).collect();
        assert_eq!(
            ops,
            vec![
                Operator::NotEqual,
                Operator::And,
                Operator::Equal,
                Operator::Or,
                Operator::GreaterOrEqual,
            ]
        );
        assert_eq!(tokens[4].kind, TokenKind::BuiltinMacro);
        assert_eq!(tokens[8].kind, TokenKind::UserMacro);
    }

    #[test]
    fn test_two_character_operators_win() {
        let tokens = parse("1<=2").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, "<=");

        let tokens = parse("1<>2").unwrap();
        assert_eq!(tokens[1].as_operator(), Some(Operator::NotEqual));
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(
            kinds("-(-1)"),
            vec![
                TokenKind::Operator(OperatorKind::Minus),
                TokenKind::OpenBrace,
                TokenKind::Operator(OperatorKind::Minus),
                TokenKind::Number,
                TokenKind::CloseBrace,
            ]
        );
        assert_matches!(
            parse("--1"),
            Err(SyntaxError::IllegalTransition {
                found: '-',
                state: ParseState::AfterMinusOperator,
                ..
            })
        );
        assert_eq!(
            parse("1--1").unwrap()[1].kind,
            TokenKind::Operator(OperatorKind::Binary)
        );
    }

    #[test]
    fn test_unexpected_end() {
        let error = parse("1+").unwrap_err();
        assert_matches!(
            error,
            SyntaxError::UnexpectedEnd {
                state: ParseState::AfterBinaryOperator,
                ..
            }
        );
        assert_eq!(error.offset(), 1);

        assert_matches!(parse("1 or "), Err(SyntaxError::UnexpectedEnd { .. }));
    }

    #[test]
    fn test_unexpected_end_ignores_trailing_whitespace() {
        let error = parse("1+ ").unwrap_err();
        assert_matches!(error, SyntaxError::UnexpectedEnd { .. });
        assert_eq!(error.offset(), 1);

        let error = parse("(1 \n\t").unwrap_err();
        assert_matches!(error, SyntaxError::UnclosedParen { depth: 1, .. });
        assert_eq!(error.offset(), 1);
    }

    #[test]
    fn test_parenthesis_balance() {
        assert_matches!(parse("(1"), Err(SyntaxError::UnclosedParen { depth: 1, .. }));

        let error = parse("1)").unwrap_err();
        assert_matches!(error, SyntaxError::UnexpectedCloseParen { .. });
        assert_eq!(error.offset(), 1);

        assert_matches!(
            parse("(1+)"),
            Err(SyntaxError::IllegalTransition { found: ')', .. })
        );
    }

    #[test]
    fn test_stray_brace_and_bad_number() {
        assert_matches!(parse("1}"), Err(SyntaxError::UnmatchedBrace { .. }));

        let error = parse("1.2.3").unwrap_err();
        assert_matches!(error, SyntaxError::MalformedNumber { ref text, .. } if text == "1.2.");
        assert_eq!(error.offset(), 3);

        assert_matches!(parse("1."), Err(SyntaxError::MalformedNumber { .. }));
    }

    #[test]
    fn test_malformed_function_macro() {
        let error = parse("{host:key.last(0)").unwrap_err();
        assert_matches!(
            error,
            SyntaxError::MalformedFunctionMacro {
                fault: FunctionMacroFault::MissingCloseBrace,
                ..
            }
        );
        assert_eq!(error.offset(), 17);

        assert_matches!(
            parse(r#"1={host:key.str("x)}"#),
            Err(SyntaxError::MalformedFunctionMacro { .. })
        );
    }

    #[test]
    fn test_not_rules() {
        assert!(parse("1 = not 0").is_ok());
        assert!(parse("(not 1)").is_err());
        assert!(parse("1 or not(2)").is_ok());
        assert!(parse("1 or not2").is_err());
    }

    #[test]
    fn test_token_limit_errors_are_limits() {
        let long = "1".repeat(MAX_EXPRESSION_LENGTH + 1);
        let error = parse(&long).unwrap_err();
        assert_matches!(error, SyntaxError::ExpressionTooLong { .. });
        assert!(error.is_limit_violation());
    }

    #[test]
    fn test_deterministic() {
        let text = "({h:k.avg(5m)}>10 and {h:k.last()}<>{$LIMIT}) or -{TRIGGER.VALUE}";
        assert_eq!(parse(text), parse(text));
        assert_eq!(parse("1++"), parse("1++"));
    }

    #[test]
    fn test_valid_results_have_balanced_parentheses() {
        for text in [
            "((1))",
            "(1+(2*3))/4",
            "-({h:k.last(0)}=1) & ({h:k.min(#3)}<0 | 1)",
        ] {
            let tokens = parse(text).unwrap();
            let open = tokens.iter().filter(|t| t.kind == TokenKind::OpenBrace).count();
            let close = tokens.iter().filter(|t| t.kind == TokenKind::CloseBrace).count();
            assert_eq!(open, close, "{}", text);
        }
    }

    #[test]
    fn test_token_spans_cover_source_text() {
        let text = "{h:k.last(0)} > 5m\nand {$X}";
        for token in parse(text).unwrap() {
            assert_eq!(token.span.slice(text), token.text);
        }
    }
}
