//! Constant dispatcher: tries every operand form at a position
use super::function_macro::{parse_function_macro, FunctionMacroMismatch};
use super::macro_ref::{parse_builtin_macro, parse_lld_macro, parse_user_macro};
use super::number::parse_number;
use crate::tokens::{Token, TokenData, TokenKind};
use crate::utils::SourceMap;

/// Outcome of trying to read a constant
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantScan {
    Found(Token),
    /// Nothing here is a constant; carries the function macro diagnosis, if any
    NotFound(Option<FunctionMacroMismatch>),
}

/// Try function macro, number, built-in macro, user macro and LLD macro in that order
pub fn parse_constant(source_map: &SourceMap<'_>, pos: usize, allow_lld_macros: bool) -> ConstantScan {
    let source = source_map.source();

    let token = |kind: TokenKind, end: usize, data: TokenData| {
        Token::new(kind, &source[pos..end], source_map.span(pos, end), data)
    };

    let mismatch = match parse_function_macro(source, pos) {
        Ok((function_macro, end)) => {
            return ConstantScan::Found(token(
                TokenKind::FunctionMacro,
                end,
                TokenData::FunctionMacro(function_macro),
            ));
        }
        Err(mismatch) => mismatch,
    };

    if let Some((number, end)) = parse_number(source, pos) {
        return ConstantScan::Found(token(TokenKind::Number, end, TokenData::Number(number)));
    }

    if let Some((name, end)) = parse_builtin_macro(source, pos) {
        return ConstantScan::Found(token(TokenKind::BuiltinMacro, end, TokenData::Macro(name)));
    }

    if let Some((name, end)) = parse_user_macro(source, pos) {
        return ConstantScan::Found(token(TokenKind::UserMacro, end, TokenData::Macro(name)));
    }

    if allow_lld_macros {
        if let Some((name, end)) = parse_lld_macro(source, pos) {
            return ConstantScan::Found(token(TokenKind::LldMacro, end, TokenData::Macro(name)));
        }
    }

    ConstantScan::NotFound(mismatch.committed.then_some(mismatch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::function_macro::FunctionMacroFault;

    fn scan(text: &str, allow_lld: bool) -> ConstantScan {
        parse_constant(&SourceMap::new(text), 0, allow_lld)
    }

    fn found_kind(scan: ConstantScan) -> Option<TokenKind> {
        match scan {
            ConstantScan::Found(token) => Some(token.kind),
            ConstantScan::NotFound(_) => None,
        }
    }

    #[test]
    fn test_dispatch_order() {
        assert_eq!(found_kind(scan("{h:k.last()}", true)), Some(TokenKind::FunctionMacro));
        assert_eq!(found_kind(scan("10K", true)), Some(TokenKind::Number));
        assert_eq!(found_kind(scan("{TRIGGER.VALUE}", true)), Some(TokenKind::BuiltinMacro));
        assert_eq!(found_kind(scan("{$LIMIT}", true)), Some(TokenKind::UserMacro));
        assert_eq!(found_kind(scan("{#IFNAME}", true)), Some(TokenKind::LldMacro));
    }

    #[test]
    fn test_lld_disabled() {
        assert_eq!(scan("{#IFNAME}", false), ConstantScan::NotFound(None));
    }

    #[test]
    fn test_token_text_and_span() {
        let map = SourceMap::new("1+{$A}");
        let ConstantScan::Found(token) = parse_constant(&map, 2, true) else {
            panic!("expected a user macro");
        };
        assert_eq!(token.text, "{$A}");
        assert_eq!(token.start_offset(), 2);
        assert_eq!(token.length(), 4);
        assert_eq!(token.macro_name(), Some("A"));
    }

    #[test]
    fn test_committed_function_macro_diagnosis() {
        match scan("{host:key.last(0)", true) {
            ConstantScan::NotFound(Some(mismatch)) => {
                assert_eq!(mismatch.fault, FunctionMacroFault::MissingCloseBrace);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(scan("+", true), ConstantScan::NotFound(None));
    }
}
