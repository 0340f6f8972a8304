//! Parser position threaded by value through the state machine steps
use super::error::{SyntaxError, SyntaxResult};
use super::state::ParseState;
use crate::config::compile_time::expression::{MAX_NESTING_DEPTH, MAX_TOKEN_COUNT};
use crate::tokens::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ParserCursor {
    /// Byte offset of the next unread character
    pub pos: usize,
    pub state: ParseState,
    /// Open parentheses not yet closed
    pub bracket_depth: usize,
    /// Whitespace was skipped since the last token
    pub after_space: bool,
    pub tokens: Vec<Token>,
}

impl ParserCursor {
    pub fn new() -> Self {
        Self {
            pos: 0,
            state: ParseState::INITIAL,
            bracket_depth: 0,
            after_space: false,
            tokens: Vec::new(),
        }
    }

    pub fn last_token(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// Skip one whitespace character
    pub fn skip_space(mut self) -> Self {
        self.pos += 1;
        self.after_space = true;
        self
    }

    /// Append a token and move to `state`, enforcing the depth and token limits
    pub fn accept(mut self, token: Token, state: ParseState) -> SyntaxResult<Self> {
        if self.tokens.len() >= MAX_TOKEN_COUNT {
            return Err(SyntaxError::TooManyTokens {
                count: self.tokens.len() + 1,
                span: token.span,
            });
        }

        match token.kind {
            TokenKind::OpenBrace => {
                if self.bracket_depth >= MAX_NESTING_DEPTH {
                    return Err(SyntaxError::NestingTooDeep {
                        depth: self.bracket_depth + 1,
                        span: token.span,
                    });
                }
                self.bracket_depth += 1;
            }
            TokenKind::CloseBrace => {
                self.bracket_depth = self
                    .bracket_depth
                    .checked_sub(1)
                    .ok_or(SyntaxError::UnexpectedCloseParen { span: token.span })?;
            }
            _ => {}
        }

        self.pos = token.end_offset();
        self.after_space = false;
        self.state = state;
        self.tokens.push(token);
        Ok(self)
    }
}

impl Default for ParserCursor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenData;
    use crate::utils::Span;
    use assert_matches::assert_matches;

    fn brace(kind: TokenKind, offset: usize) -> Token {
        let text = if kind == TokenKind::OpenBrace { "(" } else { ")" };
        Token::new(kind, text, Span::from_offsets(offset, offset + 1), TokenData::None)
    }

    #[test]
    fn test_accept_tracks_depth_and_position() {
        let cursor = ParserCursor::new()
            .accept(brace(TokenKind::OpenBrace, 0), ParseState::AfterOpenBrace)
            .unwrap();
        assert_eq!(cursor.bracket_depth, 1);
        assert_eq!(cursor.pos, 1);

        let cursor = cursor.skip_space();
        assert!(cursor.after_space);
        assert_eq!(cursor.pos, 2);

        let cursor = cursor
            .accept(brace(TokenKind::CloseBrace, 2), ParseState::AfterCloseBrace)
            .unwrap();
        assert_eq!(cursor.bracket_depth, 0);
        assert!(!cursor.after_space);
        assert_eq!(cursor.tokens.len(), 2);
    }

    #[test]
    fn test_close_without_open() {
        let result =
            ParserCursor::new().accept(brace(TokenKind::CloseBrace, 0), ParseState::AfterCloseBrace);
        assert_matches!(result, Err(SyntaxError::UnexpectedCloseParen { .. }));
    }

    #[test]
    fn test_nesting_limit() {
        let mut cursor = ParserCursor::new();
        for offset in 0..MAX_NESTING_DEPTH {
            cursor = cursor
                .accept(brace(TokenKind::OpenBrace, offset), ParseState::AfterOpenBrace)
                .unwrap();
        }
        let result = cursor.accept(
            brace(TokenKind::OpenBrace, MAX_NESTING_DEPTH),
            ParseState::AfterOpenBrace,
        );
        assert_matches!(result, Err(SyntaxError::NestingTooDeep { .. }));
    }
}
