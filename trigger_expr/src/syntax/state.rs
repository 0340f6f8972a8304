//! States of the expression state machine
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named after what was accepted last
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseState {
    AfterOpenBrace,
    AfterBinaryOperator,
    AfterLogicalOperator,
    AfterNotOperator,
    AfterMinusOperator,
    AfterCloseBrace,
    AfterConstant,
}

impl ParseState {
    pub const INITIAL: ParseState = ParseState::AfterOpenBrace;

    /// States in which an operand (or `(`, `-`, `not`) must come next
    pub fn expects_operand(&self) -> bool {
        !matches!(self, ParseState::AfterCloseBrace | ParseState::AfterConstant)
    }

    /// States in which the input may end
    pub fn is_terminal(&self) -> bool {
        !self.expects_operand()
    }

    /// `not` is accepted only after a binary or logical operator
    pub fn accepts_not_as_operand(&self) -> bool {
        matches!(
            self,
            ParseState::AfterBinaryOperator | ParseState::AfterLogicalOperator
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParseState::AfterOpenBrace => "opening parenthesis",
            ParseState::AfterBinaryOperator => "binary operator",
            ParseState::AfterLogicalOperator => "logical operator",
            ParseState::AfterNotOperator => "'not'",
            ParseState::AfterMinusOperator => "unary minus",
            ParseState::AfterCloseBrace => "closing parenthesis",
            ParseState::AfterConstant => "constant",
        }
    }
}

impl Default for ParseState {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(ParseState::AfterConstant.is_terminal());
        assert!(ParseState::AfterCloseBrace.is_terminal());
        assert!(!ParseState::AfterOpenBrace.is_terminal());
        assert!(!ParseState::AfterMinusOperator.is_terminal());
        assert_eq!(ParseState::default(), ParseState::AfterOpenBrace);
    }

    #[test]
    fn test_not_acceptance() {
        assert!(ParseState::AfterLogicalOperator.accepts_not_as_operand());
        assert!(ParseState::AfterBinaryOperator.accepts_not_as_operand());
        assert!(!ParseState::AfterOpenBrace.accepts_not_as_operand());
        assert!(!ParseState::AfterNotOperator.accepts_not_as_operand());
    }
}
