//! Token model for trigger expressions
//!
//! The scanner emits a flat list of tokens: parentheses, operators and constants.
//! Constants carry their parsed substructure (`Number`, `FunctionMacro` or a macro
//! name) in `TokenData`, and every token records its exact source text and span.

pub mod token;

pub use token::{Operator, OperatorKind, Token, TokenData, TokenKind};

pub use crate::utils::{Position, SourceMap, Span};
