//! Pass 2: expression structure
//!
//! A seven-state machine walks the expression once, calling the constant
//! scanners wherever an operand may appear. It stops at the first character
//! not allowed in the current state and reports it with a span.

pub mod cursor;
mod error;
pub mod parser;
pub mod state;

pub use cursor::ParserCursor;
pub use error::{SyntaxError, SyntaxResult};
pub use parser::ExpressionParser;
pub use state::ParseState;

use crate::tokens::Token;

/// Tokenize `expression` with default scanner settings
pub fn tokenize(expression: &str, allow_lld_macros: bool) -> SyntaxResult<Vec<Token>> {
    ExpressionParser::new(allow_lld_macros).parse(expression)
}
