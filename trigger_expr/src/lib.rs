// Internal modules
pub mod config;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod semantic_analysis;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use lexical::{FunctionMacro, Number};
pub use pipeline::{
    parse, parse_with_options, validate, ExpressionError, ParseOptions, ParseResult,
};
pub use tokens::{Token, TokenKind};

// Re-export the serializable view for tooling
pub use pipeline::output::ExpressionOutput;
