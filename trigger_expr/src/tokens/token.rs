//! Token types produced by the expression scanner
use crate::lexical::function_macro::FunctionMacro;
use crate::lexical::number::Number;
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator tokens fall into four grammatical roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    Binary,
    Logical,
    Not,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    OpenBrace,
    CloseBrace,
    Operator(OperatorKind),
    Number,
    FunctionMacro,
    BuiltinMacro,
    UserMacro,
    LldMacro,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::OpenBrace => "open_brace",
            TokenKind::CloseBrace => "close_brace",
            TokenKind::Operator(OperatorKind::Binary) => "binary_operator",
            TokenKind::Operator(OperatorKind::Logical) => "logical_operator",
            TokenKind::Operator(OperatorKind::Not) => "not_operator",
            TokenKind::Operator(OperatorKind::Minus) => "minus_operator",
            TokenKind::Number => "number",
            TokenKind::FunctionMacro => "function_macro",
            TokenKind::BuiltinMacro => "builtin_macro",
            TokenKind::UserMacro => "user_macro",
            TokenKind::LldMacro => "lld_macro",
        }
    }

    /// True for tokens that can stand as an operand
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            TokenKind::Number
                | TokenKind::FunctionMacro
                | TokenKind::BuiltinMacro
                | TokenKind::UserMacro
                | TokenKind::LldMacro
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
    Plus,
    Minus,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    And,
    Or,
    Not,
}

impl Operator {
    /// Symbolic binary operators, longest first so `<=` wins over `<`
    pub const BINARY_SYMBOLS: &'static [(&'static str, Operator)] = &[
        ("<=", Operator::LessOrEqual),
        (">=", Operator::GreaterOrEqual),
        ("<>", Operator::NotEqual),
        ("<", Operator::Less),
        (">", Operator::Greater),
        ("+", Operator::Plus),
        ("-", Operator::Minus),
        ("/", Operator::Divide),
        ("*", Operator::Multiply),
        ("=", Operator::Equal),
        ("#", Operator::NotEqual),
    ];

    pub fn kind(&self) -> OperatorKind {
        match self {
            Operator::And | Operator::Or => OperatorKind::Logical,
            Operator::Not => OperatorKind::Not,
            _ => OperatorKind::Binary,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::LessOrEqual => "<=",
            Operator::GreaterOrEqual => ">=",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TokenData {
    None,
    Operator(Operator),
    Number(Number),
    FunctionMacro(FunctionMacro),
    /// Macro name without braces and sigil, e.g. `MACRO` for `{$MACRO}`
    Macro(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text of the token
    pub text: String,
    pub span: Span,
    pub data: TokenData,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span, data: TokenData) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            data,
        }
    }

    /// Byte offset of the first character
    pub fn start_offset(&self) -> usize {
        self.span.start.offset
    }

    /// Length in bytes
    pub fn length(&self) -> usize {
        self.span.len()
    }

    pub fn end_offset(&self) -> usize {
        self.span.end.offset
    }

    pub fn as_function_macro(&self) -> Option<&FunctionMacro> {
        match &self.data {
            TokenData::FunctionMacro(function_macro) => Some(function_macro),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match &self.data {
            TokenData::Number(number) => Some(number),
            _ => None,
        }
    }

    pub fn as_operator(&self) -> Option<Operator> {
        match &self.data {
            TokenData::Operator(op) => Some(*op),
            _ => None,
        }
    }

    pub fn macro_name(&self) -> Option<&str> {
        match &self.data {
            TokenData::Macro(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' at {}", self.kind, self.text, self.start_offset())
    }
}
