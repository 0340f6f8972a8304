//! Quote-aware scanner for function parameter lists
//!
//! Parameters are comma separated and terminated by `)`. A parameter is either
//! unquoted (trailing whitespace trimmed) or double quoted, where `\"` stands
//! for a literal quote. After a closing quote only spaces may appear before the
//! next `,` or the closing `)`.

use crate::config::compile_time::expression::MAX_FUNCTION_PARAMETERS;

/// Scanner state, shared with the item key bracket scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamState {
    /// Before a parameter; leading spaces are skipped
    New,
    /// After a quoted parameter
    End,
    Unquoted,
    Quoted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParamScanError {
    #[error("parameter list is not closed with ')'")]
    Unterminated { offset: usize },

    #[error("quoted parameter is not closed")]
    UnterminatedQuote { offset: usize },

    #[error("unexpected character after quoted parameter")]
    UnexpectedAfterQuote { offset: usize },

    #[error("more than {MAX_FUNCTION_PARAMETERS} parameters")]
    TooManyParameters { offset: usize },
}

impl ParamScanError {
    pub fn offset(&self) -> usize {
        match self {
            Self::Unterminated { offset }
            | Self::UnterminatedQuote { offset }
            | Self::UnexpectedAfterQuote { offset }
            | Self::TooManyParameters { offset } => *offset,
        }
    }
}

/// Strip the surrounding quotes and unescape `\"`
pub fn unquote_param(quoted: &str) -> String {
    let inner = quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(quoted);
    inner.replace("\\\"", "\"")
}

/// Quote a parameter if it could not be read back unquoted
pub fn quote_param(param: &str) -> String {
    let needs_quotes = param.starts_with(' ')
        || param.starts_with('"')
        || param.contains(',')
        || param.contains(')')
        || param.ends_with(char::is_whitespace);

    if needs_quotes {
        format!("\"{}\"", param.replace('"', "\\\""))
    } else {
        param.to_string()
    }
}

fn push_param(params: &mut Vec<String>, param: String, offset: usize) -> Result<(), ParamScanError> {
    if params.len() >= MAX_FUNCTION_PARAMETERS {
        return Err(ParamScanError::TooManyParameters { offset });
    }
    params.push(param);
    Ok(())
}

/// Scan the parameters following an opening `(` at `start - 1`.
///
/// Returns the parameters in order (empty ones included) and the offset just
/// past the closing `)`. `f()` yields a single empty parameter.
pub fn scan_function_params(
    source: &str,
    start: usize,
) -> Result<(Vec<String>, usize), ParamScanError> {
    let bytes = source.as_bytes();
    let mut params = Vec::new();
    let mut state = ParamState::New;
    let mut param_start = start;
    let mut i = start;

    while i < bytes.len() {
        let c = bytes[i];
        match state {
            ParamState::New => match c {
                b' ' => {}
                b',' => push_param(&mut params, String::new(), i)?,
                b')' => {
                    push_param(&mut params, String::new(), i)?;
                    return Ok((params, i + 1));
                }
                b'"' => {
                    state = ParamState::Quoted;
                    param_start = i;
                }
                _ => {
                    state = ParamState::Unquoted;
                    param_start = i;
                }
            },
            ParamState::Unquoted => match c {
                b',' | b')' => {
                    let param = source[param_start..i].trim_end().to_string();
                    push_param(&mut params, param, i)?;
                    if c == b')' {
                        return Ok((params, i + 1));
                    }
                    state = ParamState::New;
                }
                _ => {}
            },
            ParamState::Quoted => {
                if c == b'"' && bytes[i - 1] != b'\\' {
                    push_param(&mut params, unquote_param(&source[param_start..=i]), i)?;
                    state = ParamState::End;
                }
            }
            ParamState::End => match c {
                b' ' => {}
                b',' => state = ParamState::New,
                b')' => return Ok((params, i + 1)),
                _ => return Err(ParamScanError::UnexpectedAfterQuote { offset: i }),
            },
        }
        i += 1;
    }

    if state == ParamState::Quoted {
        Err(ParamScanError::UnterminatedQuote {
            offset: param_start,
        })
    } else {
        Err(ParamScanError::Unterminated { offset: bytes.len() })
    }
}
