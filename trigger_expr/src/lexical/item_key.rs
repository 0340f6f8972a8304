//! Item key scanner: `name[param,"quoted",[nested]]`
//!
//! Several bracket groups may follow the name (`key[a][b]`). The bracket part
//! uses the same four states as function parameters but allows nesting.

use super::charset::{is_key_char, run_length};
use super::params::ParamState;
use crate::config::compile_time::expression::MAX_ITEM_KEY_DEPTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ItemKeyError {
    #[error("item key name is empty")]
    EmptyName { offset: usize },

    #[error("unexpected character in item key parameters")]
    UnexpectedCharacter { offset: usize },

    #[error("unbalanced brackets in item key parameters")]
    Unbalanced { offset: usize },

    #[error("quoted item key parameter is not closed")]
    UnterminatedQuote { offset: usize },

    #[error("item key parameters nested deeper than {MAX_ITEM_KEY_DEPTH}")]
    TooDeep { offset: usize },

    #[error("unexpected trailing characters after item key")]
    TrailingCharacters { offset: usize },
}

impl ItemKeyError {
    pub fn offset(&self) -> usize {
        match self {
            Self::EmptyName { offset }
            | Self::UnexpectedCharacter { offset }
            | Self::Unbalanced { offset }
            | Self::UnterminatedQuote { offset }
            | Self::TooDeep { offset }
            | Self::TrailingCharacters { offset } => *offset,
        }
    }
}

/// Scan bracket groups starting at `start` (which should hold `[`).
///
/// Returns the offset of the first byte after the last complete group. When
/// `start` does not hold `[`, returns `start` unchanged.
pub fn scan_key_params(source: &str, start: usize) -> Result<usize, ItemKeyError> {
    let bytes = source.as_bytes();
    let mut state = ParamState::End;
    let mut level = 0usize;
    let mut quote_start = start;
    let mut i = start;

    while i < bytes.len() {
        let c = bytes[i];

        if level == 0 {
            if state == ParamState::End && c == b'[' {
                state = ParamState::New;
            } else {
                break;
            }
        }

        match state {
            ParamState::New => match c {
                b' ' | b',' => {}
                b'[' => {
                    level += 1;
                    if level > MAX_ITEM_KEY_DEPTH {
                        return Err(ItemKeyError::TooDeep { offset: i });
                    }
                }
                b']' => {
                    level = level
                        .checked_sub(1)
                        .ok_or(ItemKeyError::Unbalanced { offset: i })?;
                    state = ParamState::End;
                }
                b'"' => {
                    state = ParamState::Quoted;
                    quote_start = i;
                }
                _ => state = ParamState::Unquoted,
            },
            ParamState::End => match c {
                b' ' => {}
                b',' => state = ParamState::New,
                b']' => {
                    level = level
                        .checked_sub(1)
                        .ok_or(ItemKeyError::Unbalanced { offset: i })?;
                }
                _ => return Err(ItemKeyError::UnexpectedCharacter { offset: i }),
            },
            ParamState::Unquoted => {
                if c == b']' || c == b',' {
                    // Re-read the delimiter in the End state
                    state = ParamState::End;
                    continue;
                }
            }
            ParamState::Quoted => {
                if c == b'"' && bytes[i - 1] != b'\\' {
                    state = ParamState::End;
                }
            }
        }
        i += 1;
    }

    if state == ParamState::Quoted {
        return Err(ItemKeyError::UnterminatedQuote {
            offset: quote_start,
        });
    }
    if level != 0 {
        return Err(ItemKeyError::Unbalanced { offset: i });
    }

    Ok(i)
}

/// Scan a complete item key (name plus optional bracket groups) at `start`.
/// Returns the offset just past it.
pub fn scan_item_key(source: &str, start: usize) -> Result<usize, ItemKeyError> {
    let name_len = run_length(source.as_bytes(), start, is_key_char);
    if name_len == 0 {
        return Err(ItemKeyError::EmptyName { offset: start });
    }
    scan_key_params(source, start + name_len)
}

/// Validate a stand-alone item key; it must be consumed completely
pub fn validate_item_key(key: &str) -> Result<(), ItemKeyError> {
    let end = scan_item_key(key, 0)?;
    if end != key.len() {
        return Err(ItemKeyError::TrailingCharacters { offset: end });
    }
    Ok(())
}
