//! Character classes used by the scanners
//!
//! Every class is ASCII-only, so scanners work on bytes and slice the source only
//! at positions where one of these bytes was seen.

/// Host names: letters, digits, `.`, `_`, `-` and space
pub const fn is_host_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-' | b' ')
}

/// Item key names: letters, digits, `.`, `_`, `-`
pub const fn is_key_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-')
}

/// Trigger function names
pub const fn is_function_char(b: u8) -> bool {
    b.is_ascii_lowercase()
}

/// User and LLD macro names: uppercase letters, digits, `.`, `_`
pub const fn is_macro_char(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || matches!(b, b'.' | b'_')
}

/// Whitespace skipped between tokens
pub const fn is_expression_space(b: u8) -> bool {
    matches!(b, b' ' | b'\r' | b'\n' | b'\t')
}

/// Unit suffixes accepted after a numeric constant
pub const fn is_number_suffix(b: u8) -> bool {
    matches!(
        b,
        b's' | b'm' | b'h' | b'd' | b'w' | b'K' | b'M' | b'G' | b'T' | b'P' | b'E' | b'Z' | b'Y'
    )
}

/// Time suffixes accepted in function period parameters
pub const fn is_time_suffix(b: u8) -> bool {
    matches!(b, b's' | b'm' | b'h' | b'd' | b'w')
}

/// Length of the run starting at `start` whose bytes satisfy `class`
pub fn run_length(bytes: &[u8], start: usize, class: fn(u8) -> bool) -> usize {
    bytes
        .get(start..)
        .map(|rest| rest.iter().take_while(|&&b| class(b)).count())
        .unwrap_or(0)
}
