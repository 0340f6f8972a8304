//! Parameter kind checks
use super::functions::{ParamKind, ParamSpec};
use crate::lexical::charset::{is_number_suffix, is_time_suffix, run_length};
use crate::lexical::{is_lld_macro, is_user_macro};

/// Outcome of checking one parameter against its spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamCheck {
    Accepted,
    /// Mandatory slot left empty
    Missing,
    /// Value present but not of the expected kind
    Rejected,
}

pub fn check_param(value: &str, spec: &ParamSpec, allow_lld_macros: bool) -> ParamCheck {
    if value.is_empty() {
        return if spec.mandatory {
            ParamCheck::Missing
        } else {
            ParamCheck::Accepted
        };
    }

    if is_macro_placeholder(value, allow_lld_macros) || matches_kind(value, spec) {
        ParamCheck::Accepted
    } else {
        ParamCheck::Rejected
    }
}

/// Macros stand in for any kind; their value is only known at evaluation time
pub fn is_macro_placeholder(value: &str, allow_lld_macros: bool) -> bool {
    is_user_macro(value) || (allow_lld_macros && is_lld_macro(value))
}

pub fn matches_kind(value: &str, spec: &ParamSpec) -> bool {
    match spec.kind {
        ParamKind::StringOrUserMacro => true,
        ParamKind::SecondsOrUserMacro => is_seconds(value, spec.allow_zero),
        ParamKind::SecondsOrCountOrUserMacro => {
            is_value_count(value) || is_seconds(value, spec.allow_zero)
        }
        ParamKind::NumericOrUserMacro => is_numeric(value),
        ParamKind::PercentOrUserMacro => is_percent(value),
        ParamKind::OperatorOrUserMacro => COUNT_OPERATORS.contains(&value),
    }
}

/// Comparison operators accepted by `count`
pub const COUNT_OPERATORS: &[&str] = &[
    "eq", "ne", "gt", "ge", "lt", "le", "like", "band", "regexp", "iregexp",
];

/// `digits[smhdw]`
pub fn is_seconds(value: &str, allow_zero: bool) -> bool {
    let bytes = value.as_bytes();
    let digits = run_length(bytes, 0, |b| b.is_ascii_digit());
    if digits == 0 {
        return false;
    }

    let rest = &bytes[digits..];
    let well_formed = match rest {
        [] => true,
        [suffix] => is_time_suffix(*suffix),
        _ => false,
    };

    well_formed && (allow_zero || bytes[..digits].iter().any(|&b| b != b'0'))
}

/// `#N` with N > 0
pub fn is_value_count(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(count) => {
            !count.is_empty()
                && count.bytes().all(|b| b.is_ascii_digit())
                && count.bytes().any(|b| b != b'0')
        }
        None => false,
    }
}

/// `[-]digits[.digits][suffix]`
pub fn is_numeric(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut pos = usize::from(bytes.first() == Some(&b'-'));

    let int_len = run_length(bytes, pos, |b| b.is_ascii_digit());
    if int_len == 0 {
        return false;
    }
    pos += int_len;

    if bytes.get(pos) == Some(&b'.') {
        let frac_len = run_length(bytes, pos + 1, |b| b.is_ascii_digit());
        if frac_len == 0 {
            return false;
        }
        pos += 1 + frac_len;
    }

    match &bytes[pos..] {
        [] => true,
        [suffix] => is_number_suffix(*suffix),
        _ => false,
    }
}

/// `digits[.digits]` with at most four decimals, between 0 and 100
pub fn is_percent(value: &str) -> bool {
    let (int_part, frac_part) = value.split_once('.').unwrap_or((value, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    if int_part.is_empty() && frac_part.is_empty() {
        return false;
    }
    if !all_digits(int_part) || !all_digits(frac_part) || frac_part.len() > 4 {
        return false;
    }

    let whole = int_part.trim_start_matches('0');
    match whole.len() {
        0..=2 => true,
        3 => whole == "100" && frac_part.bytes().all(|b| b == b'0'),
        _ => false,
    }
}
