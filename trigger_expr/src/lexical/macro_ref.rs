//! Built-in, user (`{$NAME}`) and low-level discovery (`{#NAME}`) macro references
use super::charset::{is_macro_char, run_length};

/// Built-in macros allowed as constants
pub const BUILTIN_MACROS: &[&str] = &["{TRIGGER.VALUE}"];

/// Exact match against the built-in set. Returns the macro name and end offset.
pub fn parse_builtin_macro(source: &str, start: usize) -> Option<(String, usize)> {
    let rest = source.get(start..)?;
    BUILTIN_MACROS
        .iter()
        .find(|m| rest.starts_with(**m))
        .map(|m| (m[1..m.len() - 1].to_string(), start + m.len()))
}

/// `{` sigil name `}`
fn parse_sigil_macro(source: &str, start: usize, sigil: u8) -> Option<(String, usize)> {
    let bytes = source.as_bytes();
    if bytes.get(start) != Some(&b'{') || bytes.get(start + 1) != Some(&sigil) {
        return None;
    }

    let name_start = start + 2;
    let name_len = run_length(bytes, name_start, is_macro_char);
    if name_len == 0 {
        return None;
    }

    let close = name_start + name_len;
    if bytes.get(close) != Some(&b'}') {
        return None;
    }

    Some((source[name_start..close].to_string(), close + 1))
}

pub fn parse_user_macro(source: &str, start: usize) -> Option<(String, usize)> {
    parse_sigil_macro(source, start, b'$')
}

pub fn parse_lld_macro(source: &str, start: usize) -> Option<(String, usize)> {
    parse_sigil_macro(source, start, b'#')
}

/// True when the whole of `text` is a single user macro
pub fn is_user_macro(text: &str) -> bool {
    matches!(parse_user_macro(text, 0), Some((_, end)) if end == text.len())
}

/// True when the whole of `text` is a single LLD macro
pub fn is_lld_macro(text: &str) -> bool {
    matches!(parse_lld_macro(text, 0), Some((_, end)) if end == text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_macro() {
        assert_eq!(
            parse_builtin_macro("{TRIGGER.VALUE}=1", 0),
            Some(("TRIGGER.VALUE".to_string(), 15))
        );
        assert_eq!(parse_builtin_macro("{TRIGGER.STATUS}", 0), None);
    }

    #[test]
    fn test_user_macro() {
        assert_eq!(
            parse_user_macro("1={$MY.MACRO_1}", 2),
            Some(("MY.MACRO_1".to_string(), 15))
        );
        assert_eq!(parse_user_macro("{$}", 0), None);
        assert_eq!(parse_user_macro("{$lower}", 0), None);
        assert_eq!(parse_user_macro("{$OPEN", 0), None);
    }

    #[test]
    fn test_lld_macro() {
        assert_eq!(
            parse_lld_macro("{#FSNAME}", 0),
            Some(("FSNAME".to_string(), 9))
        );
        assert_eq!(parse_lld_macro("{$FSNAME}", 0), None);
    }

    #[test]
    fn test_whole_text_predicates() {
        assert!(is_user_macro("{$PERIOD}"));
        assert!(!is_user_macro("{$PERIOD}s"));
        assert!(is_lld_macro("{#IFNAME}"));
        assert!(!is_lld_macro(" {#IFNAME}"));
    }
}
