//! Numeric constants: `digits[.digits][suffix]`
use super::charset::{is_number_suffix, run_length};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Number {
    /// Digits with at most one decimal point, without the suffix
    pub literal: String,
    pub suffix: Option<char>,
}

impl Number {
    /// Multiplier for a unit suffix: seconds for time units, powers of 1024 for sizes
    pub fn multiplier(suffix: char) -> f64 {
        match suffix {
            's' => 1.0,
            'm' => 60.0,
            'h' => 3_600.0,
            'd' => 86_400.0,
            'w' => 604_800.0,
            'K' => 1024f64,
            'M' => 1024f64.powi(2),
            'G' => 1024f64.powi(3),
            'T' => 1024f64.powi(4),
            'P' => 1024f64.powi(5),
            'E' => 1024f64.powi(6),
            'Z' => 1024f64.powi(7),
            'Y' => 1024f64.powi(8),
            _ => 1.0,
        }
    }

    /// Value with the suffix multiplier applied
    pub fn value(&self) -> f64 {
        let base: f64 = self.literal.parse().unwrap_or(0.0);
        base * self.suffix.map(Self::multiplier).unwrap_or(1.0)
    }

    pub fn is_integer(&self) -> bool {
        !self.literal.contains('.')
    }

    /// Source text of the constant
    pub fn text(&self) -> String {
        match self.suffix {
            Some(suffix) => format!("{}{}", self.literal, suffix),
            None => self.literal.clone(),
        }
    }
}

/// Scan a number at `start`. Returns the number and the offset just past it.
///
/// The decimal point is taken only when a digit follows it, so `1.` scans as `1`
/// and leaves the `.` for the caller to reject.
pub fn parse_number(source: &str, start: usize) -> Option<(Number, usize)> {
    let bytes = source.as_bytes();

    let int_len = run_length(bytes, start, |b| b.is_ascii_digit());
    if int_len == 0 {
        return None;
    }
    let mut pos = start + int_len;

    if bytes.get(pos) == Some(&b'.') {
        let frac_len = run_length(bytes, pos + 1, |b| b.is_ascii_digit());
        if frac_len > 0 {
            pos += 1 + frac_len;
        }
    }

    let literal = source[start..pos].to_string();

    let suffix = match bytes.get(pos) {
        Some(&b) if is_number_suffix(b) => {
            pos += 1;
            Some(b as char)
        }
        _ => None,
    };

    Some((Number { literal, suffix }, pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Option<(Number, usize)> {
        parse_number(text, 0)
    }

    #[test]
    fn test_integer_and_decimal() {
        let (number, end) = scan("42=1").unwrap();
        assert_eq!(number.literal, "42");
        assert_eq!(number.suffix, None);
        assert_eq!(end, 2);

        let (number, end) = scan("0.5").unwrap();
        assert_eq!(number.literal, "0.5");
        assert!(!number.is_integer());
        assert_eq!(end, 3);
    }

    #[test]
    fn test_dot_without_digit_is_left() {
        let (number, end) = scan("1.").unwrap();
        assert_eq!(number.literal, "1");
        assert_eq!(end, 1);

        let (number, end) = scan("1.2.3").unwrap();
        assert_eq!(number.literal, "1.2");
        assert_eq!(end, 3);
    }

    #[test]
    fn test_suffixes() {
        let (number, end) = scan("5m ").unwrap();
        assert_eq!(number.suffix, Some('m'));
        assert_eq!(end, 2);
        assert_eq!(number.value(), 300.0);
        assert_eq!(number.text(), "5m");

        let (number, _) = scan("2K").unwrap();
        assert_eq!(number.value(), 2048.0);

        let (number, _) = scan("1.5h").unwrap();
        assert_eq!(number.value(), 5400.0);
    }

    #[test]
    fn test_not_a_number() {
        assert!(scan(".5").is_none());
        assert!(scan("-1").is_none());
        assert!(scan("").is_none());
        assert!(parse_number("1+x", 2).is_none());
    }
}
