use super::result::ParseResult;
use std::collections::BTreeMap;

/// Running totals over a batch of validated expressions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationStats {
    pub total_expressions: usize,
    pub valid_expressions: usize,
    pub syntax_failures: usize,
    pub semantic_failures: usize,
    pub total_tokens: usize,
    /// Failure count per error code
    pub failures_by_code: BTreeMap<String, usize>,
}

impl ValidationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &ParseResult) {
        self.total_expressions += 1;
        self.total_tokens += result.tokens.len();

        match &result.error {
            None => self.valid_expressions += 1,
            Some(error) => {
                if error.is_syntax() {
                    self.syntax_failures += 1;
                } else {
                    self.semantic_failures += 1;
                }
                *self
                    .failures_by_code
                    .entry(error.error_code().as_str().to_string())
                    .or_insert(0) += 1;
            }
        }
    }

    pub fn invalid_expressions(&self) -> usize {
        self.total_expressions - self.valid_expressions
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_expressions == 0 {
            0.0
        } else {
            self.valid_expressions as f64 / self.total_expressions as f64
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} expression(s): {} valid, {} syntax error(s), {} semantic error(s)",
            self.total_expressions,
            self.valid_expressions,
            self.syntax_failures,
            self.semantic_failures
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse;

    #[test]
    fn test_record_counts_by_stage() {
        let mut stats = ValidationStats::new();
        stats.record(&parse("{h:k.last(0)}=1"));
        stats.record(&parse("1 +"));
        stats.record(&parse("{h:k.somefunc(0)}=1"));

        assert_eq!(stats.total_expressions, 3);
        assert_eq!(stats.valid_expressions, 1);
        assert_eq!(stats.syntax_failures, 1);
        assert_eq!(stats.semantic_failures, 1);
        assert_eq!(stats.invalid_expressions(), 2);
        assert_eq!(stats.failures_by_code.get("E182"), Some(&1));
        assert!((stats.success_rate() - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_stats() {
        let stats = ValidationStats::new();
        assert_eq!(stats.success_rate(), 0.0);
        assert_eq!(
            stats.summary(),
            "0 expression(s): 0 valid, 0 syntax error(s), 0 semantic error(s)"
        );
    }
}
