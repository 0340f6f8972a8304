use crate::config::runtime::RuntimeConfig;
use serde::{Deserialize, Serialize};

/// Switches for one parse call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Accept `{#NAME}` constants and parameters
    pub allow_lld_macros: bool,
    /// Reject expressions without any function macro
    pub require_item_reference: bool,
    /// Log every accepted token at debug level
    pub trace_tokens: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allow_lld_macros: true,
            require_item_reference: false,
            trace_tokens: false,
        }
    }
}

impl ParseOptions {
    pub fn from_runtime_config(config: &RuntimeConfig) -> Self {
        Self {
            allow_lld_macros: config.parser.allow_lld_macros,
            require_item_reference: config.validation.require_item_reference,
            trace_tokens: config.parser.trace_tokens,
        }
    }

    pub fn with_lld_macros(mut self, allow: bool) -> Self {
        self.allow_lld_macros = allow;
        self
    }

    pub fn with_item_reference_required(mut self, required: bool) -> Self {
        self.require_item_reference = required;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert!(options.allow_lld_macros);
        assert!(!options.require_item_reference);
        assert!(!options.trace_tokens);
    }

    #[test]
    fn test_from_runtime_config() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [parser]
            allow_lld_macros = false
            trace_tokens = false

            [validation]
            require_item_reference = true
            "#,
        )
        .unwrap();
        let options = ParseOptions::from_runtime_config(&config);
        assert!(!options.allow_lld_macros);
        assert!(options.require_item_reference);
    }
}
