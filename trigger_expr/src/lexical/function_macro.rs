//! Function macro parser: `{host:item_key.function(params)}`
use super::charset::{is_function_char, is_host_char, is_key_char, run_length};
use super::item_key::{scan_key_params, ItemKeyError};
use super::params::{quote_param, scan_function_params, ParamScanError};
use serde::{Deserialize, Serialize};

/// A `{host:key.func(params)}` reference extracted from an expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionMacro {
    pub host: String,
    pub item_key: String,
    pub function_name: String,
    /// Function name with its parenthesised parameters, e.g. `last(0)`
    pub raw_function: String,
    /// Text between the parentheses, unprocessed
    pub raw_params: String,
    /// Unquoted parameters in order; empty parameters are kept
    pub params: Vec<String>,
}

impl FunctionMacro {
    /// Rebuild the macro text, quoting parameters that need it
    pub fn to_expression(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| quote_param(p)).collect();
        format!(
            "{{{}:{}.{}({})}}",
            self.host,
            self.item_key,
            self.function_name,
            params.join(",")
        )
    }

    /// Number of parameters, treating `f()` as a call without parameters
    pub fn param_count(&self) -> usize {
        if self.params.len() == 1 && self.params[0].is_empty() {
            0
        } else {
            self.params.len()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FunctionMacroFault {
    #[error("expected '{{'")]
    MissingOpenBrace,

    #[error("host name is empty")]
    EmptyHost,

    #[error("missing ':' after host name")]
    MissingColon,

    #[error("item key is empty")]
    EmptyItemKey,

    #[error("invalid item key: {0}")]
    InvalidItemKey(ItemKeyError),

    #[error("missing '.' before function name")]
    MissingFunctionSeparator,

    #[error("function name is empty")]
    EmptyFunctionName,

    #[error("function name may contain only lowercase letters")]
    InvalidFunctionName,

    #[error("missing '(' after function name")]
    MissingOpenParen,

    #[error("invalid function parameters: {0}")]
    InvalidParameters(ParamScanError),

    #[error("missing '}}' after function parameters")]
    MissingCloseBrace,
}

/// Why the text at an offset is not a function macro.
///
/// `committed` is set once `{host:` has been recognised: nothing else in the
/// grammar starts that way, so the failure is a malformed function macro rather
/// than a different kind of constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionMacroMismatch {
    pub fault: FunctionMacroFault,
    pub offset: usize,
    pub committed: bool,
}

impl FunctionMacroMismatch {
    fn uncommitted(fault: FunctionMacroFault, offset: usize) -> Self {
        Self {
            fault,
            offset,
            committed: false,
        }
    }

    fn committed(fault: FunctionMacroFault, offset: usize) -> Self {
        Self {
            fault,
            offset,
            committed: true,
        }
    }
}

/// Parse a function macro at `start`. Returns it with the offset just past `}`.
pub fn parse_function_macro(
    source: &str,
    start: usize,
) -> Result<(FunctionMacro, usize), FunctionMacroMismatch> {
    use FunctionMacroFault::*;

    let bytes = source.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return Err(FunctionMacroMismatch::uncommitted(MissingOpenBrace, start));
    }

    let host_start = start + 1;
    let host_len = run_length(bytes, host_start, is_host_char);
    if host_len == 0 {
        return Err(FunctionMacroMismatch::uncommitted(EmptyHost, host_start));
    }

    let colon = host_start + host_len;
    if bytes.get(colon) != Some(&b':') {
        return Err(FunctionMacroMismatch::uncommitted(MissingColon, colon));
    }

    let key_start = colon + 1;
    let key_len = run_length(bytes, key_start, is_key_char);
    let run_end = key_start + key_len;

    let (item_end, name_start, paren) = match bytes.get(run_end) {
        Some(b'(') => {
            // The name run swallowed the function name; split at its last dot
            let run = &source[key_start..run_end];
            let dot = run.rfind('.').ok_or(FunctionMacroMismatch::committed(
                MissingFunctionSeparator,
                run_end,
            ))?;
            if dot == 0 {
                return Err(FunctionMacroMismatch::committed(EmptyItemKey, key_start));
            }
            (key_start + dot, key_start + dot + 1, run_end)
        }
        Some(b'[') => {
            if key_len == 0 {
                return Err(FunctionMacroMismatch::committed(EmptyItemKey, key_start));
            }
            let item_end = scan_key_params(source, run_end)
                .map_err(|e| FunctionMacroMismatch::committed(InvalidItemKey(e), e.offset()))?;
            if bytes.get(item_end) != Some(&b'.') {
                return Err(FunctionMacroMismatch::committed(
                    MissingFunctionSeparator,
                    item_end,
                ));
            }
            let name_start = item_end + 1;
            let paren = name_start + run_length(bytes, name_start, is_function_char);
            (item_end, name_start, paren)
        }
        _ => {
            let run = &source[key_start..run_end];
            let fault = if key_len == 0 {
                EmptyItemKey
            } else if run.contains('.') {
                MissingOpenParen
            } else {
                MissingFunctionSeparator
            };
            return Err(FunctionMacroMismatch::committed(fault, run_end));
        }
    };

    let function_name = &source[name_start..paren];
    if function_name.is_empty() {
        return Err(FunctionMacroMismatch::committed(EmptyFunctionName, name_start));
    }
    if !function_name.bytes().all(is_function_char) {
        return Err(FunctionMacroMismatch::committed(
            InvalidFunctionName,
            name_start,
        ));
    }
    if bytes.get(paren) != Some(&b'(') {
        return Err(FunctionMacroMismatch::committed(MissingOpenParen, paren));
    }

    let (params, params_end) = scan_function_params(source, paren + 1)
        .map_err(|e| FunctionMacroMismatch::committed(InvalidParameters(e), e.offset()))?;

    if bytes.get(params_end) != Some(&b'}') {
        return Err(FunctionMacroMismatch::committed(
            MissingCloseBrace,
            params_end,
        ));
    }

    let function_macro = FunctionMacro {
        host: source[host_start..colon].to_string(),
        item_key: source[key_start..item_end].to_string(),
        function_name: function_name.to_string(),
        raw_function: source[name_start..params_end].to_string(),
        raw_params: source[paren + 1..params_end - 1].to_string(),
        params,
    };

    Ok((function_macro, params_end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parse(text: &str) -> Result<(FunctionMacro, usize), FunctionMacroMismatch> {
        parse_function_macro(text, 0)
    }

    #[test]
    fn test_simple_macro() {
        let (fm, end) = parse("{Zabbix server:agent.ping.last(0)}=1").unwrap();
        assert_eq!(fm.host, "Zabbix server");
        assert_eq!(fm.item_key, "agent.ping");
        assert_eq!(fm.function_name, "last");
        assert_eq!(fm.raw_function, "last(0)");
        assert_eq!(fm.raw_params, "0");
        assert_eq!(fm.params, vec!["0"]);
        assert_eq!(end, 34);
    }

    #[test]
    fn test_bracketed_key() {
        let (fm, _) = parse("{host:key[,80].last(0)}").unwrap();
        assert_eq!(fm.item_key, "key[,80]");
        assert_eq!(fm.function_name, "last");

        let (fm, _) = parse(r#"{host:log["a.b(c)",x].str("{HOSTNAME1}",{HOSTNAME2})}"#).unwrap();
        assert_eq!(fm.item_key, r#"log["a.b(c)",x]"#);
        assert_eq!(fm.raw_function, r#"str("{HOSTNAME1}",{HOSTNAME2})"#);
        assert_eq!(fm.params, vec!["{HOSTNAME1}", "{HOSTNAME2}"]);
    }

    #[test]
    fn test_empty_call() {
        let (fm, _) = parse("{host:item.now()}").unwrap();
        assert_eq!(fm.params, vec![""]);
        assert_eq!(fm.param_count(), 0);
    }

    #[test]
    fn test_uncommitted_mismatches() {
        let err = parse("{TRIGGER.VALUE}").unwrap_err();
        assert!(!err.committed);
        assert_eq!(err.fault, FunctionMacroFault::MissingColon);

        let err = parse("{$MACRO}").unwrap_err();
        assert!(!err.committed);
        assert_eq!(err.fault, FunctionMacroFault::EmptyHost);

        assert!(!parse("1").unwrap_err().committed);
    }

    #[test]
    fn test_committed_faults() {
        assert_matches!(
            parse("{host:key}").unwrap_err(),
            FunctionMacroMismatch { fault: FunctionMacroFault::MissingFunctionSeparator, offset: 9, committed: true }
        );
        assert_matches!(
            parse("{host:.last(0)}").unwrap_err().fault,
            FunctionMacroFault::EmptyItemKey
        );
        assert_matches!(
            parse("{host:key.(0)}").unwrap_err().fault,
            FunctionMacroFault::EmptyFunctionName
        );
        assert_matches!(
            parse("{host:key.Last(0)}").unwrap_err().fault,
            FunctionMacroFault::InvalidFunctionName
        );
        assert_matches!(
            parse("{host:key.last}").unwrap_err().fault,
            FunctionMacroFault::MissingOpenParen
        );
        assert_matches!(
            parse("{host:key[a.last(0)}").unwrap_err().fault,
            FunctionMacroFault::InvalidItemKey(ItemKeyError::Unbalanced { .. })
        );
        assert_matches!(
            parse("{host:key[a]last(0)}").unwrap_err().fault,
            FunctionMacroFault::MissingFunctionSeparator
        );
        assert_matches!(
            parse(r#"{host:key.str("abc)}"#).unwrap_err().fault,
            FunctionMacroFault::InvalidParameters(ParamScanError::UnterminatedQuote { offset: 14 })
        );
        assert_matches!(
            parse("{host:key.last(0)").unwrap_err(),
            FunctionMacroMismatch { fault: FunctionMacroFault::MissingCloseBrace, offset: 17, .. }
        );
    }

    #[test]
    fn test_to_expression_round_trip() {
        let source = r#"{my host:log[x,"y"].str(" lead",a\"b,"c,d")}"#;
        let (fm, _) = parse(source).unwrap();
        assert_eq!(fm.params, vec![" lead", r#"a\"b"#, "c,d"]);

        let rebuilt = fm.to_expression();
        let (reparsed, end) = parse(&rebuilt).unwrap();
        assert_eq!(end, rebuilt.len());
        assert_eq!(reparsed.host, fm.host);
        assert_eq!(reparsed.item_key, fm.item_key);
        assert_eq!(reparsed.function_name, fm.function_name);
        assert_eq!(reparsed.params, fm.params);
    }

    #[test]
    fn test_to_expression_keeps_trailing_whitespace() {
        for source in ["{h:k.str(\"a\t\")}", "{h:k.str(\"a\n\",#2)}", "{h:k.str(\"a \")}"] {
            let (fm, _) = parse(source).unwrap();
            let rebuilt = fm.to_expression();
            let (reparsed, _) = parse(&rebuilt).unwrap();
            assert_eq!(reparsed.params, fm.params, "{source} -> {rebuilt}");
        }
    }
}
