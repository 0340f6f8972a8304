use super::error::ExpressionError;
use super::result::ParseResult;
use crate::lexical::FunctionMacro;
use crate::tokens::Token;
use serde::{Deserialize, Serialize};

/// Serializable view of a `ParseResult`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionOutput {
    pub expression: String,
    pub is_valid: bool,
    pub tokens: Vec<Token>,
    pub function_macros: Vec<FunctionMacro>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: String,
    pub category: String,
    pub message: String,
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl ErrorReport {
    pub fn from_error(error: &ExpressionError) -> Self {
        let start = error.span().start;
        Self {
            code: error.error_code().as_str().to_string(),
            category: error.category().to_string(),
            message: error.message(),
            offset: start.offset,
            line: start.line,
            column: start.column,
        }
    }
}

impl ExpressionOutput {
    pub fn from_result(result: &ParseResult) -> Self {
        Self {
            expression: result.source.clone(),
            is_valid: result.is_valid,
            tokens: result.tokens.clone(),
            function_macros: result.function_macros().into_iter().cloned().collect(),
            error: result.error.as_ref().map(ErrorReport::from_error),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&ParseResult> for ExpressionOutput {
    fn from(result: &ParseResult) -> Self {
        Self::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{parse, parse_with_options, ParseOptions};

    #[test]
    fn test_valid_output_json() {
        let result = parse("{Zabbix server:agent.ping.last(0)}=1");
        let json = ExpressionOutput::from(&result).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["is_valid"], true);
        assert_eq!(value["function_macros"][0]["host"], "Zabbix server");
        assert_eq!(value["tokens"].as_array().unwrap().len(), 3);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_error_report() {
        let options = ParseOptions::default().with_lld_macros(false);
        let result = parse_with_options("{host:item.last(0)} | {#MACRO}", &options);
        let output = ExpressionOutput::from_result(&result);

        let report = output.error.unwrap();
        assert_eq!(report.code, "E043");
        assert_eq!(report.offset, 22);
        assert_eq!(report.line, 1);
        assert_eq!(report.column, 23);
    }
}
