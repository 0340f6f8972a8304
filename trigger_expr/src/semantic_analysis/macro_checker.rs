//! Per-macro checks: host, item key, then function signature
//!
//! Checks run in that order and stop at the first failure, so each function
//! macro contributes at most one error.

use super::functions::lookup_function;
use super::param_checker::{check_param, ParamCheck};
use super::types::{SemanticError, SemanticResult};
use crate::lexical::charset::is_host_char;
use crate::lexical::{validate_item_key, FunctionMacro};
use crate::utils::Span;

pub fn check_function_macro(
    function_macro: &FunctionMacro,
    span: Span,
    allow_lld_macros: bool,
) -> SemanticResult<()> {
    check_host(&function_macro.host, span)?;
    check_item_key(&function_macro.item_key, span)?;
    check_function(function_macro, span, allow_lld_macros)
}

pub fn check_host(host: &str, span: Span) -> SemanticResult<()> {
    let trimmed = host.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(is_host_char) {
        return Err(SemanticError::invalid_host(host, span));
    }
    Ok(())
}

pub fn check_item_key(item_key: &str, span: Span) -> SemanticResult<()> {
    validate_item_key(item_key).map_err(|reason| SemanticError::invalid_item_key(item_key, reason, span))
}

pub fn check_function(
    function_macro: &FunctionMacro,
    span: Span,
    allow_lld_macros: bool,
) -> SemanticResult<()> {
    let name = function_macro.function_name.as_str();
    let signature =
        lookup_function(name).ok_or_else(|| SemanticError::unknown_function(name, span))?;

    let given = function_macro.param_count();
    if given > signature.max_params() {
        return Err(SemanticError::TooManyParameters {
            function: name.to_string(),
            max: signature.max_params(),
            given,
            span,
        });
    }

    let Some(specs) = signature.params else {
        return Ok(());
    };

    for (index, spec) in specs.iter().enumerate() {
        let value = function_macro
            .params
            .get(index)
            .map(String::as_str)
            .unwrap_or("");

        match check_param(value, spec, allow_lld_macros) {
            ParamCheck::Accepted => {}
            ParamCheck::Missing => {
                return Err(SemanticError::MissingMandatoryParameter {
                    function: name.to_string(),
                    position: index + 1,
                    span,
                });
            }
            ParamCheck::Rejected => {
                return Err(SemanticError::invalid_parameter(
                    name,
                    index + 1,
                    value,
                    spec.kind.as_str(),
                    span,
                ));
            }
        }
    }

    Ok(())
}
