//! Error and success codes for expression parsing
//!
//! Every code the parser can emit is declared here together with its metadata
//! (category, severity, description, recommended action).

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

/// Expression syntax error codes
pub mod syntax {
    use super::Code;

    pub const EMPTY_EXPRESSION: Code = Code::new("E040");
    pub const ILLEGAL_START: Code = Code::new("E041");
    pub const UNBALANCED_PARENTHESES: Code = Code::new("E042");
    pub const ILLEGAL_TRANSITION: Code = Code::new("E043");
    pub const UNEXPECTED_END: Code = Code::new("E044");
    pub const MALFORMED_FUNCTION_MACRO: Code = Code::new("E045");
    pub const MALFORMED_NUMBER: Code = Code::new("E046");
    pub const EXPRESSION_TOO_LONG: Code = Code::new("E047");
    pub const TOO_MANY_TOKENS: Code = Code::new("E048");
    pub const UNMATCHED_BRACE: Code = Code::new("E049");
    pub const NESTING_TOO_DEEP: Code = Code::new("E050");
}

/// Function macro semantic error codes
pub mod semantic {
    use super::Code;

    pub const INVALID_HOST: Code = Code::new("E180");
    pub const INVALID_ITEM_KEY: Code = Code::new("E181");
    pub const UNKNOWN_FUNCTION: Code = Code::new("E182");
    pub const TOO_MANY_PARAMETERS: Code = Code::new("E183");
    pub const MISSING_MANDATORY_PARAMETER: Code = Code::new("E184");
    pub const INVALID_PARAMETER: Code = Code::new("E185");
    pub const NO_ITEM_REFERENCE: Code = Code::new("E186");
}

/// Command line error codes
pub mod cli {
    use super::Code;

    pub const INVALID_ARGUMENTS: Code = Code::new("C001");
    pub const CONFIG_LOAD_FAILURE: Code = Code::new("C002");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const EXPRESSION_TOKENIZED: Code = Code::new("I020");
    pub const SEMANTIC_VALIDATION_COMPLETE: Code = Code::new("I070");
    pub const EXPRESSION_VALID: Code = Code::new("I080");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();

        // System errors
        registry.insert(
            "ERR001",
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Internal parser error",
                "File a bug report with the failing expression",
            ),
        );
        registry.insert(
            "ERR002",
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "Logging or parser initialization failure",
                "Check runtime configuration and environment variables",
            ),
        );
        registry.insert(
            "ERR003",
            ErrorMetadata::new(
                "ERR003",
                "System",
                Severity::High,
                false,
                true,
                "Invalid runtime configuration",
                "Review the TRIGGER_EXPR_* variables and configuration file",
            ),
        );

        // Syntax errors
        registry.insert(
            "E040",
            ErrorMetadata::new(
                "E040",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Expression is empty or contains only whitespace",
                "Provide a trigger expression",
            ),
        );
        registry.insert(
            "E041",
            ErrorMetadata::new(
                "E041",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Expression must start with '(', '{', '-' or a digit",
                "Begin the expression with an operand or an opening parenthesis",
            ),
        );
        registry.insert(
            "E042",
            ErrorMetadata::new(
                "E042",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Parentheses are not balanced",
                "Match every '(' with a ')'",
            ),
        );
        registry.insert(
            "E043",
            ErrorMetadata::new(
                "E043",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Token not allowed at this position",
                "Check operator placement and spacing around 'and', 'or', 'not'",
            ),
        );
        registry.insert(
            "E044",
            ErrorMetadata::new(
                "E044",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Expression ends where an operand was expected",
                "Complete the trailing operator with an operand",
            ),
        );
        registry.insert(
            "E045",
            ErrorMetadata::new(
                "E045",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Malformed {host:key.function(params)} reference",
                "Check the item key brackets, function name and parameter quoting",
            ),
        );
        registry.insert(
            "E046",
            ErrorMetadata::new(
                "E046",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Malformed numeric constant",
                "Use digits with at most one decimal point and an optional unit suffix",
            ),
        );
        registry.insert(
            "E047",
            ErrorMetadata::new(
                "E047",
                "Syntax",
                Severity::High,
                false,
                true,
                "Expression exceeds the configured maximum length",
                "Shorten the expression or rebuild with a larger limit",
            ),
        );
        registry.insert(
            "E048",
            ErrorMetadata::new(
                "E048",
                "Syntax",
                Severity::High,
                false,
                true,
                "Expression exceeds the configured maximum token count",
                "Split the expression or rebuild with a larger limit",
            ),
        );
        registry.insert(
            "E049",
            ErrorMetadata::new(
                "E049",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Unmatched '}' outside of a macro",
                "Remove the stray brace or complete the macro",
            ),
        );
        registry.insert(
            "E050",
            ErrorMetadata::new(
                "E050",
                "Syntax",
                Severity::High,
                false,
                true,
                "Parentheses nested deeper than the configured limit",
                "Flatten the expression",
            ),
        );

        // Semantic errors
        registry.insert(
            "E180",
            ErrorMetadata::new(
                "E180",
                "Semantic",
                Severity::Medium,
                true,
                false,
                "Host name is empty or contains invalid characters",
                "Use only letters, digits, '.', '_', '-' and spaces in host names",
            ),
        );
        registry.insert(
            "E181",
            ErrorMetadata::new(
                "E181",
                "Semantic",
                Severity::Medium,
                true,
                false,
                "Item key is not valid",
                "Check the key name characters and its bracketed parameters",
            ),
        );
        registry.insert(
            "E182",
            ErrorMetadata::new(
                "E182",
                "Semantic",
                Severity::Medium,
                true,
                false,
                "Unknown trigger function",
                "Use one of the supported trigger functions",
            ),
        );
        registry.insert(
            "E183",
            ErrorMetadata::new(
                "E183",
                "Semantic",
                Severity::Medium,
                true,
                false,
                "Function called with too many parameters",
                "Remove the extra parameters",
            ),
        );
        registry.insert(
            "E184",
            ErrorMetadata::new(
                "E184",
                "Semantic",
                Severity::Medium,
                true,
                false,
                "Mandatory function parameter is missing",
                "Supply a value for every mandatory parameter",
            ),
        );
        registry.insert(
            "E185",
            ErrorMetadata::new(
                "E185",
                "Semantic",
                Severity::Medium,
                true,
                false,
                "Function parameter has the wrong type",
                "Use a time period, #count, number or user macro as the function requires",
            ),
        );
        registry.insert(
            "E186",
            ErrorMetadata::new(
                "E186",
                "Semantic",
                Severity::Medium,
                true,
                false,
                "Expression does not reference any item",
                "Add at least one {host:key.function()} reference",
            ),
        );

        // CLI errors
        registry.insert(
            "C001",
            ErrorMetadata::new(
                "C001",
                "Cli",
                Severity::Medium,
                true,
                false,
                "Invalid command line arguments",
                "Run with --help for usage",
            ),
        );
        registry.insert(
            "C002",
            ErrorMetadata::new(
                "C002",
                "Cli",
                Severity::High,
                false,
                true,
                "Runtime configuration file could not be loaded",
                "Check the --config path and TOML syntax",
            ),
        );

        // Success codes
        registry.insert(
            "I004",
            ErrorMetadata::new(
                "I004",
                "Success",
                Severity::Low,
                true,
                false,
                "Logging system initialized",
                "Ready to parse expressions",
            ),
        );
        registry.insert(
            "I020",
            ErrorMetadata::new(
                "I020",
                "Success",
                Severity::Low,
                true,
                false,
                "Expression tokenized successfully",
                "Continue to function macro validation",
            ),
        );
        registry.insert(
            "I070",
            ErrorMetadata::new(
                "I070",
                "Success",
                Severity::Low,
                true,
                false,
                "Function macro validation completed",
                "Expression is ready for use",
            ),
        );
        registry.insert(
            "I080",
            ErrorMetadata::new(
                "I080",
                "Success",
                Severity::Low,
                true,
                false,
                "Expression is valid",
                "No action required",
            ),
        );

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Human-readable description for a code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_code_is_registered() {
        let declared = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            system::CONFIGURATION_ERROR,
            syntax::EMPTY_EXPRESSION,
            syntax::ILLEGAL_START,
            syntax::UNBALANCED_PARENTHESES,
            syntax::ILLEGAL_TRANSITION,
            syntax::UNEXPECTED_END,
            syntax::MALFORMED_FUNCTION_MACRO,
            syntax::MALFORMED_NUMBER,
            syntax::EXPRESSION_TOO_LONG,
            syntax::TOO_MANY_TOKENS,
            syntax::UNMATCHED_BRACE,
            syntax::NESTING_TOO_DEEP,
            semantic::INVALID_HOST,
            semantic::INVALID_ITEM_KEY,
            semantic::UNKNOWN_FUNCTION,
            semantic::TOO_MANY_PARAMETERS,
            semantic::MISSING_MANDATORY_PARAMETER,
            semantic::INVALID_PARAMETER,
            semantic::NO_ITEM_REFERENCE,
            cli::INVALID_ARGUMENTS,
            cli::CONFIG_LOAD_FAILURE,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::EXPRESSION_TOKENIZED,
            success::SEMANTIC_VALIDATION_COMPLETE,
            success::EXPRESSION_VALID,
        ];

        for code in declared {
            let metadata = get_error_metadata(code.as_str());
            assert!(metadata.is_some(), "{} missing from registry", code);
            assert_eq!(metadata.map(|m| m.code), Some(code.as_str()));
        }
    }

    #[test]
    fn test_classification_lookups() {
        assert_eq!(get_category("E043"), "Syntax");
        assert_eq!(get_category("E182"), "Semantic");
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(requires_halt("E047"));
        assert!(is_recoverable("E045"));
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_action("Z999"), "No specific action available");
        assert_eq!(get_category("Z999"), "Unknown");
        assert_eq!(get_severity("Z999"), Severity::Medium);
        assert!(!requires_halt("Z999"));
    }
}
