// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    expression: ExpressionLimits,
    semantic: SemanticLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct ExpressionLimits {
    max_expression_length: usize,
    max_token_count: usize,
    max_nesting_depth: usize,
    max_item_key_depth: usize,
    max_function_parameters: usize,
}

#[derive(serde::Deserialize)]
struct SemanticLimits {
    max_semantic_errors: usize,
    max_error_message_length: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    security_min_log_level: u8,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=TRIGGER_EXPR_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=TRIGGER_EXPR_CONFIG_DIR");

    let profile =
        env::var("TRIGGER_EXPR_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("TRIGGER_EXPR_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the crate directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_EXPRESSION_LENGTH: usize = 16 * 1024 * 1024;
    const ABSOLUTE_MAX_NESTING_DEPTH: usize = 4096;

    if config.expression.max_expression_length == 0
        || config.expression.max_expression_length > ABSOLUTE_MAX_EXPRESSION_LENGTH
    {
        panic!("SECURITY: max_expression_length must be within 1..={ABSOLUTE_MAX_EXPRESSION_LENGTH}");
    }

    if config.expression.max_nesting_depth == 0
        || config.expression.max_nesting_depth > ABSOLUTE_MAX_NESTING_DEPTH
    {
        panic!("SECURITY: max_nesting_depth must be within 1..={ABSOLUTE_MAX_NESTING_DEPTH}");
    }

    if config.expression.max_token_count == 0 {
        panic!("SECURITY: max_token_count cannot be zero");
    }

    if config.expression.max_item_key_depth == 0 {
        panic!("SECURITY: max_item_key_depth cannot be zero");
    }

    if config.expression.max_function_parameters == 0 {
        panic!("SECURITY: max_function_parameters cannot be zero");
    }

    if config.semantic.max_semantic_errors == 0 {
        panic!("SECURITY: max_semantic_errors cannot be zero");
    }

    if config.logging.security_min_log_level > 2 {
        panic!("SECURITY: security_min_log_level too high (max: 2)");
    }

    if profile == "production" && config.expression.max_expression_length > 1024 * 1024 {
        panic!("PRODUCTION: max_expression_length too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod expression {{
        pub const MAX_EXPRESSION_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
        pub const MAX_NESTING_DEPTH: usize = {};
        pub const MAX_ITEM_KEY_DEPTH: usize = {};
        pub const MAX_FUNCTION_PARAMETERS: usize = {};
    }}

    pub mod semantic {{
        pub const MAX_SEMANTIC_ERRORS: usize = {};
        pub const MAX_ERROR_MESSAGE_LENGTH: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const SECURITY_MIN_LOG_LEVEL: u8 = {};
    }}
}}
"#,
        profile,
        // Expression
        config.expression.max_expression_length,
        config.expression.max_token_count,
        config.expression.max_nesting_depth,
        config.expression.max_item_key_depth,
        config.expression.max_function_parameters,
        // Semantic
        config.semantic.max_semantic_errors,
        config.semantic.max_error_message_length,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.security_min_log_level,
    );

    fs::write(output_path, constants_code).unwrap();
}
