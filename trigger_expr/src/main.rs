use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use trigger_expr::config::runtime::RuntimeConfig;
use trigger_expr::logging::{self, codes};
use trigger_expr::pipeline::{self, ExpressionOutput, ParseOptions, ParseResult, ValidationStats};

/// Command line switches, before the configuration file is applied
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    no_lld: bool,
    require_item: bool,
    json: bool,
    help: bool,
    config_path: Option<PathBuf>,
    read_stdin: bool,
    expressions: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("trigger_expr");

    let cli = match parse_args(&args[1.min(args.len())..]) {
        Ok(cli) => cli,
        Err(message) => {
            logging::safe_log_error(codes::cli::INVALID_ARGUMENTS, &message);
            eprintln!("Usage: {} [OPTIONS] <EXPRESSION>...", program_name);
            eprintln!("       {} --help", program_name);
            std::process::exit(1);
        }
    };

    if cli.help {
        print_help(program_name);
        return Ok(());
    }

    let runtime_config = match &cli.config_path {
        Some(path) => match RuntimeConfig::load(path) {
            Ok(config) => config,
            Err(error) => {
                logging::safe_log_error(codes::cli::CONFIG_LOAD_FAILURE, &error.to_string());
                std::process::exit(1);
            }
        },
        None => RuntimeConfig::default(),
    };

    // Initialize global logging system
    logging::config::init_runtime_preferences(runtime_config.logging.clone())?;
    logging::init_global_logging()?;

    let options = cli.parse_options(&runtime_config);

    let mut expressions = cli.expressions.clone();
    if cli.read_stdin {
        for line in io::stdin().lock().lines() {
            let line = line?;
            if !line.trim().is_empty() {
                expressions.push(line);
            }
        }
    }

    let results: Vec<ParseResult> = expressions
        .iter()
        .enumerate()
        .map(|(index, expression)| {
            logging::with_expression_context(index, || {
                pipeline::parse_with_options(expression, &options)
            })
        })
        .collect();

    let mut stats = ValidationStats::new();
    for result in &results {
        stats.record(result);
    }

    if cli.json {
        let outputs: Vec<ExpressionOutput> = results.iter().map(ExpressionOutput::from).collect();
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    } else {
        for result in &results {
            print_result(result);
        }
        if results.len() > 1 {
            println!();
            println!("{}", stats.summary());
        }
    }

    if stats.invalid_expressions() > 0 {
        std::process::exit(1);
    }

    Ok(())
}

impl CliArgs {
    /// Configuration file values first, then command line switches
    fn parse_options(&self, runtime_config: &RuntimeConfig) -> ParseOptions {
        let mut options = ParseOptions::from_runtime_config(runtime_config);
        if self.no_lld {
            options.allow_lld_macros = false;
        }
        if self.require_item {
            options.require_item_reference = true;
        }
        options
    }
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => cli.help = true,
            "--no-lld" => cli.no_lld = true,
            "--require-item" => cli.require_item = true,
            "--json" => cli.json = true,
            "--config" => {
                let path = args
                    .get(i + 1)
                    .ok_or_else(|| "--config requires a file path".to_string())?;
                cli.config_path = Some(PathBuf::from(path));
                i += 1; // Skip the path argument
            }
            "-" => cli.read_stdin = true,
            "--" => {
                cli.expressions.extend(args[i + 1..].iter().cloned());
                break;
            }
            option if option.starts_with("--") => {
                return Err(format!("Unknown option '{}'", option));
            }
            expression => cli.expressions.push(expression.to_string()),
        }
        i += 1;
    }

    if !cli.help && !cli.read_stdin && cli.expressions.is_empty() {
        return Err("No expression given".to_string());
    }

    Ok(cli)
}

fn print_result(result: &ParseResult) {
    match &result.error {
        None => {
            println!("VALID: {}", result.source);
            for function_macro in result.function_macros() {
                println!(
                    "  host={} key={} function={} params={:?}",
                    function_macro.host,
                    function_macro.item_key,
                    function_macro.function_name,
                    function_macro.params
                );
            }
        }
        Some(error) => {
            println!("INVALID: {}", result.source);
            match result.format_error() {
                Some(rendered) if logging::config::use_cargo_style_output() => {
                    for line in rendered.lines() {
                        println!("  {}", line);
                    }
                }
                _ => println!("  {} at offset {}", error.message(), error.offset()),
            }
            println!("  [{}] {}", error.error_code(), error.recommended_action());
        }
    }
}

fn print_help(program_name: &str) {
    println!("trigger_expr v{}", env!("CARGO_PKG_VERSION"));
    println!("Trigger expression parser and validator");
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] <EXPRESSION>...", program_name);
    println!("    {} [OPTIONS] -                # Read expressions from stdin", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --no-lld            Reject {{#MACRO}} low-level discovery macros");
    println!("    --require-item      Require at least one {{host:key.func()}} reference");
    println!("    --json              Print results as JSON");
    println!("    --config FILE       Load runtime preferences from a TOML file");
    println!();
    println!("EXIT STATUS:");
    println!("    0 when every expression is valid, 1 otherwise");
    println!();
    println!("EXAMPLES:");
    println!("    {} '{{Zabbix server:agent.ping.last(0)}}=1'", program_name);
    println!("    {} --require-item '6 & 0 | 0'", program_name);
    println!("    cat triggers.txt | {} --json -", program_name);
    println!();
    println!("BUILD:");
    println!("    {}", trigger_expr::config::build_info::source_info());
}
