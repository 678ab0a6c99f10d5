use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use optdecl_core::{
    ConsoleReporter, DefinitionFile, Getopt, NoInput, OptionValue, ProcessExit, StdinInput,
};
use serde_json::{Map, Value};
use tracing_subscriber::{EnvFilter, fmt};

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "optdecl")]
#[command(disable_help_subcommand = true)]
#[command(about = "Parse shell arguments against declarative option definitions")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse an argument vector and print the resolved options.
    Parse(ParseArgs),
    /// Print the help message rendered from a definition file.
    Help(HelpArgs),
    /// Validate one or more definition files.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Definition file (.yaml, .yml or .json).
    #[arg(long)]
    definitions: PathBuf,
    /// Usage template overriding the one in the definition file.
    #[arg(long)]
    usage: Option<String>,
    /// Fail instead of prompting for missing options.
    #[arg(long)]
    no_prompt: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Program name followed by its arguments.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    argv: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Definition file (.yaml, .yml or .json).
    #[arg(long)]
    definitions: PathBuf,
    /// Program name substituted into the usage line.
    #[arg(long, default_value = "program")]
    program: String,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Definition files to check.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_definitions(path: &Path) -> Result<DefinitionFile, String> {
    DefinitionFile::load(path)
        .map_err(|err| format!("Failed to load definitions '{}': {err}", path.display()))
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let file = load_definitions(&args.definitions)?;

    let getopt = Getopt::new(args.argv)
        .with_reporter(ConsoleReporter::stderr())
        .with_terminator(ProcessExit);
    let mut getopt = if args.no_prompt {
        getopt.with_input(NoInput)
    } else {
        getopt.with_input(StdinInput)
    };

    file.apply(&mut getopt)
        .map_err(|err| format!("Invalid definitions '{}': {err}", args.definitions.display()))?;
    if let Some(usage) = &args.usage {
        getopt.set_usage(usage);
    }

    getopt.parse();
    let resolved = resolve(&getopt)?;

    let rendered = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&resolved)
            .map_err(|err| format!("Failed to serialize JSON: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(&resolved)
            .map_err(|err| format!("Failed to serialize YAML: {err}"))?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

/// Parsed options plus every defined key resolved through `get`.
fn resolve(getopt: &Getopt) -> Result<Value, String> {
    let parsed = serde_json::to_value(getopt.parsed_options())
        .map_err(|err| format!("Failed to serialize parsed options: {err}"))?;
    let mut map = match parsed {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    for definition in getopt.definitions() {
        let value = match getopt.get(definition.key()) {
            Some(OptionValue::Text(text)) => Value::String(text.clone()),
            Some(OptionValue::Present) => Value::Bool(true),
            Some(OptionValue::Null) | None => Value::Null,
        };
        map.insert(definition.key().to_string(), value);
    }

    Ok(Value::Object(map))
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let file = load_definitions(&args.definitions)?;
    let mut getopt = Getopt::new([args.program]);
    file.apply(&mut getopt)
        .map_err(|err| format!("Invalid definitions '{}': {err}", args.definitions.display()))?;
    print!("{}", getopt.help_message());
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut failures = 0usize;

    for path in &args.inputs {
        let errors = match DefinitionFile::load(path) {
            Ok(file) => file.validate(),
            Err(err) => vec![err],
        };

        if errors.is_empty() {
            println!("ok: {}", path.display());
            continue;
        }

        failures += 1;
        for err in errors {
            eprintln!("invalid: {}: {err}", path.display());
        }
    }

    if failures > 0 {
        return Err(format!(
            "{failures} of {} definition file(s) invalid",
            args.inputs.len()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_subcommand_takes_definitions() {
        let cli = Cli::try_parse_from(["optdecl", "help", "--definitions", "gen.yaml"])
            .expect("help subcommand should parse");
        match cli.command {
            Command::Help(args) => {
                assert_eq!(args.definitions, PathBuf::from("gen.yaml"));
                assert_eq!(args.program, "program");
            }
            other => panic!("expected help subcommand, got {other:?}"),
        }
    }
}
