use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use service_model_core::{ServiceModel, validate_model};
use service_model_document::{GenerationConfig, load_and_build};
use sha2::{Digest, Sha256};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Output encoding for the built model.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "service-model")]
#[command(about = "Build a normalized service model from an OpenAPI document")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the model and write it as JSON or YAML.
    Build(BuildArgs),
    /// Build and validate the model, then print a summary and fingerprint.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// OpenAPI document (.json, or YAML for any other extension).
    #[arg(long)]
    input: PathBuf,
    /// Generation config YAML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file (default: stdout).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// OpenAPI document (.json, or YAML for any other extension).
    #[arg(long)]
    input: PathBuf,
    /// Generation config YAML.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Build(args) => run_build(args),
        Command::Check(args) => run_check(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout only ever carries the model.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

// ---------------------------------------------------------------------------
// build command
// ---------------------------------------------------------------------------

fn run_build(args: BuildArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let (_, model) = load_and_build(&args.input, &config)
        .map_err(|err| format!("Failed to build '{}': {err}", args.input.display()))?;

    info!(
        input = %args.input.display(),
        fields = model.field_descriptions.len(),
        structures = model.structure_descriptions.len(),
        "Model built"
    );

    let raw = format_model(&model, args.format)?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        format!("Failed to create output directory '{}': {err}", parent.display())
                    })?;
                }
            }
            fs::write(path, raw).map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            eprintln!(
                "Wrote {} field(s) and {} structure(s) to '{}'.",
                model.field_descriptions.len(),
                model.structure_descriptions.len(),
                path.display()
            );
        }
        None => print!("{raw}"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// check command
// ---------------------------------------------------------------------------

fn run_check(args: CheckArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let (document, model) = load_and_build(&args.input, &config)
        .map_err(|err| format!("Failed to build '{}': {err}", args.input.display()))?;

    let errors = validate_model(&model, &document);
    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(|e| format!("  - {e}")).collect();
        return Err(format!(
            "{} validation error(s) in '{}':\n{}",
            errors.len(),
            args.input.display(),
            lines.join("\n")
        ));
    }

    println!(
        "Checked {} component(s): {} field(s), {} structure(s).",
        document.components.len(),
        model.field_descriptions.len(),
        model.structure_descriptions.len()
    );
    println!("fingerprint: {}", model_fingerprint(&model)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<GenerationConfig, String> {
    match path {
        Some(path) => GenerationConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display())),
        None => Ok(GenerationConfig::default()),
    }
}

fn format_model(model: &ServiceModel, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(model)
            .map(|json| format!("{json}\n"))
            .map_err(|err| format!("Failed to serialize model: {err}")),
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(model).map_err(|err| format!("Failed to serialize model: {err}"))
        }
    }
}

/// SHA-256 of the compact JSON encoding; equal models give equal digests.
fn model_fingerprint(model: &ServiceModel) -> Result<String, String> {
    let bytes = serde_json::to_vec(model).map_err(|err| format!("Failed to serialize model: {err}"))?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}
