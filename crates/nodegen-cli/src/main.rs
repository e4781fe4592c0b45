//! nodegen
//!
//! Command-line front end: loads a model directory, generates the accessor
//! tree and writes it out.

mod config;

use clap::{Args, Parser, Subcommand};
use config::{CliConfig, ConfigError};
use nodegen_build::{
    GenerateError,
    sink::{FsSink, MemorySink, persist},
};
use nodegen_schema::{build::BuildError, validate::validate_model};
use std::{path::PathBuf, process::ExitCode};
use thiserror::Error as ThisError;
use tracing_subscriber::EnvFilter;

/// Exit code when generation succeeded but some artifacts were not written.
const EXIT_PARTIAL: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "nodegen", version, about, long_about = None)]
struct Cli {
    /// Config file, defaults to ./nodegen.toml when present
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate artifacts from a model directory
    Generate(GenerateArgs),

    /// Load, validate and generate in memory without writing anything
    Check(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Directory holding `.mm.json` model files
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Descend into subdirectories
    #[arg(long)]
    deep: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output directory
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Qualified name of the generated plugin/model pair
    #[arg(long)]
    target: Option<String>,

    /// Path of the host runtime crate
    #[arg(long)]
    host: Option<String>,

    /// Module path the generated tree is mounted under
    #[arg(long)]
    root: Option<String>,

    /// Make setters of indexed attributes refresh their index
    #[arg(long)]
    reindex_on_write: bool,

    /// List the artifacts instead of writing them
    #[arg(long)]
    dry_run: bool,

    /// With --dry-run, print the artifacts as JSON
    #[arg(long, requires = "dry_run")]
    json: bool,
}

///
/// CliError
///

#[derive(Debug, ThisError)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Pipeline(#[from] nodegen_build::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "nodegen failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let mut config = CliConfig::resolve(cli.config.as_deref())?;

    match cli.cmd {
        Command::Generate(args) => generate(&mut config, args),
        Command::Check(args) => check(&mut config, &args),
    }
}

fn apply_input(config: &mut CliConfig, args: &InputArgs) {
    if let Some(input) = &args.input {
        config.input.dir.clone_from(input);
    }
    config.input.deep |= args.deep;
}

// generate
fn generate(config: &mut CliConfig, args: GenerateArgs) -> Result<ExitCode, CliError> {
    apply_input(config, &args.input);
    if let Some(out) = args.out {
        config.output.dir = out;
    }
    if let Some(target) = args.target {
        config.generator.target = target;
    }
    if let Some(host) = args.host {
        config.generator.host = host;
    }
    if let Some(root) = args.root {
        config.generator.root = root;
    }
    config.generator.reindex_on_write |= args.reindex_on_write;

    if args.dry_run {
        let model = nodegen_build::load_model(&config.input.dir, config.input.deep)?;
        let artifacts = nodegen_build::generate(&model, &config.generator)?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&artifacts)?);
        } else {
            let mut sink = MemorySink::new();
            persist(&artifacts, &mut sink);
            for (path, body) in sink.files() {
                println!("{}\t{} lines", path.display(), body.lines().count());
            }
        }

        return Ok(ExitCode::SUCCESS);
    }

    let mut sink = FsSink::new(&config.output.dir);
    let report = nodegen_build::generate_dir(
        &config.input.dir,
        config.input.deep,
        &config.generator,
        &mut sink,
    )?;

    for (artifact, err) in &report.failed {
        eprintln!("not written: {artifact}: {err}");
    }
    if !report.is_complete() {
        eprintln!(
            "{} of {} artifacts written to {}",
            report.written.len(),
            report.total(),
            sink.root().display()
        );
        return Ok(ExitCode::from(EXIT_PARTIAL));
    }

    println!(
        "{} artifacts written to {}",
        report.written.len(),
        sink.root().display()
    );

    Ok(ExitCode::SUCCESS)
}

// check
// diagnostics are reported and fail the check; they never fail generate
fn check(config: &mut CliConfig, args: &InputArgs) -> Result<ExitCode, CliError> {
    apply_input(config, args);

    let model = nodegen_build::load_model(&config.input.dir, config.input.deep)?;
    let artifacts = nodegen_build::generate(&model, &config.generator)?;
    let diagnostics = validate_model(&model);

    for diag in &diagnostics {
        println!("{diag}");
    }
    println!(
        "{} classifiers, {} artifacts, {} diagnostics",
        model.len(),
        artifacts.len(),
        diagnostics.len()
    );

    Ok(if diagnostics.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_requires_dry_run() {
        let err = Cli::try_parse_from(["nodegen", "generate", "--json"]).unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn flags_override_the_config_file() {
        let cli = Cli::try_parse_from([
            "nodegen",
            "generate",
            "--input",
            "schema",
            "--deep",
            "--target",
            "sample.Sample",
            "--dry-run",
        ])
        .unwrap();
        let Command::Generate(args) = cli.cmd else {
            panic!("expected generate");
        };

        let mut config = CliConfig::default();
        apply_input(&mut config, &args.input);

        assert_eq!(config.input.dir, PathBuf::from("schema"));
        assert!(config.input.deep);
        assert_eq!(args.target.as_deref(), Some("sample.Sample"));
    }

    #[test]
    fn generate_writes_into_the_output_dir() {
        let models = tempfile::tempdir().unwrap();
        std::fs::write(
            models.path().join("sample.mm.json"),
            r#"{ "classifiers": [ { "kind": "class", "name": "sample.Person" } ] }"#,
        )
        .unwrap();
        let out = tempfile::tempdir().unwrap();

        let cli = Cli::try_parse_from([
            "nodegen",
            "generate",
            "--input",
            models.path().to_str().unwrap(),
            "--out",
            out.path().to_str().unwrap(),
            "--target",
            "sample.Sample",
        ])
        .unwrap();
        let Command::Generate(args) = cli.cmd else {
            panic!("expected generate");
        };

        generate(&mut CliConfig::default(), args).unwrap();

        assert!(out.path().join("sample/person.rs").is_file());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let models = tempfile::tempdir().unwrap();
        std::fs::write(
            models.path().join("sample.mm.json"),
            r#"{ "classifiers": [ { "kind": "class", "name": "sample.Person" } ] }"#,
        )
        .unwrap();
        let out = tempfile::tempdir().unwrap();

        let cli = Cli::try_parse_from([
            "nodegen",
            "generate",
            "--input",
            models.path().to_str().unwrap(),
            "--out",
            out.path().to_str().unwrap(),
            "--target",
            "sample.Sample",
            "--dry-run",
        ])
        .unwrap();
        let Command::Generate(args) = cli.cmd else {
            panic!("expected generate");
        };

        generate(&mut CliConfig::default(), args).unwrap();

        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
