use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use scicalc::{
    AngleUnit, EngineConfig, Request, Response, calculate_with, format_number, handle, handle_json,
};
use tracing_subscriber::EnvFilter;

/// Evaluates scientific calculator expressions such as `2+sqrt(16)` or
/// `pow(2, 10)`.
///
/// Expressions are read from the command line, or one per line from stdin
/// when none are given.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file with engine settings (`max_depth`, `angle_unit`).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read trigonometric arguments as radians instead of degrees.
    #[arg(short, long)]
    radians: bool,

    /// Maximum nesting of parentheses, calls and powers.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Print JSON responses. Stdin lines are then read as JSON requests.
    #[arg(short, long)]
    json: bool,

    expressions: Vec<String>,
}

impl Args {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        if self.radians {
            config.angle_unit = AngleUnit::Radians;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
            config.validate().context("invalid --max-depth")?;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every expression evaluated successfully.
fn run(args: &Args) -> Result<bool> {
    let config = args.engine_config()?;
    tracing::debug!(?config, "engine configured");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut all_ok = true;

    if args.expressions.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("failed to read stdin")?;
            if line.trim().is_empty() {
                continue;
            }
            all_ok &= if args.json {
                answer_json(&mut out, &line, &config)?
            } else {
                answer_plain(&mut out, &line, &config)?
            };
        }
    } else {
        for expression in &args.expressions {
            all_ok &= if args.json {
                let request = Request {
                    expression: expression.clone(),
                };
                write_response(&mut out, &handle(&request, &config))?
            } else {
                answer_plain(&mut out, expression, &config)?
            };
        }
    }

    Ok(all_ok)
}

/// Prints the result, or `Error` with the reason logged.
fn answer_plain(out: &mut impl Write, expression: &str, config: &EngineConfig) -> Result<bool> {
    match calculate_with(expression, config) {
        Ok(value) => {
            writeln!(out, "{}", format_number(value))?;
            Ok(true)
        }
        Err(error) => {
            tracing::warn!(expression, %error, "evaluation failed");
            writeln!(out, "Error")?;
            Ok(false)
        }
    }
}

/// Answers one JSON request line; malformed lines are skipped with a warning.
fn answer_json(out: &mut impl Write, body: &str, config: &EngineConfig) -> Result<bool> {
    match handle_json(body, config) {
        Ok(encoded) => {
            writeln!(out, "{encoded}")?;
            Ok(encoded.starts_with(r#"{"result":"#))
        }
        Err(error) => {
            tracing::warn!("skipping malformed request: {error:#}");
            Ok(false)
        }
    }
}

fn write_response(out: &mut impl Write, response: &Response) -> Result<bool> {
    writeln!(out, "{}", serde_json::to_string(response)?)?;
    Ok(response.is_success())
}
