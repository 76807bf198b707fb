use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result, bail};

use minijs::interpreter::{DiagnosticsTarget, Interpreter, InterpreterOptions};
use minijs::{lexer, parser};

/// Installs a stderr `tracing` subscriber when `RUST_LOG` is set,
/// e.g. `RUST_LOG=minijs=debug`.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let mut options = InterpreterOptions::default();
    let mut input_path: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--diagnostics" | "-d" => {
                let target = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("Missing diagnostics target after {arg}"))?;
                options.diagnostics = match target.as_str() {
                    "output" => DiagnosticsTarget::Output,
                    "stderr" => DiagnosticsTarget::Separate,
                    other => bail!("Unknown diagnostics target '{other}' (expected output or stderr)"),
                };
            }
            "--strict-arity" => options.strict_arity = true,
            _ => {
                input_path = Some(arg);
                if args.next().is_some() {
                    bail!("Only one input file is supported");
                }
                break;
            }
        }
    }

    let source = if let Some(path) = input_path {
        fs::read_to_string(&path).with_context(|| format!("Reading {path}"))?
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Reading stdin")?;
        buffer
    };

    let tokens = lexer::tokenize(&source).context("Tokenizing")?;
    let program = parser::parse_tokens(tokens).context("Parsing")?;
    tracing::debug!(statements = program.statements.len(), "parsed program");

    Interpreter::with_options(options)
        .run_streaming(&program)
        .context("Running")?;
    Ok(())
}
