//! Sloth, a small dynamically typed language with first class functions and closures.
//!
//! [`parse`] turns source text into a [`Program`] and a list of diagnostics, [`eval`] runs a
//! program in an [`Env`] and [`interpret`] does both.

pub mod repl;

use sloth_parser::{ast::Program, parser::Parser};
use sloth_source::Source;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

pub use sloth_eval::builtins;
pub use sloth_value::{Env, Environment, Object};

/// Host level failures. Evaluation errors are [`Object::Error`] values, not this.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read `{}`: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}", format_parser_errors(.0))]
    Parse(Vec<String>),
    #[error("line editor failed: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Parses `source`. The program must not be evaluated if any diagnostics are returned.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let source: Source = source.into();
    let program = Parser::new(&source).parse_program();
    let diagnostics = source.errors.messages();
    (program, diagnostics)
}

/// Evaluates `program` in `env`, which keeps every top level binding the program makes.
pub fn eval(program: &Program, env: &Env) -> Object {
    sloth_eval::eval_program(program, env)
}

/// Parses and evaluates `source` in `env`. Nothing is evaluated if parsing fails.
pub fn interpret(source: &str, env: &Env) -> Result<Object, Error> {
    let (program, diagnostics) = parse(source);
    if !diagnostics.is_empty() {
        return Err(Error::Parse(diagnostics));
    }
    Ok(eval(&program, env))
}

/// Reads the script at `path` and interprets it in a fresh environment.
pub fn run_file(path: &Path) -> Result<Object, Error> {
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "running script");
    interpret(&source, &Environment::new())
}

/// Renders diagnostics as a `parser errors:` heading followed by one indented line each.
pub fn format_parser_errors(diagnostics: &[String]) -> String {
    let mut out = String::from("parser errors:");
    for message in diagnostics {
        out.push_str("\n\t");
        out.push_str(message);
    }
    out
}

static TRACING_INIT: Once = Once::new();

/// Installs a `tracing` subscriber filtered by `RUST_LOG`, e.g. `RUST_LOG=sloth_eval=trace`.
/// Does nothing when `RUST_LOG` is unset. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
