use clap::Parser;
use console::style;
use sloth::repl::Repl;
use sloth::Object;
use std::path::PathBuf;
use std::process;

/// Runs a sloth script, or starts an interactive session when no script is given.
#[derive(Parser)]
#[command(name = "sloth", version, about)]
struct Args {
    /// Script to evaluate
    script: Option<PathBuf>,
    /// Do not print the banner before the interactive session
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    sloth::init_tracing();
    let args = Args::parse();

    match run(args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("{}", style(err).red());
            process::exit(1);
        }
    }
}

/// Returns `false` if the script evaluated to an error.
fn run(args: Args) -> Result<bool, sloth::Error> {
    match args.script {
        Some(path) => match sloth::run_file(&path)? {
            Object::Null => Ok(true),
            result if result.is_error() => {
                eprintln!("{}", style(result).red());
                Ok(false)
            }
            result => {
                println!("{}", result);
                Ok(true)
            }
        },
        None => {
            if !args.quiet {
                println!("sloth {}", env!("CARGO_PKG_VERSION"));
                println!("Press Ctrl-D to exit.");
            }
            Repl::new()?.run()?;
            Ok(true)
        }
    }
}
