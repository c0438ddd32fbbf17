//! Interactive session.

use crate::{eval, format_parser_errors, parse, Error};
use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use sloth_parser::ast::Stmt;
use sloth_value::{Env, Environment, Object};

const PROMPT: &str = ">>> ";

/// What a line of input produced.
#[derive(Debug)]
pub enum Output {
    /// The line only bound names, or was empty.
    Nothing,
    Value(Object),
    ParserErrors(Vec<String>),
}

/// Evaluation state shared by every line of a session.
pub struct Session {
    env: Env,
}

impl Session {
    pub fn new() -> Session {
        Session {
            env: Environment::new(),
        }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Parses and evaluates one line. Bindings made by earlier lines stay visible.
    pub fn eval_line(&mut self, line: &str) -> Output {
        let (program, diagnostics) = parse(line);
        if !diagnostics.is_empty() {
            return Output::ParserErrors(diagnostics);
        }

        let result = eval(&program, &self.env);
        match program.statements.last() {
            Some(Stmt::Let { .. }) | None if !result.is_error() => Output::Nothing,
            _ => Output::Value(result),
        }
    }
}

impl Default for Session {
    fn default() -> Session {
        Session::new()
    }
}

pub struct Repl {
    editor: DefaultEditor,
    session: Session,
}

impl Repl {
    pub fn new() -> Result<Repl, Error> {
        Ok(Repl {
            editor: DefaultEditor::new()?,
            session: Session::new(),
        })
    }

    /// Reads lines until end of input. Ctrl-C discards the current line.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(line.as_str())?;

                    match self.session.eval_line(&line) {
                        Output::Nothing => {}
                        Output::Value(value) if value.is_error() => {
                            println!("{}", style(value).red())
                        }
                        Output::Value(value) => println!("{}", value),
                        Output::ParserErrors(diagnostics) => {
                            println!("{}", style(format_parser_errors(&diagnostics)).red())
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}
