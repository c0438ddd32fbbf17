//! Lexer, syntax tree and Pratt parser for sloth.

pub mod ast;
pub mod lexer;
pub mod parser;
