//! Tree-walking evaluator.

pub mod builtins;
pub mod eval;

pub use eval::{apply_function, eval_program};
