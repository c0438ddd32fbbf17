//! Syntax tree produced by [`crate::parser::Parser`].
//!
//! Every node keeps the token it started at. `Display` renders a node back to source-like text with
//! every prefix and infix operation parenthesized, e.g. `1 + 2 * 3` renders as `(1 + (2 * 3))`.

use crate::lexer::Token;
use std::fmt;
use std::rc::Rc;

/// The root node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

/// A brace delimited list of statements. Used as the body of `if`, `else` and `fn`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    /// The `{` token.
    pub token: Token,
    pub statements: Vec<Stmt>,
}

/// A function literal. Shared between the tree and every function object created from it.
#[derive(Debug, Clone, PartialEq)]
pub struct FnLiteral {
    /// The `fn` token.
    pub token: Token,
    pub params: Vec<Identifier>,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let <ident> = <initializer>;`
    Let {
        token: Token,
        ident: Identifier,
        initializer: Expr,
    },
    /// `return <value>;`. A bare `return;` has no value.
    Return { token: Token, value: Option<Expr> },
    /// An expression used as a statement. The trailing semicolon is optional.
    Expr { token: Token, expr: Expr },
    /// Placeholder for a statement that failed to parse.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    /// `!`
    Not,
    /// `-`
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Less,
    Greater,
    Eq,
    NotEq,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An identifier (e.g. `foo`).
    Identifier(Identifier),
    IntegerLit {
        token: Token,
        value: i64,
    },
    StringLit {
        token: Token,
        value: String,
    },
    BoolLit {
        token: Token,
        value: bool,
    },
    /// `[a, b, c]`
    ArrayLit {
        token: Token,
        elements: Vec<Expr>,
    },
    /// `{k: v, ...}`. Pairs are kept in source order.
    HashLit {
        token: Token,
        pairs: Vec<(Expr, Expr)>,
    },
    /// A prefix expression (e.g. `-x`).
    Prefix {
        token: Token,
        op: PrefixOp,
        arg: Box<Expr>,
    },
    /// A binary expression (e.g. `1+1`).
    Infix {
        token: Token,
        lhs: Box<Expr>,
        op: InfixOp,
        rhs: Box<Expr>,
    },
    /// `if (<condition>) { ... } else { ... }`
    If {
        token: Token,
        condition: Box<Expr>,
        consequence: BlockStmt,
        alternative: Option<BlockStmt>,
    },
    FnLit(Rc<FnLiteral>),
    /// `<callee>(<args>)`
    Call {
        token: Token,
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `<lhs>[<index>]`
    Index {
        token: Token,
        lhs: Box<Expr>,
        index: Box<Expr>,
    },
    /// Placeholder for an expression that failed to parse.
    Error,
}

impl PrefixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Neg => "-",
        }
    }
}

impl InfixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Less => "<",
            InfixOp::Greater => ">",
            InfixOp::Eq => "==",
            InfixOp::NotEq => "!=",
        }
    }
}

/// Writes `items` separated by `sep`.
fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, &self.statements, "\n")
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for BlockStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        write_list(f, &self.statements, " ")?;
        if !self.statements.is_empty() {
            f.write_str(" ")?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for FnLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        write_list(f, &self.params, ", ")?;
        write!(f, ") {}", self.body)
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let {
                ident, initializer, ..
            } => write!(f, "let {} = {};", ident, initializer),
            Stmt::Return {
                value: Some(value), ..
            } => write!(f, "return {};", value),
            Stmt::Return { value: None, .. } => f.write_str("return;"),
            Stmt::Expr { expr, .. } => write!(f, "{}", expr),
            Stmt::Error => f.write_str("<error>"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(ident) => write!(f, "{}", ident),
            Expr::IntegerLit { value, .. } => write!(f, "{}", value),
            Expr::StringLit { value, .. } => write!(f, "\"{}\"", value),
            Expr::BoolLit { value, .. } => write!(f, "{}", value),
            Expr::ArrayLit { elements, .. } => {
                f.write_str("[")?;
                write_list(f, elements, ", ")?;
                f.write_str("]")
            }
            Expr::HashLit { pairs, .. } => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Expr::Prefix { op, arg, .. } => write!(f, "({}{})", op.as_str(), arg),
            Expr::Infix { lhs, op, rhs, .. } => write!(f, "({} {} {})", lhs, op.as_str(), rhs),
            Expr::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if {} {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            Expr::FnLit(func) => write!(f, "{}", func),
            Expr::Call { callee, args, .. } => {
                write!(f, "{}(", callee)?;
                write_list(f, args, ", ")?;
                f.write_str(")")
            }
            Expr::Index { lhs, index, .. } => write!(f, "({}[{}])", lhs, index),
            Expr::Error => f.write_str("<error>"),
        }
    }
}
