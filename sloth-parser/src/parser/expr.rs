use super::*;
use crate::ast::{Expr, FnLiteral, Identifier, InfixOp, PrefixOp};
use crate::lexer::PREFIX_BP;
use std::rc::Rc;

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_bp`] with `min_bp = 0`.
    pub fn parse_expr(&mut self) -> Expr {
        self.parse_expr_bp(0) // 0 to accept any expression
    }

    /// Parses an expression with the specified `min_bp`.
    /// To parse any expression use, [`Self::parse_expr`].
    fn parse_expr_bp(&mut self, min_bp: u8) -> Expr {
        let mut lhs = self.parse_prefix_expr();
        if let Expr::Error = lhs {
            return lhs;
        }

        loop {
            let (l_bp, r_bp) = match self.current_token.kind.infix_bp() {
                Some(bp) => bp,
                None => break, // not a valid infix operator, stop parsing
            };
            if l_bp < min_bp {
                break; // less than the min_bp, stop parsing
            }

            // self.current_token is a valid infix operator
            lhs = match self.current_token.kind {
                TokenKind::OpenParen => self.parse_call_expr(lhs),
                TokenKind::OpenBracket => self.parse_index_expr(lhs),
                _ => self.parse_infix_expr(lhs, r_bp),
            };
        }

        lhs
    }

    /// Parses an expression that starts at the current token (no left operand).
    fn parse_prefix_expr(&mut self) -> Expr {
        match self.current_token.kind {
            TokenKind::Ident => match self.parse_identifier() {
                Some(ident) => Expr::Identifier(ident),
                None => Expr::Error,
            },
            TokenKind::Int => self.parse_integer_lit(),
            TokenKind::Str => {
                let token = self.next();
                Expr::StringLit {
                    value: token.literal.clone(),
                    token,
                }
            }
            TokenKind::True | TokenKind::False => {
                let token = self.next();
                Expr::BoolLit {
                    value: token.kind == TokenKind::True,
                    token,
                }
            }
            TokenKind::Bang | TokenKind::Minus => {
                let token = self.next();
                let op = if token.kind == TokenKind::Bang {
                    PrefixOp::Not
                } else {
                    PrefixOp::Neg
                };
                Expr::Prefix {
                    token,
                    op,
                    arg: Box::new(self.parse_expr_bp(PREFIX_BP)),
                }
            }
            TokenKind::OpenParen => self.parse_grouped_expr().unwrap_or(Expr::Error),
            TokenKind::OpenBracket => self.parse_array_lit().unwrap_or(Expr::Error),
            TokenKind::OpenBrace => self.parse_hash_lit().unwrap_or(Expr::Error),
            TokenKind::If => self.parse_if_expr().unwrap_or(Expr::Error),
            TokenKind::Fn => self.parse_fn_lit().unwrap_or(Expr::Error),
            TokenKind::UnterminatedStr => {
                self.error("unterminated string literal");
                self.next();
                Expr::Error
            }
            TokenKind::Illegal => {
                self.error(format!("illegal token {:?}", self.current_token.literal));
                self.next();
                Expr::Error
            }
            kind => {
                self.error(format!("no prefix parse function for {} found", kind));
                Expr::Error
            }
        }
    }

    /* Expressions.Literals */
    fn parse_integer_lit(&mut self) -> Expr {
        match self.current_token.literal.parse::<i64>() {
            Ok(value) => Expr::IntegerLit {
                token: self.next(),
                value,
            },
            Err(_) => {
                self.error(format!(
                    "could not parse {:?} as integer",
                    self.current_token.literal
                ));
                self.next();
                Expr::Error
            }
        }
    }

    /// Parses `[<expr>, ...]`.
    fn parse_array_lit(&mut self) -> Option<Expr> {
        let token = self.next();
        let elements = self.parse_expr_list(TokenKind::CloseBracket)?;
        Some(Expr::ArrayLit { token, elements })
    }

    /// Parses `{<expr>: <expr>, ...}`.
    fn parse_hash_lit(&mut self) -> Option<Expr> {
        let token = self.next();
        let mut pairs = Vec::new();

        if !self.eat(TokenKind::CloseBrace) {
            loop {
                let key = self.parse_expr();
                self.expect(TokenKind::Colon)?;
                let value = self.parse_expr();
                pairs.push((key, value));

                if !self.eat(TokenKind::Comma) {
                    self.expect(TokenKind::CloseBrace)?;
                    break;
                }
            }
        }

        Some(Expr::HashLit { token, pairs })
    }

    /// Parses `fn(<params>) { <body> }`.
    fn parse_fn_lit(&mut self) -> Option<Expr> {
        let token = self.next();
        self.expect(TokenKind::OpenParen)?;

        let mut params = Vec::new();
        if !self.eat(TokenKind::CloseParen) {
            loop {
                params.push(self.parse_identifier()?);

                if !self.eat(TokenKind::Comma) {
                    self.expect(TokenKind::CloseParen)?;
                    break;
                }
            }
        }

        let body = self.parse_block_stmt()?;
        Some(Expr::FnLit(Rc::new(FnLiteral {
            token,
            params,
            body,
        })))
    }

    /* Expressions.Identifier */
    pub(super) fn parse_identifier(&mut self) -> Option<Identifier> {
        let token = self.expect(TokenKind::Ident)?;
        Some(Identifier {
            name: token.literal.clone(),
            token,
        })
    }

    /* Expressions.Compound */
    /// Parses `(<expr>)`.
    fn parse_grouped_expr(&mut self) -> Option<Expr> {
        self.next();
        let expr = self.parse_expr();
        self.expect(TokenKind::CloseParen)?;
        Some(expr)
    }

    /// Parses `if (<condition>) { ... }` with an optional `else { ... }`.
    fn parse_if_expr(&mut self) -> Option<Expr> {
        let token = self.next();

        self.expect(TokenKind::OpenParen)?;
        let condition = self.parse_expr();
        self.expect(TokenKind::CloseParen)?;

        let consequence = self.parse_block_stmt()?;
        let alternative = if self.eat(TokenKind::Else) {
            Some(self.parse_block_stmt()?)
        } else {
            None
        };

        Some(Expr::If {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_infix_expr(&mut self, lhs: Expr, r_bp: u8) -> Expr {
        let token = self.next();
        let op = match token.kind {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Sub,
            TokenKind::Asterisk => InfixOp::Mul,
            TokenKind::Slash => InfixOp::Div,
            TokenKind::LessThan => InfixOp::Less,
            TokenKind::GreaterThan => InfixOp::Greater,
            TokenKind::EqualsEquals => InfixOp::Eq,
            TokenKind::NotEquals => InfixOp::NotEq,
            _ => unreachable!("{} has no infix operator", token.kind),
        };
        let rhs = self.parse_expr_bp(r_bp);

        Expr::Infix {
            token,
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    /// Parses `<callee>(<args>)`. The current token is `(`.
    fn parse_call_expr(&mut self, callee: Expr) -> Expr {
        let token = self.next();
        match self.parse_expr_list(TokenKind::CloseParen) {
            Some(args) => Expr::Call {
                token,
                callee: Box::new(callee),
                args,
            },
            None => Expr::Error,
        }
    }

    /// Parses `<lhs>[<index>]`. The current token is `[`.
    fn parse_index_expr(&mut self, lhs: Expr) -> Expr {
        let token = self.next();
        let index = self.parse_expr();
        if self.expect(TokenKind::CloseBracket).is_none() {
            return Expr::Error;
        }

        Expr::Index {
            token,
            lhs: Box::new(lhs),
            index: Box::new(index),
        }
    }

    /// Parses a comma separated list of expressions terminated by `end`.
    /// The opening delimiter must already be eaten.
    fn parse_expr_list(&mut self, end: TokenKind) -> Option<Vec<Expr>> {
        let mut list = Vec::new();

        if !self.eat(end) {
            loop {
                list.push(self.parse_expr());

                if !self.eat(TokenKind::Comma) {
                    self.expect(end)?;
                    break;
                }
            }
        }

        Some(list)
    }
}
