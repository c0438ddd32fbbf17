use super::*;
use crate::ast::{BlockStmt, Expr};

impl<'a> Parser<'a> {
    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> Stmt {
        match self.current_token.kind {
            TokenKind::Let => self.parse_let_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            _ => {
                // expression statement
                let token = self.current_token.clone();
                let expr = self.parse_expr();
                self.eat(TokenKind::Semi); // semicolon is optional
                match expr {
                    Expr::Error => Stmt::Error,
                    expr => Stmt::Expr { token, expr },
                }
            }
        }
    }

    /// Parses `{ <stmt>* }`.
    pub fn parse_block_stmt(&mut self) -> Option<BlockStmt> {
        let token = self.expect(TokenKind::OpenBrace)?;
        let statements = self.parse_stmt_list(TokenKind::CloseBrace);
        self.expect(TokenKind::CloseBrace)?;

        Some(BlockStmt { token, statements })
    }

    fn parse_let_stmt(&mut self) -> Stmt {
        let token = self.next();
        let ident = match self.parse_identifier() {
            Some(ident) => ident,
            None => return Stmt::Error,
        };
        if self.expect(TokenKind::Assign).is_none() {
            return Stmt::Error;
        }
        let initializer = self.parse_expr();
        self.eat(TokenKind::Semi);

        Stmt::Let {
            token,
            ident,
            initializer,
        }
    }

    fn parse_return_stmt(&mut self) -> Stmt {
        let token = self.next();
        let value = match self.current_token.kind {
            // bare `return`
            TokenKind::Semi | TokenKind::CloseBrace | TokenKind::Eof => None,
            _ => Some(self.parse_expr()),
        };
        self.eat(TokenKind::Semi);

        Stmt::Return { token, value }
    }
}
