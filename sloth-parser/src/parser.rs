use crate::ast::{Program, Stmt};
use crate::lexer::{Lexer, Token, TokenKind};
use sloth_source::{Source, SyntaxError};
use std::mem;

mod expr;
mod stmt;

pub struct Parser<'a> {
    /// Cached token for peeking.
    current_token: Token,
    lexer: Lexer<'a>,
    /// Source code
    source: &'a Source<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        let mut lexer = Lexer::new(source.content);
        Self {
            current_token: lexer.next_token(),
            lexer,
            source,
        }
    }

    /// Parses the whole source. Syntax errors are reported to `source.errors`;
    /// a program parsed with errors must not be evaluated.
    pub fn parse_program(&mut self) -> Program {
        let statements = self.parse_stmt_list(TokenKind::Eof);

        tracing::debug!(
            statements = statements.len(),
            errors = self.source.errors.len(),
            "parsed program"
        );
        Program { statements }
    }

    /// Parses statements until `end` (or end of input) is reached. Does not consume `end`.
    /// Statements that failed to parse are dropped.
    fn parse_stmt_list(&mut self, end: TokenKind) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while self.current_token.kind != end && self.current_token.kind != TokenKind::Eof {
            let start = self.current_token.span.start;
            let stmt = self.parse_stmt();
            if !matches!(stmt, Stmt::Error) {
                statements.push(stmt);
            }
            // skip the offending token so the next statement can be parsed
            if self.current_token.span.start == start && self.current_token.kind != TokenKind::Eof {
                self.next();
            }
        }
        statements
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    /// Advances to the next token and returns the token that was current.
    fn next(&mut self) -> Token {
        let token = self.lexer.next_token();
        mem::replace(&mut self.current_token, token)
    }

    /// Predicate that tests whether the current token is of kind `kind` and eats it if yes as a side effect.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current_token.kind == kind {
            self.next(); // eat token
            true
        } else {
            false
        }
    }

    /// Eats and returns the current token if it is of kind `kind`. Raises an error otherwise.
    fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        if self.current_token.kind == kind {
            Some(self.next())
        } else {
            self.error(format!(
                "expected next token to be {}, got {} instead",
                kind, self.current_token.kind
            ));
            None
        }
    }

    /// Raises an error at the current token.
    fn error(&self, message: impl ToString) {
        self.source
            .errors
            .add_error(SyntaxError::new(message, self.current_token.span.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use insta::assert_snapshot;

    fn parse(source: &str) -> (Program, Vec<String>) {
        let source = source.into();
        let program = Parser::new(&source).parse_program();
        let errors = source.errors.messages();
        (program, errors)
    }

    fn program(source: &str) -> String {
        let (program, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        program.to_string()
    }

    fn errors(source: &str) -> Vec<String> {
        parse(source).1
    }

    #[test]
    fn test_let_stmt() {
        {
            let (program, errors) = parse("let x = 5;");
            assert!(errors.is_empty());
            assert_eq!(program.statements.len(), 1);
            match &program.statements[0] {
                Stmt::Let {
                    token,
                    ident,
                    initializer,
                } => {
                    assert_eq!(token.literal, "let");
                    assert_eq!(ident.name, "x");
                    assert!(matches!(initializer, Expr::IntegerLit { value: 5, .. }));
                }
                stmt => panic!("expected let statement, got {:?}", stmt),
            }
        }

        assert_snapshot!(program("let x = 5"), @"let x = 5;");
        assert_snapshot!(program("let foobar = y;"), @"let foobar = y;");
    }

    #[test]
    fn test_return_stmt() {
        assert_snapshot!(program("return 5;"), @"return 5;");
        assert_snapshot!(program("return x + 1"), @"return (x + 1);");
        assert_snapshot!(program("return;"), @"return;");
        assert_snapshot!(program("return"), @"return;");
        assert_snapshot!(program("fn() { return }"), @"fn() { return; }");
    }

    #[test]
    fn test_multiple_statements() {
        assert_eq!(
            program("let a = 1; a; 3 + 4; -5 * 5"),
            "let a = 1;\na\n(3 + 4)\n((-5) * 5)"
        );
        assert_eq!(program(""), "");
    }

    #[test]
    fn test_let_errors() {
        assert_eq!(
            errors("let x 5;"),
            vec!["expected next token to be ASSIGN, got INT instead"]
        );
        assert_eq!(
            errors("let 838383;"),
            vec!["expected next token to be IDENT, got INT instead"]
        );
        assert_eq!(
            errors("let x 5; let = 10; let 838383;"),
            vec![
                "expected next token to be ASSIGN, got INT instead",
                "expected next token to be IDENT, got ASSIGN instead",
                "no prefix parse function for ASSIGN found",
                "expected next token to be IDENT, got INT instead",
            ]
        );
    }

    #[test]
    fn test_recovery_keeps_valid_statements() {
        let (program, errors) = parse("let = 1; let y = 2;");
        assert_eq!(errors.len(), 2);
        assert_eq!(program.to_string(), "1\nlet y = 2;");
    }

    #[test]
    fn test_error_positions() {
        let source = "let x = 5;\nlet y 6;".into();
        Parser::new(&source).parse_program();
        let errors = source.errors.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 17..18);
    }

    #[test]
    fn test_unbalanced_delimiters() {
        assert_eq!(
            errors("if (x < y) { x"),
            vec!["expected next token to be RBRACE, got EOF instead"]
        );
        assert_eq!(
            errors("add(1, 2"),
            vec!["expected next token to be RPAREN, got EOF instead"]
        );
        assert_eq!(
            errors("[1, 2"),
            vec!["expected next token to be RBRACKET, got EOF instead"]
        );
        assert_eq!(
            errors("{\"a\" 1}"),
            vec![
                "expected next token to be COLON, got INT instead",
                "no prefix parse function for RBRACE found",
            ]
        );
    }

    #[test]
    fn test_lexical_errors() {
        assert_eq!(errors("1 + @"), vec!["illegal token \"@\""]);
        assert_eq!(errors("let s = \"abc"), vec!["unterminated string literal"]);
        assert_eq!(
            errors("99999999999999999999"),
            vec!["could not parse \"99999999999999999999\" as integer"]
        );
    }
}
