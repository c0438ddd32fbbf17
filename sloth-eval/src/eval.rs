//! Tree-walking evaluation of a [`Program`].
//!
//! Errors and `return` are values: a [`Object::Error`] or [`Object::ReturnValue`] produced by a
//! child is handed back unchanged by every parent. Blocks pass `ReturnValue` through; only a
//! function call or the program itself unwraps it.

use crate::builtins;
use sloth_parser::ast::{BlockStmt, Expr, Identifier, InfixOp, PrefixOp, Program, Stmt};
use sloth_value::{Env, Environment, Function, Hash, HashPair, Object, NULL};
use std::convert::TryFrom;
use std::rc::Rc;

/// Evaluates `$expr` and returns it from the enclosing function if it is an error or a `return`
/// on its way out.
macro_rules! try_eval {
    ($expr: expr) => {{
        let value: Object = $expr;
        if is_unwinding(&value) {
            return value;
        }
        value
    }};
}

fn is_unwinding(value: &Object) -> bool {
    matches!(value, Object::Error(_) | Object::ReturnValue(_))
}

/// Evaluates every statement of `program` in `env` and returns the value of the last one.
/// Stops at the first error or top level `return`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn eval_program(program: &Program, env: &Env) -> Object {
    let mut result = NULL;
    for stmt in &program.statements {
        result = eval_stmt(stmt, env);
        match result {
            Object::ReturnValue(value) => return *value,
            Object::Error(ref message) => {
                tracing::debug!(%message, "evaluation failed");
                return result;
            }
            _ => {}
        }
    }
    result
}

/// Unlike [`eval_program`], leaves a `ReturnValue` wrapped so it keeps unwinding.
fn eval_block(block: &BlockStmt, env: &Env) -> Object {
    let mut result = NULL;
    for stmt in &block.statements {
        result = eval_stmt(stmt, env);
        if is_unwinding(&result) {
            return result;
        }
    }
    result
}

pub fn eval_stmt(stmt: &Stmt, env: &Env) -> Object {
    match stmt {
        Stmt::Let {
            ident, initializer, ..
        } => {
            let value = try_eval!(eval_expr(initializer, env));
            env.borrow_mut().set(&ident.name, value);
            NULL
        }
        Stmt::Return { value, .. } => {
            let value = match value {
                Some(expr) => try_eval!(eval_expr(expr, env)),
                None => NULL,
            };
            Object::ReturnValue(Box::new(value))
        }
        Stmt::Expr { expr, .. } => eval_expr(expr, env),
        Stmt::Error => Object::error("cannot evaluate a statement that failed to parse"),
    }
}

pub fn eval_expr(expr: &Expr, env: &Env) -> Object {
    match expr {
        Expr::Identifier(ident) => eval_identifier(ident, env),
        Expr::IntegerLit { value, .. } => Object::Integer(*value),
        Expr::StringLit { value, .. } => Object::string(value.as_str()),
        Expr::BoolLit { value, .. } => Object::from_bool(*value),
        Expr::ArrayLit { elements, .. } => match eval_exprs(elements, env) {
            Ok(elements) => Object::array(elements),
            Err(err) => err,
        },
        Expr::HashLit { pairs, .. } => eval_hash_lit(pairs, env),
        Expr::Prefix { op, arg, .. } => {
            let arg = try_eval!(eval_expr(arg, env));
            eval_prefix_expr(*op, arg)
        }
        Expr::Infix { lhs, op, rhs, .. } => {
            let lhs = try_eval!(eval_expr(lhs, env));
            let rhs = try_eval!(eval_expr(rhs, env));
            eval_infix_expr(*op, lhs, rhs)
        }
        Expr::If {
            condition,
            consequence,
            alternative,
            ..
        } => {
            let condition = try_eval!(eval_expr(condition, env));
            if condition.is_truthy() {
                eval_block(consequence, env)
            } else if let Some(alternative) = alternative {
                eval_block(alternative, env)
            } else {
                NULL
            }
        }
        Expr::FnLit(literal) => Object::Function(Rc::new(Function {
            literal: Rc::clone(literal),
            env: Rc::clone(env),
        })),
        Expr::Call { callee, args, .. } => {
            let func = try_eval!(eval_expr(callee, env));
            match eval_exprs(args, env) {
                Ok(args) => apply_function(func, args),
                Err(err) => err,
            }
        }
        Expr::Index { lhs, index, .. } => {
            let lhs = try_eval!(eval_expr(lhs, env));
            let index = try_eval!(eval_expr(index, env));
            eval_index_expr(lhs, index)
        }
        Expr::Error => Object::error("cannot evaluate an expression that failed to parse"),
    }
}

/// Evaluates `exprs` left to right, stopping at the first error.
fn eval_exprs(exprs: &[Expr], env: &Env) -> Result<Vec<Object>, Object> {
    exprs
        .iter()
        .map(|expr| {
            let value = eval_expr(expr, env);
            if is_unwinding(&value) {
                Err(value)
            } else {
                Ok(value)
            }
        })
        .collect()
}

/// Bindings in scope shadow builtins.
fn eval_identifier(ident: &Identifier, env: &Env) -> Object {
    let value = env.borrow().get(&ident.name);
    value
        .or_else(|| builtins::lookup(&ident.name))
        .unwrap_or_else(|| Object::error(format!("identifier not found: {}", ident.name)))
}

fn eval_hash_lit(pairs: &[(Expr, Expr)], env: &Env) -> Object {
    let mut hash = Hash::default();
    for (key_expr, value_expr) in pairs {
        let key = try_eval!(eval_expr(key_expr, env));
        let hash_key = match key.as_hashable() {
            Some(hashable) => hashable.hash_key(),
            None => return Object::error(format!("unusable as hash key: {}", key.object_type())),
        };
        let value = try_eval!(eval_expr(value_expr, env));
        hash.insert(hash_key, HashPair { key, value });
    }
    Object::Hash(Rc::new(hash))
}

fn eval_prefix_expr(op: PrefixOp, arg: Object) -> Object {
    match (op, arg) {
        (PrefixOp::Not, arg) => Object::from_bool(!arg.is_truthy()),
        (PrefixOp::Neg, Object::Integer(value)) => Object::Integer(value.wrapping_neg()),
        (PrefixOp::Neg, arg) => Object::error(format!("unknown operator: -{}", arg.object_type())),
    }
}

fn eval_infix_expr(op: InfixOp, lhs: Object, rhs: Object) -> Object {
    match (op, &lhs, &rhs) {
        (_, Object::Integer(l), Object::Integer(r)) => eval_integer_infix_expr(op, *l, *r),
        (InfixOp::Eq, _, _) => Object::from_bool(lhs.is_identical(&rhs)),
        (InfixOp::NotEq, _, _) => Object::from_bool(!lhs.is_identical(&rhs)),
        _ if lhs.object_type() != rhs.object_type() => Object::error(format!(
            "type mismatch: {} {} {}",
            lhs.object_type(),
            op.as_str(),
            rhs.object_type()
        )),
        (InfixOp::Add, Object::String(l), Object::String(r)) => {
            Object::string(format!("{}{}", l, r))
        }
        _ => Object::error(format!(
            "unknown operator: {} {} {}",
            lhs.object_type(),
            op.as_str(),
            rhs.object_type()
        )),
    }
}

/// Arithmetic wraps on overflow like native 64-bit integers. Division truncates toward zero.
fn eval_integer_infix_expr(op: InfixOp, l: i64, r: i64) -> Object {
    match op {
        InfixOp::Add => Object::Integer(l.wrapping_add(r)),
        InfixOp::Sub => Object::Integer(l.wrapping_sub(r)),
        InfixOp::Mul => Object::Integer(l.wrapping_mul(r)),
        InfixOp::Div if r == 0 => Object::error(format!("division by zero: {} / 0", l)),
        InfixOp::Div => Object::Integer(l.wrapping_div(r)),
        InfixOp::Less => Object::from_bool(l < r),
        InfixOp::Greater => Object::from_bool(l > r),
        InfixOp::Eq => Object::from_bool(l == r),
        InfixOp::NotEq => Object::from_bool(l != r),
    }
}

/// Out of bounds array access and missing hash keys yield `null`.
fn eval_index_expr(lhs: Object, index: Object) -> Object {
    match (&lhs, &index) {
        (Object::Array(elements), Object::Integer(i)) => usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(NULL),
        (Object::Hash(hash), _) => match index.as_hashable() {
            Some(hashable) => hash
                .get(&hashable.hash_key())
                .map(|pair| pair.value.clone())
                .unwrap_or(NULL),
            None => Object::error(format!("unusable as hash key: {}", index.object_type())),
        },
        _ => Object::error(format!(
            "index operator not supported: {}",
            lhs.object_type()
        )),
    }
}

/// Calls a user function or builtin with already evaluated arguments.
pub fn apply_function(func: Object, args: Vec<Object>) -> Object {
    match func {
        Object::Function(func) => {
            let params = &func.literal.params;
            if params.len() != args.len() {
                return Object::error(format!(
                    "wrong number of arguments: want={}, got={}",
                    params.len(),
                    args.len()
                ));
            }
            tracing::trace!(arity = params.len(), "applying function");

            let env = Environment::new_enclosed(&func.env);
            {
                let mut scope = env.borrow_mut();
                for (param, arg) in params.iter().zip(args) {
                    scope.define(param.name.as_str(), arg);
                }
            }
            unwrap_return_value(eval_block(&func.literal.body, &env))
        }
        Object::Builtin(builtin) => {
            tracing::trace!(builtin = builtin.ident, args = args.len(), "calling builtin");
            (builtin.func)(&args)
        }
        func => Object::error(format!("not a function: {}", func.object_type())),
    }
}

fn unwrap_return_value(value: Object) -> Object {
    match value {
        Object::ReturnValue(value) => *value,
        value => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use sloth_parser::parser::Parser;
    use sloth_source::Source;

    fn parse(source: &str) -> Program {
        let source: Source = source.into();
        let program = Parser::new(&source).parse_program();
        assert!(source.has_no_errors(), "{}", source.errors);
        program
    }

    fn eval(source: &str) -> Object {
        eval_program(&parse(source), &Environment::new())
    }

    /// Evaluates every input and compares the rendered result.
    fn check(cases: &[(&str, &str)]) {
        for (input, expected) in cases {
            assert_eq!(&eval(input).to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_integer_expr() {
        check(&[
            ("5", "5"),
            ("-10", "-10"),
            ("5 + 5 + 5 + 5 - 10", "10"),
            ("2 * 2 * 2 * 2 * 2", "32"),
            ("-50 + 100 + -50", "0"),
            ("5 * 2 + 10", "20"),
            ("5 + 2 * 10", "25"),
            ("20 + 2 * -10", "0"),
            ("50 / 2 * 2 + 10", "60"),
            ("2 * (5 + 10)", "30"),
            ("3 * (3 * 3) + 10", "37"),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", "50"),
            ("1 + 2 * 3", "7"),
            ("(1 + 2) * 3", "9"),
            ("7 / 2", "3"),
            ("-7 / 2", "-3"),
        ]);
    }

    #[test]
    fn test_integer_overflow_wraps() {
        check(&[
            ("9223372036854775807 + 1", "-9223372036854775808"),
            ("-9223372036854775807 - 2", "9223372036854775807"),
        ]);
    }

    #[test]
    fn test_boolean_expr() {
        check(&[
            ("true", "true"),
            ("false", "false"),
            ("1 < 2", "true"),
            ("1 > 2", "false"),
            ("1 < 1", "false"),
            ("1 == 1", "true"),
            ("1 != 1", "false"),
            ("1 == 2", "false"),
            ("true == true", "true"),
            ("false == false", "true"),
            ("true == false", "false"),
            ("true != false", "true"),
            ("(1 < 2) == true", "true"),
            ("(1 > 2) == true", "false"),
            ("1 == true", "false"),
            ("1 != true", "true"),
        ]);
    }

    #[test]
    fn test_bang_operator() {
        check(&[
            ("!true", "false"),
            ("!false", "true"),
            ("!5", "false"),
            ("!0", "false"),
            ("!!true", "true"),
            ("!!5", "true"),
            (r#"!"""#, "false"),
            ("!if (false) { 1 }", "true"),
        ]);
    }

    #[test]
    fn test_if_else_expr() {
        check(&[
            ("if (true) { 10 }", "10"),
            ("if (false) { 10 }", "null"),
            ("if (1) { 10 }", "10"),
            ("if (0) { 10 } else { 20 }", "10"),
            ("if (1 < 2) { 10 }", "10"),
            ("if (1 > 2) { 10 }", "null"),
            ("if (1 > 2) { 10 } else { 20 }", "20"),
            ("if (1 < 2) { 10 } else { 20 }", "10"),
            ("if (true) { }", "null"),
        ]);
    }

    #[test]
    fn test_return_stmt() {
        check(&[
            ("return 10;", "10"),
            ("return 10; 9;", "10"),
            ("return 2 * 5; 9;", "10"),
            ("9; return 2 * 5; 9;", "10"),
            ("return;", "null"),
            ("return; 9", "null"),
            (
                "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
                "10",
            ),
        ]);
    }

    #[test]
    fn test_return_in_functions() {
        check(&[
            ("let f = fn() { return 1; 2 }; f() + 10", "11"),
            ("let f = fn() { return; }; f()", "null"),
            (
                "let f = fn(x) { if (x > 1) { if (x > 2) { return 3; } return 2; } 1 }; [f(1), f(2), f(3)]",
                "[1, 2, 3]",
            ),
            ("let f = fn() { let x = if (true) { return 1; }; 2 }; f()", "1"),
            ("let f = fn() { return 5; }; let x = f(); x", "5"),
        ]);
    }

    #[test]
    fn test_error_handling() {
        check(&[
            ("5 + true;", "ERROR: type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5;", "ERROR: type mismatch: INTEGER + BOOLEAN"),
            ("-true", "ERROR: unknown operator: -BOOLEAN"),
            (r#"-"x""#, "ERROR: unknown operator: -STRING"),
            ("true + false;", "ERROR: unknown operator: BOOLEAN + BOOLEAN"),
            ("5; true + false; 5", "ERROR: unknown operator: BOOLEAN + BOOLEAN"),
            (
                "if (10 > 1) { true + false; }",
                "ERROR: unknown operator: BOOLEAN + BOOLEAN",
            ),
            (
                "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
                "ERROR: unknown operator: BOOLEAN + BOOLEAN",
            ),
            ("foobar", "ERROR: identifier not found: foobar"),
            (r#""Hello" - "World""#, "ERROR: unknown operator: STRING - STRING"),
            (r#""Hello" + 1"#, "ERROR: type mismatch: STRING + INTEGER"),
            (
                r#"{"name": "Monkey"}[fn(x) { x }];"#,
                "ERROR: unusable as hash key: FUNCTION",
            ),
            ("{[1]: 2}", "ERROR: unusable as hash key: ARRAY"),
            ("1[0]", "ERROR: index operator not supported: INTEGER"),
            (r#"[1]["a"]"#, "ERROR: index operator not supported: ARRAY"),
            ("5(1)", "ERROR: not a function: INTEGER"),
            ("fn(x) { x }(1, 2)", "ERROR: wrong number of arguments: want=1, got=2"),
            ("10 / 0", "ERROR: division by zero: 10 / 0"),
            ("[1, 2 + true, foobar]", "ERROR: type mismatch: INTEGER + BOOLEAN"),
            ("len(1 + true, foobar)", "ERROR: type mismatch: INTEGER + BOOLEAN"),
            ("let f = fn() { 1 + true }; f(); 5", "ERROR: type mismatch: INTEGER + BOOLEAN"),
            ("let x = -true; x", "ERROR: unknown operator: -BOOLEAN"),
            ("foobar(1 + true)", "ERROR: identifier not found: foobar"),
        ]);
    }

    #[test]
    fn test_let_stmt() {
        check(&[
            ("let a = 5; a;", "5"),
            ("let a = 5 * 5; a;", "25"),
            ("let a = 5; let b = a; b;", "5"),
            ("let a = 5; let b = a; let c = a + b + 5; c;", "15"),
            ("let a = 5;", "null"),
            ("let a = 1; let a = a + 1; a", "2"),
        ]);
    }

    #[test]
    fn test_fn_object() {
        let func = eval("fn(x) { x + 2; };");
        match &func {
            Object::Function(func) => {
                assert_eq!(func.literal.params.len(), 1);
                assert_eq!(func.literal.params[0].name, "x");
            }
            other => panic!("expected function, got {:?}", other),
        }
        assert_snapshot!(func.to_string(), @"fn(x) { (x + 2) }");
    }

    #[test]
    fn test_fn_application() {
        check(&[
            ("let identity = fn(x) { x; }; identity(5);", "5"),
            ("let identity = fn(x) { return x; }; identity(5);", "5"),
            ("let double = fn(x) { x * 2; }; double(5);", "10"),
            ("let add = fn(x, y) { x + y; }; add(5, 5);", "10"),
            ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", "20"),
            ("fn(x) { x; }(5)", "5"),
            ("fn() { }()", "null"),
            (
                "let twice = fn(f, v) { f(f(v)) }; twice(fn(x) { x * 2 }, 10)",
                "40",
            ),
        ]);
    }

    #[test]
    fn test_params_shadow_outer_bindings() {
        check(&[
            ("let x = 1; let f = fn(x) { x }; f(2) + x", "3"),
            ("let x = 1; let f = fn(x) { let x = 5; x }; f(2) + x", "6"),
        ]);
    }

    #[test]
    fn test_closures() {
        check(&[
            (
                "let newAdder = fn(x) { fn(y) { x + y }; }; let addTwo = newAdder(2); addTwo(2);",
                "4",
            ),
            (
                "let compose = fn(f, g) { fn(x) { f(g(x)) } }; let inc = fn(x) { x + 1 }; compose(inc, inc)(2)",
                "4",
            ),
            ("let x = 1; let f = fn() { x }; let x = 2; f()", "2"),
        ]);
    }

    #[test]
    fn test_closure_observes_mutation() {
        let source = "
            let makeCounter = fn() {
                let count = 0;
                fn() { let count = count + 1; count }
            };
            let counter = makeCounter();
            counter();
            counter();";
        assert_eq!(eval(source), Object::Integer(2));

        let source = "
            let makeCounter = fn() {
                let count = 0;
                fn() { let count = count + 1; count }
            };
            let a = makeCounter();
            let b = makeCounter();
            a();
            a();
            [a(), b()]";
        assert_snapshot!(eval(source).to_string(), @"[3, 1]");
    }

    #[test]
    fn test_recursion() {
        let source = "
            let fib = fn(x) { if (x == 0) { 0 } else { if (x == 1) { 1 } else { fib(x - 1) + fib(x - 2) } } };
            fib(15);";
        assert_eq!(eval(source), Object::Integer(610));
    }

    #[test]
    fn test_string_expr() {
        check(&[
            (r#""Hello World!""#, "Hello World!"),
            (r#""Hello" + " " + "World!""#, "Hello World!"),
            (r#""" + """#, ""),
        ]);
    }

    #[test]
    fn test_string_equality_is_identity() {
        check(&[
            (r#""a" == "a""#, "false"),
            (r#""a" != "a""#, "true"),
            (r#"let s = "a"; s == s"#, "true"),
            (r#"let s = "a"; let t = s; s == t"#, "true"),
        ]);
    }

    #[test]
    fn test_composite_equality_is_identity() {
        check(&[
            ("[1] == [1]", "false"),
            ("let a = [1]; a == a", "true"),
            ("let f = fn() { 1 }; f == f", "true"),
            ("fn() { 1 } == fn() { 1 }", "false"),
            ("len == len", "true"),
            ("len == first", "false"),
            ("if (false) { 1 } == if (false) { 2 }", "true"),
        ]);
    }

    #[test]
    fn test_array_lit() {
        check(&[("[1, 2 * 2, 3 + 3]", "[1, 4, 6]"), ("[]", "[]")]);
    }

    #[test]
    fn test_array_index_expr() {
        check(&[
            ("[1, 2, 3][0]", "1"),
            ("[1, 2, 3][1]", "2"),
            ("[1, 2, 3][2]", "3"),
            ("let i = 0; [1][i];", "1"),
            ("[1, 2, 3][1 + 1];", "3"),
            ("let myArray = [1, 2, 3]; myArray[2];", "3"),
            (
                "let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];",
                "6",
            ),
            ("let myArray = [1, 2, 3]; let i = myArray[0]; myArray[i]", "2"),
            ("[1, 2, 3][3]", "null"),
            ("[1, 2, 3][5]", "null"),
            ("[1, 2, 3][-1]", "null"),
        ]);
    }

    #[test]
    fn test_hash_lit() {
        let source = r#"
            let two = "two";
            {
                "one": 10 - 9,
                two: 1 + 1,
                "thr" + "ee": 6 / 2,
                4: 4,
                true: 5,
                false: 6
            }"#;
        match eval(source) {
            Object::Hash(hash) => assert_eq!(hash.len(), 6),
            other => panic!("expected hash, got {:?}", other),
        }
        assert_snapshot!(
            eval(source).to_string(),
            @"{one: 1, two: 2, three: 3, 4: 4, true: 5, false: 6}"
        );
    }

    #[test]
    fn test_hash_index_expr() {
        check(&[
            (r#"{"foo": 5}["foo"]"#, "5"),
            (r#"{"foo": 5}["bar"]"#, "null"),
            (r#"let key = "foo"; {"foo": 5}[key]"#, "5"),
            (r#"{}["foo"]"#, "null"),
            ("{5: 5}[5]", "5"),
            ("{true: 5}[true]", "5"),
            ("{false: 5}[false]", "5"),
            (r#"{"a": 1, "b": 2}["a"]"#, "1"),
            (r#"{"a": 1, "a": 2}["a"]"#, "2"),
            (r#"{1: "int"}[true]"#, "null"),
        ]);
    }

    #[test]
    fn test_builtins_are_shadowable() {
        check(&[
            (r#"let len = fn(x) { 42 }; len("abc")"#, "42"),
            ("len", "builtin function"),
        ]);
    }
}
