use sloth_value::{Builtin, Object, NULL};

/// Every builtin function, looked up by name after the environment.
pub const BUILTINS: &[Builtin] = &[
    Builtin {
        ident: "len",
        func: len,
    },
    Builtin {
        ident: "first",
        func: first,
    },
    Builtin {
        ident: "last",
        func: last,
    },
    Builtin {
        ident: "rest",
        func: rest,
    },
    Builtin {
        ident: "push",
        func: push,
    },
    Builtin {
        ident: "puts",
        func: puts,
    },
];

/// Returns the builtin named `ident`, if any.
pub fn lookup(ident: &str) -> Option<Object> {
    BUILTINS
        .iter()
        .find(|builtin| builtin.ident == ident)
        .map(|builtin| Object::Builtin(*builtin))
}

/// Returns an error object from the enclosing builtin if it was not called with exactly `$want`
/// arguments.
macro_rules! check_arity {
    ($args: expr, $want: expr) => {
        if $args.len() != $want {
            return Object::error(format!(
                "wrong number of arguments. got={}, want={}",
                $args.len(),
                $want
            ));
        }
    };
}

pub fn len(args: &[Object]) -> Object {
    check_arity!(args, 1);

    match &args[0] {
        Object::String(value) => Object::Integer(value.chars().count() as i64),
        Object::Array(elements) => Object::Integer(elements.len() as i64),
        other => Object::error(format!(
            "argument to `len` not supported, got {}",
            other.object_type()
        )),
    }
}

pub fn first(args: &[Object]) -> Object {
    check_arity!(args, 1);

    match &args[0] {
        Object::Array(elements) => elements.first().cloned().unwrap_or(NULL),
        other => must_be_array("first", other),
    }
}

pub fn last(args: &[Object]) -> Object {
    check_arity!(args, 1);

    match &args[0] {
        Object::Array(elements) => elements.last().cloned().unwrap_or(NULL),
        other => must_be_array("last", other),
    }
}

/// All elements but the first, as a new array. `null` for an empty array.
pub fn rest(args: &[Object]) -> Object {
    check_arity!(args, 1);

    match &args[0] {
        Object::Array(elements) if elements.is_empty() => NULL,
        Object::Array(elements) => Object::array(elements[1..].to_vec()),
        other => must_be_array("rest", other),
    }
}

/// Returns a new array with the element appended. The argument is left untouched.
pub fn push(args: &[Object]) -> Object {
    check_arity!(args, 2);

    match &args[0] {
        Object::Array(elements) => {
            let mut elements = elements.to_vec();
            elements.push(args[1].clone());
            Object::array(elements)
        }
        other => must_be_array("push", other),
    }
}

/// Prints every argument on its own line.
pub fn puts(args: &[Object]) -> Object {
    for arg in args {
        println!("{}", arg);
    }
    NULL
}

fn must_be_array(ident: &str, got: &Object) -> Object {
    Object::error(format!(
        "argument to `{}` must be ARRAY, got {}",
        ident,
        got.object_type()
    ))
}
