//! Native function catalogue and global scope bootstrap.

use std::io::{self, Write};

use super::scope::{Scope, ScopeRef};
use super::value::{NativeFuncVal, Value};

fn print(_scope: &ScopeRef, args: &[Value]) -> Value {
    let rendered: Vec<String> = args.iter().map(Value::repr).collect();
    println!("{}", rendered.join(" "));
    Value::Null
}

fn count(_scope: &ScopeRef, args: &[Value]) -> Value {
    match args.first() {
        Some(Value::Array(items)) => Value::Int(items.borrow().len() as i64),
        _ => Value::Int(0),
    }
}

fn input(_scope: &ScopeRef, _args: &[Value]) -> Value {
    io::stdout().flush().ok();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return Value::Str(String::new());
    }
    let trimmed = line.trim();
    match trimmed.parse::<i64>() {
        Ok(n) => Value::Int(n),
        Err(_) => Value::Str(trimmed.to_owned()),
    }
}

fn abs(_scope: &ScopeRef, args: &[Value]) -> Value {
    match args.first() {
        Some(Value::Int(n)) => Value::Int(n.abs()),
        _ => Value::Null,
    }
}

fn exit(_scope: &ScopeRef, _args: &[Value]) -> Value {
    println!("Good bye");
    std::process::exit(0);
}

fn native(name: &'static str, call: super::value::NativeFunc) -> Value {
    Value::NativeFunction(NativeFuncVal { name, call })
}

/// Build a fresh global scope pre-populated with the bilingual builtin
/// bindings.
pub fn global_scope() -> ScopeRef {
    let scope = Scope::new_ref(None);
    Scope::declare(&scope, "true", Value::Bool(true));
    Scope::declare(&scope, "đúng", Value::Bool(true));
    Scope::declare(&scope, "false", Value::Bool(false));
    Scope::declare(&scope, "sai", Value::Bool(false));

    Scope::declare(&scope, "print", native("print", print));
    Scope::declare(&scope, "in", native("in", print));
    Scope::declare(&scope, "count", native("count", count));
    Scope::declare(&scope, "đếm", native("đếm", count));
    Scope::declare(&scope, "input", native("input", input));
    Scope::declare(&scope, "nhập", native("nhập", input));
    Scope::declare(&scope, "abs", native("abs", abs));
    Scope::declare(&scope, "exit", native("exit", exit));

    scope
}
