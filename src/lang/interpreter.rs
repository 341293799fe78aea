// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Tree-walking evaluator.
//!
//! Every node is interpreted against a [`ScopeRef`] and produces a
//! [`Value`]. `break`/`return` are not Rust control flow here: they are
//! ordinary `Value` variants wrapping the last-produced value, and the
//! nearest enclosing loop or function body is responsible for noticing
//! and unwrapping them. Letting one escape further than that is a bug
//! in this module, not in the program being interpreted.

use std::rc::Rc;

use super::ast::{Expr, Program};
use super::scope::{Scope, ScopeRef};
use super::value::{FunctionVal, Value};

/// Evaluate a whole program against a scope, returning the value of
/// its last top-level statement.
pub fn eval_program(program: &Program, scope: &ScopeRef) -> Value {
    unwrap_sentinel(eval_block(&program.body, scope))
}

fn unwrap_sentinel(value: Value) -> Value {
    match value {
        Value::Break(v) => *v,
        Value::Return(v) => *v,
        other => other,
    }
}

/// `break`/`return` sentinels are legal only as the value a block
/// produces on its way out to the nearest enclosing loop/function
/// frame. Anywhere a plain value is expected instead — a variable
/// binding, an array element, a function argument, an operand — one
/// must not be allowed to leak in and be mistaken for a later,
/// unrelated control-flow event.
fn expect_plain(value: Value) -> Value {
    match value {
        Value::Break(_) | Value::Return(_) => {
            panic!("break/return cannot be used as a value")
        }
        other => other,
    }
}

/// Evaluate a statement sequence, stopping early at a `break`/`return`.
/// The sentinel produced there carries the *previous* statement's
/// value (the runtime value table calls it "last value produced before
/// break/return"), not the value of the `break`/`return` node itself.
/// A nested block's own sentinel is simply forwarded, since its last
/// produced value already *is* that sentinel.
fn eval_block(statements: &[Expr], scope: &ScopeRef) -> Value {
    let mut last = Value::Null;
    for statement in statements {
        match statement {
            Expr::Break => return Value::Break(Box::new(last)),
            Expr::Return => return Value::Return(Box::new(last)),
            _ => {
                last = eval(statement, scope);
                if matches!(last, Value::Break(_) | Value::Return(_)) {
                    return last;
                }
            }
        }
    }
    last
}

pub fn eval(expr: &Expr, scope: &ScopeRef) -> Value {
    match expr {
        Expr::IntLiteral(n) => Value::Int(*n),
        Expr::StringLiteral(s) => Value::Str(s.clone()),
        Expr::NullLiteral => Value::Null,
        Expr::Identifier(name) => Scope::lookup(scope, name),
        Expr::ArrayLiteral(items) => Value::new_array(
            items
                .iter()
                .map(|item| expect_plain(eval(item, scope)))
                .collect(),
        ),
        Expr::ArrayAccess { name, index } => eval_array_access(name, index, scope),
        Expr::ObjectDeclare(_) => Value::Null,
        Expr::ObjectAccess { .. } => Value::Null,
        Expr::Binary {
            left,
            right,
            operator,
        } => eval_binary(left, right, operator, scope),
        Expr::VarDeclare { name, value } => {
            let value = expect_plain(eval(value, scope));
            Scope::declare(scope, name, value.clone());
            value
        }
        Expr::FuncDeclare { name, params, body } => {
            let func = Value::Function(Rc::new(FunctionVal {
                name: name.clone(),
                params: params.clone(),
                body: Rc::new(body.clone()),
            }));
            if !name.is_empty() {
                Scope::declare(scope, name, func.clone());
            }
            func
        }
        Expr::FuncCall { name, args } => eval_call(name, args, scope),
        Expr::Conditional {
            condition,
            true_body,
            false_body,
        } => {
            let condition = expect_plain(eval(condition, scope));
            let child = Scope::new_ref(Some(scope.clone()));
            if condition.is_truthy() {
                eval_block(true_body, &child)
            } else {
                eval_block(false_body, &child)
            }
        }
        Expr::WhileLoop { condition, body } => eval_while(condition, body, scope),
        Expr::Break => Value::Break(Box::new(Value::Null)),
        Expr::Return => Value::Return(Box::new(Value::Null)),
    }
}

fn eval_array_access(name: &str, index: &Expr, scope: &ScopeRef) -> Value {
    let index = match eval(index, scope) {
        Value::Int(n) => n as usize,
        other => panic!("array index must be IntVal, got {}", other.kind()),
    };
    match Scope::lookup(scope, name) {
        Value::Array(items) => items.borrow()[index].clone(),
        other => panic!("`{}` is not an ArrayVal, got {}", name, other.kind()),
    }
}

fn eval_while(condition: &Expr, body: &[Expr], scope: &ScopeRef) -> Value {
    let loop_scope = Scope::new_ref(Some(scope.clone()));
    let mut last = Value::Null;
    while expect_plain(eval(condition, scope)).is_truthy() {
        let result = eval_block(body, &loop_scope);
        match result {
            Value::Break(v) => return *v,
            Value::Return(_) => return result,
            other => last = other,
        }
    }
    last
}

fn eval_call(name: &str, args: &[Expr], scope: &ScopeRef) -> Value {
    match Scope::lookup(scope, name) {
        Value::Function(func) => {
            if args.len() < func.params.len() {
                panic!(
                    "function `{}` called with {} argument(s), expected {}",
                    name,
                    args.len(),
                    func.params.len()
                );
            }
            let call_scope = Scope::new_ref(Some(scope.clone()));
            for (param, arg) in func.params.iter().zip(args.iter()) {
                let value = expect_plain(eval(arg, &call_scope));
                Scope::declare(&call_scope, param, value);
            }
            let result = eval_block(&func.body, &call_scope);
            match result {
                Value::Return(v) => *v,
                other => other,
            }
        }
        Value::NativeFunction(native) => {
            let evaluated: Vec<Value> = args
                .iter()
                .map(|arg| expect_plain(eval(arg, scope)))
                .collect();
            (native.call)(scope, &evaluated)
        }
        _ => Value::Null,
    }
}

fn eval_binary(left: &Expr, right: &Expr, operator: &str, scope: &ScopeRef) -> Value {
    if operator == "=" {
        return eval_assignment(left, right, scope);
    }

    let lhs = expect_plain(eval(left, scope));
    let rhs = expect_plain(eval(right, scope));

    match operator {
        "&&" => Value::Bool(lhs.is_truthy() && rhs.is_truthy()),
        "||" => Value::Bool(lhs.is_truthy() || rhs.is_truthy()),
        "==" => Value::Bool(lhs == rhs),
        "!=" => Value::Bool(lhs != rhs),
        "<" | ">" | "<=" | ">=" => eval_int_comparison(&lhs, &rhs, operator),
        "+" | "-" | "*" | "/" => eval_arithmetic(&lhs, &rhs, operator),
        other => panic!("unsupported operator: {}", other),
    }
}

fn eval_int_comparison(lhs: &Value, rhs: &Value, operator: &str) -> Value {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Value::Bool(match operator {
            "<" => a < b,
            ">" => a > b,
            "<=" => a <= b,
            ">=" => a >= b,
            other => panic!("unsupported comparison operator: {}", other),
        }),
        _ => Value::Null,
    }
}

fn eval_arithmetic(lhs: &Value, rhs: &Value, operator: &str) -> Value {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Value::Int(match operator {
            "+" => a + b,
            "-" => a - b,
            "*" => a * b,
            "/" => a / b,
            other => panic!("unsupported arithmetic operator: {}", other),
        }),
        (_, Value::Int(b)) if operator == "-" => Value::Int(0 - b),
        (Value::Array(a), Value::Array(b)) if operator == "+" => {
            let mut combined = a.borrow().clone();
            combined.extend(b.borrow().iter().cloned());
            Value::new_array(combined)
        }
        _ => Value::Null,
    }
}

fn eval_assignment(left: &Expr, right: &Expr, scope: &ScopeRef) -> Value {
    let value = expect_plain(eval(right, scope));
    match left {
        Expr::Identifier(name) => Scope::assign(scope, name, value),
        Expr::ArrayAccess { name, index } => {
            let index = match eval(index, scope) {
                Value::Int(n) => n as usize,
                other => panic!("array index must be IntVal, got {}", other.kind()),
            };
            match Scope::lookup(scope, name) {
                Value::Array(items) => items.borrow_mut()[index] = value.clone(),
                other => panic!("`{}` is not an ArrayVal, got {}", name, other.kind()),
            }
            value
        }
        other => panic!("invalid assignment target: {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::super::builtins::global_scope;
    use super::super::parser::parse;
    use super::*;

    fn run(source: &str) -> Value {
        let scope = global_scope();
        eval_program(&parse(source), &scope)
    }

    #[test]
    fn precedence_scenario() {
        assert_eq!(run("((10+4) * 2 - 3) / ((9-7)*(3-2))"), Value::Int(12));
    }

    #[test]
    fn reassignment_is_visible_after_declaration() {
        assert_eq!(run("let a = 10  let b1 = 20  a = a*b1  a"), Value::Int(200));
    }

    #[test]
    fn function_call_with_mutated_argument() {
        assert_eq!(
            run("fn sum(a,b){ a = a*a  a+b }  let a=10  let b=1  sum(a,b)"),
            Value::Int(101)
        );
    }

    #[test]
    fn while_loop_break_stops_with_unwrapped_value() {
        assert_eq!(
            run("let a=1  while a!=100 { a=a+1  if a==50 { break } }  a"),
            Value::Int(50)
        );
    }

    #[test]
    fn return_inside_while_unwinds_through_the_function() {
        assert_eq!(
            run("fn inc(a){ while a<100 { a=a+1  if a==50 { a  return } } }  inc(1)"),
            Value::Int(50)
        );
    }

    #[test]
    fn leading_minus_arithmetic() {
        assert_eq!(run("-3 + 5"), Value::Int(2));
    }

    #[test]
    fn array_concatenation_does_not_mutate_operands() {
        assert_eq!(
            run("let a=[1,2]  let b=[3]  let c=a+b  count(c)"),
            Value::Int(3)
        );
        assert_eq!(run("let a=[1,2]  let b=[3]  a+b  count(a)"), Value::Int(2));
    }

    #[test]
    fn bilingual_declaration_equivalence() {
        assert_eq!(run("cho a = 10  a"), run("let a = 10  a"));
    }

    #[test]
    fn cross_kind_equality_is_always_false() {
        assert_eq!(run("1 == \"1\""), Value::Bool(false));
        assert_eq!(run("1 != \"1\""), Value::Bool(true));
    }

    #[test]
    fn not_desugars_to_not_equal_true() {
        assert_eq!(run("!false"), Value::Bool(true));
    }

    #[test]
    fn redeclaring_in_the_same_scope_panics() {
        let result = std::panic::catch_unwind(|| run("let a = 1  let a = 2"));
        assert!(result.is_err());
    }

    #[test]
    fn assignment_to_unbound_name_is_silent_null() {
        assert_eq!(run("nope = 1"), Value::Null);
    }

    #[test]
    fn break_cannot_be_stored_as_a_plain_value() {
        let result = std::panic::catch_unwind(|| run("let a = break  1"));
        assert!(result.is_err());
    }

    #[test]
    fn return_cannot_be_passed_as_a_function_argument() {
        let result = std::panic::catch_unwind(|| run("fn f(a){ a }  f(return)"));
        assert!(result.is_err());
    }

    #[test]
    fn array_access_on_a_non_array_name_panics() {
        let result = std::panic::catch_unwind(|| run("let a = 1  a[0]"));
        assert!(result.is_err());
    }

    #[test]
    fn array_index_assignment_on_a_non_array_name_panics() {
        let result = std::panic::catch_unwind(|| run("let a = 1  a[0] = 2"));
        assert!(result.is_err());
    }

    #[test]
    fn calling_a_function_with_too_few_arguments_panics() {
        let result = std::panic::catch_unwind(|| run("fn f(a,b){ a+b }  f(1)"));
        assert!(result.is_err());
    }

    #[test]
    fn calling_a_function_with_excess_arguments_ignores_the_extra_ones() {
        assert_eq!(run("fn f(a){ a }  f(1,2,3)"), Value::Int(1));
    }

    #[test]
    fn functions_do_not_capture_their_defining_scope() {
        // `y` is free in `f`'s body. `f` ends up called from the
        // global scope, not from `make`'s body scope where `y` was
        // declared, so the documented (non-closure) behavior resolves
        // `y` to NullVal instead of the `10` visible at `f`'s
        // definition site.
        assert_eq!(
            run("fn make(){ let y = 10  fn f(){ y }  f }  let g = make()  g()"),
            Value::Null
        );
    }

    #[test]
    fn fibonacci_recursion() {
        assert_eq!(
            run("fn fib(n){ if n<2 { n return } (fib(n-1)+fib(n-2)) return }  fib(10)"),
            Value::Int(55)
        );
    }
}
