// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Runtime value model.
//!
//! Values should be small enough to clone cheaply; anything that needs
//! sharing (arrays, function bodies) is wrapped in `Rc`.

use std::fmt;
use std::rc::Rc;

use super::ast::Expr;
use super::scope::ScopeRef;

/// A user-defined function's captured data. Per the language's
/// documented (and somewhat surprising) scoping rule, this does **not**
/// capture its defining environment: free names inside `body` are
/// re-resolved in the *caller's* scope at call time, not here. See
/// `DESIGN.md` for why this is preserved rather than "fixed".
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionVal {
    pub name: String,
    pub params: Vec<String>,
    pub body: Rc<Vec<Expr>>,
}

/// A native function exposed to BluLang programs. Arguments have
/// already been evaluated in the caller's scope.
pub type NativeFunc = fn(&ScopeRef, &[Value]) -> Value;

#[derive(Clone)]
pub struct NativeFuncVal {
    pub name: &'static str,
    pub call: NativeFunc,
}

impl fmt::Debug for NativeFuncVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFuncVal({})", self.name)
    }
}

impl PartialEq for NativeFuncVal {
    fn eq(&self, other: &Self) -> bool {
        self.call as usize == other.call as usize
    }
}

/// Runtime value. `Break`/`Return` are control-flow sentinels, never
/// exposed to user code as an assignable value.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(String),
    Null,
    Array(Rc<std::cell::RefCell<Vec<Value>>>),
    Function(Rc<FunctionVal>),
    NativeFunction(NativeFuncVal),
    Break(Box<Value>),
    Return(Box<Value>),
    /// Reserved: a scope used as a property table. Not produced by any
    /// evaluator path yet (`ObjectDeclareExpr`/`ObjectAccessExpr` are
    /// parsed but unevaluated).
    Object(ScopeRef),
}

impl Value {
    pub fn bool_val(value: bool) -> Value {
        Value::Bool(value)
    }

    pub fn new_array(values: Vec<Value>) -> Value {
        Value::Array(Rc::new(std::cell::RefCell::new(values)))
    }

    /// The value's kind tag, as printed by the REPL (`<kind> :: <value>`).
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "IntVal",
            Value::Bool(_) => "BoolVal",
            Value::Str(_) => "StringVal",
            Value::Null => "NullVal",
            Value::Array(_) => "ArrayVal",
            Value::Function(_) => "FuncVal",
            Value::NativeFunction(_) => "NativeFuncVal",
            Value::Break(_) => "BreakVal",
            Value::Return(_) => "ReturnVal",
            Value::Object(_) => "ObjectVal",
        }
    }

    /// Only `BoolVal(true)` is truthy; every other value is not.
    pub fn is_truthy(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// The erased value used for cross-kind comparisons and printing,
    /// matching the reference implementation's `Value()` accessor.
    pub fn repr(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Str(s) => s.clone(),
            Value::Null => "null".to_owned(),
            Value::Array(items) => {
                let items = items.borrow();
                let rendered: Vec<String> = items.iter().map(Value::repr).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Function(f) => format!("fn {}", f.name),
            Value::NativeFunction(f) => format!("native fn {}", f.name),
            Value::Break(v) => v.repr(),
            Value::Return(v) => v.repr(),
            Value::Object(_) => "object".to_owned(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => *a.borrow() == *b.borrow(),
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::NativeFunction(a), Value::NativeFunction(b)) => a == b,
            (Value::Break(a), Value::Break(b)) => a == b,
            (Value::Return(a), Value::Return(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_true_bool_is_truthy() {
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int(1).is_truthy());
        assert!(!Value::Null.is_truthy());
    }

    #[test]
    fn arrays_share_storage_through_clone() {
        let array = Value::new_array(vec![Value::Int(1)]);
        let cloned = array.clone();
        if let (Value::Array(a), Value::Array(b)) = (&array, &cloned) {
            a.borrow_mut().push(Value::Int(2));
            assert_eq!(b.borrow().len(), 2);
        } else {
            panic!("expected arrays");
        }
    }
}
