// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Lexically-scoped environments.
//!
//! A scope is a name→value map with a non-owning link to its parent.
//! Children never outlive the call/block that created them; the global
//! scope is the only long-lived one.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::value::Value;

pub type ScopeRef = Rc<RefCell<Scope>>;

#[derive(Debug)]
pub struct Scope {
    bindings: HashMap<String, Value>,
    parent: Option<ScopeRef>,
}

impl Scope {
    pub fn new_ref(parent: Option<ScopeRef>) -> ScopeRef {
        Rc::new(RefCell::new(Scope {
            bindings: HashMap::new(),
            parent,
        }))
    }

    /// Insert `name` into this scope directly. Panics if `name` is
    /// already bound *here* -- shadowing an outer binding is fine,
    /// redeclaring in the same scope is not.
    pub fn declare(scope: &ScopeRef, name: &str, value: Value) {
        let mut this = scope.borrow_mut();
        if this.bindings.contains_key(name) {
            panic!("cannot redeclare existing variable `{}`", name);
        }
        this.bindings.insert(name.to_owned(), value);
    }

    /// Walk outward to find the nearest scope binding `name` and update
    /// it there. Silently no-ops to `Value::Null` if `name` is unbound
    /// anywhere in the chain.
    pub fn assign(scope: &ScopeRef, name: &str, value: Value) -> Value {
        if scope.borrow().bindings.contains_key(name) {
            scope
                .borrow_mut()
                .bindings
                .insert(name.to_owned(), value.clone());
            return value;
        }
        let parent = scope.borrow().parent.clone();
        match parent {
            Some(parent) => Scope::assign(&parent, name, value),
            None => Value::Null,
        }
    }

    /// Walk outward for the nearest binding of `name`; `Value::Null` if
    /// unbound anywhere.
    pub fn lookup(scope: &ScopeRef, name: &str) -> Value {
        if let Some(value) = scope.borrow().bindings.get(name) {
            return value.clone();
        }
        let parent = scope.borrow().parent.clone();
        match parent {
            Some(parent) => Scope::lookup(&parent, name),
            None => Value::Null,
        }
    }
}
