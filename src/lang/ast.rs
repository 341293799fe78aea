// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Abstract syntax tree produced by the parser.
//!
//! Every node satisfies a single "has a kind" capability: matching on
//! the [`Expr`] enum itself is the kind tag, there is no separate
//! discriminant type. Nodes carry no source position information.

use std::collections::HashMap;

/// The root of a parsed program: an ordered sequence of top-level
/// statements. The program's value is the value of its last statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Expr>,
}

/// A statement or expression node. BluLang makes no syntactic
/// distinction between statements and expressions except for `break`
/// and `return`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLiteral(i64),
    StringLiteral(String),
    NullLiteral,
    Identifier(String),
    ArrayLiteral(Vec<Expr>),
    ArrayAccess {
        name: String,
        index: Box<Expr>,
    },
    /// Reserved: parsed but not wired into the evaluator.
    ObjectDeclare(HashMap<String, Expr>),
    /// Reserved: parsed but not wired into the evaluator.
    ObjectAccess {
        owner: String,
        property: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        right: Box<Expr>,
        operator: String,
    },
    VarDeclare {
        name: String,
        value: Box<Expr>,
    },
    FuncDeclare {
        /// Empty for an anonymous function literal.
        name: String,
        params: Vec<String>,
        body: Vec<Expr>,
    },
    FuncCall {
        name: String,
        args: Vec<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        true_body: Vec<Expr>,
        false_body: Vec<Expr>,
    },
    WhileLoop {
        condition: Box<Expr>,
        body: Vec<Expr>,
    },
    Break,
    Return,
}
