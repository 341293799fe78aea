//! BluLang: lexer, parser, AST, value model, scope chain, and
//! tree-walking evaluator for a tiny bilingual scripting language.

pub mod error;
pub mod lang;
