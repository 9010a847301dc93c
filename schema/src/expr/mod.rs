//! @ai:module:intent Compile and evaluate the constraint expression language
//! @ai:module:layer domain
//! @ai:module:public_api Expression, ParseError, EvalError
//! @ai:module:depends_on lexer, parser, eval
//! @ai:module:stateless true
//!
//! Arithmetic (`+ - * / %`), comparisons, `and`/`&`, `or`/`|`, `not`,
//! parentheses and single-level indexing (`permutation[2]`). Division is
//! always real; `%` is floored integer modulo and `x % 0` is undefined,
//! which makes any comparison it reaches false.

pub mod eval;
pub mod lexer;
pub mod parser;

use crate::value::Configuration;
use parser::Expr;
use std::collections::BTreeSet;
use std::fmt;

/// @ai:intent Syntax error with the byte offset where it was detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for ParseError {}

/// @ai:intent Failure while evaluating a compiled expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

/// @ai:intent An expression compiled once from its source text
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    tree: Expr,
}

impl Expression {
    /// @ai:intent Parse source text into an evaluable expression
    /// @ai:effects pure
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let tree = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            tree,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &Expr {
        &self.tree
    }

    /// @ai:intent Names of all bindings the expression reads
    /// @ai:effects pure
    pub fn names(&self) -> BTreeSet<String> {
        self.tree.names()
    }

    /// @ai:intent Evaluate to a boolean against a configuration
    /// @ai:effects pure
    pub fn evaluate(&self, config: &Configuration) -> Result<bool, EvalError> {
        eval::evaluate(&self.tree, config)
    }
}
