//! Error types for the query model.
//!
//! Every failure in this crate is fail-fast: construction errors surface from
//! the constructor that received the bad argument, full-text expression errors
//! surface the first time the term tree of a [`FullTextSearch`] is requested,
//! and type errors surface from the [`TypeSystem`] that was asked to parse or
//! convert a value.
//!
//! [`FullTextSearch`]: crate::ast::FullTextSearch
//! [`TypeSystem`]: crate::types::TypeSystem

use thiserror::Error;

/// Errors raised while constructing model nodes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A required argument was absent or blank.
    #[error("the '{name}' argument is required")]
    ArgumentRequired {
        /// Name of the missing parameter.
        name: &'static str,
    },

    /// The operands of a set query do not select the same number of columns.
    #[error(
        "set query operands are not union-compatible: left selects {left} column(s), right selects {right}"
    )]
    ColumnCountMismatch {
        /// Column count of the left operand.
        left: usize,
        /// Column count of the right operand.
        right: usize,
    },
}

impl ModelError {
    pub(crate) fn required(name: &'static str) -> Self {
        ModelError::ArgumentRequired { name }
    }
}

/// Errors raised while parsing a full-text search expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FullTextError {
    /// The expression contained no terms at all.
    #[error("full-text search expression is empty")]
    Empty,

    /// A quoted phrase was never closed.
    #[error("unterminated quoted phrase starting at position {position}")]
    UnterminatedQuote {
        /// Character offset of the opening quote.
        position: usize,
    },

    /// An operator was not followed by a term.
    #[error("expected a term after '{after}' at position {position}")]
    MissingTerm {
        /// Character offset where a term was expected.
        position: usize,
        /// The operator that needed a term.
        after: String,
    },

    /// `OR` or `AND` appeared where a term was expected.
    #[error("unexpected '{keyword}' at position {position}")]
    UnexpectedKeyword {
        /// Character offset of the keyword.
        position: usize,
        /// The keyword as written.
        keyword: String,
    },
}

/// Errors raised at the type-system boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// No factory is registered under the name.
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// The text cannot be parsed as the requested type.
    #[error("'{value}' is not a valid {type_name} value")]
    InvalidValue {
        /// Target type name.
        type_name: &'static str,
        /// Offending input text.
        value: String,
    },

    /// The value cannot be converted into the requested type.
    #[error("cannot convert a {from} value to {to}")]
    Incompatible {
        /// Type name of the source value.
        from: &'static str,
        /// Target type name.
        to: &'static str,
    },
}
