//! CLI support for aqm
//!
//! Provides programmatic access to the `aqm` command-line operations so they
//! can be embedded in other tools and tested without spawning a process.

mod check;
mod convert;

pub use check::{
    SelectorReport, SubqueryOptions, UnparseOptions, execute_selectors, execute_subqueries,
    execute_terms, execute_unparse,
};
pub use convert::{Decoder, Tree, decode, term_to_json};

use std::io;

use thiserror::Error;

use crate::error::{FullTextError, ModelError, TypeError};

/// Errors raised while decoding a JSON query tree.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConvertError {
    /// A required field is absent.
    #[error("missing field '{field}' in '{kind}'")]
    MissingField { kind: String, field: &'static str },

    /// The `type` tag names no known node kind.
    #[error("unknown {family} type '{kind}'")]
    UnknownKind { family: &'static str, kind: String },

    /// A field is present but has the wrong shape.
    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid query tree: {0}")]
    Convert(#[from] ConvertError),

    #[error("Invalid full-text expression: {0}")]
    FullText(#[from] FullTextError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
}
