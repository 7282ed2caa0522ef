//! # Abstract Query Model - Syntax Tree
//!
//! This module defines the immutable tree that represents a structured query
//! over hierarchical content: which nodes to select, how to join them, which
//! constraints they must satisfy, how to order them and how many to return.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[selector]** - Selector names and the selectors that bind them
//! - **[operators]** - Comparison, arithmetic, join, order and set operators
//! - **[operands]** - Dynamic operands (per-node values) and static operands
//! - **[source]** - Sources, joins and join conditions
//! - **[constraints]** - Boolean predicates over selectors
//! - **[full_text]** - The `CONTAINS` constraint and its term sub-grammar
//! - **[query]** - Columns, orderings, limits and complete query commands
//! - **[tokens]** - Lexical tokens of full-text search expressions
//!
//! ## Quick Start
//!
//! ```text
//! SELECT f.title FROM [nt:file] AS f WHERE f.size > 1024 ORDER BY f.title ASC LIMIT 10
//! ```
//!
//! is built from a [`Query`] over a [`NamedSelector`] source, one [`Column`],
//! a [`Comparison`] constraint, one [`Ordering`] and a [`Limit`].
//!
//! ## Core Concepts
//!
//! ### Closed Families
//!
//! Every node kind belongs to exactly one family enum: [`Source`],
//! [`JoinCondition`], [`Constraint`], [`DynamicOperand`], [`StaticOperand`] or
//! [`QueryCommand`]. Each variant wraps a struct of the same name, and every
//! struct converts into its family with `From`, so constructors accept
//! `impl Into<Family>` and trees compose without explicit wrapping.
//!
//! ### Immutability
//!
//! Nodes have private fields and read-only accessors. Recursive children are
//! shared through `Arc`, so cloning a tree is cheap and sub-trees can be
//! reused. "Changing" a query builds a new one:
//!
//! ```text
//! let first_page = query.with_limit(20);
//! let second_page = first_page.with_offset(20);
//! ```
//!
//! ### Validation
//!
//! Constructors that take names, paths or expressions return
//! `Result<_, ModelError>` and reject blank text, naming the missing argument.
//! A [`SetQuery`] additionally rejects operands with different column counts.
//!
//! ### Equality
//!
//! Equality and hashing are structural: two trees built from equal parts are
//! equal, regardless of where or when they were built. Composite nodes compute
//! their hash once at construction, so hashing a query never walks the tree
//! and unequal trees are usually told apart by that value alone.

pub mod constraints;
pub mod full_text;
mod node_hash;
pub mod operands;
pub mod operators;
pub mod query;
pub mod selector;
pub mod source;
pub mod tokens;

pub use constraints::{
    And, Between, ChildNode, Comparison, Constraint, DescendantNode, Not, Or, PropertyExistence,
    SameNode, SetCriteria,
};
pub use full_text::{Conjunction, Disjunction, FullTextSearch, NegationTerm, SimpleTerm, Term};
pub use operands::{
    ArithmeticOperand, BindVariableName, DynamicOperand, FullTextSearchScore, Length, Literal,
    LowerCase, NodeDepth, NodeLocalName, NodeName, NodePath, PropertyValue, ReferenceValue,
    StaticOperand, Subquery, UpperCase,
};
pub use operators::{ArithmeticOperator, JoinType, Operator, Order, SetOperation};
pub use query::{Column, Limit, Ordering, Query, QueryCommand, SetQuery};
pub use selector::{AllNodes, NamedSelector, SelectorName};
pub use source::{
    ChildNodeJoinCondition, DescendantNodeJoinCondition, EquiJoinCondition, Join, JoinCondition,
    SameNodeJoinCondition, Source,
};
pub use tokens::Token;
