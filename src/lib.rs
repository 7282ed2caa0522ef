pub mod analysis;
pub mod ast;
pub mod cli;
pub mod error;
pub mod lexer;
pub mod navigator;
pub mod output;
pub mod parser;
pub mod types;
pub mod value;
pub mod visitor;

pub use analysis::{selector_aliases_by_name, selector_names_by_alias, selectors_referenced_by, subqueries};
pub use ast::{Constraint, DynamicOperand, JoinCondition, QueryCommand, SelectorName, Source, StaticOperand, Term};
pub use error::{FullTextError, ModelError, TypeError};
pub use lexer::Lexer;
pub use navigator::{Navigator, visit_all};
pub use output::{Dialect, Unparser, unparse, unparse_jcr_sql2};
pub use parser::{Parser, parse_full_text};
pub use types::{StandardTypeSystem, TypeFactory, TypeSystem};
pub use value::{Value, ValueKind};
pub use visitor::{Node, Visitable, Visitor, visit};
