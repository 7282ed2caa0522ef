//! Execute aqm operations against JSON query trees

use std::collections::{BTreeMap, HashMap};

use serde_json::json;

use super::{CliError, Tree, convert::decode, term_to_json};
use crate::{
    analysis,
    ast::SelectorName,
    output::{Dialect, Unparser},
    parser::parse_full_text,
    visitor::Visitable,
};

/// Options for the unparse command
#[derive(Debug, Clone, Default)]
pub struct UnparseOptions {
    /// JSON query tree
    pub input: Option<String>,
    /// Output flavour
    pub dialect: Dialect,
}

/// Options for the subqueries command
#[derive(Debug, Clone, Default)]
pub struct SubqueryOptions {
    /// JSON query tree
    pub input: Option<String>,
    /// Also collect subqueries nested inside other subqueries
    pub nested: bool,
}

/// Selector usage of a query tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorReport {
    /// Every referenced selector name or alias, sorted
    pub referenced: Vec<String>,
    /// Alias to selector name
    pub names_by_alias: BTreeMap<String, String>,
    /// Selector name to alias
    pub aliases_by_name: BTreeMap<String, String>,
}

impl SelectorReport {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "referenced": self.referenced,
            "namesByAlias": self.names_by_alias,
            "aliasesByName": self.aliases_by_name,
        })
    }
}

fn names(map: HashMap<SelectorName, SelectorName>) -> BTreeMap<String, String> {
    map.into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn read_tree(input: Option<&String>) -> Result<Tree, CliError> {
    let json_str = input.ok_or(CliError::NoInput)?;
    let json: serde_json::Value = serde_json::from_str(json_str)?;
    Ok(decode(&json)?)
}

/// Render a JSON query tree as query text
pub fn execute_unparse(options: &UnparseOptions) -> Result<String, CliError> {
    let tree = read_tree(options.input.as_ref())?;
    Ok(Unparser::new(options.dialect).render(tree.as_node()))
}

/// Report which selectors a JSON query tree references and how they are aliased
pub fn execute_selectors(input: Option<&String>) -> Result<SelectorReport, CliError> {
    let tree = read_tree(input)?;
    let mut referenced: Vec<String> = analysis::selectors_referenced_by(&tree)
        .into_iter()
        .map(|name| name.name().to_string())
        .collect();
    referenced.sort();

    Ok(SelectorReport {
        referenced,
        names_by_alias: names(analysis::selector_names_by_alias(&tree)),
        aliases_by_name: names(analysis::selector_aliases_by_name(&tree)),
    })
}

/// Render every subquery of a JSON query tree, in walk order
pub fn execute_subqueries(options: &SubqueryOptions) -> Result<Vec<String>, CliError> {
    let tree = read_tree(options.input.as_ref())?;
    let mut unparser = Unparser::new(Dialect::Readable);
    Ok(analysis::subqueries(&tree, options.nested)
        .into_iter()
        .map(|subquery| unparser.render(subquery))
        .collect())
}

/// Parse a full-text search expression into its JSON term tree
pub fn execute_terms(expression: &str) -> Result<serde_json::Value, CliError> {
    Ok(term_to_json(&parse_full_text(expression)?))
}
