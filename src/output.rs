//! Canonical text serialization of query trees.
//!
//! This module renders any node of a query tree back into query-language text.
//! The output is deterministic and byte-stable, so it can be compared in tests
//! and handed to consumers that parse it again.
//!
//! # Features
//!
//! - **Readable output** via [`unparse()`] - the canonical format
//! - **JCR-SQL2 output** via [`unparse_jcr_sql2()`] - names that contain anything
//!   other than letters and digits are wrapped in `[...]`
//! - **Pluggable literals** - literal text comes from a [`TypeSystem`]
//! - **Fully parenthesized** - `AND`, `OR`, `NOT` and arithmetic always wrap
//!   their sub-expressions
//!
//! # Examples
//!
//! ```
//! use aqm::ast::{Column, Comparison, NamedSelector, Operator, PropertyValue, Query, SelectorName};
//! use aqm::output::unparse;
//!
//! let a = SelectorName::new("a").unwrap();
//! let query = Query::new(NamedSelector::new(a.clone()))
//!     .with_columns(vec![Column::property(a.clone(), "x").unwrap()])
//!     .constrained_by(Comparison::new(
//!         PropertyValue::new(a, "y").unwrap(),
//!         Operator::EqualTo,
//!         aqm::Value::from("v"),
//!     ));
//!
//! assert_eq!(unparse(&query), "SELECT a.x FROM a WHERE a.y = 'v'");
//! ```

use tracing::trace;

use crate::{
    ast::{
        AllNodes, And, ArithmeticOperand, Between, BindVariableName, ChildNode,
        ChildNodeJoinCondition, Column, Comparison, DescendantNode, DescendantNodeJoinCondition,
        EquiJoinCondition, FullTextSearch, FullTextSearchScore, Join, Length, Limit, Literal,
        LowerCase, NamedSelector, NodeDepth, NodeLocalName, NodeName, NodePath, Not, Or, Ordering,
        PropertyExistence, PropertyValue, Query, ReferenceValue, SameNode, SameNodeJoinCondition,
        SelectorName, SetCriteria, SetQuery, Subquery, UpperCase,
    },
    types::{self, TypeSystem},
    visitor::{Node, Visitor},
};

/// Flavour of query-language text produced by an [`Unparser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Canonical format; names are written as-is.
    #[default]
    Readable,

    /// Like `Readable`, but names containing anything other than letters and
    /// digits are wrapped in square brackets.
    JcrSql2,
}

/// Renders nodes into query-language text.
///
/// Unlike other visitors, the unparser recurses into children itself, since
/// the text of a node surrounds the text of its children.
pub struct Unparser<'t> {
    out: String,
    dialect: Dialect,
    types: &'t dyn TypeSystem,
}

impl Unparser<'static> {
    pub fn new(dialect: Dialect) -> Self {
        Unparser::with_types(dialect, types::standard())
    }
}

impl<'t> Unparser<'t> {
    pub fn with_types(dialect: Dialect, types: &'t dyn TypeSystem) -> Self {
        Unparser {
            out: String::new(),
            dialect,
            types,
        }
    }

    /// Render `node` and return the text, leaving the unparser empty.
    pub fn render<'a>(&mut self, node: impl Into<Node<'a>>) -> String {
        let node = node.into();
        node.accept(self);
        let text = std::mem::take(&mut self.out);
        trace!(kind = node.kind(), text = %text, "unparse");
        text
    }

    fn child<'a>(&mut self, node: impl Into<Node<'a>>) {
        node.into().accept(self);
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn push_char(&mut self, ch: char) {
        self.out.push(ch);
    }

    fn push_name(&mut self, name: &str) {
        let quote = self.dialect == Dialect::JcrSql2 && !name.chars().all(char::is_alphanumeric);
        if quote {
            self.push_char('[');
            self.push(name);
            self.push_char(']');
        } else {
            self.push(name);
        }
    }

    fn push_selector(&mut self, name: &SelectorName) {
        self.push_name(name.name());
    }

    fn push_quoted(&mut self, text: &str) {
        self.push_char('\'');
        self.push(text);
        self.push_char('\'');
    }

    fn push_selector_function(&mut self, function: &str, selector: &SelectorName) {
        self.push(function);
        self.push_char('(');
        self.push_selector(selector);
        self.push_char(')');
    }

    fn push_path_constraint(&mut self, function: &str, selector: &SelectorName, path: &str) {
        self.push(function);
        self.push_char('(');
        self.push_selector(selector);
        self.push_char(',');
        self.push_quoted(path);
        self.push_char(')');
    }

    fn push_selector_pair(&mut self, function: &str, first: &SelectorName, second: &SelectorName) {
        self.push(function);
        self.push_char('(');
        self.push_selector(first);
        self.push_char(',');
        self.push_selector(second);
        self.push_char(')');
    }

    fn push_property(&mut self, selector: &SelectorName, property: &str) {
        self.push_selector(selector);
        self.push_char('.');
        self.push_name(property);
    }

    fn push_list<'a, T: 'a>(&mut self, items: &'a [T], separator: &str)
    where
        Node<'a>: From<&'a T>,
    {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.push(separator);
            }
            self.child(item);
        }
    }
}

impl<'a> Visitor<'a> for Unparser<'_> {
    fn visit_all_nodes(&mut self, node: &'a AllNodes) {
        self.push_selector(node.name());
        if let Some(alias) = node.alias() {
            self.push(" AS ");
            self.push_selector(alias);
        }
    }

    fn visit_and(&mut self, node: &'a And) {
        self.push_char('(');
        self.child(node.left());
        self.push(" AND ");
        self.child(node.right());
        self.push_char(')');
    }

    fn visit_arithmetic_operand(&mut self, node: &'a ArithmeticOperand) {
        self.push_char('(');
        self.child(node.left());
        self.push_char(' ');
        self.push(node.operator().symbol());
        self.push_char(' ');
        self.child(node.right());
        self.push_char(')');
    }

    fn visit_between(&mut self, node: &'a Between) {
        self.child(node.operand());
        self.push(" BETWEEN ");
        self.child(node.lower_bound());
        if !node.is_lower_bound_included() {
            self.push(" EXCLUSIVE");
        }
        self.push(" AND ");
        self.child(node.upper_bound());
        if !node.is_upper_bound_included() {
            self.push(" EXCLUSIVE");
        }
    }

    fn visit_bind_variable_name(&mut self, node: &'a BindVariableName) {
        self.push_char('$');
        self.push(node.variable_name());
    }

    fn visit_child_node(&mut self, node: &'a ChildNode) {
        self.push_path_constraint("ISCHILDNODE", node.selector_name(), node.parent_path());
    }

    fn visit_child_node_join_condition(&mut self, node: &'a ChildNodeJoinCondition) {
        self.push_selector_pair(
            "ISCHILDNODE",
            node.child_selector_name(),
            node.parent_selector_name(),
        );
    }

    fn visit_column(&mut self, node: &'a Column) {
        self.push_selector(node.selector_name());
        match node.property_name() {
            None => self.push(".*"),
            Some(property) => {
                self.push_char('.');
                self.push_name(property);
                if let Some(column) = node.column_name().filter(|column| *column != property) {
                    self.push(" AS ");
                    self.push_name(column);
                }
            }
        }
    }

    fn visit_comparison(&mut self, node: &'a Comparison) {
        self.child(node.operand1());
        self.push_char(' ');
        self.push(node.operator().symbol());
        self.push_char(' ');
        self.child(node.operand2());
    }

    fn visit_descendant_node(&mut self, node: &'a DescendantNode) {
        self.push_path_constraint("ISDESCENDANTNODE", node.selector_name(), node.ancestor_path());
    }

    fn visit_descendant_node_join_condition(&mut self, node: &'a DescendantNodeJoinCondition) {
        self.push_selector_pair(
            "ISDESCENDANTNODE",
            node.descendant_selector_name(),
            node.ancestor_selector_name(),
        );
    }

    fn visit_equi_join_condition(&mut self, node: &'a EquiJoinCondition) {
        self.push_property(node.selector1_name(), node.property1_name());
        self.push(" = ");
        self.push_property(node.selector2_name(), node.property2_name());
    }

    fn visit_full_text_search(&mut self, node: &'a FullTextSearch) {
        self.push("CONTAINS(");
        self.push_selector(node.selector_name());
        if let Some(property) = node.property_name() {
            self.push_char('.');
            self.push_name(property);
        }
        self.push_char(',');
        self.push_quoted(node.expression());
        self.push_char(')');
    }

    fn visit_full_text_search_score(&mut self, node: &'a FullTextSearchScore) {
        self.push_selector_function("SCORE", node.selector_name());
    }

    fn visit_join(&mut self, node: &'a Join) {
        self.child(node.left());
        self.push_char(' ');
        self.push(node.join_type().symbol());
        self.push_char(' ');
        self.child(node.right());
        self.push(" ON ");
        self.child(node.condition());
    }

    fn visit_length(&mut self, node: &'a Length) {
        self.push("LENGTH(");
        self.child(node.property_value());
        self.push_char(')');
    }

    fn visit_limit(&mut self, node: &'a Limit) {
        self.push(&node.to_string());
    }

    fn visit_literal(&mut self, node: &'a Literal) {
        let text = self.types.display(node.value());
        if node.value().is_string_like() {
            self.push_quoted(&text);
        } else {
            self.push(&text);
        }
    }

    fn visit_lower_case(&mut self, node: &'a LowerCase) {
        self.push("LOWER(");
        self.child(node.operand());
        self.push_char(')');
    }

    fn visit_node_depth(&mut self, node: &'a NodeDepth) {
        self.push_selector_function("DEPTH", node.selector_name());
    }

    fn visit_node_path(&mut self, node: &'a NodePath) {
        self.push_selector_function("PATH", node.selector_name());
    }

    fn visit_node_name(&mut self, node: &'a NodeName) {
        self.push_selector_function("NAME", node.selector_name());
    }

    fn visit_node_local_name(&mut self, node: &'a NodeLocalName) {
        self.push_selector_function("LOCALNAME", node.selector_name());
    }

    fn visit_named_selector(&mut self, node: &'a NamedSelector) {
        self.push_selector(node.name());
        if let Some(alias) = node.alias() {
            self.push(" AS ");
            self.push_selector(alias);
        }
    }

    fn visit_not(&mut self, node: &'a Not) {
        self.push("NOT (");
        self.child(node.constraint());
        self.push_char(')');
    }

    fn visit_or(&mut self, node: &'a Or) {
        self.push_char('(');
        self.child(node.left());
        self.push(" OR ");
        self.child(node.right());
        self.push_char(')');
    }

    fn visit_ordering(&mut self, node: &'a Ordering) {
        self.child(node.operand());
        self.push_char(' ');
        self.push(node.order().symbol());
    }

    fn visit_property_existence(&mut self, node: &'a PropertyExistence) {
        self.push_property(node.selector_name(), node.property_name());
        self.push(" IS NOT NULL");
    }

    fn visit_property_value(&mut self, node: &'a PropertyValue) {
        self.push_property(node.selector_name(), node.property_name());
    }

    fn visit_query(&mut self, node: &'a Query) {
        self.push("SELECT ");
        if node.is_distinct() {
            self.push("DISTINCT ");
        }
        if node.columns().is_empty() {
            self.push_char('*');
        } else {
            self.push_list(node.columns(), ", ");
        }
        self.push(" FROM ");
        self.child(node.source());
        if let Some(constraint) = node.constraint() {
            self.push(" WHERE ");
            self.child(constraint);
        }
        if !node.orderings().is_empty() {
            self.push(" ORDER BY ");
            self.push_list(node.orderings(), ", ");
        }
        let limits = node.limits();
        if !limits.is_unlimited() {
            self.push_char(' ');
            self.push(&limits.to_string());
        }
    }

    fn visit_subquery(&mut self, node: &'a Subquery) {
        self.push_char('(');
        self.child(node.query());
        self.push_char(')');
    }

    fn visit_reference_value(&mut self, node: &'a ReferenceValue) {
        self.push_selector(node.selector_name());
        if let Some(property) = node.property_name() {
            self.push_char('.');
            self.push_name(property);
        }
    }

    fn visit_same_node(&mut self, node: &'a SameNode) {
        self.push_path_constraint("ISSAMENODE", node.selector_name(), node.path());
    }

    fn visit_same_node_join_condition(&mut self, node: &'a SameNodeJoinCondition) {
        self.push("ISSAMENODE(");
        self.push_selector(node.selector1_name());
        self.push_char(',');
        self.push_selector(node.selector2_name());
        if let Some(path) = node.selector2_path() {
            self.push_char(',');
            self.push_quoted(path);
        }
        self.push_char(')');
    }

    fn visit_set_criteria(&mut self, node: &'a SetCriteria) {
        self.child(node.left_operand());
        self.push(" IN (");
        self.push_list(node.right_operands(), ",");
        self.push_char(')');
    }

    fn visit_set_query(&mut self, node: &'a SetQuery) {
        self.child(node.left());
        self.push_char(' ');
        self.push(node.operation().symbol());
        self.push_char(' ');
        if node.is_all() {
            self.push("ALL ");
        }
        self.child(node.right());
    }

    fn visit_upper_case(&mut self, node: &'a UpperCase) {
        self.push("UPPER(");
        self.child(node.operand());
        self.push_char(')');
    }
}

// Convenience functions

/// Renders a node in the canonical readable format.
///
/// # Examples
///
/// ```
/// use aqm::ast::{FullTextSearch, SelectorName};
/// use aqm::output::unparse;
///
/// let search = FullTextSearch::on_property(SelectorName::new("sel").unwrap(), "prop", "foo bar").unwrap();
/// assert_eq!(unparse(&search), "CONTAINS(sel.prop,'foo bar')");
/// ```
pub fn unparse<'a>(node: impl Into<Node<'a>>) -> String {
    Unparser::new(Dialect::Readable).render(node)
}

/// Renders a node as JCR-SQL2, bracketing names that need it.
///
/// # Examples
///
/// ```
/// use aqm::ast::{NamedSelector, Query, SelectorName};
/// use aqm::output::unparse_jcr_sql2;
///
/// let selector = NamedSelector::with_alias(
///     SelectorName::new("nt:file").unwrap(),
///     SelectorName::new("f").unwrap(),
/// );
/// assert_eq!(unparse_jcr_sql2(&Query::new(selector)), "SELECT * FROM [nt:file] AS f");
/// ```
pub fn unparse_jcr_sql2<'a>(node: impl Into<Node<'a>>) -> String {
    Unparser::new(Dialect::JcrSql2).render(node)
}
