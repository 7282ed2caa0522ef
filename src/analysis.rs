//! Structural questions about a query tree.
//!
//! Each function pairs the [`Navigator`] with a small visitor that only looks
//! at the node kinds it needs.

use std::collections::{HashMap, HashSet};

use crate::{
    ast::{
        AllNodes, ChildNode, ChildNodeJoinCondition, Column, DescendantNode,
        DescendantNodeJoinCondition, EquiJoinCondition, FullTextSearch, FullTextSearchScore,
        Length, NamedSelector, NodeDepth, NodeLocalName, NodeName, NodePath, PropertyExistence,
        PropertyValue, ReferenceValue, SameNode, SameNodeJoinCondition, SelectorName, Subquery,
    },
    navigator::{Navigator, visit_all},
    visitor::{Node, Visitor},
};

#[derive(Default)]
struct SubqueryCollector<'a> {
    found: Vec<&'a Subquery>,
}

impl<'a> Visitor<'a> for SubqueryCollector<'a> {
    fn visit_subquery(&mut self, node: &'a Subquery) {
        self.found.push(node);
    }
}

/// Every subquery in `root`, in walk order.
///
/// Without `include_nested`, subqueries inside other subqueries are left out.
/// With it, each subquery is followed by the subqueries nested inside it.
pub fn subqueries<'a>(root: impl Into<Node<'a>>, include_nested: bool) -> Vec<&'a Subquery> {
    let mut found = Vec::new();
    collect_subqueries(root.into(), include_nested, &mut found);
    found
}

fn collect_subqueries<'a>(root: Node<'a>, include_nested: bool, found: &mut Vec<&'a Subquery>) {
    let collector = Navigator::new(SubqueryCollector::default())
        .skipping_subqueries()
        .walk(root);
    for subquery in collector.found {
        found.push(subquery);
        if include_nested {
            collect_subqueries(Node::from(subquery.query()), true, found);
        }
    }
}

struct AliasCollector<F> {
    entry: F,
    map: HashMap<SelectorName, SelectorName>,
}

impl<F> AliasCollector<F>
where
    F: Fn(&SelectorName, &SelectorName) -> (SelectorName, SelectorName),
{
    fn new(entry: F) -> Self {
        AliasCollector {
            entry,
            map: HashMap::new(),
        }
    }

    fn add(&mut self, name: &SelectorName, alias: Option<&SelectorName>) {
        if let Some(alias) = alias {
            let (key, value) = (self.entry)(name, alias);
            self.map.insert(key, value);
        }
    }
}

impl<'a, F> Visitor<'a> for AliasCollector<F>
where
    F: Fn(&SelectorName, &SelectorName) -> (SelectorName, SelectorName),
{
    fn visit_all_nodes(&mut self, node: &'a AllNodes) {
        self.add(node.name(), node.alias());
    }

    fn visit_named_selector(&mut self, node: &'a NamedSelector) {
        self.add(node.name(), node.alias());
    }
}

/// Map from each declared alias to the selector name it stands for.
///
/// Only selectors that declare an alias contribute.
pub fn selector_names_by_alias<'a>(root: impl Into<Node<'a>>) -> HashMap<SelectorName, SelectorName> {
    let collector = AliasCollector::new(|name: &SelectorName, alias: &SelectorName| {
        (alias.clone(), name.clone())
    });
    visit_all(root, collector).map
}

/// Map from each aliased selector name to its alias.
///
/// Only selectors that declare an alias contribute.
pub fn selector_aliases_by_name<'a>(root: impl Into<Node<'a>>) -> HashMap<SelectorName, SelectorName> {
    let collector = AliasCollector::new(|name: &SelectorName, alias: &SelectorName| {
        (name.clone(), alias.clone())
    });
    visit_all(root, collector).map
}

#[derive(Default)]
struct ReferencedSelectors {
    names: HashSet<SelectorName>,
}

impl ReferencedSelectors {
    fn add(&mut self, name: &SelectorName) {
        if !self.names.contains(name) {
            self.names.insert(name.clone());
        }
    }
}

impl<'a> Visitor<'a> for ReferencedSelectors {
    fn visit_all_nodes(&mut self, node: &'a AllNodes) {
        self.add(node.alias_or_name());
    }

    fn visit_named_selector(&mut self, node: &'a NamedSelector) {
        self.add(node.alias_or_name());
    }

    fn visit_child_node(&mut self, node: &'a ChildNode) {
        self.add(node.selector_name());
    }

    fn visit_child_node_join_condition(&mut self, node: &'a ChildNodeJoinCondition) {
        self.add(node.child_selector_name());
        self.add(node.parent_selector_name());
    }

    fn visit_column(&mut self, node: &'a Column) {
        self.add(node.selector_name());
    }

    fn visit_descendant_node(&mut self, node: &'a DescendantNode) {
        self.add(node.selector_name());
    }

    fn visit_descendant_node_join_condition(&mut self, node: &'a DescendantNodeJoinCondition) {
        self.add(node.ancestor_selector_name());
        self.add(node.descendant_selector_name());
    }

    fn visit_equi_join_condition(&mut self, node: &'a EquiJoinCondition) {
        self.add(node.selector1_name());
        self.add(node.selector2_name());
    }

    fn visit_full_text_search(&mut self, node: &'a FullTextSearch) {
        self.add(node.selector_name());
    }

    fn visit_full_text_search_score(&mut self, node: &'a FullTextSearchScore) {
        self.add(node.selector_name());
    }

    fn visit_length(&mut self, node: &'a Length) {
        self.add(node.selector_name());
    }

    fn visit_node_depth(&mut self, node: &'a NodeDepth) {
        self.add(node.selector_name());
    }

    fn visit_node_path(&mut self, node: &'a NodePath) {
        self.add(node.selector_name());
    }

    fn visit_node_local_name(&mut self, node: &'a NodeLocalName) {
        self.add(node.selector_name());
    }

    fn visit_node_name(&mut self, node: &'a NodeName) {
        self.add(node.selector_name());
    }

    fn visit_property_existence(&mut self, node: &'a PropertyExistence) {
        self.add(node.selector_name());
    }

    fn visit_property_value(&mut self, node: &'a PropertyValue) {
        self.add(node.selector_name());
    }

    fn visit_reference_value(&mut self, node: &'a ReferenceValue) {
        self.add(node.selector_name());
    }

    fn visit_same_node(&mut self, node: &'a SameNode) {
        self.add(node.selector_name());
    }

    fn visit_same_node_join_condition(&mut self, node: &'a SameNodeJoinCondition) {
        self.add(node.selector1_name());
        self.add(node.selector2_name());
    }
}

/// Every selector name or alias referenced anywhere in `root`, including
/// inside subqueries.
pub fn selectors_referenced_by<'a>(root: impl Into<Node<'a>>) -> HashSet<SelectorName> {
    visit_all(root, ReferencedSelectors::default()).names
}
