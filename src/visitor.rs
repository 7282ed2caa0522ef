//! Double dispatch over the query tree.
//!
//! [`Node`] is a borrowed, copyable view of any node in a tree, with one
//! variant per node kind. [`Node::accept`] calls exactly one method of a
//! [`Visitor`]. Every visitor method defaults to doing nothing, so a visitor
//! only overrides the kinds it cares about.
//!
//! Visitors here never recurse on their own. Traversal order belongs to the
//! [`Navigator`](crate::navigator::Navigator), which hands each node to a
//! wrapped visitor; the [`Unparser`](crate::output::Unparser) is the one
//! visitor that recurses, because rendering is inherently nested.
//!
//! # Example
//!
//! ```
//! use aqm::ast::{NodeDepth, SelectorName};
//! use aqm::visitor::{Node, Visitor, visit};
//!
//! #[derive(Default)]
//! struct Depths(usize);
//!
//! impl<'a> Visitor<'a> for Depths {
//!     fn visit_node_depth(&mut self, _node: &'a NodeDepth) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let depth = NodeDepth::new(SelectorName::new("a").unwrap());
//! assert_eq!(visit(&depth, Depths::default()).0, 1);
//! assert_eq!(Node::from(&depth).kind(), "NodeDepth");
//! ```

use crate::ast::{
    AllNodes, And, ArithmeticOperand, Between, BindVariableName, ChildNode,
    ChildNodeJoinCondition, Column, Comparison, Constraint, DescendantNode,
    DescendantNodeJoinCondition, DynamicOperand, EquiJoinCondition, FullTextSearch,
    FullTextSearchScore, Join, JoinCondition, Length, Limit, Literal, LowerCase, NamedSelector,
    NodeDepth, NodeLocalName, NodeName, NodePath, Not, Or, Ordering, PropertyExistence,
    PropertyValue, Query, QueryCommand, ReferenceValue, SameNode, SameNodeJoinCondition,
    SetCriteria, SetQuery, Source, StaticOperand, Subquery, UpperCase,
};

macro_rules! node_kinds {
    ($($variant:ident => $visit:ident),* $(,)?) => {
        /// A borrowed reference to one node of a query tree.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum Node<'a> {
            $($variant(&'a $variant),)*
        }

        impl<'a> Node<'a> {
            /// Dispatch to the visitor method for this node's kind.
            pub fn accept<V: Visitor<'a> + ?Sized>(self, visitor: &mut V) {
                match self {
                    $(Node::$variant(node) => visitor.$visit(node),)*
                }
            }

            /// Name of this node's kind.
            pub fn kind(&self) -> &'static str {
                match self {
                    $(Node::$variant(_) => stringify!($variant),)*
                }
            }
        }

        $(
            impl<'a> From<&'a $variant> for Node<'a> {
                fn from(node: &'a $variant) -> Self {
                    Node::$variant(node)
                }
            }

            impl Visitable for $variant {
                fn as_node(&self) -> Node<'_> {
                    Node::$variant(self)
                }
            }
        )*

        /// Per-node work, one method per node kind.
        ///
        /// Every method defaults to a no-op.
        pub trait Visitor<'a> {
            $(
                fn $visit(&mut self, node: &'a $variant) {
                    let _ = node;
                }
            )*
        }
    };
}

node_kinds! {
    AllNodes => visit_all_nodes,
    And => visit_and,
    ArithmeticOperand => visit_arithmetic_operand,
    Between => visit_between,
    BindVariableName => visit_bind_variable_name,
    ChildNode => visit_child_node,
    ChildNodeJoinCondition => visit_child_node_join_condition,
    Column => visit_column,
    Comparison => visit_comparison,
    DescendantNode => visit_descendant_node,
    DescendantNodeJoinCondition => visit_descendant_node_join_condition,
    EquiJoinCondition => visit_equi_join_condition,
    FullTextSearch => visit_full_text_search,
    FullTextSearchScore => visit_full_text_search_score,
    Join => visit_join,
    Length => visit_length,
    Limit => visit_limit,
    Literal => visit_literal,
    LowerCase => visit_lower_case,
    NodeDepth => visit_node_depth,
    NodePath => visit_node_path,
    NodeName => visit_node_name,
    NodeLocalName => visit_node_local_name,
    NamedSelector => visit_named_selector,
    Not => visit_not,
    Or => visit_or,
    Ordering => visit_ordering,
    PropertyExistence => visit_property_existence,
    PropertyValue => visit_property_value,
    Query => visit_query,
    Subquery => visit_subquery,
    ReferenceValue => visit_reference_value,
    SameNode => visit_same_node,
    SameNodeJoinCondition => visit_same_node_join_condition,
    SetCriteria => visit_set_criteria,
    SetQuery => visit_set_query,
    UpperCase => visit_upper_case,
}

/// Anything that can be viewed as a [`Node`] and visited.
pub trait Visitable {
    fn as_node(&self) -> Node<'_>;

    /// Dispatch this node (and only this node) to `visitor`.
    fn accept<'a, V: Visitor<'a> + ?Sized>(&'a self, visitor: &mut V) {
        self.as_node().accept(visitor)
    }
}

/// Dispatch `root` once to `visitor` and hand the visitor back.
pub fn visit<'a, V: Visitor<'a>>(root: impl Into<Node<'a>>, mut visitor: V) -> V {
    root.into().accept(&mut visitor);
    visitor
}

macro_rules! family_nodes {
    ($($family:ident { $($variant:ident),* $(,)? })*) => {
        $(
            impl<'a> From<&'a $family> for Node<'a> {
                fn from(node: &'a $family) -> Self {
                    match node {
                        $($family::$variant(inner) => Node::from(inner),)*
                    }
                }
            }

            impl Visitable for $family {
                fn as_node(&self) -> Node<'_> {
                    Node::from(self)
                }
            }
        )*
    };
}

family_nodes! {
    Source { NamedSelector, AllNodes, Join }
    JoinCondition { EquiJoin, ChildNode, DescendantNode, SameNode }
    Constraint {
        And, Or, Not, Comparison, Between, PropertyExistence, SetCriteria, FullTextSearch,
        ChildNode, DescendantNode, SameNode,
    }
    DynamicOperand {
        PropertyValue, ReferenceValue, Length, LowerCase, UpperCase, NodeDepth, NodePath,
        NodeName, NodeLocalName, FullTextSearchScore, Arithmetic,
    }
    StaticOperand { Literal, BindVariable, Subquery }
    QueryCommand { Query, SetQuery }
}
