//! Breadth-first traversal driving a [`Visitor`].
//!
//! A [`Navigator`] owns the walk order; the wrapped visitor only does
//! per-node work. One FIFO queue is shared by the whole walk: each popped node
//! is handed to the visitor and its direct children are appended to the back
//! of the queue, so nodes are visited level by level across the entire tree.
//!
//! Children are enqueued in a fixed order per kind:
//!
//! | Kind | Children |
//! |---|---|
//! | `And`, `Or` | left, right |
//! | `Not` | constraint |
//! | `Comparison` | operand1, operand2 |
//! | `Between` | operand, lower bound, upper bound |
//! | `SetCriteria` | left operand, then each right operand |
//! | `ArithmeticOperand` | left, right |
//! | `LowerCase`, `UpperCase` | operand |
//! | `Join` | left, condition, right |
//! | `Ordering` | operand |
//! | `Query` | source, columns, constraint, orderings |
//! | `SetQuery` | left, right |
//! | `Subquery` | query |
//!
//! Every other kind is a leaf. A query's limit is not walked, and neither is
//! the property value inside `Length`.

use std::collections::VecDeque;

use tracing::trace;

use crate::visitor::{Node, Visitor};

/// Walks a tree breadth-first, handing every node to a strategy visitor.
///
/// A navigator is single use: [`Navigator::walk`] consumes it and returns the
/// strategy with whatever it accumulated.
pub struct Navigator<'a, S> {
    strategy: S,
    queue: VecDeque<Node<'a>>,
    descend_into_subqueries: bool,
}

impl<'a, S: Visitor<'a>> Navigator<'a, S> {
    pub fn new(strategy: S) -> Self {
        Navigator {
            strategy,
            queue: VecDeque::new(),
            descend_into_subqueries: true,
        }
    }

    /// Visit `Subquery` nodes but not the queries inside them.
    pub fn skipping_subqueries(mut self) -> Self {
        self.descend_into_subqueries = false;
        self
    }

    pub fn walk(mut self, root: impl Into<Node<'a>>) -> S {
        self.queue.push_back(root.into());
        while let Some(node) = self.queue.pop_front() {
            trace!(kind = node.kind(), "navigator.visit");
            node.accept(&mut self.strategy);
            self.enqueue_children(node);
        }
        self.strategy
    }

    fn push(&mut self, node: impl Into<Node<'a>>) {
        self.queue.push_back(node.into());
    }

    fn enqueue_children(&mut self, node: Node<'a>) {
        match node {
            Node::And(and) => {
                self.push(and.left());
                self.push(and.right());
            }
            Node::Or(or) => {
                self.push(or.left());
                self.push(or.right());
            }
            Node::Not(not) => self.push(not.constraint()),
            Node::Comparison(comparison) => {
                self.push(comparison.operand1());
                self.push(comparison.operand2());
            }
            Node::Between(between) => {
                self.push(between.operand());
                self.push(between.lower_bound());
                self.push(between.upper_bound());
            }
            Node::SetCriteria(criteria) => {
                self.push(criteria.left_operand());
                for operand in criteria.right_operands() {
                    self.push(operand);
                }
            }
            Node::ArithmeticOperand(arithmetic) => {
                self.push(arithmetic.left());
                self.push(arithmetic.right());
            }
            Node::LowerCase(lower) => self.push(lower.operand()),
            Node::UpperCase(upper) => self.push(upper.operand()),
            Node::Join(join) => {
                self.push(join.left());
                self.push(join.condition());
                self.push(join.right());
            }
            Node::Ordering(ordering) => self.push(ordering.operand()),
            Node::Query(query) => {
                self.push(query.source());
                for column in query.columns() {
                    self.push(column);
                }
                if let Some(constraint) = query.constraint() {
                    self.push(constraint);
                }
                for ordering in query.orderings() {
                    self.push(ordering);
                }
            }
            Node::SetQuery(query) => {
                self.push(query.left());
                self.push(query.right());
            }
            Node::Subquery(subquery) => {
                if self.descend_into_subqueries {
                    self.push(subquery.query());
                }
            }
            Node::AllNodes(_)
            | Node::BindVariableName(_)
            | Node::ChildNode(_)
            | Node::ChildNodeJoinCondition(_)
            | Node::Column(_)
            | Node::DescendantNode(_)
            | Node::DescendantNodeJoinCondition(_)
            | Node::EquiJoinCondition(_)
            | Node::FullTextSearch(_)
            | Node::FullTextSearchScore(_)
            | Node::Length(_)
            | Node::Limit(_)
            | Node::Literal(_)
            | Node::NodeDepth(_)
            | Node::NodePath(_)
            | Node::NodeName(_)
            | Node::NodeLocalName(_)
            | Node::NamedSelector(_)
            | Node::PropertyExistence(_)
            | Node::PropertyValue(_)
            | Node::ReferenceValue(_)
            | Node::SameNode(_)
            | Node::SameNodeJoinCondition(_) => {}
        }
    }
}

/// Walk every node reachable from `root`, including subquery bodies.
pub fn visit_all<'a, S: Visitor<'a>>(root: impl Into<Node<'a>>, strategy: S) -> S {
    Navigator::new(strategy).walk(root)
}
