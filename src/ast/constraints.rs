use std::sync::Arc;

use crate::{
    ast::{
        DynamicOperand, FullTextSearch, Operator, SelectorName, StaticOperand,
        node_hash::{NodeHash, cached_hash},
        operands::{into_family, required_text},
    },
    error::ModelError,
};

/// A boolean predicate over one or more selectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Both constraints hold
    And(And),

    /// Either constraint holds
    Or(Or),

    /// The constraint does not hold
    Not(Not),

    /// `operand op value`
    Comparison(Comparison),

    /// `operand BETWEEN lower AND upper`
    Between(Between),

    /// `sel.prop IS NOT NULL`
    PropertyExistence(PropertyExistence),

    /// `operand IN (v1, v2, ...)`
    SetCriteria(SetCriteria),

    /// `CONTAINS(sel[.prop], 'expression')`
    FullTextSearch(FullTextSearch),

    /// The node is a child of the node at a path
    ChildNode(ChildNode),

    /// The node is a descendant of the node at a path
    DescendantNode(DescendantNode),

    /// The node is the node at a path
    SameNode(SameNode),
}

into_family!(Constraint {
    And(And),
    Or(Or),
    Not(Not),
    Comparison(Comparison),
    Between(Between),
    PropertyExistence(PropertyExistence),
    SetCriteria(SetCriteria),
    FullTextSearch(FullTextSearch),
    ChildNode(ChildNode),
    DescendantNode(DescendantNode),
    SameNode(SameNode),
});

macro_rules! binary_constraint {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq)]
            pub struct $name {
                hash: NodeHash,
                left: Arc<Constraint>,
                right: Arc<Constraint>,
            }

            cached_hash!($name);

            impl $name {
                pub fn new(left: impl Into<Constraint>, right: impl Into<Constraint>) -> Self {
                    let (left, right) = (left.into(), right.into());
                    $name {
                        hash: NodeHash::of(&(stringify!($name), &left, &right)),
                        left: Arc::new(left),
                        right: Arc::new(right),
                    }
                }

                pub fn left(&self) -> &Constraint {
                    &self.left
                }

                pub fn right(&self) -> &Constraint {
                    &self.right
                }
            }
        )*
    };
}

binary_constraint!(
    /// Conjunction of two constraints.
    And,
    /// Disjunction of two constraints.
    Or,
);

/// Negation of a constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Not {
    hash: NodeHash,
    constraint: Arc<Constraint>,
}

impl Not {
    pub fn new(constraint: impl Into<Constraint>) -> Self {
        let constraint = constraint.into();
        Not {
            hash: NodeHash::of(&constraint),
            constraint: Arc::new(constraint),
        }
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }
}

/// Compares a dynamic operand with a static one.
///
/// # Example
/// ```text
/// file.[jcr:mimeType] = 'text/plain'
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    hash: NodeHash,
    operand1: DynamicOperand,
    operator: Operator,
    operand2: StaticOperand,
}

impl Comparison {
    pub fn new(
        operand1: impl Into<DynamicOperand>,
        operator: Operator,
        operand2: impl Into<StaticOperand>,
    ) -> Self {
        let (operand1, operand2) = (operand1.into(), operand2.into());
        Comparison {
            hash: NodeHash::of(&(&operand1, operator, &operand2)),
            operand1,
            operator,
            operand2,
        }
    }

    pub fn operand1(&self) -> &DynamicOperand {
        &self.operand1
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand2(&self) -> &StaticOperand {
        &self.operand2
    }
}

/// Range check with independently inclusive bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Between {
    hash: NodeHash,
    operand: DynamicOperand,
    lower_bound: StaticOperand,
    upper_bound: StaticOperand,
    lower_bound_included: bool,
    upper_bound_included: bool,
}

impl Between {
    pub fn new(
        operand: impl Into<DynamicOperand>,
        lower_bound: impl Into<StaticOperand>,
        upper_bound: impl Into<StaticOperand>,
        lower_bound_included: bool,
        upper_bound_included: bool,
    ) -> Self {
        let operand = operand.into();
        let (lower_bound, upper_bound) = (lower_bound.into(), upper_bound.into());
        Between {
            hash: NodeHash::of(&(
                &operand,
                &lower_bound,
                &upper_bound,
                lower_bound_included,
                upper_bound_included,
            )),
            operand,
            lower_bound,
            upper_bound,
            lower_bound_included,
            upper_bound_included,
        }
    }

    /// Both bounds included.
    pub fn inclusive(
        operand: impl Into<DynamicOperand>,
        lower_bound: impl Into<StaticOperand>,
        upper_bound: impl Into<StaticOperand>,
    ) -> Self {
        Self::new(operand, lower_bound, upper_bound, true, true)
    }

    pub fn operand(&self) -> &DynamicOperand {
        &self.operand
    }

    pub fn lower_bound(&self) -> &StaticOperand {
        &self.lower_bound
    }

    pub fn upper_bound(&self) -> &StaticOperand {
        &self.upper_bound
    }

    pub fn is_lower_bound_included(&self) -> bool {
        self.lower_bound_included
    }

    pub fn is_upper_bound_included(&self) -> bool {
        self.upper_bound_included
    }
}

/// The property exists on the selector's nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyExistence {
    selector_name: SelectorName,
    property_name: String,
}

impl PropertyExistence {
    pub fn new(selector_name: SelectorName, property_name: impl Into<String>) -> Result<Self, ModelError> {
        Ok(PropertyExistence {
            selector_name,
            property_name: required_text(property_name, "propertyName")?,
        })
    }

    pub fn selector_name(&self) -> &SelectorName {
        &self.selector_name
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }
}

/// Set membership: the operand equals one of the right-hand values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCriteria {
    hash: NodeHash,
    left_operand: DynamicOperand,
    right_operands: Vec<StaticOperand>,
}

impl SetCriteria {
    /// Fails when `right_operands` is empty.
    pub fn new(
        left_operand: impl Into<DynamicOperand>,
        right_operands: impl IntoIterator<Item = StaticOperand>,
    ) -> Result<Self, ModelError> {
        let right_operands: Vec<_> = right_operands.into_iter().collect();
        if right_operands.is_empty() {
            return Err(ModelError::required("rightOperands"));
        }
        let left_operand = left_operand.into();
        Ok(SetCriteria {
            hash: NodeHash::of(&(&left_operand, &right_operands)),
            left_operand,
            right_operands,
        })
    }

    pub fn left_operand(&self) -> &DynamicOperand {
        &self.left_operand
    }

    pub fn right_operands(&self) -> &[StaticOperand] {
        &self.right_operands
    }
}

macro_rules! path_constraint {
    ($($(#[$meta:meta])* $name:ident($path:ident, $label:literal)),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash)]
            pub struct $name {
                selector_name: SelectorName,
                $path: String,
            }

            impl $name {
                pub fn new(selector_name: SelectorName, $path: impl Into<String>) -> Result<Self, ModelError> {
                    Ok($name {
                        selector_name,
                        $path: required_text($path, $label)?,
                    })
                }

                pub fn selector_name(&self) -> &SelectorName {
                    &self.selector_name
                }

                pub fn $path(&self) -> &str {
                    &self.$path
                }
            }
        )*
    };
}

cached_hash!(Not, Comparison, Between, SetCriteria);

path_constraint!(
    /// The selector's node is a child of the node at `parent_path`.
    ChildNode(parent_path, "parentPath"),
    /// The selector's node is below the node at `ancestor_path`.
    DescendantNode(ancestor_path, "ancestorPath"),
    /// The selector's node is the node at `path`.
    SameNode(path, "path"),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Literal, PropertyValue, node_hash::tests::written};

    fn name(text: &str) -> SelectorName {
        SelectorName::new(text).unwrap()
    }

    #[test]
    fn set_criteria_needs_values() {
        let operand = PropertyValue::new(name("a"), "x").unwrap();
        assert_eq!(
            SetCriteria::new(operand.clone(), Vec::new()),
            Err(ModelError::ArgumentRequired { name: "rightOperands" })
        );
        let criteria = SetCriteria::new(operand, [StaticOperand::from(Literal::new(1_i64))]).unwrap();
        assert_eq!(criteria.right_operands().len(), 1);
    }

    #[test]
    fn path_constraints_name_their_missing_argument() {
        assert_eq!(
            ChildNode::new(name("a"), " "),
            Err(ModelError::ArgumentRequired { name: "parentPath" })
        );
        assert_eq!(
            DescendantNode::new(name("a"), ""),
            Err(ModelError::ArgumentRequired { name: "ancestorPath" })
        );
        assert_eq!(SameNode::new(name("a"), "/x").unwrap().path(), "/x");
    }

    #[test]
    fn composite_constraints_cache_their_hash() {
        let leaf = || PropertyExistence::new(name("a"), "x").unwrap();
        let negated = || Not::new(And::new(leaf(), leaf()));
        assert_eq!(negated().hash, negated().hash);
        assert_eq!(written(&negated()), vec![negated().hash.value()]);
        assert_ne!(And::new(leaf(), leaf()).hash, Or::new(leaf(), leaf()).hash);
    }
}
