use std::sync::Arc;

use crate::{
    ast::{
        ArithmeticOperator, QueryCommand, SelectorName,
        node_hash::{NodeHash, cached_hash},
    },
    error::ModelError,
    value::Value,
};

pub(crate) fn required_text(value: impl Into<String>, name: &'static str) -> Result<String, ModelError> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(ModelError::required(name));
    }
    Ok(value)
}

/// A value computed per candidate node.
///
/// Every dynamic operand depends on at least one selector; see
/// [`DynamicOperand::selector_names`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DynamicOperand {
    /// Value of a property (`sel.prop`)
    PropertyValue(PropertyValue),

    /// Value of a reference property, or of any reference property (`sel[.prop]`)
    ReferenceValue(ReferenceValue),

    /// Length of a property value (`LENGTH(sel.prop)`)
    Length(Length),

    /// `LOWER(operand)`
    LowerCase(LowerCase),

    /// `UPPER(operand)`
    UpperCase(UpperCase),

    /// Depth of the node (`DEPTH(sel)`)
    NodeDepth(NodeDepth),

    /// Path of the node (`PATH(sel)`)
    NodePath(NodePath),

    /// Qualified name of the node (`NAME(sel)`)
    NodeName(NodeName),

    /// Local name of the node (`LOCALNAME(sel)`)
    NodeLocalName(NodeLocalName),

    /// Full-text relevance score (`SCORE(sel)`)
    FullTextSearchScore(FullTextSearchScore),

    /// Binary arithmetic over two operands (`(left + right)`)
    Arithmetic(ArithmeticOperand),
}

impl DynamicOperand {
    /// Selectors this operand depends on, in order of first appearance and
    /// without duplicates. Never empty.
    pub fn selector_names(&self) -> Vec<&SelectorName> {
        let mut names = Vec::new();
        self.collect_selector_names(&mut names);
        names
    }

    fn collect_selector_names<'a>(&'a self, names: &mut Vec<&'a SelectorName>) {
        let name = match self {
            DynamicOperand::PropertyValue(op) => op.selector_name(),
            DynamicOperand::ReferenceValue(op) => op.selector_name(),
            DynamicOperand::Length(op) => op.selector_name(),
            DynamicOperand::NodeDepth(op) => op.selector_name(),
            DynamicOperand::NodePath(op) => op.selector_name(),
            DynamicOperand::NodeName(op) => op.selector_name(),
            DynamicOperand::NodeLocalName(op) => op.selector_name(),
            DynamicOperand::FullTextSearchScore(op) => op.selector_name(),
            DynamicOperand::LowerCase(op) => return op.operand().collect_selector_names(names),
            DynamicOperand::UpperCase(op) => return op.operand().collect_selector_names(names),
            DynamicOperand::Arithmetic(op) => {
                op.left().collect_selector_names(names);
                op.right().collect_selector_names(names);
                return;
            }
        };
        if !names.contains(&name) {
            names.push(name);
        }
    }
}

/// Value of a named property on the nodes of a selector.
///
/// # Example
/// ```text
/// file.[jcr:mimeType]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyValue {
    selector_name: SelectorName,
    property_name: String,
}

impl PropertyValue {
    pub fn new(selector_name: SelectorName, property_name: impl Into<String>) -> Result<Self, ModelError> {
        Ok(PropertyValue {
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

/// Value of a reference property. Without a property name, any reference
/// property of the node matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceValue {
    selector_name: SelectorName,
    property_name: Option<String>,
}

impl ReferenceValue {
    /// Any reference property of the selector's nodes.
    pub fn new(selector_name: SelectorName) -> Self {
        ReferenceValue {
            selector_name,
            property_name: None,
        }
    }

    pub fn with_property(selector_name: SelectorName, property_name: impl Into<String>) -> Result<Self, ModelError> {
        Ok(ReferenceValue {
            selector_name,
            property_name: Some(required_text(property_name, "propertyName")?),
        })
    }

    pub fn selector_name(&self) -> &SelectorName {
        &self.selector_name
    }

    pub fn property_name(&self) -> Option<&str> {
        self.property_name.as_deref()
    }
}

/// Length of a property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Length {
    property_value: PropertyValue,
}

impl Length {
    pub fn new(property_value: PropertyValue) -> Self {
        Length { property_value }
    }

    pub fn property_value(&self) -> &PropertyValue {
        &self.property_value
    }

    pub fn selector_name(&self) -> &SelectorName {
        self.property_value.selector_name()
    }
}

/// Lower-cased value of another operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowerCase {
    hash: NodeHash,
    operand: Arc<DynamicOperand>,
}

impl LowerCase {
    pub fn new(operand: impl Into<DynamicOperand>) -> Self {
        let operand = operand.into();
        LowerCase {
            hash: NodeHash::of(&("LOWER", &operand)),
            operand: Arc::new(operand),
        }
    }

    pub fn operand(&self) -> &DynamicOperand {
        &self.operand
    }
}

/// Upper-cased value of another operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpperCase {
    hash: NodeHash,
    operand: Arc<DynamicOperand>,
}

impl UpperCase {
    pub fn new(operand: impl Into<DynamicOperand>) -> Self {
        let operand = operand.into();
        UpperCase {
            hash: NodeHash::of(&("UPPER", &operand)),
            operand: Arc::new(operand),
        }
    }

    pub fn operand(&self) -> &DynamicOperand {
        &self.operand
    }
}

macro_rules! node_function {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash)]
            pub struct $name {
                selector_name: SelectorName,
            }

            impl $name {
                pub fn new(selector_name: SelectorName) -> Self {
                    $name { selector_name }
                }

                pub fn selector_name(&self) -> &SelectorName {
                    &self.selector_name
                }
            }
        )*
    };
}

node_function!(
    /// Depth of each node of a selector (the root has depth 0).
    NodeDepth,
    /// Path of each node of a selector.
    NodePath,
    /// Qualified name of each node of a selector.
    NodeName,
    /// Local name (the name without its namespace prefix) of each node of a selector.
    NodeLocalName,
    /// Full-text search score of each node of a selector.
    FullTextSearchScore,
);

/// Binary arithmetic over two dynamic operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArithmeticOperand {
    hash: NodeHash,
    left: Arc<DynamicOperand>,
    operator: ArithmeticOperator,
    right: Arc<DynamicOperand>,
}

impl ArithmeticOperand {
    pub fn new(
        left: impl Into<DynamicOperand>,
        operator: ArithmeticOperator,
        right: impl Into<DynamicOperand>,
    ) -> Self {
        let (left, right) = (left.into(), right.into());
        ArithmeticOperand {
            hash: NodeHash::of(&(&left, operator, &right)),
            left: Arc::new(left),
            operator,
            right: Arc::new(right),
        }
    }

    pub fn left(&self) -> &DynamicOperand {
        &self.left
    }

    pub fn operator(&self) -> ArithmeticOperator {
        self.operator
    }

    pub fn right(&self) -> &DynamicOperand {
        &self.right
    }
}

cached_hash!(LowerCase, UpperCase, ArithmeticOperand, Subquery);

macro_rules! into_family {
    ($family:ident { $($variant:ident($ty:ty)),* $(,)? }) => {
        $(
            impl From<$ty> for $family {
                fn from(value: $ty) -> Self {
                    $family::$variant(value)
                }
            }
        )*
    };
}
pub(crate) use into_family;

into_family!(DynamicOperand {
    PropertyValue(PropertyValue),
    ReferenceValue(ReferenceValue),
    Length(Length),
    LowerCase(LowerCase),
    UpperCase(UpperCase),
    NodeDepth(NodeDepth),
    NodePath(NodePath),
    NodeName(NodeName),
    NodeLocalName(NodeLocalName),
    FullTextSearchScore(FullTextSearchScore),
    Arithmetic(ArithmeticOperand),
});

/// A value known independently of any candidate node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StaticOperand {
    /// Literal value
    Literal(Literal),

    /// Variable bound at execution time (`$name`)
    BindVariable(BindVariableName),

    /// Result of a nested query (`(SELECT ...)`)
    Subquery(Subquery),
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    value: Value,
}

impl Literal {
    pub fn new(value: impl Into<Value>) -> Self {
        Literal {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Name of a variable whose value is bound when the query executes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindVariableName {
    variable_name: String,
}

impl BindVariableName {
    pub fn new(variable_name: impl Into<String>) -> Result<Self, ModelError> {
        Ok(BindVariableName {
            variable_name: required_text(variable_name, "variableName")?,
        })
    }

    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }
}

/// A query used as a static operand.
///
/// Wraps the query command rather than being one, so a subquery can appear
/// wherever a value is expected without being a query in its own right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subquery {
    hash: NodeHash,
    query: Arc<QueryCommand>,
}

impl Subquery {
    pub fn new(query: impl Into<QueryCommand>) -> Self {
        let query = query.into();
        Subquery {
            hash: NodeHash::of(&query),
            query: Arc::new(query),
        }
    }

    pub fn query(&self) -> &QueryCommand {
        &self.query
    }
}

into_family!(StaticOperand {
    Literal(Literal),
    BindVariable(BindVariableName),
    Subquery(Subquery),
});

impl From<Value> for StaticOperand {
    fn from(value: Value) -> Self {
        StaticOperand::Literal(Literal::new(value))
    }
}
