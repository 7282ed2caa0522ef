use std::sync::Arc;

use crate::{
    ast::{
        AllNodes, JoinType, NamedSelector, SelectorName,
        node_hash::{NodeHash, cached_hash},
        operands::{into_family, required_text},
    },
    error::ModelError,
};

/// Where the candidate nodes of a query come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// Nodes of a named type (`[nt:file] AS f`)
    NamedSelector(NamedSelector),

    /// Every node in the content tree
    AllNodes(AllNodes),

    /// Two sources combined by a join condition
    Join(Join),
}

impl Source {
    /// Alias (or name) of every selector this source introduces, left to right.
    pub fn selector_names(&self) -> Vec<&SelectorName> {
        match self {
            Source::NamedSelector(selector) => vec![selector.alias_or_name()],
            Source::AllNodes(selector) => vec![selector.alias_or_name()],
            Source::Join(join) => {
                let mut names = join.left().selector_names();
                names.extend(join.right().selector_names());
                names
            }
        }
    }
}

into_family!(Source {
    NamedSelector(NamedSelector),
    AllNodes(AllNodes),
    Join(Join),
});

/// A join of two sources.
///
/// # Example
/// ```text
/// [nt:file] AS f INNER JOIN [nt:resource] AS r ON ISCHILDNODE(r,f)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    hash: NodeHash,
    left: Arc<Source>,
    join_type: JoinType,
    right: Arc<Source>,
    condition: JoinCondition,
}

impl Join {
    pub fn new(
        left: impl Into<Source>,
        join_type: JoinType,
        right: impl Into<Source>,
        condition: impl Into<JoinCondition>,
    ) -> Self {
        let (left, right, condition) = (left.into(), right.into(), condition.into());
        Join {
            hash: NodeHash::of(&(&left, join_type, &right, &condition)),
            left: Arc::new(left),
            join_type,
            right: Arc::new(right),
            condition,
        }
    }

    pub fn left(&self) -> &Source {
        &self.left
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn right(&self) -> &Source {
        &self.right
    }

    pub fn condition(&self) -> &JoinCondition {
        &self.condition
    }
}

cached_hash!(Join);

/// Criteria that pair rows of the two sides of a [`Join`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinCondition {
    /// Property values are equal (`s1.p1 = s2.p2`)
    EquiJoin(EquiJoinCondition),

    /// One node is the child of the other
    ChildNode(ChildNodeJoinCondition),

    /// One node is a descendant of the other
    DescendantNode(DescendantNodeJoinCondition),

    /// Both sides are the same node, or one is at a relative path from the other
    SameNode(SameNodeJoinCondition),
}

into_family!(JoinCondition {
    EquiJoin(EquiJoinCondition),
    ChildNode(ChildNodeJoinCondition),
    DescendantNode(DescendantNodeJoinCondition),
    SameNode(SameNodeJoinCondition),
});

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EquiJoinCondition {
    selector1_name: SelectorName,
    property1_name: String,
    selector2_name: SelectorName,
    property2_name: String,
}

impl EquiJoinCondition {
    pub fn new(
        selector1_name: SelectorName,
        property1_name: impl Into<String>,
        selector2_name: SelectorName,
        property2_name: impl Into<String>,
    ) -> Result<Self, ModelError> {
        Ok(EquiJoinCondition {
            selector1_name,
            property1_name: required_text(property1_name, "property1Name")?,
            selector2_name,
            property2_name: required_text(property2_name, "property2Name")?,
        })
    }

    pub fn selector1_name(&self) -> &SelectorName {
        &self.selector1_name
    }

    pub fn property1_name(&self) -> &str {
        &self.property1_name
    }

    pub fn selector2_name(&self) -> &SelectorName {
        &self.selector2_name
    }

    pub fn property2_name(&self) -> &str {
        &self.property2_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChildNodeJoinCondition {
    parent_selector_name: SelectorName,
    child_selector_name: SelectorName,
}

impl ChildNodeJoinCondition {
    pub fn new(parent_selector_name: SelectorName, child_selector_name: SelectorName) -> Self {
        ChildNodeJoinCondition {
            parent_selector_name,
            child_selector_name,
        }
    }

    pub fn parent_selector_name(&self) -> &SelectorName {
        &self.parent_selector_name
    }

    pub fn child_selector_name(&self) -> &SelectorName {
        &self.child_selector_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescendantNodeJoinCondition {
    ancestor_selector_name: SelectorName,
    descendant_selector_name: SelectorName,
}

impl DescendantNodeJoinCondition {
    pub fn new(ancestor_selector_name: SelectorName, descendant_selector_name: SelectorName) -> Self {
        DescendantNodeJoinCondition {
            ancestor_selector_name,
            descendant_selector_name,
        }
    }

    pub fn ancestor_selector_name(&self) -> &SelectorName {
        &self.ancestor_selector_name
    }

    pub fn descendant_selector_name(&self) -> &SelectorName {
        &self.descendant_selector_name
    }
}

/// Same-node join. With a path, the node of `selector2` at that relative path
/// must be the node of `selector1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SameNodeJoinCondition {
    selector1_name: SelectorName,
    selector2_name: SelectorName,
    selector2_path: Option<String>,
}

impl SameNodeJoinCondition {
    pub fn new(selector1_name: SelectorName, selector2_name: SelectorName) -> Self {
        SameNodeJoinCondition {
            selector1_name,
            selector2_name,
            selector2_path: None,
        }
    }

    pub fn with_path(
        selector1_name: SelectorName,
        selector2_name: SelectorName,
        selector2_path: impl Into<String>,
    ) -> Result<Self, ModelError> {
        Ok(SameNodeJoinCondition {
            selector1_name,
            selector2_name,
            selector2_path: Some(required_text(selector2_path, "selector2Path")?),
        })
    }

    pub fn selector1_name(&self) -> &SelectorName {
        &self.selector1_name
    }

    pub fn selector2_name(&self) -> &SelectorName {
        &self.selector2_name
    }

    pub fn selector2_path(&self) -> Option<&str> {
        self.selector2_path.as_deref()
    }
}
