use std::{fmt, sync::Arc};

use crate::{
    ast::{
        Constraint, DynamicOperand, Order, SelectorName, SetOperation, Source,
        node_hash::{NodeHash, cached_hash},
        operands::{into_family, required_text},
    },
    error::ModelError,
};

/// One output column of a query.
///
/// Without a property name the column stands for every property of the
/// selector (`sel.*`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    selector_name: SelectorName,
    property_name: Option<String>,
    column_name: Option<String>,
}

impl Column {
    /// All properties of the selector's nodes.
    pub fn all(selector_name: SelectorName) -> Self {
        Column {
            selector_name,
            property_name: None,
            column_name: None,
        }
    }

    /// A single property, output under its own name.
    pub fn property(selector_name: SelectorName, property_name: impl Into<String>) -> Result<Self, ModelError> {
        let property_name = required_text(property_name, "propertyName")?;
        Ok(Column {
            selector_name,
            column_name: Some(property_name.clone()),
            property_name: Some(property_name),
        })
    }

    /// A single property, output under `column_name`.
    pub fn new(
        selector_name: SelectorName,
        property_name: impl Into<String>,
        column_name: impl Into<String>,
    ) -> Result<Self, ModelError> {
        Ok(Column {
            selector_name,
            property_name: Some(required_text(property_name, "propertyName")?),
            column_name: Some(required_text(column_name, "columnName")?),
        })
    }

    pub fn selector_name(&self) -> &SelectorName {
        &self.selector_name
    }

    pub fn property_name(&self) -> Option<&str> {
        self.property_name.as_deref()
    }

    pub fn column_name(&self) -> Option<&str> {
        self.column_name.as_deref()
    }
}

/// Sort key of a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ordering {
    operand: DynamicOperand,
    order: Order,
}

impl Ordering {
    pub fn new(operand: impl Into<DynamicOperand>, order: Order) -> Self {
        Ordering {
            operand: operand.into(),
            order,
        }
    }

    pub fn ascending(operand: impl Into<DynamicOperand>) -> Self {
        Self::new(operand, Order::Ascending)
    }

    pub fn descending(operand: impl Into<DynamicOperand>) -> Self {
        Self::new(operand, Order::Descending)
    }

    pub fn operand(&self) -> &DynamicOperand {
        &self.operand
    }

    pub fn order(&self) -> Order {
        self.order
    }
}

/// Row limit and offset of a query's results.
///
/// [`Limit::NONE`] (`usize::MAX` rows, no offset) means "unlimited".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Limit {
    row_limit: usize,
    offset: usize,
}

impl Limit {
    pub const NONE: Limit = Limit {
        row_limit: usize::MAX,
        offset: 0,
    };

    pub fn new(row_limit: usize, offset: usize) -> Self {
        Limit { row_limit, offset }
    }

    pub fn row_limit(&self) -> usize {
        self.row_limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_unlimited(&self) -> bool {
        *self == Limit::NONE
    }

    pub fn is_offset(&self) -> bool {
        self.offset > 0
    }

    pub fn is_limited_to_single_row_with_no_offset(&self) -> bool {
        self.row_limit == 1 && self.offset == 0
    }

    pub fn with_row_limit(&self, row_limit: usize) -> Self {
        Limit { row_limit, ..*self }
    }

    pub fn with_offset(&self, offset: usize) -> Self {
        Limit { offset, ..*self }
    }
}

impl Default for Limit {
    fn default() -> Self {
        Limit::NONE
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LIMIT {}", self.row_limit)?;
        if self.offset != 0 {
            write!(f, " OFFSET {}", self.offset)?;
        }
        Ok(())
    }
}

/// A single `SELECT` statement.
///
/// Every `with_*`, `adding_*` and similar method returns a new query and
/// leaves the receiver untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    hash: NodeHash,
    source: Source,
    columns: Vec<Column>,
    constraint: Option<Constraint>,
    orderings: Vec<Ordering>,
    limits: Limit,
    distinct: bool,
}

impl Query {
    /// `SELECT * FROM source`, unconstrained, unordered and unlimited.
    pub fn new(source: impl Into<Source>) -> Self {
        Self::from_parts(source, None, Vec::new(), Vec::new(), Limit::NONE, false)
    }

    pub fn from_parts(
        source: impl Into<Source>,
        constraint: Option<Constraint>,
        orderings: Vec<Ordering>,
        columns: Vec<Column>,
        limits: Limit,
        distinct: bool,
    ) -> Self {
        Query {
            hash: NodeHash::default(),
            source: source.into(),
            columns,
            constraint,
            orderings,
            limits,
            distinct,
        }
        .rehashed()
    }

    fn rehashed(mut self) -> Self {
        self.hash = NodeHash::of(&(
            &self.source,
            &self.columns,
            &self.constraint,
            &self.orderings,
            self.limits,
            self.distinct,
        ));
        self
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Output columns; empty means `SELECT *`.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    pub fn orderings(&self) -> &[Ordering] {
        &self.orderings
    }

    pub fn limits(&self) -> Limit {
        self.limits
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn distinct(&self) -> Self {
        Query {
            distinct: true,
            ..self.clone()
        }
        .rehashed()
    }

    pub fn not_distinct(&self) -> Self {
        Query {
            distinct: false,
            ..self.clone()
        }
        .rehashed()
    }

    pub fn with_limit(&self, row_limit: usize) -> Self {
        self.with_limits(self.limits.with_row_limit(row_limit))
    }

    pub fn with_offset(&self, offset: usize) -> Self {
        self.with_limits(self.limits.with_offset(offset))
    }

    pub fn with_limits(&self, limits: Limit) -> Self {
        Query {
            limits,
            ..self.clone()
        }
        .rehashed()
    }

    /// Replace the constraint.
    pub fn constrained_by(&self, constraint: impl Into<Constraint>) -> Self {
        Query {
            constraint: Some(constraint.into()),
            ..self.clone()
        }
        .rehashed()
    }

    pub fn with_columns(&self, columns: Vec<Column>) -> Self {
        Query {
            columns,
            ..self.clone()
        }
        .rehashed()
    }

    pub fn adding_columns(&self, columns: impl IntoIterator<Item = Column>) -> Self {
        let mut query = self.clone();
        query.columns.extend(columns);
        query.rehashed()
    }

    pub fn with_orderings(&self, orderings: Vec<Ordering>) -> Self {
        Query {
            orderings,
            ..self.clone()
        }
        .rehashed()
    }

    pub fn adding_orderings(&self, orderings: impl IntoIterator<Item = Ordering>) -> Self {
        let mut query = self.clone();
        query.orderings.extend(orderings);
        query.rehashed()
    }
}

/// Two query commands combined by `UNION`, `INTERSECT` or `EXCEPT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetQuery {
    hash: NodeHash,
    left: Arc<QueryCommand>,
    operation: SetOperation,
    right: Arc<QueryCommand>,
    all: bool,
    orderings: Vec<Ordering>,
    limits: Limit,
}

impl SetQuery {
    /// Fails unless both operands select the same number of columns.
    pub fn new(
        left: impl Into<QueryCommand>,
        operation: SetOperation,
        right: impl Into<QueryCommand>,
        all: bool,
    ) -> Result<Self, ModelError> {
        let left = left.into();
        let right = right.into();
        let (left_count, right_count) = (left.columns().len(), right.columns().len());
        if left_count != right_count {
            return Err(ModelError::ColumnCountMismatch {
                left: left_count,
                right: right_count,
            });
        }
        Ok(SetQuery {
            hash: NodeHash::default(),
            left: Arc::new(left),
            operation,
            right: Arc::new(right),
            all,
            orderings: Vec::new(),
            limits: Limit::NONE,
        }
        .rehashed())
    }

    fn rehashed(mut self) -> Self {
        self.hash = NodeHash::of(&(
            &self.left,
            self.operation,
            &self.right,
            self.all,
            &self.orderings,
            self.limits,
        ));
        self
    }

    pub fn left(&self) -> &QueryCommand {
        &self.left
    }

    pub fn operation(&self) -> SetOperation {
        self.operation
    }

    pub fn right(&self) -> &QueryCommand {
        &self.right
    }

    pub fn is_all(&self) -> bool {
        self.all
    }

    /// Columns of the left operand, which name the result's columns.
    pub fn columns(&self) -> &[Column] {
        self.left.columns()
    }

    pub fn orderings(&self) -> &[Ordering] {
        &self.orderings
    }

    pub fn limits(&self) -> Limit {
        self.limits
    }

    pub fn with_limits(&self, limits: Limit) -> Self {
        SetQuery {
            limits,
            ..self.clone()
        }
        .rehashed()
    }

    pub fn with_orderings(&self, orderings: Vec<Ordering>) -> Self {
        SetQuery {
            orderings,
            ..self.clone()
        }
        .rehashed()
    }

    pub fn adding_orderings(&self, orderings: impl IntoIterator<Item = Ordering>) -> Self {
        let mut query = self.clone();
        query.orderings.extend(orderings);
        query.rehashed()
    }
}

cached_hash!(Query, SetQuery);

/// A complete query: a single `SELECT` or a set operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryCommand {
    Query(Query),
    SetQuery(SetQuery),
}

into_family!(QueryCommand {
    Query(Query),
    SetQuery(SetQuery),
});

impl QueryCommand {
    pub fn columns(&self) -> &[Column] {
        match self {
            QueryCommand::Query(query) => query.columns(),
            QueryCommand::SetQuery(query) => query.columns(),
        }
    }

    pub fn orderings(&self) -> &[Ordering] {
        match self {
            QueryCommand::Query(query) => query.orderings(),
            QueryCommand::SetQuery(query) => query.orderings(),
        }
    }

    pub fn limits(&self) -> Limit {
        match self {
            QueryCommand::Query(query) => query.limits(),
            QueryCommand::SetQuery(query) => query.limits(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{And, Comparison, NamedSelector, Operator, PropertyValue, node_hash::tests::written},
        value::Value,
    };

    fn name(text: &str) -> SelectorName {
        SelectorName::new(text).unwrap()
    }

    fn sized_files() -> Query {
        let size = |bound: i64| {
            Comparison::new(
                PropertyValue::new(name("f"), "size").unwrap(),
                Operator::GreaterThan,
                Value::Long(bound),
            )
        };
        Query::new(NamedSelector::with_alias(name("nt:file"), name("f")))
            .with_columns(vec![Column::property(name("f"), "title").unwrap()])
            .constrained_by(And::new(size(1), size(2)))
    }

    #[test]
    fn independently_built_queries_share_their_hash() {
        let (first, second) = (sized_files(), sized_files());
        assert_eq!(first.hash, second.hash);
        assert_eq!(first, second);
        assert_eq!(written(&first), vec![first.hash.value()]);
    }

    #[test]
    fn updates_recompute_the_hash() {
        let query = sized_files();
        let limited = query.with_limit(5);
        assert_ne!(limited.hash, query.hash);
        assert_eq!(limited.with_limit(usize::MAX).hash, query.hash);

        let rebuilt = Query::from_parts(
            query.source().clone(),
            query.constraint().cloned(),
            Vec::new(),
            query.columns().to_vec(),
            Limit::new(5, 0),
            false,
        );
        assert_eq!(rebuilt.hash, limited.hash);

        let extended = Query::new(NamedSelector::with_alias(name("nt:file"), name("f")))
            .adding_columns([Column::property(name("f"), "title").unwrap()])
            .constrained_by(query.constraint().cloned().unwrap());
        assert_eq!(extended.hash, query.hash);
        assert_ne!(query.distinct().hash, query.hash);
    }

    #[test]
    fn set_query_updates_recompute_the_hash() {
        let set = |limits: Limit| {
            SetQuery::new(sized_files(), SetOperation::Union, sized_files(), false)
                .unwrap()
                .with_limits(limits)
        };
        assert_eq!(set(Limit::NONE).hash, set(Limit::NONE).hash);
        assert_ne!(set(Limit::new(3, 0)).hash, set(Limit::NONE).hash);
        assert_eq!(written(&set(Limit::NONE)), vec![set(Limit::NONE).hash.value()]);
    }

    #[test]
    fn limit_updates_copy() {
        let limit = Limit::new(10, 0);
        let offset = limit.with_offset(5);
        assert_eq!(limit, Limit::new(10, 0));
        assert_eq!(offset, Limit::new(10, 5));
        assert!(offset.is_offset());
        assert!(Limit::new(1, 0).is_limited_to_single_row_with_no_offset());
        assert!(!Limit::new(1, 2).is_limited_to_single_row_with_no_offset());
    }

    #[test]
    fn unlimited_requires_zero_offset() {
        assert!(Limit::NONE.is_unlimited());
        assert!(Limit::default().is_unlimited());
        assert!(!Limit::NONE.with_offset(3).is_unlimited());
        assert!(!Limit::NONE.with_row_limit(100).is_unlimited());
    }

    #[test]
    fn limit_display_omits_zero_offset() {
        assert_eq!(Limit::new(5, 0).to_string(), "LIMIT 5");
        assert_eq!(Limit::new(5, 2).to_string(), "LIMIT 5 OFFSET 2");
    }

    #[test]
    fn column_property_uses_property_as_column_name() {
        let column = Column::property(SelectorName::new("a").unwrap(), "x").unwrap();
        assert_eq!(column.column_name(), Some("x"));
        assert_eq!(
            Column::new(SelectorName::new("a").unwrap(), "x", ""),
            Err(ModelError::ArgumentRequired { name: "columnName" })
        );
    }
}
