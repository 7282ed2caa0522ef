// tests/model_tests.rs

use std::collections::HashSet;

use aqm::ast::{
    AllNodes, And, ArithmeticOperand, ArithmeticOperator, BindVariableName, Column, Comparison,
    Constraint, DynamicOperand, EquiJoinCondition, FullTextSearch, Join, JoinType, Length, Limit,
    Literal, LowerCase, NamedSelector, NodeDepth, Operator, Ordering, PropertyValue, Query,
    QueryCommand, ReferenceValue, SameNodeJoinCondition, SelectorName, SetOperation, SetQuery,
    Source, Subquery,
};
use aqm::{ModelError, Value};

fn name(text: &str) -> SelectorName {
    SelectorName::new(text).unwrap()
}

fn property(selector: &str, property: &str) -> PropertyValue {
    PropertyValue::new(name(selector), property).unwrap()
}

fn query_with_columns(selector: &str, columns: &[&str]) -> Query {
    Query::new(NamedSelector::new(name(selector))).with_columns(
        columns
            .iter()
            .map(|column| Column::property(name(selector), *column).unwrap())
            .collect(),
    )
}

// ============================================================================
// Construction errors
// ============================================================================

#[test]
fn test_blank_selector_name_is_rejected() {
    assert_eq!(
        SelectorName::new("  "),
        Err(ModelError::ArgumentRequired { name: "name" })
    );
}

#[test]
fn test_missing_arguments_are_named() {
    assert_eq!(
        PropertyValue::new(name("a"), ""),
        Err(ModelError::ArgumentRequired { name: "propertyName" })
    );
    assert_eq!(
        BindVariableName::new(""),
        Err(ModelError::ArgumentRequired { name: "variableName" })
    );
    assert_eq!(
        EquiJoinCondition::new(name("a"), "x", name("b"), " "),
        Err(ModelError::ArgumentRequired { name: "property2Name" })
    );
    assert_eq!(
        SameNodeJoinCondition::with_path(name("a"), name("b"), ""),
        Err(ModelError::ArgumentRequired { name: "selector2Path" })
    );
    assert_eq!(
        FullTextSearch::on_selector(name("a"), ""),
        Err(ModelError::ArgumentRequired { name: "fullTextSearchExpression" })
    );
}

#[test]
fn test_error_messages_name_the_argument() {
    let err = PropertyValue::new(name("a"), "").unwrap_err();
    assert_eq!(err.to_string(), "the 'propertyName' argument is required");
}

// ============================================================================
// Equality
// ============================================================================

#[test]
fn test_structurally_equal_trees_are_equal() {
    let build = || {
        Query::new(NamedSelector::with_alias(name("nt:file"), name("f")))
            .with_columns(vec![Column::property(name("f"), "title").unwrap()])
            .constrained_by(And::new(
                Comparison::new(property("f", "size"), Operator::GreaterThan, Value::Long(10)),
                FullTextSearch::on_property(name("f"), "body", "foo bar").unwrap(),
            ))
            .with_limit(5)
    };
    let first = build();
    let second = build();
    assert_eq!(first, second);

    let mut set = HashSet::new();
    set.insert(first);
    assert!(set.contains(&second));
}

#[test]
fn test_full_text_equality_ignores_cached_term() {
    let parsed = FullTextSearch::on_selector(name("a"), "foo").unwrap();
    let fresh = FullTextSearch::on_selector(name("a"), "foo").unwrap();
    parsed.term().unwrap();
    assert_eq!(parsed, fresh);
}

#[test]
fn test_different_children_are_not_equal() {
    let left = Comparison::new(property("a", "x"), Operator::EqualTo, Value::from("v"));
    let right = Comparison::new(property("a", "x"), Operator::NotEqualTo, Value::from("v"));
    assert_ne!(left, right);
}

// ============================================================================
// Limit
// ============================================================================

#[test]
fn test_limit_copy_on_write() {
    let original = Limit::new(10, 0);
    let offset = original.with_offset(20);
    let limited = original.with_row_limit(3);

    assert_eq!(original.row_limit(), 10);
    assert_eq!(original.offset(), 0);
    assert_eq!(offset, Limit::new(10, 20));
    assert_eq!(limited, Limit::new(3, 0));
}

#[test]
fn test_limit_none_is_unlimited() {
    assert!(Limit::NONE.is_unlimited());
    assert_eq!(Limit::NONE.row_limit(), usize::MAX);
    assert!(!Limit::new(usize::MAX, 1).is_unlimited());
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_query_defaults() {
    let query = Query::new(AllNodes::new());
    assert!(query.columns().is_empty());
    assert!(query.constraint().is_none());
    assert!(query.orderings().is_empty());
    assert!(query.limits().is_unlimited());
    assert!(!query.is_distinct());
    assert_eq!(
        query.source(),
        &Source::AllNodes(AllNodes::new())
    );
}

#[test]
fn test_query_updates_leave_original_untouched() {
    let original = query_with_columns("a", &["x"]);
    let changed = original
        .distinct()
        .with_offset(5)
        .adding_columns([Column::all(name("a"))])
        .adding_orderings([Ordering::descending(property("a", "x"))]);

    assert!(!original.is_distinct());
    assert_eq!(original.columns().len(), 1);
    assert!(original.orderings().is_empty());
    assert!(original.limits().is_unlimited());

    assert!(changed.is_distinct());
    assert_eq!(changed.columns().len(), 2);
    assert_eq!(changed.orderings().len(), 1);
    assert_eq!(changed.limits(), Limit::NONE.with_offset(5));
    assert!(!changed.not_distinct().is_distinct());
}

#[test]
fn test_set_query_requires_equal_column_counts() {
    let two = query_with_columns("a", &["x", "y"]);
    let one = query_with_columns("b", &["x"]);
    assert_eq!(
        SetQuery::new(two.clone(), SetOperation::Union, one, false),
        Err(ModelError::ColumnCountMismatch { left: 2, right: 1 })
    );

    // Names need not match, only counts.
    let other_two = query_with_columns("b", &["p", "q"]);
    let union = SetQuery::new(two.clone(), SetOperation::Union, other_two, true).unwrap();
    assert!(union.is_all());
    assert_eq!(union.columns(), two.columns());
}

#[test]
fn test_query_command_exposes_common_accessors() {
    let query = query_with_columns("a", &["x"]).with_limit(2);
    let union = SetQuery::new(query.clone(), SetOperation::Except, query.clone(), false)
        .unwrap()
        .with_orderings(vec![Ordering::ascending(property("a", "x"))]);

    let single = QueryCommand::from(query);
    let combined = QueryCommand::from(union);
    assert_eq!(single.limits(), Limit::new(2, 0));
    assert_eq!(single.columns().len(), 1);
    assert!(combined.limits().is_unlimited());
    assert_eq!(combined.orderings().len(), 1);
    assert_eq!(combined.columns().len(), 1);
}

// ============================================================================
// Selectors and operands
// ============================================================================

#[test]
fn test_selector_alias_or_name() {
    let plain = NamedSelector::new(name("nt:file"));
    let aliased = NamedSelector::with_alias(name("nt:file"), name("f"));
    assert_eq!(plain.alias_or_name(), &name("nt:file"));
    assert_eq!(aliased.alias_or_name(), &name("f"));
    assert!(aliased.has_alias());

    let all = AllNodes::new();
    assert_eq!(all.name().name(), AllNodes::DEFAULT_NAME);
    assert!(!all.has_alias());
}

#[test]
fn test_source_selector_names_follow_join_order() {
    let join = Join::new(
        NamedSelector::with_alias(name("nt:file"), name("f")),
        JoinType::Inner,
        NamedSelector::new(name("r")),
        EquiJoinCondition::new(name("f"), "id", name("r"), "file").unwrap(),
    );
    let source = Source::from(join);
    assert_eq!(source.selector_names(), vec![&name("f"), &name("r")]);
}

#[test]
fn test_dynamic_operand_selector_names_are_unique() {
    let operand = DynamicOperand::from(ArithmeticOperand::new(
        ArithmeticOperand::new(NodeDepth::new(name("a")), ArithmeticOperator::Add, property("b", "x")),
        ArithmeticOperator::Multiply,
        LowerCase::new(Length::new(property("a", "y"))),
    ));
    assert_eq!(operand.selector_names(), vec![&name("a"), &name("b")]);

    let reference = DynamicOperand::from(ReferenceValue::new(name("c")));
    assert_eq!(reference.selector_names(), vec![&name("c")]);
}

#[test]
fn test_subquery_wraps_a_query_command() {
    let inner = query_with_columns("a", &["x"]);
    let subquery = Subquery::new(inner.clone());
    assert_eq!(subquery.query(), &QueryCommand::Query(inner));

    let constraint = Constraint::from(Comparison::new(
        property("b", "y"),
        Operator::EqualTo,
        subquery,
    ));
    assert!(matches!(constraint, Constraint::Comparison(_)));
    assert_eq!(Literal::new(3_i64).value(), &Value::Long(3));
}
