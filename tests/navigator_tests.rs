// tests/navigator_tests.rs

use aqm::Value;
use aqm::ast::*;
use aqm::navigator::{Navigator, visit_all};
use aqm::visitor::Visitor;

/// Records the kind of every node handed to it, in visit order.
#[derive(Default)]
struct Recorder(Vec<&'static str>);

macro_rules! recorder {
    ($($visit:ident: $ty:ident),* $(,)?) => {
        impl<'a> Visitor<'a> for Recorder {
            $(
                fn $visit(&mut self, _node: &'a $ty) {
                    self.0.push(stringify!($ty));
                }
            )*
        }
    };
}

recorder! {
    visit_all_nodes: AllNodes,
    visit_and: And,
    visit_arithmetic_operand: ArithmeticOperand,
    visit_between: Between,
    visit_bind_variable_name: BindVariableName,
    visit_child_node: ChildNode,
    visit_child_node_join_condition: ChildNodeJoinCondition,
    visit_column: Column,
    visit_comparison: Comparison,
    visit_descendant_node: DescendantNode,
    visit_descendant_node_join_condition: DescendantNodeJoinCondition,
    visit_equi_join_condition: EquiJoinCondition,
    visit_full_text_search: FullTextSearch,
    visit_full_text_search_score: FullTextSearchScore,
    visit_join: Join,
    visit_length: Length,
    visit_limit: Limit,
    visit_literal: Literal,
    visit_lower_case: LowerCase,
    visit_node_depth: NodeDepth,
    visit_node_path: NodePath,
    visit_node_name: NodeName,
    visit_node_local_name: NodeLocalName,
    visit_named_selector: NamedSelector,
    visit_not: Not,
    visit_or: Or,
    visit_ordering: Ordering,
    visit_property_existence: PropertyExistence,
    visit_property_value: PropertyValue,
    visit_query: Query,
    visit_subquery: Subquery,
    visit_reference_value: ReferenceValue,
    visit_same_node: SameNode,
    visit_same_node_join_condition: SameNodeJoinCondition,
    visit_set_criteria: SetCriteria,
    visit_set_query: SetQuery,
    visit_upper_case: UpperCase,
}

fn name(text: &str) -> SelectorName {
    SelectorName::new(text).unwrap()
}

fn property(selector: &str, property: &str) -> PropertyValue {
    PropertyValue::new(name(selector), property).unwrap()
}

fn kinds<'a>(root: impl Into<aqm::visitor::Node<'a>>) -> Vec<&'static str> {
    visit_all(root, Recorder::default()).0
}

// ============================================================================
// Breadth-first order
// ============================================================================

#[test]
fn test_and_visits_both_sides_before_their_operands() {
    let constraint = And::new(
        Comparison::new(property("a", "x"), Operator::EqualTo, Value::Long(1)),
        Between::inclusive(NodeDepth::new(name("a")), Value::Long(1), Value::Long(3)),
    );
    assert_eq!(
        kinds(&constraint),
        [
            "And",
            "Comparison",
            "Between",
            "PropertyValue",
            "Literal",
            "NodeDepth",
            "Literal",
            "Literal",
        ]
    );
}

#[test]
fn test_query_children_in_order() {
    let query = Query::new(Join::new(
        NamedSelector::with_alias(name("nt:file"), name("f")),
        JoinType::Inner,
        NamedSelector::new(name("r")),
        EquiJoinCondition::new(name("f"), "id", name("r"), "file").unwrap(),
    ))
    .with_columns(vec![Column::property(name("f"), "title").unwrap()])
    .constrained_by(Or::new(
        Not::new(PropertyExistence::new(name("f"), "draft").unwrap()),
        FullTextSearch::on_selector(name("f"), "report").unwrap(),
    ))
    .with_orderings(vec![Ordering::descending(Length::new(property("f", "title")))])
    .with_limit(10);

    assert_eq!(
        kinds(&query),
        [
            "Query",
            "Join",
            "Column",
            "Or",
            "Ordering",
            "NamedSelector",
            "EquiJoinCondition",
            "NamedSelector",
            "Not",
            "FullTextSearch",
            "Length",
            "PropertyExistence",
        ]
    );
}

#[test]
fn test_limit_is_not_walked_from_a_query() {
    let query = Query::new(AllNodes::new()).with_limit(1);
    assert_eq!(kinds(&query), ["Query", "AllNodes"]);
    assert_eq!(kinds(&Limit::new(1, 0)), ["Limit"]);
}

#[test]
fn test_set_criteria_and_function_operands() {
    let criteria = SetCriteria::new(
        UpperCase::new(LowerCase::new(NodeName::new(name("a")))),
        [
            StaticOperand::from(Value::from("x")),
            StaticOperand::from(BindVariableName::new("v").unwrap()),
        ],
    )
    .unwrap();
    assert_eq!(
        kinds(&criteria),
        [
            "SetCriteria",
            "UpperCase",
            "Literal",
            "BindVariableName",
            "LowerCase",
            "NodeName",
        ]
    );
}

#[test]
fn test_arithmetic_operands() {
    let ordering = Ordering::ascending(ArithmeticOperand::new(
        FullTextSearchScore::new(name("a")),
        ArithmeticOperator::Add,
        ArithmeticOperand::new(
            NodePath::new(name("a")),
            ArithmeticOperator::Divide,
            NodeLocalName::new(name("a")),
        ),
    ));
    assert_eq!(
        kinds(&ordering),
        [
            "Ordering",
            "ArithmeticOperand",
            "FullTextSearchScore",
            "ArithmeticOperand",
            "NodePath",
            "NodeLocalName",
        ]
    );
}

#[test]
fn test_join_conditions_and_path_constraints_are_leaves() {
    let join = Join::new(
        Join::new(
            NamedSelector::new(name("a")),
            JoinType::LeftOuter,
            NamedSelector::new(name("b")),
            ChildNodeJoinCondition::new(name("a"), name("b")),
        ),
        JoinType::Cross,
        AllNodes::with_alias(name("c")),
        SameNodeJoinCondition::new(name("b"), name("c")),
    );
    assert_eq!(
        kinds(&join),
        [
            "Join",
            "Join",
            "SameNodeJoinCondition",
            "AllNodes",
            "NamedSelector",
            "ChildNodeJoinCondition",
            "NamedSelector",
        ]
    );

    let descendant = DescendantNodeJoinCondition::new(name("a"), name("b"));
    assert_eq!(kinds(&descendant), ["DescendantNodeJoinCondition"]);

    let paths = And::new(
        ChildNode::new(name("a"), "/x").unwrap(),
        Or::new(
            DescendantNode::new(name("a"), "/y").unwrap(),
            SameNode::new(name("a"), "/z").unwrap(),
        ),
    );
    assert_eq!(
        kinds(&paths),
        ["And", "ChildNode", "Or", "DescendantNode", "SameNode"]
    );
}

#[test]
fn test_reference_value_is_a_leaf() {
    let comparison = Comparison::new(
        ReferenceValue::with_property(name("a"), "ref").unwrap(),
        Operator::EqualTo,
        Value::Reference("id".to_string()),
    );
    assert_eq!(kinds(&comparison), ["Comparison", "ReferenceValue", "Literal"]);
}

// ============================================================================
// Set queries and subqueries
// ============================================================================

fn subquery_comparison() -> Comparison {
    let inner = Query::new(NamedSelector::new(name("b")))
        .with_columns(vec![Column::property(name("b"), "id").unwrap()]);
    Comparison::new(property("a", "ref"), Operator::EqualTo, Subquery::new(inner))
}

#[test]
fn test_set_query_visits_left_then_right() {
    let left = Query::new(NamedSelector::new(name("a")));
    let right = Query::new(NamedSelector::new(name("b")));
    let union = SetQuery::new(left, SetOperation::Union, right, false).unwrap();
    assert_eq!(
        kinds(&union),
        ["SetQuery", "Query", "Query", "NamedSelector", "NamedSelector"]
    );
}

#[test]
fn test_subquery_bodies_are_walked_by_default() {
    let comparison = subquery_comparison();
    assert_eq!(
        kinds(&comparison),
        [
            "Comparison",
            "PropertyValue",
            "Subquery",
            "Query",
            "NamedSelector",
            "Column",
        ]
    );
}

#[test]
fn test_skipping_subqueries_stops_at_the_subquery() {
    let comparison = subquery_comparison();
    let recorder = Navigator::new(Recorder::default())
        .skipping_subqueries()
        .walk(&comparison);
    assert_eq!(recorder.0, ["Comparison", "PropertyValue", "Subquery"]);
}

#[test]
fn test_strategy_sees_each_node_once() {
    let comparison = subquery_comparison();
    let first = kinds(&comparison);
    let second = kinds(&comparison);
    assert_eq!(first, second);
    assert_eq!(first.iter().filter(|kind| **kind == "Subquery").count(), 1);
}
