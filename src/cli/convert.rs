//! JSON <-> query tree conversion
//!
//! Every JSON object carries a `type` tag naming its node kind. Nodes are
//! built through their validating constructors, so a decoded tree obeys the
//! same rules as one built in code.
//!
//! ```text
//! {"type": "query",
//!  "source": {"type": "selector", "name": "nt:file", "alias": "f"},
//!  "columns": [{"type": "column", "selector": "f", "property": "title"}],
//!  "where": {"type": "comparison",
//!            "operand": {"type": "propertyValue", "selector": "f", "property": "size"},
//!            "operator": ">",
//!            "value": {"type": "literal", "value": 1024}},
//!  "limit": 10}
//! ```

use serde_json::{Map, Value as Json, json};

use super::ConvertError;
use crate::{
    ast::{
        AllNodes, And, ArithmeticOperand, ArithmeticOperator, Between, BindVariableName,
        ChildNode, ChildNodeJoinCondition, Column, Comparison, Constraint, DescendantNode,
        DescendantNodeJoinCondition, DynamicOperand, EquiJoinCondition, FullTextSearch,
        FullTextSearchScore, Join, JoinCondition, JoinType, Length, Limit, Literal, LowerCase,
        NamedSelector, NodeDepth, NodeLocalName, NodeName, NodePath, Not, Operator, Or, Order,
        Ordering, PropertyExistence, PropertyValue, Query, QueryCommand, ReferenceValue,
        SameNode, SameNodeJoinCondition, SelectorName, SetCriteria, SetOperation, SetQuery,
        Source, StaticOperand, Subquery, Term, UpperCase,
    },
    types::{self, TypeSystem},
    value::Value,
    visitor::{Node, Visitable},
};

type Object = Map<String, Json>;

/// A decoded tree of any family.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    Command(QueryCommand),
    Source(Source),
    JoinCondition(JoinCondition),
    Constraint(Constraint),
    Dynamic(DynamicOperand),
    Static(StaticOperand),
    Column(Column),
    Ordering(Ordering),
}

impl Visitable for Tree {
    fn as_node(&self) -> Node<'_> {
        match self {
            Tree::Command(node) => node.as_node(),
            Tree::Source(node) => node.as_node(),
            Tree::JoinCondition(node) => node.as_node(),
            Tree::Constraint(node) => node.as_node(),
            Tree::Dynamic(node) => node.as_node(),
            Tree::Static(node) => node.as_node(),
            Tree::Column(node) => node.as_node(),
            Tree::Ordering(node) => node.as_node(),
        }
    }
}

impl<'a> From<&'a Tree> for Node<'a> {
    fn from(tree: &'a Tree) -> Self {
        tree.as_node()
    }
}

/// Decode a tree of any family using the standard type system.
pub fn decode(json: &Json) -> Result<Tree, ConvertError> {
    Decoder::new().tree(json)
}

/// Builds query trees from JSON, resolving typed literals through a [`TypeSystem`].
pub struct Decoder<'t> {
    types: &'t dyn TypeSystem,
}

impl Decoder<'static> {
    pub fn new() -> Self {
        Decoder::with_types(types::standard())
    }
}

impl Default for Decoder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t> Decoder<'t> {
    pub fn with_types(types: &'t dyn TypeSystem) -> Self {
        Decoder { types }
    }

    pub fn tree(&self, json: &Json) -> Result<Tree, ConvertError> {
        let kind = kind(object(json, "node")?)?;
        Ok(match kind {
            "query" | "setQuery" => Tree::Command(self.query_command(json)?),
            "selector" | "allNodes" | "join" => Tree::Source(self.source(json)?),
            "equiJoin" | "childNodeJoin" | "descendantNodeJoin" | "sameNodeJoin" => {
                Tree::JoinCondition(self.join_condition(json)?)
            }
            "and" | "or" | "not" | "comparison" | "between" | "propertyExistence" | "in"
            | "contains" | "childNode" | "descendantNode" | "sameNode" => {
                Tree::Constraint(self.constraint(json)?)
            }
            "propertyValue" | "referenceValue" | "length" | "lower" | "upper" | "depth"
            | "path" | "name" | "localName" | "score" | "arithmetic" => {
                Tree::Dynamic(self.dynamic_operand(json)?)
            }
            "literal" | "variable" | "subquery" => Tree::Static(self.static_operand(json)?),
            "column" => Tree::Column(self.column(json)?),
            "ordering" => Tree::Ordering(self.ordering(json)?),
            other => return Err(unknown("node", other)),
        })
    }

    pub fn query_command(&self, json: &Json) -> Result<QueryCommand, ConvertError> {
        let obj = object(json, "query")?;
        match kind(obj)? {
            "query" => {
                let columns = list(obj, "columns")?
                    .iter()
                    .map(|column| self.column(column))
                    .collect::<Result<Vec<_>, _>>()?;
                let constraint = obj
                    .get("where")
                    .filter(|value| !value.is_null())
                    .map(|value| self.constraint(value))
                    .transpose()?;
                Ok(Query::from_parts(
                    self.source(field(obj, "source")?)?,
                    constraint,
                    self.orderings(obj)?,
                    columns,
                    limits(obj)?,
                    flag(obj, "distinct", false)?,
                )
                .into())
            }
            "setQuery" => {
                let operation = text(obj, "operation")?;
                let operation = SetOperation::for_symbol(operation)
                    .ok_or_else(|| invalid("operation", format!("unknown set operation '{operation}'")))?;
                let query = SetQuery::new(
                    self.query_command(field(obj, "left")?)?,
                    operation,
                    self.query_command(field(obj, "right")?)?,
                    flag(obj, "all", false)?,
                )?;
                let orderings = self.orderings(obj)?;
                Ok(query.with_orderings(orderings).with_limits(limits(obj)?).into())
            }
            other => Err(unknown("query", other)),
        }
    }

    pub fn source(&self, json: &Json) -> Result<Source, ConvertError> {
        let obj = object(json, "source")?;
        match kind(obj)? {
            "selector" => {
                let name = selector(obj, "name")?;
                Ok(match optional_selector(obj, "alias")? {
                    Some(alias) => NamedSelector::with_alias(name, alias),
                    None => NamedSelector::new(name),
                }
                .into())
            }
            "allNodes" => {
                let alias = optional_selector(obj, "alias")?;
                Ok(match (optional_selector(obj, "name")?, alias) {
                    (Some(name), alias) => AllNodes::named(name, alias),
                    (None, Some(alias)) => AllNodes::with_alias(alias),
                    (None, None) => AllNodes::new(),
                }
                .into())
            }
            "join" => {
                let join_type = text(obj, "joinType")?;
                let join_type = JoinType::for_symbol(join_type)
                    .ok_or_else(|| invalid("joinType", format!("unknown join type '{join_type}'")))?;
                Ok(Join::new(
                    self.source(field(obj, "left")?)?,
                    join_type,
                    self.source(field(obj, "right")?)?,
                    self.join_condition(field(obj, "condition")?)?,
                )
                .into())
            }
            other => Err(unknown("source", other)),
        }
    }

    pub fn join_condition(&self, json: &Json) -> Result<JoinCondition, ConvertError> {
        let obj = object(json, "condition")?;
        Ok(match kind(obj)? {
            "equiJoin" => EquiJoinCondition::new(
                selector(obj, "selector1")?,
                text(obj, "property1")?,
                selector(obj, "selector2")?,
                text(obj, "property2")?,
            )?
            .into(),
            "childNodeJoin" => {
                ChildNodeJoinCondition::new(selector(obj, "parent")?, selector(obj, "child")?).into()
            }
            "descendantNodeJoin" => DescendantNodeJoinCondition::new(
                selector(obj, "ancestor")?,
                selector(obj, "descendant")?,
            )
            .into(),
            "sameNodeJoin" => {
                let (first, second) = (selector(obj, "selector1")?, selector(obj, "selector2")?);
                match optional_text(obj, "path")? {
                    Some(path) => SameNodeJoinCondition::with_path(first, second, path)?,
                    None => SameNodeJoinCondition::new(first, second),
                }
                .into()
            }
            other => return Err(unknown("join condition", other)),
        })
    }

    pub fn constraint(&self, json: &Json) -> Result<Constraint, ConvertError> {
        let obj = object(json, "constraint")?;
        Ok(match kind(obj)? {
            "and" => And::new(
                self.constraint(field(obj, "left")?)?,
                self.constraint(field(obj, "right")?)?,
            )
            .into(),
            "or" => Or::new(
                self.constraint(field(obj, "left")?)?,
                self.constraint(field(obj, "right")?)?,
            )
            .into(),
            "not" => Not::new(self.constraint(field(obj, "constraint")?)?).into(),
            "comparison" => {
                let operator = text(obj, "operator")?;
                let operator = Operator::for_symbol(operator)
                    .ok_or_else(|| invalid("operator", format!("unknown operator '{operator}'")))?;
                Comparison::new(
                    self.dynamic_operand(field(obj, "operand")?)?,
                    operator,
                    self.static_operand(field(obj, "value")?)?,
                )
                .into()
            }
            "between" => Between::new(
                self.dynamic_operand(field(obj, "operand")?)?,
                self.static_operand(field(obj, "lower")?)?,
                self.static_operand(field(obj, "upper")?)?,
                flag(obj, "lowerInclusive", true)?,
                flag(obj, "upperInclusive", true)?,
            )
            .into(),
            "propertyExistence" => {
                PropertyExistence::new(selector(obj, "selector")?, text(obj, "property")?)?.into()
            }
            "in" => {
                let values = list(obj, "values")?
                    .iter()
                    .map(|value| self.static_operand(value))
                    .collect::<Result<Vec<_>, _>>()?;
                SetCriteria::new(self.dynamic_operand(field(obj, "operand")?)?, values)?.into()
            }
            "contains" => FullTextSearch::new(
                selector(obj, "selector")?,
                optional_text(obj, "property")?.map(str::to_string),
                text(obj, "expression")?,
            )?
            .into(),
            "childNode" => ChildNode::new(selector(obj, "selector")?, text(obj, "path")?)?.into(),
            "descendantNode" => {
                DescendantNode::new(selector(obj, "selector")?, text(obj, "path")?)?.into()
            }
            "sameNode" => SameNode::new(selector(obj, "selector")?, text(obj, "path")?)?.into(),
            other => return Err(unknown("constraint", other)),
        })
    }

    pub fn dynamic_operand(&self, json: &Json) -> Result<DynamicOperand, ConvertError> {
        let obj = object(json, "operand")?;
        Ok(match kind(obj)? {
            "propertyValue" => {
                PropertyValue::new(selector(obj, "selector")?, text(obj, "property")?)?.into()
            }
            "referenceValue" => {
                let name = selector(obj, "selector")?;
                match optional_text(obj, "property")? {
                    Some(property) => ReferenceValue::with_property(name, property)?,
                    None => ReferenceValue::new(name),
                }
                .into()
            }
            "length" => Length::new(PropertyValue::new(
                selector(obj, "selector")?,
                text(obj, "property")?,
            )?)
            .into(),
            "lower" => LowerCase::new(self.dynamic_operand(field(obj, "operand")?)?).into(),
            "upper" => UpperCase::new(self.dynamic_operand(field(obj, "operand")?)?).into(),
            "depth" => NodeDepth::new(selector(obj, "selector")?).into(),
            "path" => NodePath::new(selector(obj, "selector")?).into(),
            "name" => NodeName::new(selector(obj, "selector")?).into(),
            "localName" => NodeLocalName::new(selector(obj, "selector")?).into(),
            "score" => FullTextSearchScore::new(selector(obj, "selector")?).into(),
            "arithmetic" => {
                let operator = text(obj, "operator")?;
                let operator = ArithmeticOperator::for_symbol(operator)
                    .ok_or_else(|| invalid("operator", format!("unknown operator '{operator}'")))?;
                ArithmeticOperand::new(
                    self.dynamic_operand(field(obj, "left")?)?,
                    operator,
                    self.dynamic_operand(field(obj, "right")?)?,
                )
                .into()
            }
            other => return Err(unknown("dynamic operand", other)),
        })
    }

    pub fn static_operand(&self, json: &Json) -> Result<StaticOperand, ConvertError> {
        let obj = object(json, "value")?;
        Ok(match kind(obj)? {
            "literal" => Literal::new(self.literal(obj)?).into(),
            "variable" => BindVariableName::new(text(obj, "name")?)?.into(),
            "subquery" => Subquery::new(self.query_command(field(obj, "query")?)?).into(),
            other => return Err(unknown("static operand", other)),
        })
    }

    fn literal(&self, obj: &Object) -> Result<Value, ConvertError> {
        let value = field(obj, "value")?;
        if let Some(type_name) = optional_text(obj, "valueType")? {
            let text = match value {
                Json::String(text) => text.clone(),
                other => other.to_string(),
            };
            return Ok(self.types.parse(type_name, &text)?);
        }
        match value {
            Json::String(text) => Ok(Value::String(text.clone())),
            Json::Bool(flag) => Ok(Value::Boolean(*flag)),
            Json::Number(number) => match (number.as_i64(), number.as_f64()) {
                (Some(long), _) => Ok(Value::Long(long)),
                (None, Some(double)) => Ok(Value::Double(double)),
                (None, None) => Err(invalid("value", format!("unsupported number {number}"))),
            },
            other => Err(invalid("value", format!("expected a scalar, found {other}"))),
        }
    }

    pub fn column(&self, json: &Json) -> Result<Column, ConvertError> {
        let obj = object(json, "column")?;
        let name = selector(obj, "selector")?;
        Ok(match (optional_text(obj, "property")?, optional_text(obj, "as")?) {
            (None, _) => Column::all(name),
            (Some(property), None) => Column::property(name, property)?,
            (Some(property), Some(column)) => Column::new(name, property, column)?,
        })
    }

    pub fn ordering(&self, json: &Json) -> Result<Ordering, ConvertError> {
        let obj = object(json, "ordering")?;
        let order = match optional_text(obj, "order")? {
            Some(order) => Order::for_symbol(order)
                .ok_or_else(|| invalid("order", format!("unknown order '{order}'")))?,
            None => Order::default(),
        };
        Ok(Ordering::new(self.dynamic_operand(field(obj, "operand")?)?, order))
    }

    fn orderings(&self, obj: &Object) -> Result<Vec<Ordering>, ConvertError> {
        list(obj, "orderBy")?
            .iter()
            .map(|ordering| self.ordering(ordering))
            .collect()
    }
}

fn object<'j>(json: &'j Json, expected: &'static str) -> Result<&'j Object, ConvertError> {
    json.as_object()
        .ok_or_else(|| invalid(expected, format!("expected an object, found {json}")))
}

fn kind(obj: &Object) -> Result<&str, ConvertError> {
    obj.get("type")
        .and_then(Json::as_str)
        .ok_or_else(|| ConvertError::MissingField {
            kind: "node".to_string(),
            field: "type",
        })
}

fn field<'j>(obj: &'j Object, name: &'static str) -> Result<&'j Json, ConvertError> {
    obj.get(name)
        .filter(|value| !value.is_null())
        .ok_or_else(|| ConvertError::MissingField {
            kind: obj
                .get("type")
                .and_then(Json::as_str)
                .unwrap_or("node")
                .to_string(),
            field: name,
        })
}

fn text<'j>(obj: &'j Object, name: &'static str) -> Result<&'j str, ConvertError> {
    field(obj, name)?
        .as_str()
        .ok_or_else(|| invalid(name, "expected a string".to_string()))
}

fn optional_text<'j>(obj: &'j Object, name: &'static str) -> Result<Option<&'j str>, ConvertError> {
    match obj.get(name) {
        None | Some(Json::Null) => Ok(None),
        Some(Json::String(text)) => Ok(Some(text.as_str())),
        Some(_) => Err(invalid(name, "expected a string".to_string())),
    }
}

fn selector(obj: &Object, name: &'static str) -> Result<SelectorName, ConvertError> {
    Ok(SelectorName::new(text(obj, name)?)?)
}

fn optional_selector(obj: &Object, name: &'static str) -> Result<Option<SelectorName>, ConvertError> {
    optional_text(obj, name)?
        .map(SelectorName::new)
        .transpose()
        .map_err(ConvertError::from)
}

fn flag(obj: &Object, name: &'static str, default: bool) -> Result<bool, ConvertError> {
    match obj.get(name) {
        None | Some(Json::Null) => Ok(default),
        Some(Json::Bool(flag)) => Ok(*flag),
        Some(_) => Err(invalid(name, "expected a boolean".to_string())),
    }
}

fn list<'j>(obj: &'j Object, name: &'static str) -> Result<&'j [Json], ConvertError> {
    match obj.get(name) {
        None | Some(Json::Null) => Ok(&[][..]),
        Some(Json::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(invalid(name, "expected an array".to_string())),
    }
}

fn count(obj: &Object, name: &'static str) -> Result<Option<usize>, ConvertError> {
    match obj.get(name) {
        None | Some(Json::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid(name, "expected a non-negative integer".to_string())),
    }
}

fn limits(obj: &Object) -> Result<Limit, ConvertError> {
    let mut limits = Limit::NONE;
    if let Some(row_limit) = count(obj, "limit")? {
        limits = limits.with_row_limit(row_limit);
    }
    if let Some(offset) = count(obj, "offset")? {
        limits = limits.with_offset(offset);
    }
    Ok(limits)
}

fn invalid(field: &'static str, reason: String) -> ConvertError {
    ConvertError::InvalidField { field, reason }
}

fn unknown(family: &'static str, kind: &str) -> ConvertError {
    ConvertError::UnknownKind {
        family,
        kind: kind.to_string(),
    }
}

/// Convert a full-text term tree to JSON.
pub fn term_to_json(term: &Term) -> Json {
    match term {
        Term::Simple(simple) => json!({
            "type": "simple",
            "value": simple.value(),
            "quotingRequired": simple.is_quoting_required(),
            "wildcards": simple.contains_wildcards(),
        }),
        Term::Negation(negation) => json!({
            "type": "not",
            "term": term_to_json(negation.negated_term()),
        }),
        Term::Conjunction(conjunction) => json!({
            "type": "and",
            "terms": conjunction.iter().map(term_to_json).collect::<Vec<_>>(),
        }),
        Term::Disjunction(disjunction) => json!({
            "type": "or",
            "terms": disjunction.iter().map(term_to_json).collect::<Vec<_>>(),
        }),
    }
}
