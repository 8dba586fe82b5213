// Physical Query Plan Representation
//
// This module defines the physical plan tree and parses it out of the
// structured plan document the engine is handed.

use serde_json::Value as JsonValue;

use crate::query::executor::operators::project::ProjectionExpr;
use crate::query::executor::result::{QueryError, QueryResult, Value};
use crate::query::expression::{BinaryOperator, Expression};

/// Join algorithm selected by the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMethod {
    NestedLoop,
    BlockNestedLoop,
    Hash,
}

impl JoinMethod {
    fn parse(token: &str) -> QueryResult<Self> {
        match token {
            "nested_loop" => Ok(JoinMethod::NestedLoop),
            "block_nested_loop" => Ok(JoinMethod::BlockNestedLoop),
            "hash" => Ok(JoinMethod::Hash),
            other => Err(QueryError::PlanError(format!(
                "unknown join method '{}'",
                other
            ))),
        }
    }
}

/// Represents a node in the physical query plan
#[derive(Debug, Clone)]
pub enum PhysicalPlan {
    /// Table scan over one data file
    TableScan {
        /// Data file name relative to the data directory
        table: String,
        /// Alias qualifying the scan's output columns
        alias: String,
    },
    /// Filter operator (selection)
    Filter {
        input: Box<PhysicalPlan>,
        predicate: Expression,
    },
    /// Projection operator
    Project {
        input: Box<PhysicalPlan>,
        expressions: Vec<ProjectionExpr>,
    },
    /// Limit operator
    Limit {
        input: Box<PhysicalPlan>,
        limit: usize,
    },
    /// Inner join of two inputs
    Join {
        left: Box<PhysicalPlan>,
        right: Box<PhysicalPlan>,
        condition: Expression,
        method: JoinMethod,
    },
}

fn field<'a>(node: &'a JsonValue, name: &str) -> QueryResult<&'a JsonValue> {
    node.get(name).ok_or_else(|| {
        QueryError::PlanError(format!("plan node is missing the \"{}\" field", name))
    })
}

fn string_field(node: &JsonValue, name: &str) -> QueryResult<String> {
    field(node, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| QueryError::PlanError(format!("field \"{}\" must be a string", name)))
}

impl PhysicalPlan {
    /// Parse a plan document node, recursively parsing its inputs
    pub fn from_json(node: &JsonValue) -> QueryResult<Self> {
        let op = node
            .get("op")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| {
                QueryError::PlanError("plan node is missing an \"op\" discriminator".to_string())
            })?;

        match op {
            "Scan" => Ok(PhysicalPlan::TableScan {
                table: string_field(node, "table")?,
                alias: string_field(node, "as")?,
            }),
            "Select" => Ok(PhysicalPlan::Filter {
                input: Box::new(Self::from_json(field(node, "input")?)?),
                predicate: parse_expression(field(node, "predicate")?)?,
            }),
            "Project" => {
                let input = Box::new(Self::from_json(field(node, "input")?)?);
                let items = field(node, "exprs")?.as_array().ok_or_else(|| {
                    QueryError::PlanError("Project \"exprs\" must be an array".to_string())
                })?;
                let mut expressions = Vec::with_capacity(items.len());
                for item in items {
                    expressions.push(ProjectionExpr {
                        alias: string_field(item, "as")?,
                        expr: parse_expression(field(item, "expr")?)?,
                    });
                }
                Ok(PhysicalPlan::Project { input, expressions })
            }
            "Limit" => {
                let input = Box::new(Self::from_json(field(node, "input")?)?);
                let limit = field(node, "limit")?.as_u64().ok_or_else(|| {
                    QueryError::PlanError(
                        "Limit \"limit\" must be a non-negative integer".to_string(),
                    )
                })? as usize;
                Ok(PhysicalPlan::Limit { input, limit })
            }
            "Join" => {
                let left = Box::new(Self::from_json(field(node, "left")?)?);
                let right = Box::new(Self::from_json(field(node, "right")?)?);
                let condition = parse_expression(field(node, "condition")?)?;
                let method = match node.get("method") {
                    Some(m) => {
                        let token = m.as_str().ok_or_else(|| {
                            QueryError::PlanError("join \"method\" must be a string".to_string())
                        })?;
                        JoinMethod::parse(token)?
                    }
                    None => JoinMethod::NestedLoop,
                };
                Ok(PhysicalPlan::Join {
                    left,
                    right,
                    condition,
                    method,
                })
            }
            other => Err(QueryError::UnsupportedOperator(other.to_string())),
        }
    }
}

/// Parse an expression node: `{const, type}`, `{col}`, `{op, left, right}`,
/// or `{op: "NOT", expr}`.
pub fn parse_expression(node: &JsonValue) -> QueryResult<Expression> {
    if let Some(constant) = node.get("const") {
        let type_name = string_field(node, "type")?;
        let value = match type_name.as_str() {
            "int" => constant.as_i64().map(|i| Value::Integer(i as i32)),
            "float" => constant.as_f64().map(|f| Value::Float(f as f32)),
            "string" => constant.as_str().map(|s| Value::Text(s.to_string())),
            "bool" => constant.as_bool().map(Value::Boolean),
            other => {
                return Err(QueryError::PlanError(format!(
                    "unknown constant type '{}'",
                    other
                )))
            }
        }
        .ok_or_else(|| {
            QueryError::PlanError(format!(
                "constant {} does not match its declared type '{}'",
                constant, type_name
            ))
        })?;
        return Ok(Expression::Literal(value));
    }

    if let Some(col) = node.get("col") {
        let name = col.as_str().ok_or_else(|| {
            QueryError::PlanError("column reference \"col\" must be a string".to_string())
        })?;
        return Ok(Expression::Column(name.to_string()));
    }

    if let Some(op) = node.get("op") {
        let token = op.as_str().ok_or_else(|| {
            QueryError::PlanError("expression \"op\" must be a string".to_string())
        })?;
        if token == "NOT" {
            let inner = parse_expression(field(node, "expr")?)?;
            return Ok(Expression::Not(Box::new(inner)));
        }
        let operator = BinaryOperator::parse(token)?;
        let left = parse_expression(field(node, "left")?)?;
        let right = parse_expression(field(node, "right")?)?;
        return Ok(Expression::BinaryOp {
            op: operator,
            left: Box::new(left),
            right: Box::new(right),
        });
    }

    Err(QueryError::PlanError(format!(
        "unrecognized expression node: {}",
        node
    )))
}
