// Expression Evaluation
//
// Expression trees are built once by the plan translator, owned by the
// operator that references them, and evaluated per tuple with schema-driven
// column resolution.

use std::collections::HashSet;
use std::fmt;

use crate::catalog::Schema;
use crate::query::executor::result::{QueryError, QueryResult, Tuple, Value};

/// Binary operators accepted in plan expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
}

impl BinaryOperator {
    /// Parse a plan-document operator token
    pub fn parse(token: &str) -> QueryResult<Self> {
        match token {
            "ADD" => Ok(BinaryOperator::Add),
            "SUB" => Ok(BinaryOperator::Sub),
            "MUL" => Ok(BinaryOperator::Mul),
            "DIV" => Ok(BinaryOperator::Div),
            "EQ" => Ok(BinaryOperator::Eq),
            "NEQ" => Ok(BinaryOperator::NotEq),
            "GT" => Ok(BinaryOperator::Gt),
            "GTE" => Ok(BinaryOperator::GtEq),
            "LT" => Ok(BinaryOperator::Lt),
            "LTE" => Ok(BinaryOperator::LtEq),
            other => Err(QueryError::UnsupportedOperator(other.to_string())),
        }
    }

    /// Whether this operator computes a numeric result
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div
        )
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            BinaryOperator::Add => "ADD",
            BinaryOperator::Sub => "SUB",
            BinaryOperator::Mul => "MUL",
            BinaryOperator::Div => "DIV",
            BinaryOperator::Eq => "EQ",
            BinaryOperator::NotEq => "NEQ",
            BinaryOperator::Gt => "GT",
            BinaryOperator::GtEq => "GTE",
            BinaryOperator::Lt => "LT",
            BinaryOperator::LtEq => "LTE",
        };
        write!(f, "{}", token)
    }
}

/// A node in an expression tree
#[derive(Debug, Clone)]
pub enum Expression {
    /// A literal value; evaluation ignores the tuple and schema
    Literal(Value),
    /// A reference to a column by (possibly alias-qualified) name
    Column(String),
    /// A binary arithmetic or comparison operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Logical negation of a boolean subexpression
    Not(Box<Expression>),
}

impl Expression {
    /// Evaluate this expression against one tuple, resolving column
    /// references through the given schema.
    pub fn evaluate(&self, tuple: &Tuple, schema: &Schema) -> QueryResult<Value> {
        match self {
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Column(name) => {
                let column = schema
                    .column(name)
                    .ok_or_else(|| QueryError::ColumnNotFound(name.clone()))?;
                tuple.get(column.index).cloned().ok_or_else(|| {
                    QueryError::TypeError(format!(
                        "tuple has no value at index {} for column {}",
                        column.index, name
                    ))
                })
            }
            Expression::BinaryOp { op, left, right } => {
                // Both sides always evaluate, left first; no short-circuit
                let left_val = left.evaluate(tuple, schema)?;
                let right_val = right.evaluate(tuple, schema)?;
                evaluate_binary(*op, left_val, right_val)
            }
            Expression::Not(inner) => {
                let value = inner.evaluate(tuple, schema)?;
                match value.as_bool() {
                    Some(b) => Ok(Value::Boolean(!b)),
                    None => Err(QueryError::TypeError(format!(
                        "NOT applied to non-boolean value {:?}",
                        value
                    ))),
                }
            }
        }
    }

    /// Collect the set of column names referenced in this subtree
    pub fn column_refs(&self) -> HashSet<String> {
        let mut refs = HashSet::new();
        self.collect_column_refs(&mut refs);
        refs
    }

    fn collect_column_refs(&self, refs: &mut HashSet<String>) {
        match self {
            Expression::Literal(_) => {}
            Expression::Column(name) => {
                refs.insert(name.clone());
            }
            Expression::BinaryOp { left, right, .. } => {
                left.collect_column_refs(refs);
                right.collect_column_refs(refs);
            }
            Expression::Not(inner) => inner.collect_column_refs(refs),
        }
    }
}

fn numeric_operands(op: BinaryOperator, left: &Value, right: &Value) -> QueryResult<(f64, f64)> {
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(QueryError::TypeError(format!(
            "{} requires numeric operands, got {:?} and {:?}",
            op, left, right
        ))),
    }
}

fn evaluate_binary(op: BinaryOperator, left: Value, right: Value) -> QueryResult<Value> {
    match op {
        // Arithmetic computes in double precision and narrows to float
        BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul => {
            let (l, r) = numeric_operands(op, &left, &right)?;
            let result = match op {
                BinaryOperator::Add => l + r,
                BinaryOperator::Sub => l - r,
                _ => l * r,
            };
            Ok(Value::Float(result as f32))
        }
        BinaryOperator::Div => {
            let (l, r) = numeric_operands(op, &left, &right)?;
            if r == 0.0 {
                return Err(QueryError::DivideByZero);
            }
            Ok(Value::Float((l / r) as f32))
        }
        // Equality compares by value within a single variant only
        BinaryOperator::Eq | BinaryOperator::NotEq => {
            if left.data_type() != right.data_type() {
                return Err(QueryError::TypeError(format!(
                    "{} across value types {:?} and {:?}",
                    op, left, right
                )));
            }
            let equal = left == right;
            Ok(Value::Boolean(if op == BinaryOperator::Eq {
                equal
            } else {
                !equal
            }))
        }
        BinaryOperator::Gt | BinaryOperator::GtEq | BinaryOperator::Lt | BinaryOperator::LtEq => {
            let (l, r) = numeric_operands(op, &left, &right)?;
            let result = match op {
                BinaryOperator::Gt => l > r,
                BinaryOperator::GtEq => l >= r,
                BinaryOperator::Lt => l < r,
                _ => l <= r,
            };
            Ok(Value::Boolean(result))
        }
    }
}
