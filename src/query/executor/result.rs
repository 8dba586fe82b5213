// Query Result Types
//
// This module defines the runtime value model for tuples flowing between
// operators, the error taxonomy for planning and execution, and result
// formatting.

use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::catalog::{DataType, Schema};

/// A single runtime value inside a tuple
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i32),
    Float(f32),
    Text(String),
    Boolean(bool),
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Variant discriminant first so values of different types never
        // land in the same hash-join bucket.
        match self {
            Value::Integer(i) => {
                0.hash(state);
                i.hash(state);
            }
            Value::Float(f) => {
                1.hash(state);
                f.to_bits().hash(state);
            }
            Value::Text(s) => {
                2.hash(state);
                s.hash(state);
            }
            Value::Boolean(b) => {
                3.hash(state);
                b.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Text(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl Value {
    /// The data type this value's variant corresponds to
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Float(_) => DataType::Float,
            Value::Text(_) => DataType::Text,
            Value::Boolean(_) => DataType::Boolean,
        }
    }

    /// Whether the value is an integer or a float
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Widen a numeric value to f64 for arithmetic and ordering
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f as f64),
            _ => None,
        }
    }

    /// Extract a boolean, if this is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// One row of operator output
pub type Tuple = Vec<Value>;

/// Errors raised during planning and execution
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("schema error: {0}")]
    SchemaError(String),
    #[error("plan error: {0}")]
    PlanError(String),
    #[error("type error: {0}")]
    TypeError(String),
    #[error("division by zero")]
    DivideByZero,
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Format one tuple with its schema's column names, one column per segment:
/// `name: value | name: value`. A tuple shorter than its schema (a short
/// data line) prints only the values it has.
pub fn format_tuple(tuple: &Tuple, schema: &Schema) -> String {
    let mut out = String::new();
    for (i, value) in tuple.iter().enumerate() {
        if i > 0 {
            out.push_str(" | ");
        }
        if let Some(col) = schema.columns().get(i) {
            out.push_str(&col.name);
            out.push_str(": ");
        }
        out.push_str(&value.to_string());
    }
    out
}
