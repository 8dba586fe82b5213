// Projection Operator Implementation
//
// Transforms each input tuple by evaluating a list of aliased expressions.

use crate::catalog::{DataType, Schema};
use crate::query::executor::operators::Operator;
use crate::query::executor::result::{QueryError, QueryResult, Tuple};
use crate::query::expression::Expression;

/// An output expression together with its output column alias
#[derive(Debug, Clone)]
pub struct ProjectionExpr {
    pub alias: String,
    pub expr: Expression,
}

/// Projection operator; defines a new schema with one column per expression.
pub struct ProjectOperator {
    input: Box<dyn Operator>,
    expressions: Vec<ProjectionExpr>,
    schema: Schema,
}

impl ProjectOperator {
    /// Create a projection over `input`. Fails when an expression references
    /// a column the input schema does not carry.
    pub fn new(input: Box<dyn Operator>, expressions: Vec<ProjectionExpr>) -> QueryResult<Self> {
        let mut schema = Schema::new();
        for p in &expressions {
            let data_type = infer_output_type(&p.expr, input.schema())?;
            schema.add_column(&p.alias, data_type);
        }
        Ok(ProjectOperator {
            input,
            expressions,
            schema,
        })
    }
}

/// Derive the output column type of a projection expression. Arithmetic
/// always produces Float; comparisons and NOT produce Boolean; column
/// references keep the referenced column's type.
fn infer_output_type(expr: &Expression, input: &Schema) -> QueryResult<DataType> {
    match expr {
        Expression::Literal(value) => Ok(value.data_type()),
        Expression::Column(name) => input
            .column(name)
            .map(|c| c.data_type)
            .ok_or_else(|| QueryError::ColumnNotFound(name.clone())),
        Expression::BinaryOp { op, .. } => {
            if op.is_arithmetic() {
                Ok(DataType::Float)
            } else {
                Ok(DataType::Boolean)
            }
        }
        Expression::Not(_) => Ok(DataType::Boolean),
    }
}

impl Operator for ProjectOperator {
    fn open(&mut self) -> QueryResult<()> {
        self.input.open()
    }

    fn next(&mut self) -> QueryResult<Option<Tuple>> {
        match self.input.next()? {
            Some(tuple) => {
                let mut out = Tuple::with_capacity(self.expressions.len());
                for p in &self.expressions {
                    out.push(p.expr.evaluate(&tuple, self.input.schema())?);
                }
                Ok(Some(out))
            }
            None => Ok(None),
        }
    }

    fn close(&mut self) -> QueryResult<()> {
        self.input.close()
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::executor::operators::join::tests::MockOperator;
    use crate::query::executor::result::Value;
    use crate::query::expression::BinaryOperator;

    fn customers() -> MockOperator {
        let mut schema = Schema::new();
        schema.add_column("c.custkey", DataType::Integer);
        schema.add_column("c.name", DataType::Text);
        schema.add_column("c.balance", DataType::Float);
        MockOperator::new(
            schema,
            vec![
                vec![
                    Value::Integer(1),
                    Value::Text("Alice".to_string()),
                    Value::Float(100.0),
                ],
                vec![
                    Value::Integer(2),
                    Value::Text("Bob".to_string()),
                    Value::Float(250.5),
                ],
            ],
        )
    }

    fn proj(alias: &str, expr: Expression) -> ProjectionExpr {
        ProjectionExpr {
            alias: alias.to_string(),
            expr,
        }
    }

    #[test]
    fn test_project_evaluates_in_expression_order() {
        let exprs = vec![
            proj("n", Expression::Column("c.name".to_string())),
            proj(
                "double_balance",
                Expression::BinaryOp {
                    op: BinaryOperator::Mul,
                    left: Box::new(Expression::Column("c.balance".to_string())),
                    right: Box::new(Expression::Literal(Value::Integer(2))),
                },
            ),
        ];
        let mut project = ProjectOperator::new(Box::new(customers()), exprs).unwrap();
        project.open().unwrap();

        let row = project.next().unwrap().unwrap();
        assert_eq!(
            row,
            vec![Value::Text("Alice".to_string()), Value::Float(200.0)]
        );
        project.close().unwrap();
    }

    #[test]
    fn test_project_schema_types() {
        let exprs = vec![
            proj("n", Expression::Column("c.name".to_string())),
            proj(
                "sum",
                Expression::BinaryOp {
                    op: BinaryOperator::Add,
                    left: Box::new(Expression::Column("c.balance".to_string())),
                    right: Box::new(Expression::Literal(Value::Integer(1))),
                },
            ),
            proj(
                "rich",
                Expression::BinaryOp {
                    op: BinaryOperator::Gt,
                    left: Box::new(Expression::Column("c.balance".to_string())),
                    right: Box::new(Expression::Literal(Value::Float(150.0))),
                },
            ),
            proj("tag", Expression::Literal(Value::Integer(7))),
        ];
        let project = ProjectOperator::new(Box::new(customers()), exprs).unwrap();

        let columns = project.schema().columns();
        // Column reference keeps the scanned column's type
        assert_eq!(columns[0].data_type, DataType::Text);
        // Arithmetic always comes out as Float
        assert_eq!(columns[1].data_type, DataType::Float);
        assert_eq!(columns[2].data_type, DataType::Boolean);
        assert_eq!(columns[3].data_type, DataType::Integer);
        assert_eq!(columns[2].name, "rich");
    }

    #[test]
    fn test_project_unknown_column_fails_at_construction() {
        let exprs = vec![proj("x", Expression::Column("c.missing".to_string()))];
        assert!(matches!(
            ProjectOperator::new(Box::new(customers()), exprs),
            Err(QueryError::ColumnNotFound(_))
        ));
    }
}
