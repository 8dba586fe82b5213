// Join Operators Module
//
// Inner-join operators over two child inputs. Every join's output schema is
// the left schema's columns followed by the right schema's.

pub mod block_nested_loop;
pub mod hash_join;
pub mod nested_loop;

// Re-export public components
pub use self::block_nested_loop::BlockNestedLoopJoinOperator;
pub use self::hash_join::HashJoinOperator;
pub use self::nested_loop::NestedLoopJoinOperator;

use crate::query::executor::result::{QueryError, QueryResult, Tuple, Value};

/// Concatenate a left and a right tuple into one combined tuple
pub(crate) fn combine(left: &Tuple, right: &Tuple) -> Tuple {
    let mut combined = Tuple::with_capacity(left.len() + right.len());
    combined.extend_from_slice(left);
    combined.extend_from_slice(right);
    combined
}

/// A join condition must come out boolean
pub(crate) fn condition_holds(value: Value) -> QueryResult<bool> {
    value.as_bool().ok_or_else(|| {
        QueryError::TypeError(format!(
            "join condition evaluated to non-boolean {:?}",
            value
        ))
    })
}

#[cfg(test)]
pub mod tests {
    use crate::catalog::{DataType, Schema};
    use crate::query::executor::operators::Operator;
    use crate::query::executor::result::{QueryResult, Tuple, Value};
    use crate::query::expression::{BinaryOperator, Expression};

    /// In-memory operator used as a join input in tests
    pub struct MockOperator {
        schema: Schema,
        rows: Vec<Tuple>,
        index: usize,
    }

    impl MockOperator {
        pub fn new(schema: Schema, rows: Vec<Tuple>) -> Self {
            MockOperator {
                schema,
                rows,
                index: 0,
            }
        }
    }

    impl Operator for MockOperator {
        fn open(&mut self) -> QueryResult<()> {
            self.index = 0;
            Ok(())
        }

        fn next(&mut self) -> QueryResult<Option<Tuple>> {
            if self.index < self.rows.len() {
                let row = self.rows[self.index].clone();
                self.index += 1;
                Ok(Some(row))
            } else {
                Ok(None)
            }
        }

        fn close(&mut self) -> QueryResult<()> {
            Ok(())
        }

        fn schema(&self) -> &Schema {
            &self.schema
        }
    }

    pub fn customers() -> MockOperator {
        let mut schema = Schema::new();
        schema.add_column("c.custkey", DataType::Integer);
        schema.add_column("c.name", DataType::Text);
        MockOperator::new(
            schema,
            vec![
                vec![Value::Integer(1), Value::Text("Alice".to_string())],
                vec![Value::Integer(2), Value::Text("Bob".to_string())],
            ],
        )
    }

    pub fn orders() -> MockOperator {
        let mut schema = Schema::new();
        schema.add_column("o.orderkey", DataType::Integer);
        schema.add_column("o.custkey", DataType::Integer);
        MockOperator::new(
            schema,
            vec![
                vec![Value::Integer(10), Value::Integer(1)],
                vec![Value::Integer(11), Value::Integer(1)],
                vec![Value::Integer(12), Value::Integer(2)],
            ],
        )
    }

    /// `EQ(left_col, right_col)` join condition
    pub fn eq_columns(left_col: &str, right_col: &str) -> Expression {
        Expression::BinaryOp {
            op: BinaryOperator::Eq,
            left: Box::new(Expression::Column(left_col.to_string())),
            right: Box::new(Expression::Column(right_col.to_string())),
        }
    }

    pub fn drain(op: &mut dyn Operator) -> Vec<Tuple> {
        let mut rows = Vec::new();
        while let Some(tuple) = op.next().unwrap() {
            rows.push(tuple);
        }
        rows
    }

    /// The three customer-order matches in (customer, order) order
    pub fn expected_join_rows() -> Vec<Tuple> {
        vec![
            vec![
                Value::Integer(1),
                Value::Text("Alice".to_string()),
                Value::Integer(10),
                Value::Integer(1),
            ],
            vec![
                Value::Integer(1),
                Value::Text("Alice".to_string()),
                Value::Integer(11),
                Value::Integer(1),
            ],
            vec![
                Value::Integer(2),
                Value::Text("Bob".to_string()),
                Value::Integer(12),
                Value::Integer(2),
            ],
        ]
    }
}
