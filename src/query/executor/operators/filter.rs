// Filter Operator Implementation
//
// Passes through tuples whose predicate evaluates to boolean true.

use crate::catalog::Schema;
use crate::query::executor::operators::Operator;
use crate::query::executor::result::{QueryError, QueryResult, Tuple};
use crate::query::expression::Expression;

/// Filter operator that drops tuples failing a predicate. The schema is
/// unchanged from the input's.
pub struct FilterOperator {
    input: Box<dyn Operator>,
    predicate: Expression,
}

impl FilterOperator {
    /// Create a new filter operator
    pub fn new(input: Box<dyn Operator>, predicate: Expression) -> Self {
        FilterOperator { input, predicate }
    }
}

impl Operator for FilterOperator {
    fn open(&mut self) -> QueryResult<()> {
        self.input.open()
    }

    fn next(&mut self) -> QueryResult<Option<Tuple>> {
        while let Some(tuple) = self.input.next()? {
            let result = self.predicate.evaluate(&tuple, self.input.schema())?;
            match result.as_bool() {
                Some(true) => return Ok(Some(tuple)),
                Some(false) => {}
                None => {
                    return Err(QueryError::TypeError(format!(
                        "filter predicate evaluated to non-boolean {:?}",
                        result
                    )))
                }
            }
        }
        Ok(None)
    }

    fn close(&mut self) -> QueryResult<()> {
        self.input.close()
    }

    fn schema(&self) -> &Schema {
        self.input.schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;
    use crate::query::executor::operators::join::tests::MockOperator;
    use crate::query::executor::result::Value;
    use crate::query::expression::BinaryOperator;

    fn people() -> MockOperator {
        let mut schema = Schema::new();
        schema.add_column("id", DataType::Integer);
        schema.add_column("age", DataType::Integer);
        MockOperator::new(
            schema,
            vec![
                vec![Value::Integer(1), Value::Integer(25)],
                vec![Value::Integer(2), Value::Integer(30)],
                vec![Value::Integer(3), Value::Integer(35)],
                vec![Value::Integer(4), Value::Integer(40)],
            ],
        )
    }

    fn age_over(limit: i32) -> Expression {
        Expression::BinaryOp {
            op: BinaryOperator::Gt,
            left: Box::new(Expression::Column("age".to_string())),
            right: Box::new(Expression::Literal(Value::Integer(limit))),
        }
    }

    #[test]
    fn test_filter_keeps_matching_tuples_in_order() {
        let mut filter = FilterOperator::new(Box::new(people()), age_over(30));
        filter.open().unwrap();

        let row1 = filter.next().unwrap().unwrap();
        assert_eq!(row1[0], Value::Integer(3));
        let row2 = filter.next().unwrap().unwrap();
        assert_eq!(row2[0], Value::Integer(4));
        assert!(filter.next().unwrap().is_none());
        // End-of-stream is sticky
        assert!(filter.next().unwrap().is_none());

        filter.close().unwrap();
    }

    #[test]
    fn test_filter_rejects_non_boolean_predicate() {
        let predicate = Expression::BinaryOp {
            op: BinaryOperator::Add,
            left: Box::new(Expression::Column("age".to_string())),
            right: Box::new(Expression::Literal(Value::Integer(1))),
        };
        let mut filter = FilterOperator::new(Box::new(people()), predicate);
        filter.open().unwrap();
        assert!(matches!(filter.next(), Err(QueryError::TypeError(_))));
    }

    #[test]
    fn test_filter_schema_is_the_inputs() {
        let filter = FilterOperator::new(Box::new(people()), age_over(0));
        assert_eq!(filter.schema().columns()[1].name, "age");
    }
}
