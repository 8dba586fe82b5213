// Limit Operator Implementation
//
// Stops producing tuples after the configured count has been emitted.

use crate::catalog::Schema;
use crate::query::executor::operators::Operator;
use crate::query::executor::result::{QueryResult, Tuple};

/// Limit operator; once the limit is reached the child is no longer pulled.
pub struct LimitOperator {
    input: Box<dyn Operator>,
    limit: usize,
    count: usize,
}

impl LimitOperator {
    /// Create a new limit operator
    pub fn new(input: Box<dyn Operator>, limit: usize) -> Self {
        LimitOperator {
            input,
            limit,
            count: 0,
        }
    }
}

impl Operator for LimitOperator {
    fn open(&mut self) -> QueryResult<()> {
        self.count = 0;
        self.input.open()
    }

    fn next(&mut self) -> QueryResult<Option<Tuple>> {
        if self.count >= self.limit {
            return Ok(None);
        }
        match self.input.next()? {
            Some(tuple) => {
                self.count += 1;
                Ok(Some(tuple))
            }
            None => Ok(None),
        }
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

    fn numbers(n: i32) -> MockOperator {
        let mut schema = Schema::new();
        schema.add_column("x", DataType::Integer);
        MockOperator::new(schema, (0..n).map(|i| vec![Value::Integer(i)]).collect())
    }

    #[test]
    fn test_limit_caps_output() {
        let mut limit = LimitOperator::new(Box::new(numbers(10)), 3);
        limit.open().unwrap();

        let mut rows = Vec::new();
        while let Some(tuple) = limit.next().unwrap() {
            rows.push(tuple);
        }
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], vec![Value::Integer(2)]);
        // Still None after the limit was hit
        assert!(limit.next().unwrap().is_none());
    }

    #[test]
    fn test_limit_larger_than_input() {
        let mut limit = LimitOperator::new(Box::new(numbers(2)), 5);
        limit.open().unwrap();

        let mut count = 0;
        while limit.next().unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn test_limit_reopen_resets_the_counter() {
        let mut limit = LimitOperator::new(Box::new(numbers(10)), 4);

        for _ in 0..2 {
            limit.open().unwrap();
            let mut count = 0;
            while limit.next().unwrap().is_some() {
                count += 1;
            }
            assert_eq!(count, 4);
            limit.close().unwrap();
        }
    }
}
