// Nested Loop Join Implementation
//
// This file implements the classical nested loop join, which works for any
// join condition but rescans the right side once per left tuple.

use crate::catalog::Schema;
use crate::query::executor::operators::join::{combine, condition_holds};
use crate::query::executor::operators::Operator;
use crate::query::executor::result::{QueryResult, Tuple};
use crate::query::expression::Expression;

/// Nested loop join operator
pub struct NestedLoopJoinOperator {
    left: Box<dyn Operator>,
    right: Box<dyn Operator>,
    condition: Expression,
    schema: Schema,
    /// Current outer-loop tuple; None once the left side is exhausted
    current_left: Option<Tuple>,
}

impl NestedLoopJoinOperator {
    /// Create a new nested loop join operator
    pub fn new(left: Box<dyn Operator>, right: Box<dyn Operator>, condition: Expression) -> Self {
        let schema = Schema::merge(left.schema(), right.schema());
        NestedLoopJoinOperator {
            left,
            right,
            condition,
            schema,
            current_left: None,
        }
    }
}

impl Operator for NestedLoopJoinOperator {
    fn open(&mut self) -> QueryResult<()> {
        self.left.open()?;
        self.right.open()?;
        // Prime the outer loop with the first left tuple
        self.current_left = self.left.next()?;
        Ok(())
    }

    fn next(&mut self) -> QueryResult<Option<Tuple>> {
        loop {
            let left_tuple = match &self.current_left {
                Some(t) => t,
                None => return Ok(None),
            };
            match self.right.next()? {
                Some(right_tuple) => {
                    let combined = combine(left_tuple, &right_tuple);
                    if condition_holds(self.condition.evaluate(&combined, &self.schema)?)? {
                        return Ok(Some(combined));
                    }
                }
                None => {
                    // Right side exhausted for this left tuple: advance the
                    // outer loop and restart the right stream.
                    self.current_left = self.left.next()?;
                    self.right.close()?;
                    self.right.open()?;
                }
            }
        }
    }

    fn close(&mut self) -> QueryResult<()> {
        self.current_left = None;
        self.left.close()?;
        self.right.close()
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}
