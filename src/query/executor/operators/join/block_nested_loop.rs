// Block Nested Loop Join Implementation
//
// This file implements the block nested loop join: the left side is pulled
// into fixed-size blocks so the right side is rescanned once per block
// instead of once per left tuple.

use crate::catalog::Schema;
use crate::query::executor::operators::join::{combine, condition_holds};
use crate::query::executor::operators::Operator;
use crate::query::executor::result::{QueryResult, Tuple};
use crate::query::expression::Expression;

/// Left tuples buffered per right-side rescan
pub const DEFAULT_BLOCK_SIZE: usize = 100;

/// Block nested loop join operator
pub struct BlockNestedLoopJoinOperator {
    left: Box<dyn Operator>,
    right: Box<dyn Operator>,
    condition: Expression,
    schema: Schema,
    block_size: usize,
    block: Vec<Tuple>,
    block_index: usize,
}

impl BlockNestedLoopJoinOperator {
    /// Create a new block nested loop join with the default block size
    pub fn new(left: Box<dyn Operator>, right: Box<dyn Operator>, condition: Expression) -> Self {
        Self::with_block_size(left, right, condition, DEFAULT_BLOCK_SIZE)
    }

    /// Create a new block nested loop join with an explicit block size
    pub fn with_block_size(
        left: Box<dyn Operator>,
        right: Box<dyn Operator>,
        condition: Expression,
        block_size: usize,
    ) -> Self {
        let schema = Schema::merge(left.schema(), right.schema());
        BlockNestedLoopJoinOperator {
            left,
            right,
            condition,
            schema,
            block_size,
            block: Vec::new(),
            block_index: 0,
        }
    }

    /// Pull the next block of left tuples and restart the right stream.
    /// Returns false when the left side is exhausted.
    fn load_next_block(&mut self) -> QueryResult<bool> {
        self.block.clear();
        self.block_index = 0;
        while self.block.len() < self.block_size {
            match self.left.next()? {
                Some(tuple) => self.block.push(tuple),
                None => break,
            }
        }
        self.right.close()?;
        self.right.open()?;
        Ok(!self.block.is_empty())
    }
}

impl Operator for BlockNestedLoopJoinOperator {
    fn open(&mut self) -> QueryResult<()> {
        self.left.open()?;
        self.right.open()?;
        self.load_next_block()?;
        Ok(())
    }

    fn next(&mut self) -> QueryResult<Option<Tuple>> {
        loop {
            if self.block.is_empty() {
                return Ok(None);
            }
            match self.right.next()? {
                Some(right_tuple) => {
                    let left_tuple = &self.block[self.block_index];
                    let combined = combine(left_tuple, &right_tuple);
                    if condition_holds(self.condition.evaluate(&combined, &self.schema)?)? {
                        return Ok(Some(combined));
                    }
                }
                None => {
                    // Right side exhausted for the current block entry
                    self.block_index += 1;
                    if self.block_index >= self.block.len() {
                        if !self.load_next_block()? {
                            return Ok(None);
                        }
                    } else {
                        self.right.close()?;
                        self.right.open()?;
                    }
                }
            }
        }
    }

    fn close(&mut self) -> QueryResult<()> {
        self.block.clear();
        self.block_index = 0;
        self.left.close()?;
        self.right.close()
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}
