// Hash Join Implementation
//
// This file implements the hash equijoin: the build side is consumed into
// an in-memory hash table during open, then the probe side streams through
// it one tuple at a time.

use std::collections::HashMap;

use crate::catalog::Schema;
use crate::query::executor::operators::join::combine;
use crate::query::executor::operators::Operator;
use crate::query::executor::result::{QueryResult, Tuple, Value};
use crate::query::expression::Expression;

/// Hash join operator. The probe side is the left input and contributes the
/// leading columns of the merged output schema.
pub struct HashJoinOperator {
    probe: Box<dyn Operator>,
    build: Box<dyn Operator>,
    probe_key: Expression,
    build_key: Expression,
    schema: Schema,
    /// Build-side tuples bucketed by key; bucket order is insertion order
    hash_table: HashMap<Value, Vec<Tuple>>,
    current_probe: Option<Tuple>,
    current_matches: Vec<Tuple>,
    match_index: usize,
}

impl HashJoinOperator {
    /// Create a new hash join operator
    pub fn new(
        probe: Box<dyn Operator>,
        build: Box<dyn Operator>,
        probe_key: Expression,
        build_key: Expression,
    ) -> Self {
        let schema = Schema::merge(probe.schema(), build.schema());
        HashJoinOperator {
            probe,
            build,
            probe_key,
            build_key,
            schema,
            hash_table: HashMap::new(),
            current_probe: None,
            current_matches: Vec::new(),
            match_index: 0,
        }
    }
}

impl Operator for HashJoinOperator {
    fn open(&mut self) -> QueryResult<()> {
        // Build phase: drain the build side into the hash table
        self.hash_table.clear();
        self.current_probe = None;
        self.current_matches.clear();
        self.match_index = 0;

        self.build.open()?;
        while let Some(tuple) = self.build.next()? {
            let key = self.build_key.evaluate(&tuple, self.build.schema())?;
            self.hash_table.entry(key).or_default().push(tuple);
        }
        self.build.close()?;

        // Probe phase setup
        self.probe.open()?;
        Ok(())
    }

    fn next(&mut self) -> QueryResult<Option<Tuple>> {
        loop {
            // Emit remaining matches for the current probe tuple first
            if let Some(probe_tuple) = &self.current_probe {
                if self.match_index < self.current_matches.len() {
                    let combined = combine(probe_tuple, &self.current_matches[self.match_index]);
                    self.match_index += 1;
                    return Ok(Some(combined));
                }
            }

            // Fetch the next probe tuple and look up its bucket
            self.current_probe = self.probe.next()?;
            let probe_tuple = match &self.current_probe {
                Some(t) => t,
                None => return Ok(None),
            };
            let key = self.probe_key.evaluate(probe_tuple, self.probe.schema())?;
            self.current_matches = self.hash_table.get(&key).cloned().unwrap_or_default();
            self.match_index = 0;
        }
    }

    fn close(&mut self) -> QueryResult<()> {
        // The build side was already closed at the end of the build phase;
        // closing again is harmless and covers aborted opens.
        self.build.close()?;
        self.probe.close()?;
        self.hash_table.clear();
        self.current_probe = None;
        self.current_matches.clear();
        self.match_index = 0;
        Ok(())
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}
