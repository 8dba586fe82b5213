// Query Operators Module
//
// This module defines the operators used for query execution in the
// iterator-based execution model.

pub mod filter;
pub mod join;
pub mod limit;
pub mod project;
pub mod scan;

use crate::catalog::Schema;
use crate::query::executor::result::{QueryResult, Tuple};

/// The Operator trait defines the interface for all query execution
/// operators. Each operator pulls tuples from its children one at a time
/// and passes its own output upward the same way.
pub trait Operator {
    /// Prepare resources and per-run state, recursively opening children.
    /// Opening after a close starts a fresh run.
    fn open(&mut self) -> QueryResult<()>;

    /// Produce the next output tuple, or None at end-of-stream. Once the
    /// stream ends, further calls keep returning None.
    fn next(&mut self) -> QueryResult<Option<Tuple>>;

    /// Release resources and recursively close children. Closing an
    /// already-closed operator is harmless.
    fn close(&mut self) -> QueryResult<()>;

    /// The schema of tuples this operator produces; stable across the
    /// operator's lifetime and valid before open.
    fn schema(&self) -> &Schema;
}
