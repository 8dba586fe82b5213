// Query Executor Module
//
// Iterator-model execution: an operator tree is opened once, pulled one
// tuple at a time from the root, and closed when the query completes.

pub mod operators;
pub mod result;
