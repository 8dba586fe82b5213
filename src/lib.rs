// Export public modules
pub mod catalog;
pub mod query;

// Re-export key items for convenient access
pub use catalog::{Catalog, CatalogError, DataType, Schema};
pub use query::executor::operators::Operator;
pub use query::executor::result::{QueryError, QueryResult, Tuple, Value};
