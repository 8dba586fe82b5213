// Catalog Management Module
//
// This module is responsible for table schema metadata: the typed column
// layouts scan outputs conform to, and the file-key -> schema directory
// consulted during plan translation.

pub mod catalog;
pub mod schema;

// Re-export key types
pub use self::catalog::{Catalog, CatalogError};
pub use self::schema::{ColumnInfo, DataType, Schema};
