// Catalog Implementation
//
// Loads table schemas from schema documents found in the data directory and
// serves file-key -> schema lookups during plan translation. The catalog is
// populated once before planning and read-only afterwards.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use super::schema::{DataType, Schema};

/// Errors raised while loading schema documents
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed schema document {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("unknown data type '{0}' in schema document")]
    UnknownDataType(String),
}

/// On-disk shape of one schema document
#[derive(Debug, Deserialize)]
struct SchemaDocument {
    file: String,
    columns: Vec<ColumnDocument>,
}

#[derive(Debug, Deserialize)]
struct ColumnDocument {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
}

/// Maps data-file keys (e.g. "customers.csv") to their schemas
#[derive(Debug, Default)]
pub struct Catalog {
    schemas: HashMap<String, Schema>,
}

impl Catalog {
    /// Create a new, empty catalog
    pub fn new() -> Self {
        Catalog {
            schemas: HashMap::new(),
        }
    }

    /// Scan a directory and load every `*.json` file as a schema document
    pub fn load_schemas(&mut self, data_dir: &Path) -> Result<(), CatalogError> {
        for entry in std::fs::read_dir(data_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                debug!("loading schema document {}", path.display());
                self.load_schema_file(&path)?;
            }
        }
        info!("catalog loaded: {} table(s)", self.schemas.len());
        Ok(())
    }

    fn load_schema_file(&mut self, path: &Path) -> Result<(), CatalogError> {
        let file = File::open(path)?;
        let doc: SchemaDocument = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| CatalogError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let mut schema = Schema::new();
        for col in &doc.columns {
            let data_type = DataType::parse(&col.type_name)
                .ok_or_else(|| CatalogError::UnknownDataType(col.type_name.clone()))?;
            schema.add_column(&col.name, data_type);
        }
        self.schemas.insert(doc.file, schema);
        Ok(())
    }

    /// Look up the schema for a data-file key
    pub fn schema(&self, file_key: &str) -> Option<&Schema> {
        self.schemas.get(file_key)
    }

    /// Register a schema under a file key (used by tests and embedders)
    pub fn register(&mut self, file_key: &str, schema: Schema) {
        self.schemas.insert(file_key.to_string(), schema);
    }

    /// Number of registered tables
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the catalog holds no tables
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
