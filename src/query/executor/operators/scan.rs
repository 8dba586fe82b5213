// Table Scan Operator Implementation
//
// Reads tuples from a delimited text data file, one line per tuple,
// parsing each field according to the table's catalog schema.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use log::warn;

use crate::catalog::{Catalog, DataType, Schema};
use crate::query::executor::operators::Operator;
use crate::query::executor::result::{QueryError, QueryResult, Tuple, Value};

/// Scan operator over one CSV data file. Output columns are qualified with
/// the scan's alias ("custkey" becomes "c.custkey").
#[derive(Debug)]
pub struct ScanOperator {
    file_path: PathBuf,
    schema: Schema,
    reader: Option<BufReader<File>>,
}

impl ScanOperator {
    /// Create a scan for `file_path` under `alias`. The base schema is
    /// looked up in the catalog by the file's basename.
    pub fn new(
        file_path: impl Into<PathBuf>,
        alias: &str,
        catalog: &Catalog,
    ) -> QueryResult<Self> {
        let file_path = file_path.into();
        let file_key = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                QueryError::PlanError(format!("invalid table path: {}", file_path.display()))
            })?;
        let base = catalog
            .schema(file_key)
            .ok_or_else(|| QueryError::TableNotFound(file_key.to_string()))?;
        let schema = base.qualify(alias);
        Ok(ScanOperator {
            file_path,
            schema,
            reader: None,
        })
    }

    /// Parse one data line into a tuple, or None when a numeric field fails
    /// to parse and the row is skipped. A line with fewer fields than the
    /// schema yields a short tuple; extra fields are ignored.
    fn parse_line(&self, line: &str) -> Option<Tuple> {
        let mut tuple = Tuple::new();
        for (field, column) in line.split(',').zip(self.schema.columns()) {
            let value = match column.data_type {
                DataType::Integer => match field.parse::<i32>() {
                    Ok(i) => Value::Integer(i),
                    Err(_) => {
                        warn!(
                            "could not parse '{}' for column {}, skipping row",
                            field, column.name
                        );
                        return None;
                    }
                },
                DataType::Float => match field.parse::<f32>() {
                    Ok(f) => Value::Float(f),
                    Err(_) => {
                        warn!(
                            "could not parse '{}' for column {}, skipping row",
                            field, column.name
                        );
                        return None;
                    }
                },
                DataType::Text => Value::Text(field.to_string()),
                DataType::Boolean => Value::Boolean(field == "true" || field == "1"),
            };
            tuple.push(value);
        }
        Some(tuple)
    }
}

impl Operator for ScanOperator {
    fn open(&mut self) -> QueryResult<()> {
        // Already open: keep the current position
        if self.reader.is_some() {
            return Ok(());
        }
        let file = File::open(&self.file_path)?;
        let mut reader = BufReader::new(file);
        // Skip the header line
        let mut header = String::new();
        reader.read_line(&mut header)?;
        self.reader = Some(reader);
        Ok(())
    }

    fn next(&mut self) -> QueryResult<Option<Tuple>> {
        if self.reader.is_none() {
            return Ok(None);
        }
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = match self.reader.as_mut() {
                Some(r) => r.read_line(&mut line)?,
                None => return Ok(None),
            };
            if bytes_read == 0 {
                return Ok(None);
            }
            let trimmed = line.trim_end_matches(|c| c == '\n' || c == '\r');
            if let Some(tuple) = self.parse_line(trimmed) {
                return Ok(Some(tuple));
            }
            // Malformed row was skipped; keep reading
        }
    }

    fn close(&mut self) -> QueryResult<()> {
        self.reader = None;
        Ok(())
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}
