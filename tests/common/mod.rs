// Shared fixtures for integration tests: a temporary data directory holding
// CSV data files and their schema documents, plus plan-running helpers.

use anyhow::Result;
use std::fs;
use tempfile::TempDir;

use brookdb::catalog::Catalog;
use brookdb::query::planner::{OperatorBuilder, PhysicalPlan};
use brookdb::{Operator as _, Schema, Tuple};

/// Write the customers/orders sample tables and their schema documents
pub fn sample_data_dir() -> Result<TempDir> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join("customers.csv"),
        "custkey,name,balance\n1,Alice,100.0\n2,Bob,250.5\n",
    )?;
    fs::write(
        dir.path().join("customers.json"),
        r#"{"file": "customers.csv", "columns": [
            {"name": "custkey", "type": "int"},
            {"name": "name", "type": "string"},
            {"name": "balance", "type": "float"}
        ]}"#,
    )?;
    fs::write(
        dir.path().join("orders.csv"),
        "orderkey,custkey,total\n10,1,9.0\n11,1,1.0\n12,2,5.0\n",
    )?;
    fs::write(
        dir.path().join("orders.json"),
        r#"{"file": "orders.csv", "columns": [
            {"name": "orderkey", "type": "int"},
            {"name": "custkey", "type": "int"},
            {"name": "total", "type": "float"}
        ]}"#,
    )?;
    Ok(dir)
}

/// Load the catalog the way the driver does: from schema documents on disk
pub fn load_catalog(dir: &TempDir) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    catalog.load_schemas(dir.path())?;
    Ok(catalog)
}

pub fn parse_plan(text: &str) -> Result<PhysicalPlan> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(PhysicalPlan::from_json(&json)?)
}

/// Translate and run a plan to exhaustion, returning the rows and the root
/// operator's output schema.
pub fn run_plan(plan_text: &str, dir: &TempDir) -> Result<(Vec<Tuple>, Schema)> {
    let catalog = load_catalog(dir)?;
    let plan = parse_plan(plan_text)?;
    let builder = OperatorBuilder::new(&catalog, dir.path());
    let mut root = builder.build(&plan)?;

    root.open()?;
    let mut rows = Vec::new();
    while let Some(tuple) = root.next()? {
        rows.push(tuple);
    }
    let schema = root.schema().clone();
    root.close()?;
    Ok((rows, schema))
}
