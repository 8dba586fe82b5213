use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use brookdb::catalog::Catalog;
use brookdb::query::executor::result::format_tuple;
use brookdb::query::planner::{OperatorBuilder, PhysicalPlan};
use brookdb::Operator as _;

/// Execute a pre-built query plan against a directory of delimited data files
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Path to the plan document
    plan: PathBuf,

    /// Directory holding the data files and their schema documents
    data_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut catalog = Catalog::new();
    catalog
        .load_schemas(&cli.data_dir)
        .with_context(|| format!("failed to load schemas from {}", cli.data_dir.display()))?;

    let plan_file = File::open(&cli.plan)
        .with_context(|| format!("could not open plan file {}", cli.plan.display()))?;
    let plan_json: serde_json::Value = serde_json::from_reader(BufReader::new(plan_file))
        .context("plan document is not valid JSON")?;
    let plan = PhysicalPlan::from_json(&plan_json)?;

    let builder = OperatorBuilder::new(&catalog, &cli.data_dir);
    let mut root = builder.build(&plan)?;

    root.open()?;
    let mut row_count = 0usize;
    while let Some(tuple) = root.next()? {
        println!("{}", format_tuple(&tuple, root.schema()));
        row_count += 1;
    }
    println!("Returned {} rows.", row_count);
    root.close()?;

    Ok(())
}
