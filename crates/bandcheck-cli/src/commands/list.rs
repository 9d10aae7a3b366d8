//! The `bandcheck list` command.

use std::path::PathBuf;

use anyhow::Result;

use bandcheck_sources::{create_source, load_config_from};

use super::resolve_source_kind;

pub async fn execute(source: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let kind = resolve_source_kind(source.as_deref(), &config)?;
    let source = create_source(kind, &config)?;

    let tests = source.list().await?;
    if tests.is_empty() {
        println!("No tests found. Run `bandcheck init` to create an example test.");
        return Ok(());
    }

    use comfy_table::{Cell, Table};
    let mut table = Table::new();
    table.set_header(vec!["Id", "Title", "Type", "Questions"]);
    for test in &tests {
        table.add_row(vec![
            Cell::new(&test.id),
            Cell::new(&test.title),
            Cell::new(test.test_type),
            Cell::new(test.question_count),
        ]);
    }
    println!("{table}");
    println!("{} test(s) from {} source", tests.len(), source.name());

    Ok(())
}
