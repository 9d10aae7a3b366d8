//! The `bandcheck validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(test_path: PathBuf) -> Result<()> {
    let definitions = if test_path.is_dir() {
        bandcheck_core::loader::load_test_directory(&test_path)?
    } else {
        vec![bandcheck_core::loader::parse_test_definition(&test_path)?]
    };

    let mut total_warnings = 0;

    for definition in &definitions {
        println!(
            "Test: {} ({} test, {} sections, {} questions)",
            definition.title,
            definition.test_type,
            definition.sections.len(),
            definition.question_count()
        );

        let warnings = bandcheck_core::loader::validate_test_definition(definition);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All tests valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
