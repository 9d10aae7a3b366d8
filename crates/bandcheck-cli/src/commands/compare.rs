//! The `bandcheck compare` command.

use std::path::PathBuf;

use anyhow::Result;

use bandcheck_core::attempt::AttemptRecord;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = AttemptRecord::load_json(&baseline_path)?;
    let current = AttemptRecord::load_json(&current_path)?;

    if baseline.test.id != current.test.id {
        eprintln!(
            "Warning: comparing attempts at different tests ('{}' vs '{}')",
            baseline.test.id, current.test.id
        );
    }

    let comparison = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", comparison.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        _ => {
            // text format
            println!(
                "Comparison: score {} -> {} ({:+}), {} newly correct, {} newly incorrect, {} unchanged",
                comparison.baseline_score,
                comparison.current_score,
                comparison.score_delta,
                comparison.newly_correct.len(),
                comparison.newly_incorrect.len(),
                comparison.unchanged
            );

            if let (Some(before), Some(after)) = (comparison.baseline_band, comparison.current_band) {
                println!("Band: {before:.1} -> {after:.1}");
            }

            if !comparison.newly_incorrect.is_empty() {
                println!("\nNewly incorrect:");
                for q in &comparison.newly_incorrect {
                    println!("  Q{} ({})", q.question_number, q.section_id);
                }
            }

            if !comparison.newly_correct.is_empty() {
                println!("\nNewly correct:");
                for q in &comparison.newly_correct {
                    println!("  Q{} ({})", q.question_number, q.section_id);
                }
            }

            if comparison.new_questions > 0 {
                println!("\n{} new question(s)", comparison.new_questions);
            }
            if comparison.removed_questions > 0 {
                println!("{} removed question(s)", comparison.removed_questions);
            }
        }
    }

    if fail_on_regression && comparison.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
