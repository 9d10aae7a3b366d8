//! The `bandcheck score` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use bandcheck_core::attempt::AttemptRecord;
use bandcheck_core::model::TestDefinition;
use bandcheck_core::ScoringEngine;
use bandcheck_report::{write_html_report, write_markdown_report};
use bandcheck_sources::{create_source, load_config_from};

use super::resolve_source_kind;

pub struct ScoreArgs {
    pub test: String,
    pub answers: PathBuf,
    pub source: Option<String>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: ScoreArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let definition = load_definition(&args, &config).await?;
    let sheet = bandcheck_core::loader::parse_answer_sheet(&args.answers)?;

    tracing::debug!(
        test = %definition.id,
        answers = sheet.len(),
        "scoring answer sheet"
    );

    let report = ScoringEngine::for_test(&definition).score(&definition, &sheet);
    let attempt = AttemptRecord::new(&definition, report);

    let formats: Vec<&str> = if args.format == "all" {
        vec!["text", "json", "html", "markdown"]
    } else {
        args.format.split(',').map(str::trim).collect()
    };

    let output = args.output.unwrap_or(config.output_dir);
    let timestamp = attempt.created_at.format("%Y-%m-%dT%H%M%S");
    let stem = format!("{}-{timestamp}", file_safe(&attempt.test.id));

    for fmt in &formats {
        match *fmt {
            "text" => print_summary(&attempt),
            "json" => {
                let path = output.join(format!("{stem}.json"));
                attempt.save_json(&path)?;
                eprintln!("Attempt saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("{stem}.html"));
                write_html_report(&attempt, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("{stem}.md"));
                write_markdown_report(&attempt, &path)?;
                eprintln!("Markdown report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

/// A path to an existing file is read directly; anything else is a test id
/// looked up through the configured source.
async fn load_definition(
    args: &ScoreArgs,
    config: &bandcheck_sources::BandcheckConfig,
) -> Result<TestDefinition> {
    let as_path = Path::new(&args.test);
    if as_path.is_file() {
        return bandcheck_core::loader::parse_test_definition(as_path);
    }

    let kind = resolve_source_kind(args.source.as_deref(), config)?;
    let source = create_source(kind, config)?;
    source
        .fetch(&args.test)
        .await
        .with_context(|| format!("failed to load test '{}' from {} source", args.test, source.name()))
}

fn file_safe(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

fn print_summary(attempt: &AttemptRecord) {
    use comfy_table::{Cell, Table};

    let report = &attempt.report;

    println!("{} ({} test)", attempt.test.title, attempt.test.test_type);

    let mut table = Table::new();
    table.set_header(vec!["Section", "Score", "Accuracy"]);
    for section in &report.by_section {
        let title = if section.section_title.is_empty() {
            section.section_id.to_string()
        } else {
            section.section_title.clone()
        };
        table.add_row(vec![
            Cell::new(title),
            Cell::new(format!("{}/{}", section.score, section.total_questions)),
            Cell::new(format!(
                "{}%",
                bandcheck_core::scoring::accuracy(section.score, section.total_questions)
            )),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(format!("{}/{}", report.total_score, report.total_questions)),
        Cell::new(format!("{}%", report.accuracy)),
    ]);
    println!("{table}");

    match attempt.band {
        Some(band) => println!("Estimated band: {band:.1}"),
        None => println!("Estimated band: -"),
    }

    let incorrect: Vec<_> = report.incorrect().collect();
    if !incorrect.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["#", "Section", "Your answer", "Correct answer"]);
        for d in incorrect {
            table.add_row(vec![
                Cell::new(d.question_number),
                Cell::new(d.section_id.as_str()),
                Cell::new(d.user_answer.to_string()),
                Cell::new(&d.correct_answer),
            ]);
        }
        println!("\nIncorrect answers:\n{table}");
    }
}
