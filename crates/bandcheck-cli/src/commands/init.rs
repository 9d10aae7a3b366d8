//! The `bandcheck init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("bandcheck.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("test-sets")?;
    write_if_missing(Path::new("test-sets/example.json"), EXAMPLE_TEST)?;

    std::fs::create_dir_all("answers")?;
    write_if_missing(Path::new("answers/example.json"), EXAMPLE_ANSWERS)?;

    println!("\nNext steps:");
    println!("  1. Run: bandcheck validate --test test-sets/example.json");
    println!("  2. Run: bandcheck score --test example --answers answers/example.json");
    println!("  3. Run: bandcheck list");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# bandcheck configuration

tests_dir = "./test-sets"
output_dir = "./bandcheck-results"
drafts_dir = "./.bandcheck-drafts"
default_source = "bundled"

# Uncomment to fetch tests from a practice backend.
# [api]
# base_url = "https://practice.example.com/api"
# token = "${BANDCHECK_API_TOKEN}"
# timeout_secs = 30
"#;

const EXAMPLE_TEST: &str = r#"{
  "id": "example",
  "title": "Example Reading Test",
  "testType": "reading",
  "sections": [
    {
      "sectionId": "passage-1",
      "sectionTitle": "The History of Glass",
      "questionType": "sentence-completion",
      "questions": [
        {
          "id": 1,
          "questionNumber": 1,
          "questionText": "Early glass was made mainly from ______.",
          "answers": ["sand", "silica sand"]
        },
        {
          "id": 2,
          "questionNumber": 2,
          "questionText": "Which colour did early glass usually have?",
          "answers": ["green", "greenish"]
        }
      ]
    },
    {
      "sectionId": "passage-2",
      "sectionTitle": "Urban Beekeeping",
      "questionType": "multiple-choice",
      "questions": [
        {
          "id": 3,
          "questionNumber": 3,
          "questionText": "Which TWO benefits does the writer mention?",
          "options": ["A", "B", "C", "D", "E"],
          "answers": ["B", "D"]
        }
      ]
    }
  ]
}
"#;

const EXAMPLE_ANSWERS: &str = r#"[
  { "questionId": 1, "answer": "Sand" },
  { "questionId": 2, "answer": "blue" },
  { "questionId": 3, "answer": ["D", "B"] }
]
"#;
