//! The `bandcheck draft` commands: stage answers before scoring.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Subcommand;

use bandcheck_core::answer::{AnswerKey, Response};
use bandcheck_core::store::{AnswerStore, JsonFileStore};

#[derive(Subcommand)]
pub enum DraftAction {
    /// Record an answer; no values clears it
    Set {
        #[command(flatten)]
        target: DraftTarget,

        /// Question id
        #[arg(long)]
        question: String,

        /// Section id (needed for listening tests)
        #[arg(long)]
        section: Option<String>,

        /// Store the values as a multi-select answer, even a single one
        #[arg(long)]
        multi: bool,

        /// Answer values; more than one makes a multi-select answer
        value: Vec<String>,
    },

    /// Print the staged answers
    Show {
        #[command(flatten)]
        target: DraftTarget,
    },

    /// Delete the draft
    Clear {
        #[command(flatten)]
        target: DraftTarget,
    },
}

#[derive(clap::Args)]
pub struct DraftTarget {
    /// Draft file path
    #[arg(long)]
    draft: Option<PathBuf>,

    /// Test id; the draft lives under the configured drafts directory
    #[arg(long)]
    test: Option<String>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

impl DraftTarget {
    fn resolve(&self) -> Result<PathBuf> {
        if let Some(path) = &self.draft {
            return Ok(path.clone());
        }
        let Some(test) = &self.test else {
            bail!("either --draft or --test is required");
        };
        let config = bandcheck_sources::load_config_from(self.config.as_deref())?;
        Ok(config.drafts_dir.join(format!("{test}.json")))
    }
}

pub fn execute(action: DraftAction) -> Result<()> {
    match action {
        DraftAction::Set {
            target,
            question,
            section,
            multi,
            value,
        } => {
            let path = target.resolve()?;
            let mut store = JsonFileStore::open(&path)?;
            let key = match section {
                Some(section) => AnswerKey::in_section(section, question),
                None => AnswerKey::question(question),
            };
            let response = if multi {
                Response::from_selection(value)
            } else {
                Response::from_values(value)
            };
            let message = if response.is_no_answer() {
                format!("Cleared {key}")
            } else {
                format!("{key} = {response}")
            };
            store.set(key, response)?;
            println!("{message}");
        }
        DraftAction::Show { target } => {
            let path = target.resolve()?;
            let store = JsonFileStore::open(&path)?;
            if store.is_empty() {
                println!("No answers staged in {}", path.display());
                return Ok(());
            }

            use comfy_table::{Cell, Table};
            let mut table = Table::new();
            table.set_header(vec!["Section", "Question", "Answer"]);
            for entry in store.snapshot().entries() {
                table.add_row(vec![
                    Cell::new(entry.section_id.as_ref().map(|s| s.as_str()).unwrap_or("-")),
                    Cell::new(entry.question_id.as_str()),
                    Cell::new(entry.answer.to_string()),
                ]);
            }
            println!("{table}");
            println!("{} answer(s) in {}", store.len(), path.display());
        }
        DraftAction::Clear { target } => {
            let path = target.resolve()?;
            let mut store = JsonFileStore::open(&path)?;
            store.clear()?;
            println!("Cleared draft {}", path.display());
        }
    }

    Ok(())
}
