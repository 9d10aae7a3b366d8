//! bandcheck CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bandcheck", version, about = "IELTS practice test answer scoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an answer sheet against a test
    Score {
        /// Test id (fetched from the source) or path to a .json definition
        #[arg(long)]
        test: String,

        /// Answer sheet JSON (list of {questionId, answer} or a map)
        #[arg(long)]
        answers: PathBuf,

        /// Definition source: bundled, api
        #[arg(long)]
        source: Option<String>,

        /// Output formats, comma separated: text, json, markdown, html, all
        #[arg(long, default_value = "text")]
        format: String,

        /// Output directory for written reports
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two saved attempts
    Compare {
        /// Baseline attempt JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current attempt JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if any question went from correct to incorrect
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate test definition files
    Validate {
        /// Path to a test definition file or directory
        #[arg(long)]
        test: PathBuf,
    },

    /// Stage draft answers
    Draft {
        #[command(subcommand)]
        action: commands::draft::DraftAction,
    },

    /// List available tests
    List {
        /// Definition source: bundled, api
        #[arg(long)]
        source: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example test
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bandcheck=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            test,
            answers,
            source,
            format,
            output,
            config,
        } => {
            commands::score::execute(commands::score::ScoreArgs {
                test,
                answers,
                source,
                format,
                output,
                config,
            })
            .await
        }
        Commands::Compare {
            baseline,
            current,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, fail_on_regression, format),
        Commands::Validate { test } => commands::validate::execute(test),
        Commands::Draft { action } => commands::draft::execute(action),
        Commands::List { source, config } => commands::list::execute(source, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
