//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tessera: semantic table annotation against a knowledge base
#[derive(Parser)]
#[command(name = "tessera")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Annotate a dataset: cells, column types, column-pair relations
    Annotate {
        /// Directory containing the table CSV files
        #[arg(value_name = "TABLES_DIR")]
        tables: PathBuf,

        /// Cell target list (header-less CSV: table, column, row)
        #[arg(value_name = "TARGETS_FILE")]
        targets: PathBuf,

        /// Output directory for CEA.csv, CTA.csv, CPA.csv
        #[arg(short, long, default_value = "outputs")]
        output: PathBuf,

        /// Knowledge base to query
        #[arg(long, default_value = "wikidata")]
        kb: KbChoice,

        /// Lookup cache file, loaded if present and saved after the run
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Request timeout in seconds for knowledge-base lookups
        #[arg(long, default_value = "20")]
        timeout: u64,

        /// Language used for entity search
        #[arg(long, default_value = "en")]
        language: String,
    },

    /// Score an annotation file against a ground-truth file
    Score {
        /// Annotation task the files belong to (cea, cta, cpa)
        #[arg(value_name = "TASK")]
        task: TaskChoice,

        /// Produced annotation file
        #[arg(value_name = "SUBMISSION")]
        submission: PathBuf,

        /// Ground-truth file of the same shape
        #[arg(value_name = "GROUND_TRUTH")]
        ground_truth: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Knowledge-base choice for annotation
#[derive(Clone, Debug, Default)]
pub enum KbChoice {
    /// Live Wikidata endpoints
    #[default]
    Wikidata,
    /// Empty in-memory mock, for offline dry runs
    Mock,
}

impl std::str::FromStr for KbChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wikidata" | "wd" => Ok(KbChoice::Wikidata),
            "mock" | "test" => Ok(KbChoice::Mock),
            _ => Err(format!("Unknown knowledge base: {}. Use: wikidata or mock.", s)),
        }
    }
}

impl std::fmt::Display for KbChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KbChoice::Wikidata => write!(f, "wikidata"),
            KbChoice::Mock => write!(f, "mock"),
        }
    }
}

/// Annotation task choice for scoring
#[derive(Clone, Copy, Debug)]
pub enum TaskChoice {
    Cea,
    Cta,
    Cpa,
}

impl From<TaskChoice> for tessera::Task {
    fn from(choice: TaskChoice) -> Self {
        match choice {
            TaskChoice::Cea => tessera::Task::Cea,
            TaskChoice::Cta => tessera::Task::Cta,
            TaskChoice::Cpa => tessera::Task::Cpa,
        }
    }
}

impl std::str::FromStr for TaskChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cea" => Ok(TaskChoice::Cea),
            "cta" => Ok(TaskChoice::Cta),
            "cpa" => Ok(TaskChoice::Cpa),
            _ => Err(format!("Unknown task: {}. Use: cea, cta, or cpa.", s)),
        }
    }
}

impl std::fmt::Display for TaskChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskChoice::Cea => write!(f, "cea"),
            TaskChoice::Cta => write!(f, "cta"),
            TaskChoice::Cpa => write!(f, "cpa"),
        }
    }
}
