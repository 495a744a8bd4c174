//! Audience Planner: natural-language segment lookup over an embedded
//! single-file segment store.
//!
//! `load` provisions the store from a JSON dataset; `query` compiles a
//! free-text filter and prints the matching rows; `explain` shows the
//! SQL a query compiles to; `chunks` renders the retrieval chunks.

use clap::{Parser, Subcommand};
use planner_compiler::{compile, SegmentQueryTool};
use planner_core::config::AppConfig;
use planner_knowledge::SegmentKnowledgeSource;
use planner_store::{loader, SegmentStore};
use rusqlite::types::Value;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "audience-planner")]
#[command(about = "Natural-language audience segment lookup")]
#[command(version)]
struct Cli {
    /// Segment store file (overrides config)
    #[arg(long, env = "AUDIENCE_PLANNER__STORE__PATH")]
    store: Option<PathBuf>,

    /// Segment dataset file (overrides config)
    #[arg(long, env = "AUDIENCE_PLANNER__DATASET__PATH")]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the segment dataset into the store, replacing its contents
    Load,

    /// Compile a free-text query, run it, and print matching rows as JSON
    Query {
        /// Free-text segment filter, e.g. "high confidence rural segments"
        text: String,
    },

    /// Print the SQL a free-text query compiles to, without executing it
    Explain {
        /// Free-text segment filter
        text: String,
    },

    /// Render the segment knowledge chunks from the dataset
    Chunks,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "audience_planner=info,planner_store=info,planner_compiler=info".into()
            }),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(store) = cli.store {
        config.store.path = store;
    }
    if let Some(dataset) = cli.dataset {
        config.dataset.path = dataset;
    }

    info!(
        store = %config.store.path.display(),
        dataset = %config.dataset.path.display(),
        "Configuration loaded"
    );

    let store = SegmentStore::new(&config.store.path);

    match cli.command {
        Commands::Load => cmd_load(&config.dataset.path, &store),
        Commands::Query { text } => {
            cmd_query(store, &text);
            Ok(())
        }
        Commands::Explain { text } => {
            cmd_explain(&text);
            Ok(())
        }
        Commands::Chunks => cmd_chunks(&config.dataset.path),
    }
}

fn cmd_load(dataset: &Path, store: &SegmentStore) -> anyhow::Result<()> {
    let report = loader::provision(dataset, store)?;
    println!(
        "Inserted {}/{} segments into {}",
        report.inserted,
        report.total,
        store.path().display()
    );
    Ok(())
}

fn cmd_query(store: SegmentStore, text: &str) {
    let tool = SegmentQueryTool::new(store);
    println!("{}", tool.invoke(text));
}

fn cmd_explain(text: &str) {
    let filter = compile(text);
    let (sql, params) = filter.to_sql();
    println!("{sql}");
    if !params.is_empty() {
        let rendered: Vec<String> = params
            .iter()
            .map(|p| match p {
                Value::Text(s) => format!("'{s}'"),
                Value::Integer(i) => i.to_string(),
                Value::Real(f) => f.to_string(),
                _ => "NULL".to_string(),
            })
            .collect();
        println!("-- params: [{}]", rendered.join(", "));
    }
}

fn cmd_chunks(dataset: &Path) -> anyhow::Result<()> {
    let source = SegmentKnowledgeSource::new(dataset);
    let chunks = source.load_chunks()?;
    for chunk in &chunks {
        println!("{}", chunk.content);
        println!();
    }
    info!(chunks = chunks.len(), "Rendered segment knowledge chunks");
    Ok(())
}
