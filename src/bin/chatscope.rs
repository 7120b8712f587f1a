//! chatscope CLI: exploratory report over a messaging export.
//!
//! Usage:
//!   chatscope report --input messages.jsonl --output report.md [--config chatscope.yaml] [--snapshot [--db path]]
//!   chatscope summary [--db path]

use chatscope::report::outline;
use chatscope::{load_jsonl, OpenStore, Pipeline, PipelineConfig, SnapshotStore, SqliteStore};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "chatscope",
    version,
    about = "Exploratory analysis of public messaging exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the export and write the Markdown report
    Report {
        /// JSON Lines export, one message per line
        #[arg(long)]
        input: PathBuf,
        /// Where to write the report
        #[arg(long)]
        output: PathBuf,
        /// YAML pipeline configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also save the cleaned table as a snapshot
        #[arg(long)]
        snapshot: bool,
        /// Path to SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Print headline counts of the saved snapshot
    Summary {
        /// Path to SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

/// Get the default database path (~/.local/share/chatscope/chatscope.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("chatscope").join("chatscope.db")
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, String> {
    match path {
        Some(path) => PipelineConfig::from_yaml_file(path).map_err(|e| e.to_string()),
        None => Ok(PipelineConfig::default()),
    }
}

fn cmd_report(input: &Path, output: &Path, config: Option<&Path>, snapshot: bool, db: Option<PathBuf>) -> i32 {
    let config = match load_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };
    let pipeline = match Pipeline::new(config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };
    let raw = match load_jsonl(input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: failed to load {}: {}", input.display(), e);
            return 1;
        }
    };
    let result = match pipeline.run(&raw) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let markdown = result.report.serialize();
    info!(headings = outline(&markdown).len(), "report serialized");
    if let Err(e) = std::fs::write(output, &markdown) {
        eprintln!("Error: failed to write {}: {}", output.display(), e);
        return 1;
    }

    let cleaned = &result.prepared.cleaned;
    println!(
        "Wrote {} ({} of {} rows kept)",
        output.display(),
        cleaned.len(),
        result.prepared.input_rows
    );

    if snapshot {
        let db_path = db.unwrap_or_else(default_db_path);
        let saved = SqliteStore::open(&db_path).and_then(|store| store.save_snapshot(cleaned));
        match saved {
            Ok(rows) => println!("Saved snapshot of {} rows to {}", rows, db_path.display()),
            Err(e) => {
                eprintln!("Error: failed to save snapshot: {}", e);
                return 1;
            }
        }
    }
    0
}

fn cmd_summary(db: Option<PathBuf>) -> i32 {
    let db_path = db.unwrap_or_else(default_db_path);
    let summary = match SqliteStore::open(&db_path).and_then(|store| store.summary()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let show = |count: Option<u64>| count.map_or_else(|| "n/a".to_string(), |n| n.to_string());
    if let Some(taken_at) = &summary.taken_at {
        println!("Snapshot taken at {}", taken_at);
    }
    println!("Total messages:      {}", summary.total_messages);
    println!("Distinct users:      {}", show(summary.distinct_users));
    println!("Distinct groups:     {}", show(summary.distinct_groups));
    println!("Text-only messages:  {}", show(summary.text_only));
    println!("Messages with media: {}", show(summary.with_media));
    0
}

fn main() {
    let filter = EnvFilter::try_from_env("CHATSCOPE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Report {
            input,
            output,
            config,
            snapshot,
            db,
        } => cmd_report(&input, &output, config.as_deref(), snapshot, db),
        Commands::Summary { db } => cmd_summary(db),
    };
    std::process::exit(code);
}
