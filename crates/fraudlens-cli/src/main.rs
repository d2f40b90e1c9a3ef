//! `fraudlens` command line: bootstrap, analysis, feedback, retraining.

mod dataset;
mod display;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use fraudlens_ai::{ArtifactStore, bootstrap, load_predictors};
use fraudlens_pipeline::{AnalysisService, CycleOutcome, Ensemble, Retrainer};
use fraudlens_store::MessageStore;

#[derive(Parser)]
#[command(name = "fraudlens", version, about = "Ensemble fraud-message classifier")]
struct Cli {
    /// Path to the SQLite message database.
    #[arg(long, env = "FRAUDLENS_DB", default_value = "fraudlens.db", global = true)]
    db: PathBuf,

    /// Directory holding the deployed model artifacts.
    #[arg(long, env = "FRAUDLENS_MODELS", default_value = "models", global = true)]
    models: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit initial model artifacts from a labelled dataset.
    Init {
        /// CSV of `text,label` rows; defaults to the built-in starter set.
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Classify a message with all three predictors and record the result.
    Analyze { message: String },
    /// List every recorded analysis.
    Messages,
    /// Mark a recorded message as human-verified.
    Verify { id: i64 },
    /// Run one retraining cycle over verified, unconsumed records.
    Retrain,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::debug!("fraudlens v{}", env!("CARGO_PKG_VERSION"));
    let cli = Cli::parse();

    let artifacts = ArtifactStore::new(&cli.models);
    match cli.command {
        Command::Init { data } => init(&artifacts, data.as_deref()),
        Command::Analyze { message } => analyze(&cli.db, &artifacts, &message),
        Command::Messages => messages(&cli.db),
        Command::Verify { id } => verify(&cli.db, id),
        Command::Retrain => retrain(&cli.db, artifacts),
    }
}

fn open_store(db: &Path) -> anyhow::Result<Arc<MessageStore>> {
    let store = MessageStore::open(db)
        .with_context(|| format!("opening message database {}", db.display()))?;
    Ok(Arc::new(store))
}

fn init(artifacts: &ArtifactStore, data: Option<&Path>) -> anyhow::Result<()> {
    let dataset = match data {
        Some(path) => dataset::load_csv(path)?,
        None => dataset::starter_set(),
    };
    bootstrap(artifacts, &dataset)?;
    println!(
        "fitted 3 predictors on {} examples, artifacts in {}",
        dataset.len(),
        artifacts.dir().display()
    );
    Ok(())
}

fn analyze(db: &Path, artifacts: &ArtifactStore, message: &str) -> anyhow::Result<()> {
    let predictors =
        load_predictors(artifacts).context("loading predictors (run `fraudlens init` first)")?;
    let store = open_store(db)?;
    let service = AnalysisService::new(Ensemble::new(predictors), store);

    let analysis = service.analyze(message)?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

fn messages(db: &Path) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let records = store.list_all()?;
    if records.is_empty() {
        println!("no messages recorded");
        return Ok(());
    }
    for record in &records {
        println!("{}", display::record_line(record));
    }
    Ok(())
}

fn verify(db: &Path, id: i64) -> anyhow::Result<()> {
    let store = open_store(db)?;
    store.mark_verified(id)?;
    println!("message {id} marked verified");
    Ok(())
}

fn retrain(db: &Path, artifacts: ArtifactStore) -> anyhow::Result<()> {
    let store = open_store(db)?;
    match Retrainer::new(store, artifacts).run_cycle()? {
        CycleOutcome::NoCandidates => println!("no verified feedback to train on"),
        CycleOutcome::Completed { records } => {
            println!("retrained all predictors on {records} records");
        }
    }
    Ok(())
}
