use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use agent_usability_eval::catalog::{self, KANO_ANSWER_OPTIONS, LIKERT_OPTIONS};
use agent_usability_eval::config::Settings;
use agent_usability_eval::db::{self, PgEvaluationStore};
use agent_usability_eval::report;
use agent_usability_eval::service::{self, Envelope};
use agent_usability_eval::store::{EvaluationStore, SearchField};
use agent_usability_eval::EvaluationRecord;

#[derive(Parser)]
#[command(name = "agent-usability-eval")]
#[command(about = "Usability survey scoring for AI agent products", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum QuestionKind {
    Kano,
    Sus,
    Aipet,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Insert a demo evaluation
    Seed,
    /// Print the question catalogs as JSON
    Questions {
        #[arg(long, value_enum)]
        kind: Option<QuestionKind>,
    },
    /// Score a submission without storing it
    Score {
        /// JSON submission file, or - for stdin
        #[arg(long)]
        input: PathBuf,
    },
    /// Score a submission and store the result
    Evaluate {
        /// JSON submission file, or - for stdin
        #[arg(long)]
        input: PathBuf,
    },
    /// Print a stored evaluation
    Show { id: Uuid },
    /// List stored evaluations, newest first
    List {
        #[arg(long, default_value_t = 50)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Search stored evaluations by project fields, newest first
    Search {
        query: String,
        /// project-name, description or all
        #[arg(long, default_value = "project-name")]
        field: SearchField,
    },
    /// Delete a stored evaluation
    Delete { id: Uuid },
    /// Generate a markdown report for one evaluation
    Report {
        id: Uuid,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Export every stored evaluation as CSV
    Export {
        #[arg(long, default_value = "evaluations.csv")]
        csv: PathBuf,
    },
    /// Aggregate statistics across stored evaluations
    Stats,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn connect(settings: &Settings) -> anyhow::Result<PgPool> {
    let database_url = settings
        .require_database_url()
        .context("DATABASE_URL must be set to a Postgres instance")?;
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut payload = String::new();
        std::io::stdin()
            .read_to_string(&mut payload)
            .context("failed to read submission from stdin")?;
        Ok(payload)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read submission from {}", path.display()))
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn emit<T: Serialize>(envelope: &Envelope<T>) -> anyhow::Result<ExitCode> {
    print_json(envelope)?;
    Ok(if envelope.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn options_json(options: &[(u8, &str)]) -> Value {
    options
        .iter()
        .map(|(value, label)| json!({ "value": value, "label": label }))
        .collect()
}

fn questions_json(kind: Option<QuestionKind>) -> Value {
    let kano = || {
        json!({
            "questions": catalog::kano_questions(),
            "answer_options": options_json(&KANO_ANSWER_OPTIONS),
        })
    };
    let sus = || {
        json!({
            "questions": catalog::sus_questions(),
            "answer_options": options_json(&LIKERT_OPTIONS),
        })
    };
    let aipet = || json!({ "questions": catalog::aipet_questions() });

    match kind {
        Some(QuestionKind::Kano) => kano(),
        Some(QuestionKind::Sus) => sus(),
        Some(QuestionKind::Aipet) => aipet(),
        None => json!({ "kano": kano(), "sus": sus(), "aipet": aipet() }),
    }
}

async fn all_records(store: &PgEvaluationStore) -> anyhow::Result<Vec<EvaluationRecord>> {
    store
        .list(usize::MAX, 0)
        .await
        .context("failed to load evaluations")
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::from_env().context("invalid configuration")?;
    let options = settings.engine;

    match &cli.command {
        Commands::Questions { kind } => {
            print_json(&questions_json(*kind))?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Score { input } => {
            let payload = read_input(input)?;
            return emit(&service::preview(&payload, &options));
        }
        _ => {}
    }

    let pool = connect(&settings).await?;
    let store = PgEvaluationStore::new(pool.clone());

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let id = db::seed(&pool, &options).await?;
            println!("Demo evaluation {id} inserted.");
        }
        Commands::Evaluate { input } => {
            let payload = read_input(&input)?;
            return emit(&service::submit(&store, &payload, &options).await);
        }
        Commands::Show { id } => {
            return emit(&service::fetch(&store, id).await);
        }
        Commands::List { limit, offset } => {
            return emit(&service::list(&store, limit, offset).await);
        }
        Commands::Search { query, field } => {
            return emit(&service::search(&store, &query, field).await);
        }
        Commands::Delete { id } => {
            return emit(&service::remove(&store, id).await);
        }
        Commands::Report { id, out } => {
            let record = store
                .get(id)
                .await
                .with_context(|| format!("failed to load evaluation {id}"))?;
            std::fs::write(&out, report::build_report(&record))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { csv } => {
            let records = all_records(&store).await?;
            let written = report::write_csv(&records, &csv)?;
            info!(rows = written, path = %csv.display(), "exported evaluations");
            println!("Exported {written} evaluations to {}.", csv.display());
        }
        Commands::Stats => {
            let records = all_records(&store).await?;
            print_json(&report::summarize_records(&records))?;
        }
        Commands::Questions { .. } | Commands::Score { .. } => {}
    }

    Ok(ExitCode::SUCCESS)
}
