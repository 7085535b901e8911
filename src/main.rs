use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridsource::config::default_db_path;
use gridsource::domain::entities::dataset::DatasetId;
use gridsource::infra::sqlite::provider::SqliteProvider;
use gridsource::infra::sqlite::repo::SqliteRepo;
use gridsource::usecase::ports::repo::DatasetRepository;
use gridsource::usecase::request::RequestParameters;
use gridsource::usecase::services::data_source::DataSource;
use gridsource::usecase::services::import_service::ImportService;
use gridsource::usecase::services::query_service::QueryService;

/// Grid data source over locally stored datasets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQLite database path (defaults to the user data directory)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a CSV or spreadsheet file as a new dataset
    Import {
        file: PathBuf,

        /// Worksheet to read (spreadsheets only, defaults to the first)
        #[arg(long)]
        sheet: Option<String>,
    },
    /// List stored datasets
    List,
    /// Delete a dataset and all of its rows
    Remove { id: i64 },
    /// Answer one grid request, e.g. "skip=0&take=10&sort[0][field]=name&sort[0][dir]=asc"
    Query { id: i64, query: String },
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("gridsource={}", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let db_path = match args.db {
        Some(path) => path,
        None => default_db_path()?,
    };
    info!(db = %db_path.display(), "using dataset store");

    let repo = Arc::new(SqliteRepo::new(db_path.clone()));
    repo.init().context("failed to initialize dataset store")?;

    match args.command {
        Command::Import { file, sheet } => {
            let result = ImportService::new(repo).import(&file, sheet.as_deref())?;
            println!(
                "imported dataset {} ({} rows)",
                result.dataset_id, result.row_count
            );
        }
        Command::List => {
            for dataset in QueryService::new(repo).list_datasets()? {
                println!(
                    "{}\t{}\t{}\t{}",
                    dataset.id.0, dataset.name, dataset.row_count, dataset.source_path
                );
            }
        }
        Command::Remove { id } => {
            QueryService::new(repo).purge_dataset(DatasetId(id))?;
            println!("removed dataset #{id}");
        }
        Command::Query { id, query } => {
            let dataset_id = DatasetId(id);
            let columns = QueryService::new(repo).grid_columns(dataset_id)?;
            let provider = SqliteProvider::open(&db_path, dataset_id)?;
            let mut source = DataSource::new(columns, provider);

            let response = source.handle_request(&RequestParameters::parse(&query))?;
            info!(content_type = %response.content_type, "request answered");
            println!("{}", response.body);
        }
    }

    Ok(())
}
