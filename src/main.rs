//! hr-admin: serve the HR administration API or run the monthly payroll.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hr_admin::api::{AppState, create_router};
use hr_admin::config::{ConfigLoader, DEFAULT_CONFIG_DIR};
use hr_admin::payroll::{PayrollEngine, previous_month};
use hr_admin::store::{MemoryStore, Seed};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "hr-admin")]
#[command(version)]
#[command(about = "HR administration: directory, attendance, leave approvals and payroll", long_about = None)]
struct Cli {
    /// Directory holding payroll.yaml and server.yaml
    #[arg(short, long, default_value = DEFAULT_CONFIG_DIR)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the REST API
    Serve {
        /// Seed file loaded into the store at startup
        #[arg(short, long)]
        seed: Option<PathBuf>,

        /// Listen address; overrides server.yaml
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Run the monthly payroll once and print the report as JSON
    Payroll {
        /// Seed file providing employees, positions and attendance
        #[arg(short, long)]
        seed: PathBuf,

        /// Target month (1-12); defaults to the previous month
        #[arg(short, long, requires = "year")]
        month: Option<u32>,

        /// Target year; defaults to the year of the previous month
        #[arg(short, long, requires = "month")]
        year: Option<i32>,
    },
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn seeded_store(seed: Option<&PathBuf>) -> Result<Arc<MemoryStore>, BoxError> {
    let store = Arc::new(MemoryStore::new());
    if let Some(path) = seed {
        Seed::load(path)?.apply(&store)?;
    }
    Ok(store)
}

async fn serve(
    config: ConfigLoader,
    seed: Option<PathBuf>,
    bind: Option<String>,
) -> Result<(), BoxError> {
    let store = seeded_store(seed.as_ref())?;
    let addr = bind.unwrap_or_else(|| config.server().bind_address.clone());
    let router = create_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "hr-admin listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}

fn run_payroll(
    config: ConfigLoader,
    seed: PathBuf,
    period: Option<(u32, i32)>,
) -> Result<(), BoxError> {
    let store = seeded_store(Some(&seed))?;
    let (month, year) = period.unwrap_or_else(|| previous_month(Utc::now().date_naive()));

    let engine = PayrollEngine::new(
        store.clone(),
        store.clone(),
        store,
        config.payroll().clone(),
    );
    let report = engine.run_monthly_payroll(month, year)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    let config = ConfigLoader::load(&cli.config)?;
    init_tracing(&config.server().log_filter);

    match cli.command {
        Commands::Serve { seed, bind } => serve(config, seed, bind).await,
        Commands::Payroll { seed, month, year } => {
            let period = month.zip(year);
            run_payroll(config, seed, period)
        }
    }
}
