use clap::{Parser, Subcommand};
use role_scout::config::{Backend, DirectorySettings, LoggingSettings, Settings};
use role_scout::core::{
    watch_interrupts, Orchestrator, PipelineError, RateLimiter, ValidationHarness,
};
use role_scout::services::{
    DirectoryClient, DirectoryError, EnrichmentClient, ResultStore, SearchClient,
    SimulatedDirectory,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "role-scout")]
#[command(about = "Sweep a people directory for role x industry x location matches", version)]
struct Cli {
    /// Extra configuration file layered over config/default.toml
    #[arg(short, long, env = "SCOUT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, Default)]
enum Command {
    /// Run the full search pipeline (default)
    #[default]
    Run,
    /// Smoke-test the directory clients and the relevance filter
    Validate,
}

type Clients = (Arc<dyn SearchClient>, Arc<dyn EnrichmentClient>);

fn init_tracing(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn build_clients(settings: &DirectorySettings) -> Result<Clients, DirectoryError> {
    match settings.backend {
        Backend::Http => {
            let client = Arc::new(DirectoryClient::from_settings(settings)?);
            info!("Directory client initialized ({})", settings.base_url);
            let search: Arc<dyn SearchClient> = client.clone();
            let enrichment: Arc<dyn EnrichmentClient> = client;
            Ok((search, enrichment))
        }
        Backend::Simulated => {
            warn!("Using the simulated directory; results are sample data");
            let directory = Arc::new(SimulatedDirectory::new());
            let search: Arc<dyn SearchClient> = directory.clone();
            let enrichment: Arc<dyn EnrichmentClient> = directory;
            Ok((search, enrichment))
        }
    }
}

async fn run_pipeline(settings: &Settings, (search, enrichment): Clients) -> ExitCode {
    let orchestrator = Orchestrator::from_settings(settings, search, enrichment);

    let stop = orchestrator.stop_flag();
    tokio::spawn(async move {
        if watch_interrupts(&stop, tokio::signal::ctrl_c).await {
            std::process::exit(130);
        }
    });

    match orchestrator.run().await {
        Ok(result) => {
            info!(
                "Run finished with {} matches written to {}",
                result.totals.matches, settings.output.results_file
            );
            ExitCode::SUCCESS
        }
        Err(e @ PipelineError::Configuration(_)) => {
            error!("{}", e);
            ExitCode::from(2)
        }
        Err(e @ PipelineError::Persistence(_)) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_validation(settings: &Settings, (search, enrichment): Clients) -> ExitCode {
    let harness = ValidationHarness::new(
        settings.criteria.clone(),
        search,
        enrichment,
        Arc::new(RateLimiter::new(
            settings.throttle.search_interval(),
            settings.throttle.enrichment_interval(),
        )),
        ResultStore::new(
            &settings.output.validation_results_file,
            &settings.output.validation_log_file,
        ),
    );

    match harness.run().await {
        Ok(report) if report.overall_success => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("Failed to persist validation output: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing(&LoggingSettings::default());
            error!("Configuration error: {}", e);
            return ExitCode::from(2);
        }
    };

    init_tracing(&settings.logging);
    info!("Configuration loaded successfully");

    let clients = match build_clients(&settings.directory) {
        Ok(clients) => clients,
        Err(e) => {
            error!("Failed to create directory client: {}", e);
            return ExitCode::from(2);
        }
    };

    match cli.command.unwrap_or_default() {
        Command::Run => run_pipeline(&settings, clients).await,
        Command::Validate => run_validation(&settings, clients).await,
    }
}
