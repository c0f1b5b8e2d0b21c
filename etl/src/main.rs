//! Scheduled random user ETL entry-point.
//!
//! Loads database settings, wires the HTTP source and the Diesel loader into
//! the pipeline, then runs it immediately and once per UTC day until
//! interrupted.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{Context, Result};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use reqwest::Url;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use random_user_etl::config::DatabaseSettings;
use random_user_etl::domain::RandomUserPipeline;
use random_user_etl::domain::scheduler::{RetryPolicy, ScheduledRunner};
use random_user_etl::outbound::persistence::DieselRandomUserRepository;
use random_user_etl::outbound::random_user::{DEFAULT_ENDPOINT, RandomUserHttpSource};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = DatabaseSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load database settings")?;
    info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.database,
        "starting random user ETL"
    );

    let endpoint = Url::parse(DEFAULT_ENDPOINT).wrap_err("invalid source endpoint")?;
    let source = RandomUserHttpSource::new(endpoint, HTTP_TIMEOUT)
        .wrap_err("failed to build HTTP client")?;
    let repository = DieselRandomUserRepository::connect(&settings)
        .await
        .wrap_err("failed to build database pool")?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let pipeline = RandomUserPipeline::new(
        Arc::new(source),
        Arc::new(repository),
        Arc::clone(&clock),
    );

    let runner = ScheduledRunner::new(Arc::new(pipeline), clock, RetryPolicy::default());
    runner
        .run_until(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!(%error, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await;
    Ok(())
}
