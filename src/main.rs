use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use vitrine::application::ports::JobRepository;
use vitrine::application::services::{
    PipelineService, RateGate, ScrapeService, StructuringService,
};
use vitrine::infrastructure::llm::AnthropicClient;
use vitrine::infrastructure::observability::{TracingConfig, init_tracing};
use vitrine::infrastructure::persistence::{
    InMemoryJobRepository, PgJobRepository, create_pool, run_migrations,
};
use vitrine::infrastructure::scraping::FirecrawlClient;
use vitrine::presentation::config::DatabaseProvider;
use vitrine::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(environment, &settings.logging));

    if settings.scraper.api_key.is_empty() {
        tracing::warn!("Scraper API key is not set; scrape requests will be rejected upstream");
    }
    if settings.llm.api_key.is_empty() {
        tracing::warn!("LLM API key is not set; process requests will be rejected upstream");
    }

    let (job_repository, pool) = match settings.database.provider {
        DatabaseProvider::Postgres => {
            let pool = create_pool(&settings.database.url, settings.database.max_connections)
                .await
                .context("Failed to connect to database")?;
            if settings.database.run_migrations {
                run_migrations(&pool).await?;
            }
            let repository: Arc<dyn JobRepository> = Arc::new(PgJobRepository::new(pool.clone()));
            (repository, Some(pool))
        }
        DatabaseProvider::Memory => {
            tracing::warn!("Using in-memory job store; jobs are lost on restart");
            let repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
            (repository, None)
        }
    };

    let scraper = Arc::new(FirecrawlClient::from_settings(&settings.scraper)?);
    let llm_client = Arc::new(AnthropicClient::from_settings(&settings.llm)?);
    let rate_gate = Arc::new(RateGate::new(settings.rate_limit.gate_config()));

    tracing::info!(
        capacity = rate_gate.capacity(),
        window_secs = rate_gate.window().as_secs(),
        "Rate gate configured"
    );

    let pipeline_service = Arc::new(PipelineService::new(
        job_repository,
        ScrapeService::new(scraper),
        StructuringService::new(llm_client, rate_gate),
    ));

    let router = create_router(AppState::new(pipeline_service));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
