use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::build_router;
use axum_prometheus::PrometheusMetricLayer;
use job_tracker::applications::{
    InMemoryJobApplicationRepository, JobApplicationRepository, JobApplicationService,
    PgJobApplicationRepository,
};
use job_tracker::config::AppConfig;
use job_tracker::db;
use job_tracker::error::AppError;
use job_tracker::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let repository: Arc<dyn JobApplicationRepository> = if args.in_memory {
        warn!("using in-memory store, records are lost on shutdown");
        Arc::new(InMemoryJobApplicationRepository::default())
    } else {
        let pool = db::connect(&config.database).await?;
        if args.migrate {
            db::run_migrations(&pool).await?;
        }
        Arc::new(PgJobApplicationRepository::new(pool))
    };
    let service = Arc::new(JobApplicationService::new(repository));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let docs_enabled = config.environment.api_docs_enabled();
    let app = build_router(service, app_state, docs_enabled).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, docs_enabled, "job tracker ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(readiness_flag))
        .await?;
    info!("job tracker stopped");
    Ok(())
}

pub(crate) async fn migrate() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let pool = db::connect(&config.database).await?;
    db::run_migrations(&pool).await?;
    pool.close().await;
    Ok(())
}

async fn shutdown_signal(readiness: Arc<AtomicBool>) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    readiness.store(false, Ordering::Release);
    info!("shutdown signal received, draining connections");
}
