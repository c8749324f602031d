use crate::cli::{MigrateArgs, ServeArgs};
use crate::infra::{shutdown_signal, AppState};
use crate::routes::application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_portal::config::AppConfig;
use job_portal::error::AppError;
use job_portal::{storage, telemetry};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(url) = args.database_url.take() {
        config.database.url = url;
    }

    telemetry::init(&config.telemetry)?;

    let pool = storage::connect(&config.database).await?;
    storage::initialize(&pool).await?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = application_routes(pool.clone(), &config.forms)
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, database = %config.database.url, "job portal api ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    readiness_flag.store(false, Ordering::Release);
    pool.close().await;
    info!("job portal api stopped");
    Ok(())
}

pub(crate) async fn migrate(mut args: MigrateArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(url) = args.database_url.take() {
        config.database.url = url;
    }

    telemetry::init(&config.telemetry)?;

    let pool = storage::connect(&config.database).await?;
    storage::initialize(&pool).await?;
    pool.close().await;

    info!(database = %config.database.url, "database schema is up to date");
    Ok(())
}
