use crate::infra::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use job_portal::config::FormsConfig;
use job_portal::forms::{form_router, FormService, IntakePolicy};
use job_portal::plans::plan_router;
use job_portal::storage::{SqliteFormRepository, SqlitePlanRepository, SqlitePostingRepository};
use serde_json::json;
use sqlx::SqlitePool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Form, plan and probe routes over a shared SQLite pool.
pub(crate) fn application_routes(pool: SqlitePool, forms: &FormsConfig) -> Router {
    let policy = IntakePolicy {
        require_existing_posting: forms.require_existing_posting,
    };
    let form_service = Arc::new(FormService::new(
        Arc::new(SqliteFormRepository::new(pool.clone())),
        Arc::new(SqlitePostingRepository::new(pool.clone())),
        policy,
    ));
    let plans = Arc::new(SqlitePlanRepository::new(pool));

    form_router(form_service)
        .merge(plan_router(plans))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(DefaultBodyLimit::max(forms.max_upload_bytes))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
