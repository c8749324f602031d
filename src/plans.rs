//! Named plans looked up by their unique name.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;
use crate::forms::repository::RepositoryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
}

#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<Plan>, RepositoryError>;
}

pub fn plan_router<P>(plans: Arc<P>) -> Router
where
    P: PlanRepository + 'static,
{
    Router::new()
        .route("/api/plans/:name", get(plan_handler::<P>))
        .with_state(plans)
}

pub(crate) async fn plan_handler<P>(
    State(plans): State<Arc<P>>,
    Path(name): Path<String>,
) -> Result<Response, AppError>
where
    P: PlanRepository + 'static,
{
    match plans.find_by_name(&name).await? {
        Some(plan) => Ok((StatusCode::OK, Json(plan)).into_response()),
        None => {
            tracing::warn!(plan = %name, "no plan with that name");
            let payload = json!({ "error": format!("plan '{name}' not found") });
            Ok((StatusCode::NOT_FOUND, Json(payload)).into_response())
        }
    }
}
