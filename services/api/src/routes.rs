use crate::infra::{deserialize_optional_date, AppState};
use applicant_audit::downstream::{DownstreamGateway, DownstreamService};
use applicant_audit::error::AppError;
use applicant_audit::profile::{AuditService, ProfileAudit, ProfileStore, RiskReport};
use applicant_audit::remote::RemoteValidator;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub(crate) struct ApiState<S, V, G> {
    pub(crate) service: Arc<AuditService<S, V>>,
    pub(crate) gateway: Arc<G>,
}

impl<S, V, G> Clone for ApiState<S, V, G> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            gateway: Arc::clone(&self.gateway),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuditQuery {
    pub(crate) id: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn with_audit_routes<S, V, G>(
    service: Arc<AuditService<S, V>>,
    gateway: Arc<G>,
) -> axum::Router
where
    S: ProfileStore + 'static,
    V: RemoteValidator + 'static,
    G: DownstreamGateway + 'static,
{
    let state = ApiState { service, gateway };

    axum::Router::new()
        .route("/api/v1/profile", get(audit_endpoint))
        .route("/api/v1/profile/risk", get(risk_endpoint))
        .route("/api/v1/scoring/:service", post(scoring_endpoint))
        .with_state(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
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

pub(crate) async fn audit_endpoint<S, V, G>(
    State(state): State<ApiState<S, V, G>>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<ProfileAudit>, AppError>
where
    S: ProfileStore + 'static,
    V: RemoteValidator + 'static,
{
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    let audit = state.service.audit_profile(&query.id, today).await?;
    Ok(Json(audit))
}

pub(crate) async fn risk_endpoint<S, V, G>(
    State(state): State<ApiState<S, V, G>>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<RiskReport>, AppError>
where
    S: ProfileStore + 'static,
    V: RemoteValidator + 'static,
{
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    let report = state.service.risk(&query.id, today)?;
    Ok(Json(report))
}

pub(crate) async fn scoring_endpoint<S, V, G>(
    State(state): State<ApiState<S, V, G>>,
    Path(slug): Path<String>,
    Json(body): Json<Value>,
) -> Response
where
    G: DownstreamGateway + 'static,
{
    let Some(service) = DownstreamService::from_slug(&slug) else {
        let payload = json!({ "error": format!("unknown downstream service '{slug}'") });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    };

    match state.gateway.forward(service, body).await {
        Ok(value) => Json(value).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
