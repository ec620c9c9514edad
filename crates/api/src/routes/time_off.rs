//! Self-service time-off routes.
//!
//! Every handler acts on the authenticated caller; no admin role needed.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use hourglass_core::leave::{ApprovalStatus, EntryKind, TimeOffRequest};
use hourglass_db::{
    ApprovalRepository, LedgerRepository,
    repositories::ApprovalFilter,
};
use hourglass_shared::types::ListLimit;

use super::{parse_list, parse_opt};
use crate::{
    ApiError, AppState,
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::AuthUser,
};

/// Creates the self-service time-off routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/time-off/me", get(my_summary))
        .route("/time-off/requests", get(list_my_requests).post(create_request))
        .route("/time-off/requests/{request_id}/cancel", post(cancel_request))
}

/// Query parameters for the caller's summary.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Recent transaction cap (default 25).
    pub limit: Option<u64>,
    /// Comma-separated entry kinds.
    pub kinds: Option<String>,
}

/// Query parameters for the caller's requests.
#[derive(Debug, Deserialize)]
pub struct MyRequestsQuery {
    /// Filter by status.
    pub status: Option<String>,
    /// Row cap (default 50).
    pub limit: Option<u64>,
}

/// GET `/time-off/me` - Balances and recent transactions of the caller.
async fn my_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<SummaryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let kinds = parse_list(query.kinds.as_deref(), "kind", EntryKind::parse)?;
    let limit = ListLimit::or_default(query.limit, ListLimit::SUMMARY);

    let summary = LedgerRepository::new((*state.db).clone())
        .summary_for_user(auth.user_id(), limit, kinds)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}

/// GET `/time-off/requests` - The caller's own requests, newest first.
async fn list_my_requests(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<MyRequestsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = parse_opt(query.status.as_deref(), "status", ApprovalStatus::parse)?;

    let requests = ApprovalRepository::new((*state.db).clone())
        .list(&ApprovalFilter {
            status,
            requested_by: Some(auth.user_id()),
            limit: ListLimit::or_default(query.limit, ListLimit::DEFAULT),
            ..ApprovalFilter::default()
        })
        .await?;

    Ok((StatusCode::OK, Json(json!({ "requests": requests }))))
}

/// POST `/time-off/requests` - Submit a request.
async fn create_request(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<TimeOffRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = ApprovalRepository::new((*state.db).clone())
        .create(auth.user_id(), payload)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// POST `/time-off/requests/{request_id}/cancel` - Withdraw a pending request.
async fn cancel_request(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(request_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let request = ApprovalRepository::new((*state.db).clone())
        .cancel(request_id, auth.user_id())
        .await?;

    Ok((StatusCode::OK, Json(json!({ "request": request }))))
}
