//! Admin time-off routes: decisions, manual ledger entries, accrual and the
//! initial grant.
//!
//! Every handler checks the admin role before touching storage.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use hourglass_core::leave::{
    AccrualMonth, AccrualPolicy, ApprovalRequestType, ApprovalStatus, EntryKind, LeaveCategory,
    LeaveRequestType, RecordEntry,
};
use hourglass_db::{
    AccrualRepository, ApprovalRepository, GrantRepository, LedgerRepository,
    repositories::{ApprovalFilter, TransactionFilter},
};
use hourglass_shared::types::ListLimit;

use super::{parse_list, parse_opt};
use crate::{
    ApiError, AppState,
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::AuthUser,
};

/// Creates the admin time-off routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/time-off/requests", get(list_requests))
        .route("/admin/time-off/requests/{request_id}/approve", post(approve_request))
        .route("/admin/time-off/requests/{request_id}/reject", post(reject_request))
        .route("/admin/time-off/users/{user_id}/summary", get(user_summary))
        .route("/admin/time-off/transactions", get(list_transactions).post(record_transaction))
        .route("/admin/time-off/accrual", post(run_accrual))
        .route("/admin/time-off/grant-initial-sick-leave", post(grant_initial_sick_leave))
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for listing requests.
#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    /// Filter by request type.
    pub request_type: Option<String>,
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by requester.
    pub requested_by: Option<Uuid>,
    /// Filter by reviewer.
    pub reviewed_by: Option<Uuid>,
    /// Row cap (default 50).
    pub limit: Option<u64>,
}

/// Body for approve and reject.
#[derive(Debug, Default, Deserialize)]
pub struct DecisionRequest {
    /// Note from the approver.
    #[serde(default)]
    pub approver_note: Option<String>,
}

/// Query parameters for a user's summary.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Recent transaction cap (default 25).
    pub limit: Option<u64>,
    /// Comma-separated entry kinds.
    pub kinds: Option<String>,
}

/// Query parameters for listing ledger transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by user.
    pub user_id: Option<Uuid>,
    /// Filter by stored category.
    pub category: Option<String>,
    /// Filter by requested type.
    pub requested_type: Option<String>,
    /// Comma-separated entry kinds.
    pub kinds: Option<String>,
    /// Inclusive lower bound on the effective date (YYYY-MM-DD).
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the effective date (YYYY-MM-DD).
    pub end_date: Option<NaiveDate>,
    /// Row cap (default 50).
    pub limit: Option<u64>,
}

/// Body for recording a manual transaction.
#[derive(Debug, Deserialize)]
pub struct RecordTransactionRequest {
    /// Owner of the transaction.
    pub user_id: Uuid,
    /// Reason for leave.
    pub requested_type: LeaveRequestType,
    /// Entry kind.
    pub kind: EntryKind,
    /// Caller-supplied amount; USAGE amounts are negated when stored.
    pub days: Decimal,
    /// Effective date.
    pub effective_date: NaiveDate,
    /// Optional period start.
    #[serde(default)]
    pub period_start: Option<NaiveDate>,
    /// Optional period end.
    #[serde(default)]
    pub period_end: Option<NaiveDate>,
    /// Optional note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Body for an accrual run.
#[derive(Debug, Default, Deserialize)]
pub struct AccrualRequest {
    /// Target month, `YYYY-MM`; defaults to the current UTC month.
    #[serde(default)]
    pub month: Option<String>,
    /// Days per category; defaults to the configured amount.
    #[serde(default)]
    pub amount_per_category: Option<Decimal>,
}

/// Body for the initial sick leave grant.
#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    /// User receiving the grant.
    pub user_id: Uuid,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET `/admin/time-off/requests` - List requests, newest first.
async fn list_requests(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListRequestsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    let filter = ApprovalFilter {
        request_type: parse_opt(
            query.request_type.as_deref(),
            "request type",
            ApprovalRequestType::parse,
        )?,
        status: parse_opt(query.status.as_deref(), "status", ApprovalStatus::parse)?,
        requested_by: query.requested_by,
        reviewed_by: query.reviewed_by,
        limit: ListLimit::or_default(query.limit, ListLimit::DEFAULT),
    };

    let requests = ApprovalRepository::new((*state.db).clone())
        .list(&filter)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "requests": requests }))))
}

/// POST `/admin/time-off/requests/{request_id}/approve` - Approve and debit.
async fn approve_request(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(request_id): ApiPath<Uuid>,
    payload: Option<ApiJson<DecisionRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;
    let payload = payload.map(|ApiJson(p)| p).unwrap_or_default();

    let outcome = ApprovalRepository::new((*state.db).clone())
        .approve(request_id, auth.user_id(), payload.approver_note)
        .await?;

    Ok((StatusCode::OK, Json(outcome)))
}

/// POST `/admin/time-off/requests/{request_id}/reject` - Reject a request.
async fn reject_request(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(request_id): ApiPath<Uuid>,
    payload: Option<ApiJson<DecisionRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;
    let payload = payload.map(|ApiJson(p)| p).unwrap_or_default();

    let request = ApprovalRepository::new((*state.db).clone())
        .reject(request_id, auth.user_id(), payload.approver_note)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "request": request }))))
}

/// GET `/admin/time-off/users/{user_id}/summary` - A user's balances and
/// recent transactions.
async fn user_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<SummaryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;
    let kinds = parse_list(query.kinds.as_deref(), "kind", EntryKind::parse)?;

    let summary = LedgerRepository::new((*state.db).clone())
        .summary_for_user(
            user_id,
            ListLimit::or_default(query.limit, ListLimit::SUMMARY),
            kinds,
        )
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}

/// GET `/admin/time-off/transactions` - Query the ledger.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListTransactionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    let filter = TransactionFilter {
        user_id: query.user_id,
        category: parse_opt(query.category.as_deref(), "category", LeaveCategory::parse)?,
        requested_type: parse_opt(
            query.requested_type.as_deref(),
            "requested type",
            LeaveRequestType::parse,
        )?,
        kinds: parse_list(query.kinds.as_deref(), "kind", EntryKind::parse)?,
        start_date: query.start_date,
        end_date: query.end_date,
        limit: ListLimit::or_default(query.limit, ListLimit::DEFAULT),
    };

    let transactions = LedgerRepository::new((*state.db).clone())
        .list_transactions(&filter)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "transactions": transactions }))))
}

/// POST `/admin/time-off/transactions` - Record a manual transaction.
async fn record_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<RecordTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    let entry = RecordEntry {
        user_id: payload.user_id,
        recorded_by: Some(auth.user_id()),
        requested_type: payload.requested_type,
        kind: payload.kind,
        days: payload.days,
        effective_date: payload.effective_date,
        period_start: payload.period_start,
        period_end: payload.period_end,
        note: payload.note,
    };

    let recorded = LedgerRepository::new((*state.db).clone())
        .record_transaction(entry)
        .await?;

    Ok((StatusCode::CREATED, Json(recorded)))
}

/// POST `/admin/time-off/accrual` - Run the monthly accrual.
async fn run_accrual(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Option<ApiJson<AccrualRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;
    let payload = payload.map(|ApiJson(p)| p).unwrap_or_default();

    let month = match payload.month.as_deref() {
        Some(raw) => AccrualMonth::parse(raw)?,
        None => AccrualMonth::containing(Utc::now().date_naive()),
    };
    let policy = AccrualPolicy::new(
        payload
            .amount_per_category
            .unwrap_or(state.leave.default_accrual_days),
        state.leave.min_worked_days,
    )?;

    let summary = AccrualRepository::new((*state.db).clone())
        .accrue_monthly(month, policy, Some(auth.user_id()))
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}

/// POST `/admin/time-off/grant-initial-sick-leave` - One-time SICK grant.
async fn grant_initial_sick_leave(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<GrantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    let recorded = GrantRepository::new((*state.db).clone())
        .grant_initial_sick_leave(payload.user_id, Some(auth.user_id()))
        .await?;

    Ok((StatusCode::CREATED, Json(recorded)))
}
