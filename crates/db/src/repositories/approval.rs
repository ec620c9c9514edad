//! Approval repository for time-off request state transitions.
//!
//! Each transition locks the request row before reading its status, so a
//! request is decided at most once even under concurrent calls.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use hourglass_core::leave::{
    ApprovalAction, ApprovalRequestType, ApprovalService, ApprovalStatus, LeaveError,
    LeavePolicy, LedgerService, TimeOffDetails, TimeOffRequest,
};
use hourglass_shared::types::{ApprovalRequestId, ListLimit};

use crate::entities::{
    approval_requests, leave_balances, sea_orm_active_enums as db_enums, time_off_details, users,
};

use super::ledger::{RecordedTransaction, append_entry, lock_balance};

/// A request together with its time-off details.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalRecord {
    /// The request row.
    pub request: approval_requests::Model,
    /// The one-to-one details row.
    pub details: Option<time_off_details::Model>,
}

/// A listed request with its requester's display name.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalListItem {
    /// The request row.
    pub request: approval_requests::Model,
    /// The one-to-one details row.
    pub details: Option<time_off_details::Model>,
    /// Requester's full name.
    pub requester_name: Option<String>,
}

/// Result of approving a request.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalOutcome {
    /// The request, now APPROVED.
    pub request: approval_requests::Model,
    /// The USAGE transaction booked by the approval.
    pub transaction: RecordedTransaction,
}

/// Filter options for listing requests.
#[derive(Debug, Clone, Default)]
pub struct ApprovalFilter {
    /// Only this request type.
    pub request_type: Option<ApprovalRequestType>,
    /// Only this status.
    pub status: Option<ApprovalStatus>,
    /// Only requests submitted by this user.
    pub requested_by: Option<Uuid>,
    /// Only requests decided by this reviewer.
    pub reviewed_by: Option<Uuid>,
    /// Row cap.
    pub limit: ListLimit,
}

/// Approval repository for time-off requests.
#[derive(Debug, Clone)]
pub struct ApprovalRepository {
    db: DatabaseConnection,
}

impl ApprovalRepository {
    /// Creates a new approval repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Submits a time-off request in PENDING state.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The dates or amounts are invalid (nothing is written)
    /// - The requester does not exist
    /// - Database operation fails
    pub async fn create(
        &self,
        requested_by: Uuid,
        input: TimeOffRequest,
    ) -> Result<ApprovalRecord, LeaveError> {
        let class = ApprovalService::validate_request(&input)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        users::Entity::find_by_id(requested_by)
            .one(&txn)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?
            .ok_or(LeaveError::UserNotFound(requested_by))?;

        let now = Utc::now().into();
        let request_id = ApprovalRequestId::new().into_inner();

        let request = approval_requests::ActiveModel {
            id: Set(request_id),
            request_type: Set(db_enums::ApprovalRequestType::TimeOff),
            status: Set(db_enums::ApprovalStatus::Pending),
            requested_by: Set(requested_by),
            reviewed_by: Set(None),
            requester_note: Set(input.requester_note.filter(|n| !n.trim().is_empty())),
            approver_note: Set(None),
            submitted_at: Set(now),
            decided_at: Set(None),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| LeaveError::Database(e.to_string()))?;

        let details = time_off_details::ActiveModel {
            id: Set(Uuid::now_v7()),
            approval_request_id: Set(request_id),
            requested_type: Set(input.requested_type.into()),
            category: Set(class.category.into()),
            period_start: Set(input.period_start),
            period_end: Set(input.period_end),
            total_days: Set(input.total_days),
            partial_start_days: Set(input.partial_start_days),
            partial_end_days: Set(input.partial_end_days),
            override_balance: Set(input.override_balance),
        }
        .insert(&txn)
        .await
        .map_err(|e| LeaveError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        info!(
            request_id = %request_id,
            user_id = %requested_by,
            requested_type = %input.requested_type,
            total_days = %input.total_days,
            "time-off request submitted"
        );

        Ok(ApprovalRecord {
            request,
            details: Some(details),
        })
    }

    /// Cancels a pending request. Only the requester may cancel.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Request is not found
    /// - `actor` is not the requester
    /// - Request is not pending
    /// - Database operation fails
    pub async fn cancel(
        &self,
        request_id: Uuid,
        actor: Uuid,
    ) -> Result<approval_requests::Model, LeaveError> {
        let txn = self.begin().await?;
        let request = lock_request(&txn, request_id).await?;

        let action = ApprovalService::cancel(request.status.into(), request.requested_by, actor)?;
        let updated = apply_action(&txn, request, &action).await?;

        txn.commit()
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        info!(request_id = %request_id, user_id = %actor, "time-off request cancelled");
        Ok(updated)
    }

    /// Approves a pending request and books its USAGE transaction.
    ///
    /// The sufficiency check runs against the locked balance row unless the
    /// request overrides it or its type does not affect balance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Request is not found
    /// - Request is not pending
    /// - Request has no time-off details
    /// - Balance is insufficient
    /// - Database operation fails
    pub async fn approve(
        &self,
        request_id: Uuid,
        approved_by: Uuid,
        approver_note: Option<String>,
    ) -> Result<ApprovalOutcome, LeaveError> {
        let txn = self.begin().await?;
        let request = lock_request(&txn, request_id).await?;

        let action = ApprovalService::approve(request.status.into(), approved_by, approver_note)?;

        let row = time_off_details::Entity::find()
            .filter(time_off_details::Column::ApprovalRequestId.eq(request_id))
            .one(&txn)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?
            .ok_or(LeaveError::MissingDetails(request_id))?;
        let details = details_from_row(&row);
        let class = LeavePolicy::classify(details.requested_type);

        let locked: Option<leave_balances::Model> = if class.affects_balance {
            let balance = lock_balance(&txn, request.requested_by, class.category).await?;
            if ApprovalService::requires_balance_check(&details) {
                ApprovalService::ensure_sufficient(
                    class.category,
                    balance.balance,
                    details.total_days,
                )?;
            }
            Some(balance)
        } else {
            None
        };

        let entry = LedgerService::resolve(ApprovalService::usage_entry(
            request.requested_by,
            approved_by,
            &details,
            action.approver_note().map(str::to_owned),
        ))?;
        let transaction = append_entry(&txn, &entry, locked).await?;
        let request = apply_action(&txn, request, &action).await?;

        txn.commit()
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        info!(
            request_id = %request_id,
            approver_id = %approved_by,
            transaction_id = %transaction.transaction.id,
            days = %entry.days,
            affects_balance = entry.affects_balance,
            "time-off request approved"
        );

        Ok(ApprovalOutcome {
            request,
            transaction,
        })
    }

    /// Rejects a pending request. No balance effect.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Request is not found
    /// - Request is not pending
    /// - Database operation fails
    pub async fn reject(
        &self,
        request_id: Uuid,
        rejected_by: Uuid,
        approver_note: Option<String>,
    ) -> Result<approval_requests::Model, LeaveError> {
        let txn = self.begin().await?;
        let request = lock_request(&txn, request_id).await?;

        let action = ApprovalService::reject(request.status.into(), rejected_by, approver_note)?;
        let updated = apply_action(&txn, request, &action).await?;

        txn.commit()
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        info!(request_id = %request_id, approver_id = %rejected_by, "time-off request rejected");
        Ok(updated)
    }

    /// Finds a request with its details.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, request_id: Uuid) -> Result<Option<ApprovalRecord>, LeaveError> {
        let found = approval_requests::Entity::find_by_id(request_id)
            .find_also_related(time_off_details::Entity)
            .one(&self.db)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        Ok(found.map(|(request, details)| ApprovalRecord { request, details }))
    }

    /// Lists requests matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: &ApprovalFilter) -> Result<Vec<ApprovalListItem>, LeaveError> {
        let mut query = approval_requests::Entity::find();

        if let Some(request_type) = filter.request_type {
            query = query.filter(
                approval_requests::Column::RequestType
                    .eq(db_enums::ApprovalRequestType::from(request_type)),
            );
        }
        if let Some(status) = filter.status {
            query = query
                .filter(approval_requests::Column::Status.eq(db_enums::ApprovalStatus::from(status)));
        }
        if let Some(requested_by) = filter.requested_by {
            query = query.filter(approval_requests::Column::RequestedBy.eq(requested_by));
        }
        if let Some(reviewed_by) = filter.reviewed_by {
            query = query.filter(approval_requests::Column::ReviewedBy.eq(reviewed_by));
        }

        let requests = query
            .order_by_desc(approval_requests::Column::SubmittedAt)
            .limit(filter.limit.get())
            .all(&self.db)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let request_ids: Vec<Uuid> = requests.iter().map(|r| r.id).collect();
        let mut details: HashMap<Uuid, time_off_details::Model> = time_off_details::Entity::find()
            .filter(time_off_details::Column::ApprovalRequestId.is_in(request_ids))
            .all(&self.db)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?
            .into_iter()
            .map(|d| (d.approval_request_id, d))
            .collect();

        let mut requester_ids: Vec<Uuid> = requests.iter().map(|r| r.requested_by).collect();
        requester_ids.sort_unstable();
        requester_ids.dedup();
        let names: HashMap<Uuid, String> = users::Entity::find()
            .filter(users::Column::Id.is_in(requester_ids))
            .all(&self.db)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?
            .into_iter()
            .map(|u| (u.id, u.full_name))
            .collect();

        Ok(requests
            .into_iter()
            .map(|request| ApprovalListItem {
                details: details.remove(&request.id),
                requester_name: names.get(&request.requested_by).cloned(),
                request,
            })
            .collect())
    }

    async fn begin(&self) -> Result<DatabaseTransaction, LeaveError> {
        self.db
            .begin()
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))
    }
}

/// Loads a request and holds its row lock until the transaction ends.
async fn lock_request(
    txn: &DatabaseTransaction,
    request_id: Uuid,
) -> Result<approval_requests::Model, LeaveError> {
    approval_requests::Entity::find_by_id(request_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(|e| LeaveError::Database(e.to_string()))?
        .ok_or(LeaveError::RequestNotFound(request_id))
}

/// Persists the status change described by `action`.
async fn apply_action(
    txn: &DatabaseTransaction,
    request: approval_requests::Model,
    action: &ApprovalAction,
) -> Result<approval_requests::Model, LeaveError> {
    let mut active: approval_requests::ActiveModel = request.into();
    active.status = Set(action.new_status().into());
    active.reviewed_by = Set(action.reviewer());
    active.decided_at = Set(Some(action.decided_at().into()));
    if !matches!(action, ApprovalAction::Cancel { .. }) {
        active.approver_note = Set(action.approver_note().map(str::to_owned));
    }
    active.updated_at = Set(Utc::now().into());

    active
        .update(txn)
        .await
        .map_err(|e| LeaveError::Database(e.to_string()))
}

fn details_from_row(row: &time_off_details::Model) -> TimeOffDetails {
    TimeOffDetails {
        requested_type: row.requested_type.into(),
        period_start: row.period_start,
        period_end: row.period_end,
        total_days: row.total_days,
        override_balance: row.override_balance,
    }
}
