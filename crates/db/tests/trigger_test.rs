//! Database trigger tests.
//!
//! The ledger is append-only and decided requests are final, whatever code
//! path touches the tables.

mod common;

use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use hourglass_core::leave::{EntryKind, LeaveRequestType, RecordEntry, TimeOffRequest};
use hourglass_db::{
    ApprovalRepository, LedgerRepository,
    entities::{approval_requests, leave_transactions, sea_orm_active_enums::ApprovalStatus},
};

use common::{connect, create_user, date};

#[tokio::test]
async fn test_leave_transactions_reject_update_and_delete() {
    let Some(db) = connect().await else { return };
    let Some(user) = create_user(&db, "Immutable", Some(date(2024, 1, 1))).await else {
        return;
    };

    let recorded = LedgerRepository::new(db.clone())
        .record_transaction(RecordEntry {
            user_id: user.id,
            recorded_by: None,
            requested_type: LeaveRequestType::Vacation,
            kind: EntryKind::Accrual,
            days: dec!(1),
            effective_date: date(2025, 1, 1),
            period_start: None,
            period_end: None,
            note: None,
        })
        .await
        .unwrap();

    let mut active: leave_transactions::ActiveModel = recorded.transaction.clone().into();
    active.days = Set(dec!(100));
    assert!(active.update(&db).await.is_err());

    let deleted = leave_transactions::Entity::delete_by_id(recorded.transaction.id)
        .exec(&db)
        .await;
    assert!(deleted.is_err());

    let stored = leave_transactions::Entity::find_by_id(recorded.transaction.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.days, dec!(1));
}

#[tokio::test]
async fn test_decided_request_status_is_final() {
    let Some(db) = connect().await else { return };
    let Some(user) = create_user(&db, "Final", Some(date(2024, 1, 1))).await else {
        return;
    };

    let approvals = ApprovalRepository::new(db.clone());
    let created = approvals
        .create(
            user.id,
            TimeOffRequest {
                requested_type: LeaveRequestType::Vacation,
                period_start: date(2025, 7, 1),
                period_end: date(2025, 7, 1),
                total_days: dec!(1),
                partial_start_days: None,
                partial_end_days: None,
                requester_note: None,
                override_balance: false,
            },
        )
        .await
        .unwrap();
    let cancelled = approvals.cancel(created.request.id, user.id).await.unwrap();

    let mut active: approval_requests::ActiveModel = cancelled.into();
    active.status = Set(ApprovalStatus::Pending);
    assert!(active.update(&db).await.is_err());
}
