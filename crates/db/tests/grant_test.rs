//! Integration tests for the initial sick leave grant.

mod common;

use rust_decimal_macros::dec;
use uuid::Uuid;

use hourglass_core::leave::{INITIAL_GRANT_NOTE, LeaveError};
use hourglass_db::{
    GrantRepository, LedgerRepository, UserRepository,
    entities::sea_orm_active_enums::{LeaveCategory as DbCategory, LeaveEntryKind},
};

use common::{connect, create_user, date};

#[tokio::test]
async fn test_initial_grant_is_one_time() {
    let Some(db) = connect().await else { return };
    let Some(user) = create_user(&db, "Grant", Some(date(2024, 1, 1))).await else {
        return;
    };
    let Some(admin) = create_user(&db, "Admin", None).await else {
        return;
    };

    let grants = GrantRepository::new(db.clone());
    let ledger = LedgerRepository::new(db.clone());

    let recorded = grants
        .grant_initial_sick_leave(user.id, Some(admin.id))
        .await
        .unwrap();
    assert_eq!(recorded.transaction.kind, LeaveEntryKind::Adjustment);
    assert_eq!(recorded.transaction.category, DbCategory::Sick);
    assert_eq!(recorded.transaction.days, dec!(10));
    assert_eq!(recorded.transaction.recorded_by, Some(admin.id));
    assert_eq!(recorded.transaction.note.as_deref(), Some(INITIAL_GRANT_NOTE));

    let reloaded = UserRepository::new(db.clone())
        .find_by_id(user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(reloaded.initial_sick_leave_granted);

    let second = grants.grant_initial_sick_leave(user.id, Some(admin.id)).await;
    assert!(matches!(second, Err(LeaveError::AlreadyGranted(id)) if id == user.id));

    let balances = ledger.balances(user.id).await.unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].balance, dec!(10));
}

#[tokio::test]
async fn test_grant_for_unknown_user_is_not_found() {
    let Some(db) = connect().await else { return };
    let missing = Uuid::now_v7();

    match GrantRepository::new(db.clone())
        .grant_initial_sick_leave(missing, None)
        .await
    {
        Err(LeaveError::UserNotFound(id)) => assert_eq!(id, missing),
        Err(LeaveError::Database(e)) => eprintln!("Skipping test - database error: {e}"),
        other => panic!("expected UserNotFound, got {other:?}"),
    }
}
