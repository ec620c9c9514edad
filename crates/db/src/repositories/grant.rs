//! One-time initial sick leave grant.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QuerySelect, Set, TransactionTrait,
    sea_query::LockType,
};
use tracing::info;
use uuid::Uuid;

use hourglass_core::leave::{InitialGrant, LeaveError, LedgerService};

use crate::entities::users;

use super::ledger::{RecordedTransaction, append_entry};

/// Repository for the initial sick leave grant.
#[derive(Debug, Clone)]
pub struct GrantRepository {
    db: DatabaseConnection,
}

impl GrantRepository {
    /// Creates a new grant repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Credits the initial SICK days and sets the user's flag, atomically.
    ///
    /// The user row stays locked from the flag read to the commit, so two
    /// concurrent grants for one user cannot both pass the check. The lock is
    /// `FOR NO KEY UPDATE`: ledger inserts take a foreign-key share lock on
    /// the same row while holding the SICK balance lock, and must not block.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The user does not exist
    /// - The grant was already performed
    /// - Database operation fails
    pub async fn grant_initial_sick_leave(
        &self,
        user_id: Uuid,
        recorded_by: Option<Uuid>,
    ) -> Result<RecordedTransaction, LeaveError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        let user = users::Entity::find_by_id(user_id)
            .lock(LockType::NoKeyUpdate)
            .one(&txn)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?
            .ok_or(LeaveError::UserNotFound(user_id))?;

        InitialGrant::check(user_id, user.initial_sick_leave_granted)?;

        let now = Utc::now();
        let entry = LedgerService::resolve(InitialGrant::entry(
            user_id,
            recorded_by,
            now.date_naive(),
        ))?;
        let recorded = append_entry(&txn, &entry, None).await?;

        let mut active: users::ActiveModel = user.into();
        active.initial_sick_leave_granted = Set(true);
        active.updated_at = Set(now.into());
        active
            .update(&txn)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        info!(
            user_id = %user_id,
            transaction_id = %recorded.transaction.id,
            days = %entry.days,
            "initial sick leave granted"
        );

        Ok(recorded)
    }
}
