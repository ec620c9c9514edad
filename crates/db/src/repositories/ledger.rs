//! Ledger repository: leave balances and the append-only transaction log.
//!
//! Every balance mutation in the crate goes through [`append_entry`], which
//! keeps `leave_balances` equal to the sum of balance-affecting rows in
//! `leave_transactions`. Callers own the database transaction.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::OnConflict,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use hourglass_core::leave::{
    EntryKind, LeaveCategory, LeaveError, LeaveRequestType, LedgerService, RecordEntry,
    ResolvedEntry,
};
use hourglass_shared::types::{LeaveTransactionId, ListLimit};

use crate::entities::{
    leave_balances, leave_transactions, sea_orm_active_enums as db_enums, users,
};

/// Filter options for listing ledger transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only this user's transactions.
    pub user_id: Option<Uuid>,
    /// Only this stored category.
    pub category: Option<LeaveCategory>,
    /// Only this requested leave type.
    pub requested_type: Option<LeaveRequestType>,
    /// Only these kinds; empty means all.
    pub kinds: Vec<EntryKind>,
    /// Inclusive lower bound on the effective date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the effective date.
    pub end_date: Option<NaiveDate>,
    /// Row cap.
    pub limit: ListLimit,
}

/// A user's balances together with their most recent transactions.
#[derive(Debug, Clone, Serialize)]
pub struct UserLeaveSummary {
    /// One row per tracked category the user has touched.
    pub balances: Vec<leave_balances::Model>,
    /// Newest first.
    pub transactions: Vec<leave_transactions::Model>,
}

/// A committed ledger write.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedTransaction {
    /// The inserted transaction row.
    pub transaction: leave_transactions::Model,
    /// Balance after the write; absent when the entry does not affect balance.
    pub balance: Option<leave_balances::Model>,
}

/// Ensures the balance row exists, then locks it for the rest of the
/// enclosing transaction.
pub(crate) async fn lock_balance<C>(
    conn: &C,
    user_id: Uuid,
    category: LeaveCategory,
) -> Result<leave_balances::Model, LeaveError>
where
    C: ConnectionTrait,
{
    let now = Utc::now().into();
    let seed = leave_balances::ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(user_id),
        category: Set(category.into()),
        balance: Set(Decimal::ZERO),
        created_at: Set(now),
        updated_at: Set(now),
    };

    leave_balances::Entity::insert(seed)
        .on_conflict(
            OnConflict::columns([
                leave_balances::Column::UserId,
                leave_balances::Column::Category,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(|e| LeaveError::Database(e.to_string()))?;

    leave_balances::Entity::find()
        .filter(leave_balances::Column::UserId.eq(user_id))
        .filter(leave_balances::Column::Category.eq(db_enums::LeaveCategory::from(category)))
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(|e| LeaveError::Database(e.to_string()))?
        .ok_or_else(|| LeaveError::Database(format!("balance row missing for user {user_id}")))
}

/// Writes one resolved entry: moves the balance when the entry affects it,
/// then appends the transaction row.
///
/// Pass the balance row when the caller already holds its lock; otherwise it
/// is locked here.
pub(crate) async fn append_entry<C>(
    conn: &C,
    entry: &ResolvedEntry,
    locked: Option<leave_balances::Model>,
) -> Result<RecordedTransaction, LeaveError>
where
    C: ConnectionTrait,
{
    let now = Utc::now().into();

    let balance = if entry.affects_balance {
        let current = match locked {
            Some(row) => row,
            None => lock_balance(conn, entry.user_id, entry.category).await?,
        };
        let next = current.balance + entry.balance_delta();
        let mut active: leave_balances::ActiveModel = current.into();
        active.balance = Set(next);
        active.updated_at = Set(now);
        let updated = active
            .update(conn)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;
        Some(updated)
    } else {
        None
    };

    let row = leave_transactions::ActiveModel {
        id: Set(LeaveTransactionId::new().into_inner()),
        user_id: Set(entry.user_id),
        recorded_by: Set(entry.recorded_by),
        requested_type: Set(entry.requested_type.into()),
        category: Set(entry.category.into()),
        kind: Set(entry.kind.into()),
        days: Set(entry.days),
        affects_balance: Set(entry.affects_balance),
        effective_date: Set(entry.effective_date),
        period_start: Set(entry.period_start),
        period_end: Set(entry.period_end),
        note: Set(entry.note.clone()),
        created_at: Set(now),
    };

    let transaction = row
        .insert(conn)
        .await
        .map_err(|e| LeaveError::Database(e.to_string()))?;

    Ok(RecordedTransaction {
        transaction,
        balance,
    })
}

/// Ledger repository for recording and querying leave transactions.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a transaction and applies it to the balance atomically.
    ///
    /// USAGE amounts are negated before they are stored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount or period is invalid (nothing is written)
    /// - The user does not exist
    /// - Database operation fails
    pub async fn record_transaction(
        &self,
        entry: RecordEntry,
    ) -> Result<RecordedTransaction, LeaveError> {
        let resolved = LedgerService::resolve(entry)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        users::Entity::find_by_id(resolved.user_id)
            .one(&txn)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?
            .ok_or(LeaveError::UserNotFound(resolved.user_id))?;

        let recorded = append_entry(&txn, &resolved, None).await?;

        txn.commit()
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        info!(
            transaction_id = %recorded.transaction.id,
            user_id = %resolved.user_id,
            kind = %resolved.kind,
            category = %resolved.category,
            days = %resolved.days,
            "leave transaction recorded"
        );

        Ok(recorded)
    }

    /// Gets all balance rows of a user, ordered by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balances(&self, user_id: Uuid) -> Result<Vec<leave_balances::Model>, LeaveError> {
        leave_balances::Entity::find()
            .filter(leave_balances::Column::UserId.eq(user_id))
            .order_by_asc(leave_balances::Column::Category)
            .all(&self.db)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))
    }

    /// Lists transactions matching `filter`, newest effective date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the date range is inverted or the query fails.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<leave_transactions::Model>, LeaveError> {
        LedgerService::check_period(filter.start_date, filter.end_date)?;

        let mut query = leave_transactions::Entity::find();

        if let Some(user_id) = filter.user_id {
            query = query.filter(leave_transactions::Column::UserId.eq(user_id));
        }
        if let Some(category) = filter.category {
            query = query.filter(
                leave_transactions::Column::Category.eq(db_enums::LeaveCategory::from(category)),
            );
        }
        if let Some(requested_type) = filter.requested_type {
            query = query.filter(
                leave_transactions::Column::RequestedType
                    .eq(db_enums::LeaveRequestType::from(requested_type)),
            );
        }
        if !filter.kinds.is_empty() {
            let kinds: Vec<db_enums::LeaveEntryKind> =
                filter.kinds.iter().copied().map(Into::into).collect();
            query = query.filter(leave_transactions::Column::Kind.is_in(kinds));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(leave_transactions::Column::EffectiveDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(leave_transactions::Column::EffectiveDate.lte(end));
        }

        query
            .order_by_desc(leave_transactions::Column::EffectiveDate)
            .order_by_desc(leave_transactions::Column::CreatedAt)
            .limit(filter.limit.get())
            .all(&self.db)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))
    }

    /// Gets a user's balances and recent transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn summary_for_user(
        &self,
        user_id: Uuid,
        limit: ListLimit,
        kinds: Vec<EntryKind>,
    ) -> Result<UserLeaveSummary, LeaveError> {
        let balances = self.balances(user_id).await?;
        let transactions = self
            .list_transactions(&TransactionFilter {
                user_id: Some(user_id),
                kinds,
                limit,
                ..TransactionFilter::default()
            })
            .await?;

        Ok(UserLeaveSummary {
            balances,
            transactions,
        })
    }

    /// Stored balance minus the replayed transaction history.
    ///
    /// Zero for every consistent (user, category) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balance_drift(
        &self,
        user_id: Uuid,
        category: LeaveCategory,
    ) -> Result<Decimal, LeaveError> {
        let stored = leave_balances::Entity::find()
            .filter(leave_balances::Column::UserId.eq(user_id))
            .filter(leave_balances::Column::Category.eq(db_enums::LeaveCategory::from(category)))
            .one(&self.db)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?
            .map_or(Decimal::ZERO, |row| row.balance);

        let history = leave_transactions::Entity::find()
            .filter(leave_transactions::Column::UserId.eq(user_id))
            .filter(
                leave_transactions::Column::Category.eq(db_enums::LeaveCategory::from(category)),
            )
            .all(&self.db)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        let replayed = LedgerService::replay(history.iter().map(|t| (t.days, t.affects_balance)));

        Ok(stored - replayed)
    }
}
