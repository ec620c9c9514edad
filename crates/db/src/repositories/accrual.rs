//! Monthly accrual run.

use std::collections::{HashMap, HashSet};

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use hourglass_core::leave::{
    ACCRUED_CATEGORIES, AccrualDecision, AccrualMonth, AccrualPolicy, AccrualService,
    AccrualSummary, LeaveCategory, LeaveError, LedgerService, WeeklyHours,
};

use crate::entities::{
    leave_transactions,
    sea_orm_active_enums::{self as db_enums, LeaveEntryKind},
};

use super::ledger::{append_entry, lock_balance};
use super::timesheet::entries_for_month;
use super::user::employed_by;

/// Repository running the monthly accrual.
#[derive(Debug, Clone)]
pub struct AccrualRepository {
    db: DatabaseConnection,
}

impl AccrualRepository {
    /// Creates a new accrual repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Credits `policy.amount` days to every eligible user for `month`.
    ///
    /// Runs in one transaction. Each credit is re-checked for an existing
    /// accrual while the balance row is locked, so concurrent or repeated
    /// runs for the same month create each accrual at most once.
    ///
    /// # Errors
    ///
    /// Returns an error if any database operation fails; nothing is written
    /// in that case.
    pub async fn accrue_monthly(
        &self,
        month: AccrualMonth,
        policy: AccrualPolicy,
        recorded_by: Option<Uuid>,
    ) -> Result<AccrualSummary, LeaveError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        let population = employed_by(&txn, month.end())
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        let mut weeks: HashMap<Uuid, Vec<WeeklyHours>> = HashMap::new();
        for entry in entries_for_month(&txn, month)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?
        {
            weeks.entry(entry.user_id).or_default().push(entry.into());
        }

        let existing: HashSet<(Uuid, LeaveCategory)> = leave_transactions::Entity::find()
            .filter(leave_transactions::Column::Kind.eq(LeaveEntryKind::Accrual))
            .filter(leave_transactions::Column::EffectiveDate.eq(month.start()))
            .all(&txn)
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?
            .into_iter()
            .map(|t| (t.user_id, t.category.into()))
            .collect();

        let mut summary = AccrualSummary::new(month);

        for user in population
            .iter()
            .filter(|u| AccrualService::is_employed(u.start_date, month))
        {
            let worked = weeks
                .get(&user.id)
                .map_or(0, |w| AccrualService::worked_days(month, w));

            for category in ACCRUED_CATEGORIES {
                let already = existing.contains(&(user.id, category));
                let mut decision = AccrualService::decide(&policy, already, worked);

                if decision == AccrualDecision::Accrue {
                    let locked = lock_balance(&txn, user.id, category).await?;
                    if accrual_exists(&txn, user.id, category, month).await? {
                        decision = AccrualDecision::AlreadyAccrued;
                    } else {
                        let entry = LedgerService::resolve(AccrualService::entry(
                            user.id,
                            recorded_by,
                            month,
                            category,
                            policy.amount,
                        ))?;
                        append_entry(&txn, &entry, Some(locked)).await?;
                    }
                }

                if decision != AccrualDecision::Accrue {
                    debug!(user_id = %user.id, %category, ?decision, %month, "accrual skipped");
                }
                summary.tally(decision);
            }
        }

        txn.commit()
            .await
            .map_err(|e| LeaveError::Database(e.to_string()))?;

        info!(
            month = %summary.month,
            created = summary.created,
            skipped = summary.skipped,
            "monthly accrual completed"
        );

        Ok(summary)
    }
}

async fn accrual_exists<C>(
    conn: &C,
    user_id: Uuid,
    category: LeaveCategory,
    month: AccrualMonth,
) -> Result<bool, LeaveError>
where
    C: ConnectionTrait,
{
    let count = leave_transactions::Entity::find()
        .filter(leave_transactions::Column::UserId.eq(user_id))
        .filter(leave_transactions::Column::Category.eq(db_enums::LeaveCategory::from(category)))
        .filter(leave_transactions::Column::Kind.eq(LeaveEntryKind::Accrual))
        .filter(leave_transactions::Column::EffectiveDate.eq(month.start()))
        .count(conn)
        .await
        .map_err(|e| LeaveError::Database(e.to_string()))?;

    Ok(count > 0)
}
