//! Weekly time entries, the read model behind worked-day counting.

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use hourglass_core::leave::{AccrualMonth, WeeklyHours};

use crate::entities::task_entries;

/// Input for one week of hours on a task.
#[derive(Debug, Clone)]
pub struct CreateTaskEntryInput {
    /// Owner of the entry.
    pub user_id: Uuid,
    /// Project name.
    pub project_name: String,
    /// Task name.
    pub task_name: String,
    /// Monday of the week.
    pub week_start_date: NaiveDate,
    /// Hours for Monday..Friday.
    pub hours: [Decimal; 5],
}

/// Error types for time entry operations.
#[derive(Debug, thiserror::Error)]
pub enum TimesheetError {
    /// Week does not start on a Monday.
    #[error("Week start {0} is not a Monday")]
    NotMonday(NaiveDate),

    /// Negative hours.
    #[error("Hours cannot be negative")]
    NegativeHours,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<task_entries::Model> for WeeklyHours {
    fn from(entry: task_entries::Model) -> Self {
        Self {
            week_start: entry.week_start_date,
            hours: [
                entry.hours_mon,
                entry.hours_tue,
                entry.hours_wed,
                entry.hours_thu,
                entry.hours_fri,
            ],
        }
    }
}

/// Loads every task entry whose week can overlap `month`.
pub(crate) async fn entries_for_month<C>(
    conn: &C,
    month: AccrualMonth,
) -> Result<Vec<task_entries::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let (from, to) = month.week_start_window();
    task_entries::Entity::find()
        .filter(task_entries::Column::WeekStartDate.gte(from))
        .filter(task_entries::Column::WeekStartDate.lte(to))
        .order_by_asc(task_entries::Column::WeekStartDate)
        .all(conn)
        .await
}

/// Time entry repository.
#[derive(Debug, Clone)]
pub struct TimesheetRepository {
    db: DatabaseConnection,
}

impl TimesheetRepository {
    /// Creates a new timesheet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a week of hours on one task.
    ///
    /// # Errors
    ///
    /// Returns an error if the week does not start on Monday, any hour value
    /// is negative, or the insert fails.
    pub async fn record_week(
        &self,
        input: CreateTaskEntryInput,
    ) -> Result<task_entries::Model, TimesheetError> {
        if input.week_start_date.weekday() != Weekday::Mon {
            return Err(TimesheetError::NotMonday(input.week_start_date));
        }
        if input.hours.iter().any(Decimal::is_sign_negative) {
            return Err(TimesheetError::NegativeHours);
        }

        let now = Utc::now().into();
        let [mon, tue, wed, thu, fri] = input.hours;
        let entry = task_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(input.user_id),
            project_name: Set(input.project_name),
            task_name: Set(input.task_name),
            week_start_date: Set(input.week_start_date),
            hours_mon: Set(mon),
            hours_tue: Set(tue),
            hours_wed: Set(wed),
            hours_thu: Set(thu),
            hours_fri: Set(fri),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(entry.insert(&self.db).await?)
    }
}
