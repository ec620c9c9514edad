//! Monthly accrual rules.
//!
//! A user earns the monthly VACATION credit when they were employed by the
//! end of the month and logged hours on more than a threshold of distinct
//! weekdays inside it. Storage supplies weekly time entries and existing
//! accruals; this module decides.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::leave::error::LeaveError;
use crate::leave::ledger::{LedgerService, RecordEntry};
use crate::leave::types::{EntryKind, LeaveCategory, LeaveRequestType};

/// Categories credited by the monthly run. SICK is funded by the initial grant.
pub const ACCRUED_CATEGORIES: [LeaveCategory; 1] = [LeaveCategory::Vacation];

/// A calendar month targeted by an accrual run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccrualMonth {
    start: NaiveDate,
}

impl AccrualMonth {
    /// Builds a month from its number (1-12).
    pub fn new(year: i32, month: u32) -> Result<Self, LeaveError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|start| Self { start })
            .ok_or_else(|| LeaveError::InvalidMonth(format!("{year:04}-{month:02}")))
    }

    /// Parses `YYYY-MM`.
    pub fn parse(s: &str) -> Result<Self, LeaveError> {
        let invalid = || LeaveError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || month.len() != 2 || !digits(year) || !digits(month) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    /// The month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            start: date.with_day(1).unwrap_or(date),
        }
    }

    /// First day of the month.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the month.
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.start
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(self.start)
    }

    /// Returns true if `date` falls inside the month.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }

    /// Inclusive range of week-start dates whose weeks can overlap the month.
    #[must_use]
    pub fn week_start_window(&self) -> (NaiveDate, NaiveDate) {
        (self.start - Duration::days(6), self.end())
    }
}

impl fmt::Display for AccrualMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.start.year(), self.start.month())
    }
}

/// Hours a user logged in one week, Monday through Friday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyHours {
    /// Monday of the week.
    pub week_start: NaiveDate,
    /// Hours for Monday..Friday.
    pub hours: [Decimal; 5],
}

/// Parameters of one accrual run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualPolicy {
    /// Days credited per category.
    pub amount: Decimal,
    /// Worked-day threshold that must be exceeded.
    pub min_worked_days: usize,
}

impl AccrualPolicy {
    /// Validates the per-category amount.
    pub fn new(amount: Decimal, min_worked_days: usize) -> Result<Self, LeaveError> {
        if amount <= Decimal::ZERO {
            return Err(LeaveError::NonPositiveAccrualAmount(amount));
        }
        LedgerService::check_scale(amount)?;
        Ok(Self {
            amount,
            min_worked_days,
        })
    }
}

/// Outcome for one user and category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccrualDecision {
    /// Record the accrual.
    Accrue,
    /// An accrual for this month is already on the ledger.
    AlreadyAccrued,
    /// Not enough worked days.
    BelowThreshold {
        /// Distinct weekdays with logged hours.
        worked_days: usize,
    },
}

/// Result of an accrual run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccrualSummary {
    /// Month label, `YYYY-MM`.
    pub month: String,
    /// First day of the month.
    pub month_start: NaiveDate,
    /// Accrual transactions created.
    pub created: u32,
    /// User/category pairs skipped.
    pub skipped: u32,
}

impl AccrualSummary {
    /// An empty summary for `month`.
    #[must_use]
    pub fn new(month: AccrualMonth) -> Self {
        Self {
            month: month.to_string(),
            month_start: month.start(),
            created: 0,
            skipped: 0,
        }
    }

    /// Counts one decision.
    pub fn tally(&mut self, decision: AccrualDecision) {
        match decision {
            AccrualDecision::Accrue => self.created += 1,
            AccrualDecision::AlreadyAccrued | AccrualDecision::BelowThreshold { .. } => {
                self.skipped += 1;
            }
        }
    }
}

/// Stateless accrual rules.
pub struct AccrualService;

impl AccrualService {
    /// Users are in the accrual population once employed by month end.
    #[must_use]
    pub fn is_employed(start_date: Option<NaiveDate>, month: AccrualMonth) -> bool {
        start_date.is_some_and(|d| d <= month.end())
    }

    /// Counts distinct weekdays inside `month` with positive logged hours.
    #[must_use]
    pub fn worked_days(month: AccrualMonth, weeks: &[WeeklyHours]) -> usize {
        let mut days = BTreeSet::new();
        for week in weeks {
            for (offset, hours) in (0i64..).zip(week.hours.iter()) {
                let day = week.week_start + Duration::days(offset);
                if *hours > Decimal::ZERO && month.contains(day) {
                    days.insert(day);
                }
            }
        }
        days.len()
    }

    /// Decides whether a user earns the accrual.
    #[must_use]
    pub fn decide(
        policy: &AccrualPolicy,
        already_accrued: bool,
        worked_days: usize,
    ) -> AccrualDecision {
        if already_accrued {
            AccrualDecision::AlreadyAccrued
        } else if worked_days > policy.min_worked_days {
            AccrualDecision::Accrue
        } else {
            AccrualDecision::BelowThreshold { worked_days }
        }
    }

    /// Note attached to accrual transactions.
    #[must_use]
    pub fn note(month: AccrualMonth) -> String {
        format!("Monthly accrual for {month}")
    }

    /// The ledger entry an accrual produces.
    #[must_use]
    pub fn entry(
        user_id: Uuid,
        recorded_by: Option<Uuid>,
        month: AccrualMonth,
        category: LeaveCategory,
        amount: Decimal,
    ) -> RecordEntry {
        let requested_type = match category {
            LeaveCategory::Sick => LeaveRequestType::Sick,
            LeaveCategory::Vacation => LeaveRequestType::Vacation,
        };
        RecordEntry {
            user_id,
            recorded_by,
            requested_type,
            kind: EntryKind::Accrual,
            days: amount,
            effective_date: month.start(),
            period_start: Some(month.start()),
            period_end: Some(month.end()),
            note: Some(Self::note(month)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn full_week(week_start: NaiveDate) -> WeeklyHours {
        WeeklyHours {
            week_start,
            hours: [dec!(8); 5],
        }
    }

    #[test]
    fn test_parse_month() {
        let month = AccrualMonth::parse("2024-02").unwrap();
        assert_eq!(month.start(), date(2024, 2, 1));
        assert_eq!(month.end(), date(2024, 2, 29));
        assert_eq!(month.to_string(), "2024-02");
    }

    #[test]
    fn test_parse_month_rejects_garbage() {
        for bad in ["2024-13", "2024-00", "2024-2", "24-02", "2024/02", "", "+202-01"] {
            assert!(
                matches!(AccrualMonth::parse(bad), Err(LeaveError::InvalidMonth(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_december_end() {
        assert_eq!(AccrualMonth::new(2025, 12).unwrap().end(), date(2025, 12, 31));
    }

    #[test]
    fn test_week_start_window() {
        let month = AccrualMonth::new(2025, 6).unwrap();
        assert_eq!(month.week_start_window(), (date(2025, 5, 26), date(2025, 6, 30)));
    }

    #[test]
    fn test_worked_days_clips_to_month() {
        // Week of Mon 2025-05-26 has only Sat/Sun in June, so nothing counts.
        // Week of Mon 2025-06-30 has only Monday in June.
        let month = AccrualMonth::new(2025, 6).unwrap();
        let weeks = vec![full_week(date(2025, 5, 26)), full_week(date(2025, 6, 30))];
        assert_eq!(AccrualService::worked_days(month, &weeks), 1);
    }

    #[test]
    fn test_worked_days_counts_distinct_dates() {
        let month = AccrualMonth::new(2025, 6).unwrap();
        // Two projects on the same week count each day once.
        let weeks = vec![full_week(date(2025, 6, 2)), full_week(date(2025, 6, 2))];
        assert_eq!(AccrualService::worked_days(month, &weeks), 5);
    }

    #[test]
    fn test_zero_hour_days_are_ignored() {
        let month = AccrualMonth::new(2025, 6).unwrap();
        let weeks = vec![WeeklyHours {
            week_start: date(2025, 6, 9),
            hours: [dec!(8), dec!(0), dec!(0.5), dec!(0), dec!(4)],
        }];
        assert_eq!(AccrualService::worked_days(month, &weeks), 3);
    }

    #[test]
    fn test_threshold_is_strict() {
        let policy = AccrualPolicy::new(dec!(1), 10).unwrap();
        assert_eq!(
            AccrualService::decide(&policy, false, 10),
            AccrualDecision::BelowThreshold { worked_days: 10 }
        );
        assert_eq!(AccrualService::decide(&policy, false, 11), AccrualDecision::Accrue);
        assert_eq!(
            AccrualService::decide(&policy, true, 20),
            AccrualDecision::AlreadyAccrued
        );
    }

    #[test]
    fn test_policy_rejects_non_positive_amount() {
        assert!(matches!(
            AccrualPolicy::new(Decimal::ZERO, 10),
            Err(LeaveError::NonPositiveAccrualAmount(_))
        ));
        assert!(AccrualPolicy::new(dec!(-1), 10).is_err());
        assert!(matches!(
            AccrualPolicy::new(dec!(0.00001), 10),
            Err(LeaveError::TooManyDecimals(_))
        ));
    }

    #[test]
    fn test_employment_gate() {
        let month = AccrualMonth::new(2025, 6).unwrap();
        assert!(AccrualService::is_employed(Some(date(2025, 6, 30)), month));
        assert!(!AccrualService::is_employed(Some(date(2025, 7, 1)), month));
        assert!(!AccrualService::is_employed(None, month));
    }

    #[test]
    fn test_accrual_entry_shape() {
        let month = AccrualMonth::new(2025, 3).unwrap();
        let user = Uuid::now_v7();
        let entry = AccrualService::entry(user, None, month, LeaveCategory::Vacation, dec!(1.25));
        assert_eq!(entry.kind, EntryKind::Accrual);
        assert_eq!(entry.requested_type, LeaveRequestType::Vacation);
        assert_eq!(entry.effective_date, date(2025, 3, 1));
        assert_eq!(entry.period_end, Some(date(2025, 3, 31)));
        assert_eq!(entry.note.as_deref(), Some("Monthly accrual for 2025-03"));
    }

    #[test]
    fn test_summary_tally() {
        let mut summary = AccrualSummary::new(AccrualMonth::new(2025, 3).unwrap());
        summary.tally(AccrualDecision::Accrue);
        summary.tally(AccrualDecision::AlreadyAccrued);
        summary.tally(AccrualDecision::BelowThreshold { worked_days: 2 });
        assert_eq!((summary.created, summary.skipped), (1, 2));
        assert_eq!(summary.month, "2025-03");
    }
}
