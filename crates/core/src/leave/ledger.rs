//! Transaction recorder rules.
//!
//! This module validates a ledger entry and resolves it into the signed,
//! classified form that storage persists. Persisting the entry and moving
//! the balance is the caller's job and must happen in one database
//! transaction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::leave::error::LeaveError;
use crate::leave::policy::LeavePolicy;
use crate::leave::types::{EntryKind, LeaveCategory, LeaveRequestType};

/// Decimal places kept for day amounts (`NUMERIC(12, 4)` columns).
pub const MAX_DAY_SCALE: u32 = 4;

/// Input for recording a ledger entry.
///
/// `days` is given the way a human states it: a positive "days used" for
/// USAGE, a positive credit for ACCRUAL, either sign for ADJUSTMENT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEntry {
    /// User whose balance is affected.
    pub user_id: Uuid,
    /// Admin or approver who recorded the entry.
    pub recorded_by: Option<Uuid>,
    /// Fine-grained reason.
    pub requested_type: LeaveRequestType,
    /// Entry kind.
    pub kind: EntryKind,
    /// Unsigned-by-convention day amount.
    pub days: Decimal,
    /// Date the entry takes effect.
    pub effective_date: NaiveDate,
    /// Optional covered period start.
    pub period_start: Option<NaiveDate>,
    /// Optional covered period end.
    pub period_end: Option<NaiveDate>,
    /// Free-text note.
    pub note: Option<String>,
}

/// A validated entry ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// User whose balance is affected.
    pub user_id: Uuid,
    /// Admin or approver who recorded the entry.
    pub recorded_by: Option<Uuid>,
    /// Fine-grained reason.
    pub requested_type: LeaveRequestType,
    /// Bucket of record.
    pub category: LeaveCategory,
    /// Entry kind.
    pub kind: EntryKind,
    /// Signed day amount as stored.
    pub days: Decimal,
    /// Whether `days` moves the balance.
    pub affects_balance: bool,
    /// Date the entry takes effect.
    pub effective_date: NaiveDate,
    /// Covered period start.
    pub period_start: Option<NaiveDate>,
    /// Covered period end.
    pub period_end: Option<NaiveDate>,
    /// Free-text note.
    pub note: Option<String>,
}

impl ResolvedEntry {
    /// Amount the balance of `category` moves by.
    #[must_use]
    pub fn balance_delta(&self) -> Decimal {
        if self.affects_balance {
            self.days
        } else {
            Decimal::ZERO
        }
    }
}

/// Stateless recorder rules.
pub struct LedgerService;

impl LedgerService {
    /// Applies the sign discipline of `kind` to a caller-supplied amount.
    ///
    /// # Errors
    ///
    /// `ZeroDays` for a zero amount, `NonPositiveDays` for a non-positive
    /// ACCRUAL or USAGE amount, `TooManyDecimals` past four places.
    pub fn signed_days(kind: EntryKind, days: Decimal) -> Result<Decimal, LeaveError> {
        if days.is_zero() {
            return Err(LeaveError::ZeroDays);
        }
        Self::check_scale(days)?;
        match kind {
            EntryKind::Accrual | EntryKind::Usage if days.is_sign_negative() => {
                Err(LeaveError::NonPositiveDays { kind, days })
            }
            EntryKind::Accrual | EntryKind::Adjustment => Ok(days),
            EntryKind::Usage => Ok(-days),
        }
    }

    /// Rejects amounts storage would round. Trailing zeros do not count.
    pub fn check_scale(days: Decimal) -> Result<(), LeaveError> {
        if days.normalize().scale() > MAX_DAY_SCALE {
            return Err(LeaveError::TooManyDecimals(days));
        }
        Ok(())
    }

    /// Checks that an optional period is not inverted.
    pub fn check_period(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(), LeaveError> {
        match (start, end) {
            (Some(start), Some(end)) if end < start => Err(LeaveError::InvalidPeriod { start, end }),
            _ => Ok(()),
        }
    }

    /// Validates and classifies an entry.
    pub fn resolve(entry: RecordEntry) -> Result<ResolvedEntry, LeaveError> {
        let days = Self::signed_days(entry.kind, entry.days)?;
        Self::check_period(entry.period_start, entry.period_end)?;
        let class = LeavePolicy::classify(entry.requested_type);

        Ok(ResolvedEntry {
            user_id: entry.user_id,
            recorded_by: entry.recorded_by,
            requested_type: entry.requested_type,
            category: class.category,
            kind: entry.kind,
            days,
            affects_balance: class.affects_balance,
            effective_date: entry.effective_date,
            period_start: entry.period_start,
            period_end: entry.period_end,
            note: entry.note.filter(|n| !n.trim().is_empty()),
        })
    }

    /// Replays stored `(days, affects_balance)` pairs into a balance.
    ///
    /// A balance row is consistent when it equals this sum over its
    /// user/category history.
    pub fn replay<I>(history: I) -> Decimal
    where
        I: IntoIterator<Item = (Decimal, bool)>,
    {
        history
            .into_iter()
            .filter(|(_, affects)| *affects)
            .map(|(days, _)| days)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(kind: EntryKind, requested_type: LeaveRequestType, days: Decimal) -> RecordEntry {
        RecordEntry {
            user_id: Uuid::nil(),
            recorded_by: None,
            requested_type,
            kind,
            days,
            effective_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            period_start: None,
            period_end: None,
            note: None,
        }
    }

    #[test]
    fn test_usage_is_negated() {
        let resolved =
            LedgerService::resolve(entry(EntryKind::Usage, LeaveRequestType::Vacation, dec!(3)))
                .unwrap();
        assert_eq!(resolved.days, dec!(-3));
        assert_eq!(resolved.balance_delta(), dec!(-3));
        assert_eq!(resolved.category, LeaveCategory::Vacation);
    }

    #[test]
    fn test_accrual_must_be_positive() {
        let err =
            LedgerService::resolve(entry(EntryKind::Accrual, LeaveRequestType::Sick, dec!(-2)))
                .unwrap_err();
        assert!(matches!(err, LeaveError::NonPositiveDays { kind: EntryKind::Accrual, .. }));
    }

    #[test]
    fn test_usage_rejects_negative_input() {
        let err = LedgerService::signed_days(EntryKind::Usage, dec!(-1)).unwrap_err();
        assert!(matches!(err, LeaveError::NonPositiveDays { .. }));
    }

    #[test]
    fn test_zero_is_rejected_for_every_kind() {
        for kind in EntryKind::ALL {
            assert!(matches!(
                LedgerService::signed_days(*kind, Decimal::ZERO),
                Err(LeaveError::ZeroDays)
            ));
        }
    }

    #[test]
    fn test_amounts_past_four_places_are_rejected() {
        assert!(matches!(
            LedgerService::signed_days(EntryKind::Usage, dec!(0.33333)),
            Err(LeaveError::TooManyDecimals(_))
        ));
        assert!(matches!(
            LedgerService::resolve(entry(EntryKind::Accrual, LeaveRequestType::Sick, dec!(1.00001))),
            Err(LeaveError::TooManyDecimals(_))
        ));
        assert_eq!(
            LedgerService::signed_days(EntryKind::Usage, dec!(0.3333)).unwrap(),
            dec!(-0.3333)
        );
        assert_eq!(
            LedgerService::signed_days(EntryKind::Adjustment, dec!(1.500000)).unwrap(),
            dec!(1.5)
        );
    }

    #[test]
    fn test_adjustment_keeps_sign() {
        assert_eq!(
            LedgerService::signed_days(EntryKind::Adjustment, dec!(-1.5)).unwrap(),
            dec!(-1.5)
        );
        assert_eq!(
            LedgerService::signed_days(EntryKind::Adjustment, dec!(0.5)).unwrap(),
            dec!(0.5)
        );
    }

    #[test]
    fn test_unpaid_entry_has_no_balance_effect() {
        let resolved =
            LedgerService::resolve(entry(EntryKind::Usage, LeaveRequestType::Unpaid, dec!(2)))
                .unwrap();
        assert_eq!(resolved.days, dec!(-2));
        assert!(!resolved.affects_balance);
        assert_eq!(resolved.balance_delta(), Decimal::ZERO);
    }

    #[test]
    fn test_inverted_period_is_rejected() {
        let mut e = entry(EntryKind::Adjustment, LeaveRequestType::Sick, dec!(1));
        e.period_start = NaiveDate::from_ymd_opt(2025, 6, 5);
        e.period_end = NaiveDate::from_ymd_opt(2025, 6, 4);
        assert!(matches!(
            LedgerService::resolve(e),
            Err(LeaveError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_blank_note_is_dropped() {
        let mut e = entry(EntryKind::Adjustment, LeaveRequestType::Sick, dec!(1));
        e.note = Some("   ".to_string());
        assert_eq!(LedgerService::resolve(e).unwrap().note, None);
    }

    #[test]
    fn test_replay_ignores_audit_only_rows() {
        let balance = LedgerService::replay([
            (dec!(10), true),
            (dec!(-2), true),
            (dec!(-4), false),
            (dec!(0.5), true),
        ]);
        assert_eq!(balance, dec!(8.5));
    }
}
