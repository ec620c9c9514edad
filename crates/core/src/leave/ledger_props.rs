//! Property-based tests for the recorder rules.
//!
//! - Sign discipline per entry kind
//! - Balance equals the replay of the entries that produced it

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::leave::error::LeaveError;
use crate::leave::ledger::{LedgerService, RecordEntry};
use crate::leave::types::{EntryKind, LeaveCategory, LeaveRequestType};

/// Strategy for positive day amounts in quarter days (0.25 to 50.00).
fn positive_days() -> impl Strategy<Value = Decimal> {
    (1i64..=200i64).prop_map(|quarters| Decimal::new(quarters * 25, 2))
}

fn arb_kind() -> impl Strategy<Value = EntryKind> {
    prop_oneof![
        Just(EntryKind::Accrual),
        Just(EntryKind::Usage),
        Just(EntryKind::Adjustment),
    ]
}

fn arb_requested_type() -> impl Strategy<Value = LeaveRequestType> {
    proptest::sample::select(LeaveRequestType::ALL)
}

fn make_entry(kind: EntryKind, requested_type: LeaveRequestType, days: Decimal) -> RecordEntry {
    RecordEntry {
        user_id: Uuid::nil(),
        recorded_by: None,
        requested_type,
        kind,
        days,
        effective_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        period_start: None,
        period_end: None,
        note: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// ACCRUAL keeps a positive amount, USAGE negates it.
    #[test]
    fn prop_sign_discipline(kind in arb_kind(), days in positive_days()) {
        let signed = LedgerService::signed_days(kind, days).unwrap();
        match kind {
            EntryKind::Usage => prop_assert_eq!(signed, -days),
            EntryKind::Accrual | EntryKind::Adjustment => prop_assert_eq!(signed, days),
        }
    }

    /// Negative ACCRUAL and USAGE inputs never pass validation.
    #[test]
    fn prop_negative_input_rejected(days in positive_days()) {
        let accrual_rejected = matches!(
            LedgerService::signed_days(EntryKind::Accrual, -days),
            Err(LeaveError::NonPositiveDays { .. })
        );
        prop_assert!(accrual_rejected);
        let usage_rejected = matches!(
            LedgerService::signed_days(EntryKind::Usage, -days),
            Err(LeaveError::NonPositiveDays { .. })
        );
        prop_assert!(usage_rejected);
    }

    /// Applying resolved entries one by one to a running balance yields
    /// the same figure as replaying the stored history.
    #[test]
    fn prop_balance_matches_replay(
        ops in prop::collection::vec(
            (arb_kind(), arb_requested_type(), positive_days(), any::<bool>()),
            1..40,
        )
    ) {
        let mut sick = Decimal::ZERO;
        let mut vacation = Decimal::ZERO;
        let mut history = Vec::new();

        for (kind, requested_type, days, negate) in ops {
            let days = if kind == EntryKind::Adjustment && negate { -days } else { days };
            let resolved = LedgerService::resolve(make_entry(kind, requested_type, days)).unwrap();
            match resolved.category {
                LeaveCategory::Sick => sick += resolved.balance_delta(),
                LeaveCategory::Vacation => vacation += resolved.balance_delta(),
            }
            history.push(resolved);
        }

        let replay = |category: LeaveCategory| {
            LedgerService::replay(
                history
                    .iter()
                    .filter(|e| e.category == category)
                    .map(|e| (e.days, e.affects_balance)),
            )
        };
        prop_assert_eq!(replay(LeaveCategory::Sick), sick);
        prop_assert_eq!(replay(LeaveCategory::Vacation), vacation);
    }
}
