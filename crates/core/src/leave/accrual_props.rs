//! Property-based tests for the accrual rules.

use chrono::{Datelike, Duration, Weekday};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::leave::accrual::{
    AccrualDecision, AccrualMonth, AccrualPolicy, AccrualService, AccrualSummary, WeeklyHours,
};

fn arb_month() -> impl Strategy<Value = AccrualMonth> {
    (2000i32..2100, 1u32..=12).prop_map(|(y, m)| AccrualMonth::new(y, m).unwrap())
}

fn arb_hours() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        (1i64..=120).prop_map(|tenths| Decimal::new(tenths, 1)),
    ]
}

/// Weeks starting on Mondays in and around the month's window.
fn arb_weeks(month: AccrualMonth) -> impl Strategy<Value = Vec<WeeklyHours>> {
    let first_monday = month.start() - Duration::days(i64::from(
        month.start().weekday().num_days_from_monday(),
    ));
    prop::collection::vec(
        (0i64..6, prop::array::uniform5(arb_hours())).prop_map(move |(w, hours)| WeeklyHours {
            week_start: first_monday + Duration::weeks(w),
            hours,
        }),
        0..12,
    )
}

fn weekdays_in(month: AccrualMonth) -> usize {
    month
        .start()
        .iter_days()
        .take_while(|d| *d <= month.end())
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Worked days never exceed the weekdays of the month.
    #[test]
    fn prop_worked_days_bounded(
        (month, weeks) in arb_month().prop_flat_map(|m| (Just(m), arb_weeks(m)))
    ) {
        let worked = AccrualService::worked_days(month, &weeks);
        prop_assert!(worked <= weekdays_in(month));
    }

    /// Order and duplication of weekly rows do not change the count.
    #[test]
    fn prop_worked_days_order_independent(
        (month, weeks) in arb_month().prop_flat_map(|m| (Just(m), arb_weeks(m)))
    ) {
        let mut shuffled = weeks.clone();
        shuffled.reverse();
        shuffled.extend(weeks.iter().cloned());
        prop_assert_eq!(
            AccrualService::worked_days(month, &weeks),
            AccrualService::worked_days(month, &shuffled)
        );
    }

    /// Once accrued, a second decision for the same month never accrues again.
    #[test]
    fn prop_second_run_creates_nothing(
        worked in 0usize..25,
        threshold in 0usize..15,
    ) {
        let policy = AccrualPolicy::new(Decimal::ONE, threshold).unwrap();
        let first = AccrualService::decide(&policy, false, worked);
        let already = first == AccrualDecision::Accrue;
        let second = AccrualService::decide(&policy, already, worked);
        prop_assert_ne!(second, AccrualDecision::Accrue);
    }

    /// created + skipped equals the number of decisions.
    #[test]
    fn prop_summary_counts_every_decision(
        month in arb_month(),
        flags in prop::collection::vec((any::<bool>(), 0usize..25), 0..50),
    ) {
        let policy = AccrualPolicy::new(Decimal::ONE, 10).unwrap();
        let mut summary = AccrualSummary::new(month);
        for (already, worked) in &flags {
            summary.tally(AccrualService::decide(&policy, *already, *worked));
        }
        prop_assert_eq!((summary.created + summary.skipped) as usize, flags.len());
    }

    /// Month boundaries are consistent.
    #[test]
    fn prop_month_bounds(month in arb_month()) {
        prop_assert_eq!(month.start().day(), 1);
        prop_assert_eq!(month.end().month(), month.start().month());
        prop_assert_eq!((month.end() + Duration::days(1)).day(), 1);
        prop_assert_eq!(AccrualMonth::parse(&month.to_string()).unwrap(), month);
        prop_assert_eq!(AccrualMonth::containing(month.end()), month);
    }
}

#[test]
fn test_weekdays_in_june_2025() {
    let month = AccrualMonth::new(2025, 6).unwrap();
    assert_eq!(weekdays_in(month), 21);
}
