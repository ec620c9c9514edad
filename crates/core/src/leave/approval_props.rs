//! Property-based tests for ApprovalService.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::leave::approval::ApprovalService;
use crate::leave::error::LeaveError;
use crate::leave::types::{ApprovalStatus, LeaveCategory};

fn arb_status() -> impl Strategy<Value = ApprovalStatus> {
    prop_oneof![
        Just(ApprovalStatus::Pending),
        Just(ApprovalStatus::Approved),
        Just(ApprovalStatus::Rejected),
        Just(ApprovalStatus::Cancelled),
    ]
}

fn arb_terminal() -> impl Strategy<Value = ApprovalStatus> {
    arb_status().prop_filter("terminal", |s| s.is_terminal())
}

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

fn arb_days() -> impl Strategy<Value = Decimal> {
    (0i64..=4_000).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// No decision can leave a terminal state.
    #[test]
    fn prop_terminal_states_are_final(status in arb_terminal(), user in arb_uuid()) {
        prop_assert!(
            matches!(ApprovalService::approve(status, user, None), Err(LeaveError::InvalidTransition { .. })),
            "approve should fail from {}", status
        );
        prop_assert!(
            matches!(ApprovalService::reject(status, user, None), Err(LeaveError::InvalidTransition { .. })),
            "reject should fail from {}", status
        );
        prop_assert!(
            matches!(ApprovalService::cancel(status, user, user), Err(LeaveError::InvalidTransition { .. })),
            "cancel should fail from {}", status
        );
    }

    /// Every successful action lands in a terminal state allowed by the table.
    #[test]
    fn prop_actions_follow_transition_table(user in arb_uuid(), note in proptest::option::of("[a-z ]{0,20}")) {
        for action in [
            ApprovalService::approve(ApprovalStatus::Pending, user, note.clone()).unwrap(),
            ApprovalService::reject(ApprovalStatus::Pending, user, note.clone()).unwrap(),
            ApprovalService::cancel(ApprovalStatus::Pending, user, user).unwrap(),
        ] {
            prop_assert!(action.new_status().is_terminal());
            prop_assert!(ApprovalService::is_valid_transition(ApprovalStatus::Pending, action.new_status()));
        }
    }

    /// Non-owners can never cancel, whatever the state.
    #[test]
    fn prop_only_owner_cancels(status in arb_status(), owner in arb_uuid(), actor in arb_uuid()) {
        prop_assume!(owner != actor);
        prop_assert!(matches!(
            ApprovalService::cancel(status, owner, actor),
            Err(LeaveError::NotRequester)
        ));
    }

    /// Sufficiency holds exactly when the debit keeps the balance non-negative.
    #[test]
    fn prop_sufficiency_boundary(available in arb_days(), requested in arb_days()) {
        let ok = ApprovalService::ensure_sufficient(LeaveCategory::Vacation, available, requested).is_ok();
        prop_assert_eq!(ok, requested <= available);
    }
}

#[test]
fn test_is_valid_transition_all_combinations() {
    for from in ApprovalStatus::ALL {
        for to in ApprovalStatus::ALL {
            let expected = *from == ApprovalStatus::Pending && *to != ApprovalStatus::Pending;
            assert_eq!(
                ApprovalService::is_valid_transition(*from, *to),
                expected,
                "is_valid_transition({from}, {to})"
            );
        }
    }
}
