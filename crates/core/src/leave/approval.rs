//! Approval state machine for time-off requests.
//!
//! Requests start PENDING and move exactly once to APPROVED, REJECTED or
//! CANCELLED. Approval books a USAGE entry through the recorder rules.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::leave::error::LeaveError;
use crate::leave::ledger::{LedgerService, RecordEntry};
use crate::leave::policy::{Classification, LeavePolicy};
use crate::leave::types::{ApprovalStatus, EntryKind, LeaveCategory, LeaveRequestType};

/// A time-off request as submitted by an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffRequest {
    /// Reason for leave.
    pub requested_type: LeaveRequestType,
    /// First day off.
    pub period_start: NaiveDate,
    /// Last day off.
    pub period_end: NaiveDate,
    /// Total days requested.
    pub total_days: Decimal,
    /// Fraction of the first day taken.
    #[serde(default)]
    pub partial_start_days: Option<Decimal>,
    /// Fraction of the last day taken.
    #[serde(default)]
    pub partial_end_days: Option<Decimal>,
    /// Note from the requester.
    #[serde(default)]
    pub requester_note: Option<String>,
    /// Approve even if the balance would go negative.
    #[serde(default)]
    pub override_balance: bool,
}

/// Stored details of a request, as needed to book its usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOffDetails {
    /// Reason for leave.
    pub requested_type: LeaveRequestType,
    /// First day off.
    pub period_start: NaiveDate,
    /// Last day off.
    pub period_end: NaiveDate,
    /// Total days requested.
    pub total_days: Decimal,
    /// Approve even if the balance would go negative.
    pub override_balance: bool,
}

/// State transition with audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalAction {
    /// Requester withdrew a pending request.
    Cancel {
        /// Always `Cancelled`.
        new_status: ApprovalStatus,
        /// The requester.
        cancelled_by: Uuid,
        /// When the request was cancelled.
        decided_at: DateTime<Utc>,
    },
    /// Admin approved a pending request.
    Approve {
        /// Always `Approved`.
        new_status: ApprovalStatus,
        /// The approver.
        approved_by: Uuid,
        /// When the request was approved.
        decided_at: DateTime<Utc>,
        /// Note from the approver.
        approver_note: Option<String>,
    },
    /// Admin rejected a pending request.
    Reject {
        /// Always `Rejected`.
        new_status: ApprovalStatus,
        /// The reviewer.
        rejected_by: Uuid,
        /// When the request was rejected.
        decided_at: DateTime<Utc>,
        /// Note from the reviewer.
        approver_note: Option<String>,
    },
}

impl ApprovalAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> ApprovalStatus {
        match self {
            Self::Cancel { new_status, .. }
            | Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. } => *new_status,
        }
    }

    /// Reviewer to store on the request; none for cancellations.
    #[must_use]
    pub const fn reviewer(&self) -> Option<Uuid> {
        match self {
            Self::Cancel { .. } => None,
            Self::Approve { approved_by, .. } => Some(*approved_by),
            Self::Reject { rejected_by, .. } => Some(*rejected_by),
        }
    }

    /// Decision timestamp.
    #[must_use]
    pub const fn decided_at(&self) -> DateTime<Utc> {
        match self {
            Self::Cancel { decided_at, .. }
            | Self::Approve { decided_at, .. }
            | Self::Reject { decided_at, .. } => *decided_at,
        }
    }

    /// Approver note, if any.
    #[must_use]
    pub fn approver_note(&self) -> Option<&str> {
        match self {
            Self::Cancel { .. } => None,
            Self::Approve { approver_note, .. } | Self::Reject { approver_note, .. } => {
                approver_note.as_deref()
            }
        }
    }
}

/// Stateless service for request transitions.
pub struct ApprovalService;

impl ApprovalService {
    /// Validates a new request and classifies its leave type.
    ///
    /// # Errors
    ///
    /// `InvalidPeriod`, `NonPositiveTotalDays` or `InvalidPartialDays`.
    pub fn validate_request(request: &TimeOffRequest) -> Result<Classification, LeaveError> {
        LedgerService::check_period(Some(request.period_start), Some(request.period_end))?;
        if request.total_days <= Decimal::ZERO {
            return Err(LeaveError::NonPositiveTotalDays(request.total_days));
        }
        LedgerService::check_scale(request.total_days)?;
        for partial in [request.partial_start_days, request.partial_end_days]
            .into_iter()
            .flatten()
        {
            if partial <= Decimal::ZERO || partial > request.total_days {
                return Err(LeaveError::InvalidPartialDays {
                    value: partial,
                    total_days: request.total_days,
                });
            }
            LedgerService::check_scale(partial)?;
        }
        Ok(LeavePolicy::classify(request.requested_type))
    }

    /// Cancel a pending request. Only the requester may cancel.
    ///
    /// Ownership is checked before state.
    pub fn cancel(
        current_status: ApprovalStatus,
        requested_by: Uuid,
        actor: Uuid,
    ) -> Result<ApprovalAction, LeaveError> {
        if requested_by != actor {
            return Err(LeaveError::NotRequester);
        }
        Self::require_pending(current_status, ApprovalStatus::Cancelled)?;
        Ok(ApprovalAction::Cancel {
            new_status: ApprovalStatus::Cancelled,
            cancelled_by: actor,
            decided_at: Utc::now(),
        })
    }

    /// Approve a pending request.
    pub fn approve(
        current_status: ApprovalStatus,
        approved_by: Uuid,
        approver_note: Option<String>,
    ) -> Result<ApprovalAction, LeaveError> {
        Self::require_pending(current_status, ApprovalStatus::Approved)?;
        Ok(ApprovalAction::Approve {
            new_status: ApprovalStatus::Approved,
            approved_by,
            decided_at: Utc::now(),
            approver_note: non_blank(approver_note),
        })
    }

    /// Reject a pending request.
    pub fn reject(
        current_status: ApprovalStatus,
        rejected_by: Uuid,
        approver_note: Option<String>,
    ) -> Result<ApprovalAction, LeaveError> {
        Self::require_pending(current_status, ApprovalStatus::Rejected)?;
        Ok(ApprovalAction::Reject {
            new_status: ApprovalStatus::Rejected,
            rejected_by,
            decided_at: Utc::now(),
            approver_note: non_blank(approver_note),
        })
    }

    /// Whether approving `details` must check the current balance first.
    #[must_use]
    pub const fn requires_balance_check(details: &TimeOffDetails) -> bool {
        LeavePolicy::classify(details.requested_type).affects_balance && !details.override_balance
    }

    /// Fails if debiting `requested` from `available` would go below zero.
    pub fn ensure_sufficient(
        category: LeaveCategory,
        available: Decimal,
        requested: Decimal,
    ) -> Result<(), LeaveError> {
        if available - requested < Decimal::ZERO {
            return Err(LeaveError::InsufficientBalance {
                category,
                available,
                requested,
            });
        }
        Ok(())
    }

    /// The USAGE entry an approval books, dated to the period start.
    #[must_use]
    pub fn usage_entry(
        requester: Uuid,
        approver: Uuid,
        details: &TimeOffDetails,
        approver_note: Option<String>,
    ) -> RecordEntry {
        RecordEntry {
            user_id: requester,
            recorded_by: Some(approver),
            requested_type: details.requested_type,
            kind: EntryKind::Usage,
            days: details.total_days,
            effective_date: details.period_start,
            period_start: Some(details.period_start),
            period_end: Some(details.period_end),
            note: approver_note,
        }
    }

    /// Check if a status transition is valid.
    #[must_use]
    pub const fn is_valid_transition(from: ApprovalStatus, to: ApprovalStatus) -> bool {
        matches!(
            (from, to),
            (
                ApprovalStatus::Pending,
                ApprovalStatus::Approved | ApprovalStatus::Rejected | ApprovalStatus::Cancelled
            )
        )
    }

    fn require_pending(from: ApprovalStatus, to: ApprovalStatus) -> Result<(), LeaveError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(LeaveError::InvalidTransition { from, to })
        }
    }
}

fn non_blank(note: Option<String>) -> Option<String> {
    note.filter(|n| !n.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(total_days: Decimal) -> TimeOffRequest {
        TimeOffRequest {
            requested_type: LeaveRequestType::Vacation,
            period_start: date(2025, 6, 2),
            period_end: date(2025, 6, 3),
            total_days,
            partial_start_days: None,
            partial_end_days: None,
            requester_note: None,
            override_balance: false,
        }
    }

    #[test]
    fn test_validate_request_classifies() {
        let mut req = request(dec!(2));
        req.requested_type = LeaveRequestType::Unpaid;
        let class = ApprovalService::validate_request(&req).unwrap();
        assert_eq!(class.category, LeaveCategory::Vacation);
        assert!(!class.affects_balance);
    }

    #[test]
    fn test_validate_request_rejects_inverted_period() {
        let mut req = request(dec!(1));
        req.period_end = date(2025, 6, 1);
        assert!(matches!(
            ApprovalService::validate_request(&req),
            Err(LeaveError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_validate_request_rejects_non_positive_total() {
        assert!(matches!(
            ApprovalService::validate_request(&request(Decimal::ZERO)),
            Err(LeaveError::NonPositiveTotalDays(_))
        ));
    }

    #[test]
    fn test_validate_request_checks_partials() {
        let mut req = request(dec!(1.5));
        req.partial_start_days = Some(dec!(0.5));
        assert!(ApprovalService::validate_request(&req).is_ok());

        req.partial_end_days = Some(dec!(2));
        assert!(matches!(
            ApprovalService::validate_request(&req),
            Err(LeaveError::InvalidPartialDays { .. })
        ));
    }

    #[test]
    fn test_validate_request_rejects_excess_precision() {
        assert!(matches!(
            ApprovalService::validate_request(&request(dec!(1.33333))),
            Err(LeaveError::TooManyDecimals(_))
        ));

        let mut req = request(dec!(2));
        req.partial_end_days = Some(dec!(0.12345));
        assert!(matches!(
            ApprovalService::validate_request(&req),
            Err(LeaveError::TooManyDecimals(_))
        ));
    }

    #[test]
    fn test_cancel_by_stranger_fails_before_state_check() {
        let owner = Uuid::now_v7();
        let stranger = Uuid::now_v7();
        assert!(matches!(
            ApprovalService::cancel(ApprovalStatus::Approved, owner, stranger),
            Err(LeaveError::NotRequester)
        ));
    }

    #[test]
    fn test_cancel_approved_fails() {
        let owner = Uuid::now_v7();
        assert!(matches!(
            ApprovalService::cancel(ApprovalStatus::Approved, owner, owner),
            Err(LeaveError::InvalidTransition {
                from: ApprovalStatus::Approved,
                to: ApprovalStatus::Cancelled
            })
        ));
    }

    #[test]
    fn test_cancel_has_no_reviewer() {
        let owner = Uuid::now_v7();
        let action = ApprovalService::cancel(ApprovalStatus::Pending, owner, owner).unwrap();
        assert_eq!(action.new_status(), ApprovalStatus::Cancelled);
        assert_eq!(action.reviewer(), None);
    }

    #[test]
    fn test_approve_records_reviewer_and_note() {
        let admin = Uuid::now_v7();
        let action =
            ApprovalService::approve(ApprovalStatus::Pending, admin, Some("ok".into())).unwrap();
        assert_eq!(action.new_status(), ApprovalStatus::Approved);
        assert_eq!(action.reviewer(), Some(admin));
        assert_eq!(action.approver_note(), Some("ok"));
    }

    #[test]
    fn test_reject_blank_note_is_dropped() {
        let admin = Uuid::now_v7();
        let action =
            ApprovalService::reject(ApprovalStatus::Pending, admin, Some("  ".into())).unwrap();
        assert_eq!(action.approver_note(), None);
    }

    #[test]
    fn test_sufficiency() {
        assert!(ApprovalService::ensure_sufficient(LeaveCategory::Vacation, dec!(2), dec!(2)).is_ok());
        assert!(matches!(
            ApprovalService::ensure_sufficient(LeaveCategory::Vacation, dec!(1), dec!(3)),
            Err(LeaveError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_balance_check_skipped_for_override_and_unpaid() {
        let mut details = TimeOffDetails {
            requested_type: LeaveRequestType::Sick,
            period_start: date(2025, 6, 2),
            period_end: date(2025, 6, 2),
            total_days: dec!(1),
            override_balance: false,
        };
        assert!(ApprovalService::requires_balance_check(&details));
        details.override_balance = true;
        assert!(!ApprovalService::requires_balance_check(&details));
        details.override_balance = false;
        details.requested_type = LeaveRequestType::Unpaid;
        assert!(!ApprovalService::requires_balance_check(&details));
    }

    #[test]
    fn test_usage_entry_resolves_to_debit() {
        let details = TimeOffDetails {
            requested_type: LeaveRequestType::Sick,
            period_start: date(2025, 6, 2),
            period_end: date(2025, 6, 2),
            total_days: dec!(1),
            override_balance: false,
        };
        let requester = Uuid::now_v7();
        let admin = Uuid::now_v7();
        let entry = ApprovalService::usage_entry(requester, admin, &details, Some("ok".into()));
        let resolved = LedgerService::resolve(entry).unwrap();

        assert_eq!(resolved.user_id, requester);
        assert_eq!(resolved.recorded_by, Some(admin));
        assert_eq!(resolved.days, dec!(-1));
        assert_eq!(resolved.category, LeaveCategory::Sick);
        assert_eq!(resolved.effective_date, date(2025, 6, 2));
        assert_eq!(resolved.note.as_deref(), Some("ok"));
    }
}
