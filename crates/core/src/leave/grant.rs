//! One-time sick leave grant after probation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::leave::error::LeaveError;
use crate::leave::ledger::RecordEntry;
use crate::leave::types::{EntryKind, LeaveRequestType};

/// Days credited by the initial sick leave grant.
pub const INITIAL_SICK_LEAVE_DAYS: Decimal = Decimal::TEN;

/// Note attached to the grant transaction.
pub const INITIAL_GRANT_NOTE: &str = "Initial grant of 10 sick leave days after probation period.";

/// Stateless grant rules. Idempotency rests on the user's flag alone.
pub struct InitialGrant;

impl InitialGrant {
    /// Fails if the user's flag is already set.
    pub fn check(user_id: Uuid, already_granted: bool) -> Result<(), LeaveError> {
        if already_granted {
            Err(LeaveError::AlreadyGranted(user_id))
        } else {
            Ok(())
        }
    }

    /// The ADJUSTMENT entry the grant records.
    #[must_use]
    pub fn entry(user_id: Uuid, recorded_by: Option<Uuid>, effective_date: NaiveDate) -> RecordEntry {
        RecordEntry {
            user_id,
            recorded_by,
            requested_type: LeaveRequestType::Sick,
            kind: EntryKind::Adjustment,
            days: INITIAL_SICK_LEAVE_DAYS,
            effective_date,
            period_start: None,
            period_end: None,
            note: Some(INITIAL_GRANT_NOTE.to_string()),
        }
    }
}
