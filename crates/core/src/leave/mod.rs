//! Leave-balance accounting for Hourglass.
//!
//! This module holds the rules behind every balance mutation; the database
//! crate applies them inside one transaction per operation.
//!
//! # Modules
//!
//! - `types` - Leave domain enums (request types, categories, kinds, statuses)
//! - `policy` - Requested type to stored category mapping
//! - `ledger` - Transaction recorder validation and sign discipline
//! - `accrual` - Monthly accrual eligibility
//! - `approval` - Request state machine
//! - `grant` - One-time initial sick leave grant
//! - `error` - Leave error taxonomy

pub mod accrual;
pub mod approval;
pub mod error;
pub mod grant;
pub mod ledger;
pub mod policy;
pub mod types;

#[cfg(test)]
mod accrual_props;
#[cfg(test)]
mod approval_props;
#[cfg(test)]
mod ledger_props;

pub use accrual::{
    ACCRUED_CATEGORIES, AccrualDecision, AccrualMonth, AccrualPolicy, AccrualService,
    AccrualSummary, WeeklyHours,
};
pub use approval::{ApprovalAction, ApprovalService, TimeOffDetails, TimeOffRequest};
pub use error::{ErrorKind, LeaveError};
pub use grant::{INITIAL_GRANT_NOTE, INITIAL_SICK_LEAVE_DAYS, InitialGrant};
pub use ledger::{LedgerService, RecordEntry, ResolvedEntry};
pub use policy::{Classification, LeavePolicy};
pub use types::{ApprovalRequestType, ApprovalStatus, EntryKind, LeaveCategory, LeaveRequestType};
