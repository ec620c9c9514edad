//! Leave accounting error types.
//!
//! Every variant belongs to one [`ErrorKind`], which is what the HTTP
//! boundary maps to a status code.

use chrono::NaiveDate;
use hourglass_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::leave::types::{ApprovalStatus, EntryKind, LeaveCategory};

/// Coarse error classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// Operation not valid for the request's lifecycle state.
    State,
    /// Actor has no rights over the target resource.
    Authorization,
    /// A debit would drive a balance negative.
    InsufficientBalance,
    /// A one-time operation was already performed.
    Conflict,
    /// Referenced entity does not exist.
    NotFound,
    /// Storage failure or corrupted data.
    Internal,
}

/// Errors that can occur during leave operations.
#[derive(Debug, Error)]
pub enum LeaveError {
    /// Day amount is zero.
    #[error("Days must be non-zero")]
    ZeroDays,

    /// Day amount has the wrong sign for its entry kind.
    #[error("{kind} days must be greater than zero, got {days}")]
    NonPositiveDays {
        /// Entry kind being recorded.
        kind: EntryKind,
        /// Offending amount.
        days: Decimal,
    },

    /// Day amount is finer than the stored precision.
    #[error("Day amount {0} has more than 4 decimal places")]
    TooManyDecimals(Decimal),

    /// Period end precedes period start.
    #[error("Period end {end} is before period start {start}")]
    InvalidPeriod {
        /// Period start.
        start: NaiveDate,
        /// Period end.
        end: NaiveDate,
    },

    /// Requested total is not positive.
    #[error("Total days must be greater than zero, got {0}")]
    NonPositiveTotalDays(Decimal),

    /// Partial-day amount is out of range.
    #[error("Partial day amount {value} must be greater than zero and at most {total_days}")]
    InvalidPartialDays {
        /// Offending partial amount.
        value: Decimal,
        /// Total requested days.
        total_days: Decimal,
    },

    /// Accrual amount is not positive.
    #[error("Accrual amount must be greater than zero, got {0}")]
    NonPositiveAccrualAmount(Decimal),

    /// Month string is not `YYYY-MM`.
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),

    /// Attempted an invalid status transition.
    #[error("Cannot move request from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: ApprovalStatus,
        /// The attempted target status.
        to: ApprovalStatus,
    },

    /// Someone other than the requester tried to cancel.
    #[error("Cannot cancel another user's request")]
    NotRequester,

    /// Approval would overdraw the balance.
    #[error("Insufficient {category} balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// Bucket being debited.
        category: LeaveCategory,
        /// Current balance.
        available: Decimal,
        /// Days requested.
        requested: Decimal,
    },

    /// Initial sick leave was already granted.
    #[error("Initial sick leave already granted to user {0}")]
    AlreadyGranted(Uuid),

    /// Approval request not found.
    #[error("Approval request {0} not found")]
    RequestNotFound(Uuid),

    /// User not found.
    #[error("User {0} not found")]
    UserNotFound(Uuid),

    /// Time-off request has no details row.
    #[error("Time-off details missing for request {0}")]
    MissingDetails(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LeaveError {
    /// Returns the error class.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroDays
            | Self::NonPositiveDays { .. }
            | Self::TooManyDecimals(_)
            | Self::InvalidPeriod { .. }
            | Self::NonPositiveTotalDays(_)
            | Self::InvalidPartialDays { .. }
            | Self::NonPositiveAccrualAmount(_)
            | Self::InvalidMonth(_) => ErrorKind::Validation,
            Self::InvalidTransition { .. } => ErrorKind::State,
            Self::NotRequester => ErrorKind::Authorization,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::AlreadyGranted(_) => ErrorKind::Conflict,
            Self::RequestNotFound(_) | Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::MissingDetails(_) | Self::Database(_) => ErrorKind::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::Authorization => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::State | ErrorKind::Conflict => 409,
            ErrorKind::InsufficientBalance => 422,
            ErrorKind::Internal => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroDays => "ZERO_DAYS",
            Self::NonPositiveDays { .. } => "NON_POSITIVE_DAYS",
            Self::TooManyDecimals(_) => "TOO_MANY_DECIMALS",
            Self::InvalidPeriod { .. } => "INVALID_PERIOD",
            Self::NonPositiveTotalDays(_) => "NON_POSITIVE_TOTAL_DAYS",
            Self::InvalidPartialDays { .. } => "INVALID_PARTIAL_DAYS",
            Self::NonPositiveAccrualAmount(_) => "NON_POSITIVE_ACCRUAL_AMOUNT",
            Self::InvalidMonth(_) => "INVALID_MONTH",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotRequester => "NOT_REQUESTER",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::AlreadyGranted(_) => "ALREADY_GRANTED",
            Self::RequestNotFound(_) => "REQUEST_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::MissingDetails(_) => "MISSING_DETAILS",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<LeaveError> for AppError {
    fn from(err: LeaveError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::State => Self::InvalidState(message),
            ErrorKind::Authorization => Self::Forbidden(message),
            ErrorKind::InsufficientBalance => Self::InsufficientBalance(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Internal => match err {
                LeaveError::Database(msg) => Self::Database(msg),
                _ => Self::Internal(message),
            },
        }
    }
}
