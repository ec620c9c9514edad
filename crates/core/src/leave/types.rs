//! Leave domain enums.
//!
//! Every enum has a stable upper-case wire form shared by the JSON API and
//! the PostgreSQL enum types.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! wire_enum {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the wire representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            /// Parses the wire representation, ignoring ASCII case.
            #[must_use]
            pub fn parse(s: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Reason for leave as chosen by the employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveRequestType {
    /// Illness.
    Sick,
    /// Paid vacation.
    Vacation,
    /// Bereavement leave.
    Bereavement,
    /// Unpaid leave; recorded but never deducted.
    Unpaid,
    /// Military service.
    Military,
    /// Jury duty.
    JuryDuty,
    /// Parental leave.
    Parental,
    /// Anything else.
    Other,
}

wire_enum!(LeaveRequestType {
    Sick => "SICK",
    Vacation => "VACATION",
    Bereavement => "BEREAVEMENT",
    Unpaid => "UNPAID",
    Military => "MILITARY",
    JuryDuty => "JURY_DUTY",
    Parental => "PARENTAL",
    Other => "OTHER",
});

/// Balance-tracked bucket a request type is booked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveCategory {
    /// Sick leave bucket.
    Sick,
    /// Vacation bucket; every non-sick request type lands here.
    Vacation,
}

wire_enum!(LeaveCategory {
    Sick => "SICK",
    Vacation => "VACATION",
});

/// Kind of ledger entry. Determines the sign discipline of `days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    /// Periodic credit, strictly positive.
    Accrual,
    /// Debit for approved leave, stored negative.
    Usage,
    /// Manual correction of either sign.
    Adjustment,
}

wire_enum!(EntryKind {
    Accrual => "ACCRUAL",
    Usage => "USAGE",
    Adjustment => "ADJUSTMENT",
});

/// Lifecycle status of an approval request.
///
/// The valid transitions are:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
/// - Pending → Cancelled (cancel, requester only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved by an admin; leave has been booked.
    Approved,
    /// Rejected by an admin.
    Rejected,
    /// Withdrawn by the requester.
    Cancelled,
}

wire_enum!(ApprovalStatus {
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
    Cancelled => "CANCELLED",
});

impl ApprovalStatus {
    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Kind of approval request. Only time off exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalRequestType {
    /// Time-off request with attached details.
    TimeOff,
}

wire_enum!(ApprovalRequestType {
    TimeOff => "TIME_OFF",
});
