//! Leave policy: which bucket a request type is booked against.

use serde::Serialize;

use crate::leave::types::{LeaveCategory, LeaveRequestType};

/// Result of classifying a requested leave type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Bucket of record.
    pub category: LeaveCategory,
    /// Whether entries of this type move the bucket's balance.
    pub affects_balance: bool,
}

/// Stateless leave policy.
pub struct LeavePolicy;

impl LeavePolicy {
    /// Maps a requested type onto its stored category.
    ///
    /// SICK is tracked on its own. UNPAID is filed under VACATION for the
    /// record but never deducted. Every other reason draws on VACATION.
    #[must_use]
    pub const fn classify(requested: LeaveRequestType) -> Classification {
        match requested {
            LeaveRequestType::Sick => Classification {
                category: LeaveCategory::Sick,
                affects_balance: true,
            },
            LeaveRequestType::Unpaid => Classification {
                category: LeaveCategory::Vacation,
                affects_balance: false,
            },
            LeaveRequestType::Vacation
            | LeaveRequestType::Bereavement
            | LeaveRequestType::Military
            | LeaveRequestType::JuryDuty
            | LeaveRequestType::Parental
            | LeaveRequestType::Other => Classification {
                category: LeaveCategory::Vacation,
                affects_balance: true,
            },
        }
    }
}
