//! PostgreSQL enum types and their mapping to domain enums.

use hourglass_core::leave as domain;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `leave_category` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "leave_category")]
pub enum LeaveCategory {
    #[sea_orm(string_value = "SICK")]
    Sick,
    #[sea_orm(string_value = "VACATION")]
    Vacation,
}

/// `leave_request_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "leave_request_type")]
pub enum LeaveRequestType {
    #[sea_orm(string_value = "SICK")]
    Sick,
    #[sea_orm(string_value = "VACATION")]
    Vacation,
    #[sea_orm(string_value = "BEREAVEMENT")]
    Bereavement,
    #[sea_orm(string_value = "UNPAID")]
    Unpaid,
    #[sea_orm(string_value = "MILITARY")]
    Military,
    #[sea_orm(string_value = "JURY_DUTY")]
    JuryDuty,
    #[sea_orm(string_value = "PARENTAL")]
    Parental,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

/// `leave_entry_kind` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "leave_entry_kind")]
pub enum LeaveEntryKind {
    #[sea_orm(string_value = "ACCRUAL")]
    Accrual,
    #[sea_orm(string_value = "USAGE")]
    Usage,
    #[sea_orm(string_value = "ADJUSTMENT")]
    Adjustment,
}

/// `approval_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approval_status")]
pub enum ApprovalStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

/// `approval_request_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approval_request_type")]
pub enum ApprovalRequestType {
    #[sea_orm(string_value = "TIME_OFF")]
    TimeOff,
}

macro_rules! map_enum {
    ($db:ident <=> $domain:ident { $($variant:ident),+ $(,)? }) => {
        impl From<domain::$domain> for $db {
            fn from(value: domain::$domain) -> Self {
                match value {
                    $(domain::$domain::$variant => Self::$variant),+
                }
            }
        }

        impl From<$db> for domain::$domain {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant),+
                }
            }
        }
    };
}

map_enum!(LeaveCategory <=> LeaveCategory { Sick, Vacation });
map_enum!(LeaveRequestType <=> LeaveRequestType {
    Sick,
    Vacation,
    Bereavement,
    Unpaid,
    Military,
    JuryDuty,
    Parental,
    Other,
});
map_enum!(LeaveEntryKind <=> EntryKind { Accrual, Usage, Adjustment });
map_enum!(ApprovalStatus <=> ApprovalStatus { Pending, Approved, Rejected, Cancelled });
map_enum!(ApprovalRequestType <=> ApprovalRequestType { TimeOff });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_values_match_core_wire_form() {
        for t in domain::LeaveRequestType::ALL {
            assert_eq!(LeaveRequestType::from(*t).to_value(), t.as_str());
        }
        for s in domain::ApprovalStatus::ALL {
            assert_eq!(ApprovalStatus::from(*s).to_value(), s.as_str());
        }
        for k in domain::EntryKind::ALL {
            assert_eq!(LeaveEntryKind::from(*k).to_value(), k.as_str());
        }
        for c in domain::LeaveCategory::ALL {
            assert_eq!(LeaveCategory::from(*c).to_value(), c.as_str());
        }
    }

    #[test]
    fn test_json_uses_wire_form() {
        assert_eq!(
            serde_json::to_string(&LeaveRequestType::JuryDuty).unwrap(),
            "\"JURY_DUTY\""
        );
        assert_eq!(
            serde_json::to_string(&LeaveEntryKind::Adjustment).unwrap(),
            "\"ADJUSTMENT\""
        );
    }

    #[test]
    fn test_round_trip_through_db_enum() {
        for t in domain::LeaveRequestType::ALL {
            assert_eq!(domain::LeaveRequestType::from(LeaveRequestType::from(*t)), *t);
        }
    }
}
