//! `SeaORM` Entity for time_off_details table (one row per request).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{LeaveCategory, LeaveRequestType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "time_off_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub approval_request_id: Uuid,
    pub requested_type: LeaveRequestType,
    pub category: LeaveCategory,
    pub period_start: Date,
    pub period_end: Date,
    #[sea_orm(column_type = "Decimal(Some((12, 4)))")]
    pub total_days: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 4)))", nullable)]
    pub partial_start_days: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((12, 4)))", nullable)]
    pub partial_end_days: Option<Decimal>,
    pub override_balance: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::approval_requests::Entity",
        from = "Column::ApprovalRequestId",
        to = "super::approval_requests::Column::Id"
    )]
    ApprovalRequests,
}

impl Related<super::approval_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApprovalRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
