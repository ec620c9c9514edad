//! `SeaORM` Entity for task_entries table.
//!
//! Weekly timesheet rows. The leave ledger reads them to count worked days.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "task_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_name: String,
    pub task_name: String,
    pub week_start_date: Date,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub hours_mon: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub hours_tue: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub hours_wed: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub hours_thu: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub hours_fri: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
