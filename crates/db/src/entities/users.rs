//! `SeaORM` Entity for users table.
//!
//! Users are owned by the HR directory; the leave ledger only reads the
//! start date and reads/writes the initial sick leave flag.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: String,
    pub start_date: Option<Date>,
    pub initial_sick_leave_granted: bool,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::leave_balances::Entity")]
    LeaveBalances,
    #[sea_orm(has_many = "super::task_entries::Entity")]
    TaskEntries,
}

impl Related<super::leave_balances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveBalances.def()
    }
}

impl Related<super::task_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
