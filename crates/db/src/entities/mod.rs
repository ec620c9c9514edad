//! `SeaORM` entity definitions.

pub mod approval_requests;
pub mod leave_balances;
pub mod leave_transactions;
pub mod sea_orm_active_enums;
pub mod task_entries;
pub mod time_off_details;
pub mod users;
