//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every mutating operation runs inside a single database transaction.

pub mod accrual;
pub mod approval;
pub mod grant;
pub mod ledger;
pub mod timesheet;
pub mod user;

pub use accrual::AccrualRepository;
pub use approval::{
    ApprovalFilter, ApprovalListItem, ApprovalOutcome, ApprovalRecord, ApprovalRepository,
};
pub use grant::GrantRepository;
pub use ledger::{LedgerRepository, RecordedTransaction, TransactionFilter, UserLeaveSummary};
pub use timesheet::{CreateTaskEntryInput, TimesheetError, TimesheetRepository};
pub use user::UserRepository;
