//! Core business logic for Hourglass.
//!
//! This crate contains pure leave-accounting logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `leave` - Leave policy, ledger rules, accrual, approvals and grants

pub mod leave;
