//! Shared types, errors, and configuration for Hourglass.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - List limits for query endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token validation

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, Role};
pub use config::{AppConfig, LeaveConfig};
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
