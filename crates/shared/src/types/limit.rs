//! Row caps for list endpoints.

use serde::{Deserialize, Serialize};

/// A clamped row limit for list queries.
///
/// Missing or zero limits fall back to a per-query default; oversized
/// limits are capped at [`ListLimit::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListLimit(u64);

impl ListLimit {
    /// Largest number of rows any list query returns.
    pub const MAX: u64 = 500;
    /// Default cap for request and transaction listings.
    pub const DEFAULT: Self = Self(50);
    /// Default cap for the recent-transactions part of a user summary.
    pub const SUMMARY: Self = Self(25);

    /// Builds a limit from an optional caller value.
    #[must_use]
    pub fn or_default(requested: Option<u64>, default: Self) -> Self {
        match requested {
            None | Some(0) => default,
            Some(n) => Self(n.min(Self::MAX)),
        }
    }

    /// Returns the limit as a row count.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Default for ListLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}
