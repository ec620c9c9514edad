//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod admin_time_off;
pub mod health;
pub mod time_off;

/// Creates the API router; everything but health requires a bearer token.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(time_off::routes())
        .merge(admin_time_off::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}

/// Parses a comma-separated list with `parse`, ignoring empty items.
pub(crate) fn parse_list<T>(
    raw: Option<&str>,
    what: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, crate::ApiError> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse(s).ok_or_else(|| crate::ApiError::validation(format!("Invalid {what}: {s}"))))
        .collect()
}

/// Parses an optional single value with `parse`.
pub(crate) fn parse_opt<T>(
    raw: Option<&str>,
    what: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, crate::ApiError> {
    raw.map(|s| parse(s).ok_or_else(|| crate::ApiError::validation(format!("Invalid {what}: {s}"))))
        .transpose()
}
