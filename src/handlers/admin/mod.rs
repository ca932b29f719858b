pub mod create;
pub mod delete;
pub mod list;

use axum::http::HeaderMap;

use crate::auth::ClaimsSet;
use crate::error::ApiError;

/// Admin gate shared by the user lifecycle handlers. Runs before any
/// directory call.
pub fn require_admin(headers: &HeaderMap) -> Result<ClaimsSet, ApiError> {
    let claims = ClaimsSet::from_headers(headers);
    if !claims.is_admin() {
        tracing::warn!("unauthorized access attempt by non-admin caller");
        return Err(ApiError::forbidden("Forbidden: Admins only"));
    }
    Ok(claims)
}
