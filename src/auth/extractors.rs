use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use crate::auth::cookie;
use crate::auth::jwt::JwtKeys;
use crate::error::AppError;
use crate::state::AppState;
use crate::users::repo::Role;

/// The authenticated caller, resolved from the session cookie.
///
/// Handlers take this as an explicit parameter; there is no ambient
/// per-request user state anywhere else.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie::extract(&parts.headers, &state.config.cookie.name)
            .ok_or_else(|| AppError::unauthenticated("Access token required"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|_| {
            tracing::warn!("invalid or expired token");
            AppError::unauthenticated("Invalid or expired token")
        })?;

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}
