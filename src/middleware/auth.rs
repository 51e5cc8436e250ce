use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::{dto::auth::Claims, error::AppError, models::Role, state::AppState};

/// The staff member behind a request, taken from their session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Refuse destructive actions for non-admins; the caller goes back to
/// `redirect` with a notice.
pub fn ensure_admin(user: &AuthUser, redirect: &str) -> Result<(), AppError> {
    if !user.is_admin() {
        tracing::warn!(user = %user.username, redirect, "admin action refused");
        return Err(AppError::admin_required(redirect));
    }
    Ok(())
}

pub fn decode_session(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let user_id = decoded
        .claims
        .sub
        .parse::<i32>()
        .map_err(|_| AppError::Unauthorized)?;
    let role = decoded
        .claims
        .role
        .parse::<Role>()
        .map_err(|_| AppError::Unauthorized)?;

    Ok(AuthUser {
        user_id,
        username: decoded.claims.username,
        role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header.to_str().map_err(|_| AppError::Unauthorized)?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AppError::Unauthorized)?;

        decode_session(token, &state.config.secret_key)
    }
}
