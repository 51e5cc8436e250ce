use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::response::{ApiResponse, Meta};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid code")]
    InvalidCode,

    #[error("Login required")]
    Unauthorized,

    /// Destructive actions refused for non-admin sessions. The caller is sent
    /// back to `redirect` with the message instead of receiving a 403.
    #[error("Only administrators can perform this action")]
    AdminRequired { redirect: String },

    #[error("Status cannot change from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Could not generate a unique lookup code")]
    CodeSpaceExhausted,

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::InvalidInput(message.into())
    }

    pub fn admin_required(redirect: impl Into<String>) -> Self {
        AppError::AdminRequired {
            redirect: redirect.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, location) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, None),
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, None),
            AppError::InvalidCode => (StatusCode::NOT_FOUND, None),
            AppError::Unauthorized => (StatusCode::SEE_OTHER, Some("/login".to_string())),
            AppError::AdminRequired { redirect } => (StatusCode::SEE_OTHER, Some(redirect.clone())),
            AppError::InvalidTransition { .. } => (StatusCode::BAD_REQUEST, None),
            AppError::CodeSpaceExhausted => (StatusCode::SERVICE_UNAVAILABLE, None),
            AppError::OrmError(err) => {
                tracing::error!(error = %err, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        match location {
            Some(location) => {
                (status, [(header::LOCATION, location)], axum::Json(body)).into_response()
            }
            None => (status, axum::Json(body)).into_response(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn location(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    #[test]
    fn missing_session_redirects_to_login() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/login"));
    }

    #[test]
    fn admin_refusal_redirects_back_to_the_page() {
        let response = AppError::admin_required("/os/7").into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/os/7"));
    }

    #[test]
    fn plain_errors_carry_no_location() {
        let response = AppError::invalid("bad amount").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(location(&response), None);

        let response = AppError::CodeSpaceExhausted.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
