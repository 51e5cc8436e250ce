use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    error::AppResult,
    response::{ApiResponse, Meta},
    services::auth_service::login_user,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

#[utoipa::path(
    get,
    path = "/login",
    responses((status = 200, description = "Login form")),
    tag = "Auth"
)]
pub async fn login_form() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        "Sign in",
        serde_json::json!({ "fields": ["username", "password"] }),
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_user(&state, payload).await?;
    Ok(Json(resp))
}

/// Sessions are self-contained tokens; logging out means the client drops it.
#[utoipa::path(
    get,
    path = "/logout",
    responses((status = 200, description = "Logged out")),
    tag = "Auth"
)]
pub async fn logout() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        "Logged out",
        serde_json::json!({ "redirect": "/" }),
        Some(Meta::flash("You have been logged out")),
    ))
}
