use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};

use crate::{
    dto::debtors::{
        CreateDebtorFromOrderRequest, CreateDebtorRequest, DebtorDraft, DebtorList,
        DebtorListQuery, DebtorSuggestion,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Debtor, DebtorStatus},
    response::{ApiResponse, Meta},
    services::debtor_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/devedores", get(list_debtors).post(create_debtor))
        .route("/devedores/novo", get(new_debtor_form).post(create_debtor))
        .route("/devedores/{id}", get(get_debtor))
        .route("/devedores/{id}/pagar", post(mark_paid))
        .route("/devedores/{id}/reabrir", post(reopen))
        .route("/devedores/{id}/excluir", post(delete_debtor))
        .route("/os/{id}/devedor", get(suggest_from_order).post(create_from_order))
}

#[utoipa::path(
    get,
    path = "/devedores",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "open or paid")
    ),
    responses((status = 200, description = "Debtors, newest first", body = ApiResponse<DebtorList>)),
    security(("bearer_auth" = [])),
    tag = "Debtors"
)]
pub async fn list_debtors(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<DebtorListQuery>,
) -> AppResult<Json<ApiResponse<DebtorList>>> {
    let resp = debtor_service::list_debtors(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/devedores/novo",
    responses((status = 200, description = "Blank debtor form", body = ApiResponse<DebtorDraft>)),
    security(("bearer_auth" = [])),
    tag = "Debtors"
)]
pub async fn new_debtor_form(_user: AuthUser) -> Json<ApiResponse<DebtorDraft>> {
    let draft = DebtorDraft {
        amount: "0.00".to_string(),
        statuses: vec![DebtorStatus::Open, DebtorStatus::Paid],
        ..DebtorDraft::default()
    };
    Json(ApiResponse::success("New debtor", draft, Some(Meta::empty())))
}

#[utoipa::path(
    post,
    path = "/devedores/novo",
    request_body = CreateDebtorRequest,
    responses(
        (status = 200, description = "Debtor created", body = ApiResponse<Debtor>),
        (status = 400, description = "Invalid input")
    ),
    security(("bearer_auth" = [])),
    tag = "Debtors"
)]
pub async fn create_debtor(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateDebtorRequest>,
) -> AppResult<Json<ApiResponse<Debtor>>> {
    let resp = debtor_service::create_debtor(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/devedores/{id}",
    params(("id" = i32, Path, description = "Debtor ID")),
    responses(
        (status = 200, description = "Debtor", body = ApiResponse<Debtor>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Debtors"
)]
pub async fn get_debtor(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Debtor>>> {
    let resp = debtor_service::get_debtor(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/devedores/{id}/pagar",
    params(("id" = i32, Path, description = "Debtor ID")),
    responses(
        (status = 200, description = "Debtor marked as paid", body = ApiResponse<Debtor>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Debtors"
)]
pub async fn mark_paid(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Debtor>>> {
    let resp = debtor_service::mark_paid(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/devedores/{id}/reabrir",
    params(("id" = i32, Path, description = "Debtor ID")),
    responses(
        (status = 200, description = "Debtor reopened", body = ApiResponse<Debtor>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Debtors"
)]
pub async fn reopen(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Debtor>>> {
    let resp = debtor_service::reopen(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/devedores/{id}/excluir",
    params(("id" = i32, Path, description = "Debtor ID")),
    responses(
        (status = 200, description = "Debtor deleted"),
        (status = 303, description = "Refused: admin only"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Debtors"
)]
pub async fn delete_debtor(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = debtor_service::delete_debtor(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/os/{id}/devedor",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Debtor pre-filled from the order", body = ApiResponse<DebtorSuggestion>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Debtors"
)]
pub async fn suggest_from_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<DebtorSuggestion>>> {
    let resp = debtor_service::suggest_from_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/os/{id}/devedor",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = CreateDebtorFromOrderRequest,
    responses(
        (status = 200, description = "Debtor created and noted in the order history", body = ApiResponse<Debtor>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Debtors"
)]
pub async fn create_from_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<CreateDebtorFromOrderRequest>,
) -> AppResult<Json<ApiResponse<Debtor>>> {
    let resp = debtor_service::create_from_order(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
