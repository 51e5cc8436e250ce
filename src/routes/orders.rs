use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};

use crate::{
    dto::orders::{
        AppendHistoryRequest, CreateOrderRequest, NewOrderForm, OrderList, OrderWithHistory,
        UpdateDetailsRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/painel", get(open_orders))
        .route("/os/finalizadas", get(finished_orders))
        .route("/os/nova", get(new_order_form).post(create_order))
        .route("/os/{id}", get(get_order))
        .route("/os/{id}/historico", post(append_history))
        .route("/os/{id}/editar", post(update_details))
        .route("/os/{id}/excluir", post(delete_order))
        .route("/os/{id}/comprovante", get(receipt))
        .route("/os/{id}/imprimir", get(print_view))
        .route("/historico/{id}/excluir", post(delete_history_entry))
}

#[utoipa::path(
    get,
    path = "/painel",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Only orders in this status"),
        ("sort_order" = Option<String>, Query, description = "Sort by last update: asc, desc")
    ),
    responses(
        (status = 200, description = "Orders still being worked on", body = ApiResponse<OrderList>),
        (status = 303, description = "Login required")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn open_orders(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_open_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/os/finalizadas",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, at most 100"),
        ("status" = Option<String>, Query, description = "closed or unrepairable")
    ),
    responses(
        (status = 200, description = "Closed and unrepairable orders", body = ApiResponse<OrderList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn finished_orders(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_finished_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/os/nova",
    responses(
        (status = 200, description = "Intake form: checklist items and statuses", body = ApiResponse<NewOrderForm>)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn new_order_form(_user: AuthUser) -> Json<ApiResponse<NewOrderForm>> {
    Json(ApiResponse::success(
        "New order",
        order_service::new_order_form(),
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    post,
    path = "/os/nova",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order created with its intake history entry", body = ApiResponse<OrderWithHistory>),
        (status = 400, description = "Invalid input")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderWithHistory>>> {
    let resp = order_service::create_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/os/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with its full history, newest first", body = ApiResponse<OrderWithHistory>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<OrderWithHistory>>> {
    let resp = order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/os/{id}/historico",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = AppendHistoryRequest,
    responses(
        (status = 200, description = "Entry appended, status and money updated", body = ApiResponse<OrderWithHistory>),
        (status = 400, description = "Invalid status, amount, date or transition"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn append_history(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<AppendHistoryRequest>,
) -> AppResult<Json<ApiResponse<OrderWithHistory>>> {
    let resp = order_service::append_history(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/os/{id}/editar",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = UpdateDetailsRequest,
    responses(
        (status = 200, description = "Details updated", body = ApiResponse<OrderWithHistory>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_details(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateDetailsRequest>,
) -> AppResult<Json<ApiResponse<OrderWithHistory>>> {
    let resp = order_service::update_details(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/os/{id}/excluir",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order and its history deleted"),
        (status = 303, description = "Refused: admin only, redirected back to the order"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = order_service::delete_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/os/{id}/comprovante",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Intake receipt, history oldest first", body = ApiResponse<OrderWithHistory>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn receipt(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<OrderWithHistory>>> {
    let resp = order_service::receipt(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/os/{id}/imprimir",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Print sheet with customer-visible history", body = ApiResponse<OrderWithHistory>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn print_view(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<OrderWithHistory>>> {
    let resp = order_service::print_view(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/historico/{id}/excluir",
    params(("id" = i32, Path, description = "History entry ID")),
    responses(
        (status = 200, description = "History entry deleted"),
        (status = 303, description = "Refused: admin only"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn delete_history_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = order_service::delete_history_entry(&state, &user, id).await?;
    Ok(Json(resp))
}
