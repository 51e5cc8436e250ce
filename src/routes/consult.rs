use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::consult::{ConsultRequest, ConsultResult, PublicHistoryEntry, PublicOrder},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    services::consult_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/consultar", get(consult_form).post(consult))
}

#[utoipa::path(
    get,
    path = "/consultar",
    params(
        ("order" = Option<String>, Query, description = "Order number, e.g. 7 or OS-0007"),
        ("code" = Option<String>, Query, description = "Lookup code printed on the receipt")
    ),
    responses(
        (status = 200, description = "Lookup result, or an empty form when nothing was asked", body = ApiResponse<ConsultResult>),
        (status = 400, description = "Malformed order number or code"),
        (status = 404, description = "No order with this number and code")
    ),
    tag = "Consultation"
)]
pub async fn consult_form(
    State(state): State<AppState>,
    Query(query): Query<ConsultRequest>,
) -> AppResult<Json<ApiResponse<ConsultResult>>> {
    if query.order.trim().is_empty() && query.code.trim().is_empty() {
        return Ok(Json(ApiResponse {
            message: "Enter the order number and lookup code".to_string(),
            data: None,
            meta: Some(Meta::empty()),
        }));
    }
    run_lookup(&state, query).await
}

#[utoipa::path(
    post,
    path = "/consultar",
    request_body = ConsultRequest,
    responses(
        (status = 200, description = "Order status and customer-visible history", body = ApiResponse<ConsultResult>),
        (status = 400, description = "Malformed order number or code"),
        (status = 404, description = "No order with this number and code")
    ),
    tag = "Consultation"
)]
pub async fn consult(
    State(state): State<AppState>,
    Json(payload): Json<ConsultRequest>,
) -> AppResult<Json<ApiResponse<ConsultResult>>> {
    run_lookup(&state, payload).await
}

async fn run_lookup(
    state: &AppState,
    request: ConsultRequest,
) -> AppResult<Json<ApiResponse<ConsultResult>>> {
    // A wrong code must look exactly like a missing order.
    let found = match consult_service::lookup(state, &request.order, &request.code).await {
        Ok(found) => found,
        Err(AppError::NotFound | AppError::InvalidCode) => return Err(AppError::NotFound),
        Err(err) => return Err(err),
    };

    let result = ConsultResult {
        order: PublicOrder::from(found.order),
        history: found
            .history
            .into_iter()
            .map(PublicHistoryEntry::from)
            .collect(),
    };
    Ok(Json(ApiResponse::success("Order found", result, Some(Meta::empty()))))
}
