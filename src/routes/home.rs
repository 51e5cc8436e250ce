use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::response::{ApiResponse, Meta};

#[derive(Serialize, ToSchema)]
pub struct Landing {
    pub service: String,
    pub consult: String,
    pub login: String,
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Landing page", body = ApiResponse<Landing>)),
    tag = "Public"
)]
pub async fn landing() -> Json<ApiResponse<Landing>> {
    Json(ApiResponse::success(
        "Repair desk",
        Landing {
            service: "Device repair work orders".to_string(),
            consult: "/consultar".to_string(),
            login: "/login".to_string(),
        },
        Some(Meta::empty()),
    ))
}
