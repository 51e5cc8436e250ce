use axum::{Router, routing::get};

use crate::state::AppState;

pub mod auth;
pub mod consult;
pub mod debtors;
pub mod doc;
pub mod health;
pub mod home;
pub mod orders;
pub mod params;

// Build the router without binding state; it will be provided at the top level.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::landing))
        .route("/health", get(health::health_check))
        .merge(consult::router())
        .merge(auth::router())
        .merge(orders::router())
        .merge(debtors::router())
}
