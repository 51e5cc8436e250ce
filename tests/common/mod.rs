#![allow(dead_code)]

use repair_desk::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::orders::{AppendHistoryRequest, CreateOrderRequest},
    middleware::auth::AuthUser,
    models::{Checklist, Role},
    services::order_service,
    state::AppState,
};

pub const SECRET: &str = "test-secret-key";

/// Fresh, fully migrated in-memory store per test.
pub async fn setup_state() -> anyhow::Result<AppState> {
    setup_state_with(AppConfig::for_database("sqlite::memory:", SECRET)).await
}

pub async fn setup_state_with(config: AppConfig) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    Ok(AppState::new(orm, config))
}

pub fn staff() -> AuthUser {
    AuthUser {
        user_id: 2,
        username: "tiago".into(),
        role: Role::User,
    }
}

pub fn admin() -> AuthUser {
    AuthUser {
        user_id: 1,
        username: "lucas".into(),
        role: Role::Admin,
    }
}

pub fn intake(customer: &str, budgeted: Option<&str>, paid: Option<&str>) -> CreateOrderRequest {
    let mut checklist = Checklist::new();
    checklist.insert("powers_on".into(), "yes".into());
    checklist.insert("display".into(), "cracked top corner".into());
    CreateOrderRequest {
        customer_name: customer.into(),
        customer_phone: "(11) 98888-7777".into(),
        customer_national_id: "123.456.789-00".into(),
        customer_address: "Rua das Flores, 10".into(),
        customer_email: "cliente@example.com".into(),
        device_type: "phone".into(),
        device_brand: "Motorola".into(),
        device_model: "G54".into(),
        device_imei: "359881234567890".into(),
        device_description: "Black, with case".into(),
        checklist,
        reported_issue: "Does not charge".into(),
        budgeted: budgeted.map(str::to_string),
        paid: paid.map(str::to_string),
        ..CreateOrderRequest::default()
    }
}

pub fn entry(action: &str) -> AppendHistoryRequest {
    AppendHistoryRequest {
        action: action.into(),
        note: String::new(),
        customer_visible: true,
        status: None,
        budgeted: None,
        paid: None,
        payment_date: None,
    }
}

/// Create an order and return its id and lookup code.
pub async fn create_order(
    state: &AppState,
    customer: &str,
    budgeted: Option<&str>,
    paid: Option<&str>,
) -> anyhow::Result<(i32, String)> {
    let resp =
        order_service::create_order(state, &staff(), intake(customer, budgeted, paid)).await?;
    let order = resp.data.expect("created order").order;
    Ok((order.id, order.lookup_code))
}
