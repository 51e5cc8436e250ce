mod common;

use axum::{Json, extract::State};
use repair_desk::{
    dto::consult::ConsultRequest,
    error::AppError,
    models::OrderStatus,
    routes::consult,
    services::{consult_service, order_service},
};

use common::{create_order, entry, setup_state, staff};

#[tokio::test]
async fn lookup_matches_code_ignoring_case() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (id, code) = create_order(&state, "Nina", Some("80"), None).await?;

    let found = consult_service::lookup(&state, &id.to_string(), &code.to_lowercase()).await?;
    assert_eq!(found.order.id, id);
    assert_eq!(found.order.status, OrderStatus::Open);

    let padded = consult_service::lookup(&state, &format!("OS-{id:04}"), &format!(" {code} ")).await?;
    assert_eq!(padded.order.id, id);
    Ok(())
}

#[tokio::test]
async fn lookup_distinguishes_failure_kinds() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (id, code) = create_order(&state, "Otto", None, None).await?;
    let wrong = if code == "AAAAAA" { "BBBBBB" } else { "AAAAAA" };

    assert!(matches!(
        consult_service::lookup(&state, &id.to_string(), wrong).await,
        Err(AppError::InvalidCode)
    ));
    assert!(matches!(
        consult_service::lookup(&state, "999", &code).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        consult_service::lookup(&state, "99999999999", &code).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        consult_service::lookup(&state, "abc", &code).await,
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(
        consult_service::lookup(&state, &id.to_string(), "   ").await,
        Err(AppError::InvalidInput(_))
    ));
    Ok(())
}

#[tokio::test]
async fn lookup_returns_only_visible_history_newest_first() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (id, code) = create_order(&state, "Paula", None, None).await?;

    let mut internal = entry("Customer was rude on the phone");
    internal.customer_visible = false;
    order_service::append_history(&state, &staff(), id, internal).await?;
    let mut ready = entry("Ready for pickup");
    ready.status = Some("closed".into());
    order_service::append_history(&state, &staff(), id, ready).await?;

    let found = consult_service::lookup(&state, &id.to_string(), &code).await?;
    let actions: Vec<&str> = found.history.iter().map(|h| h.action.as_str()).collect();
    assert_eq!(actions, vec!["Ready for pickup", "Order created"]);
    assert!(found.history.iter().all(|h| h.customer_visible));
    assert_eq!(found.order.status, OrderStatus::Closed);
    Ok(())
}

#[tokio::test]
async fn consult_route_hides_whether_the_order_exists() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (id, code) = create_order(&state, "Rita", None, None).await?;
    let wrong = if code == "ZZZZZZ" { "YYYYYY" } else { "ZZZZZZ" };

    let wrong_code = consult::consult(
        State(state.clone()),
        Json(ConsultRequest {
            order: id.to_string(),
            code: wrong.into(),
        }),
    )
    .await;
    assert!(matches!(wrong_code, Err(AppError::NotFound)));

    let missing = consult::consult(
        State(state.clone()),
        Json(ConsultRequest {
            order: "4242".into(),
            code: code.clone(),
        }),
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    let Json(body) = consult::consult(
        State(state),
        Json(ConsultRequest {
            order: format!("{id}"),
            code,
        }),
    )
    .await?;
    let result = body.data.expect("consult result");
    assert_eq!(result.order.number, format!("OS-{id:04}"));
    assert_eq!(result.history.len(), 1);
    Ok(())
}
