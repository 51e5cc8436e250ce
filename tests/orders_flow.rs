mod common;

use std::collections::HashSet;

use chrono::NaiveDate;
use repair_desk::{
    config::AppConfig,
    dto::orders::{AppendHistoryRequest, UpdateDetailsRequest},
    entity::{
        OrderHistory, Orders,
        order_history::Column as HistoryCol,
        orders::{ActiveModel as OrderActive, Column as OrderCol},
    },
    error::AppError,
    lookup_code::{is_code_collision, is_well_formed},
    models::OrderStatus,
    routes::params::OrderListQuery,
    services::order_service,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use common::{admin, create_order, entry, intake, setup_state, staff};

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

#[tokio::test]
async fn create_order_opens_ticket_with_intake_entry() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let resp = order_service::create_order(&state, &staff(), intake("Ana", Some("150,00"), None))
        .await?;
    let detail = resp.data.expect("detail");

    assert_eq!(detail.order.id, 1);
    assert_eq!(detail.order.number, "OS-0001");
    assert_eq!(detail.order.status, OrderStatus::Open);
    assert!(is_well_formed(&detail.order.lookup_code));
    assert_eq!(detail.order.budgeted, cents(15000));
    assert_eq!(detail.order.paid, Decimal::ZERO);
    assert_eq!(detail.order.checklist.get("display").map(String::as_str), Some("cracked top corner"));

    assert_eq!(detail.history.len(), 1);
    let first = &detail.history[0];
    assert_eq!(first.action, "Order created");
    assert!(first.customer_visible);
    assert_eq!(first.author.as_deref(), Some("tiago"));
    // Snapshot carries only what was supplied at intake.
    assert_eq!(first.budgeted, Some(cents(15000)));
    assert_eq!(first.paid, None);
    assert_eq!(first.payment_date, None);
    Ok(())
}

#[tokio::test]
async fn lookup_codes_are_unique_across_orders() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let mut codes = HashSet::new();
    for i in 0..25 {
        let (_, code) = create_order(&state, &format!("Customer {i}"), None, None).await?;
        assert!(is_well_formed(&code), "bad code {code}");
        assert!(codes.insert(code), "duplicate lookup code");
    }
    Ok(())
}

#[tokio::test]
async fn storage_rejects_a_duplicate_lookup_code() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (id, code) = create_order(&state, "Caio", None, None).await?;
    let existing = Orders::find_by_id(id).one(&state.orm).await?.expect("stored order");

    let mut copy = OrderActive::from(existing).reset_all();
    copy.id = NotSet;
    copy.customer_name = Set("Someone else".into());
    let err = copy.insert(&state.orm).await.expect_err("duplicate code accepted");
    assert!(is_code_collision(&err), "unexpected error: {err:?}");

    let holders = Orders::find()
        .filter(OrderCol::LookupCode.eq(code.as_str()))
        .count(&state.orm)
        .await?;
    assert_eq!(holders, 1);
    Ok(())
}

#[tokio::test]
async fn create_order_rejects_unparseable_money() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let result =
        order_service::create_order(&state, &staff(), intake("Ana", Some("cento e vinte"), None))
            .await;
    assert!(matches!(result, Err(AppError::InvalidInput(_))));

    let open = order_service::list_open_orders(&state, OrderListQuery::default()).await?;
    assert!(open.data.expect("list").items.is_empty());
    Ok(())
}

#[tokio::test]
async fn append_history_snapshots_post_update_money() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (id, _) = create_order(&state, "Bruno", Some("150.00"), Some("0")).await?;

    let mut update = entry("Payment received");
    update.paid = Some("R$ 150,00".into());
    update.payment_date = Some("09/03/2026".into());
    update.status = Some("in_progress".into());
    let detail = order_service::append_history(&state, &staff(), id, update)
        .await?
        .data
        .expect("detail");

    assert_eq!(detail.order.paid, cents(15000));
    assert_eq!(detail.order.status, OrderStatus::InProgress);

    let newest = &detail.history[0];
    assert_eq!(newest.action, "Payment received");
    assert_eq!(newest.paid, Some(detail.order.paid));
    assert_eq!(newest.budgeted, Some(detail.order.budgeted));
    assert_eq!(newest.payment_date, NaiveDate::from_ymd_opt(2026, 3, 9));
    assert_eq!(newest.payment_date, detail.order.payment_date);

    // The intake entry keeps its own, older snapshot.
    let oldest = detail.history.last().expect("intake entry");
    assert_eq!(oldest.paid, Some(Decimal::ZERO));
    Ok(())
}

#[tokio::test]
async fn append_history_only_touches_supplied_fields() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (id, _) = create_order(&state, "Carla", Some("200"), Some("50")).await?;

    let mut quote = entry("Quote revised");
    quote.budgeted = Some("250,00".into());
    order_service::append_history(&state, &staff(), id, quote).await?;

    let detail = order_service::get_order(&state, id).await?.data.expect("detail");
    assert_eq!(detail.order.budgeted, cents(25000));
    assert_eq!(detail.order.paid, cents(5000));
    assert_eq!(detail.order.status, OrderStatus::Open);
    assert_eq!(detail.history[0].paid, Some(cents(5000)));
    Ok(())
}

#[tokio::test]
async fn append_history_on_missing_order_is_not_found() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let result = order_service::append_history(&state, &staff(), 404, entry("Anything")).await;
    assert!(matches!(result, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn append_history_validates_status_and_action() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (id, _) = create_order(&state, "Davi", None, None).await?;

    let mut bogus = entry("Shipped");
    bogus.status = Some("shipped".into());
    assert!(matches!(
        order_service::append_history(&state, &staff(), id, bogus).await,
        Err(AppError::InvalidInput(_))
    ));

    assert!(matches!(
        order_service::append_history(&state, &staff(), id, entry("  ")).await,
        Err(AppError::InvalidInput(_))
    ));

    let mut status_only = entry("");
    status_only.status = Some("awaiting_quote".into());
    let detail = order_service::append_history(&state, &staff(), id, status_only)
        .await?
        .data
        .expect("detail");
    assert_eq!(detail.history[0].action, "Status changed to awaiting_quote");

    let form: AppendHistoryRequest =
        serde_json::from_value(serde_json::json!({ "status": "in_progress" }))?;
    assert!(form.customer_visible);
    let detail = order_service::append_history(&state, &staff(), id, form)
        .await?
        .data
        .expect("detail");
    assert_eq!(detail.history[0].action, "Status changed to in_progress");
    assert_eq!(detail.order.status, OrderStatus::InProgress);
    Ok(())
}

#[tokio::test]
async fn loose_mode_allows_reopening_a_closed_order() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (id, _) = create_order(&state, "Elisa", None, None).await?;

    let mut close = entry("Delivered");
    close.status = Some("closed".into());
    order_service::append_history(&state, &staff(), id, close).await?;

    let mut reopen = entry("Came back with the same fault");
    reopen.status = Some("open".into());
    let detail = order_service::append_history(&state, &staff(), id, reopen)
        .await?
        .data
        .expect("detail");
    assert_eq!(detail.order.status, OrderStatus::Open);
    Ok(())
}

#[tokio::test]
async fn strict_mode_rejects_skipping_steps() -> anyhow::Result<()> {
    let mut config = AppConfig::for_database("sqlite::memory:", common::SECRET);
    config.strict_status_transitions = true;
    let state = common::setup_state_with(config).await?;
    let (id, _) = create_order(&state, "Fabio", None, None).await?;

    let mut jump = entry("Done");
    jump.status = Some("closed".into());
    assert!(matches!(
        order_service::append_history(&state, &staff(), id, jump).await,
        Err(AppError::InvalidTransition { .. })
    ));

    let mut step = entry("Waiting for quote");
    step.status = Some("awaiting_quote".into());
    order_service::append_history(&state, &staff(), id, step).await?;

    let detail = order_service::get_order(&state, id).await?.data.expect("detail");
    assert_eq!(detail.order.status, OrderStatus::AwaitingQuote);
    assert_eq!(detail.history.len(), 2);
    Ok(())
}

#[tokio::test]
async fn customer_visible_history_is_an_ordered_subset() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (id, _) = create_order(&state, "Gabi", None, None).await?;

    let mut internal = entry("Part ordered from supplier");
    internal.customer_visible = false;
    order_service::append_history(&state, &staff(), id, internal).await?;
    order_service::append_history(&state, &staff(), id, entry("Repair started")).await?;

    let full = order_service::get_order(&state, id).await?.data.expect("detail").history;
    let visible = order_service::print_view(&state, id).await?.data.expect("print").history;

    assert_eq!(full.len(), 3);
    assert_eq!(visible.len(), 2);
    let expected: Vec<i32> = full
        .iter()
        .filter(|e| e.customer_visible)
        .map(|e| e.id)
        .collect();
    let got: Vec<i32> = visible.iter().map(|e| e.id).collect();
    assert_eq!(got, expected);

    let receipt = order_service::receipt(&state, id).await?.data.expect("receipt").history;
    let ascending: Vec<i32> = receipt.iter().map(|e| e.id).collect();
    let mut reversed: Vec<i32> = full.iter().map(|e| e.id).collect();
    reversed.reverse();
    assert_eq!(ascending, reversed);
    Ok(())
}

#[tokio::test]
async fn panels_split_open_and_finished_orders() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (working, _) = create_order(&state, "Hugo", None, None).await?;
    let (closed, _) = create_order(&state, "Iris", None, None).await?;
    let (lost, _) = create_order(&state, "Joao", None, None).await?;

    let mut close = entry("Delivered");
    close.status = Some("closed".into());
    order_service::append_history(&state, &staff(), closed, close).await?;
    let mut give_up = entry("Board damaged beyond repair");
    give_up.status = Some("unrepairable".into());
    order_service::append_history(&state, &staff(), lost, give_up).await?;

    let open: Vec<i32> = order_service::list_open_orders(&state, OrderListQuery::default())
        .await?
        .data
        .expect("open")
        .items
        .iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(open, vec![working]);

    let finished = order_service::list_finished_orders(&state, OrderListQuery::default())
        .await?;
    assert_eq!(finished.meta.as_ref().and_then(|m| m.total), Some(2));
    let ids: HashSet<i32> = finished.data.expect("finished").items.iter().map(|o| o.id).collect();
    assert_eq!(ids, HashSet::from([closed, lost]));
    Ok(())
}

#[tokio::test]
async fn update_details_patches_fields_and_logs_internally() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (id, code) = create_order(&state, "Karen", None, None).await?;

    let patch = UpdateDetailsRequest {
        diagnosis: Some("Charging IC shorted".into()),
        service_performed: Some("Replaced charging IC".into()),
        ..UpdateDetailsRequest::default()
    };
    let detail = order_service::update_details(&state, &staff(), id, patch)
        .await?
        .data
        .expect("detail");

    assert_eq!(detail.order.diagnosis, "Charging IC shorted");
    assert_eq!(detail.order.service_performed, "Replaced charging IC");
    assert_eq!(detail.order.customer_name, "Karen");
    assert_eq!(detail.order.lookup_code, code);
    assert_eq!(detail.history[0].action, "Order details updated");
    assert!(!detail.history[0].customer_visible);

    assert!(matches!(
        order_service::update_details(&state, &staff(), id, UpdateDetailsRequest::default()).await,
        Err(AppError::InvalidInput(_))
    ));
    Ok(())
}

#[tokio::test]
async fn delete_order_removes_its_history() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (id, _) = create_order(&state, "Lia", None, None).await?;
    let (other, _) = create_order(&state, "Mauro", None, None).await?;
    order_service::append_history(&state, &staff(), id, entry("Diagnosed")).await?;

    let resp = order_service::delete_order(&state, &admin(), id).await?;
    assert_eq!(resp.message, "Order deleted");

    assert!(matches!(
        order_service::get_order(&state, id).await,
        Err(AppError::NotFound)
    ));
    let remaining = OrderHistory::find()
        .filter(HistoryCol::OrderId.eq(id))
        .count(&state.orm)
        .await?;
    assert_eq!(remaining, 0);
    let survivors = order_service::get_order(&state, other).await?.data.expect("detail");
    assert_eq!(survivors.history.len(), 1);
    Ok(())
}
