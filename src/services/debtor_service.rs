use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    dto::debtors::{
        CreateDebtorFromOrderRequest, CreateDebtorRequest, DebtorList, DebtorListQuery,
        DebtorSuggestion,
    },
    entity::{
        debtors::{ActiveModel as DebtorActive, Column as DebtorCol, Entity as Debtors, Model as DebtorModel},
        orders::Model as OrderModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Debtor, DebtorStatus, order_number},
    money::{cents_to_decimal, decimal_to_cents, outstanding_cents, parse_money, parse_money_cents},
    response::{ApiResponse, Meta},
    services::order_service::{Snapshot, find_order, record_history},
    state::AppState,
};

pub async fn list_debtors(
    state: &AppState,
    query: DebtorListQuery,
) -> AppResult<ApiResponse<DebtorList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if let Some(status) = query.status.as_deref().filter(|s| !s.trim().is_empty()) {
        let status: DebtorStatus = status.parse()?;
        condition = condition.add(DebtorCol::Status.eq(status.as_str()));
    }

    let finder = Debtors::find()
        .filter(condition)
        .order_by_desc(DebtorCol::CreatedAt)
        .order_by_desc(DebtorCol::Id);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Debtor::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Debtors",
        DebtorList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_debtor(state: &AppState, id: i32) -> AppResult<ApiResponse<Debtor>> {
    let debtor = find_debtor(state, id).await?;
    Ok(ApiResponse::success("OK", Debtor::try_from(debtor)?, Some(Meta::empty())))
}

pub async fn create_debtor(
    state: &AppState,
    user: &AuthUser,
    payload: CreateDebtorRequest,
) -> AppResult<ApiResponse<Debtor>> {
    if payload.customer_name.trim().is_empty() {
        return Err(AppError::invalid("customer name is required"));
    }
    let amount = parse_money(&payload.amount)?
        .ok_or_else(|| AppError::invalid("amount is required"))?;

    let debtor = new_debtor(
        payload.customer_name.trim(),
        payload.customer_phone.trim(),
        decimal_to_cents(amount)?,
        payload.reference.trim(),
        payload.notes.trim(),
    )
    .insert(&state.orm)
    .await?;

    tracing::info!(debtor_id = debtor.id, user = %user.username, "debtor registered");
    Ok(ApiResponse::success(
        "Debtor created",
        Debtor::try_from(debtor)?,
        Some(Meta::empty()),
    ))
}

fn suggestion_for(order: &OrderModel) -> DebtorSuggestion {
    DebtorSuggestion {
        order_id: order.id,
        reference: order_number(order.id),
        customer_name: order.customer_name.clone(),
        customer_phone: order.customer_phone.clone(),
        suggested_amount: cents_to_decimal(outstanding_cents(
            order.budgeted_cents,
            order.paid_cents,
        )),
    }
}

/// Pre-filled debtor for an order: what is still owed, never below zero.
pub async fn suggest_from_order(
    state: &AppState,
    order_id: i32,
) -> AppResult<ApiResponse<DebtorSuggestion>> {
    let order = find_order(&state.orm, order_id).await?;
    Ok(ApiResponse::success(
        "Suggestion",
        suggestion_for(&order),
        Some(Meta::empty()),
    ))
}

/// Register a debt for an order and note it in the order's internal history.
pub async fn create_from_order(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    payload: CreateDebtorFromOrderRequest,
) -> AppResult<ApiResponse<Debtor>> {
    let typed_amount = parse_money_cents(payload.amount.as_deref())?;

    let txn = state.orm.begin().await?;
    let order = find_order(&txn, order_id).await?;
    let suggestion = suggestion_for(&order);
    let amount_cents = match typed_amount {
        Some(cents) => cents,
        None => decimal_to_cents(suggestion.suggested_amount)?,
    };

    let debtor = new_debtor(
        &suggestion.customer_name,
        &suggestion.customer_phone,
        amount_cents,
        &suggestion.reference,
        payload.notes.trim(),
    )
    .insert(&txn)
    .await?;

    record_history(
        &txn,
        order_id,
        "Debtor registered",
        &format!("Outstanding amount {} registered as debt #{}", cents_to_decimal(amount_cents), debtor.id),
        Some(&user.username),
        false,
        Snapshot::of(&order),
    )
    .await?;
    txn.commit().await?;

    tracing::info!(debtor_id = debtor.id, order_id, user = %user.username, "debtor registered from order");
    Ok(ApiResponse::success(
        "Debtor created",
        Debtor::try_from(debtor)?,
        Some(Meta::empty()),
    ))
}

pub async fn mark_paid(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<Debtor>> {
    let debtor = find_debtor(state, id).await?;
    if debtor.status == DebtorStatus::Paid.as_str() {
        return Ok(ApiResponse::success(
            "Debtor already paid",
            Debtor::try_from(debtor)?,
            Some(Meta::empty()),
        ));
    }

    let mut active: DebtorActive = debtor.into();
    active.status = Set(DebtorStatus::Paid.as_str().to_string());
    active.paid_at = Set(Some(Utc::now()));
    let debtor = active.update(&state.orm).await?;

    tracing::info!(debtor_id = id, user = %user.username, "debtor paid");
    Ok(ApiResponse::success(
        "Debtor paid",
        Debtor::try_from(debtor)?,
        Some(Meta::empty()),
    ))
}

pub async fn reopen(state: &AppState, user: &AuthUser, id: i32) -> AppResult<ApiResponse<Debtor>> {
    let debtor = find_debtor(state, id).await?;

    let mut active: DebtorActive = debtor.into();
    active.status = Set(DebtorStatus::Open.as_str().to_string());
    active.paid_at = Set(None);
    let debtor = active.update(&state.orm).await?;

    tracing::info!(debtor_id = id, user = %user.username, "debtor reopened");
    Ok(ApiResponse::success(
        "Debtor reopened",
        Debtor::try_from(debtor)?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_debtor(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user, "/devedores")?;
    let result = Debtors::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(debtor_id = id, user = %user.username, "debtor deleted");
    Ok(ApiResponse::success(
        "Debtor deleted",
        serde_json::json!({ "debtor_id": id }),
        Some(Meta::flash("Debtor deleted")),
    ))
}

async fn find_debtor(state: &AppState, id: i32) -> AppResult<DebtorModel> {
    Debtors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

fn new_debtor(
    customer_name: &str,
    customer_phone: &str,
    amount_cents: i64,
    reference: &str,
    notes: &str,
) -> DebtorActive {
    DebtorActive {
        id: NotSet,
        customer_name: Set(customer_name.to_string()),
        customer_phone: Set(customer_phone.to_string()),
        amount_cents: Set(amount_cents),
        reference: Set(reference.to_string()),
        notes: Set(notes.to_string()),
        status: Set(DebtorStatus::Open.as_str().to_string()),
        created_at: Set(Utc::now()),
        paid_at: Set(None),
    }
}
