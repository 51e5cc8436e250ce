use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    dto::orders::{
        AppendHistoryRequest, ChecklistItem, CreateOrderRequest, NewOrderForm, OrderList,
        OrderWithHistory, UpdateDetailsRequest,
    },
    entity::{
        order_history::{
            ActiveModel as HistoryActive, Column as HistoryCol, Entity as OrderHistory,
            Model as HistoryModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    lookup_code::{generate_code, is_code_collision},
    middleware::auth::{AuthUser, ensure_admin},
    models::{HistoryEntry, Order, OrderStatus},
    money::{parse_money_cents, parse_payment_date},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
    status::TransitionPolicy,
};

/// Attempts at inserting an order when the storage layer reports that a
/// freshly generated code was taken in the meantime.
const INSERT_ATTEMPTS: usize = 5;
const OPEN_LIST_MAX: i64 = 100;
const FINISHED_LIST_MAX: i64 = 100;

const CHECKLIST_TEMPLATE: [(&str, &str); 12] = [
    ("powers_on", "Powers on"),
    ("display", "Display"),
    ("touch", "Touch / keyboard"),
    ("battery", "Battery"),
    ("charging_port", "Charging port"),
    ("cameras", "Cameras"),
    ("audio", "Speaker and microphone"),
    ("buttons", "Buttons"),
    ("wireless", "Wi-Fi / Bluetooth"),
    ("housing", "Housing and screws"),
    ("sim_tray", "SIM tray"),
    ("accessories", "Accessories left with the device"),
];

/// Money state of an order copied onto a history entry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Snapshot {
    pub budgeted_cents: Option<i64>,
    pub paid_cents: Option<i64>,
    pub payment_date: Option<NaiveDate>,
}

impl Snapshot {
    pub fn of(order: &OrderModel) -> Self {
        Self {
            budgeted_cents: Some(order.budgeted_cents),
            paid_cents: Some(order.paid_cents),
            payment_date: order.payment_date,
        }
    }
}

pub fn new_order_form() -> NewOrderForm {
    NewOrderForm {
        checklist: CHECKLIST_TEMPLATE
            .iter()
            .map(|(key, label)| ChecklistItem {
                key: key.to_string(),
                label: label.to_string(),
            })
            .collect(),
        statuses: OrderStatus::ALL.to_vec(),
    }
}

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithHistory>> {
    if payload.customer_name.trim().is_empty() {
        return Err(AppError::invalid("customer name is required"));
    }
    let budgeted = parse_money_cents(payload.budgeted.as_deref())?;
    let paid = parse_money_cents(payload.paid.as_deref())?;
    let payment_date = parse_optional_date(payload.payment_date.as_deref())?;
    let checklist_json = serde_json::to_string(&payload.checklist)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    let now = Utc::now();
    let template = OrderActive {
        id: NotSet,
        created_at: Set(now),
        updated_at: Set(now),
        status: Set(OrderStatus::Open.as_str().to_string()),
        customer_name: Set(payload.customer_name.trim().to_string()),
        customer_phone: Set(payload.customer_phone.trim().to_string()),
        customer_national_id: Set(payload.customer_national_id.trim().to_string()),
        customer_address: Set(payload.customer_address.trim().to_string()),
        customer_email: Set(payload.customer_email.trim().to_string()),
        device_type: Set(payload.device_type.trim().to_string()),
        device_brand: Set(payload.device_brand.trim().to_string()),
        device_model: Set(payload.device_model.trim().to_string()),
        device_imei: Set(payload.device_imei.trim().to_string()),
        device_serial: Set(payload.device_serial.trim().to_string()),
        device_description: Set(payload.device_description.trim().to_string()),
        checklist_json: Set(checklist_json),
        reported_issue: Set(payload.reported_issue.trim().to_string()),
        diagnosis: Set(payload.diagnosis.trim().to_string()),
        service_performed: Set(String::new()),
        notes: Set(String::new()),
        budgeted_cents: Set(budgeted.unwrap_or(0)),
        paid_cents: Set(paid.unwrap_or(0)),
        payment_date: Set(payment_date),
        lookup_code: NotSet,
    };
    // The intake entry records only what was actually typed in.
    let snapshot = Snapshot {
        budgeted_cents: budgeted,
        paid_cents: paid,
        payment_date,
    };

    for attempt in 1..=INSERT_ATTEMPTS {
        let code = generate_code(&state.orm).await?;
        let mut active = template.clone();
        active.lookup_code = Set(code);

        match insert_with_intake_entry(state, user, active, snapshot).await {
            Ok(order) => {
                tracing::info!(
                    order_id = order.id,
                    user = %user.username,
                    "order created"
                );
                let detail = load_detail(&state.orm, order.id, HistoryView::NewestFirst).await?;
                return Ok(ApiResponse::success(
                    "Order created",
                    detail,
                    Some(Meta::flash(format!(
                        "Order {} created, lookup code {}",
                        crate::models::order_number(order.id),
                        order.lookup_code
                    ))),
                ));
            }
            Err(AppError::OrmError(err)) if is_code_collision(&err) => {
                tracing::warn!(attempt, "lookup code taken during insert, retrying");
            }
            Err(err) => return Err(err),
        }
    }
    Err(AppError::CodeSpaceExhausted)
}

async fn insert_with_intake_entry(
    state: &AppState,
    user: &AuthUser,
    active: OrderActive,
    snapshot: Snapshot,
) -> AppResult<OrderModel> {
    let txn = state.orm.begin().await?;
    let order = active.insert(&txn).await?;
    record_history(
        &txn,
        order.id,
        "Order created",
        "Device received, order opened.",
        Some(&user.username),
        true,
        snapshot,
    )
    .await?;
    txn.commit().await?;
    Ok(order)
}

pub async fn append_history(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    payload: AppendHistoryRequest,
) -> AppResult<ApiResponse<OrderWithHistory>> {
    let status = payload
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<OrderStatus>)
        .transpose()?;
    let budgeted = parse_money_cents(payload.budgeted.as_deref())?;
    let paid = parse_money_cents(payload.paid.as_deref())?;
    let payment_date = parse_optional_date(payload.payment_date.as_deref())?;

    let action = match (payload.action.trim(), status) {
        ("", Some(status)) => format!("Status changed to {status}"),
        ("", None) => return Err(AppError::invalid("action is required")),
        (action, _) => action.to_string(),
    };

    let txn = state.orm.begin().await?;
    let order = Orders::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let current: OrderStatus = order.status.parse()?;
    let mut active: OrderActive = order.into();
    if let Some(status) = status {
        TransitionPolicy::from_strict_flag(state.config.strict_status_transitions)
            .check(current, status)?;
        active.status = Set(status.as_str().to_string());
    }
    if let Some(cents) = budgeted {
        active.budgeted_cents = Set(cents);
    }
    if let Some(cents) = paid {
        active.paid_cents = Set(cents);
    }
    if payment_date.is_some() {
        active.payment_date = Set(payment_date);
    }
    active.updated_at = Set(Utc::now());
    active.update(&txn).await?;

    // Snapshot from a fresh read so the entry matches what is stored now.
    let updated = Orders::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let entry = record_history(
        &txn,
        order_id,
        &action,
        payload.note.trim(),
        Some(&user.username),
        payload.customer_visible,
        Snapshot::of(&updated),
    )
    .await?;
    txn.commit().await?;

    tracing::info!(
        order_id,
        entry_id = entry.id,
        status = %updated.status,
        user = %user.username,
        "history appended"
    );

    let detail = load_detail(&state.orm, order_id, HistoryView::NewestFirst).await?;
    Ok(ApiResponse::success("History updated", detail, Some(Meta::empty())))
}

pub async fn update_details(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
    payload: UpdateDetailsRequest,
) -> AppResult<ApiResponse<OrderWithHistory>> {
    if matches!(payload.customer_name.as_deref(), Some(name) if name.trim().is_empty()) {
        return Err(AppError::invalid("customer name is required"));
    }

    let txn = state.orm.begin().await?;
    let order = Orders::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: OrderActive = order.into();
    let mut changed: Vec<&str> = Vec::new();
    macro_rules! patch {
        ($($field:ident),+ $(,)?) => {
            $(
                if let Some(value) = payload.$field.as_deref() {
                    active.$field = Set(value.trim().to_string());
                    changed.push(stringify!($field));
                }
            )+
        };
    }
    patch!(
        customer_name,
        customer_phone,
        customer_national_id,
        customer_address,
        customer_email,
        device_type,
        device_brand,
        device_model,
        device_imei,
        device_serial,
        device_description,
        reported_issue,
        diagnosis,
        service_performed,
        notes,
    );
    if let Some(checklist) = &payload.checklist {
        active.checklist_json = Set(
            serde_json::to_string(checklist).map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?,
        );
        changed.push("checklist");
    }
    if changed.is_empty() {
        return Err(AppError::invalid("nothing to update"));
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&txn).await?;

    record_history(
        &txn,
        order_id,
        "Order details updated",
        &changed.join(", "),
        Some(&user.username),
        false,
        Snapshot::of(&updated),
    )
    .await?;
    txn.commit().await?;

    let detail = load_detail(&state.orm, order_id, HistoryView::NewestFirst).await?;
    Ok(ApiResponse::success("Order updated", detail, Some(Meta::empty())))
}

pub async fn get_order(state: &AppState, order_id: i32) -> AppResult<ApiResponse<OrderWithHistory>> {
    let detail = load_detail(&state.orm, order_id, HistoryView::NewestFirst).await?;
    Ok(ApiResponse::success("OK", detail, Some(Meta::empty())))
}

/// Receipt handed to the customer at intake: everything, oldest entry first.
pub async fn receipt(state: &AppState, order_id: i32) -> AppResult<ApiResponse<OrderWithHistory>> {
    let detail = load_detail(&state.orm, order_id, HistoryView::OldestFirst).await?;
    Ok(ApiResponse::success("Receipt", detail, Some(Meta::empty())))
}

/// Printable sheet: checklist plus what the customer is allowed to see.
pub async fn print_view(
    state: &AppState,
    order_id: i32,
) -> AppResult<ApiResponse<OrderWithHistory>> {
    let detail = load_detail(&state.orm, order_id, HistoryView::CustomerVisible).await?;
    Ok(ApiResponse::success("Print", detail, Some(Meta::empty())))
}

pub async fn list_open_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let terminal: Vec<&str> = OrderStatus::TERMINAL.iter().map(|s| s.as_str()).collect();
    let condition = Condition::all().add(OrderCol::Status.is_not_in(terminal));
    list_orders(state, condition, query, OPEN_LIST_MAX).await
}

pub async fn list_finished_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let terminal: Vec<&str> = OrderStatus::TERMINAL.iter().map(|s| s.as_str()).collect();
    let condition = Condition::all().add(OrderCol::Status.is_in(terminal));
    list_orders(state, condition, query, FINISHED_LIST_MAX).await
}

async fn list_orders(
    state: &AppState,
    mut condition: Condition,
    query: OrderListQuery,
    max_per_page: i64,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize_with_max(max_per_page);
    if let Some(status) = query.status.as_deref().filter(|s| !s.trim().is_empty()) {
        let status: OrderStatus = status.parse()?;
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::UpdatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::UpdatedAt),
    };
    let finder = finder.order_by_desc(OrderCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    order_id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user, &format!("/os/{order_id}"))?;

    let txn = state.orm.begin().await?;
    Orders::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let removed = OrderHistory::delete_many()
        .filter(HistoryCol::OrderId.eq(order_id))
        .exec(&txn)
        .await?
        .rows_affected;
    Orders::delete_by_id(order_id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(order_id, history_removed = removed, user = %user.username, "order deleted");
    Ok(ApiResponse::success(
        "Order deleted",
        serde_json::json!({ "order_id": order_id, "history_removed": removed }),
        Some(Meta::flash(format!("Order {} deleted", crate::models::order_number(order_id)))),
    ))
}

pub async fn delete_history_entry(
    state: &AppState,
    user: &AuthUser,
    entry_id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let entry = OrderHistory::find_by_id(entry_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_admin(user, &format!("/os/{}", entry.order_id))?;

    OrderHistory::delete_by_id(entry_id).exec(&state.orm).await?;
    tracing::info!(entry_id, order_id = entry.order_id, user = %user.username, "history entry deleted");

    Ok(ApiResponse::success(
        "History entry deleted",
        serde_json::json!({ "entry_id": entry_id, "order_id": entry.order_id }),
        Some(Meta::flash("History entry deleted")),
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HistoryView {
    NewestFirst,
    OldestFirst,
    CustomerVisible,
}

pub(crate) async fn find_order<C: ConnectionTrait>(conn: &C, order_id: i32) -> AppResult<OrderModel> {
    Orders::find_by_id(order_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

pub(crate) async fn load_history<C: ConnectionTrait>(
    conn: &C,
    order_id: i32,
    view: HistoryView,
) -> AppResult<Vec<HistoryEntry>> {
    let mut finder = OrderHistory::find().filter(HistoryCol::OrderId.eq(order_id));
    if view == HistoryView::CustomerVisible {
        finder = finder.filter(HistoryCol::CustomerVisible.eq(true));
    }
    // Ids grow with insertion, so they order entries chronologically.
    finder = match view {
        HistoryView::OldestFirst => finder.order_by_asc(HistoryCol::Id),
        HistoryView::NewestFirst | HistoryView::CustomerVisible => {
            finder.order_by_desc(HistoryCol::Id)
        }
    };
    Ok(finder
        .all(conn)
        .await?
        .into_iter()
        .map(HistoryEntry::from)
        .collect())
}

async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    order_id: i32,
    view: HistoryView,
) -> AppResult<OrderWithHistory> {
    let order = Order::try_from(find_order(conn, order_id).await?)?;
    let history = load_history(conn, order_id, view).await?;
    Ok(OrderWithHistory { order, history })
}

pub(crate) async fn record_history<C: ConnectionTrait>(
    conn: &C,
    order_id: i32,
    action: &str,
    note: &str,
    author: Option<&str>,
    customer_visible: bool,
    snapshot: Snapshot,
) -> AppResult<HistoryModel> {
    let entry = HistoryActive {
        id: NotSet,
        order_id: Set(order_id),
        created_at: Set(Utc::now()),
        action: Set(action.to_string()),
        note: Set(note.to_string()),
        author: Set(author.map(str::to_string)),
        customer_visible: Set(customer_visible),
        budgeted_cents: Set(snapshot.budgeted_cents),
        paid_cents: Set(snapshot.paid_cents),
        payment_date: Set(snapshot.payment_date),
    }
    .insert(conn)
    .await?;
    Ok(entry)
}

fn parse_optional_date(raw: Option<&str>) -> AppResult<Option<NaiveDate>> {
    Ok(raw.map(parse_payment_date).transpose()?.flatten())
}
