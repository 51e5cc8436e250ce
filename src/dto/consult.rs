use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{HistoryEntry, Order, OrderStatus};

/// Customer self-service lookup: order number (`7`, `0007` or `OS-0007`) and code.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ConsultRequest {
    #[serde(default)]
    pub order: String,
    #[serde(default)]
    pub code: String,
}

/// What a customer may see of their order.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicOrder {
    pub number: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer_name: String,
    pub device_type: String,
    pub device_brand: String,
    pub device_model: String,
    pub reported_issue: String,
    #[schema(value_type = String)]
    pub budgeted: Decimal,
    #[schema(value_type = String)]
    pub paid: Decimal,
    pub payment_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicHistoryEntry {
    pub created_at: DateTime<Utc>,
    pub action: String,
    pub note: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConsultResult {
    pub order: PublicOrder,
    pub history: Vec<PublicHistoryEntry>,
}

impl From<Order> for PublicOrder {
    fn from(order: Order) -> Self {
        PublicOrder {
            number: order.number,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
            customer_name: order.customer_name,
            device_type: order.device_type,
            device_brand: order.device_brand,
            device_model: order.device_model,
            reported_issue: order.reported_issue,
            budgeted: order.budgeted,
            paid: order.paid,
            payment_date: order.payment_date,
        }
    }
}

impl From<HistoryEntry> for PublicHistoryEntry {
    fn from(entry: HistoryEntry) -> Self {
        PublicHistoryEntry {
            created_at: entry.created_at,
            action: entry.action,
            note: entry.note,
        }
    }
}
