use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Checklist, HistoryEntry, Order, OrderStatus};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_national_id: String,
    pub customer_address: String,
    pub customer_email: String,
    pub device_type: String,
    pub device_brand: String,
    pub device_model: String,
    pub device_imei: String,
    pub device_serial: String,
    pub device_description: String,
    pub checklist: Checklist,
    pub reported_issue: String,
    pub diagnosis: String,
    pub budgeted: Option<String>,
    pub paid: Option<String>,
    pub payment_date: Option<String>,
}

/// Appends a history entry; any supplied status or money field is applied
/// to the order first.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AppendHistoryRequest {
    /// Derived from the status when left blank.
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub note: String,
    #[serde(default = "default_visible")]
    pub customer_visible: bool,
    pub status: Option<String>,
    pub budgeted: Option<String>,
    pub paid: Option<String>,
    pub payment_date: Option<String>,
}

fn default_visible() -> bool {
    true
}

/// Edits intake and technical fields. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateDetailsRequest {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_national_id: Option<String>,
    pub customer_address: Option<String>,
    pub customer_email: Option<String>,
    pub device_type: Option<String>,
    pub device_brand: Option<String>,
    pub device_model: Option<String>,
    pub device_imei: Option<String>,
    pub device_serial: Option<String>,
    pub device_description: Option<String>,
    pub checklist: Option<Checklist>,
    pub reported_issue: Option<String>,
    pub diagnosis: Option<String>,
    pub service_performed: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithHistory {
    pub order: Order,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChecklistItem {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NewOrderForm {
    pub checklist: Vec<ChecklistItem>,
    pub statuses: Vec<OrderStatus>,
}
