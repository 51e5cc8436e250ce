use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    entity::{debtors, order_history, orders, users},
    error::AppError,
    money::cents_to_decimal,
};

pub use crate::status::OrderStatus;

/// Inspection checklist captured at intake: item key -> observation.
pub type Checklist = BTreeMap<String, String>;

/// Display number of an order, e.g. `OS-0042`.
pub fn order_number(id: i32) -> String {
    format!("OS-{id:04}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(AppError::invalid(format!("unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DebtorStatus {
    Open,
    Paid,
}

impl DebtorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtorStatus::Open => "open",
            DebtorStatus::Paid => "paid",
        }
    }
}

impl FromStr for DebtorStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(DebtorStatus::Open),
            "paid" => Ok(DebtorStatus::Paid),
            other => Err(AppError::invalid(format!("unknown debtor status '{other}'"))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: OrderStatus,
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
    pub service_performed: String,
    pub notes: String,
    #[schema(value_type = String)]
    pub budgeted: Decimal,
    #[schema(value_type = String)]
    pub paid: Decimal,
    pub payment_date: Option<NaiveDate>,
    pub lookup_code: String,
}

/// One append-only history row, with the order's money fields as they were
/// right after the entry was written.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    pub id: i32,
    pub order_id: i32,
    pub created_at: DateTime<Utc>,
    pub action: String,
    pub note: String,
    pub author: Option<String>,
    pub customer_visible: bool,
    #[schema(value_type = Option<String>)]
    pub budgeted: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub paid: Option<Decimal>,
    pub payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Debtor {
    pub id: i32,
    pub customer_name: String,
    pub customer_phone: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub reference: String,
    pub notes: String,
    pub status: DebtorStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl TryFrom<users::Model> for User {
    type Error = AppError;

    fn try_from(model: users::Model) -> Result<Self, Self::Error> {
        Ok(User {
            id: model.id,
            role: model.role.parse()?,
            username: model.username,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<orders::Model> for Order {
    type Error = AppError;

    fn try_from(model: orders::Model) -> Result<Self, Self::Error> {
        let checklist: Checklist = serde_json::from_str(&model.checklist_json).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("order {} has a corrupt checklist: {e}", model.id))
        })?;
        Ok(Order {
            id: model.id,
            number: order_number(model.id),
            created_at: model.created_at,
            updated_at: model.updated_at,
            status: model.status.parse()?,
            customer_name: model.customer_name,
            customer_phone: model.customer_phone,
            customer_national_id: model.customer_national_id,
            customer_address: model.customer_address,
            customer_email: model.customer_email,
            device_type: model.device_type,
            device_brand: model.device_brand,
            device_model: model.device_model,
            device_imei: model.device_imei,
            device_serial: model.device_serial,
            device_description: model.device_description,
            checklist,
            reported_issue: model.reported_issue,
            diagnosis: model.diagnosis,
            service_performed: model.service_performed,
            notes: model.notes,
            budgeted: cents_to_decimal(model.budgeted_cents),
            paid: cents_to_decimal(model.paid_cents),
            payment_date: model.payment_date,
            lookup_code: model.lookup_code,
        })
    }
}

impl From<order_history::Model> for HistoryEntry {
    fn from(model: order_history::Model) -> Self {
        HistoryEntry {
            id: model.id,
            order_id: model.order_id,
            created_at: model.created_at,
            action: model.action,
            note: model.note,
            author: model.author,
            customer_visible: model.customer_visible,
            budgeted: model.budgeted_cents.map(cents_to_decimal),
            paid: model.paid_cents.map(cents_to_decimal),
            payment_date: model.payment_date,
        }
    }
}

impl TryFrom<debtors::Model> for Debtor {
    type Error = AppError;

    fn try_from(model: debtors::Model) -> Result<Self, Self::Error> {
        Ok(Debtor {
            id: model.id,
            customer_name: model.customer_name,
            customer_phone: model.customer_phone,
            amount: cents_to_decimal(model.amount_cents),
            reference: model.reference,
            notes: model.notes,
            status: model.status.parse()?,
            created_at: model.created_at,
            paid_at: model.paid_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_numbers_are_zero_padded() {
        assert_eq!(order_number(7), "OS-0007");
        assert_eq!(order_number(12345), "OS-12345");
    }

    #[test]
    fn roles_round_trip_through_strings() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.to_string(), "user");
        assert!("tecnico".parse::<Role>().is_err());
    }
}
