use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{Debtor, DebtorStatus},
    routes::params::Pagination,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDebtorRequest {
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    /// Money as typed in the form, `150,00` or `150.00`.
    pub amount: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateDebtorFromOrderRequest {
    /// Defaults to the outstanding amount of the order.
    pub amount: Option<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DebtorSuggestion {
    pub order_id: i32,
    pub reference: String,
    pub customer_name: String,
    pub customer_phone: String,
    #[schema(value_type = String)]
    pub suggested_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DebtorList {
    pub items: Vec<Debtor>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DebtorListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
}

impl DebtorListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Blank form for a debtor not tied to an order.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct DebtorDraft {
    pub customer_name: String,
    pub customer_phone: String,
    pub amount: String,
    pub reference: String,
    pub notes: String,
    pub statuses: Vec<DebtorStatus>,
}
