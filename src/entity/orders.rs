use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub status: String,
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
    #[sea_orm(column_type = "Text")]
    pub device_description: String,
    #[sea_orm(column_type = "Text")]
    pub checklist_json: String,
    #[sea_orm(column_type = "Text")]
    pub reported_issue: String,
    #[sea_orm(column_type = "Text")]
    pub diagnosis: String,
    #[sea_orm(column_type = "Text")]
    pub service_performed: String,
    #[sea_orm(column_type = "Text")]
    pub notes: String,
    pub budgeted_cents: i64,
    pub paid_cents: i64,
    pub payment_date: Option<Date>,
    #[sea_orm(unique)]
    pub lookup_code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_history::Entity")]
    OrderHistory,
}

impl Related<super::order_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
