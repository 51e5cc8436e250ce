use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_users_table::Migration),
            Box::new(m20260101_000002_create_orders_table::Migration),
            Box::new(m20260101_000003_create_order_history_table::Migration),
            Box::new(m20260101_000004_create_debtors_table::Migration),
        ]
    }
}

mod m20260101_000001_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Users::Role)
                                .string()
                                .not_null()
                                .default("user"),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Username,
        PasswordHash,
        Role,
        CreatedAt,
    }
}

mod m20260101_000002_create_orders_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000002_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Orders::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::Status)
                                .string()
                                .not_null()
                                .default("open"),
                        )
                        .col(ColumnDef::new(Orders::CustomerName).string().not_null())
                        .col(ColumnDef::new(Orders::CustomerPhone).string().not_null())
                        .col(ColumnDef::new(Orders::CustomerNationalId).string().not_null())
                        .col(ColumnDef::new(Orders::CustomerAddress).string().not_null())
                        .col(ColumnDef::new(Orders::CustomerEmail).string().not_null())
                        .col(ColumnDef::new(Orders::DeviceType).string().not_null())
                        .col(ColumnDef::new(Orders::DeviceBrand).string().not_null())
                        .col(ColumnDef::new(Orders::DeviceModel).string().not_null())
                        .col(ColumnDef::new(Orders::DeviceImei).string().not_null())
                        .col(ColumnDef::new(Orders::DeviceSerial).string().not_null())
                        .col(ColumnDef::new(Orders::DeviceDescription).text().not_null())
                        .col(
                            ColumnDef::new(Orders::ChecklistJson)
                                .text()
                                .not_null()
                                .default("{}"),
                        )
                        .col(ColumnDef::new(Orders::ReportedIssue).text().not_null())
                        .col(ColumnDef::new(Orders::Diagnosis).text().not_null())
                        .col(ColumnDef::new(Orders::ServicePerformed).text().not_null())
                        .col(ColumnDef::new(Orders::Notes).text().not_null())
                        .col(
                            ColumnDef::new(Orders::BudgetedCents)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Orders::PaidCents)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Orders::PaymentDate).date().null())
                        .col(ColumnDef::new(Orders::LookupCode).string_len(6).not_null())
                        .to_owned(),
                )
                .await?;

            // Storage-level guarantee that two orders never share a lookup code.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_lookup_code")
                        .table(Orders::Table)
                        .col(Orders::LookupCode)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_status_updated_at")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .col(Orders::UpdatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Orders {
        Table,
        Id,
        CreatedAt,
        UpdatedAt,
        Status,
        CustomerName,
        CustomerPhone,
        CustomerNationalId,
        CustomerAddress,
        CustomerEmail,
        DeviceType,
        DeviceBrand,
        DeviceModel,
        DeviceImei,
        DeviceSerial,
        DeviceDescription,
        ChecklistJson,
        ReportedIssue,
        Diagnosis,
        ServicePerformed,
        Notes,
        BudgetedCents,
        PaidCents,
        PaymentDate,
        LookupCode,
    }
}

mod m20260101_000003_create_order_history_table {

    use sea_orm_migration::prelude::*;

    use super::m20260101_000002_create_orders_table::Orders;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000003_create_order_history_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrderHistory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderHistory::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OrderHistory::OrderId).integer().not_null())
                        .col(
                            ColumnDef::new(OrderHistory::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderHistory::Action).string().not_null())
                        .col(ColumnDef::new(OrderHistory::Note).text().not_null())
                        .col(ColumnDef::new(OrderHistory::Author).string().null())
                        .col(
                            ColumnDef::new(OrderHistory::CustomerVisible)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(OrderHistory::BudgetedCents).big_integer().null())
                        .col(ColumnDef::new(OrderHistory::PaidCents).big_integer().null())
                        .col(ColumnDef::new(OrderHistory::PaymentDate).date().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_history_order_id")
                                .from(OrderHistory::Table, OrderHistory::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_history_order_id")
                        .table(OrderHistory::Table)
                        .col(OrderHistory::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderHistory::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum OrderHistory {
        Table,
        Id,
        OrderId,
        CreatedAt,
        Action,
        Note,
        Author,
        CustomerVisible,
        BudgetedCents,
        PaidCents,
        PaymentDate,
    }
}

mod m20260101_000004_create_debtors_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000004_create_debtors_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // `reference` is free text on purpose: no foreign key to orders.
            manager
                .create_table(
                    Table::create()
                        .table(Debtors::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Debtors::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Debtors::CustomerName).string().not_null())
                        .col(ColumnDef::new(Debtors::CustomerPhone).string().not_null())
                        .col(
                            ColumnDef::new(Debtors::AmountCents)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Debtors::Reference).string().not_null())
                        .col(ColumnDef::new(Debtors::Notes).text().not_null())
                        .col(
                            ColumnDef::new(Debtors::Status)
                                .string()
                                .not_null()
                                .default("open"),
                        )
                        .col(
                            ColumnDef::new(Debtors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Debtors::PaidAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_debtors_status")
                        .table(Debtors::Table)
                        .col(Debtors::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Debtors::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Debtors {
        Table,
        Id,
        CustomerName,
        CustomerPhone,
        AmountCents,
        Reference,
        Notes,
        Status,
        CreatedAt,
        PaidAt,
    }
}
