//! Migration: orders with their lines, customers and history, plus the ledger.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_tenancy_tables::{Brands, Sessions, Stores, Users};
use super::m20240101_000002_create_catalog_tables::Promotions;
use super::{index, int, money, pk, string, string_null, timestamp, uuid, uuid_null};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn order_fk(table: impl IntoIden + 'static, col: impl IntoIden + 'static) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .from(table, col)
        .to(Orders::Table, Orders::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(pk(Orders::Id))
                    .col(uuid(Orders::BrandId))
                    .col(uuid(Orders::StoreId))
                    .col(uuid(Orders::SessionId))
                    .col(string(Orders::InvoiceId))
                    .col(string(Orders::OrderType))
                    .col(string(Orders::PaymentType))
                    .col(string(Orders::Status))
                    .col(money(Orders::TotalAmount))
                    .col(money(Orders::LineDiscount))
                    .col(money(Orders::PromotionDiscount))
                    .col(money(Orders::Discount))
                    .col(money(Orders::VatRate))
                    .col(money(Orders::VatAmount))
                    .col(money(Orders::FinalAmount))
                    .col(int(Orders::NumberOfGuests, 1))
                    .col(string_null(Orders::Note))
                    .col(uuid(Orders::CreatedBy))
                    .col(timestamp(Orders::CheckinDate))
                    .col(timestamp(Orders::CreatedAt))
                    .col(timestamp(Orders::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Orders::Table, Orders::StoreId)
                            .to(Stores::Table, Stores::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Orders::Table, Orders::SessionId)
                            .to(Sessions::Table, Sessions::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_orders_store_checkin",
                Orders::Table,
                vec![Orders::StoreId.into_iden(), Orders::CheckinDate.into_iden()],
                false,
            ))
            .await?;
        // Store codes repeat across brands, so invoices are unique per store
        manager
            .create_index(index(
                "idx_orders_store_invoice",
                Orders::Table,
                vec![Orders::StoreId.into_iden(), Orders::InvoiceId.into_iden()],
                true,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderDetails::Table)
                    .if_not_exists()
                    .col(pk(OrderDetails::Id))
                    .col(uuid(OrderDetails::OrderId))
                    .col(uuid(OrderDetails::ProductId))
                    .col(uuid_null(OrderDetails::ParentDetailId))
                    .col(string(OrderDetails::ProductName))
                    .col(int(OrderDetails::Quantity, 1))
                    .col(money(OrderDetails::SellingPrice))
                    .col(money(OrderDetails::DiscountPrice))
                    .col(money(OrderDetails::TotalAmount))
                    .col(money(OrderDetails::Discount))
                    .col(money(OrderDetails::FinalAmount))
                    .col(string_null(OrderDetails::Note))
                    .foreign_key(&mut order_fk(OrderDetails::Table, OrderDetails::OrderId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PromotionOrders::Table)
                    .if_not_exists()
                    .col(pk(PromotionOrders::Id))
                    .col(uuid(PromotionOrders::OrderId))
                    .col(uuid(PromotionOrders::PromotionId))
                    .col(int(PromotionOrders::Quantity, 1))
                    .col(money(PromotionOrders::DiscountAmount))
                    .foreign_key(&mut order_fk(PromotionOrders::Table, PromotionOrders::OrderId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(PromotionOrders::Table, PromotionOrders::PromotionId)
                            .to(Promotions::Table, Promotions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderUsers::Table)
                    .if_not_exists()
                    .col(pk(OrderUsers::Id))
                    .col(uuid(OrderUsers::OrderId).unique_key().to_owned())
                    .col(uuid_null(OrderUsers::UserId))
                    .col(string_null(OrderUsers::Name))
                    .col(string_null(OrderUsers::Phone))
                    .col(string_null(OrderUsers::Address))
                    .col(
                        ColumnDef::new(OrderUsers::IsSync)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(OrderUsers::SyncedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp(OrderUsers::CreatedAt))
                    .foreign_key(&mut order_fk(OrderUsers::Table, OrderUsers::OrderId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(OrderUsers::Table, OrderUsers::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_order_users_sync",
                OrderUsers::Table,
                vec![OrderUsers::IsSync.into_iden(), OrderUsers::UserId.into_iden()],
                false,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderHistories::Table)
                    .if_not_exists()
                    .col(pk(OrderHistories::Id))
                    .col(uuid(OrderHistories::OrderId))
                    .col(string_null(OrderHistories::FromStatus))
                    .col(string(OrderHistories::ToStatus))
                    .col(uuid_null(OrderHistories::ChangedBy))
                    .col(string_null(OrderHistories::Note))
                    .col(timestamp(OrderHistories::CreatedAt))
                    .foreign_key(&mut order_fk(OrderHistories::Table, OrderHistories::OrderId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk(Transactions::Id))
                    .col(uuid(Transactions::BrandId))
                    .col(uuid_null(Transactions::UserId))
                    .col(uuid_null(Transactions::OrderId))
                    .col(money(Transactions::Amount))
                    .col(string(Transactions::Currency))
                    .col(string(Transactions::TransactionType))
                    .col(ColumnDef::new(Transactions::IsIncrease).boolean().not_null())
                    .col(string_null(Transactions::Description))
                    .col(timestamp(Transactions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Transactions::Table, Transactions::BrandId)
                            .to(Brands::Table, Brands::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_transactions_user",
                Transactions::Table,
                vec![Transactions::UserId.into_iden(), Transactions::CreatedAt.into_iden()],
                false,
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Transactions::Table.into_iden(),
            OrderHistories::Table.into_iden(),
            OrderUsers::Table.into_iden(),
            PromotionOrders::Table.into_iden(),
            OrderDetails::Table.into_iden(),
            Orders::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
    BrandId,
    StoreId,
    SessionId,
    InvoiceId,
    OrderType,
    PaymentType,
    Status,
    TotalAmount,
    LineDiscount,
    PromotionDiscount,
    Discount,
    VatRate,
    VatAmount,
    FinalAmount,
    NumberOfGuests,
    Note,
    CreatedBy,
    CheckinDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum OrderDetails {
    Table,
    Id,
    OrderId,
    ProductId,
    ParentDetailId,
    ProductName,
    Quantity,
    SellingPrice,
    DiscountPrice,
    TotalAmount,
    Discount,
    FinalAmount,
    Note,
}

#[derive(Iden)]
enum PromotionOrders {
    Table,
    Id,
    OrderId,
    PromotionId,
    Quantity,
    DiscountAmount,
}

#[derive(Iden)]
enum OrderUsers {
    Table,
    Id,
    OrderId,
    UserId,
    Name,
    Phone,
    Address,
    IsSync,
    SyncedAt,
    CreatedAt,
}

#[derive(Iden)]
enum OrderHistories {
    Table,
    Id,
    OrderId,
    FromStatus,
    ToStatus,
    ChangedBy,
    Note,
    CreatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    BrandId,
    UserId,
    OrderId,
    Amount,
    Currency,
    TransactionType,
    IsIncrease,
    Description,
    CreatedAt,
}
