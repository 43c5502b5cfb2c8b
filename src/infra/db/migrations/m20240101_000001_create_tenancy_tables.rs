//! Migration: brands, stores, staff accounts, sessions and members.

use sea_orm_migration::prelude::*;

use super::{index, int, money, pk, status, string, string_null, timestamp, uuid, uuid_null};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Brands::Table)
                    .if_not_exists()
                    .col(pk(Brands::Id))
                    .col(string(Brands::Name))
                    .col(string(Brands::BrandCode).unique_key().to_owned())
                    .col(string_null(Brands::Email))
                    .col(string_null(Brands::Phone))
                    .col(string_null(Brands::Address))
                    .col(string_null(Brands::PicUrl))
                    .col(status(Brands::Status))
                    .col(money(Brands::BrandBalance))
                    .col(timestamp(Brands::CreatedAt))
                    .col(timestamp(Brands::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Stores::Table)
                    .if_not_exists()
                    .col(pk(Stores::Id))
                    .col(uuid(Stores::BrandId))
                    .col(string(Stores::Name))
                    .col(string_null(Stores::ShortName))
                    .col(string(Stores::Code))
                    .col(string_null(Stores::Email))
                    .col(string_null(Stores::Phone))
                    .col(string_null(Stores::Address))
                    .col(string_null(Stores::WifiName))
                    .col(string_null(Stores::WifiPassword))
                    .col(status(Stores::Status))
                    .col(timestamp(Stores::CreatedAt))
                    .col(timestamp(Stores::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Stores::Table, Stores::BrandId)
                            .to(Brands::Table, Brands::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_stores_brand_code",
                Stores::Table,
                vec![Stores::BrandId.into_iden(), Stores::Code.into_iden()],
                true,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk(Accounts::Id))
                    .col(string(Accounts::Username).unique_key().to_owned())
                    .col(string(Accounts::PasswordHash))
                    .col(string(Accounts::Name))
                    .col(string(Accounts::Role))
                    .col(status(Accounts::Status))
                    .col(uuid_null(Accounts::BrandId))
                    .col(uuid_null(Accounts::StoreId))
                    .col(timestamp(Accounts::CreatedAt))
                    .col(timestamp(Accounts::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_accounts_brand_id",
                Accounts::Table,
                vec![Accounts::BrandId.into_iden()],
                false,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(pk(Sessions::Id))
                    .col(uuid(Sessions::StoreId))
                    .col(string_null(Sessions::Name))
                    .col(timestamp(Sessions::StartDateTime))
                    .col(timestamp(Sessions::EndDateTime))
                    .col(int(Sessions::NumberOfOrders, 0))
                    .col(int(Sessions::LastInvoiceOrdinal, 0))
                    .col(money(Sessions::TotalAmount))
                    .col(money(Sessions::TotalDiscountAmount))
                    .col(money(Sessions::TotalFinalAmount))
                    .col(uuid_null(Sessions::CreatedBy))
                    .col(timestamp(Sessions::CreatedAt))
                    .col(timestamp(Sessions::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Sessions::Table, Sessions::StoreId)
                            .to(Stores::Table, Stores::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_sessions_store_window",
                Sessions::Table,
                vec![
                    Sessions::StoreId.into_iden(),
                    Sessions::StartDateTime.into_iden(),
                ],
                false,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(uuid(Users::BrandId))
                    .col(string(Users::Phone))
                    .col(string(Users::PasswordHash))
                    .col(string(Users::FullName))
                    .col(string_null(Users::Email))
                    .col(string_null(Users::Gender))
                    .col(ColumnDef::new(Users::DateOfBirth).date().null())
                    .col(string_null(Users::Address))
                    .col(
                        ColumnDef::new(Users::Point)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(money(Users::Balance))
                    .col(status(Users::Status))
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Users::Table, Users::BrandId)
                            .to(Brands::Table, Brands::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_users_brand_phone",
                Users::Table,
                vec![Users::BrandId.into_iden(), Users::Phone.into_iden()],
                true,
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Brands::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Brands {
    Table,
    Id,
    Name,
    BrandCode,
    Email,
    Phone,
    Address,
    PicUrl,
    Status,
    BrandBalance,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(super) enum Stores {
    Table,
    Id,
    BrandId,
    Name,
    ShortName,
    Code,
    Email,
    Phone,
    Address,
    WifiName,
    WifiPassword,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Username,
    PasswordHash,
    Name,
    Role,
    Status,
    BrandId,
    StoreId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(super) enum Sessions {
    Table,
    Id,
    StoreId,
    Name,
    StartDateTime,
    EndDateTime,
    NumberOfOrders,
    LastInvoiceOrdinal,
    TotalAmount,
    TotalDiscountAmount,
    TotalFinalAmount,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(super) enum Users {
    Table,
    Id,
    BrandId,
    Phone,
    PasswordHash,
    FullName,
    Email,
    Gender,
    DateOfBirth,
    Address,
    Point,
    Balance,
    Status,
    CreatedAt,
    UpdatedAt,
}
