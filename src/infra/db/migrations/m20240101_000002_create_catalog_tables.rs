//! Migration: categories, products, collections, variants, menus, promotions
//! and blog posts.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_tenancy_tables::{Brands, Stores};
use super::{index, int, money, pk, status, string, string_null, timestamp, uuid, uuid_null};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn brand_fk(table: impl IntoIden + 'static, col: impl IntoIden + 'static) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .from(table, col)
        .to(Brands::Table, Brands::Id)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk(Categories::Id))
                    .col(uuid(Categories::BrandId))
                    .col(string(Categories::Code))
                    .col(string(Categories::Name))
                    .col(string(Categories::CategoryType))
                    .col(int(Categories::DisplayOrder, 0))
                    .col(string_null(Categories::Description))
                    .col(string_null(Categories::PicUrl))
                    .col(status(Categories::Status))
                    .col(timestamp(Categories::CreatedAt))
                    .col(timestamp(Categories::UpdatedAt))
                    .foreign_key(&mut brand_fk(Categories::Table, Categories::BrandId))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_categories_brand_code",
                Categories::Table,
                vec![Categories::BrandId.into_iden(), Categories::Code.into_iden()],
                true,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk(Products::Id))
                    .col(uuid(Products::BrandId))
                    .col(uuid(Products::CategoryId))
                    .col(uuid_null(Products::ParentProductId))
                    .col(string(Products::Code))
                    .col(string(Products::Name))
                    .col(ColumnDef::new(Products::Description).text().null())
                    .col(string_null(Products::PicUrl))
                    .col(string(Products::ProductType))
                    .col(string_null(Products::Size))
                    .col(money(Products::SellingPrice))
                    .col(money(Products::HistoricalPrice))
                    .col(money(Products::DiscountPrice))
                    .col(int(Products::DisplayOrder, 0))
                    .col(status(Products::Status))
                    .col(timestamp(Products::CreatedAt))
                    .col(timestamp(Products::UpdatedAt))
                    .foreign_key(&mut brand_fk(Products::Table, Products::BrandId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Products::Table, Products::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_products_brand_code",
                Products::Table,
                vec![Products::BrandId.into_iden(), Products::Code.into_iden()],
                true,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Collections::Table)
                    .if_not_exists()
                    .col(pk(Collections::Id))
                    .col(uuid(Collections::BrandId))
                    .col(string(Collections::Code))
                    .col(string(Collections::Name))
                    .col(string_null(Collections::Description))
                    .col(string_null(Collections::PicUrl))
                    .col(status(Collections::Status))
                    .col(timestamp(Collections::CreatedAt))
                    .col(timestamp(Collections::UpdatedAt))
                    .foreign_key(&mut brand_fk(Collections::Table, Collections::BrandId))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_collections_brand_code",
                Collections::Table,
                vec![Collections::BrandId.into_iden(), Collections::Code.into_iden()],
                true,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CollectionProducts::Table)
                    .if_not_exists()
                    .col(pk(CollectionProducts::Id))
                    .col(uuid(CollectionProducts::CollectionId))
                    .col(uuid(CollectionProducts::ProductId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(CollectionProducts::Table, CollectionProducts::CollectionId)
                            .to(Collections::Table, Collections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CollectionProducts::Table, CollectionProducts::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_collection_products_pair",
                CollectionProducts::Table,
                vec![
                    CollectionProducts::CollectionId.into_iden(),
                    CollectionProducts::ProductId.into_iden(),
                ],
                true,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Variants::Table)
                    .if_not_exists()
                    .col(pk(Variants::Id))
                    .col(uuid(Variants::BrandId))
                    .col(string(Variants::Name))
                    .col(string(Variants::Value))
                    .col(int(Variants::DisplayOrder, 0))
                    .col(status(Variants::Status))
                    .col(timestamp(Variants::CreatedAt))
                    .col(timestamp(Variants::UpdatedAt))
                    .foreign_key(&mut brand_fk(Variants::Table, Variants::BrandId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VariantProducts::Table)
                    .if_not_exists()
                    .col(pk(VariantProducts::Id))
                    .col(uuid(VariantProducts::VariantId))
                    .col(uuid(VariantProducts::ProductId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(VariantProducts::Table, VariantProducts::VariantId)
                            .to(Variants::Table, Variants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(VariantProducts::Table, VariantProducts::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_variant_products_pair",
                VariantProducts::Table,
                vec![
                    VariantProducts::VariantId.into_iden(),
                    VariantProducts::ProductId.into_iden(),
                ],
                true,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Menus::Table)
                    .if_not_exists()
                    .col(pk(Menus::Id))
                    .col(uuid(Menus::BrandId))
                    .col(string(Menus::Code))
                    .col(int(Menus::Priority, 0))
                    .col(int(Menus::DateFilter, 127))
                    .col(ColumnDef::new(Menus::StartTime).time().not_null())
                    .col(ColumnDef::new(Menus::EndTime).time().not_null())
                    .col(status(Menus::Status))
                    .col(uuid_null(Menus::CreatedBy))
                    .col(timestamp(Menus::CreatedAt))
                    .col(timestamp(Menus::UpdatedAt))
                    .foreign_key(&mut brand_fk(Menus::Table, Menus::BrandId))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_menus_brand_priority",
                Menus::Table,
                vec![Menus::BrandId.into_iden(), Menus::Priority.into_iden()],
                false,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MenuProducts::Table)
                    .if_not_exists()
                    .col(pk(MenuProducts::Id))
                    .col(uuid(MenuProducts::MenuId))
                    .col(uuid(MenuProducts::ProductId))
                    .col(money(MenuProducts::SellingPrice))
                    .col(money(MenuProducts::DiscountPrice))
                    .col(money(MenuProducts::HistoricalPrice))
                    .col(status(MenuProducts::Status))
                    .col(timestamp(MenuProducts::CreatedAt))
                    .col(timestamp(MenuProducts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(MenuProducts::Table, MenuProducts::MenuId)
                            .to(Menus::Table, Menus::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MenuProducts::Table, MenuProducts::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_menu_products_pair",
                MenuProducts::Table,
                vec![
                    MenuProducts::MenuId.into_iden(),
                    MenuProducts::ProductId.into_iden(),
                ],
                true,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MenuStores::Table)
                    .if_not_exists()
                    .col(pk(MenuStores::Id))
                    .col(uuid(MenuStores::MenuId))
                    .col(uuid(MenuStores::StoreId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(MenuStores::Table, MenuStores::MenuId)
                            .to(Menus::Table, Menus::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MenuStores::Table, MenuStores::StoreId)
                            .to(Stores::Table, Stores::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_menu_stores_pair",
                MenuStores::Table,
                vec![MenuStores::MenuId.into_iden(), MenuStores::StoreId.into_iden()],
                true,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Promotions::Table)
                    .if_not_exists()
                    .col(pk(Promotions::Id))
                    .col(uuid(Promotions::BrandId))
                    .col(string(Promotions::Code))
                    .col(string(Promotions::Name))
                    .col(string_null(Promotions::Description))
                    .col(string(Promotions::PromotionType))
                    .col(money(Promotions::Value))
                    .col(money(Promotions::MaxDiscount))
                    .col(money(Promotions::MinConditionAmount))
                    .col(timestamp(Promotions::StartDate))
                    .col(timestamp(Promotions::EndDate))
                    .col(status(Promotions::Status))
                    .col(timestamp(Promotions::CreatedAt))
                    .col(timestamp(Promotions::UpdatedAt))
                    .foreign_key(&mut brand_fk(Promotions::Table, Promotions::BrandId))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(index(
                "idx_promotions_brand_code",
                Promotions::Table,
                vec![Promotions::BrandId.into_iden(), Promotions::Code.into_iden()],
                true,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BlogPosts::Table)
                    .if_not_exists()
                    .col(pk(BlogPosts::Id))
                    .col(uuid(BlogPosts::BrandId))
                    .col(string(BlogPosts::Title))
                    .col(ColumnDef::new(BlogPosts::Content).text().not_null())
                    .col(string_null(BlogPosts::Image))
                    .col(int(BlogPosts::Priority, 0))
                    .col(
                        ColumnDef::new(BlogPosts::IsDialog)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(status(BlogPosts::Status))
                    .col(timestamp(BlogPosts::CreatedAt))
                    .col(timestamp(BlogPosts::UpdatedAt))
                    .foreign_key(&mut brand_fk(BlogPosts::Table, BlogPosts::BrandId))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            BlogPosts::Table.into_iden(),
            Promotions::Table.into_iden(),
            MenuStores::Table.into_iden(),
            MenuProducts::Table.into_iden(),
            Menus::Table.into_iden(),
            VariantProducts::Table.into_iden(),
            Variants::Table.into_iden(),
            CollectionProducts::Table.into_iden(),
            Collections::Table.into_iden(),
            Products::Table.into_iden(),
            Categories::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    BrandId,
    Code,
    Name,
    CategoryType,
    DisplayOrder,
    Description,
    PicUrl,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    BrandId,
    CategoryId,
    ParentProductId,
    Code,
    Name,
    Description,
    PicUrl,
    ProductType,
    Size,
    SellingPrice,
    HistoricalPrice,
    DiscountPrice,
    DisplayOrder,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Collections {
    Table,
    Id,
    BrandId,
    Code,
    Name,
    Description,
    PicUrl,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CollectionProducts {
    Table,
    Id,
    CollectionId,
    ProductId,
}

#[derive(Iden)]
enum Variants {
    Table,
    Id,
    BrandId,
    Name,
    Value,
    DisplayOrder,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum VariantProducts {
    Table,
    Id,
    VariantId,
    ProductId,
}

#[derive(Iden)]
enum Menus {
    Table,
    Id,
    BrandId,
    Code,
    Priority,
    DateFilter,
    StartTime,
    EndTime,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum MenuProducts {
    Table,
    Id,
    MenuId,
    ProductId,
    SellingPrice,
    DiscountPrice,
    HistoricalPrice,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum MenuStores {
    Table,
    Id,
    MenuId,
    StoreId,
}

#[derive(Iden)]
pub(super) enum Promotions {
    Table,
    Id,
    BrandId,
    Code,
    Name,
    Description,
    PromotionType,
    Value,
    MaxDiscount,
    MinConditionAmount,
    StartDate,
    EndDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum BlogPosts {
    Table,
    Id,
    BrandId,
    Title,
    Content,
    Image,
    Priority,
    IsDialog,
    Status,
    CreatedAt,
    UpdatedAt,
}
