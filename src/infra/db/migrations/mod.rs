//! Database migrations.
//!
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_tenancy_tables;
mod m20240101_000002_create_catalog_tables;
mod m20240101_000003_create_order_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_tenancy_tables::Migration),
            Box::new(m20240101_000002_create_catalog_tables::Migration),
            Box::new(m20240101_000003_create_order_tables::Migration),
        ]
    }
}

/// Non-null uuid primary key
fn pk(col: impl IntoIden + 'static) -> ColumnDef {
    ColumnDef::new(col).uuid().not_null().primary_key().to_owned()
}

fn uuid(col: impl IntoIden + 'static) -> ColumnDef {
    ColumnDef::new(col).uuid().not_null().to_owned()
}

fn uuid_null(col: impl IntoIden + 'static) -> ColumnDef {
    ColumnDef::new(col).uuid().null().to_owned()
}

fn string(col: impl IntoIden + 'static) -> ColumnDef {
    ColumnDef::new(col).string().not_null().to_owned()
}

fn string_null(col: impl IntoIden + 'static) -> ColumnDef {
    ColumnDef::new(col).string().null().to_owned()
}

fn money(col: impl IntoIden + 'static) -> ColumnDef {
    ColumnDef::new(col).double().not_null().default(0.0).to_owned()
}

fn int(col: impl IntoIden + 'static, default: i32) -> ColumnDef {
    ColumnDef::new(col).integer().not_null().default(default).to_owned()
}

fn timestamp(col: impl IntoIden + 'static) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

fn status(col: impl IntoIden + 'static) -> ColumnDef {
    ColumnDef::new(col)
        .string_len(20)
        .not_null()
        .default("ACTIVE")
        .to_owned()
}

fn index(name: &str, table: impl IntoIden + 'static, cols: Vec<DynIden>, unique: bool) -> IndexCreateStatement {
    let mut stmt = Index::create();
    stmt.name(name).table(table);
    for col in cols {
        stmt.col(col);
    }
    if unique {
        stmt.unique();
    }
    stmt.to_owned()
}
