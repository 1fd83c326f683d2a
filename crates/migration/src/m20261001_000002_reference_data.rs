//! Reference rows every user sees: system categories, system billing cycles
//! and the supported currencies.

use chrono::Utc;
use sea_orm::{ConnectionTrait, Value};
use sea_orm_migration::prelude::*;
use ulid::Ulid;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    SystemDefined,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum BillingCycles {
    Table,
    Id,
    Name,
    Days,
    SystemDefined,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Currencies {
    Table,
    Code,
    Name,
    Symbol,
    CreatedAt,
}

const CATEGORIES: &[&str] = &[
    "Streaming",
    "Gaming",
    "Music",
    "Cloud Storage",
    "News",
    "Fitness",
    "Productivity Tools",
];

const BILLING_CYCLES: &[(&str, i32)] = &[
    ("Weekly", 7),
    ("Monthly", 30),
    ("Quarterly", 90),
    ("Semi-Annual", 180),
    ("Yearly", 365),
];

/// `(code, name, symbol)`
const CURRENCIES: &[(&str, &str, &str)] = &[
    ("USD", "US Dollar", "$"),
    ("EUR", "Euro", "€"),
    ("GBP", "British Pound", "£"),
    ("JPY", "Japanese Yen", "¥"),
];

fn builder_error(err: sea_orm::sea_query::error::Error) -> DbErr {
    DbErr::Migration(err.to_string())
}

async fn exec_insert(manager: &SchemaManager<'_>, insert: &InsertStatement) -> Result<(), DbErr> {
    let db = manager.get_connection();
    db.execute(db.get_database_backend().build(insert)).await?;
    Ok(())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = Utc::now();

        let mut categories = Query::insert()
            .into_table(Categories::Table)
            .columns([
                Categories::Id,
                Categories::Name,
                Categories::SystemDefined,
                Categories::UserId,
                Categories::CreatedAt,
                Categories::UpdatedAt,
            ])
            .to_owned();
        for name in CATEGORIES {
            categories
                .values([
                    Ulid::new().to_string().into(),
                    (*name).into(),
                    true.into(),
                    Value::String(None).into(),
                    now.into(),
                    now.into(),
                ])
                .map_err(builder_error)?;
        }
        exec_insert(manager, &categories).await?;

        let mut cycles = Query::insert()
            .into_table(BillingCycles::Table)
            .columns([
                BillingCycles::Id,
                BillingCycles::Name,
                BillingCycles::Days,
                BillingCycles::SystemDefined,
                BillingCycles::UserId,
                BillingCycles::CreatedAt,
                BillingCycles::UpdatedAt,
            ])
            .to_owned();
        for (name, days) in BILLING_CYCLES {
            cycles
                .values([
                    Ulid::new().to_string().into(),
                    (*name).into(),
                    (*days).into(),
                    true.into(),
                    Value::String(None).into(),
                    now.into(),
                    now.into(),
                ])
                .map_err(builder_error)?;
        }
        exec_insert(manager, &cycles).await?;

        let mut currencies = Query::insert()
            .into_table(Currencies::Table)
            .columns([
                Currencies::Code,
                Currencies::Name,
                Currencies::Symbol,
                Currencies::CreatedAt,
            ])
            .to_owned();
        for (code, name, symbol) in CURRENCIES {
            currencies
                .values([
                    (*code).into(),
                    (*name).into(),
                    (*symbol).into(),
                    now.into(),
                ])
                .map_err(builder_error)?;
        }
        exec_insert(manager, &currencies).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let codes = CURRENCIES.iter().map(|(code, _, _)| *code);
        let currencies = Query::delete()
            .from_table(Currencies::Table)
            .and_where(Expr::col(Currencies::Code).is_in(codes))
            .to_owned();
        let cycles = Query::delete()
            .from_table(BillingCycles::Table)
            .and_where(Expr::col(BillingCycles::SystemDefined).eq(true))
            .to_owned();
        let categories = Query::delete()
            .from_table(Categories::Table)
            .and_where(Expr::col(Categories::SystemDefined).eq(true))
            .to_owned();

        let db = manager.get_connection();
        let backend = db.get_database_backend();
        for statement in [currencies, cycles, categories] {
            db.execute(backend.build(&statement)).await?;
        }
        Ok(())
    }
}
