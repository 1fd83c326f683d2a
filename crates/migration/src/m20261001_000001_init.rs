//! Schema of the subscription tracker.
//!
//! - `users`: accounts
//! - `categories`, `billing_cycles`: system-defined or owned by one user
//! - `currencies`: global reference table keyed by a sequence
//! - `payment_methods`: owned by one user
//! - `subscriptions`: the tracked recurring payments
//!
//! Every table but `currencies` is soft-deleted through `deleted_at`.
//! Uniqueness only applies to live rows, so it is enforced with partial
//! indexes written in SQL both SQLite and Postgres accept.

use sea_orm::ConnectionTrait;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Name,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    SystemDefined,
    UserId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Currencies {
    Table,
    Id,
    Code,
    Name,
    Symbol,
    CreatedAt,
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
    DeletedAt,
}

#[derive(Iden)]
enum PaymentMethods {
    Table,
    Id,
    UserId,
    Name,
    #[iden = "type"]
    Kind,
    LastFour,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Subscriptions {
    Table,
    Id,
    UserId,
    CategoryId,
    CurrencyId,
    BillingCycleId,
    PaymentMethodId,
    Name,
    Description,
    AmountMinor,
    NextBillingDate,
    ReminderDays,
    Active,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

const ID_LEN: u32 = 26;

/// Uniqueness rules over live rows.
const PARTIAL_UNIQUE_INDEXES: &[&str] = &[
    "CREATE UNIQUE INDEX IF NOT EXISTS \"uq-users-email\" \
     ON users (email) WHERE deleted_at IS NULL",
    "CREATE UNIQUE INDEX IF NOT EXISTS \"uq-categories-system-name\" \
     ON categories (name) WHERE system_defined AND deleted_at IS NULL",
    "CREATE UNIQUE INDEX IF NOT EXISTS \"uq-categories-user_id-name\" \
     ON categories (user_id, name) WHERE user_id IS NOT NULL AND deleted_at IS NULL",
    "CREATE UNIQUE INDEX IF NOT EXISTS \"uq-billing_cycles-system-name\" \
     ON billing_cycles (name) WHERE system_defined AND deleted_at IS NULL",
    "CREATE UNIQUE INDEX IF NOT EXISTS \"uq-billing_cycles-user_id-name\" \
     ON billing_cycles (user_id, name) WHERE user_id IS NOT NULL AND deleted_at IS NULL",
    "CREATE UNIQUE INDEX IF NOT EXISTS \"uq-payment_methods-user_id-name-type\" \
     ON payment_methods (user_id, name, \"type\") WHERE deleted_at IS NULL",
];

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .char_len(ID_LEN)
        .not_null()
        .primary_key()
        .to_owned()
}

fn timestamp_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

fn deleted_at_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).timestamp_with_time_zone().to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_col(Users::Id))
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(timestamp_col(Users::CreatedAt))
                    .col(timestamp_col(Users::UpdatedAt))
                    .col(deleted_at_col(Users::DeletedAt))
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(id_col(Categories::Id))
                    .col(ColumnDef::new(Categories::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Categories::SystemDefined)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Categories::UserId).char_len(ID_LEN))
                    .col(timestamp_col(Categories::CreatedAt))
                    .col(timestamp_col(Categories::UpdatedAt))
                    .col(deleted_at_col(Categories::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-user_id")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-user_id")
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Currencies
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Currencies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Currencies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Currencies::Code)
                            .string_len(3)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Currencies::Name).string().not_null())
                    .col(ColumnDef::new(Currencies::Symbol).string_len(8).not_null())
                    .col(timestamp_col(Currencies::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Billing cycles
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BillingCycles::Table)
                    .if_not_exists()
                    .col(id_col(BillingCycles::Id))
                    .col(ColumnDef::new(BillingCycles::Name).string_len(100).not_null())
                    .col(ColumnDef::new(BillingCycles::Days).integer().not_null())
                    .col(
                        ColumnDef::new(BillingCycles::SystemDefined)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(BillingCycles::UserId).char_len(ID_LEN))
                    .col(timestamp_col(BillingCycles::CreatedAt))
                    .col(timestamp_col(BillingCycles::UpdatedAt))
                    .col(deleted_at_col(BillingCycles::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-billing_cycles-user_id")
                            .from(BillingCycles::Table, BillingCycles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-billing_cycles-user_id")
                    .table(BillingCycles::Table)
                    .col(BillingCycles::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Payment methods
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PaymentMethods::Table)
                    .if_not_exists()
                    .col(id_col(PaymentMethods::Id))
                    .col(
                        ColumnDef::new(PaymentMethods::UserId)
                            .char_len(ID_LEN)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentMethods::Name).string_len(100).not_null())
                    .col(ColumnDef::new(PaymentMethods::Kind).string_len(32).not_null())
                    .col(ColumnDef::new(PaymentMethods::LastFour).char_len(4))
                    .col(timestamp_col(PaymentMethods::CreatedAt))
                    .col(timestamp_col(PaymentMethods::UpdatedAt))
                    .col(deleted_at_col(PaymentMethods::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payment_methods-user_id")
                            .from(PaymentMethods::Table, PaymentMethods::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Subscriptions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(id_col(Subscriptions::Id))
                    .col(
                        ColumnDef::new(Subscriptions::UserId)
                            .char_len(ID_LEN)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::CategoryId)
                            .char_len(ID_LEN)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subscriptions::CurrencyId).integer().not_null())
                    .col(
                        ColumnDef::new(Subscriptions::BillingCycleId)
                            .char_len(ID_LEN)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::PaymentMethodId)
                            .char_len(ID_LEN)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subscriptions::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Subscriptions::Description).text())
                    .col(
                        ColumnDef::new(Subscriptions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(timestamp_col(Subscriptions::NextBillingDate))
                    .col(
                        ColumnDef::new(Subscriptions::ReminderDays)
                            .integer()
                            .not_null()
                            .default(7),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp_col(Subscriptions::CreatedAt))
                    .col(timestamp_col(Subscriptions::UpdatedAt))
                    .col(deleted_at_col(Subscriptions::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subscriptions-user_id")
                            .from(Subscriptions::Table, Subscriptions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subscriptions-category_id")
                            .from(Subscriptions::Table, Subscriptions::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subscriptions-currency_id")
                            .from(Subscriptions::Table, Subscriptions::CurrencyId)
                            .to(Currencies::Table, Currencies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subscriptions-billing_cycle_id")
                            .from(Subscriptions::Table, Subscriptions::BillingCycleId)
                            .to(BillingCycles::Table, BillingCycles::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subscriptions-payment_method_id")
                            .from(Subscriptions::Table, Subscriptions::PaymentMethodId)
                            .to(PaymentMethods::Table, PaymentMethods::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-subscriptions-user_id-next_billing_date")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::UserId)
                    .col(Subscriptions::NextBillingDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Uniqueness over live rows
        // ───────────────────────────────────────────────────────────────────
        let db = manager.get_connection();
        for sql in PARTIAL_UNIQUE_INDEXES {
            db.execute_unprepared(sql).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentMethods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BillingCycles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Currencies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
