//! Subscriptions: the recurring payments users track.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use ulid::Ulid;

use crate::{Amount, EngineError, ids::stored_id};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub id: Ulid,
    pub user_id: Ulid,
    pub category_id: Ulid,
    pub currency_id: i32,
    pub billing_cycle_id: Ulid,
    pub payment_method_id: Ulid,
    pub name: String,
    pub description: Option<String>,
    pub amount: Amount,
    pub next_billing_date: DateTime<Utc>,
    pub reminder_days: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Every client-writable field of a subscription.
///
/// Updates replace all of them at once; `active` is ignored on creation.
#[derive(Clone, Debug, PartialEq)]
pub struct SubscriptionInput {
    pub name: String,
    pub description: Option<String>,
    pub amount: Amount,
    pub category_id: Ulid,
    pub currency_id: i32,
    pub billing_cycle_id: Ulid,
    pub payment_method_id: Ulid,
    pub next_billing_date: DateTime<Utc>,
    pub reminder_days: i32,
    pub active: bool,
}

/// Narrows a user's subscription list to one referenced entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubscriptionFilter {
    #[default]
    All,
    Category(Ulid),
    BillingCycle(Ulid),
    PaymentMethod(Ulid),
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub currency_id: i32,
    pub billing_cycle_id: String,
    pub payment_method_id: String,
    pub name: String,
    pub description: Option<String>,
    pub amount_minor: i64,
    pub next_billing_date: DateTimeUtc,
    pub reminder_days: i32,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::currencies::Entity",
        from = "Column::CurrencyId",
        to = "super::currencies::Column::Id"
    )]
    Currency,
    #[sea_orm(
        belongs_to = "super::billing_cycles::Entity",
        from = "Column::BillingCycleId",
        to = "super::billing_cycles::Column::Id"
    )]
    BillingCycle,
    #[sea_orm(
        belongs_to = "super::payment_methods::Entity",
        from = "Column::PaymentMethodId",
        to = "super::payment_methods::Column::Id"
    )]
    PaymentMethod,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Subscription {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: stored_id(&model.id, "subscription")?,
            user_id: stored_id(&model.user_id, "user")?,
            category_id: stored_id(&model.category_id, "category")?,
            currency_id: model.currency_id,
            billing_cycle_id: stored_id(&model.billing_cycle_id, "billing cycle")?,
            payment_method_id: stored_id(&model.payment_method_id, "payment method")?,
            name: model.name,
            description: model.description,
            amount: Amount::from_cents(model.amount_minor)
                .map_err(|_| EngineError::Internal("corrupted subscription amount".to_string()))?,
            next_billing_date: model.next_billing_date,
            reminder_days: model.reminder_days,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
