//! Billing cycles: how many days separate two charges of a subscription.

use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use ulid::Ulid;

use crate::{EngineError, ids::stored_id};

/// Longest cycle a user may define, roughly a century.
pub const MAX_CYCLE_DAYS: i32 = 36_500;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillingCycle {
    pub id: Ulid,
    pub name: String,
    pub days: i32,
    pub system_defined: bool,
    pub user_id: Option<Ulid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BillingCycle {
    /// Returns `from` shifted by the cycle length.
    ///
    /// Nothing calls this on its own: billing dates only move when a client
    /// asks for the computation and sends the result back. `None` when the
    /// result falls outside the representable range.
    #[must_use]
    pub fn next_billing_date(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        from.checked_add_signed(Duration::days(i64::from(self.days)))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "billing_cycles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub days: i32,
    pub system_defined: bool,
    pub user_id: Option<String>,
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for BillingCycle {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: stored_id(&model.id, "billing cycle")?,
            name: model.name,
            days: model.days,
            system_defined: model.system_defined,
            user_id: model
                .user_id
                .as_deref()
                .map(|id| stored_id(id, "user"))
                .transpose()?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
