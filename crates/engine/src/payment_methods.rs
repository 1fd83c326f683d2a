//! Payment methods. Always owned by a user; `(name, type)` is unique per user.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::{EngineError, ids::stored_id};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    CreditCard,
    DebitCard,
    BankAccount,
    DigitalWallet,
    Other,
}

impl PaymentMethodType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::BankAccount => "bank_account",
            Self::DigitalWallet => "digital_wallet",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for PaymentMethodType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "bank_account" => Ok(Self::BankAccount),
            "digital_wallet" => Ok(Self::DigitalWallet),
            "other" => Ok(Self::Other),
            other => Err(EngineError::validation(
                "type",
                format!("invalid payment method type: {other}"),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentMethod {
    pub id: Ulid,
    pub user_id: Ulid,
    pub name: String,
    pub kind: PaymentMethodType,
    pub last_four: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "payment_methods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub last_four: Option<String>,
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

impl TryFrom<Model> for PaymentMethod {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: stored_id(&model.id, "payment method")?,
            user_id: stored_id(&model.user_id, "user")?,
            name: model.name,
            kind: PaymentMethodType::try_from(model.kind.as_str())?,
            last_four: model.last_four,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
