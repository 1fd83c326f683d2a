//! Subscription categories.
//!
//! System-defined rows have no owner and are shared by every user; the rest
//! belong to exactly one user.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use ulid::Ulid;

use crate::{EngineError, ids::stored_id};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: Ulid,
    pub name: String,
    pub system_defined: bool,
    pub user_id: Option<Ulid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
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

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: stored_id(&model.id, "category")?,
            name: model.name,
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
