use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, PaginatorTrait, QueryFilter};

use crate::{ids::new_id, users};

use super::SoftDelete;

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::live_by_id(id).one(db).await
}

/// Expects an already normalized email.
pub(crate) async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::live()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
}

pub(crate) async fn email_exists<C: ConnectionTrait>(db: &C, email: &str) -> Result<bool, DbErr> {
    let count = users::Entity::live()
        .filter(users::Column::Email.eq(email))
        .count(db)
        .await?;
    Ok(count > 0)
}

pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<users::Model, DbErr> {
    let now = Utc::now();
    users::ActiveModel {
        id: ActiveValue::Set(new_id().to_string()),
        email: ActiveValue::Set(email.to_string()),
        password_hash: ActiveValue::Set(password_hash.to_string()),
        name: ActiveValue::Set(name.to_string()),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        deleted_at: ActiveValue::Set(None),
    }
    .insert(db)
    .await
}
