use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use crate::{PaymentMethodType, ids::new_id, payment_methods};

use super::{SoftDelete, soft_delete};

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: &str,
) -> Result<Option<payment_methods::Model>, DbErr> {
    payment_methods::Entity::live_by_id(id).one(db).await
}

pub(crate) async fn list_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
) -> Result<Vec<payment_methods::Model>, DbErr> {
    payment_methods::Entity::live()
        .filter(payment_methods::Column::UserId.eq(user_id))
        .order_by_asc(payment_methods::Column::Name)
        .all(db)
        .await
}

/// Whether the user already has a payment method with this `(name, type)`.
pub(crate) async fn name_type_taken<C: ConnectionTrait>(
    db: &C,
    name: &str,
    kind: PaymentMethodType,
    user_id: &str,
    exclude_id: Option<&str>,
) -> Result<bool, DbErr> {
    let mut query = payment_methods::Entity::live()
        .filter(payment_methods::Column::Name.eq(name))
        .filter(payment_methods::Column::Kind.eq(kind.as_str()))
        .filter(payment_methods::Column::UserId.eq(user_id));
    if let Some(id) = exclude_id {
        query = query.filter(payment_methods::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    name: &str,
    kind: PaymentMethodType,
    last_four: Option<&str>,
) -> Result<payment_methods::Model, DbErr> {
    let now = Utc::now();
    payment_methods::ActiveModel {
        id: ActiveValue::Set(new_id().to_string()),
        user_id: ActiveValue::Set(user_id.to_string()),
        name: ActiveValue::Set(name.to_string()),
        kind: ActiveValue::Set(kind.as_str().to_string()),
        last_four: ActiveValue::Set(last_four.map(ToString::to_string)),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        deleted_at: ActiveValue::Set(None),
    }
    .insert(db)
    .await
}

pub(crate) async fn update<C: ConnectionTrait>(
    db: &C,
    model: payment_methods::Model,
    name: &str,
    kind: PaymentMethodType,
    last_four: &str,
) -> Result<payment_methods::Model, DbErr> {
    let mut active: payment_methods::ActiveModel = model.into();
    active.name = ActiveValue::Set(name.to_string());
    active.kind = ActiveValue::Set(kind.as_str().to_string());
    active.last_four = ActiveValue::Set(Some(last_four.to_string()));
    active.updated_at = ActiveValue::Set(Utc::now());
    active.update(db).await
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: &str) -> Result<bool, DbErr> {
    soft_delete::<payment_methods::Entity, C>(db, id).await
}
