use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use crate::{billing_cycles, ids::new_id};

use super::{SoftDelete, soft_delete};

fn visible_to(user_id: &str) -> Condition {
    Condition::any()
        .add(billing_cycles::Column::UserId.eq(user_id))
        .add(billing_cycles::Column::SystemDefined.eq(true))
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: &str,
) -> Result<Option<billing_cycles::Model>, DbErr> {
    billing_cycles::Entity::live_by_id(id).one(db).await
}

pub(crate) async fn list_visible<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
) -> Result<Vec<billing_cycles::Model>, DbErr> {
    billing_cycles::Entity::live()
        .filter(visible_to(user_id))
        .order_by_desc(billing_cycles::Column::SystemDefined)
        .order_by_asc(billing_cycles::Column::Name)
        .all(db)
        .await
}

pub(crate) async fn name_taken<C: ConnectionTrait>(
    db: &C,
    name: &str,
    user_id: &str,
    exclude_id: Option<&str>,
) -> Result<bool, DbErr> {
    let mut query = billing_cycles::Entity::live()
        .filter(billing_cycles::Column::Name.eq(name))
        .filter(visible_to(user_id));
    if let Some(id) = exclude_id {
        query = query.filter(billing_cycles::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    name: &str,
    days: i32,
    user_id: &str,
) -> Result<billing_cycles::Model, DbErr> {
    let now = Utc::now();
    billing_cycles::ActiveModel {
        id: ActiveValue::Set(new_id().to_string()),
        name: ActiveValue::Set(name.to_string()),
        days: ActiveValue::Set(days),
        system_defined: ActiveValue::Set(false),
        user_id: ActiveValue::Set(Some(user_id.to_string())),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        deleted_at: ActiveValue::Set(None),
    }
    .insert(db)
    .await
}

pub(crate) async fn update<C: ConnectionTrait>(
    db: &C,
    model: billing_cycles::Model,
    name: &str,
    days: i32,
) -> Result<billing_cycles::Model, DbErr> {
    let mut active: billing_cycles::ActiveModel = model.into();
    active.name = ActiveValue::Set(name.to_string());
    active.days = ActiveValue::Set(days);
    active.updated_at = ActiveValue::Set(Utc::now());
    active.update(db).await
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: &str) -> Result<bool, DbErr> {
    soft_delete::<billing_cycles::Entity, C>(db, id).await
}
