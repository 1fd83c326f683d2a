use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use crate::{categories, ids::new_id};

use super::{SoftDelete, soft_delete};

/// Rows owned by `user_id` plus the system-defined ones.
fn visible_to(user_id: &str) -> Condition {
    Condition::any()
        .add(categories::Column::UserId.eq(user_id))
        .add(categories::Column::SystemDefined.eq(true))
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: &str,
) -> Result<Option<categories::Model>, DbErr> {
    categories::Entity::live_by_id(id).one(db).await
}

/// System-defined first, then alphabetical.
pub(crate) async fn list_visible<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
) -> Result<Vec<categories::Model>, DbErr> {
    categories::Entity::live()
        .filter(visible_to(user_id))
        .order_by_desc(categories::Column::SystemDefined)
        .order_by_asc(categories::Column::Name)
        .all(db)
        .await
}

/// Whether `name` is already used by a row visible to `user_id`, ignoring
/// `exclude_id` (the row being renamed).
pub(crate) async fn name_taken<C: ConnectionTrait>(
    db: &C,
    name: &str,
    user_id: &str,
    exclude_id: Option<&str>,
) -> Result<bool, DbErr> {
    let mut query = categories::Entity::live()
        .filter(categories::Column::Name.eq(name))
        .filter(visible_to(user_id));
    if let Some(id) = exclude_id {
        query = query.filter(categories::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    name: &str,
    user_id: &str,
) -> Result<categories::Model, DbErr> {
    let now = Utc::now();
    categories::ActiveModel {
        id: ActiveValue::Set(new_id().to_string()),
        name: ActiveValue::Set(name.to_string()),
        system_defined: ActiveValue::Set(false),
        user_id: ActiveValue::Set(Some(user_id.to_string())),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        deleted_at: ActiveValue::Set(None),
    }
    .insert(db)
    .await
}

pub(crate) async fn rename<C: ConnectionTrait>(
    db: &C,
    model: categories::Model,
    name: &str,
) -> Result<categories::Model, DbErr> {
    let mut active: categories::ActiveModel = model.into();
    active.name = ActiveValue::Set(name.to_string());
    active.updated_at = ActiveValue::Set(Utc::now());
    active.update(db).await
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: &str) -> Result<bool, DbErr> {
    soft_delete::<categories::Entity, C>(db, id).await
}

#[cfg(test)]
mod tests {
    use migration::MigratorTrait;
    use sea_orm::{Database, DatabaseConnection};

    use super::*;
    use crate::{EngineError, repository::users};

    async fn db_with_user() -> (DatabaseConnection, String) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let user = users::insert(&db, "Ada", "ada@example.com", "hash")
            .await
            .unwrap();
        (db, user.id)
    }

    #[tokio::test]
    async fn unique_index_rejects_a_second_live_name() {
        let (db, user_id) = db_with_user().await;
        insert(&db, "Hobbies", &user_id).await.unwrap();

        let err = insert(&db, "Hobbies", &user_id).await.unwrap_err();
        assert_eq!(
            EngineError::from(err),
            EngineError::Duplicate("record already exists".to_string())
        );
    }

    #[tokio::test]
    async fn unique_index_ignores_deleted_rows() {
        let (db, user_id) = db_with_user().await;
        let first = insert(&db, "Hobbies", &user_id).await.unwrap();
        assert!(delete(&db, &first.id).await.unwrap());

        let second = insert(&db, "Hobbies", &user_id).await.unwrap();
        assert_ne!(second.id, first.id);
    }
}
