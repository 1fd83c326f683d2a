use sea_orm::{ConnectionTrait, DbErr, EntityTrait, QueryOrder};

use crate::currencies;

pub(crate) async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<currencies::Model>, DbErr> {
    currencies::Entity::find()
        .order_by_asc(currencies::Column::Code)
        .all(db)
        .await
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<currencies::Model>, DbErr> {
    currencies::Entity::find_by_id(id).one(db).await
}
