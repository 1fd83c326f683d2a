//! Thin query wrappers, one module per entity.
//!
//! Repositories know nothing about ownership rules; they only shape queries.
//! Every read goes through [`SoftDelete::live`] so rows with a deletion
//! timestamp are invisible to the rest of the engine.

use chrono::Utc;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Select, sea_query::Expr};

pub(crate) mod billing_cycles;
pub(crate) mod categories;
pub(crate) mod currencies;
pub(crate) mod payment_methods;
pub(crate) mod subscriptions;
pub(crate) mod users;

/// Entities deleted by stamping `deleted_at` instead of removing the row.
pub(crate) trait SoftDelete: EntityTrait {
    const ID: Self::Column;
    const DELETED_AT: Self::Column;

    /// `SELECT` restricted to rows that have not been deleted.
    fn live() -> Select<Self> {
        Self::find().filter(Self::DELETED_AT.is_null())
    }

    /// Live row by primary key.
    fn live_by_id(id: &str) -> Select<Self> {
        Self::live().filter(Self::ID.eq(id))
    }
}

/// Marks a row as deleted. Returns `false` when no live row matched.
pub(crate) async fn soft_delete<E, C>(db: &C, id: &str) -> Result<bool, DbErr>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let result = E::update_many()
        .col_expr(E::DELETED_AT, Expr::value(Utc::now()))
        .filter(E::ID.eq(id))
        .filter(E::DELETED_AT.is_null())
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

macro_rules! impl_soft_delete {
    ($module:ident) => {
        impl SoftDelete for crate::$module::Entity {
            const ID: crate::$module::Column = crate::$module::Column::Id;
            const DELETED_AT: crate::$module::Column = crate::$module::Column::DeletedAt;
        }
    };
}

impl_soft_delete!(users);
impl_soft_delete!(categories);
impl_soft_delete!(billing_cycles);
impl_soft_delete!(payment_methods);
impl_soft_delete!(subscriptions);
