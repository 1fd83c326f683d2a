use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, QueryFilter, QueryOrder,
};

use crate::{SubscriptionFilter, SubscriptionInput, ids::new_id, subscriptions};

use super::{SoftDelete, soft_delete};

/// Subscriptions are only ever read through their owner.
pub(crate) async fn find_for_user<C: ConnectionTrait>(
    db: &C,
    id: &str,
    user_id: &str,
) -> Result<Option<subscriptions::Model>, DbErr> {
    subscriptions::Entity::live_by_id(id)
        .filter(subscriptions::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Ordered by upcoming billing date, then name.
pub(crate) async fn list_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    filter: SubscriptionFilter,
) -> Result<Vec<subscriptions::Model>, DbErr> {
    let mut query = subscriptions::Entity::live().filter(subscriptions::Column::UserId.eq(user_id));
    query = match filter {
        SubscriptionFilter::All => query,
        SubscriptionFilter::Category(id) => {
            query.filter(subscriptions::Column::CategoryId.eq(id.to_string()))
        }
        SubscriptionFilter::BillingCycle(id) => {
            query.filter(subscriptions::Column::BillingCycleId.eq(id.to_string()))
        }
        SubscriptionFilter::PaymentMethod(id) => {
            query.filter(subscriptions::Column::PaymentMethodId.eq(id.to_string()))
        }
    };
    query
        .order_by_asc(subscriptions::Column::NextBillingDate)
        .order_by_asc(subscriptions::Column::Name)
        .all(db)
        .await
}

pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    input: &SubscriptionInput,
) -> Result<subscriptions::Model, DbErr> {
    let now = Utc::now();
    subscriptions::ActiveModel {
        id: ActiveValue::Set(new_id().to_string()),
        user_id: ActiveValue::Set(user_id.to_string()),
        category_id: ActiveValue::Set(input.category_id.to_string()),
        currency_id: ActiveValue::Set(input.currency_id),
        billing_cycle_id: ActiveValue::Set(input.billing_cycle_id.to_string()),
        payment_method_id: ActiveValue::Set(input.payment_method_id.to_string()),
        name: ActiveValue::Set(input.name.clone()),
        description: ActiveValue::Set(input.description.clone()),
        amount_minor: ActiveValue::Set(input.amount.cents()),
        next_billing_date: ActiveValue::Set(input.next_billing_date),
        reminder_days: ActiveValue::Set(input.reminder_days),
        active: ActiveValue::Set(true),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        deleted_at: ActiveValue::Set(None),
    }
    .insert(db)
    .await
}

/// Replaces every writable field.
pub(crate) async fn replace<C: ConnectionTrait>(
    db: &C,
    model: subscriptions::Model,
    input: &SubscriptionInput,
) -> Result<subscriptions::Model, DbErr> {
    let mut active: subscriptions::ActiveModel = model.into();
    active.category_id = ActiveValue::Set(input.category_id.to_string());
    active.currency_id = ActiveValue::Set(input.currency_id);
    active.billing_cycle_id = ActiveValue::Set(input.billing_cycle_id.to_string());
    active.payment_method_id = ActiveValue::Set(input.payment_method_id.to_string());
    active.name = ActiveValue::Set(input.name.clone());
    active.description = ActiveValue::Set(input.description.clone());
    active.amount_minor = ActiveValue::Set(input.amount.cents());
    active.next_billing_date = ActiveValue::Set(input.next_billing_date);
    active.reminder_days = ActiveValue::Set(input.reminder_days);
    active.active = ActiveValue::Set(input.active);
    active.updated_at = ActiveValue::Set(Utc::now());
    active.update(db).await
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: &str) -> Result<bool, DbErr> {
    soft_delete::<subscriptions::Entity, C>(db, id).await
}
