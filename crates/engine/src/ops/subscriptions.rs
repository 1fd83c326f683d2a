use sea_orm::{DatabaseTransaction, TransactionTrait};
use ulid::Ulid;

use crate::{
    EngineError, ResultEngine, Subscription, SubscriptionFilter, SubscriptionInput, repository,
};

use super::{Engine, access::visible, normalize_optional_text, normalize_required_name, with_tx};

fn not_found() -> EngineError {
    EngineError::NotFound("subscription".to_string())
}

fn normalize_input(input: SubscriptionInput) -> ResultEngine<SubscriptionInput> {
    if input.reminder_days < 0 {
        return Err(EngineError::validation(
            "reminderDays",
            "reminder days must not be negative",
        ));
    }
    Ok(SubscriptionInput {
        name: normalize_required_name(&input.name, "subscription")?,
        description: normalize_optional_text(input.description.as_deref()),
        ..input
    })
}

impl Engine {
    /// Every referenced row must be visible to the user; the currency must
    /// exist.
    async fn check_references(
        &self,
        db_tx: &DatabaseTransaction,
        input: &SubscriptionInput,
        user_id: &str,
    ) -> ResultEngine<()> {
        let category =
            repository::categories::find_by_id(db_tx, &input.category_id.to_string()).await?;
        visible(category, user_id)?;

        if repository::currencies::find_by_id(db_tx, input.currency_id)
            .await?
            .is_none()
        {
            return Err(EngineError::NotFound("currency".to_string()));
        }

        let cycle =
            repository::billing_cycles::find_by_id(db_tx, &input.billing_cycle_id.to_string())
                .await?;
        visible(cycle, user_id)?;

        let method =
            repository::payment_methods::find_by_id(db_tx, &input.payment_method_id.to_string())
                .await?;
        visible(method, user_id)?;
        Ok(())
    }

    /// Creates an active subscription for the user.
    pub async fn new_subscription(
        &self,
        input: SubscriptionInput,
        user_id: Ulid,
    ) -> ResultEngine<Subscription> {
        let input = normalize_input(input)?;
        let user_id = user_id.to_string();
        let subscription = with_tx!(self, |db_tx| {
            self.check_references(&db_tx, &input, &user_id).await?;
            let model = repository::subscriptions::insert(&db_tx, &user_id, &input).await?;
            Subscription::try_from(model)
        })?;
        tracing::debug!(subscription_id = %subscription.id, "subscription created");
        Ok(subscription)
    }

    /// Return one of the user's subscriptions.
    pub async fn subscription(&self, id: Ulid, user_id: Ulid) -> ResultEngine<Subscription> {
        let model = repository::subscriptions::find_for_user(
            &self.database,
            &id.to_string(),
            &user_id.to_string(),
        )
        .await?
        .ok_or_else(not_found)?;
        Subscription::try_from(model)
    }

    /// Return the user's subscriptions by upcoming billing date.
    pub async fn subscriptions(
        &self,
        filter: SubscriptionFilter,
        user_id: Ulid,
    ) -> ResultEngine<Vec<Subscription>> {
        repository::subscriptions::list_for_user(&self.database, &user_id.to_string(), filter)
            .await?
            .into_iter()
            .map(Subscription::try_from)
            .collect()
    }

    /// Replaces every field of a subscription, `active` included.
    pub async fn update_subscription(
        &self,
        id: Ulid,
        input: SubscriptionInput,
        user_id: Ulid,
    ) -> ResultEngine<Subscription> {
        let input = normalize_input(input)?;
        let id = id.to_string();
        let user_id = user_id.to_string();
        with_tx!(self, |db_tx| {
            let model = repository::subscriptions::find_for_user(&db_tx, &id, &user_id)
                .await?
                .ok_or_else(not_found)?;
            self.check_references(&db_tx, &input, &user_id).await?;
            let model = repository::subscriptions::replace(&db_tx, model, &input).await?;
            Subscription::try_from(model)
        })
    }

    /// Soft-deletes one of the user's subscriptions.
    pub async fn delete_subscription(&self, id: Ulid, user_id: Ulid) -> ResultEngine<()> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        with_tx!(self, |db_tx| {
            repository::subscriptions::find_for_user(&db_tx, &id, &user_id)
                .await?
                .ok_or_else(not_found)?;
            if !repository::subscriptions::delete(&db_tx, &id).await? {
                return Err(not_found());
            }
            Ok(())
        })
    }
}
