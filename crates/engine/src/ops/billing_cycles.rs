use chrono::{DateTime, Utc};
use sea_orm::TransactionTrait;
use ulid::Ulid;

use crate::{BillingCycle, EngineError, MAX_CYCLE_DAYS, ResultEngine, repository};

use super::{
    Engine,
    access::{Write, visible, writable},
    normalize_required_name, with_tx,
};

fn duplicate(name: &str) -> EngineError {
    EngineError::Duplicate(format!("billing cycle with name '{name}' already exists"))
}

fn validate_days(days: i32) -> ResultEngine<i32> {
    if days < 1 {
        return Err(EngineError::validation("days", "days must be at least 1"));
    }
    if days > MAX_CYCLE_DAYS {
        return Err(EngineError::validation(
            "days",
            format!("days must be at most {MAX_CYCLE_DAYS}"),
        ));
    }
    Ok(days)
}

impl Engine {
    /// Return the system billing cycles followed by the user's own, by name.
    pub async fn billing_cycles(&self, user_id: Ulid) -> ResultEngine<Vec<BillingCycle>> {
        repository::billing_cycles::list_visible(&self.database, &user_id.to_string())
            .await?
            .into_iter()
            .map(BillingCycle::try_from)
            .collect()
    }

    /// Return a billing cycle visible to the user.
    pub async fn billing_cycle(&self, id: Ulid, user_id: Ulid) -> ResultEngine<BillingCycle> {
        let model = repository::billing_cycles::find_by_id(&self.database, &id.to_string()).await?;
        BillingCycle::try_from(visible(model, &user_id.to_string())?)
    }

    /// Creates a private billing cycle of `days` days.
    pub async fn new_billing_cycle(
        &self,
        name: &str,
        days: i32,
        user_id: Ulid,
    ) -> ResultEngine<BillingCycle> {
        let name = normalize_required_name(name, "billing cycle")?;
        let days = validate_days(days)?;
        let user_id = user_id.to_string();
        with_tx!(self, |db_tx| {
            if repository::billing_cycles::name_taken(&db_tx, &name, &user_id, None).await? {
                return Err(duplicate(&name));
            }
            let model = repository::billing_cycles::insert(&db_tx, &name, days, &user_id).await?;
            BillingCycle::try_from(model)
        })
    }

    /// Replaces name and length of one of the user's billing cycles.
    pub async fn update_billing_cycle(
        &self,
        id: Ulid,
        name: &str,
        days: i32,
        user_id: Ulid,
    ) -> ResultEngine<BillingCycle> {
        let name = normalize_required_name(name, "billing cycle")?;
        let days = validate_days(days)?;
        let id = id.to_string();
        let user_id = user_id.to_string();
        with_tx!(self, |db_tx| {
            let model = repository::billing_cycles::find_by_id(&db_tx, &id).await?;
            let model = writable(model, &user_id, Write::Modify)?;
            if repository::billing_cycles::name_taken(&db_tx, &name, &user_id, Some(&id)).await? {
                return Err(duplicate(&name));
            }
            let model = repository::billing_cycles::update(&db_tx, model, &name, days).await?;
            BillingCycle::try_from(model)
        })
    }

    /// Soft-deletes one of the user's billing cycles.
    pub async fn delete_billing_cycle(&self, id: Ulid, user_id: Ulid) -> ResultEngine<()> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        with_tx!(self, |db_tx| {
            let model = repository::billing_cycles::find_by_id(&db_tx, &id).await?;
            writable(model, &user_id, Write::Delete)?;
            if !repository::billing_cycles::delete(&db_tx, &id).await? {
                return Err(EngineError::NotFound("billing cycle".to_string()));
            }
            Ok(())
        })
    }

    /// Computes the billing date following `from` for a visible cycle.
    ///
    /// Pure calculation: nothing is stored.
    pub async fn next_billing_date(
        &self,
        id: Ulid,
        from: DateTime<Utc>,
        user_id: Ulid,
    ) -> ResultEngine<DateTime<Utc>> {
        let cycle = self.billing_cycle(id, user_id).await?;
        cycle
            .next_billing_date(from)
            .ok_or_else(|| EngineError::validation("from", "next billing date is out of range"))
    }
}
