use sea_orm::TransactionTrait;
use ulid::Ulid;

use crate::{EngineError, PaymentMethod, PaymentMethodType, ResultEngine, repository};

use super::{
    Engine,
    access::{Write, visible, writable},
    normalize_required_name, with_tx,
};

fn duplicate(name: &str, kind: PaymentMethodType) -> EngineError {
    EngineError::Duplicate(format!(
        "payment method with name '{name}' and type '{}' already exists",
        kind.as_str()
    ))
}

/// Exactly four ASCII digits.
fn validate_last_four(value: &str) -> ResultEngine<&str> {
    let value = value.trim();
    if value.len() != 4 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(EngineError::validation(
            "lastFour",
            "last four must be exactly 4 digits",
        ));
    }
    Ok(value)
}

impl Engine {
    /// Return the user's payment methods ordered by name.
    pub async fn payment_methods(&self, user_id: Ulid) -> ResultEngine<Vec<PaymentMethod>> {
        repository::payment_methods::list_for_user(&self.database, &user_id.to_string())
            .await?
            .into_iter()
            .map(PaymentMethod::try_from)
            .collect()
    }

    /// Return one of the user's payment methods.
    pub async fn payment_method(&self, id: Ulid, user_id: Ulid) -> ResultEngine<PaymentMethod> {
        let model =
            repository::payment_methods::find_by_id(&self.database, &id.to_string()).await?;
        PaymentMethod::try_from(visible(model, &user_id.to_string())?)
    }

    /// Adds a payment method. `(name, kind)` must be new for the user.
    pub async fn new_payment_method(
        &self,
        name: &str,
        kind: PaymentMethodType,
        last_four: Option<&str>,
        user_id: Ulid,
    ) -> ResultEngine<PaymentMethod> {
        let name = normalize_required_name(name, "payment method")?;
        let last_four = last_four.map(validate_last_four).transpose()?;
        let user_id = user_id.to_string();
        with_tx!(self, |db_tx| {
            if repository::payment_methods::name_type_taken(&db_tx, &name, kind, &user_id, None)
                .await?
            {
                return Err(duplicate(&name, kind));
            }
            let model =
                repository::payment_methods::insert(&db_tx, &user_id, &name, kind, last_four)
                    .await?;
            PaymentMethod::try_from(model)
        })
    }

    /// Replaces name, kind and last four digits of a payment method.
    pub async fn update_payment_method(
        &self,
        id: Ulid,
        name: &str,
        kind: PaymentMethodType,
        last_four: &str,
        user_id: Ulid,
    ) -> ResultEngine<PaymentMethod> {
        let name = normalize_required_name(name, "payment method")?;
        let last_four = validate_last_four(last_four)?;
        let id = id.to_string();
        let user_id = user_id.to_string();
        with_tx!(self, |db_tx| {
            let model = repository::payment_methods::find_by_id(&db_tx, &id).await?;
            let model = writable(model, &user_id, Write::Modify)?;
            if repository::payment_methods::name_type_taken(
                &db_tx,
                &name,
                kind,
                &user_id,
                Some(&id),
            )
            .await?
            {
                return Err(duplicate(&name, kind));
            }
            let model =
                repository::payment_methods::update(&db_tx, model, &name, kind, last_four).await?;
            PaymentMethod::try_from(model)
        })
    }

    /// Soft-deletes a payment method.
    pub async fn delete_payment_method(&self, id: Ulid, user_id: Ulid) -> ResultEngine<()> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        with_tx!(self, |db_tx| {
            let model = repository::payment_methods::find_by_id(&db_tx, &id).await?;
            writable(model, &user_id, Write::Delete)?;
            if !repository::payment_methods::delete(&db_tx, &id).await? {
                return Err(EngineError::NotFound("payment method".to_string()));
            }
            Ok(())
        })
    }
}
