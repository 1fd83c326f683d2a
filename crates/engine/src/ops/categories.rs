use sea_orm::TransactionTrait;
use ulid::Ulid;

use crate::{Category, EngineError, ResultEngine, repository};

use super::{
    Engine,
    access::{Write, visible, writable},
    normalize_required_name, with_tx,
};

fn duplicate(name: &str) -> EngineError {
    EngineError::Duplicate(format!("category with name '{name}' already exists"))
}

impl Engine {
    /// Return the system categories followed by the user's own, by name.
    pub async fn categories(&self, user_id: Ulid) -> ResultEngine<Vec<Category>> {
        repository::categories::list_visible(&self.database, &user_id.to_string())
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    /// Return a category visible to the user.
    pub async fn category(&self, id: Ulid, user_id: Ulid) -> ResultEngine<Category> {
        let model = repository::categories::find_by_id(&self.database, &id.to_string()).await?;
        Category::try_from(visible(model, &user_id.to_string())?)
    }

    /// Creates a private category.
    ///
    /// The name must not clash with a system category nor with another of the
    /// user's categories.
    pub async fn new_category(&self, name: &str, user_id: Ulid) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        let user_id = user_id.to_string();
        let category = with_tx!(self, |db_tx| {
            if repository::categories::name_taken(&db_tx, &name, &user_id, None).await? {
                return Err(duplicate(&name));
            }
            let model = repository::categories::insert(&db_tx, &name, &user_id).await?;
            Category::try_from(model)
        })?;
        tracing::debug!(category_id = %category.id, "category created");
        Ok(category)
    }

    /// Renames one of the user's categories.
    pub async fn rename_category(
        &self,
        id: Ulid,
        name: &str,
        user_id: Ulid,
    ) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        let id = id.to_string();
        let user_id = user_id.to_string();
        with_tx!(self, |db_tx| {
            let model = repository::categories::find_by_id(&db_tx, &id).await?;
            let model = writable(model, &user_id, Write::Modify)?;
            if repository::categories::name_taken(&db_tx, &name, &user_id, Some(&id)).await? {
                return Err(duplicate(&name));
            }
            let model = repository::categories::rename(&db_tx, model, &name).await?;
            Category::try_from(model)
        })
    }

    /// Soft-deletes one of the user's categories.
    pub async fn delete_category(&self, id: Ulid, user_id: Ulid) -> ResultEngine<()> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        with_tx!(self, |db_tx| {
            let model = repository::categories::find_by_id(&db_tx, &id).await?;
            writable(model, &user_id, Write::Delete)?;
            if !repository::categories::delete(&db_tx, &id).await? {
                return Err(EngineError::NotFound("category".to_string()));
            }
            Ok(())
        })
    }
}
