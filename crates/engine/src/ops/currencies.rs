use crate::{Currency, ResultEngine, repository};

use super::Engine;

impl Engine {
    /// Return every known currency ordered by code.
    pub async fn currencies(&self) -> ResultEngine<Vec<Currency>> {
        let models = repository::currencies::list(&self.database).await?;
        Ok(models.into_iter().map(Currency::from).collect())
    }
}
