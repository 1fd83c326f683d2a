//! Who may see and change which row.
//!
//! Rows are either system-defined (shared, read-only) or owned by one user.
//! Someone else's row is reported as missing, never as forbidden, so ids of
//! other users cannot be probed.

use crate::{EngineError, ResultEngine, billing_cycles, categories, payment_methods};

pub(super) trait Owned {
    /// Singular resource name used in error messages.
    const LABEL: &'static str;
    const PLURAL: &'static str;

    fn owner_id(&self) -> Option<&str>;
    fn system_defined(&self) -> bool;
}

#[derive(Clone, Copy, Debug)]
pub(super) enum Write {
    Modify,
    Delete,
}

impl Write {
    fn past_participle(self) -> &'static str {
        match self {
            Self::Modify => "modified",
            Self::Delete => "deleted",
        }
    }
}

/// Returns the row if `user_id` can read it.
pub(super) fn visible<T: Owned>(row: Option<T>, user_id: &str) -> ResultEngine<T> {
    let row = row.ok_or_else(|| EngineError::NotFound(T::LABEL.to_string()))?;
    if row.system_defined() || row.owner_id() == Some(user_id) {
        Ok(row)
    } else {
        Err(EngineError::NotFound(T::LABEL.to_string()))
    }
}

/// Returns the row if `user_id` can change it.
pub(super) fn writable<T: Owned>(row: Option<T>, user_id: &str, write: Write) -> ResultEngine<T> {
    let row = visible(row, user_id)?;
    if row.system_defined() {
        return Err(EngineError::Forbidden(format!(
            "system-defined {} cannot be {}",
            T::PLURAL,
            write.past_participle()
        )));
    }
    Ok(row)
}

impl Owned for categories::Model {
    const LABEL: &'static str = "category";
    const PLURAL: &'static str = "categories";

    fn owner_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn system_defined(&self) -> bool {
        self.system_defined
    }
}

impl Owned for billing_cycles::Model {
    const LABEL: &'static str = "billing cycle";
    const PLURAL: &'static str = "billing cycles";

    fn owner_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn system_defined(&self) -> bool {
        self.system_defined
    }
}

impl Owned for payment_methods::Model {
    const LABEL: &'static str = "payment method";
    const PLURAL: &'static str = "payment methods";

    fn owner_id(&self) -> Option<&str> {
        Some(&self.user_id)
    }

    fn system_defined(&self) -> bool {
        false
    }
}
