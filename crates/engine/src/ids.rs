//! Identifiers for every entity but currencies.
//!
//! Ids are ULIDs: 48 bits of millisecond timestamp followed by 80 random bits,
//! rendered as 26 Crockford base32 characters. The textual form sorts like the
//! creation order, which is what the database stores (`char(26)`).

use std::sync::{LazyLock, Mutex, PoisonError};

use ulid::{Generator, Ulid};

use crate::{EngineError, ResultEngine};

/// Length of the textual form of an id.
pub const ID_LEN: usize = 26;

static GENERATOR: LazyLock<Mutex<Generator>> = LazyLock::new(|| Mutex::new(Generator::new()));

/// Returns a new id, strictly greater than every id generated before by this
/// process.
///
/// Within the same millisecond the random part is incremented; if it would
/// overflow a fresh random id is returned instead.
pub fn new_id() -> Ulid {
    let mut generator = GENERATOR.lock().unwrap_or_else(PoisonError::into_inner);
    generator.generate().unwrap_or_else(|_| Ulid::new())
}

/// Parses a client-provided id. `label` names the offending field.
pub fn parse_id(value: &str, label: &str) -> ResultEngine<Ulid> {
    let value = value.trim();
    if value.len() != ID_LEN {
        return Err(EngineError::validation(
            label,
            format!("invalid {label}: expected {ID_LEN} characters"),
        ));
    }
    Ulid::from_string(value)
        .map_err(|_| EngineError::validation(label, format!("invalid {label}: malformed id")))
}

/// Parses an id read back from the database.
pub(crate) fn stored_id(value: &str, label: &str) -> ResultEngine<Ulid> {
    Ulid::from_string(value).map_err(|_| EngineError::Internal(format!("corrupted {label} id")))
}
