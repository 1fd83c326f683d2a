//! Business logic of the subscription tracker.
//!
//! [`Engine`] owns the database connection together with the password hasher
//! and the token issuer; every operation is an async method on it scoped to
//! the calling user.

pub use auth::{Claims, PasswordHasher, TokenConfig, TokenError, TokenIssuer};
pub use billing_cycles::{BillingCycle, MAX_CYCLE_DAYS};
pub use categories::Category;
pub use currencies::Currency;
pub use error::EngineError;
pub use ids::{new_id, parse_id};
pub use money::Amount;
pub use ops::{Engine, EngineBuilder, Session};
pub use payment_methods::{PaymentMethod, PaymentMethodType};
pub use subscriptions::{Subscription, SubscriptionFilter, SubscriptionInput};
pub use users::User;

pub mod auth;
mod billing_cycles;
mod categories;
mod currencies;
mod error;
pub mod ids;
mod money;
mod ops;
mod payment_methods;
mod repository;
mod subscriptions;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
