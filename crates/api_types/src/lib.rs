use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use validator::Validate;

/// Uniform wrapper around every response body.
///
/// Successful responses carry `data` and/or `message`, failures carry `error`.
/// Absent fields are omitted from the JSON.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct RegisterRequest {
        #[validate(length(min = 1))]
        pub name: String,
        #[validate(email)]
        pub email: String,
        #[validate(length(min = 6))]
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct LoginRequest {
        #[validate(email)]
        pub email: String,
        #[validate(length(min = 1))]
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserView {
        pub id: Ulid,
        pub email: String,
        pub name: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub token: String,
        pub user: UserView,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct CategoryCreate {
        #[validate(length(min = 1, max = 100))]
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct CategoryUpdate {
        #[validate(length(min = 1, max = 100))]
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryView {
        pub id: Ulid,
        pub name: String,
        pub system_defined: bool,
        /// `None` for system-defined categories.
        pub user_id: Option<Ulid>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod currency {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CurrencyView {
        pub id: i32,
        pub code: String,
        pub name: String,
        pub symbol: String,
    }
}

pub mod billing_cycle {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct BillingCycleCreate {
        #[validate(length(min = 1, max = 100))]
        pub name: String,
        #[validate(range(min = 1, max = 36500))]
        pub days: i32,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct BillingCycleUpdate {
        #[validate(length(min = 1, max = 100))]
        pub name: String,
        #[validate(range(min = 1, max = 36500))]
        pub days: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BillingCycleView {
        pub id: Ulid,
        pub name: String,
        pub days: i32,
        pub system_defined: bool,
        pub user_id: Option<Ulid>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Query string of the next billing date calculation.
    ///
    /// `from` defaults to the current time when absent.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct NextBillingDateQuery {
        pub from: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NextBillingDateView {
        pub billing_cycle_id: Ulid,
        pub from: DateTime<Utc>,
        pub next_billing_date: DateTime<Utc>,
    }
}

pub mod payment_method {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethodType {
        CreditCard,
        DebitCard,
        BankAccount,
        DigitalWallet,
        Other,
    }

    impl PaymentMethodType {
        /// Returns the canonical type string used by the engine/database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::CreditCard => "credit_card",
                Self::DebitCard => "debit_card",
                Self::BankAccount => "bank_account",
                Self::DigitalWallet => "digital_wallet",
                Self::Other => "other",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    pub struct PaymentMethodCreate {
        #[validate(length(min = 1, max = 100))]
        pub name: String,
        #[serde(rename = "type")]
        pub kind: PaymentMethodType,
        #[validate(length(equal = 4))]
        pub last_four: Option<String>,
    }

    /// Unlike creation, an update always restates the last four digits.
    #[derive(Debug, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    pub struct PaymentMethodUpdate {
        #[validate(length(min = 1, max = 100))]
        pub name: String,
        #[serde(rename = "type")]
        pub kind: PaymentMethodType,
        #[validate(length(equal = 4))]
        pub last_four: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PaymentMethodView {
        pub id: Ulid,
        pub user_id: Ulid,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: PaymentMethodType,
        pub last_four: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod subscription {
    use super::*;

    fn default_reminder_days() -> i32 {
        7
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    pub struct SubscriptionCreate {
        #[validate(length(min = 1, max = 255))]
        pub name: String,
        pub description: Option<String>,
        /// Major units, at most two decimals (e.g. `9.99`).
        #[validate(range(exclusive_min = 0.0))]
        pub amount: f64,
        pub category_id: Ulid,
        pub currency_id: i32,
        pub billing_cycle_id: Ulid,
        pub payment_method_id: Ulid,
        /// RFC3339 timestamp.
        pub next_billing_date: DateTime<Utc>,
        #[serde(default = "default_reminder_days")]
        #[validate(range(min = 0))]
        pub reminder_days: i32,
    }

    /// Full replacement of a subscription: every field is restated.
    #[derive(Debug, Serialize, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    pub struct SubscriptionUpdate {
        #[validate(length(min = 1, max = 255))]
        pub name: String,
        pub description: Option<String>,
        #[validate(range(exclusive_min = 0.0))]
        pub amount: f64,
        pub category_id: Ulid,
        pub currency_id: i32,
        pub billing_cycle_id: Ulid,
        pub payment_method_id: Ulid,
        pub next_billing_date: DateTime<Utc>,
        #[serde(default = "default_reminder_days")]
        #[validate(range(min = 0))]
        pub reminder_days: i32,
        /// Required: an update never flips the flag implicitly.
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SubscriptionView {
        pub id: Ulid,
        pub user_id: Ulid,
        pub name: String,
        pub description: Option<String>,
        pub amount: f64,
        pub category_id: Ulid,
        pub currency_id: i32,
        pub billing_cycle_id: Ulid,
        pub payment_method_id: Ulid,
        pub next_billing_date: DateTime<Utc>,
        pub reminder_days: i32,
        pub active: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_absent_fields() {
        let json = serde_json::to_value(Envelope::<()>::message("done")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "done"}));

        let json = serde_json::to_value(Envelope::<()>::error("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "nope"}));
    }

    #[test]
    fn payment_method_type_uses_snake_case() {
        let kind: payment_method::PaymentMethodType =
            serde_json::from_str("\"digital_wallet\"").unwrap();
        assert_eq!(kind.as_str(), "digital_wallet");
        assert!(serde_json::from_str::<payment_method::PaymentMethodType>("\"cash\"").is_err());
    }

    #[test]
    fn subscription_create_defaults_reminder_days() {
        let body = serde_json::json!({
            "name": "Netflix",
            "amount": 15.49,
            "categoryId": "01ARZ3NDEKTSV4RRFFQ69G5FAV",
            "currencyId": 1,
            "billingCycleId": "01ARZ3NDEKTSV4RRFFQ69G5FAV",
            "paymentMethodId": "01ARZ3NDEKTSV4RRFFQ69G5FAV",
            "nextBillingDate": "2026-11-01T00:00:00Z"
        });
        let create: subscription::SubscriptionCreate = serde_json::from_value(body).unwrap();
        assert_eq!(create.reminder_days, 7);
        assert!(create.validate().is_ok());
    }

    #[test]
    fn subscription_update_requires_active() {
        let mut body = serde_json::json!({
            "name": "Netflix",
            "amount": 15.49,
            "categoryId": "01ARZ3NDEKTSV4RRFFQ69G5FAV",
            "currencyId": 1,
            "billingCycleId": "01ARZ3NDEKTSV4RRFFQ69G5FAV",
            "paymentMethodId": "01ARZ3NDEKTSV4RRFFQ69G5FAV",
            "nextBillingDate": "2026-11-01T00:00:00Z"
        });
        assert!(serde_json::from_value::<subscription::SubscriptionUpdate>(body.clone()).is_err());

        body["active"] = serde_json::json!(false);
        let update: subscription::SubscriptionUpdate = serde_json::from_value(body).unwrap();
        assert!(!update.active);
        assert_eq!(update.reminder_days, 7);
    }

    #[test]
    fn billing_cycle_days_are_bounded() {
        let cycle = |days| billing_cycle::BillingCycleCreate {
            name: "Custom".to_string(),
            days,
        };
        assert!(cycle(0).validate().is_err());
        assert!(cycle(36500).validate().is_ok());
        assert!(cycle(36501).validate().is_err());
    }

    #[test]
    fn validation_rejects_short_password_and_bad_last_four() {
        let register = auth::RegisterRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "12345".to_string(),
        };
        assert!(register.validate().is_err());

        let create = payment_method::PaymentMethodCreate {
            name: "Visa".to_string(),
            kind: payment_method::PaymentMethodType::CreditCard,
            last_four: Some("123".to_string()),
        };
        assert!(create.validate().is_err());

        let create = payment_method::PaymentMethodCreate {
            name: "Visa".to_string(),
            kind: payment_method::PaymentMethodType::CreditCard,
            last_four: None,
        };
        assert!(create.validate().is_ok());
    }
}
