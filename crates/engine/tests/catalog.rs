use chrono::{DateTime, TimeZone, Utc};

use engine::{EngineError, MAX_CYCLE_DAYS, PaymentMethodType};

mod common;

const SYSTEM_CATEGORIES: [&str; 7] = [
    "Cloud Storage",
    "Fitness",
    "Gaming",
    "Music",
    "News",
    "Productivity Tools",
    "Streaming",
];

#[tokio::test]
async fn currencies_are_seeded_and_ordered_by_code() {
    let engine = common::engine().await;
    let codes: Vec<String> = engine
        .currencies()
        .await
        .unwrap()
        .into_iter()
        .map(|currency| currency.code)
        .collect();
    assert_eq!(codes, ["EUR", "GBP", "JPY", "USD"]);
}

#[tokio::test]
async fn system_categories_come_first_then_own_ones() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    engine.new_category("Anime", alice.id).await.unwrap();

    let categories = engine.categories(alice.id).await.unwrap();
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(&names[..7], SYSTEM_CATEGORIES);
    assert_eq!(names[7], "Anime");
    assert!(categories[..7].iter().all(|c| c.system_defined && c.user_id.is_none()));
    assert_eq!(categories[7].user_id, Some(alice.id));
}

#[tokio::test]
async fn category_names_are_unique_per_user_and_against_system_ones() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let bob = common::register(&engine, "Bob").await;

    let err = engine.new_category("Streaming", alice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Duplicate(_)));

    engine.new_category("Hobbies", alice.id).await.unwrap();
    engine
        .new_category("Hobbies", bob.id)
        .await
        .expect("another user's private name is free");
    let err = engine.new_category("Hobbies", alice.id).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Duplicate("category with name 'Hobbies' already exists".to_string())
    );
}

#[tokio::test]
async fn renaming_checks_clashes_but_ignores_the_row_itself() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let books = engine.new_category("Books", alice.id).await.unwrap();
    engine.new_category("Comics", alice.id).await.unwrap();

    let same = engine
        .rename_category(books.id, "Books", alice.id)
        .await
        .unwrap();
    assert_eq!(same.name, "Books");

    let err = engine
        .rename_category(books.id, "Comics", alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Duplicate(_)));

    let renamed = engine
        .rename_category(books.id, "  Reading ", alice.id)
        .await
        .unwrap();
    assert_eq!(renamed.name, "Reading");
    assert!(renamed.updated_at >= books.updated_at);
}

#[tokio::test]
async fn system_rows_are_read_only_and_foreign_rows_are_hidden() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let bob = common::register(&engine, "Bob").await;

    let streaming = engine
        .categories(alice.id)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Streaming")
        .unwrap();
    assert_eq!(
        engine
            .rename_category(streaming.id, "Video", alice.id)
            .await
            .unwrap_err(),
        EngineError::Forbidden("system-defined categories cannot be modified".to_string())
    );
    assert_eq!(
        engine
            .delete_category(streaming.id, alice.id)
            .await
            .unwrap_err(),
        EngineError::Forbidden("system-defined categories cannot be deleted".to_string())
    );

    let monthly = engine
        .billing_cycles(alice.id)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Monthly")
        .unwrap();
    assert!(matches!(
        engine
            .update_billing_cycle(monthly.id, "Monthly", 31, alice.id)
            .await
            .unwrap_err(),
        EngineError::Forbidden(_)
    ));
    assert!(matches!(
        engine
            .delete_billing_cycle(monthly.id, alice.id)
            .await
            .unwrap_err(),
        EngineError::Forbidden(_)
    ));

    let private = engine.new_category("Private", bob.id).await.unwrap();
    let not_found = EngineError::NotFound("category".to_string());
    assert_eq!(
        engine.category(private.id, alice.id).await.unwrap_err(),
        not_found
    );
    assert_eq!(
        engine
            .rename_category(private.id, "Mine", alice.id)
            .await
            .unwrap_err(),
        not_found
    );
    assert_eq!(
        engine
            .delete_category(private.id, alice.id)
            .await
            .unwrap_err(),
        not_found
    );
}

#[tokio::test]
async fn deleted_categories_never_come_back_and_free_their_name() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let category = engine.new_category("Temporary", alice.id).await.unwrap();

    engine.delete_category(category.id, alice.id).await.unwrap();

    assert!(matches!(
        engine.category(category.id, alice.id).await.unwrap_err(),
        EngineError::NotFound(_)
    ));
    assert!(matches!(
        engine.delete_category(category.id, alice.id).await.unwrap_err(),
        EngineError::NotFound(_)
    ));
    let categories = engine.categories(alice.id).await.unwrap();
    assert!(categories.iter().all(|c| c.id != category.id));

    let again = engine.new_category("Temporary", alice.id).await.unwrap();
    assert_ne!(again.id, category.id);
}

#[tokio::test]
async fn custom_billing_cycle_is_visible_to_its_owner_only() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let bob = common::register(&engine, "Bob").await;

    let biweekly = engine
        .new_billing_cycle("Biweekly", 14, alice.id)
        .await
        .unwrap();
    assert_eq!(biweekly.days, 14);
    assert!(!biweekly.system_defined);

    let alice_cycles = engine.billing_cycles(alice.id).await.unwrap();
    assert_eq!(alice_cycles.len(), 6);
    assert_eq!(alice_cycles.last().unwrap().id, biweekly.id);

    let bob_cycles = engine.billing_cycles(bob.id).await.unwrap();
    assert_eq!(bob_cycles.len(), 5);
    assert!(bob_cycles.iter().all(|c| c.system_defined));
    assert_eq!(
        engine.billing_cycle(biweekly.id, bob.id).await.unwrap_err(),
        EngineError::NotFound("billing cycle".to_string())
    );
}

#[tokio::test]
async fn billing_cycle_rules() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;

    let err = engine
        .new_billing_cycle("Never", 0, alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation { field, .. } if field == "days"));

    let err = engine
        .new_billing_cycle("Yearly", 365, alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Duplicate(_)));

    let cycle = engine
        .new_billing_cycle("Fortnight", 14, alice.id)
        .await
        .unwrap();
    let updated = engine
        .update_billing_cycle(cycle.id, "Fortnight", 15, alice.id)
        .await
        .unwrap();
    assert_eq!(updated.days, 15);

    engine.delete_billing_cycle(cycle.id, alice.id).await.unwrap();
    assert!(matches!(
        engine.billing_cycle(cycle.id, alice.id).await.unwrap_err(),
        EngineError::NotFound(_)
    ));
}

#[tokio::test]
async fn next_billing_date_adds_the_cycle_length() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let monthly = engine
        .billing_cycles(alice.id)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Monthly")
        .unwrap();

    let from = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let next = engine
        .next_billing_date(monthly.id, from, alice.id)
        .await
        .unwrap();
    assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 31, 0, 0, 0).unwrap());
}

#[tokio::test]
async fn overlong_cycles_and_out_of_range_dates_are_rejected() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;

    let err = engine
        .new_billing_cycle("Forever", i32::MAX, alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation { field, .. } if field == "days"));

    let century = engine
        .new_billing_cycle("Century", MAX_CYCLE_DAYS, alice.id)
        .await
        .unwrap();
    let err = engine
        .update_billing_cycle(century.id, "Century", MAX_CYCLE_DAYS + 1, alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation { field, .. } if field == "days"));

    let err = engine
        .next_billing_date(century.id, DateTime::<Utc>::MAX_UTC, alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation { .. }));

    let from = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let next = engine
        .next_billing_date(century.id, from, alice.id)
        .await
        .unwrap();
    assert_eq!(next.date_naive(), from.date_naive() + chrono::Days::new(36_500));
}

#[tokio::test]
async fn payment_methods_are_unique_by_name_and_type() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;

    let visa = engine
        .new_payment_method("Visa", PaymentMethodType::CreditCard, Some("1234"), alice.id)
        .await
        .unwrap();
    assert_eq!(visa.last_four.as_deref(), Some("1234"));

    let err = engine
        .new_payment_method("Visa", PaymentMethodType::CreditCard, None, alice.id)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Duplicate(
            "payment method with name 'Visa' and type 'credit_card' already exists".to_string()
        )
    );

    let debit = engine
        .new_payment_method("Visa", PaymentMethodType::DebitCard, None, alice.id)
        .await
        .unwrap();
    assert_eq!(debit.last_four, None);

    let err = engine
        .update_payment_method(
            debit.id,
            "Visa",
            PaymentMethodType::CreditCard,
            "9999",
            alice.id,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Duplicate(_)));
    let unchanged = engine.payment_method(debit.id, alice.id).await.unwrap();
    assert_eq!(unchanged.kind, PaymentMethodType::DebitCard);
    assert_eq!(unchanged.last_four, None);
}

#[tokio::test]
async fn payment_methods_belong_to_their_owner() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let bob = common::register(&engine, "Bob").await;

    let wallet = engine
        .new_payment_method("PayPal", PaymentMethodType::DigitalWallet, None, bob.id)
        .await
        .unwrap();
    assert!(engine.payment_methods(alice.id).await.unwrap().is_empty());

    let not_found = EngineError::NotFound("payment method".to_string());
    assert_eq!(
        engine.payment_method(wallet.id, alice.id).await.unwrap_err(),
        not_found
    );
    assert_eq!(
        engine
            .update_payment_method(
                wallet.id,
                "Mine",
                PaymentMethodType::Other,
                "0000",
                alice.id
            )
            .await
            .unwrap_err(),
        not_found
    );
    assert_eq!(
        engine
            .delete_payment_method(wallet.id, alice.id)
            .await
            .unwrap_err(),
        not_found
    );

    let updated = engine
        .update_payment_method(
            wallet.id,
            "PayPal",
            PaymentMethodType::DigitalWallet,
            "4321",
            bob.id,
        )
        .await
        .unwrap();
    assert_eq!(updated.last_four.as_deref(), Some("4321"));

    engine.delete_payment_method(wallet.id, bob.id).await.unwrap();
    assert!(engine.payment_methods(bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn last_four_must_be_four_digits() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;

    for bad in ["123", "12345", "12a4"] {
        let err = engine
            .new_payment_method("Card", PaymentMethodType::CreditCard, Some(bad), alice.id)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation { field, .. } if field == "lastFour"));
    }
}
