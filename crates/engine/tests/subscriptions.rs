use chrono::{DateTime, TimeZone, Utc};
use ulid::Ulid;

use engine::{
    Amount, Engine, EngineError, PaymentMethodType, SubscriptionFilter, SubscriptionInput, User,
};

mod common;

struct Refs {
    streaming: Ulid,
    music: Ulid,
    monthly: Ulid,
    yearly: Ulid,
    card: Ulid,
    usd: i32,
}

async fn refs(engine: &Engine, user: &User) -> Refs {
    let categories = engine.categories(user.id).await.unwrap();
    let category = |name: &str| categories.iter().find(|c| c.name == name).unwrap().id;
    let cycles = engine.billing_cycles(user.id).await.unwrap();
    let cycle = |name: &str| cycles.iter().find(|c| c.name == name).unwrap().id;
    let usd = engine
        .currencies()
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.code == "USD")
        .unwrap()
        .id;
    let card = engine
        .new_payment_method("Visa", PaymentMethodType::CreditCard, Some("4242"), user.id)
        .await
        .unwrap()
        .id;

    Refs {
        streaming: category("Streaming"),
        music: category("Music"),
        monthly: cycle("Monthly"),
        yearly: cycle("Yearly"),
        card,
        usd,
    }
}

fn date(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 11, day, 0, 0, 0).unwrap()
}

fn input(refs: &Refs, name: &str, day: u32) -> SubscriptionInput {
    SubscriptionInput {
        name: name.to_string(),
        description: None,
        amount: Amount::from_cents(999).unwrap(),
        category_id: refs.streaming,
        currency_id: refs.usd,
        billing_cycle_id: refs.monthly,
        payment_method_id: refs.card,
        next_billing_date: date(day),
        reminder_days: 3,
        active: true,
    }
}

#[tokio::test]
async fn create_and_fetch() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let refs = refs(&engine, &alice).await;

    let mut new = input(&refs, "  Netflix ", 5);
    new.description = Some("  family plan ".to_string());
    new.active = false;
    let created = engine.new_subscription(new, alice.id).await.unwrap();

    assert_eq!(created.name, "Netflix");
    assert_eq!(created.description.as_deref(), Some("family plan"));
    assert_eq!(created.amount.cents(), 999);
    assert_eq!(created.user_id, alice.id);
    assert!(created.active, "new subscriptions start active");

    let fetched = engine.subscription(created.id, alice.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.next_billing_date, date(5));
    assert_eq!(fetched.payment_method_id, refs.card);
}

#[tokio::test]
async fn references_must_be_visible_to_the_user() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let bob = common::register(&engine, "Bob").await;
    let refs = refs(&engine, &alice).await;

    let bobs_card = engine
        .new_payment_method("Amex", PaymentMethodType::CreditCard, None, bob.id)
        .await
        .unwrap();
    let mut borrowed = input(&refs, "Spotify", 1);
    borrowed.payment_method_id = bobs_card.id;
    assert_eq!(
        engine.new_subscription(borrowed, alice.id).await.unwrap_err(),
        EngineError::NotFound("payment method".to_string())
    );

    let bobs_category = engine.new_category("Secret", bob.id).await.unwrap();
    let mut borrowed = input(&refs, "Spotify", 1);
    borrowed.category_id = bobs_category.id;
    assert_eq!(
        engine.new_subscription(borrowed, alice.id).await.unwrap_err(),
        EngineError::NotFound("category".to_string())
    );

    let mut unknown = input(&refs, "Spotify", 1);
    unknown.currency_id = 999;
    assert_eq!(
        engine.new_subscription(unknown, alice.id).await.unwrap_err(),
        EngineError::NotFound("currency".to_string())
    );

    let mut unknown = input(&refs, "Spotify", 1);
    unknown.billing_cycle_id = Ulid::new();
    assert_eq!(
        engine.new_subscription(unknown, alice.id).await.unwrap_err(),
        EngineError::NotFound("billing cycle".to_string())
    );

    assert!(
        engine
            .subscriptions(SubscriptionFilter::All, alice.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn deleted_references_cannot_be_used() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let refs = refs(&engine, &alice).await;

    let gone = engine.new_category("Old", alice.id).await.unwrap();
    engine.delete_category(gone.id, alice.id).await.unwrap();

    let mut new = input(&refs, "Netflix", 5);
    new.category_id = gone.id;
    assert!(matches!(
        engine.new_subscription(new, alice.id).await.unwrap_err(),
        EngineError::NotFound(_)
    ));
}

#[tokio::test]
async fn negative_reminder_days_are_rejected() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let refs = refs(&engine, &alice).await;

    let mut new = input(&refs, "Netflix", 5);
    new.reminder_days = -1;
    let err = engine.new_subscription(new, alice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation { field, .. } if field == "reminderDays"));
}

#[tokio::test]
async fn listing_is_ordered_and_filterable() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let bob = common::register(&engine, "Bob").await;
    let refs = refs(&engine, &alice).await;
    let bob_refs = self::refs(&engine, &bob).await;

    let late = engine
        .new_subscription(input(&refs, "Netflix", 20), alice.id)
        .await
        .unwrap();
    let mut music = input(&refs, "Spotify", 10);
    music.category_id = refs.music;
    let music = engine.new_subscription(music, alice.id).await.unwrap();
    let mut yearly = input(&refs, "Prime", 15);
    yearly.billing_cycle_id = refs.yearly;
    let yearly = engine.new_subscription(yearly, alice.id).await.unwrap();
    engine
        .new_subscription(input(&bob_refs, "Hulu", 1), bob.id)
        .await
        .unwrap();

    let ids = |subs: Vec<engine::Subscription>| subs.into_iter().map(|s| s.id).collect::<Vec<_>>();

    let all = engine
        .subscriptions(SubscriptionFilter::All, alice.id)
        .await
        .unwrap();
    assert_eq!(ids(all), [music.id, yearly.id, late.id]);

    let streaming = engine
        .subscriptions(SubscriptionFilter::Category(refs.streaming), alice.id)
        .await
        .unwrap();
    assert_eq!(ids(streaming), [yearly.id, late.id]);

    let by_cycle = engine
        .subscriptions(SubscriptionFilter::BillingCycle(refs.yearly), alice.id)
        .await
        .unwrap();
    assert_eq!(ids(by_cycle), [yearly.id]);

    let by_method = engine
        .subscriptions(SubscriptionFilter::PaymentMethod(refs.card), alice.id)
        .await
        .unwrap();
    assert_eq!(by_method.len(), 3);

    let foreign = engine
        .subscriptions(SubscriptionFilter::PaymentMethod(bob_refs.card), alice.id)
        .await
        .unwrap();
    assert!(foreign.is_empty());
}

#[tokio::test]
async fn update_replaces_every_field() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let refs = refs(&engine, &alice).await;
    let created = engine
        .new_subscription(input(&refs, "Netflix", 5), alice.id)
        .await
        .unwrap();

    let replacement = SubscriptionInput {
        name: "Netflix Premium".to_string(),
        description: Some("4K".to_string()),
        amount: Amount::from_cents(1999).unwrap(),
        category_id: refs.music,
        billing_cycle_id: refs.yearly,
        next_billing_date: date(28),
        reminder_days: 0,
        active: false,
        ..input(&refs, "unused", 1)
    };
    let updated = engine
        .update_subscription(created.id, replacement, alice.id)
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Netflix Premium");
    assert_eq!(updated.description.as_deref(), Some("4K"));
    assert_eq!(updated.amount.cents(), 1999);
    assert_eq!(updated.category_id, refs.music);
    assert_eq!(updated.billing_cycle_id, refs.yearly);
    assert_eq!(updated.next_billing_date, date(28));
    assert_eq!(updated.reminder_days, 0);
    assert!(!updated.active);

    let mut cleared = input(&refs, "Netflix", 5);
    cleared.description = Some("   ".to_string());
    let cleared = engine
        .update_subscription(created.id, cleared, alice.id)
        .await
        .unwrap();
    assert_eq!(cleared.description, None);
    assert!(cleared.active);
}

#[tokio::test]
async fn other_users_subscriptions_are_invisible() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let bob = common::register(&engine, "Bob").await;
    let refs = refs(&engine, &alice).await;
    let created = engine
        .new_subscription(input(&refs, "Netflix", 5), alice.id)
        .await
        .unwrap();

    let not_found = EngineError::NotFound("subscription".to_string());
    assert_eq!(
        engine.subscription(created.id, bob.id).await.unwrap_err(),
        not_found
    );
    assert_eq!(
        engine
            .update_subscription(created.id, input(&refs, "Mine", 1), bob.id)
            .await
            .unwrap_err(),
        not_found
    );
    assert_eq!(
        engine
            .delete_subscription(created.id, bob.id)
            .await
            .unwrap_err(),
        not_found
    );
    assert_eq!(
        engine.subscription(created.id, alice.id).await.unwrap().name,
        "Netflix"
    );
}

#[tokio::test]
async fn deleting_twice_reports_not_found() {
    let engine = common::engine().await;
    let alice = common::register(&engine, "Alice").await;
    let refs = refs(&engine, &alice).await;
    let created = engine
        .new_subscription(input(&refs, "Netflix", 5), alice.id)
        .await
        .unwrap();

    engine.delete_subscription(created.id, alice.id).await.unwrap();
    assert_eq!(
        engine
            .delete_subscription(created.id, alice.id)
            .await
            .unwrap_err(),
        EngineError::NotFound("subscription".to_string())
    );
    assert!(
        engine
            .subscriptions(SubscriptionFilter::All, alice.id)
            .await
            .unwrap()
            .is_empty()
    );
}
