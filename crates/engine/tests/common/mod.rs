#![allow(dead_code)]

use chrono::Duration;
use sea_orm::Database;

use engine::{Engine, PasswordHasher, TokenConfig, User};
use migration::MigratorTrait;

pub async fn engine_with_ttl(ttl: Duration) -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder()
        .database(db)
        .token_config(TokenConfig::new("test-secret", ttl))
        .password_hasher(PasswordHasher::new(1024, 1).unwrap())
        .build()
        .await
        .unwrap()
}

pub async fn engine() -> Engine {
    engine_with_ttl(Duration::hours(1)).await
}

pub async fn register(engine: &Engine, name: &str) -> User {
    engine
        .register(name, &format!("{}@example.com", name.to_lowercase()), "password")
        .await
        .unwrap()
        .user
}
