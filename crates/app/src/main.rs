use migration::{Migrator, MigratorTrait};
use sea_orm::ConnectionTrait;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // A missing `.env` is fine: the environment may already be populated.
    dotenv::dotenv().ok();
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "subtrack={level},server={level},engine={level},migration={level}",
            level = settings.log_level()
        ))
        .init();

    let db = connect_database(&settings.database_url()).await?;

    let engine = engine::Engine::builder()
        .database(db)
        .token_config(settings.token_config()?)
        .password_hasher(settings.password_hasher()?)
        .build()
        .await?;

    let listener = tokio::net::TcpListener::bind(settings.address()).await?;
    server::run_with_listener(engine, listener).await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn connect_database(
    url: &str,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let database = sea_orm::Database::connect(url).await?;
    tracing::info!(backend = ?database.get_database_backend(), "connected to database");

    Migrator::up(&database, None).await?;
    tracing::info!("migrations applied");
    Ok(database)
}
