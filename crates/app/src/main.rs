use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "moim={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let server = settings.server;
    tracing::info!("Found server settings...");
    let db = parse_database(&server.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    let config = server::ServerConfig {
        bind: server.bind.unwrap_or_else(|| "127.0.0.1".to_string()),
        port: server.port,
        pin_session_ttl: Duration::from_secs(server.pin_session_ttl_secs),
        pin_lockout: Duration::from_secs(server.pin_lockout_secs),
    };
    server::run(engine, config).await;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}
