#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use engine::{AccountCmd, CreateGroupCmd, Engine, RegisterUserCmd};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn today() -> NaiveDate {
    date(2026, 5, 1)
}

pub async fn register(engine: &Engine, username: &str, nickname: &str) {
    engine
        .register_user(RegisterUserCmd::new(
            username,
            "password",
            nickname,
            format!("{username}@example.com"),
        ))
        .await
        .unwrap();
}

pub async fn register_with_account(engine: &Engine, username: &str, nickname: &str, balance: i64) {
    register(engine, username, nickname).await;
    engine
        .set_account(username, AccountCmd::new("KB", "123-456-789", balance))
        .await
        .unwrap();
}

/// A trip from 2026-05-10 to 2026-05-12, deposits due 2026-05-05.
pub fn trip(creator: &str) -> CreateGroupCmd {
    CreateGroupCmd::new(
        "제주 여행",
        creator,
        date(2026, 5, 10),
        date(2026, 5, 12),
        date(2026, 5, 5),
        900_000,
        today(),
    )
    .description("3박 4일")
}

/// Creates a trip owned by `owner` and links `members` to slots named after
/// them.
pub async fn trip_with_members(engine: &Engine, owner: &str, members: &[&str]) -> Uuid {
    let group_id = engine
        .create_group(trip(owner).participants(members.iter().copied()))
        .await
        .unwrap();
    let preview = engine.join_preview(group_id).await.unwrap();
    for member in members {
        let slot = preview
            .participants
            .iter()
            .find(|p| p.nickname == *member)
            .unwrap();
        engine.join_group(group_id, member, slot.id).await.unwrap();
    }
    group_id
}
