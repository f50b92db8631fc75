mod common;

use engine::{Account, AccountCmd, EngineError, RegisterUserCmd};

use common::{engine_with_db, register, register_with_account, trip_with_members};

#[tokio::test]
async fn register_then_authenticate() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", " 앨리스 ").await;

    let user = engine.authenticate("alice", "password").await.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.nickname, "앨리스");
    assert!(user.account.is_none());
    assert!(!user.has_pin);

    let err = engine.authenticate("alice", "wrong-password").await.unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));
    let err = engine.authenticate("nobody", "password").await.unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));
}

#[tokio::test]
async fn register_rejects_duplicates_and_short_passwords() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", "앨리스").await;

    let err = engine
        .register_user(RegisterUserCmd::new("alice", "password", "other", "a@b.c"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice".to_string()));

    let err = engine
        .register_user(RegisterUserCmd::new("bob", "12345", "밥", "b@b.c"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .register_user(RegisterUserCmd::new("bob", "123456", "  ", "b@b.c"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput("nickname must not be empty".to_string())
    );
}

#[tokio::test]
async fn change_password_checks_current() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", "앨리스").await;

    let err = engine
        .change_password("alice", "not-it", "new-password")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));

    engine
        .change_password("alice", "password", "new-password")
        .await
        .unwrap();
    assert!(engine.authenticate("alice", "password").await.is_err());
    assert!(engine.authenticate("alice", "new-password").await.is_ok());
}

#[tokio::test]
async fn nickname_and_account() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", "앨리스").await;

    engine.change_nickname("alice", "앨리").await.unwrap();
    assert_eq!(engine.user("alice").await.unwrap().nickname, "앨리");

    let err = engine
        .set_account("alice", AccountCmd::new("KB", "1-2-3", -1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert_eq!(engine.account("alice").await.unwrap(), None);

    engine
        .set_account("alice", AccountCmd::new("KB", "1-2-3", 50_000))
        .await
        .unwrap();
    assert_eq!(
        engine.account("alice").await.unwrap(),
        Some(Account {
            bank: "KB".to_string(),
            number: "1-2-3".to_string(),
            balance: 50_000,
        })
    );
}

#[tokio::test]
async fn pin_register_and_verify() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", "앨리스").await;

    assert!(!engine.has_pin("alice").await.unwrap());
    let err = engine.verify_pin("alice", "123456").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine.register_pin("alice", "12ab56").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    engine.register_pin("alice", "123456").await.unwrap();
    assert!(engine.has_pin("alice").await.unwrap());
    assert!(engine.verify_pin("alice", "123456").await.unwrap());
    assert!(!engine.verify_pin("alice", "654321").await.unwrap());
    assert!(engine.user("alice").await.unwrap().has_pin);
}

#[tokio::test]
async fn withdraw_unlinks_slots_and_keeps_groups() {
    let (engine, _db) = engine_with_db().await;
    register_with_account(&engine, "alice", "앨리스", 0).await;
    register(&engine, "bob", "밥").await;
    let group_id = trip_with_members(&engine, "alice", &["bob"]).await;
    assert!(!engine.notifications("bob").await.unwrap().is_empty());

    engine.withdraw_user("bob").await.unwrap();

    let err = engine.user("bob").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert!(engine.notifications("bob").await.unwrap().is_empty());

    let participants = engine.participants(group_id, "alice").await.unwrap();
    assert_eq!(participants.len(), 2);
    let slot = participants.iter().find(|p| p.nickname == "bob").unwrap();
    assert!(!slot.is_linked());
    assert_eq!(engine.group(group_id, "alice").await.unwrap().participant_count, 2);

    engine.withdraw_user("alice").await.unwrap();
    let err = engine.withdraw_user("alice").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn withdrawn_username_cannot_be_reclaimed() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", "앨리스").await;
    register(&engine, "bob", "밥").await;
    let group_id = trip_with_members(&engine, "alice", &["bob"]).await;
    engine
        .add_notice(group_id, "alice", "공지", "내일 출발")
        .await
        .unwrap();

    engine.withdraw_user("alice").await.unwrap();

    let err = engine
        .register_user(RegisterUserCmd::new("alice", "password", "새 앨리스", "x@y.z"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice".to_string()));
    let err = engine.authenticate("alice", "password").await.unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));

    // The orphaned group stays closed to outsiders.
    register(&engine, "mallory", "말로리").await;
    let err = engine.group(group_id, "mallory").await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("group not exists".to_string()));
    let err = engine.delete_group(group_id, "mallory").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    // Remaining members still see it; nobody can act as its owner.
    let group = engine.group(group_id, "bob").await.unwrap();
    assert_eq!(group.creator_id, "alice");
    let err = engine.delete_group(group_id, "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}
