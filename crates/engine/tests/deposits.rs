mod common;

use engine::{DepositCmd, EngineError, NotificationKind};

use common::{
    date, engine_with_db, register, register_with_account, today, trip, trip_with_members,
};

#[tokio::test]
async fn deposit_moves_money_in_one_step() {
    let (engine, _db) = engine_with_db().await;
    register_with_account(&engine, "alice", "앨리스", 500_000).await;
    register_with_account(&engine, "bob", "bob", 100_000).await;
    let group_id = trip_with_members(&engine, "alice", &["bob"]).await;

    engine
        .deposit(DepositCmd::new(group_id, "bob", 60_000))
        .await
        .unwrap();
    engine
        .deposit(DepositCmd::new(group_id, "alice", 200_000))
        .await
        .unwrap();

    assert_eq!(engine.account("bob").await.unwrap().unwrap().balance, 40_000);
    assert_eq!(engine.account("alice").await.unwrap().unwrap().balance, 300_000);

    let wallet = engine.wallet(group_id, "bob").await.unwrap();
    assert_eq!(wallet.balance, 60_000);
    assert!(wallet.paid);

    let group = engine.group(group_id, "bob").await.unwrap();
    assert_eq!(group.balance, 260_000);

    let paid = engine.paid_participants(group_id, "alice").await.unwrap();
    assert_eq!(paid, vec!["alice".to_string(), "bob".to_string()]);

    let notifications = engine.notifications("alice").await.unwrap();
    let deposits: Vec<_> = notifications
        .iter()
        .filter(|n| n.kind == NotificationKind::Deposit)
        .collect();
    assert_eq!(deposits.len(), 2);
    assert!(deposits.iter().any(|n| n.message.contains("60,000원")));
    assert_eq!(engine.unread_count("alice").await.unwrap(), 3);
}

#[tokio::test]
async fn insufficient_funds_changes_nothing() {
    let (engine, _db) = engine_with_db().await;
    register_with_account(&engine, "alice", "앨리스", 10_000).await;
    let group_id = engine.create_group(trip("alice")).await.unwrap();

    let err = engine
        .deposit(DepositCmd::new(group_id, "alice", 10_001))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    assert_eq!(engine.account("alice").await.unwrap().unwrap().balance, 10_000);
    assert_eq!(engine.group(group_id, "alice").await.unwrap().balance, 0);
    let wallet = engine.wallet(group_id, "alice").await.unwrap();
    assert_eq!(wallet.balance, 0);
    assert!(!wallet.paid);
    assert!(engine.notifications("alice").await.unwrap().is_empty());

    // Exactly the balance is fine.
    engine
        .deposit(DepositCmd::new(group_id, "alice", 10_000))
        .await
        .unwrap();
    assert_eq!(engine.account("alice").await.unwrap().unwrap().balance, 0);
}

#[tokio::test]
async fn deposit_requires_account_membership_and_positive_amount() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", "앨리스").await;
    register_with_account(&engine, "mallory", "말로리", 100_000).await;
    let group_id = engine.create_group(trip("alice")).await.unwrap();

    let err = engine
        .deposit(DepositCmd::new(group_id, "alice", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .deposit(DepositCmd::new(group_id, "alice", 1_000))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("account not exists".to_string()));

    let err = engine
        .deposit(DepositCmd::new(group_id, "mallory", 1_000))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("group not exists".to_string()));
    assert_eq!(engine.account("mallory").await.unwrap().unwrap().balance, 100_000);
}

#[tokio::test]
async fn idempotent_retry_returns_first_deposit() {
    let (engine, _db) = engine_with_db().await;
    register_with_account(&engine, "alice", "앨리스", 100_000).await;
    let group_id = engine.create_group(trip("alice")).await.unwrap();

    let first = engine
        .deposit(DepositCmd::new(group_id, "alice", 30_000).idempotency_key("req-1"))
        .await
        .unwrap();
    let retry = engine
        .deposit(DepositCmd::new(group_id, "alice", 30_000).idempotency_key("req-1"))
        .await
        .unwrap();
    assert_eq!(first, retry);
    assert_eq!(engine.account("alice").await.unwrap().unwrap().balance, 70_000);
    assert_eq!(engine.group(group_id, "alice").await.unwrap().balance, 30_000);

    let other = engine
        .deposit(DepositCmd::new(group_id, "alice", 30_000).idempotency_key("req-2"))
        .await
        .unwrap();
    assert_ne!(first, other);
    assert_eq!(engine.wallet(group_id, "alice").await.unwrap().balance, 60_000);
}

#[tokio::test]
async fn concurrent_deposits_never_overdraw() {
    let (engine, _db) = engine_with_db().await;
    register_with_account(&engine, "alice", "앨리스", 50_000).await;
    let group_id = engine.create_group(trip("alice")).await.unwrap();
    let engine = std::sync::Arc::new(engine);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine
                .deposit(DepositCmd::new(group_id, "alice", 20_000))
                .await
        }));
    }
    let mut ok = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            ok += 1;
        }
    }

    assert_eq!(ok, 2);
    assert_eq!(engine.account("alice").await.unwrap().unwrap().balance, 10_000);
    assert_eq!(engine.group(group_id, "alice").await.unwrap().balance, 40_000);
}

#[tokio::test]
async fn concurrent_retries_with_one_key_deposit_once() {
    let (engine, _db) = engine_with_db().await;
    register_with_account(&engine, "alice", "앨리스", 100_000).await;
    let group_id = engine.create_group(trip("alice")).await.unwrap();
    let engine = std::sync::Arc::new(engine);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine
                .deposit(DepositCmd::new(group_id, "alice", 30_000).idempotency_key("pay-once"))
                .await
        }));
    }
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap());
    }

    assert!(ids.iter().all(|id| *id == ids[0]));
    assert_eq!(engine.account("alice").await.unwrap().unwrap().balance, 70_000);
    assert_eq!(engine.wallet(group_id, "alice").await.unwrap().balance, 30_000);
    assert_eq!(engine.group(group_id, "alice").await.unwrap().balance, 30_000);
}

#[tokio::test]
async fn reminders_cover_unpaid_groups_due_soon() {
    let (engine, _db) = engine_with_db().await;
    register_with_account(&engine, "alice", "앨리스", 1_000_000).await;
    register(&engine, "bob", "bob").await;

    // Due 2026-05-05: four days after `today`.
    let soon = trip_with_members(&engine, "alice", &["bob"]).await;

    let mut far = trip("alice");
    far.name = "가을 캠핑".to_string();
    far.start_date = date(2026, 9, 1);
    far.end_date = date(2026, 9, 3);
    far.due_date = date(2026, 8, 20);
    engine.create_group(far).await.unwrap();

    let reminders = engine.deposit_reminders("bob", today()).await.unwrap();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].group_id, soon);
    assert_eq!(reminders[0].days_left, 4);
    assert_eq!(reminders[0].fee_per_person, 450_000);

    // The window is five days inclusive.
    let edge = engine.deposit_reminders("bob", date(2026, 4, 30)).await.unwrap();
    assert_eq!(edge.len(), 1);
    assert_eq!(edge[0].days_left, 5);
    assert!(
        engine
            .deposit_reminders("bob", date(2026, 4, 29))
            .await
            .unwrap()
            .is_empty()
    );

    let reminders = engine.deposit_reminders("alice", today()).await.unwrap();
    assert_eq!(reminders.len(), 1);
    engine
        .deposit(DepositCmd::new(soon, "alice", 450_000))
        .await
        .unwrap();
    assert!(engine.deposit_reminders("alice", today()).await.unwrap().is_empty());

    // Past deadlines are not reminded.
    assert!(
        engine
            .deposit_reminders("bob", date(2026, 5, 6))
            .await
            .unwrap()
            .is_empty()
    );
}
