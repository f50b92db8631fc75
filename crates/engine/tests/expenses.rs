mod common;

use engine::{AccountCmd, AddExpenseCmd, DepositCmd, EngineError, UpdateExpenseCmd, Won, YearMonth};

use common::{date, engine_with_db, register, register_with_account, trip_with_members};

#[tokio::test]
async fn expenses_move_group_balance() {
    let (engine, _db) = engine_with_db().await;
    register_with_account(&engine, "alice", "앨리스", 100_000).await;
    register(&engine, "bob", "bob").await;
    let group_id = trip_with_members(&engine, "alice", &["bob"]).await;
    engine
        .deposit(DepositCmd::new(group_id, "alice", 50_000))
        .await
        .unwrap();

    let lunch = engine
        .add_expense(
            AddExpenseCmd::new(group_id, "bob", date(2026, 5, 10), 32_000, " 식비 ")
                .memo("흑돼지"),
        )
        .await
        .unwrap();
    assert_eq!(engine.group(group_id, "alice").await.unwrap().balance, 18_000);

    // Overspending is recorded and the balance goes negative.
    engine
        .add_expense(AddExpenseCmd::new(
            group_id,
            "alice",
            date(2026, 5, 10),
            40_000,
            "숙박비",
        ))
        .await
        .unwrap();
    assert_eq!(engine.group(group_id, "alice").await.unwrap().balance, -22_000);

    let updated = engine
        .update_expense(
            group_id,
            lunch,
            "bob",
            UpdateExpenseCmd::new().amount(30_000).memo(""),
        )
        .await
        .unwrap();
    assert_eq!(updated.amount, 30_000);
    assert_eq!(updated.category, "식비");
    assert_eq!(updated.memo, None);
    assert_eq!(engine.group(group_id, "alice").await.unwrap().balance, -20_000);

    let list = engine.expenses(group_id, "bob", None).await.unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().any(|e| e.category == "숙박비" && e.author == "alice"));
    assert_eq!(engine.expenses(group_id, "bob", Some(1)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn expense_validation() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", "앨리스").await;
    register(&engine, "mallory", "말로리").await;
    let group_id = trip_with_members(&engine, "alice", &[]).await;

    let err = engine
        .add_expense(AddExpenseCmd::new(group_id, "alice", date(2026, 5, 10), 0, "식비"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .add_expense(AddExpenseCmd::new(group_id, "alice", date(2026, 5, 10), 1_000, "  "))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput("category must not be empty".to_string())
    );

    let err = engine
        .add_expense(AddExpenseCmd::new(
            group_id,
            "mallory",
            date(2026, 5, 10),
            1_000,
            "식비",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn amounts_above_the_cap_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", "앨리스").await;
    let group_id = trip_with_members(&engine, "alice", &[]).await;
    let too_much = Won::MAX.amount() + 1;

    for amount in [too_much, i64::MAX] {
        let err = engine
            .add_expense(AddExpenseCmd::new(group_id, "alice", date(2026, 5, 10), amount, "식비"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
    assert_eq!(engine.group(group_id, "alice").await.unwrap().balance, 0);
    assert!(engine.expenses(group_id, "alice", None).await.unwrap().is_empty());

    let err = engine
        .set_account("alice", AccountCmd::new("KB", "123", too_much))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert!(engine.account("alice").await.unwrap().is_none());

    let err = engine
        .deposit(DepositCmd::new(group_id, "alice", i64::MAX))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    // The largest accepted expense still leaves statistics computable.
    engine
        .add_expense(AddExpenseCmd::new(
            group_id,
            "alice",
            date(2026, 5, 10),
            Won::MAX.amount(),
            "식비",
        ))
        .await
        .unwrap();
    let may: YearMonth = "2026-05".parse().unwrap();
    let summary = engine.monthly_summary(group_id, "alice", may).await.unwrap();
    assert_eq!(summary.total, Won::MAX.amount());
    assert_eq!(summary.remaining, -Won::MAX.amount());
}

#[tokio::test]
async fn bulk_delete_is_all_or_nothing() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", "앨리스").await;
    register(&engine, "bob", "bob").await;
    register(&engine, "carol", "carol").await;
    let group_id = trip_with_members(&engine, "alice", &["bob", "carol"]).await;

    let by_bob = engine
        .add_expense(AddExpenseCmd::new(group_id, "bob", date(2026, 5, 10), 10_000, "식비"))
        .await
        .unwrap();
    let by_carol = engine
        .add_expense(AddExpenseCmd::new(group_id, "carol", date(2026, 5, 11), 5_000, "관광"))
        .await
        .unwrap();
    assert_eq!(engine.group(group_id, "alice").await.unwrap().balance, -15_000);

    // Bob may not delete Carol's expense, so nothing is deleted.
    let err = engine
        .delete_expenses(group_id, "bob", &[by_bob, by_carol])
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert_eq!(engine.expenses(group_id, "bob", None).await.unwrap().len(), 2);

    let err = engine
        .delete_expenses(group_id, "alice", &[by_bob, uuid::Uuid::new_v4()])
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    // The owner may delete anything.
    let restored = engine
        .delete_expenses(group_id, "alice", &[by_bob, by_carol])
        .await
        .unwrap();
    assert_eq!(restored, 15_000);
    assert_eq!(engine.group(group_id, "alice").await.unwrap().balance, 0);
    assert!(engine.expenses(group_id, "bob", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn statistics_over_expenses() {
    let (engine, _db) = engine_with_db().await;
    register_with_account(&engine, "alice", "앨리스", 200_000).await;
    let group_id = trip_with_members(&engine, "alice", &[]).await;
    engine
        .deposit(DepositCmd::new(group_id, "alice", 100_000))
        .await
        .unwrap();

    for (day, amount, category) in [
        (date(2026, 5, 10), 12_000, "식비"),
        (date(2026, 5, 10), 30_000, "교통비"),
        (date(2026, 5, 11), 8_000, "식비"),
        (date(2026, 6, 1), 4_000, "기타"),
    ] {
        engine
            .add_expense(AddExpenseCmd::new(group_id, "alice", day, amount, category))
            .await
            .unwrap();
    }

    let may: YearMonth = "2026-05".parse().unwrap();
    let summary = engine.monthly_summary(group_id, "alice", may).await.unwrap();
    assert_eq!(summary.total, 50_000);
    assert_eq!(summary.remaining, 46_000);
    assert_eq!(summary.top.unwrap().category, "교통비");
    assert_eq!(summary.bottom.unwrap().category, "식비");

    let days = engine.daily_totals(group_id, "alice", may).await.unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].total, 42_000);

    let trend = engine.monthly_trend(group_id, "alice").await.unwrap();
    let points: Vec<(String, i64)> = trend
        .iter()
        .map(|t| (t.month.to_string(), t.total))
        .collect();
    assert_eq!(
        points,
        vec![("2026-05".to_string(), 50_000), ("2026-06".to_string(), 4_000)]
    );
}
