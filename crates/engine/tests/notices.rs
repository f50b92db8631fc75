mod common;

use engine::{EngineError, NotificationKind};

use common::{engine_with_db, register, trip_with_members};

#[tokio::test]
async fn notices_carry_author_nickname() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", "앨리스").await;
    register(&engine, "bob", "bob").await;
    let group_id = trip_with_members(&engine, "alice", &["bob"]).await;

    let notice_id = engine
        .add_notice(group_id, "bob", "집합 장소", "공항 3번 게이트")
        .await
        .unwrap();
    let notices = engine.notices(group_id, "alice", None).await.unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].id, notice_id);
    assert_eq!(notices[0].author_nickname, "bob");

    engine.withdraw_user("bob").await.unwrap();
    let notices = engine.notices(group_id, "alice", Some(10)).await.unwrap();
    assert_eq!(notices[0].author_nickname, "탈퇴한 사용자");

    // The owner may still edit a withdrawn member's notice.
    let notice = engine
        .update_notice(group_id, notice_id, "alice", "집합 장소", "공항 1번 게이트")
        .await
        .unwrap();
    assert_eq!(notice.content, "공항 1번 게이트");
}

#[tokio::test]
async fn notice_permissions_and_bulk_delete() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", "앨리스").await;
    register(&engine, "bob", "bob").await;
    register(&engine, "carol", "carol").await;
    let group_id = trip_with_members(&engine, "alice", &["bob", "carol"]).await;

    let err = engine
        .add_notice(group_id, "bob", " ", "내용")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let by_bob = engine
        .add_notice(group_id, "bob", "렌터카", "예약 완료")
        .await
        .unwrap();
    let by_carol = engine
        .add_notice(group_id, "carol", "숙소", "체크인 3시")
        .await
        .unwrap();

    let err = engine
        .update_notice(group_id, by_carol, "bob", "숙소", "체크인 4시")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .delete_notices(group_id, "bob", &[by_bob, by_carol])
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert_eq!(engine.notices(group_id, "bob", None).await.unwrap().len(), 2);

    assert_eq!(
        engine.delete_notices(group_id, "bob", &[by_bob]).await.unwrap(),
        1
    );
    let remaining = engine.notices(group_id, "bob", None).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, by_carol);

    let latest = engine.latest_notices("bob").await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].group_name, "제주 여행");
    assert_eq!(latest[0].notice.title, "숙소");
}

#[tokio::test]
async fn notification_read_state() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", "앨리스").await;
    register(&engine, "bob", "bob").await;
    let group_id = trip_with_members(&engine, "alice", &["bob"]).await;
    engine
        .add_notice(group_id, "alice", "공지", "내일 출발")
        .await
        .unwrap();

    let notifications = engine.notifications("bob").await.unwrap();
    assert_eq!(notifications.len(), 2);
    assert!(
        notifications
            .iter()
            .any(|n| n.kind == NotificationKind::Announcement && n.message == "새 공지: 공지")
    );
    assert_eq!(engine.unread_count("bob").await.unwrap(), 2);

    let first = notifications[0].id;
    let err = engine.mark_read("alice", first).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    engine.mark_read("bob", first).await.unwrap();
    assert_eq!(engine.unread_count("bob").await.unwrap(), 1);
    assert_eq!(engine.mark_all_read("bob").await.unwrap(), 1);
    assert_eq!(engine.unread_count("bob").await.unwrap(), 0);
    assert_eq!(engine.unread_count("alice").await.unwrap(), 2);
}
