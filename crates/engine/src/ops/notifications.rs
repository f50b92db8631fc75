use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{EngineError, Notification, NotificationKind, ResultEngine, groups, notifications};

use super::{Engine, with_tx};

impl Engine {
    /// Write one notification per linked member of the group.
    ///
    /// Runs inside the caller's transaction so the notification exists iff
    /// the event it reports was committed.
    pub(super) async fn notify_group(
        &self,
        db: &DatabaseTransaction,
        group: &groups::Model,
        kind: NotificationKind,
        message: &str,
    ) -> ResultEngine<()> {
        let now = Utc::now();
        for user_id in self.member_ids(db, &group.id).await? {
            notifications::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                user_id: ActiveValue::Set(user_id),
                kind: ActiveValue::Set(kind.as_str().to_string()),
                group_id: ActiveValue::Set(group.id.clone()),
                group_name: ActiveValue::Set(group.name.clone()),
                message: ActiveValue::Set(message.to_string()),
                read: ActiveValue::Set(false),
                created_at: ActiveValue::Set(now),
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    /// Notifications of a user, newest first.
    pub async fn notifications(&self, user_id: &str) -> ResultEngine<Vec<Notification>> {
        with_tx!(self, |db_tx| {
            let models = notifications::Entity::find()
                .filter(notifications::Column::UserId.eq(user_id.to_string()))
                .order_by_desc(notifications::Column::CreatedAt)
                .order_by_desc(notifications::Column::Id)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Notification::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn unread_count(&self, user_id: &str) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            let count = notifications::Entity::find()
                .filter(notifications::Column::UserId.eq(user_id.to_string()))
                .filter(notifications::Column::Read.eq(false))
                .count(&db_tx)
                .await?;
            Ok(count)
        })
    }

    /// Mark one notification as read. Only its recipient can.
    pub async fn mark_read(&self, user_id: &str, notification_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = notifications::Entity::update_many()
                .set(notifications::ActiveModel {
                    read: ActiveValue::Set(true),
                    ..Default::default()
                })
                .filter(notifications::Column::Id.eq(notification_id.to_string()))
                .filter(notifications::Column::UserId.eq(user_id.to_string()))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(
                    "notification not exists".to_string(),
                ));
            }
            Ok(())
        })
    }

    /// Returns how many notifications changed state.
    pub async fn mark_all_read(&self, user_id: &str) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            let result = notifications::Entity::update_many()
                .set(notifications::ActiveModel {
                    read: ActiveValue::Set(true),
                    ..Default::default()
                })
                .filter(notifications::Column::UserId.eq(user_id.to_string()))
                .filter(notifications::Column::Read.eq(false))
                .exec(&db_tx)
                .await?;
            Ok(result.rows_affected)
        })
    }
}
