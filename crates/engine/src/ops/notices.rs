use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Notice, NotificationKind, ResultEngine, groups, notices, users,
    util::normalize_required,
};

use super::{Engine, LatestNotice, with_tx};

impl Engine {
    /// Post a notice and notify every member.
    pub async fn add_notice(
        &self,
        group_id: Uuid,
        user_id: &str,
        title: &str,
        content: &str,
    ) -> ResultEngine<Uuid> {
        let title = normalize_required(title, "title")?;
        let content = normalize_required(content, "content")?;

        with_tx!(self, |db_tx| {
            let group = self.require_member(&db_tx, group_id, user_id).await?;

            let notice_id = Uuid::new_v4();
            notices::ActiveModel {
                id: ActiveValue::Set(notice_id.to_string()),
                group_id: ActiveValue::Set(group.id.clone()),
                title: ActiveValue::Set(title.clone()),
                content: ActiveValue::Set(content),
                author: ActiveValue::Set(user_id.to_string()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            let message = format!("새 공지: {title}");
            self.notify_group(&db_tx, &group, NotificationKind::Announcement, &message)
                .await?;

            Ok(notice_id)
        })
    }

    /// Edit a notice. Author or group owner only.
    pub async fn update_notice(
        &self,
        group_id: Uuid,
        notice_id: Uuid,
        user_id: &str,
        title: &str,
        content: &str,
    ) -> ResultEngine<Notice> {
        let title = normalize_required(title, "title")?;
        let content = normalize_required(content, "content")?;

        with_tx!(self, |db_tx| {
            let group = self.require_member(&db_tx, group_id, user_id).await?;
            let model = notices::Entity::find_by_id(notice_id.to_string())
                .filter(notices::Column::GroupId.eq(group.id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("notice not exists".to_string()))?;
            self.require_author_or_owner(&group, &model.author, user_id)?;

            let mut active: notices::ActiveModel = model.into();
            active.title = ActiveValue::Set(title);
            active.content = ActiveValue::Set(content);
            let model = active.update(&db_tx).await?;

            self.notice_with_author(&db_tx, model).await
        })
    }

    /// Delete several notices at once, all or nothing.
    pub async fn delete_notices(
        &self,
        group_id: Uuid,
        user_id: &str,
        ids: &[Uuid],
    ) -> ResultEngine<u64> {
        let ids: Vec<String> = ids
            .iter()
            .map(ToString::to_string)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Err(EngineError::InvalidInput("no notice selected".to_string()));
        }

        with_tx!(self, |db_tx| {
            let group = self.require_member(&db_tx, group_id, user_id).await?;
            let models = notices::Entity::find()
                .filter(notices::Column::GroupId.eq(group.id.clone()))
                .filter(notices::Column::Id.is_in(ids.clone()))
                .all(&db_tx)
                .await?;
            if models.len() != ids.len() {
                return Err(EngineError::KeyNotFound("notice not exists".to_string()));
            }
            for model in &models {
                self.require_author_or_owner(&group, &model.author, user_id)?;
            }

            let result = notices::Entity::delete_many()
                .filter(notices::Column::GroupId.eq(group.id.clone()))
                .filter(notices::Column::Id.is_in(ids))
                .exec(&db_tx)
                .await?;
            Ok(result.rows_affected)
        })
    }

    /// Notices of a group, newest first.
    pub async fn notices(
        &self,
        group_id: Uuid,
        user_id: &str,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<Notice>> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, group_id, user_id).await?;
            let mut query = notices::Entity::find()
                .filter(notices::Column::GroupId.eq(group_id.to_string()))
                .order_by_desc(notices::Column::CreatedAt)
                .order_by_desc(notices::Column::Id);
            if let Some(limit) = limit {
                query = query.limit(limit);
            }

            let mut out = Vec::new();
            for model in query.all(&db_tx).await? {
                out.push(self.notice_with_author(&db_tx, model).await?);
            }
            Ok(out)
        })
    }

    /// Newest notice of every group the user belongs to, newest first.
    pub async fn latest_notices(&self, user_id: &str) -> ResultEngine<Vec<LatestNotice>> {
        with_tx!(self, |db_tx| {
            let ids = self.member_group_ids(&db_tx, user_id).await?;
            let groups = groups::Entity::find()
                .filter(groups::Column::Id.is_in(ids))
                .all(&db_tx)
                .await?;

            let mut out = Vec::new();
            for group in groups {
                let newest = notices::Entity::find()
                    .filter(notices::Column::GroupId.eq(group.id.clone()))
                    .order_by_desc(notices::Column::CreatedAt)
                    .order_by_desc(notices::Column::Id)
                    .one(&db_tx)
                    .await?;
                if let Some(model) = newest {
                    out.push(LatestNotice {
                        group_name: group.name,
                        notice: self.notice_with_author(&db_tx, model).await?,
                    });
                }
            }
            out.sort_by(|a, b| b.notice.created_at.cmp(&a.notice.created_at));
            Ok(out)
        })
    }

    async fn notice_with_author(
        &self,
        db: &DatabaseTransaction,
        model: notices::Model,
    ) -> ResultEngine<Notice> {
        let nickname = users::Entity::find_by_id(model.author.clone())
            .one(db)
            .await?
            .map(|user| user.nickname);
        Notice::from_model(model, nickname)
    }
}
