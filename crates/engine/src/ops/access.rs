use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, groups, participants, users};

/// Non-members get the same answer as for a missing group, so group ids
/// cannot be probed.
fn group_not_exists() -> EngineError {
    EngineError::KeyNotFound("group not exists".to_string())
}

impl super::Engine {
    pub(super) async fn require_group(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
    ) -> ResultEngine<groups::Model> {
        groups::Entity::find_by_id(group_id.to_string())
            .one(db)
            .await?
            .ok_or_else(group_not_exists)
    }

    /// The participant slot linked to `user_id`, if any.
    pub(super) async fn member_slot(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Option<participants::Model>> {
        participants::Entity::find()
            .filter(participants::Column::GroupId.eq(group_id.to_string()))
            .filter(participants::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Load a group the user belongs to, either as creator or through a
    /// linked participant slot.
    pub(super) async fn require_member(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<groups::Model> {
        let group = self.require_group(db, group_id).await?;
        if group.creator_id == user_id {
            return Ok(group);
        }
        if self.member_slot(db, group_id, user_id).await?.is_none() {
            return Err(group_not_exists());
        }
        Ok(group)
    }

    pub(super) async fn require_owner(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<groups::Model> {
        let group = self.require_member(db, group_id, user_id).await?;
        if group.creator_id != user_id {
            return Err(EngineError::Forbidden(
                "only the group owner can do this".to_string(),
            ));
        }
        Ok(group)
    }

    /// Authors may edit their own rows; the owner may edit any row.
    pub(super) fn require_author_or_owner(
        &self,
        group: &groups::Model,
        author: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        if author == user_id || group.creator_id == user_id {
            return Ok(());
        }
        Err(EngineError::Forbidden(
            "only the author or the group owner can do this".to_string(),
        ))
    }

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// Usernames linked to a participant slot of the group.
    pub(super) async fn member_ids(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
    ) -> ResultEngine<Vec<String>> {
        let slots = participants::Entity::find()
            .filter(participants::Column::GroupId.eq(group_id.to_string()))
            .filter(participants::Column::UserId.is_not_null())
            .all(db)
            .await?;
        Ok(slots.into_iter().filter_map(|p| p.user_id).collect())
    }

    /// Ids of every group the user belongs to.
    pub(super) async fn member_group_ids(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<Vec<String>> {
        let mut ids: Vec<String> = participants::Entity::find()
            .filter(participants::Column::UserId.eq(user_id.to_string()))
            .all(db)
            .await?
            .into_iter()
            .map(|p| p.group_id)
            .collect();
        let owned = groups::Entity::find()
            .filter(groups::Column::CreatorId.eq(user_id.to_string()))
            .all(db)
            .await?;
        for group in owned {
            if !ids.contains(&group.id) {
                ids.push(group.id);
            }
        }
        Ok(ids)
    }
}
