use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    EngineError, NotificationKind, Participant, ResultEngine, groups,
    participants::{self, sort_participants},
    util::normalize_required,
    wallets,
};

use super::{Engine, JoinPreview, with_tx};

impl Engine {
    /// Participants of a group, owner first.
    pub async fn participants(
        &self,
        group_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<Participant>> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, group_id, user_id).await?;
            self.load_participants(&db_tx, group_id).await
        })
    }

    async fn load_participants(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
    ) -> ResultEngine<Vec<Participant>> {
        let mut list = participants::Entity::find()
            .filter(participants::Column::GroupId.eq(group_id.to_string()))
            .all(db)
            .await?
            .into_iter()
            .map(Participant::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        sort_participants(&mut list);
        Ok(list)
    }

    /// Add an unclaimed slot to a group. Owner only.
    pub async fn invite_participant(
        &self,
        group_id: Uuid,
        user_id: &str,
        nickname: &str,
    ) -> ResultEngine<Uuid> {
        let nickname = normalize_required(nickname, "participant nickname")?;
        with_tx!(self, |db_tx| {
            self.require_owner(&db_tx, group_id, user_id).await?;

            let exists = participants::Entity::find()
                .filter(participants::Column::GroupId.eq(group_id.to_string()))
                .filter(participants::Column::Nickname.eq(nickname.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(nickname));
            }

            let participant_id = Uuid::new_v4();
            participants::ActiveModel {
                id: ActiveValue::Set(participant_id.to_string()),
                group_id: ActiveValue::Set(group_id.to_string()),
                nickname: ActiveValue::Set(nickname),
                user_id: ActiveValue::Set(None),
                is_owner: ActiveValue::Set(false),
            }
            .insert(&db_tx)
            .await?;

            groups::Entity::update_many()
                .col_expr(
                    groups::Column::ParticipantCount,
                    Expr::col(groups::Column::ParticipantCount).add(1),
                )
                .filter(groups::Column::Id.eq(group_id.to_string()))
                .exec(&db_tx)
                .await?;

            Ok(participant_id)
        })
    }

    /// Claim an unlinked slot of a group through its invite link.
    pub async fn join_group(
        &self,
        group_id: Uuid,
        user_id: &str,
        participant_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let user = self.require_user(&db_tx, user_id).await?;
            let group = self.require_group(&db_tx, group_id).await?;

            let slot = participants::Entity::find_by_id(participant_id.to_string())
                .filter(participants::Column::GroupId.eq(group_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("participant not exists".to_string()))?;
            if slot.user_id.is_some() {
                return Err(EngineError::ExistingKey(format!(
                    "participant {} already linked",
                    slot.nickname
                )));
            }
            let already_member = group.creator_id == user_id
                || self.member_slot(&db_tx, group_id, user_id).await?.is_some();
            if already_member {
                return Err(EngineError::ExistingKey(format!("{user_id} already joined")));
            }

            let nickname = slot.nickname.clone();
            participants::ActiveModel {
                id: ActiveValue::Set(slot.id),
                user_id: ActiveValue::Set(Some(user.username.clone())),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            wallets::ActiveModel {
                group_id: ActiveValue::Set(group_id.to_string()),
                user_id: ActiveValue::Set(user.username.clone()),
                balance: ActiveValue::Set(0),
                paid: ActiveValue::Set(false),
                updated_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            let message = format!("{}님이 {nickname}(으)로 모임에 참여했습니다", user.nickname);
            self.notify_group(&db_tx, &group, NotificationKind::Join, &message)
                .await?;

            tracing::info!(%group_id, user_id, "participant joined");
            Ok(())
        })
    }

    /// Data for the invite page. Any signed-in user may read it.
    pub async fn join_preview(&self, group_id: Uuid) -> ResultEngine<JoinPreview> {
        with_tx!(self, |db_tx| {
            let group = self.require_group(&db_tx, group_id).await?;
            let participants = self.load_participants(&db_tx, group_id).await?;
            Ok(JoinPreview {
                group_id,
                name: group.name,
                description: group.description,
                start_date: group.start_date,
                end_date: group.end_date,
                due_date: group.due_date,
                total_budget: group.total_budget,
                participants,
            })
        })
    }
}
