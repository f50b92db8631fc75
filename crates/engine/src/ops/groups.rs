use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CreateGroupCmd, EngineError, Group, ResultEngine, UpdateGroupCmd, deposits, expenses,
    groups::{self, validate_schedule},
    notices, participants,
    util::{normalize_required, require_positive},
    wallets,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a group with the creator as owner and returns its id.
    ///
    /// Extra participants start as unlinked slots that users claim through
    /// the invite link.
    pub async fn create_group(&self, cmd: CreateGroupCmd) -> ResultEngine<Uuid> {
        if cmd.start_date < cmd.today {
            return Err(EngineError::InvalidGroup(
                "start date must be today or later".to_string(),
            ));
        }
        validate_schedule(cmd.start_date, cmd.end_date, cmd.due_date)?;
        let name = normalize_required(&cmd.name, "group name")?;
        let description = normalize_required(&cmd.description, "group description")?;
        require_positive(cmd.total_budget, "total budget")?;
        let extra = cmd
            .participants
            .iter()
            .map(|nickname| normalize_required(nickname, "participant nickname"))
            .collect::<ResultEngine<Vec<String>>>()?;

        with_tx!(self, |db_tx| {
            let creator = self.require_user(&db_tx, &cmd.creator).await?;

            let mut seen = HashSet::new();
            seen.insert(creator.nickname.clone());
            for nickname in &extra {
                if !seen.insert(nickname.clone()) {
                    return Err(EngineError::ExistingKey(nickname.clone()));
                }
            }

            let group_id = Uuid::new_v4();
            let now = Utc::now();
            let participant_count = i32::try_from(extra.len() + 1)
                .map_err(|_| EngineError::InvalidGroup("too many participants".to_string()))?;

            groups::ActiveModel {
                id: ActiveValue::Set(group_id.to_string()),
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(description),
                creator_id: ActiveValue::Set(creator.username.clone()),
                created_at: ActiveValue::Set(now),
                start_date: ActiveValue::Set(cmd.start_date),
                end_date: ActiveValue::Set(cmd.end_date),
                due_date: ActiveValue::Set(cmd.due_date),
                total_budget: ActiveValue::Set(cmd.total_budget),
                balance: ActiveValue::Set(0),
                participant_count: ActiveValue::Set(participant_count),
            }
            .insert(&db_tx)
            .await?;

            participants::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                group_id: ActiveValue::Set(group_id.to_string()),
                nickname: ActiveValue::Set(creator.nickname),
                user_id: ActiveValue::Set(Some(creator.username.clone())),
                is_owner: ActiveValue::Set(true),
            }
            .insert(&db_tx)
            .await?;

            for nickname in extra {
                participants::ActiveModel {
                    id: ActiveValue::Set(Uuid::new_v4().to_string()),
                    group_id: ActiveValue::Set(group_id.to_string()),
                    nickname: ActiveValue::Set(nickname),
                    user_id: ActiveValue::Set(None),
                    is_owner: ActiveValue::Set(false),
                }
                .insert(&db_tx)
                .await?;
            }

            wallets::ActiveModel {
                group_id: ActiveValue::Set(group_id.to_string()),
                user_id: ActiveValue::Set(creator.username),
                balance: ActiveValue::Set(0),
                paid: ActiveValue::Set(false),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;

            Ok(group_id)
        })
    }

    /// Return a group the user belongs to.
    pub async fn group(&self, group_id: Uuid, user_id: &str) -> ResultEngine<Group> {
        with_tx!(self, |db_tx| {
            let model = self.require_member(&db_tx, group_id, user_id).await?;
            Group::try_from(model)
        })
    }

    /// Groups created by the user, newest first.
    pub async fn my_groups(&self, user_id: &str) -> ResultEngine<Vec<Group>> {
        with_tx!(self, |db_tx| {
            let models = groups::Entity::find()
                .filter(groups::Column::CreatorId.eq(user_id.to_string()))
                .order_by_desc(groups::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Group::try_from).collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Groups the user joined through an invite, newest first.
    pub async fn joined_groups(&self, user_id: &str) -> ResultEngine<Vec<Group>> {
        with_tx!(self, |db_tx| {
            let ids: Vec<String> = participants::Entity::find()
                .filter(participants::Column::UserId.eq(user_id.to_string()))
                .filter(participants::Column::IsOwner.eq(false))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|p| p.group_id)
                .collect();
            let models = groups::Entity::find()
                .filter(groups::Column::Id.is_in(ids))
                .filter(groups::Column::CreatorId.ne(user_id.to_string()))
                .order_by_desc(groups::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Group::try_from).collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Every group the user belongs to, created or joined.
    pub async fn member_groups(&self, user_id: &str) -> ResultEngine<Vec<Group>> {
        with_tx!(self, |db_tx| {
            let ids = self.member_group_ids(&db_tx, user_id).await?;
            let models = groups::Entity::find()
                .filter(groups::Column::Id.is_in(ids))
                .order_by_desc(groups::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Group::try_from).collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Update name, description, schedule or budget. Owner only.
    pub async fn update_group(
        &self,
        group_id: Uuid,
        user_id: &str,
        cmd: UpdateGroupCmd,
    ) -> ResultEngine<Group> {
        let name = cmd
            .name
            .as_deref()
            .map(|name| normalize_required(name, "group name"))
            .transpose()?;
        let description = cmd
            .description
            .as_deref()
            .map(|description| normalize_required(description, "group description"))
            .transpose()?;
        if let Some(total_budget) = cmd.total_budget {
            require_positive(total_budget, "total budget")?;
        }

        with_tx!(self, |db_tx| {
            let model = self.require_owner(&db_tx, group_id, user_id).await?;

            let start_date = cmd.start_date.unwrap_or(model.start_date);
            let end_date = cmd.end_date.unwrap_or(model.end_date);
            let due_date = cmd.due_date.unwrap_or(model.due_date);
            validate_schedule(start_date, end_date, due_date)?;

            let mut active: groups::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(description) = description {
                active.description = ActiveValue::Set(description);
            }
            if let Some(total_budget) = cmd.total_budget {
                active.total_budget = ActiveValue::Set(total_budget);
            }
            active.start_date = ActiveValue::Set(start_date);
            active.end_date = ActiveValue::Set(end_date);
            active.due_date = ActiveValue::Set(due_date);
            let model = active.update(&db_tx).await?;

            Group::try_from(model)
        })
    }

    /// Delete a group with everything recorded in it. Owner only.
    ///
    /// Notifications about the group stay in each user's history. Deposited
    /// money is not refunded.
    pub async fn delete_group(&self, group_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_owner(&db_tx, group_id, user_id).await?;

            deposits::Entity::delete_many()
                .filter(deposits::Column::GroupId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_many()
                .filter(expenses::Column::GroupId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            notices::Entity::delete_many()
                .filter(notices::Column::GroupId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            wallets::Entity::delete_many()
                .filter(wallets::Column::GroupId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            participants::Entity::delete_many()
                .filter(participants::Column::GroupId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            groups::Entity::delete_by_id(model.id).exec(&db_tx).await?;

            tracing::info!(%group_id, "group deleted");
            Ok(())
        })
    }
}
