use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    DepositCmd, EngineError, Group, NotificationKind, ResultEngine, Wallet, Won, deposits, groups,
    users, util::require_positive, wallets,
};

use super::{DepositReminder, Engine, with_tx};

/// Reminders start this many days before the deposit deadline.
///
/// The window applies to every group the user belongs to, joined ones
/// included, and only to wallets not yet marked paid. An owner who already
/// paid into their own group gets no reminder for it.
const REMINDER_WINDOW_DAYS: i64 = 5;

impl Engine {
    /// Return the caller's wallet in a group.
    pub async fn wallet(&self, group_id: Uuid, user_id: &str) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, group_id, user_id).await?;
            let model = wallets::Entity::find_by_id((group_id.to_string(), user_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))?;
            Wallet::try_from(model)
        })
    }

    /// Transfer money from the user's bank account into a group.
    ///
    /// The account, the member wallet and the group balance move in one
    /// transaction. The account is debited with a conditional update, so two
    /// concurrent deposits can never overdraw it.
    ///
    /// With an idempotency key, a retried deposit returns the id of the
    /// first one and changes nothing.
    pub async fn deposit(&self, cmd: DepositCmd) -> ResultEngine<Uuid> {
        require_positive(cmd.amount, "amount")?;

        match self.record_deposit(&cmd).await {
            Err(EngineError::Database(err))
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                // Another request with the same key committed first.
                let Some(key) = cmd.idempotency_key.as_deref() else {
                    return Err(EngineError::Database(err));
                };
                match self
                    .deposit_by_key(&self.database, &cmd.group_id.to_string(), &cmd.user_id, key)
                    .await?
                {
                    Some(id) => {
                        tracing::debug!(user_id = %cmd.user_id, key, "deposit replayed");
                        Ok(id)
                    }
                    None => Err(EngineError::Database(err)),
                }
            }
            other => other,
        }
    }

    async fn record_deposit(&self, cmd: &DepositCmd) -> ResultEngine<Uuid> {
        let group_id = cmd.group_id.to_string();

        with_tx!(self, |db_tx| {
            if let Some(key) = cmd.idempotency_key.as_deref() {
                if let Some(existing) = self
                    .deposit_by_key(&db_tx, &group_id, &cmd.user_id, key)
                    .await?
                {
                    return Ok(existing);
                }
            }

            let group = self.require_member(&db_tx, cmd.group_id, &cmd.user_id).await?;
            let user = self.require_user(&db_tx, &cmd.user_id).await?;
            if user.account().is_none() {
                return Err(EngineError::KeyNotFound("account not exists".to_string()));
            }
            let wallet = wallets::Entity::find_by_id((group_id.clone(), cmd.user_id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))?;
            if wallet.balance.checked_add(cmd.amount).is_none()
                || group.balance.checked_add(cmd.amount).is_none()
            {
                return Err(EngineError::InvalidAmount(
                    "group balance out of range".to_string(),
                ));
            }

            // The ledger row goes first: a duplicate key fails here, before any
            // balance moves.
            let deposit_id = Uuid::new_v4();
            deposits::ActiveModel {
                id: ActiveValue::Set(deposit_id.to_string()),
                group_id: ActiveValue::Set(group_id.clone()),
                user_id: ActiveValue::Set(cmd.user_id.clone()),
                amount: ActiveValue::Set(cmd.amount),
                idempotency_key: ActiveValue::Set(cmd.idempotency_key.clone()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            let debited = users::Entity::update_many()
                .col_expr(
                    users::Column::AccountBalance,
                    Expr::col(users::Column::AccountBalance).sub(cmd.amount),
                )
                .filter(users::Column::Username.eq(cmd.user_id.clone()))
                .filter(users::Column::AccountBalance.gte(cmd.amount))
                .exec(&db_tx)
                .await?;
            if debited.rows_affected == 0 {
                return Err(EngineError::InsufficientFunds(format!(
                    "account balance is below {}",
                    Won::new(cmd.amount)
                )));
            }

            let now = Utc::now();
            wallets::Entity::update_many()
                .col_expr(
                    wallets::Column::Balance,
                    Expr::col(wallets::Column::Balance).add(cmd.amount),
                )
                .col_expr(wallets::Column::Paid, Expr::value(true))
                .col_expr(wallets::Column::UpdatedAt, Expr::value(now))
                .filter(wallets::Column::GroupId.eq(group_id.clone()))
                .filter(wallets::Column::UserId.eq(cmd.user_id.clone()))
                .exec(&db_tx)
                .await?;

            groups::Entity::update_many()
                .col_expr(
                    groups::Column::Balance,
                    Expr::col(groups::Column::Balance).add(cmd.amount),
                )
                .filter(groups::Column::Id.eq(group_id.clone()))
                .exec(&db_tx)
                .await?;

            let message = format!(
                "{}님이 {}에 {} 입금했습니다",
                user.nickname,
                group.name,
                Won::new(cmd.amount)
            );
            self.notify_group(&db_tx, &group, NotificationKind::Deposit, &message)
                .await?;

            tracing::debug!(
                group_id = %cmd.group_id,
                user_id = %cmd.user_id,
                amount = cmd.amount,
                "deposit recorded"
            );
            Ok(deposit_id)
        })
    }

    async fn deposit_by_key<C: ConnectionTrait>(
        &self,
        db: &C,
        group_id: &str,
        user_id: &str,
        key: &str,
    ) -> ResultEngine<Option<Uuid>> {
        let existing = deposits::Entity::find()
            .filter(deposits::Column::GroupId.eq(group_id.to_string()))
            .filter(deposits::Column::UserId.eq(user_id.to_string()))
            .filter(deposits::Column::IdempotencyKey.eq(key.to_string()))
            .one(db)
            .await?;
        existing
            .map(|deposit| {
                Uuid::parse_str(&deposit.id)
                    .map_err(|_| EngineError::InvalidId("invalid deposit id".to_string()))
            })
            .transpose()
    }

    /// Usernames of members who deposited at least once.
    pub async fn paid_participants(
        &self,
        group_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<String>> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, group_id, user_id).await?;
            let paid = wallets::Entity::find()
                .filter(wallets::Column::GroupId.eq(group_id.to_string()))
                .filter(wallets::Column::Paid.eq(true))
                .order_by_asc(wallets::Column::UserId)
                .all(&db_tx)
                .await?;
            Ok(paid.into_iter().map(|w| w.user_id).collect::<Vec<_>>())
        })
    }

    /// Member groups due within the reminder window that the user has not
    /// paid into, soonest deadline first.
    pub async fn deposit_reminders(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> ResultEngine<Vec<DepositReminder>> {
        with_tx!(self, |db_tx| {
            let ids = self.member_group_ids(&db_tx, user_id).await?;
            let models = groups::Entity::find()
                .filter(groups::Column::Id.is_in(ids))
                .filter(groups::Column::DueDate.gte(today))
                .filter(
                    groups::Column::DueDate
                        .lte(today + chrono::Duration::days(REMINDER_WINDOW_DAYS)),
                )
                .order_by_asc(groups::Column::DueDate)
                .all(&db_tx)
                .await?;

            let mut reminders = Vec::new();
            for model in models {
                let paid = wallets::Entity::find_by_id((model.id.clone(), user_id.to_string()))
                    .one(&db_tx)
                    .await?
                    .is_some_and(|w| w.paid);
                if paid {
                    continue;
                }
                let group = Group::try_from(model)?;
                reminders.push(DepositReminder {
                    group_id: group.id,
                    group_name: group.name.clone(),
                    due_date: group.due_date,
                    days_left: (group.due_date - today).num_days(),
                    fee_per_person: group.fee_per_person(),
                });
            }
            Ok(reminders)
        })
    }
}
