use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    AddExpenseCmd, EngineError, Expense, NotificationKind, ResultEngine, UpdateExpenseCmd, Won,
    expenses, groups,
    util::{checked_sum, normalize_optional, normalize_required, require_positive},
};

use super::{Engine, with_tx};

impl Engine {
    /// Record an expense against the group balance.
    ///
    /// The balance may go below zero: overspending is recorded, not refused.
    pub async fn add_expense(&self, cmd: AddExpenseCmd) -> ResultEngine<Uuid> {
        require_positive(cmd.amount, "amount")?;
        let category = normalize_required(&cmd.category, "category")?;
        let memo = normalize_optional(cmd.memo.as_deref());

        with_tx!(self, |db_tx| {
            let group = self
                .require_member(&db_tx, cmd.group_id, &cmd.user_id)
                .await?;
            let author = self.require_user(&db_tx, &cmd.user_id).await?;

            let expense_id = Uuid::new_v4();
            expenses::ActiveModel {
                id: ActiveValue::Set(expense_id.to_string()),
                group_id: ActiveValue::Set(group.id.clone()),
                date: ActiveValue::Set(cmd.date),
                amount: ActiveValue::Set(cmd.amount),
                category: ActiveValue::Set(category.clone()),
                memo: ActiveValue::Set(memo),
                author: ActiveValue::Set(author.username),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            self.adjust_group_balance(&db_tx, &group, -cmd.amount)
                .await?;

            let message = format!(
                "{}님이 {category} 지출 {}을 등록했습니다",
                author.nickname,
                Won::new(cmd.amount)
            );
            self.notify_group(&db_tx, &group, NotificationKind::Expense, &message)
                .await?;

            Ok(expense_id)
        })
    }

    /// Edit an expense. Author or group owner only.
    pub async fn update_expense(
        &self,
        group_id: Uuid,
        expense_id: Uuid,
        user_id: &str,
        cmd: UpdateExpenseCmd,
    ) -> ResultEngine<Expense> {
        if let Some(amount) = cmd.amount {
            require_positive(amount, "amount")?;
        }
        let category = cmd
            .category
            .as_deref()
            .map(|category| normalize_required(category, "category"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let group = self.require_member(&db_tx, group_id, user_id).await?;
            let model = expenses::Entity::find_by_id(expense_id.to_string())
                .filter(expenses::Column::GroupId.eq(group.id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
            self.require_author_or_owner(&group, &model.author, user_id)?;

            let old_amount = model.amount;
            let mut active: expenses::ActiveModel = model.into();
            if let Some(date) = cmd.date {
                active.date = ActiveValue::Set(date);
            }
            if let Some(amount) = cmd.amount {
                active.amount = ActiveValue::Set(amount);
            }
            if let Some(category) = category {
                active.category = ActiveValue::Set(category);
            }
            if let Some(memo) = cmd.memo.as_deref() {
                active.memo = ActiveValue::Set(normalize_optional(Some(memo)));
            }
            let model = active.update(&db_tx).await?;

            let delta = old_amount - model.amount;
            if delta != 0 {
                self.adjust_group_balance(&db_tx, &group, delta).await?;
            }

            Expense::try_from(model)
        })
    }

    /// Delete several expenses at once and return the restored amount.
    ///
    /// Either every id is deleted or none: an unknown id or one the caller
    /// may not delete aborts the whole batch.
    pub async fn delete_expenses(
        &self,
        group_id: Uuid,
        user_id: &str,
        ids: &[Uuid],
    ) -> ResultEngine<i64> {
        let ids: Vec<String> = ids
            .iter()
            .map(ToString::to_string)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Err(EngineError::InvalidInput(
                "no expense selected".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let group = self.require_member(&db_tx, group_id, user_id).await?;
            let models = expenses::Entity::find()
                .filter(expenses::Column::GroupId.eq(group.id.clone()))
                .filter(expenses::Column::Id.is_in(ids.clone()))
                .all(&db_tx)
                .await?;
            if models.len() != ids.len() {
                return Err(EngineError::KeyNotFound("expense not exists".to_string()));
            }
            for model in &models {
                self.require_author_or_owner(&group, &model.author, user_id)?;
            }

            let restored = checked_sum(models.iter().map(|m| m.amount))?;
            expenses::Entity::delete_many()
                .filter(expenses::Column::GroupId.eq(group.id.clone()))
                .filter(expenses::Column::Id.is_in(ids))
                .exec(&db_tx)
                .await?;
            self.adjust_group_balance(&db_tx, &group, restored)
                .await?;

            Ok(restored)
        })
    }

    /// Expenses of a group, most recently registered first.
    pub async fn expenses(
        &self,
        group_id: Uuid,
        user_id: &str,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<Expense>> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, group_id, user_id).await?;
            let mut query = expenses::Entity::find()
                .filter(expenses::Column::GroupId.eq(group_id.to_string()))
                .order_by_desc(expenses::Column::CreatedAt)
                .order_by_desc(expenses::Column::Id);
            if let Some(limit) = limit {
                query = query.limit(limit);
            }
            let models = query.all(&db_tx).await?;
            models
                .into_iter()
                .map(Expense::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub(super) async fn group_expenses(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
    ) -> ResultEngine<Vec<Expense>> {
        expenses::Entity::find()
            .filter(expenses::Column::GroupId.eq(group_id.to_string()))
            .order_by_asc(expenses::Column::Date)
            .all(db)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    async fn adjust_group_balance(
        &self,
        db: &DatabaseTransaction,
        group: &groups::Model,
        delta: i64,
    ) -> ResultEngine<()> {
        if group.balance.checked_add(delta).is_none() {
            return Err(EngineError::InvalidAmount(
                "group balance out of range".to_string(),
            ));
        }
        groups::Entity::update_many()
            .col_expr(
                groups::Column::Balance,
                Expr::col(groups::Column::Balance).add(delta),
            )
            .filter(groups::Column::Id.eq(group.id.clone()))
            .exec(db)
            .await?;
        Ok(())
    }
}
