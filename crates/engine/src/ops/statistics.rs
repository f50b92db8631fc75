use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    DailyTotal, MonthlySummary, MonthlyTotal, ResultEngine, YearMonth, stats,
};

use super::{Engine, with_tx};

impl Engine {
    /// Spending of a group in one month, broken down by category.
    pub async fn monthly_summary(
        &self,
        group_id: Uuid,
        user_id: &str,
        month: YearMonth,
    ) -> ResultEngine<MonthlySummary> {
        with_tx!(self, |db_tx| {
            let group = self.require_member(&db_tx, group_id, user_id).await?;
            let expenses = self.group_expenses(&db_tx, &group.id).await?;
            stats::monthly_summary(month, &expenses, group.balance)
        })
    }

    /// Per-day totals of one month, for a calendar view.
    pub async fn daily_totals(
        &self,
        group_id: Uuid,
        user_id: &str,
        month: YearMonth,
    ) -> ResultEngine<Vec<DailyTotal>> {
        with_tx!(self, |db_tx| {
            let group = self.require_member(&db_tx, group_id, user_id).await?;
            let expenses = self.group_expenses(&db_tx, &group.id).await?;
            stats::daily_totals(month, &expenses)
        })
    }

    /// Per-month totals over the life of the group.
    pub async fn monthly_trend(
        &self,
        group_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<MonthlyTotal>> {
        with_tx!(self, |db_tx| {
            let group = self.require_member(&db_tx, group_id, user_id).await?;
            let expenses = self.group_expenses(&db_tx, &group.id).await?;
            stats::monthly_trend(&expenses)
        })
    }
}
