//! Statistics API endpoints

use api_types::stats::{
    CategoryTotal, DailyTotal, DailyTotals, MonthQuery, MonthlySummary, MonthlyTotal, MonthlyTrend,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use engine::{User, YearMonth};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn category_total(total: engine::CategoryTotal) -> CategoryTotal {
    CategoryTotal {
        category: total.category,
        total: total.total,
    }
}

/// Category breakdown of one month plus what is left in the pool.
pub async fn monthly(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlySummary>, ServerError> {
    let month: YearMonth = query.month.parse()?;
    let summary = state
        .engine
        .monthly_summary(id, &user.username, month)
        .await?;

    Ok(Json(MonthlySummary {
        month: summary.month.to_string(),
        total: summary.total,
        categories: summary.categories.into_iter().map(category_total).collect(),
        top: summary.top.map(category_total),
        bottom: summary.bottom.map(category_total),
        remaining: summary.remaining,
    }))
}

pub async fn daily(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<DailyTotals>, ServerError> {
    let month: YearMonth = query.month.parse()?;
    let days = state.engine.daily_totals(id, &user.username, month).await?;

    Ok(Json(DailyTotals {
        days: days
            .into_iter()
            .map(|d| DailyTotal {
                date: d.date,
                total: d.total,
            })
            .collect(),
    }))
}

pub async fn trend(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MonthlyTrend>, ServerError> {
    let months = state.engine.monthly_trend(id, &user.username).await?;

    Ok(Json(MonthlyTrend {
        months: months
            .into_iter()
            .map(|m| MonthlyTotal {
                month: m.month.to_string(),
                total: m.total,
            })
            .collect(),
    }))
}
