//! Expense endpoints.

use api_types::{
    ListQuery,
    expense::{
        ExpenseCreated, ExpenseDelete, ExpenseList, ExpenseNew, ExpenseUpdate, ExpenseView,
        ExpensesDeleted,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{AddExpenseCmd, Expense, UpdateExpenseCmd, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn expense_view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        date: expense.date,
        amount: expense.amount,
        category: expense.category,
        memo: expense.memo,
        author: expense.author,
        created_at: expense.created_at,
    }
}

pub async fn expense_new(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let mut cmd = AddExpenseCmd::new(
        id,
        &user.username,
        payload.date,
        payload.amount,
        payload.category,
    );
    if let Some(memo) = payload.memo {
        cmd = cmd.memo(memo);
    }
    let expense_id = state.engine.add_expense(cmd).await?;

    Ok((StatusCode::CREATED, Json(ExpenseCreated { id: expense_id })))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ExpenseList>, ServerError> {
    let expenses = state
        .engine
        .expenses(id, &user.username, query.limit)
        .await?;
    Ok(Json(ExpenseList {
        expenses: expenses.into_iter().map(expense_view).collect(),
    }))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path((id, expense_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let mut cmd = UpdateExpenseCmd::new();
    if let Some(date) = payload.date {
        cmd = cmd.date(date);
    }
    if let Some(amount) = payload.amount {
        cmd = cmd.amount(amount);
    }
    if let Some(category) = payload.category {
        cmd = cmd.category(category);
    }
    if let Some(memo) = payload.memo {
        cmd = cmd.memo(memo);
    }

    let expense = state
        .engine
        .update_expense(id, expense_id, &user.username, cmd)
        .await?;
    Ok(Json(expense_view(expense)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseDelete>,
) -> Result<Json<ExpensesDeleted>, ServerError> {
    let restored = state
        .engine
        .delete_expenses(id, &user.username, &payload.ids)
        .await?;
    Ok(Json(ExpensesDeleted { restored }))
}
