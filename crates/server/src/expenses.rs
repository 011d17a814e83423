//! Expenses API endpoints.

use std::collections::HashMap;

use api_types::expense::{ExpenseCreate, ExpenseListResponse, ExpenseUpdate, ExpenseView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::Money;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_expense(expense: engine::Expense, category_name: String) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount_cents: expense.amount.cents(),
        description: expense.description,
        date: expense.date,
        category_id: expense.category_id,
        category_name,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseCreate>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let expense = state
        .engine
        .create_expense(
            &user.username,
            Money::new(payload.amount_cents),
            payload.description.as_deref(),
            payload.date,
            payload.category_id,
        )
        .await?;
    let category = state
        .engine
        .category(&user.username, expense.category_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(map_expense(expense, category.name)),
    ))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let names: HashMap<Uuid, String> = state
        .engine
        .list_categories(&user.username)
        .await?
        .into_iter()
        .map(|category| (category.id, category.name))
        .collect();

    let expenses = state
        .engine
        .list_expenses(&user.username)
        .await?
        .into_iter()
        .map(|expense| {
            let name = names
                .get(&expense.category_id)
                .cloned()
                .unwrap_or_default();
            map_expense(expense, name)
        })
        .collect();
    Ok(Json(ExpenseListResponse { expenses }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(&user.username, expense_id).await?;
    let category = state
        .engine
        .category(&user.username, expense.category_id)
        .await?;
    Ok(Json(map_expense(expense, category.name)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .update_expense(
            &user.username,
            expense_id,
            Money::new(payload.amount_cents),
            payload.description.as_deref(),
            payload.date,
            payload.category_id,
        )
        .await?;
    let category = state
        .engine
        .category(&user.username, expense.category_id)
        .await?;
    Ok(Json(map_expense(expense, category.name)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_expense(&user.username, expense_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
