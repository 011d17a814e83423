//! Budgets API endpoints.
//!
//! The wire shape keeps the nullable `category_id` of the original API;
//! it folds into the engine's explicit scope at this boundary.

use api_types::budget::{BudgetCreate, BudgetListResponse, BudgetUpdate, BudgetView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{BudgetScope, Money};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

async fn map_budget(
    state: &ServerState,
    owner: &str,
    budget: engine::Budget,
) -> Result<BudgetView, ServerError> {
    let category_name = match budget.scope {
        BudgetScope::Overall => None,
        BudgetScope::Category(category_id) => {
            Some(state.engine.category(owner, category_id).await?.name)
        }
    };
    Ok(BudgetView {
        id: budget.id,
        amount_cents: budget.amount.cents(),
        start_date: budget.start_date,
        end_date: budget.end_date,
        category_id: budget.scope.category_id(),
        category_name,
    })
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetCreate>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let budget = state
        .engine
        .create_budget(
            &user.username,
            Money::new(payload.amount_cents),
            payload.start_date,
            payload.end_date,
            BudgetScope::from(payload.category_id),
        )
        .await?;
    let view = map_budget(&state, &user.username, budget).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let mut budgets = Vec::new();
    for budget in state.engine.list_budgets(&user.username).await? {
        budgets.push(map_budget(&state, &user.username, budget).await?);
    }
    Ok(Json(BudgetListResponse { budgets }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state.engine.budget(&user.username, budget_id).await?;
    let view = map_budget(&state, &user.username, budget).await?;
    Ok(Json(view))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state
        .engine
        .update_budget(
            &user.username,
            budget_id,
            Money::new(payload.amount_cents),
            payload.start_date,
            payload.end_date,
            BudgetScope::from(payload.category_id),
        )
        .await?;
    let view = map_budget(&state, &user.username, budget).await?;
    Ok(Json(view))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(&user.username, budget_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
