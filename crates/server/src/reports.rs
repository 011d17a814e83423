//! Reports API endpoints.
//!
//! Thin assembly layer: each handler runs one engine report for the
//! authenticated owner and reshapes it for the wire.

use api_types::report::{
    BudgetStatusResponse, BudgetStatusView, CategorySpending, CategorySpendingResponse,
    MonthlySpending, MonthlySpendingResponse,
};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, user};

/// Handle requests for total spending grouped by category name.
pub async fn category_spending(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<CategorySpendingResponse>, ServerError> {
    let report = state
        .engine
        .totals_by_category(&user.username)
        .await?
        .into_iter()
        .map(|(name, total)| CategorySpending {
            name,
            total_cents: total.cents(),
        })
        .collect();
    Ok(Json(CategorySpendingResponse { report }))
}

/// Handle requests for total spending grouped by calendar month.
pub async fn monthly_spending(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<MonthlySpendingResponse>, ServerError> {
    let report = state
        .engine
        .totals_by_month(&user.username)
        .await?
        .into_iter()
        .map(|(month, total)| MonthlySpending {
            month,
            total_cents: total.cents(),
        })
        .collect();
    Ok(Json(MonthlySpendingResponse { report }))
}

/// Handle requests for the budget status report.
pub async fn budget_status(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetStatusResponse>, ServerError> {
    let report = state
        .engine
        .budget_status(&user.username)
        .await?
        .into_iter()
        .map(|status| BudgetStatusView {
            id: status.budget.id,
            budget_amount_cents: status.budget.amount.cents(),
            start_date: status.budget.start_date,
            end_date: status.budget.end_date,
            category_id: status.budget.scope.category_id(),
            category_name: status.category_name,
            current_spending_cents: status.current_spending.cents(),
            remaining_cents: status.remaining.cents(),
            exceeded: status.exceeded,
            exceeded_by_cents: status.exceeded_by.cents(),
        })
        .collect();
    Ok(Json(BudgetStatusResponse { report }))
}
