use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod budgets;
mod categories;
mod expenses;
mod reports;
mod server;
mod user;

pub mod types {
    pub mod category {
        pub use api_types::category::{
            CategoryCreate, CategoryListResponse, CategoryUpdate, CategoryView,
        };
        pub use engine::Category;
    }

    pub mod expense {
        pub use api_types::expense::{
            ExpenseCreate, ExpenseListResponse, ExpenseUpdate, ExpenseView,
        };
        pub use engine::Expense;
    }

    pub mod budget {
        pub use api_types::budget::{BudgetCreate, BudgetListResponse, BudgetUpdate, BudgetView};
        pub use engine::{Budget, BudgetScope};
    }

    pub mod report {
        pub use api_types::report::{
            BudgetStatusResponse, BudgetStatusView, CategorySpending, CategorySpendingResponse,
            MonthlySpending, MonthlySpendingResponse,
        };
        pub use engine::BudgetStatus;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

//TODO: Find a better solution
#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingName(_) => StatusCode::CONFLICT,
        EngineError::TenancyViolation(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        EngineError::InvalidName(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidRange(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::TenancyViolation(detail) => {
            tracing::error!("tenancy violation: {detail}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingName("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let res = ServerError::from(EngineError::InvalidRange("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn engine_tenancy_violation_maps_to_500() {
        let res =
            ServerError::from(EngineError::TenancyViolation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
