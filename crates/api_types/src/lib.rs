use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreate {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreate {
        /// Amount in cents; must be >= 0.
        pub amount_cents: i64,
        pub description: Option<String>,
        /// Calendar date (`YYYY-MM-DD`), no time-of-day.
        pub date: NaiveDate,
        pub category_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub amount_cents: i64,
        pub description: Option<String>,
        pub date: NaiveDate,
        pub category_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub amount_cents: i64,
        pub description: Option<String>,
        pub date: NaiveDate,
        pub category_id: Uuid,
        pub category_name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetCreate {
        /// Spending limit in cents.
        pub amount_cents: i64,
        pub start_date: NaiveDate,
        /// Must not precede `start_date`; the window is inclusive on
        /// both ends.
        pub end_date: NaiveDate,
        /// Absent for an overall budget.
        pub category_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub amount_cents: i64,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub category_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub amount_cents: i64,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub category_id: Option<Uuid>,
        /// Name of the scoped category; absent for overall budgets.
        pub category_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub budgets: Vec<BudgetView>,
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpending {
        pub name: String,
        pub total_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySpending {
        /// Month label in `"YYYY-MM"` form.
        pub month: String,
        pub total_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetStatusView {
        pub id: Uuid,
        pub budget_amount_cents: i64,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        /// Absent for overall budgets.
        pub category_id: Option<Uuid>,
        /// Category name, or `"Overall"` for unscoped budgets.
        pub category_name: String,
        pub current_spending_cents: i64,
        /// May be negative when the budget is exceeded.
        pub remaining_cents: i64,
        pub exceeded: bool,
        /// Zero unless `exceeded`.
        pub exceeded_by_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpendingResponse {
        pub report: Vec<CategorySpending>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySpendingResponse {
        pub report: Vec<MonthlySpending>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetStatusResponse {
        pub report: Vec<BudgetStatusView>,
    }
}
