//! Budget definitions and the derived status row.
//!
//! A budget caps spending over a closed date interval, either across the
//! whole ledger or inside one category. The status row is recomputed
//! from the ledger on every evaluation and never persisted.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Display label for budgets that cover the whole ledger.
pub const OVERALL_LABEL: &str = "Overall";

/// Spending boundary of a budget (and of a range sum).
///
/// An explicit two-variant scope keeps the evaluator's branching
/// exhaustive; the nullable category reference exists only at the
/// database boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetScope {
    Overall,
    Category(Uuid),
}

impl BudgetScope {
    /// Returns the scoped category id, if any.
    #[must_use]
    pub fn category_id(self) -> Option<Uuid> {
        match self {
            Self::Overall => None,
            Self::Category(id) => Some(id),
        }
    }
}

impl From<Option<Uuid>> for BudgetScope {
    fn from(category_id: Option<Uuid>) -> Self {
        match category_id {
            None => Self::Overall,
            Some(id) => Self::Category(id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub amount: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub scope: BudgetScope,
    pub owner: String,
}

impl Budget {
    pub fn new(
        amount: Money,
        start_date: NaiveDate,
        end_date: NaiveDate,
        scope: BudgetScope,
        owner: String,
    ) -> ResultEngine<Self> {
        if end_date < start_date {
            return Err(EngineError::InvalidRange(format!(
                "start_date {start_date} is after end_date {end_date}"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            amount,
            start_date,
            end_date,
            scope,
            owner,
        })
    }
}

/// A budget joined with its current spending.
///
/// All derived fields are fixed at construction: `remaining` may go
/// negative, `exceeded` is a strict comparison (spending equal to the
/// limit is not exceeded) and `exceeded_by` is zero unless `exceeded`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget: Budget,
    /// Category name for scoped budgets, [`OVERALL_LABEL`] otherwise.
    pub category_name: String,
    pub current_spending: Money,
    pub remaining: Money,
    pub exceeded: bool,
    pub exceeded_by: Money,
}

impl BudgetStatus {
    pub fn new(budget: Budget, category_name: String, current_spending: Money) -> Self {
        let remaining = budget.amount - current_spending;
        let exceeded = current_spending > budget.amount;
        let exceeded_by = if exceeded {
            current_spending - budget.amount
        } else {
            Money::ZERO
        };
        Self {
            budget,
            category_name,
            current_spending,
            remaining,
            exceeded,
            exceeded_by,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner: String,
    pub amount_cents: i64,
    pub start_date: Date,
    pub end_date: Date,
    pub category_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Categories,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Budget {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            amount: Money::new(model.amount_cents),
            start_date: model.start_date,
            end_date: model.end_date,
            scope: BudgetScope::from(model.category_id),
            owner: model.owner,
        }
    }
}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id),
            owner: ActiveValue::Set(budget.owner.clone()),
            amount_cents: ActiveValue::Set(budget.amount.cents()),
            start_date: ActiveValue::Set(budget.start_date),
            end_date: ActiveValue::Set(budget.end_date),
            category_id: ActiveValue::Set(budget.scope.category_id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(amount_cents: i64) -> Budget {
        Budget::new(
            Money::new(amount_cents),
            NaiveDate::from_ymd_opt(2023, 10, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 10, 31).unwrap(),
            BudgetScope::Overall,
            "alice".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_inverted_range() {
        let err = Budget::new(
            Money::new(100),
            NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 10, 1).unwrap(),
            BudgetScope::Overall,
            "alice".to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRange(_)));
    }

    #[test]
    fn status_under_budget() {
        let status = BudgetStatus::new(budget(10_000), OVERALL_LABEL.to_string(), Money::new(4_050));
        assert_eq!(status.remaining, Money::new(5_950));
        assert!(!status.exceeded);
        assert_eq!(status.exceeded_by, Money::ZERO);
    }

    #[test]
    fn status_exactly_at_budget_is_not_exceeded() {
        let status = BudgetStatus::new(budget(3_000), OVERALL_LABEL.to_string(), Money::new(3_000));
        assert_eq!(status.remaining, Money::ZERO);
        assert!(!status.exceeded);
        assert_eq!(status.exceeded_by, Money::ZERO);
    }

    #[test]
    fn status_over_budget() {
        let status = BudgetStatus::new(budget(3_000), "Food".to_string(), Money::new(3_550));
        assert_eq!(status.remaining, Money::new(-550));
        assert!(status.exceeded);
        assert_eq!(status.exceeded_by, Money::new(550));
    }
}
