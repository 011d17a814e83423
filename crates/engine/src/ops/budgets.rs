use chrono::NaiveDate;
use sea_orm::{ActiveValue, ModelTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{Budget, BudgetScope, EngineError, Money, ResultEngine, budgets};

use super::Engine;

impl Engine {
    /// Defines a budget for `owner`.
    ///
    /// The window is a closed interval; `start > end` is rejected. A
    /// scoped budget must reference a category of the same owner.
    pub async fn create_budget(
        &self,
        owner: &str,
        amount: Money,
        start_date: NaiveDate,
        end_date: NaiveDate,
        scope: BudgetScope,
    ) -> ResultEngine<Budget> {
        if let BudgetScope::Category(category_id) = scope {
            self.require_category(owner, category_id).await?;
        }

        let budget = Budget::new(amount, start_date, end_date, scope, owner.to_string())?;
        budgets::ActiveModel::from(&budget)
            .insert(&self.database)
            .await?;
        Ok(budget)
    }

    /// Lists the owner's budgets in store retrieval order.
    ///
    /// The budget-status report follows this order, so no sorting is
    /// applied here.
    pub async fn list_budgets(&self, owner: &str) -> ResultEngine<Vec<Budget>> {
        let models = budgets::Entity::find()
            .filter(budgets::Column::Owner.eq(owner))
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Budget::from).collect())
    }

    /// Returns one budget of the owner.
    pub async fn budget(&self, owner: &str, budget_id: Uuid) -> ResultEngine<Budget> {
        let model = self.require_budget(owner, budget_id).await?;
        Ok(Budget::from(model))
    }

    /// Replaces the limit, window and scope of a budget.
    ///
    /// Switching scope in either direction (overall to category or back)
    /// is allowed; the same validations as on create apply.
    pub async fn update_budget(
        &self,
        owner: &str,
        budget_id: Uuid,
        amount: Money,
        start_date: NaiveDate,
        end_date: NaiveDate,
        scope: BudgetScope,
    ) -> ResultEngine<Budget> {
        let model = self.require_budget(owner, budget_id).await?;
        if end_date < start_date {
            return Err(EngineError::InvalidRange(format!(
                "start_date {start_date} is after end_date {end_date}"
            )));
        }
        if let BudgetScope::Category(category_id) = scope {
            self.require_category(owner, category_id).await?;
        }

        let mut active: budgets::ActiveModel = model.into();
        active.amount_cents = ActiveValue::Set(amount.cents());
        active.start_date = ActiveValue::Set(start_date);
        active.end_date = ActiveValue::Set(end_date);
        active.category_id = ActiveValue::Set(scope.category_id());
        let updated = active.update(&self.database).await?;
        Ok(Budget::from(updated))
    }

    /// Deletes a budget of the owner.
    pub async fn delete_budget(&self, owner: &str, budget_id: Uuid) -> ResultEngine<()> {
        let model = self.require_budget(owner, budget_id).await?;
        model.delete(&self.database).await?;
        Ok(())
    }

    pub(super) async fn require_budget(
        &self,
        owner: &str,
        budget_id: Uuid,
    ) -> ResultEngine<budgets::Model> {
        match budgets::Entity::find_by_id(budget_id)
            .one(&self.database)
            .await?
        {
            Some(model) if model.owner == owner => Ok(model),
            _ => Err(EngineError::NotFound("budget not exists".to_string())),
        }
    }
}
