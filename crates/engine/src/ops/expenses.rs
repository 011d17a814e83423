use chrono::NaiveDate;
use sea_orm::{ActiveValue, ModelTrait, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{BudgetScope, EngineError, Expense, Money, ResultEngine, expenses};

use super::{Engine, normalize_optional_text};

impl Engine {
    /// Records an expense for `owner`.
    ///
    /// The category must exist and belong to the same owner.
    pub async fn create_expense(
        &self,
        owner: &str,
        amount: Money,
        description: Option<&str>,
        date: NaiveDate,
        category_id: Uuid,
    ) -> ResultEngine<Expense> {
        self.require_category(owner, category_id).await?;

        let expense = Expense::new(
            amount,
            normalize_optional_text(description),
            date,
            category_id,
            owner.to_string(),
        )?;
        expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;
        Ok(expense)
    }

    /// Lists the owner's expenses, newest first.
    pub async fn list_expenses(&self, owner: &str) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::Owner.eq(owner))
            .order_by_desc(expenses::Column::Date)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Expense::from).collect())
    }

    /// Lists the owner's expenses dated inside `[start, end]`, both ends
    /// included, oldest first, optionally restricted to one category.
    pub async fn list_expenses_in_range(
        &self,
        owner: &str,
        scope: BudgetScope,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<Expense>> {
        if end < start {
            return Err(EngineError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }

        let mut query = expenses::Entity::find()
            .filter(expenses::Column::Owner.eq(owner))
            .filter(expenses::Column::Date.between(start, end));
        if let BudgetScope::Category(category_id) = scope {
            query = query.filter(expenses::Column::CategoryId.eq(category_id));
        }

        let models = query
            .order_by_asc(expenses::Column::Date)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Expense::from).collect())
    }

    /// Returns one expense of the owner.
    pub async fn expense(&self, owner: &str, expense_id: Uuid) -> ResultEngine<Expense> {
        let model = self.require_expense(owner, expense_id).await?;
        Ok(Expense::from(model))
    }

    /// Replaces the amount/description/date/category of an expense.
    pub async fn update_expense(
        &self,
        owner: &str,
        expense_id: Uuid,
        amount: Money,
        description: Option<&str>,
        date: NaiveDate,
        category_id: Uuid,
    ) -> ResultEngine<Expense> {
        let model = self.require_expense(owner, expense_id).await?;
        self.require_category(owner, category_id).await?;
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(
                "amount must be >= 0".to_string(),
            ));
        }

        let mut active: expenses::ActiveModel = model.into();
        active.amount_cents = ActiveValue::Set(amount.cents());
        active.description = ActiveValue::Set(normalize_optional_text(description));
        active.date = ActiveValue::Set(date);
        active.category_id = ActiveValue::Set(category_id);
        let updated = active.update(&self.database).await?;
        Ok(Expense::from(updated))
    }

    /// Deletes an expense of the owner.
    pub async fn delete_expense(&self, owner: &str, expense_id: Uuid) -> ResultEngine<()> {
        let model = self.require_expense(owner, expense_id).await?;
        model.delete(&self.database).await?;
        Ok(())
    }

    pub(super) async fn require_expense(
        &self,
        owner: &str,
        expense_id: Uuid,
    ) -> ResultEngine<expenses::Model> {
        match expenses::Entity::find_by_id(expense_id)
            .one(&self.database)
            .await?
        {
            Some(model) if model.owner == owner => Ok(model),
            _ => Err(EngineError::NotFound("expense not exists".to_string())),
        }
    }
}
