//! Read-side reporting: grouped spending totals, range sums and budget
//! evaluation.
//!
//! Everything here is a pure function of `(owner, current ledger)`: no
//! caching, no writes, no state between calls. Re-running any report
//! against an unchanged ledger yields identical output, and concurrent
//! evaluations need no coordination.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use sea_orm::{QueryFilter, Statement, prelude::*};

use crate::{
    Budget, BudgetScope, BudgetStatus, EngineError, Money, OVERALL_LABEL, ResultEngine, budgets,
    categories, expenses,
};

use super::Engine;

impl Engine {
    /// Total spent per category name, for every category with at least
    /// one expense.
    ///
    /// Entries come back name-ascending; callers that want a different
    /// display order sort explicitly. The grouping key is the name as
    /// currently stored, not the category id.
    pub async fn totals_by_category(&self, owner: &str) -> ResultEngine<Vec<(String, Money)>> {
        let names: HashMap<Uuid, String> = categories::Entity::find()
            .filter(categories::Column::Owner.eq(owner))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|category| (category.id, category.name))
            .collect();

        let mut totals: BTreeMap<String, Money> = BTreeMap::new();
        for expense in expenses::Entity::find()
            .filter(expenses::Column::Owner.eq(owner))
            .all(&self.database)
            .await?
        {
            let Some(name) = names.get(&expense.category_id) else {
                // Same-owner foreign key is enforced on write; a miss here
                // means the ledger was tampered with under us.
                tracing::error!(
                    expense = %expense.id,
                    category = %expense.category_id,
                    "expense references a category its owner does not have; row skipped"
                );
                continue;
            };
            add_to_bucket(&mut totals, name.clone(), Money::new(expense.amount_cents))?;
        }

        Ok(totals.into_iter().collect())
    }

    /// Total spent per calendar month, ascending by `"YYYY-MM"` label.
    ///
    /// Each label appears at most once.
    pub async fn totals_by_month(&self, owner: &str) -> ResultEngine<Vec<(String, Money)>> {
        let mut totals: BTreeMap<String, Money> = BTreeMap::new();
        for expense in expenses::Entity::find()
            .filter(expenses::Column::Owner.eq(owner))
            .all(&self.database)
            .await?
        {
            let label = expense.date.format("%Y-%m").to_string();
            add_to_bucket(&mut totals, label, Money::new(expense.amount_cents))?;
        }

        // BTreeMap iteration is ascending and "YYYY-MM" sorts
        // chronologically, so the contract order falls out for free.
        Ok(totals.into_iter().collect())
    }

    /// Sum of the owner's expenses dated inside `[start, end]`, both
    /// ends included, optionally restricted to one category.
    ///
    /// Returns exact zero when nothing matches, never an error; the
    /// budget evaluator depends on that.
    pub async fn sum_in_range(
        &self,
        owner: &str,
        scope: BudgetScope,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Money> {
        let backend = self.database.get_database_backend();
        let stmt = match scope {
            BudgetScope::Overall => Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(amount_cents), 0) AS sum \
                 FROM expenses \
                 WHERE owner = ? AND date >= ? AND date <= ?",
                [owner.into(), start.into(), end.into()],
            ),
            BudgetScope::Category(category_id) => Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(amount_cents), 0) AS sum \
                 FROM expenses \
                 WHERE owner = ? AND category_id = ? AND date >= ? AND date <= ?",
                [owner.into(), category_id.into(), start.into(), end.into()],
            ),
        };

        let row = self.database.query_one(stmt).await?;
        let cents: i64 = row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0);
        Ok(Money::new(cents))
    }

    /// Evaluates every budget of `owner` against its current spending,
    /// in store retrieval order.
    ///
    /// Rows violating data integrity are logged and excluded instead of
    /// failing the batch: an inverted window (the store should have
    /// rejected it) and a scoped category that is missing or belongs to
    /// another owner. Database errors still abort the whole call; they
    /// are not per-row conditions.
    pub async fn budget_status(&self, owner: &str) -> ResultEngine<Vec<BudgetStatus>> {
        let models = budgets::Entity::find()
            .filter(budgets::Column::Owner.eq(owner))
            .all(&self.database)
            .await?;

        let mut statuses = Vec::with_capacity(models.len());
        for model in models {
            let budget = Budget::from(model);

            if budget.end_date < budget.start_date {
                tracing::error!(
                    budget = %budget.id,
                    "budget window is inverted; row excluded from the report"
                );
                continue;
            }

            let category_name = match budget.scope {
                BudgetScope::Overall => OVERALL_LABEL.to_string(),
                BudgetScope::Category(category_id) => {
                    match categories::Entity::find_by_id(category_id)
                        .one(&self.database)
                        .await?
                    {
                        Some(category) if category.owner == budget.owner => category.name,
                        Some(category) => {
                            tracing::error!(
                                budget = %budget.id,
                                category = %category.id,
                                "budget is scoped to a category of another owner; row excluded from the report"
                            );
                            continue;
                        }
                        None => {
                            tracing::error!(
                                budget = %budget.id,
                                category = %category_id,
                                "budget is scoped to a missing category; row excluded from the report"
                            );
                            continue;
                        }
                    }
                }
            };

            let current_spending = self
                .sum_in_range(owner, budget.scope, budget.start_date, budget.end_date)
                .await?;
            statuses.push(BudgetStatus::new(budget, category_name, current_spending));
        }

        Ok(statuses)
    }
}

fn add_to_bucket(
    totals: &mut BTreeMap<String, Money>,
    key: String,
    amount: Money,
) -> ResultEngine<()> {
    let entry = totals.entry(key).or_insert(Money::ZERO);
    *entry = entry.checked_add(amount).ok_or_else(|| {
        EngineError::InvalidAmount("spending total exceeds the representable range".to_string())
    })?;
    Ok(())
}
