//! Ledger entries.
//!
//! An `Expense` is a dated, categorized amount owned by a single user.
//! Amounts are non-negative; the date carries no time-of-day.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub amount: Money,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub category_id: Uuid,
    pub owner: String,
}

impl Expense {
    pub fn new(
        amount: Money,
        description: Option<String>,
        date: NaiveDate,
        category_id: Uuid,
        owner: String,
    ) -> ResultEngine<Self> {
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(
                "amount must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            amount,
            description,
            date,
            category_id,
            owner,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner: String,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub date: Date,
    pub category_id: Uuid,
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

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            amount: Money::new(model.amount_cents),
            description: model.description,
            date: model.date,
            category_id: model.category_id,
            owner: model.owner,
        }
    }
}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id),
            owner: ActiveValue::Set(expense.owner.clone()),
            amount_cents: ActiveValue::Set(expense.amount.cents()),
            description: ActiveValue::Set(expense.description.clone()),
            date: ActiveValue::Set(expense.date),
            category_id: ActiveValue::Set(expense.category_id),
        }
    }
}
