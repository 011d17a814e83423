use sea_orm::{ActiveValue, ModelTrait, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{Category, EngineError, ResultEngine, categories};

use super::{Engine, normalize_required_name};

impl Engine {
    /// Creates a category for `owner`.
    ///
    /// Names are compared with plain literal equality; a second "Food"
    /// is rejected, a "food" next to a "Food" is not.
    pub async fn create_category(&self, owner: &str, name: &str) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;

        let existing = categories::Entity::find()
            .filter(categories::Column::Owner.eq(owner))
            .filter(categories::Column::Name.eq(name.as_str()))
            .one(&self.database)
            .await?;
        if existing.is_some() {
            return Err(EngineError::ExistingName(name));
        }

        let category = Category::new(name, owner.to_string());
        categories::ActiveModel::from(&category)
            .insert(&self.database)
            .await?;
        Ok(category)
    }

    /// Lists the owner's categories, name-ascending.
    pub async fn list_categories(&self, owner: &str) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(categories::Column::Owner.eq(owner))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    /// Returns one category of the owner.
    pub async fn category(&self, owner: &str, category_id: Uuid) -> ResultEngine<Category> {
        let model = self.require_category(owner, category_id).await?;
        Ok(Category::from(model))
    }

    /// Renames a category, keeping the per-owner uniqueness invariant.
    pub async fn update_category(
        &self,
        owner: &str,
        category_id: Uuid,
        name: &str,
    ) -> ResultEngine<Category> {
        let model = self.require_category(owner, category_id).await?;
        let name = normalize_required_name(name, "category")?;

        if name != model.name {
            let clash = categories::Entity::find()
                .filter(categories::Column::Owner.eq(owner))
                .filter(categories::Column::Name.eq(name.as_str()))
                .one(&self.database)
                .await?;
            if clash.is_some() {
                return Err(EngineError::ExistingName(name));
            }
        }

        let mut active: categories::ActiveModel = model.into();
        active.name = ActiveValue::Set(name);
        let updated = active.update(&self.database).await?;
        Ok(Category::from(updated))
    }

    /// Deletes a category of the owner.
    ///
    /// Expenses and budgets referencing it keep the row alive at the
    /// database level; the foreign key surfaces as a `Database` error.
    pub async fn delete_category(&self, owner: &str, category_id: Uuid) -> ResultEngine<()> {
        let model = self.require_category(owner, category_id).await?;
        model.delete(&self.database).await?;
        Ok(())
    }

    /// Looks up a category and checks it belongs to `owner`.
    ///
    /// A row of a different owner is indistinguishable from an absent
    /// one: both come back as `NotFound`.
    pub(super) async fn require_category(
        &self,
        owner: &str,
        category_id: Uuid,
    ) -> ResultEngine<categories::Model> {
        match categories::Entity::find_by_id(category_id)
            .one(&self.database)
            .await?
        {
            Some(model) if model.owner == owner => Ok(model),
            _ => Err(EngineError::NotFound("category not exists".to_string())),
        }
    }
}
