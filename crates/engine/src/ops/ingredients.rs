use chrono::Utc;
use sea_orm::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Ingredient, NewIngredient, ResultEngine, ingredients};

use super::{Engine, Principal, normalize_optional_text, normalize_required_text};

impl Engine {
    /// Stocks a purchased ingredient into the pantry.
    ///
    /// Name and supplier lot are required; the rest of the label is optional
    /// free text.
    pub async fn stock_ingredient(
        &self,
        principal: &Principal,
        new: NewIngredient,
    ) -> ResultEngine<Ingredient> {
        let name = normalize_required_text(&new.name, "ingredient name")?;
        let supplier_lot = normalize_required_text(&new.supplier_lot, "supplier lot")?;
        if new.mrp_minor < 0 {
            return Err(EngineError::Validation(
                "mrp must not be negative".to_string(),
            ));
        }

        let ingredient = Ingredient {
            id: Uuid::new_v4(),
            name,
            brand: normalize_optional_text(new.brand.as_deref()),
            supplier: normalize_optional_text(new.supplier.as_deref()),
            supplier_lot,
            notes: normalize_optional_text(new.notes.as_deref()),
            mrp_minor: new.mrp_minor,
            expires_on: new.expires_on,
            is_exhausted: false,
            recorded_by: principal.username().to_string(),
            created_at: Utc::now(),
        };

        ingredients::ActiveModel::from(&ingredient)
            .insert(&self.database)
            .await
            .map_err(EngineError::StoreWriteFailed)?;

        tracing::info!(
            user = principal.username(),
            ingredient = %ingredient.id,
            "ingredient stocked"
        );
        Ok(ingredient)
    }

    /// Flags an ingredient as used up.
    ///
    /// One-way and idempotent: flagging an already-exhausted ingredient is a
    /// no-op success, so stations racing to flag the same ingredient (or
    /// retrying after a transient failure) all converge on the same state.
    pub async fn mark_exhausted(
        &self,
        principal: &Principal,
        ingredient_id: Uuid,
    ) -> ResultEngine<()> {
        let model = ingredients::Entity::find_by_id(ingredient_id.to_string())
            .one(&self.database)
            .await
            .map_err(EngineError::StoreUnavailable)?
            .ok_or_else(|| EngineError::NotFound("ingredient not exists".to_string()))?;

        if model.is_exhausted {
            return Ok(());
        }

        let update = ingredients::ActiveModel {
            id: ActiveValue::Set(model.id),
            is_exhausted: ActiveValue::Set(true),
            ..Default::default()
        };
        update
            .update(&self.database)
            .await
            .map_err(EngineError::StoreWriteFailed)?;

        tracing::info!(
            user = principal.username(),
            ingredient = %ingredient_id,
            "ingredient marked exhausted"
        );
        Ok(())
    }
}
