//! The module contains the `Ingredient` struct and its entity.
//!
//! An ingredient is a raw purchase stocked into the pantry. It is never
//! deleted (traceability must survive); the only mutation ever applied is the
//! one-way `is_exhausted` flip.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// A stocked ingredient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Stable identifier, generated once and persisted.
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub supplier: Option<String>,
    /// The supplier's own lot/batch label, free text.
    pub supplier_lot: String,
    pub notes: Option<String>,
    /// Purchase price in minor units.
    pub mrp_minor: i64,
    pub expires_on: NaiveDate,
    pub is_exhausted: bool,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
}

impl Ingredient {
    /// An ingredient is usable iff it was not flagged exhausted and has not
    /// passed its expiry date. Exhaustion and expiry both make it
    /// unavailable; no reason is recorded.
    pub fn is_available(&self, as_of: NaiveDate) -> bool {
        !self.is_exhausted && self.expires_on >= as_of
    }
}

/// Field values for stocking a new ingredient.
#[derive(Clone, Debug)]
pub struct NewIngredient {
    pub name: String,
    pub brand: Option<String>,
    pub supplier: Option<String>,
    pub supplier_lot: String,
    pub notes: Option<String>,
    pub mrp_minor: i64,
    pub expires_on: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub brand: Option<String>,
    pub supplier: Option<String>,
    pub supplier_lot: String,
    pub notes: Option<String>,
    pub mrp_minor: i64,
    pub expires_on: Date,
    pub is_exhausted: bool,
    pub recorded_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lot_ingredients::Entity")]
    LotIngredients,
}

impl Related<super::lot_ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LotIngredients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Ingredient> for ActiveModel {
    fn from(value: &Ingredient) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            brand: ActiveValue::Set(value.brand.clone()),
            supplier: ActiveValue::Set(value.supplier.clone()),
            supplier_lot: ActiveValue::Set(value.supplier_lot.clone()),
            notes: ActiveValue::Set(value.notes.clone()),
            mrp_minor: ActiveValue::Set(value.mrp_minor),
            expires_on: ActiveValue::Set(value.expires_on),
            is_exhausted: ActiveValue::Set(value.is_exhausted),
            recorded_by: ActiveValue::Set(value.recorded_by.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Ingredient {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::Corrupted(format!("invalid ingredient id {}", model.id)))?,
            name: model.name,
            brand: model.brand,
            supplier: model.supplier,
            supplier_lot: model.supplier_lot,
            notes: model.notes,
            mrp_minor: model.mrp_minor,
            expires_on: model.expires_on,
            is_exhausted: model.is_exhausted,
            recorded_by: model.recorded_by,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(expires_on: NaiveDate, is_exhausted: bool) -> Ingredient {
        Ingredient {
            id: Uuid::new_v4(),
            name: String::from("Farina"),
            brand: None,
            supplier: None,
            supplier_lot: String::from("L-1"),
            notes: None,
            mrp_minor: 250,
            expires_on,
            is_exhausted,
            recorded_by: String::from("alice"),
            created_at: Utc::now(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fresh_ingredient_is_available() {
        let ingredient = ingredient(day(2025, 1, 31), false);
        assert!(ingredient.is_available(day(2024, 12, 1)));
    }

    #[test]
    fn expiry_day_is_still_available() {
        let ingredient = ingredient(day(2024, 12, 1), false);
        assert!(ingredient.is_available(day(2024, 12, 1)));
        assert!(!ingredient.is_available(day(2024, 12, 2)));
    }

    #[test]
    fn exhausted_ingredient_is_unavailable_even_if_fresh() {
        let ingredient = ingredient(day(2025, 1, 31), true);
        assert!(!ingredient.is_available(day(2024, 12, 1)));
    }

    #[test]
    fn malformed_row_is_rejected() {
        let model = Model {
            id: String::from("not-a-uuid"),
            name: String::from("Farina"),
            brand: None,
            supplier: None,
            supplier_lot: String::from("L-1"),
            notes: None,
            mrp_minor: 0,
            expires_on: day(2025, 1, 31),
            is_exhausted: false,
            recorded_by: String::from("alice"),
            created_at: Utc::now(),
        };

        assert!(matches!(
            Ingredient::try_from(model),
            Err(EngineError::Corrupted(_))
        ));
    }
}
