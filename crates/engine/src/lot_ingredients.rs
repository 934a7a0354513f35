//! Lot↔ingredient link rows.
//!
//! Links are written once, as a batch, in the same transaction as their lot;
//! they are never mutated or removed afterwards, otherwise the provenance
//! graph would lose edges.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// An edge of the ingredient→lot provenance graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotIngredient {
    pub product_lot_id: Uuid,
    pub ingredient_id: Uuid,
    /// Reserved: present in the schema, consumed by no read path.
    pub quantity_used: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lot_ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_lot_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub ingredient_id: String,
    pub quantity_used: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_lots::Entity",
        from = "Column::ProductLotId",
        to = "super::product_lots::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    ProductLots,
    #[sea_orm(
        belongs_to = "super::ingredients::Entity",
        from = "Column::IngredientId",
        to = "super::ingredients::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Ingredients,
}

impl Related<super::product_lots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLots.def()
    }
}

impl Related<super::ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&LotIngredient> for ActiveModel {
    fn from(value: &LotIngredient) -> Self {
        Self {
            product_lot_id: ActiveValue::Set(value.product_lot_id.to_string()),
            ingredient_id: ActiveValue::Set(value.ingredient_id.to_string()),
            quantity_used: ActiveValue::Set(value.quantity_used),
        }
    }
}

impl TryFrom<Model> for LotIngredient {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            product_lot_id: Uuid::parse_str(&model.product_lot_id).map_err(|_| {
                EngineError::Corrupted(format!("invalid lot id {}", model.product_lot_id))
            })?,
            ingredient_id: Uuid::parse_str(&model.ingredient_id).map_err(|_| {
                EngineError::Corrupted(format!("invalid ingredient id {}", model.ingredient_id))
            })?,
            quantity_used: model.quantity_used,
        })
    }
}
