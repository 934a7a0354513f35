//! Sale rows.
//!
//! A sale books a finished lot to a customer. The `product_lot_id` column
//! carries a unique index, so the store itself guarantees a lot is sold at
//! most once; sales are never mutated or deleted.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// A recorded sale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub product_lot_id: Uuid,
    pub customer: String,
    /// Selling price in minor units.
    pub selling_price_minor: i64,
    pub sold_on: NaiveDate,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub product_lot_id: String,
    pub customer: String,
    pub selling_price_minor: i64,
    pub sold_on: Date,
    pub recorded_by: String,
    pub created_at: DateTimeUtc,
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
}

impl Related<super::product_lots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Sale> for ActiveModel {
    fn from(value: &Sale) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            product_lot_id: ActiveValue::Set(value.product_lot_id.to_string()),
            customer: ActiveValue::Set(value.customer.clone()),
            selling_price_minor: ActiveValue::Set(value.selling_price_minor),
            sold_on: ActiveValue::Set(value.sold_on),
            recorded_by: ActiveValue::Set(value.recorded_by.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Sale {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::Corrupted(format!("invalid sale id {}", model.id)))?,
            product_lot_id: Uuid::parse_str(&model.product_lot_id).map_err(|_| {
                EngineError::Corrupted(format!("invalid lot id {}", model.product_lot_id))
            })?,
            customer: model.customer,
            selling_price_minor: model.selling_price_minor,
            sold_on: model.sold_on,
            recorded_by: model.recorded_by,
            created_at: model.created_at,
        })
    }
}
