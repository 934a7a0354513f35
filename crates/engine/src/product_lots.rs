//! Production lot primitives.
//!
//! A `ProductLot` is a single manufacturing batch of a finished product,
//! traceable to the ingredients linked at creation time. Lots are immutable
//! after creation except through the sale relationship.

use chrono::{DateTime, Days, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Formats a lot code: compact manufacture date plus the per-date sequence.
///
/// Sequences below 1000 are zero-padded so codes within a day sort
/// lexicographically in allocation order.
pub fn format_lot_code(manufactured_on: NaiveDate, seq: i64) -> String {
    format!("{}-{:03}", manufactured_on.format("%Y%m%d"), seq)
}

/// A production lot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLot {
    pub id: Uuid,
    /// Unique human-readable identifier, scoped to the manufacture date.
    pub lot_code: String,
    pub product_name: String,
    pub manufactured_on: NaiveDate,
    pub expires_on: NaiveDate,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
}

impl ProductLot {
    pub fn new(
        lot_code: String,
        product_name: String,
        manufactured_on: NaiveDate,
        shelf_life_days: u64,
        recorded_by: String,
    ) -> ResultEngine<Self> {
        let expires_on = manufactured_on
            .checked_add_days(Days::new(shelf_life_days))
            .ok_or_else(|| {
                EngineError::Validation("manufacture date out of range".to_string())
            })?;

        Ok(Self {
            id: Uuid::new_v4(),
            lot_code,
            product_name,
            manufactured_on,
            expires_on,
            recorded_by,
            created_at: Utc::now(),
        })
    }
}

/// Field values for registering a new lot.
#[derive(Clone, Debug)]
pub struct NewLot {
    pub product_name: String,
    pub manufactured_on: NaiveDate,
    pub ingredient_ids: Vec<Uuid>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product_lots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub lot_code: String,
    pub product_name: String,
    pub manufactured_on: Date,
    pub expires_on: Date,
    pub recorded_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lot_ingredients::Entity")]
    LotIngredients,
    #[sea_orm(has_many = "super::sales::Entity")]
    Sales,
}

impl Related<super::lot_ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LotIngredients.def()
    }
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ProductLot> for ActiveModel {
    fn from(value: &ProductLot) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            lot_code: ActiveValue::Set(value.lot_code.clone()),
            product_name: ActiveValue::Set(value.product_name.clone()),
            manufactured_on: ActiveValue::Set(value.manufactured_on),
            expires_on: ActiveValue::Set(value.expires_on),
            recorded_by: ActiveValue::Set(value.recorded_by.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for ProductLot {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::Corrupted(format!("invalid lot id {}", model.id)))?,
            lot_code: model.lot_code,
            product_name: model.product_name,
            manufactured_on: model.manufactured_on,
            expires_on: model.expires_on,
            recorded_by: model.recorded_by,
            created_at: model.created_at,
        })
    }
}
