use chrono::NaiveDate;
use sea_orm::{Condition, QueryFilter, QueryOrder, prelude::*, sea_query::Query};

use crate::{EngineError, Ingredient, ProductLot, ResultEngine, ingredients, product_lots, sales};

use super::Engine;

impl Engine {
    /// Lists ingredients usable as of the given date: not exhausted and not
    /// past expiry. Ordered by name, ties in stocking order.
    pub async fn available_ingredients(&self, as_of: NaiveDate) -> ResultEngine<Vec<Ingredient>> {
        let models = ingredients::Entity::find()
            .filter(ingredients::Column::IsExhausted.eq(false))
            .filter(ingredients::Column::ExpiresOn.gte(as_of))
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::CreatedAt)
            .order_by_asc(ingredients::Column::Id)
            .all(&self.database)
            .await
            .map_err(EngineError::StoreUnavailable)?;

        models.into_iter().map(Ingredient::try_from).collect()
    }

    /// Lists the complement partition: exhausted or expired as of the given
    /// date, with no record of which of the two applies.
    pub async fn unavailable_ingredients(&self, as_of: NaiveDate) -> ResultEngine<Vec<Ingredient>> {
        let models = ingredients::Entity::find()
            .filter(
                Condition::any()
                    .add(ingredients::Column::IsExhausted.eq(true))
                    .add(ingredients::Column::ExpiresOn.lt(as_of)),
            )
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::CreatedAt)
            .order_by_asc(ingredients::Column::Id)
            .all(&self.database)
            .await
            .map_err(EngineError::StoreUnavailable)?;

        models.into_iter().map(Ingredient::try_from).collect()
    }

    /// Lists lots with no sale recorded against them, oldest manufacture
    /// first.
    pub async fn unsold_lots(&self) -> ResultEngine<Vec<ProductLot>> {
        let sold = Query::select()
            .column(sales::Column::ProductLotId)
            .from(sales::Entity)
            .to_owned();

        let models = product_lots::Entity::find()
            .filter(product_lots::Column::Id.not_in_subquery(sold))
            .order_by_asc(product_lots::Column::ManufacturedOn)
            .order_by_asc(product_lots::Column::LotCode)
            .all(&self.database)
            .await
            .map_err(EngineError::StoreUnavailable)?;

        models.into_iter().map(ProductLot::try_from).collect()
    }
}
