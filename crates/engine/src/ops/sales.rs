use chrono::{NaiveDate, Utc};
use sea_orm::{QueryFilter, SqlErr, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Sale, product_lots, sales};

use super::{Engine, Principal, normalize_required_text};

impl Engine {
    /// Books a sale against an unsold lot.
    ///
    /// The unsold precondition is re-checked at call time, but the check is
    /// only advisory: the unique index on `sales.product_lot_id` decides the
    /// race between two stations selling the same lot. Exactly one insert
    /// commits; the loser surfaces as [`EngineError::LotAlreadySold`].
    pub async fn record_sale(
        &self,
        principal: &Principal,
        lot_id: Uuid,
        customer: &str,
        selling_price_minor: i64,
        sold_on: NaiveDate,
    ) -> ResultEngine<Sale> {
        let customer = normalize_required_text(customer, "customer name")?;
        if selling_price_minor < 0 {
            return Err(EngineError::Validation(
                "selling price must not be negative".to_string(),
            ));
        }

        let lot_model = product_lots::Entity::find_by_id(lot_id.to_string())
            .one(&self.database)
            .await
            .map_err(EngineError::StoreUnavailable)?
            .ok_or_else(|| EngineError::NotFound("lot not exists".to_string()))?;
        let lot_code = lot_model.lot_code;

        let already_sold = sales::Entity::find()
            .filter(sales::Column::ProductLotId.eq(lot_id.to_string()))
            .one(&self.database)
            .await
            .map_err(EngineError::StoreUnavailable)?
            .is_some();
        if already_sold {
            return Err(EngineError::LotAlreadySold(lot_code));
        }

        let sale = Sale {
            id: Uuid::new_v4(),
            product_lot_id: lot_id,
            customer,
            selling_price_minor,
            sold_on,
            recorded_by: principal.username().to_string(),
            created_at: Utc::now(),
        };

        sales::ActiveModel::from(&sale)
            .insert(&self.database)
            .await
            .map_err(|err| match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    EngineError::LotAlreadySold(lot_code.clone())
                }
                _ => EngineError::StoreWriteFailed(err),
            })?;

        tracing::info!(
            user = principal.username(),
            lot_code = %lot_code,
            "sale recorded"
        );
        Ok(sale)
    }
}
