use chrono::NaiveDate;
use sea_orm::{
    ConnectionTrait, QueryFilter, SqlErr, Statement, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Ingredient, LotIngredient, NewLot, ProductLot, ResultEngine, ingredients,
    lot_ingredients, product_lots,
};

use super::{Engine, Principal, normalize_required_text, with_tx};

impl Engine {
    /// Allocates the next lot code for a manufacturing date.
    ///
    /// The counter row is bumped in a single upsert-increment statement, so
    /// two stations asking for the same date always receive distinct,
    /// increasing sequence numbers; there is no read-then-write window.
    async fn allocate_lot_code<C: ConnectionTrait>(
        &self,
        conn: &C,
        manufactured_on: NaiveDate,
    ) -> ResultEngine<String> {
        let backend = conn.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "INSERT INTO lot_code_counters (manufactured_on, next_seq) VALUES (?, 1) \
             ON CONFLICT(manufactured_on) DO UPDATE SET next_seq = next_seq + 1 \
             RETURNING next_seq;",
            vec![manufactured_on.into()],
        );

        let row = conn
            .query_one(stmt)
            .await
            .map_err(EngineError::StoreWriteFailed)?
            .ok_or_else(|| EngineError::CodeGenerationFailed(manufactured_on.to_string()))?;
        let seq: i64 = row
            .try_get("", "next_seq")
            .map_err(|_| EngineError::CodeGenerationFailed(manufactured_on.to_string()))?;

        Ok(crate::format_lot_code(manufactured_on, seq))
    }

    /// Hands out a lot code without creating a lot.
    ///
    /// Codes are never reused, including ones whose lot was rolled back;
    /// uniqueness, not density, is the contract.
    pub async fn generate_lot_code(&self, manufactured_on: NaiveDate) -> ResultEngine<String> {
        self.allocate_lot_code(&self.database, manufactured_on).await
    }

    /// Registers a production lot from the selected ingredients.
    ///
    /// The lot row and its ingredient links are one unit: both commit or
    /// neither does, so a lot with zero links is never observable. The
    /// ingredient set is re-checked against the store inside the transaction;
    /// whatever availability list the caller picked from is only a hint.
    pub async fn create_lot(
        &self,
        principal: &Principal,
        new: NewLot,
        as_of: NaiveDate,
    ) -> ResultEngine<ProductLot> {
        let product_name = normalize_required_text(&new.product_name, "product name")?;
        let mut ingredient_ids = new.ingredient_ids;
        ingredient_ids.sort_unstable();
        ingredient_ids.dedup();
        if ingredient_ids.is_empty() {
            return Err(EngineError::Validation(
                "at least one ingredient is required".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let models = ingredients::Entity::find()
                .filter(
                    ingredients::Column::Id
                        .is_in(ingredient_ids.iter().map(Uuid::to_string)),
                )
                .all(&db_tx)
                .await
                .map_err(EngineError::StoreUnavailable)?;
            if models.len() != ingredient_ids.len() {
                return Err(EngineError::NotFound("ingredient not exists".to_string()));
            }
            for model in models {
                let ingredient = Ingredient::try_from(model)?;
                if !ingredient.is_available(as_of) {
                    return Err(EngineError::Validation(format!(
                        "ingredient \"{}\" is not available",
                        ingredient.name
                    )));
                }
            }

            let lot_code = self.allocate_lot_code(&db_tx, new.manufactured_on).await?;
            let lot = ProductLot::new(
                lot_code,
                product_name,
                new.manufactured_on,
                self.shelf_life_days(),
                principal.username().to_string(),
            )?;

            product_lots::ActiveModel::from(&lot)
                .insert(&db_tx)
                .await
                .map_err(|err| match err.sql_err() {
                    // The counter is the single source of codes, so a
                    // collision on the unique lot_code index means the
                    // allocation itself cannot be trusted.
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        EngineError::CodeGenerationFailed(new.manufactured_on.to_string())
                    }
                    _ => EngineError::StoreWriteFailed(err),
                })?;

            let links: Vec<lot_ingredients::ActiveModel> = ingredient_ids
                .iter()
                .map(|ingredient_id| {
                    lot_ingredients::ActiveModel::from(&LotIngredient {
                        product_lot_id: lot.id,
                        ingredient_id: *ingredient_id,
                        quantity_used: None,
                    })
                })
                .collect();
            lot_ingredients::Entity::insert_many(links)
                .exec(&db_tx)
                .await
                .map_err(EngineError::StoreWriteFailed)?;

            tracing::info!(
                user = principal.username(),
                lot_code = %lot.lot_code,
                "production lot created"
            );
            Ok(lot)
        })
    }
}
