use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Statement};

use crate::{EngineError, ResultEngine};

use super::Engine;

impl Engine {
    /// Returns the revenue for a day in minor units: the sum of
    /// `selling_price_minor` over sales with that `sold_on`.
    ///
    /// Recomputed on demand; there is no incremental counter to keep
    /// consistent. A day with no sales totals 0.
    pub async fn total_sales(&self, day: NaiveDate) -> ResultEngine<i64> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT COALESCE(SUM(selling_price_minor), 0) AS total \
             FROM sales \
             WHERE sold_on = ?;",
            vec![day.into()],
        );

        let row = self
            .database
            .query_one(stmt)
            .await
            .map_err(EngineError::StoreUnavailable)?;
        Ok(row.and_then(|r| r.try_get("", "total").ok()).unwrap_or(0))
    }
}
