//! Statistics API endpoints

use api_types::stats::DailySales;
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{ServerError, server::ServerState};

#[derive(Debug, Deserialize)]
pub struct DailySalesQuery {
    /// Defaults to the current date when omitted.
    pub day: Option<NaiveDate>,
}

/// Handle requests for the revenue rollup of a day
pub async fn daily_sales(
    State(state): State<ServerState>,
    Query(query): Query<DailySalesQuery>,
) -> Result<Json<DailySales>, ServerError> {
    let day = query.day.unwrap_or_else(|| Utc::now().date_naive());
    let total_minor = state.engine.total_sales(day).await?;

    Ok(Json(DailySales { day, total_minor }))
}
