//! Sales API endpoints

use api_types::sale::{SaleNew, SaleView};
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use engine::Principal;

use crate::{ServerError, server::ServerState};

/// Handle requests for recording a sale
pub async fn record(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<SaleNew>,
) -> Result<Json<SaleView>, ServerError> {
    let sold_on = payload.sold_on.unwrap_or_else(|| Utc::now().date_naive());

    let sale = state
        .engine
        .record_sale(
            &principal,
            payload.product_lot_id,
            &payload.customer,
            payload.selling_price_minor,
            sold_on,
        )
        .await?;

    Ok(Json(SaleView {
        id: sale.id,
        product_lot_id: sale.product_lot_id,
        customer: sale.customer,
        selling_price_minor: sale.selling_price_minor,
        sold_on: sale.sold_on,
    }))
}
