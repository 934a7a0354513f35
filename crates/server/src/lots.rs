//! Production lot API endpoints

use api_types::lot::{LotNew, LotView, UnsoldLotsResponse};
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use engine::{NewLot, Principal};

use crate::{ServerError, server::ServerState};

fn view(lot: engine::ProductLot) -> LotView {
    LotView {
        id: lot.id,
        lot_code: lot.lot_code,
        product_name: lot.product_name,
        manufactured_on: lot.manufactured_on,
        expires_on: lot.expires_on,
    }
}

/// Handle requests for registering a new lot
pub async fn create(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<LotNew>,
) -> Result<Json<LotView>, ServerError> {
    let lot = state
        .engine
        .create_lot(
            &principal,
            NewLot {
                product_name: payload.product_name,
                manufactured_on: payload.manufactured_on,
                ingredient_ids: payload.ingredient_ids,
            },
            Utc::now().date_naive(),
        )
        .await?;

    Ok(Json(view(lot)))
}

/// Handle requests for listing unsold lots
pub async fn unsold(
    State(state): State<ServerState>,
) -> Result<Json<UnsoldLotsResponse>, ServerError> {
    let lots = state.engine.unsold_lots().await?;

    Ok(Json(UnsoldLotsResponse {
        lots: lots.into_iter().map(view).collect(),
    }))
}
