//! Ingredient API endpoints

use api_types::ingredient::{IngredientNew, IngredientView, PantryResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{NewIngredient, Principal};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn view(ingredient: engine::Ingredient) -> IngredientView {
    IngredientView {
        id: ingredient.id,
        name: ingredient.name,
        brand: ingredient.brand,
        supplier: ingredient.supplier,
        supplier_lot: ingredient.supplier_lot,
        notes: ingredient.notes,
        mrp_minor: ingredient.mrp_minor,
        expires_on: ingredient.expires_on,
        is_exhausted: ingredient.is_exhausted,
    }
}

/// Handle requests for stocking a new ingredient
pub async fn stock(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<IngredientNew>,
) -> Result<Json<IngredientView>, ServerError> {
    let ingredient = state
        .engine
        .stock_ingredient(
            &principal,
            NewIngredient {
                name: payload.name,
                brand: payload.brand,
                supplier: payload.supplier,
                supplier_lot: payload.supplier_lot,
                notes: payload.notes,
                mrp_minor: payload.mrp_minor,
                expires_on: payload.expires_on,
            },
        )
        .await?;

    Ok(Json(view(ingredient)))
}

/// Handle requests for the available/unavailable pantry partition
pub async fn pantry(
    State(state): State<ServerState>,
) -> Result<Json<PantryResponse>, ServerError> {
    let today = Utc::now().date_naive();
    let available = state.engine.available_ingredients(today).await?;
    let unavailable = state.engine.unavailable_ingredients(today).await?;

    Ok(Json(PantryResponse {
        available: available.into_iter().map(view).collect(),
        unavailable: unavailable.into_iter().map(view).collect(),
    }))
}

/// Handle requests for flagging an ingredient as used up
pub async fn exhaust(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.mark_exhausted(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
