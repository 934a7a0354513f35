use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{router, run, run_with_listener, spawn_with_listener};

mod ingredients;
mod lots;
mod sales;
mod server;
mod statistics;

pub mod types {
    pub mod ingredient {
        pub use api_types::ingredient::{IngredientNew, IngredientView, PantryResponse};
        pub use engine::Ingredient;
    }

    pub mod lot {
        pub use api_types::lot::{LotNew, LotView, UnsoldLotsResponse};
        pub use engine::ProductLot;
    }

    pub mod sale {
        pub use api_types::sale::{SaleNew, SaleView};
        pub use engine::Sale;
    }

    pub mod stats {
        pub use api_types::stats::DailySales;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Unauthorized => StatusCode::UNAUTHORIZED,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::LotAlreadySold(_) | EngineError::CodeGenerationFailed(_) => {
            StatusCode::CONFLICT
        }
        EngineError::StoreUnavailable(_) | EngineError::StoreWriteFailed(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        EngineError::Corrupted(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::StoreUnavailable(db_err) | EngineError::StoreWriteFailed(db_err) => {
            tracing::error!("store error: {db_err}");
            "store unavailable, try again".to_string()
        }
        EngineError::Corrupted(detail) => {
            tracing::error!("corrupt row: {detail}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
