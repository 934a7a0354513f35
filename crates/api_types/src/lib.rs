use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod ingredient {
    use super::*;

    /// Request body for stocking a new ingredient.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct IngredientNew {
        pub name: String,
        #[serde(default)]
        pub brand: Option<String>,
        #[serde(default)]
        pub supplier: Option<String>,
        /// The supplier's own lot/batch label.
        pub supplier_lot: String,
        #[serde(default)]
        pub notes: Option<String>,
        /// Purchase price in minor units.
        #[serde(default)]
        pub mrp_minor: i64,
        pub expires_on: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IngredientView {
        pub id: Uuid,
        pub name: String,
        pub brand: Option<String>,
        pub supplier: Option<String>,
        pub supplier_lot: String,
        pub notes: Option<String>,
        pub mrp_minor: i64,
        pub expires_on: NaiveDate,
        pub is_exhausted: bool,
    }

    /// The pantry partition: usable ingredients and the expired/exhausted
    /// rest.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PantryResponse {
        pub available: Vec<IngredientView>,
        pub unavailable: Vec<IngredientView>,
    }
}

pub mod lot {
    use super::*;

    /// Request body for registering a production lot.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LotNew {
        pub product_name: String,
        pub manufactured_on: NaiveDate,
        pub ingredient_ids: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LotView {
        pub id: Uuid,
        pub lot_code: String,
        pub product_name: String,
        pub manufactured_on: NaiveDate,
        pub expires_on: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UnsoldLotsResponse {
        pub lots: Vec<LotView>,
    }
}

pub mod sale {
    use super::*;

    /// Request body for recording a sale.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleNew {
        pub product_lot_id: Uuid,
        pub customer: String,
        /// Selling price in minor units.
        pub selling_price_minor: i64,
        /// Defaults to the current date when omitted.
        #[serde(default)]
        pub sold_on: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleView {
        pub id: Uuid,
        pub product_lot_id: Uuid,
        pub customer: String,
        pub selling_price_minor: i64,
        pub sold_on: NaiveDate,
    }
}

pub mod stats {
    use super::*;

    /// Revenue rollup for a single day.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailySales {
        pub day: NaiveDate,
        pub total_minor: i64,
    }
}
