pub use error::EngineError;
pub use ingredients::{Ingredient, NewIngredient};
pub use lot_ingredients::LotIngredient;
pub use ops::{DEFAULT_SHELF_LIFE_DAYS, Engine, EngineBuilder, Principal};
pub use product_lots::{NewLot, ProductLot, format_lot_code};
pub use sales::Sale;

mod error;
mod ingredients;
mod lot_ingredients;
mod ops;
mod product_lots;
mod sales;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
