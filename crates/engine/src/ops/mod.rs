use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod availability;
mod ingredients;
mod lots;
mod sales;
mod stats;

pub use access::Principal;

/// Shelf life applied to new production lots when none is configured, in days.
pub const DEFAULT_SHELF_LIFE_DAYS: u64 = 21;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self
            .database
            .begin()
            .await
            .map_err(EngineError::StoreWriteFailed)?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit()
                    .await
                    .map_err(EngineError::StoreWriteFailed)?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The core ledger engine.
///
/// Holds no state besides the store connection: every read goes back to the
/// store so mutations from other stations are visible on the next call.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    shelf_life_days: u64,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn shelf_life_days(&self) -> u64 {
        self.shelf_life_days
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    shelf_life_days: u64,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            shelf_life_days: DEFAULT_SHELF_LIFE_DAYS,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the shelf life applied to new lots.
    pub fn shelf_life_days(mut self, days: u64) -> EngineBuilder {
        self.shelf_life_days = days;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
            shelf_life_days: self.shelf_life_days,
        }
    }
}
